//! obsidian-actions - drive Obsidian from Rust through the Actions URI plugin.
//!
//! # Overview
//!
//! Every action is an x-callback-url handed to the `xcall` helper, which
//! prints the plugin's reply on stdout (success) or stderr (failure). On top
//! of that this crate provides:
//! - A [`Vault`] facade with file, folder, note, tag, command, search and
//!   periodic note actions
//! - Lazily loaded [`Note`] views and snapshot collections
//! - An immutable Dataview query builder
//!
//! # Example
//!
//! ```no_run
//! use obsidian_actions::{Combinator, DataviewQuery, Source, Vault};
//!
//! let vault = Vault::new("Main").unwrap();
//!
//! let note = vault.note("Projects/Plan");
//! println!("{}", note.body().unwrap());
//!
//! let query = DataviewQuery::list(&[Source::tag("a"), Source::tag("b")], Some(Combinator::Or))
//!     .unwrap()
//!     .sort("file.name");
//! for note in query.execute(&vault).unwrap().into_notes().unwrap() {
//!     println!("{}", note.name());
//! }
//! ```

pub mod cli;
pub mod collection;
pub mod config;
pub mod dataview;
pub mod error;
pub mod note;
pub mod types;
pub mod vault;
pub mod xcall;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use collection::{Collection, Commands, Keyed, Notes, Tags};
pub use config::Config;
pub use dataview::{Combinator, DataviewQuery, QueryKind, QueryResult, Source};
pub use error::{Result, VaultError};
pub use note::{Note, NoteData};
pub use types::*;
pub use vault::Vault;
pub use xcall::{Params, Reply, Transport, XCall};
