//! Dataview query building.

pub mod link;
pub mod query;

pub use link::{link_target, wikilink};
pub use query::{Combinator, DataviewQuery, QueryKind, QueryResult, Source};
