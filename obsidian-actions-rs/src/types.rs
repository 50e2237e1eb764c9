//! Shared types: tags, commands, plugin info and action options.

use crate::collection::{Keyed, Notes};
use crate::dataview::{DataviewQuery, Source};
use crate::error::Result;
use crate::vault::Vault;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// A tag used somewhere in the vault.
#[derive(Debug, Clone)]
pub struct Tag {
    vault: Vault,
    name: String,
    key: String,
}

impl Tag {
    /// Create a tag view; a leading `#` is stripped.
    pub fn new(vault: &Vault, name: &str) -> Self {
        let name = name.trim();
        let name = name.strip_prefix('#').unwrap_or(name).to_string();
        Self {
            vault: vault.clone(),
            key: identifier_key(&name),
            name,
        }
    }

    /// The tag without the leading `#`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag with its leading `#`.
    pub fn hashtag(&self) -> String {
        format!("#{}", self.name)
    }

    /// Identifier-safe form of the name (e.g. `tray/to-do` -> `tray_to_do`).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Notes carrying this tag.
    pub fn notes(&self) -> Result<Notes> {
        DataviewQuery::list(&[Source::tag(&self.name)], None)?
            .execute(&self.vault)?
            .into_notes()
    }
}

impl Keyed for Tag {
    fn id(&self) -> &str {
        &self.name
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.strip_prefix('#').unwrap_or(query);
        query == self.name || query == self.key
    }
}

/// Replace every character that can't appear in an identifier with `_`.
pub fn identifier_key(name: &str) -> String {
    let mut key: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if key.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        key.insert(0, '_');
    }
    key
}

/// An entry of the command palette.
#[derive(Debug, Clone)]
pub struct Command {
    vault: Vault,
    id: String,
    name: String,
}

impl Command {
    pub fn new(vault: &Vault, id: &str, name: &str) -> Self {
        Self {
            vault: vault.clone(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human readable name, as shown in the command palette.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask the vault to execute this command.
    pub fn execute(&self) -> Result<Value> {
        self.vault.execute_command(&[self.id.as_str()], None)
    }
}

impl Keyed for Command {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Raw command entry as listed by the plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Information about the plugin and the Obsidian instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_released_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,

    /// Filesystem base path of the vault.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_path: Option<PathBuf>,

    /// Any other fields the plugin reports.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Calendar period of a periodic note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Route prefix of the period's actions.
    pub fn route(self) -> &'static str {
        match self {
            Period::Daily => "daily-note",
            Period::Weekly => "weekly-note",
            Period::Monthly => "monthly-note",
            Period::Quarterly => "quarterly-note",
            Period::Yearly => "yearly-note",
        }
    }

    /// Command that opens (and if needed creates) the current note.
    pub fn create_command(self) -> &'static str {
        match self {
            Period::Daily => "daily-notes",
            Period::Weekly => "periodic-notes:open-weekly-note",
            Period::Monthly => "periodic-notes:open-monthly-note",
            Period::Quarterly => "periodic-notes:open-quarterly-note",
            Period::Yearly => "periodic-notes:open-yearly-note",
        }
    }
}

/// Options for creating a note.
///
/// `content` and `template` are mutually exclusive.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub content: Option<String>,
    pub template: Option<String>,
    /// Replace an existing note instead of leaving it untouched.
    pub overwrite: bool,
    /// Don't open the note in Obsidian.
    pub silent: bool,
}

impl CreateOptions {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Options for appending or prepending to a note.
#[derive(Debug, Clone, Default)]
pub struct InsertOptions {
    /// Exact headline line to insert below.
    pub below_headline: Option<String>,
    pub create_if_not_found: bool,
    pub ensure_newline: bool,
    pub silent: bool,
}

/// How `search` is interpreted in a search-and-replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceMode {
    #[default]
    Literal,
    Regex,
}

impl ReplaceMode {
    pub(crate) fn action(self) -> &'static str {
        match self {
            ReplaceMode::Literal => "search-string-and-replace",
            ReplaceMode::Regex => "search-regex-and-replace",
        }
    }
}
