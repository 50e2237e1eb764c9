//! The vault facade: every action funnels through [`Vault::call`].

use crate::collection::{Commands, Notes, Tags};
use crate::config::Config;
use crate::dataview::{Combinator, DataviewQuery, QueryKind, Source};
use crate::error::{Result, VaultError};
use crate::note::{Note, NoteData};
use crate::types::{Command, CommandEntry, CreateOptions, Info, InsertOptions, Period, ReplaceMode, Tag};
use crate::xcall::{self, Params, Transport, XCall};
use serde_json::Value;
use std::cell::OnceCell;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Application identifier the plugin registers.
pub const APP: &str = "obsidian";

/// First path segment of every plugin route.
pub const PLUGIN: &str = "actions-uri";

/// A named Obsidian vault, reached through the Actions URI plugin.
#[derive(Debug, Clone)]
pub struct Vault {
    name: String,
    transport: Rc<dyn Transport>,
    info: OnceCell<Info>,
}

impl Vault {
    /// Prepare to run actions in the vault called `name`, using the
    /// `xcall` binary found on this machine.
    pub fn new(name: &str) -> Result<Self> {
        Ok(Self::with_transport(name, Rc::new(XCall::locate()?)))
    }

    /// Like [`Vault::new`], honouring a configured binary.
    pub fn from_config(name: &str, config: &Config) -> Result<Self> {
        let xcall = match &config.xcall {
            Some(path) => XCall::with_binary(path)?,
            None => XCall::locate()?,
        };
        Ok(Self::with_transport(name, Rc::new(xcall)))
    }

    /// Use a custom transport.
    pub fn with_transport(name: &str, transport: Rc<dyn Transport>) -> Self {
        Self {
            name: name.to_string(),
            transport,
            info: OnceCell::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run any plugin route.
    ///
    /// Routes are listed at https://zottmann.dev/obsidian-actions-uri/routes/.
    /// Neither the vault nor the `actions-uri` segment has to be included.
    pub fn call(&self, actions: &[&str], params: Params) -> Result<Value> {
        self.request(actions, params, xcall::parse_reply)
    }

    /// Like [`Vault::call`], but only the reply itself is parsed; JSON-looking
    /// strings inside it (note text, link lists) are left as text.
    pub(crate) fn call_unexpanded(&self, actions: &[&str], params: Params) -> Result<Value> {
        self.request(actions, params, xcall::parse_once)
    }

    fn request(&self, actions: &[&str], params: Params, parse: fn(&str) -> Value) -> Result<Value> {
        let mut route = Vec::with_capacity(actions.len() + 1);
        route.push(PLUGIN);
        route.extend_from_slice(actions);

        let params = Params::new().set("vault", self.name.as_str()).chain(params);
        let text = xcall::xcall_raw(self.transport.as_ref(), APP, &route, &params)?;
        debug!(route = %actions.join("/"), "action succeeded");
        Ok(unwrap_reply(parse(&text)))
    }

    // Commands

    /// Commands available in the command palette.
    pub fn commands(&self) -> Result<Commands> {
        let reply = self.call(&["command", "list"], Params::new())?;
        let entries: Vec<CommandEntry> = serde_json::from_value(list_value(reply)?)?;
        Ok(entries
            .iter()
            .map(|entry| Command::new(self, &entry.id, &entry.name))
            .collect())
    }

    /// Run commands in sequence, optionally pausing between them.
    pub fn execute_command(&self, ids: &[&str], pause_in_secs: Option<u32>) -> Result<Value> {
        if ids.is_empty() {
            return Err(VaultError::InvalidArguments(
                "no command to execute".to_string(),
            ));
        }
        self.call(
            &["command", "execute"],
            Params::new()
                .set("commands", ids.join(","))
                .set_opt("pause_in_secs", pause_in_secs),
        )
    }

    // Files

    /// All files (not just notes) in the vault.
    pub fn file_list(&self) -> Result<Vec<String>> {
        string_list(self.call(&["file", "list"], Params::new())?)
    }

    pub fn file_get_active(&self) -> Result<Value> {
        self.call(&["file", "get-active"], Params::new())
    }

    pub fn file_open(&self, file: &str) -> Result<Value> {
        self.call(&["file", "open"], Params::new().set("file", file))
    }

    /// Rename a file; unless `silent`, the renamed file is opened.
    pub fn file_rename(&self, file: &str, new_filename: &str, silent: bool) -> Result<Value> {
        self.call(
            &["file", "rename"],
            Params::new()
                .set("file", file)
                .set("new_filename", new_filename)
                .set("silent", silent),
        )
    }

    pub fn file_delete(&self, file: &str) -> Result<Value> {
        self.call(&["file", "delete"], Params::new().set("file", file))
    }

    pub fn file_trash(&self, file: &str) -> Result<Value> {
        self.call(&["file", "trash"], Params::new().set("file", file))
    }

    // Folders (paths relative to the vault root)

    pub fn folder_list(&self) -> Result<Vec<String>> {
        string_list(self.call(&["folder", "list"], Params::new())?)
    }

    pub fn folder_create(&self, folder: &str) -> Result<Value> {
        self.call(&["folder", "create"], Params::new().set("folder", folder))
    }

    pub fn folder_rename(&self, folder: &str, new_foldername: &str) -> Result<Value> {
        self.call(
            &["folder", "rename"],
            Params::new()
                .set("folder", folder)
                .set("new_foldername", new_foldername),
        )
    }

    pub fn folder_delete(&self, folder: &str) -> Result<Value> {
        self.call(&["folder", "delete"], Params::new().set("folder", folder))
    }

    pub fn folder_trash(&self, folder: &str) -> Result<Value> {
        self.call(&["folder", "trash"], Params::new().set("folder", folder))
    }

    // Notes

    /// Lazy view of a note; nothing is fetched until its data is needed.
    pub fn note(&self, name: &str) -> Note {
        Note::new(self, name)
    }

    /// All notes in the vault.
    pub fn notes(&self) -> Result<Notes> {
        let paths = string_list(self.call(&["note", "list"], Params::new())?)?;
        Ok(self.notes_from(paths.iter().map(String::as_str)))
    }

    /// Notes for an explicit list of names.
    pub fn notes_from<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Notes {
        names.into_iter().map(|name| Note::new(self, name)).collect()
    }

    /// Fetch note data without opening the note in Obsidian.
    pub(crate) fn note_data(&self, name: &str) -> Result<NoteData> {
        NoteData::from_reply(self.call_unexpanded(
            &["note", "get"],
            Params::new().set("file", name).set("silent", true),
        )?)
    }

    /// Fetch a note.
    ///
    /// With `full_path`, `name` is the vault-relative path; otherwise the
    /// first note with that file name is used. The extension may be omitted.
    pub fn note_get(&self, name: &str, full_path: bool, silent: bool) -> Result<Note> {
        let getter = if full_path { "get" } else { "get-first-named" };
        let reply = self.call_unexpanded(
            &["note", getter],
            Params::new().set("file", name).set("silent", silent),
        )?;
        Ok(Note::from_data(self, NoteData::from_reply(reply)?))
    }

    /// The note currently open in Obsidian.
    pub fn note_get_active(&self) -> Result<Note> {
        let reply = self.call_unexpanded(&["note", "get-active"], Params::new())?;
        Ok(Note::from_data(self, NoteData::from_reply(reply)?))
    }

    pub fn note_open(&self, name: &str) -> Result<Value> {
        self.call(&["note", "open"], Params::new().set("file", name))
    }

    /// Create a note.
    ///
    /// The note starts empty unless `content` or `template` is given; an
    /// existing note is left alone unless `overwrite` is set.
    pub fn note_create(&self, name: &str, options: &CreateOptions) -> Result<Note> {
        if options.content.is_some() && options.template.is_some() {
            return Err(VaultError::InvalidArguments(
                "both content and template are set; choose one".to_string(),
            ));
        }

        let apply = if options.template.is_some() { "template" } else { "content" };
        let content = match (&options.content, &options.template) {
            (None, None) => Some(String::new()),
            (content, _) => content.clone(),
        };

        let reply = self.call_unexpanded(
            &["note", "create"],
            Params::new()
                .set("file", name)
                .set("apply", apply)
                .set_opt("content", content)
                .set_opt("template", options.template.as_deref())
                .set("if_exists", if options.overwrite { "overwrite" } else { "skip" })
                .set("silent", options.silent),
        )?;
        Ok(Note::from_data(self, NoteData::from_reply(reply)?))
    }

    /// Append `content` to the end of a note, or below a headline.
    pub fn note_append(&self, name: &str, content: &str, options: &InsertOptions) -> Result<Value> {
        self.insert("append", name, content, options)
    }

    /// Prepend `content` right after the front matter, or below a headline.
    pub fn note_prepend(&self, name: &str, content: &str, options: &InsertOptions) -> Result<Value> {
        self.insert("prepend", name, content, options)
    }

    fn insert(&self, action: &str, name: &str, content: &str, options: &InsertOptions) -> Result<Value> {
        self.call(
            &["note", action],
            Params::new()
                .set("file", name)
                .set("content", content)
                .set_opt("below_headline", options.below_headline.as_deref())
                .set("create_if_not_found", options.create_if_not_found)
                .set("ensure_newline", options.ensure_newline)
                .set("silent", options.silent),
        )
    }

    /// Replace every occurrence of `search` in a note.
    pub fn note_search_replace(
        &self,
        name: &str,
        search: &str,
        replace: &str,
        mode: ReplaceMode,
    ) -> Result<Value> {
        self.call(
            &["note", mode.action()],
            Params::new()
                .set("file", name)
                .set("search", search)
                .set("replace", replace),
        )
    }

    pub fn note_delete(&self, name: &str) -> Result<Value> {
        self.call(&["note", "delete"], Params::new().set("file", name))
    }

    pub fn note_trash(&self, name: &str) -> Result<Value> {
        self.call(&["note", "trash"], Params::new().set("file", name))
    }

    // Tags

    /// All tags used in the vault.
    pub fn tags(&self) -> Result<Tags> {
        let names = string_list(self.call(&["tags", "list"], Params::new())?)?;
        Ok(names.iter().map(|name| Tag::new(self, name)).collect())
    }

    // Search

    /// Notes matching a search query.
    pub fn search(&self, query: &str) -> Result<Notes> {
        let hits = string_list(self.call(&["search", "all-notes"], Params::new().set("query", query))?)?;
        Ok(self.notes_from(hits.iter().map(String::as_str)))
    }

    /// Show the search results in Obsidian.
    pub fn search_open(&self, query: &str) -> Result<Value> {
        self.call(&["search", "open"], Params::new().set("query", query))
    }

    // Dataview

    pub fn dataview_list_query(&self, dql: &str) -> Result<Value> {
        self.call(&["dataview", "list-query"], Params::new().set("dql", dql))
    }

    /// Run a LIST query, keeping each rendered link as text.
    pub(crate) fn dataview_list_links(&self, dql: &str) -> Result<Value> {
        self.call_unexpanded(&["dataview", "list-query"], Params::new().set("dql", dql))
    }

    pub fn dataview_table_query(&self, dql: &str) -> Result<Value> {
        self.call(&["dataview", "table-query"], Params::new().set("dql", dql))
    }

    /// Start a Dataview query; run it with [`DataviewQuery::execute`].
    pub fn query(
        &self,
        kind: QueryKind,
        fields: &[&str],
        sources: &[Source],
        combinator: Option<Combinator>,
    ) -> Result<DataviewQuery> {
        DataviewQuery::new(kind, fields, sources, combinator)
    }

    // Periodic notes

    /// The current note of `period`.
    ///
    /// A missing note is created once through its command and fetched again;
    /// a second failure is returned as is.
    pub fn periodic_note(&self, period: Period) -> Result<Note> {
        match self.current_periodic_note(period) {
            Err(err) if err.is_not_found() => {
                info!(?period, command = period.create_command(), "creating missing periodic note");
                self.execute_command(&[period.create_command()], None)?;
                self.current_periodic_note(period)
            }
            other => other,
        }
    }

    fn current_periodic_note(&self, period: Period) -> Result<Note> {
        let reply = self.call_unexpanded(&[period.route(), "get-current"], Params::new())?;
        Ok(Note::from_data(self, NoteData::from_reply(reply)?))
    }

    pub fn daily_note(&self) -> Result<Note> {
        self.periodic_note(Period::Daily)
    }

    pub fn weekly_note(&self) -> Result<Note> {
        self.periodic_note(Period::Weekly)
    }

    pub fn monthly_note(&self) -> Result<Note> {
        self.periodic_note(Period::Monthly)
    }

    pub fn quarterly_note(&self) -> Result<Note> {
        self.periodic_note(Period::Quarterly)
    }

    pub fn yearly_note(&self) -> Result<Note> {
        self.periodic_note(Period::Yearly)
    }

    // Info

    /// Information about the plugin and Obsidian, fetched once.
    pub fn info(&self) -> Result<&Info> {
        if let Some(info) = self.info.get() {
            return Ok(info);
        }
        let reply = self.call(&["info"], Params::new())?;
        let info: Info = serde_json::from_value(reply)?;
        Ok(self.info.get_or_init(|| info))
    }

    /// Filesystem path of the vault.
    pub fn base_path(&self) -> Result<&Path> {
        self.info()?
            .vault_path
            .as_deref()
            .ok_or_else(|| VaultError::UnexpectedReply("info has no vault path".to_string()))
    }
}

/// Unwrap a single-entry reply to its value; otherwise strip `result-` from
/// every key.
pub fn unwrap_reply(reply: Value) -> Value {
    match reply {
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((_, value)) => value,
            None => Value::Null,
        },
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| match key.strip_prefix("result-") {
                    Some(stripped) => (stripped.to_string(), value),
                    None => (key, value),
                })
                .collect(),
        ),
        other => other,
    }
}

/// A reply that should be a list; an empty reply counts as an empty list.
fn list_value(reply: Value) -> Result<Value> {
    match reply {
        Value::Array(_) => Ok(reply),
        Value::Null => Ok(Value::Array(Vec::new())),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Array(Vec::new())),
        other => Err(VaultError::UnexpectedReply(format!("expected a list, got {}", other))),
    }
}

fn string_list(reply: Value) -> Result<Vec<String>> {
    let Value::Array(items) = list_value(reply)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            other => {
                warn!(item = %other, "skipping non-string list entry");
                None
            }
        })
        .collect())
}
