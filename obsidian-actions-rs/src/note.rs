//! Lazily loaded note views.

use crate::collection::{Keyed, Notes};
use crate::dataview::{DataviewQuery, Source};
use crate::error::{Result, VaultError};
use crate::types::InsertOptions;
use crate::vault::Vault;
use crate::xcall::expand;
use serde::Serialize;
use serde_json::{Map, Value};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// Everything the plugin reports about a note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteData {
    /// Path relative to the vault root (e.g. "proj/My Project.md").
    pub path: PathBuf,

    /// Raw content, front matter included.
    pub content: String,

    /// Content without front matter.
    pub body: String,

    /// The raw front matter block.
    pub front_matter: String,

    /// Parsed front matter properties.
    pub properties: Map<String, Value>,
}

impl NoteData {
    /// Build from a note reply (`filepath`, `content`, `body`, `front-matter`,
    /// `properties`).
    ///
    /// Text fields are taken as they are; only `properties` is expanded.
    pub fn from_reply(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(VaultError::UnexpectedReply(format!(
                "expected note fields, got {}",
                value
            )));
        };

        let path = text_field(&mut map, "filepath")
            .map(PathBuf::from)
            .ok_or_else(|| VaultError::UnexpectedReply("note reply has no filepath".to_string()))?;

        let properties = match map.remove("properties").map(expand) {
            Some(Value::Object(props)) => normalize_properties(props),
            _ => Map::new(),
        };

        Ok(Self {
            path,
            content: text_field(&mut map, "content").unwrap_or_default(),
            body: text_field(&mut map, "body").unwrap_or_default(),
            front_matter: text_field(&mut map, "front-matter").unwrap_or_default(),
            properties,
        })
    }
}

/// Take a text field; anything that isn't a string is serialized back to text.
fn text_field(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Collapse list-of-single-key-mapping values into one mapping.
///
/// The plugin serializes some front matter mappings as `[{a: 1}, {b: 2}]`.
pub fn normalize_properties(properties: Map<String, Value>) -> Map<String, Value> {
    properties
        .into_iter()
        .map(|(key, value)| (key, collapse_single_key_list(value)))
        .collect()
}

fn collapse_single_key_list(value: Value) -> Value {
    match value {
        Value::Array(items)
            if !items.is_empty()
                && items
                    .iter()
                    .all(|item| matches!(item, Value::Object(m) if m.len() == 1)) =>
        {
            let mut merged = Map::new();
            for item in items {
                if let Value::Object(entry) = item {
                    merged.extend(entry);
                }
            }
            Value::Object(merged)
        }
        other => other,
    }
}

/// Strip whitespace and a `.md` extension from a note name.
pub fn note_name(name: &str) -> String {
    let name = name.trim();
    name.strip_suffix(".md").unwrap_or(name).to_string()
}

/// A note in a vault, fetched on first access and cached for its lifetime.
#[derive(Debug, Clone)]
pub struct Note {
    vault: Vault,
    name: String,
    data: OnceCell<NoteData>,
}

impl Note {
    /// Create an unloaded view of the note at the vault-relative `name`.
    pub fn new(vault: &Vault, name: &str) -> Self {
        Self {
            vault: vault.clone(),
            name: note_name(name),
            data: OnceCell::new(),
        }
    }

    /// Create an already loaded view.
    pub fn from_data(vault: &Vault, data: NoteData) -> Self {
        Self {
            vault: vault.clone(),
            name: note_name(&data.path.to_string_lossy()),
            data: OnceCell::from(data),
        }
    }

    /// Vault-relative name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Whether the note data has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.data.get().is_some()
    }

    /// All note data, fetched on first call.
    pub fn data(&self) -> Result<&NoteData> {
        if let Some(data) = self.data.get() {
            return Ok(data);
        }
        let data = self.vault.note_data(&self.name)?;
        Ok(self.data.get_or_init(|| data))
    }

    pub fn path(&self) -> Result<&Path> {
        Ok(&self.data()?.path)
    }

    pub fn content(&self) -> Result<&str> {
        Ok(&self.data()?.content)
    }

    pub fn body(&self) -> Result<&str> {
        Ok(&self.data()?.body)
    }

    pub fn front_matter(&self) -> Result<&str> {
        Ok(&self.data()?.front_matter)
    }

    pub fn properties(&self) -> Result<&Map<String, Value>> {
        Ok(&self.data()?.properties)
    }

    /// A single front matter property.
    pub fn property(&self, key: &str) -> Result<Option<&Value>> {
        Ok(self.properties()?.get(key))
    }

    /// Notes linking to this note.
    pub fn incoming(&self) -> Result<Notes> {
        self.linked(Source::incoming(&self.name))
    }

    /// Notes this note links to.
    pub fn outgoing(&self) -> Result<Notes> {
        self.linked(Source::outgoing(&self.name))
    }

    fn linked(&self, source: Source) -> Result<Notes> {
        DataviewQuery::list(&[source], None)?
            .execute(&self.vault)?
            .into_notes()
    }

    pub fn append(&self, content: &str, options: &InsertOptions) -> Result<Value> {
        self.vault.note_append(&self.name, content, options)
    }

    pub fn prepend(&self, content: &str, options: &InsertOptions) -> Result<Value> {
        self.vault.note_prepend(&self.name, content, options)
    }

    /// Open the note in Obsidian.
    pub fn open(&self) -> Result<Value> {
        self.vault.note_open(&self.name)
    }

    pub fn trash(&self) -> Result<Value> {
        self.vault.note_trash(&self.name)
    }
}

impl Keyed for Note {
    fn id(&self) -> &str {
        &self.name
    }

    fn matches(&self, query: &str) -> bool {
        note_name(query) == self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::rc::Rc;

    const NOTE_REPLY: &str = r#"{
        "result-filepath": "proj/Plan.md",
        "result-content": "---\ntags: [a]\n---\nBody text",
        "result-body": "Body text",
        "result-front-matter": "tags: [a]",
        "result-properties": "{\"tags\": [\"a\"], \"meta\": [{\"x\": 1}, {\"y\": 2}]}"
    }"#;

    fn setup() -> (Rc<MockTransport>, Vault) {
        let transport = Rc::new(MockTransport::new());
        let vault = Vault::with_transport("Main", transport.clone());
        (transport, vault)
    }

    #[test]
    fn test_note_name_strips_extension() {
        assert_eq!(note_name("folder/Note.md"), "folder/Note");
        assert_eq!(note_name(" Note "), "Note");
        assert_eq!(note_name("Note.markdown"), "Note.markdown");
    }

    #[test]
    fn test_collapse_single_key_list() {
        let props = json!({
            "meta": [{"x": 1}, {"y": 2}],
            "tags": ["a", "b"],
            "mixed": [{"x": 1}, {"y": 2, "z": 3}],
            "empty": []
        });
        let Value::Object(map) = props else { unreachable!() };
        let normalized = normalize_properties(map);

        assert_eq!(normalized["meta"], json!({"x": 1, "y": 2}));
        assert_eq!(normalized["tags"], json!(["a", "b"]));
        assert_eq!(normalized["mixed"], json!([{"x": 1}, {"y": 2, "z": 3}]));
        assert_eq!(normalized["empty"], json!([]));
    }

    #[test]
    fn test_from_reply_requires_filepath() {
        let result = NoteData::from_reply(json!({"content": "x"}));
        assert!(matches!(result, Err(VaultError::UnexpectedReply(_))));
        let result = NoteData::from_reply(json!("text"));
        assert!(matches!(result, Err(VaultError::UnexpectedReply(_))));
    }

    #[test]
    fn test_lazy_fetch_once() {
        let (transport, vault) = setup();
        transport.push_success(NOTE_REPLY);

        let note = Note::new(&vault, "proj/Plan.md");
        assert_eq!(note.name(), "proj/Plan");
        assert!(!note.is_loaded());
        assert!(transport.urls().is_empty());

        assert_eq!(note.body().unwrap(), "Body text");
        assert!(note.is_loaded());
        assert_eq!(note.path().unwrap(), Path::new("proj/Plan.md"));
        assert_eq!(note.front_matter().unwrap(), "tags: [a]");
        assert_eq!(note.property("meta").unwrap(), Some(&json!({"x": 1, "y": 2})));
        assert_eq!(note.property("tags").unwrap(), Some(&json!(["a"])));

        let urls = transport.urls();
        assert_eq!(urls.len(), 1);
        assert_eq!(
            urls[0],
            "obsidian://actions-uri/note/get?vault=Main&file=proj%2FPlan&silent=true"
        );
    }

    #[test]
    fn test_json_looking_content_kept_verbatim() {
        let (transport, vault) = setup();
        transport.push_success(
            r#"{
                "result-filepath": "data.md",
                "result-content": "[1, 2,\n 3]",
                "result-body": "{ \"a\": 1 }",
                "result-front-matter": "",
                "result-properties": {"list": "[1, 2]"}
            }"#,
        );

        let note = Note::new(&vault, "data");
        assert_eq!(note.content().unwrap(), "[1, 2,\n 3]");
        assert_eq!(note.body().unwrap(), "{ \"a\": 1 }");
        assert_eq!(note.property("list").unwrap(), Some(&json!([1, 2])));
    }

    #[test]
    fn test_failed_fetch_not_cached() {
        let (transport, vault) = setup();
        transport.push_failure(r#"{"errorCode":404,"errorMessage":"Note not found"}"#);
        transport.push_success(NOTE_REPLY);

        let note = Note::new(&vault, "proj/Plan");
        assert!(note.content().is_err());
        assert!(!note.is_loaded());
        assert!(note.content().unwrap().ends_with("Body text"));
    }

    #[test]
    fn test_from_data_is_loaded() {
        let (transport, vault) = setup();
        let data = NoteData {
            path: PathBuf::from("a/b.md"),
            content: "c".into(),
            body: "c".into(),
            front_matter: String::new(),
            properties: Map::new(),
        };
        let note = Note::from_data(&vault, data);
        assert_eq!(note.name(), "a/b");
        assert_eq!(note.content().unwrap(), "c");
        assert!(transport.urls().is_empty());
    }

    #[test]
    fn test_incoming_and_outgoing_queries() {
        let (transport, vault) = setup();
        transport.push_success(r#"{"result-data": "[\"[[src/A.md|A]]\"]"}"#);
        transport.push_success(r#"{"result-data": "[\"[[dst/B.md|B]]\", \"[[dst/C.md]]\"]"}"#);

        let note = Note::new(&vault, "Hub");
        let incoming = note.incoming().unwrap();
        let outgoing = note.outgoing().unwrap();

        assert_eq!(incoming.keys().collect::<Vec<_>>(), vec!["src/A"]);
        assert_eq!(outgoing.keys().collect::<Vec<_>>(), vec!["dst/B", "dst/C"]);

        let urls = transport.urls();
        assert!(urls[0].contains(&urlencoding::encode("FROM [[Hub]]").into_owned()));
        assert!(urls[1].contains(&urlencoding::encode("FROM outgoing([[Hub]])").into_owned()));
    }

    #[test]
    fn test_keyed_matches_extension() {
        let (_transport, vault) = setup();
        let note = Note::new(&vault, "a/b");
        assert!(note.matches("a/b.md"));
        assert!(!note.matches("b"));
    }
}
