//! Vault behaviour against an in-memory stand-in for the Actions URI plugin.

use obsidian_actions::{CreateOptions, InsertOptions, Params, Reply, Result, Transport, Vault, VaultError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Keeps notes in memory and answers note routes like the plugin does.
#[derive(Debug, Default)]
struct FakeObsidian {
    notes: RefCell<BTreeMap<String, String>>,
    calls: RefCell<Vec<(String, HashMap<String, String>)>>,
}

/// Split a URL into its decoded route and parameters.
fn parse_url(url: &str) -> (String, HashMap<String, String>) {
    let rest = url.strip_prefix("obsidian://").expect("obsidian scheme");
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    let route = path
        .split('/')
        .map(|s| urlencoding::decode(s).unwrap().into_owned())
        .collect::<Vec<_>>()
        .join("/");
    let params = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap();
            (
                urlencoding::decode(k).unwrap().into_owned(),
                urlencoding::decode(v).unwrap().into_owned(),
            )
        })
        .collect();
    (route, params)
}

fn note_reply(file: &str, content: &str) -> Reply {
    let body = json!({
        "result-filepath": format!("{}.md", file),
        "result-content": content,
        "result-body": content,
        "result-front-matter": "",
        "result-properties": "{}",
    });
    Reply::success(body.to_string())
}

fn not_found() -> Reply {
    Reply::failure(r#"{"errorCode":404,"errorMessage":"Note couldn't be found"}"#)
}

impl Transport for FakeObsidian {
    fn send(&self, url: &str) -> Result<Reply> {
        let (route, params) = parse_url(url);
        self.calls.borrow_mut().push((route.clone(), params.clone()));

        let file = params.get("file").cloned().unwrap_or_default();
        let mut notes = self.notes.borrow_mut();

        let reply = match route.as_str() {
            "actions-uri/note/create" => {
                let overwrite = params.get("if-exists").map(String::as_str) == Some("overwrite");
                if overwrite || !notes.contains_key(&file) {
                    let content = params.get("content").cloned().unwrap_or_default();
                    notes.insert(file.clone(), content);
                }
                note_reply(&file, &notes[&file])
            }
            "actions-uri/note/get" => match notes.get(&file) {
                Some(content) => note_reply(&file, content),
                None => not_found(),
            },
            "actions-uri/note/append" => match notes.get_mut(&file) {
                Some(content) => {
                    content.push_str(&params["content"]);
                    Reply::success(r#"{"result-message": "appended"}"#)
                }
                None => not_found(),
            },
            "actions-uri/note/list" => {
                let paths: Vec<String> = notes.keys().map(|k| format!("{}.md", k)).collect();
                let inner = serde_json::to_string(&paths).unwrap();
                Reply::success(json!({ "result-paths": inner }).to_string())
            }
            _ => Reply::failure(r#"{"errorCode":400,"errorMessage":"Unknown route"}"#),
        };
        Ok(reply)
    }
}

fn setup() -> (Rc<FakeObsidian>, Vault) {
    let fake = Rc::new(FakeObsidian::default());
    let vault = Vault::with_transport("Main", fake.clone());
    (fake, vault)
}

#[test]
fn create_without_overwrite_keeps_original() {
    let (_fake, vault) = setup();

    let first = vault.note_create("Inbox", &CreateOptions::content("x")).unwrap();
    assert_eq!(first.content().unwrap(), "x");

    let second = vault.note_create("Inbox", &CreateOptions::content("y")).unwrap();
    assert_eq!(second.content().unwrap(), "x");

    let third = vault
        .note_create("Inbox", &CreateOptions::content("y").overwrite(true))
        .unwrap();
    assert_eq!(third.content().unwrap(), "y");
}

#[test]
fn every_call_carries_the_vault() {
    let (fake, vault) = setup();
    vault.note_create("Inbox", &CreateOptions::default()).unwrap();

    let calls = fake.calls.borrow();
    assert_eq!(calls[0].0, "actions-uri/note/create");
    assert_eq!(calls[0].1["vault"], "Main");
    assert_eq!(calls[0].1["content"], "");
    assert!(!calls[0].1.contains_key("template"));
}

#[test]
fn special_characters_survive_the_url() {
    let (_fake, vault) = setup();
    let content = "a & b = c\n#tag ?x=1 [[Link|Alias]] 100%";

    vault.note_create("Dir/Special Note", &CreateOptions::content(content)).unwrap();

    let note = vault.note("Dir/Special Note.md");
    assert_eq!(note.content().unwrap(), content);
}

#[test]
fn lazy_note_fetches_on_first_access() {
    let (fake, vault) = setup();
    vault.note_create("Plan", &CreateOptions::content("v1")).unwrap();

    let note = vault.note("Plan");
    assert!(!note.is_loaded());
    assert_eq!(fake.calls.borrow().len(), 1);

    assert_eq!(note.body().unwrap(), "v1");
    vault
        .note_append("Plan", " v2", &InsertOptions::default())
        .unwrap();

    // Cached for the lifetime of the view.
    assert_eq!(note.content().unwrap(), "v1");
    assert_eq!(vault.note("Plan").content().unwrap(), "v1 v2");
}

#[test]
fn missing_note_is_a_remote_failure() {
    let (_fake, vault) = setup();

    let err = vault.note("Nope").content().unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, VaultError::RemoteActionFailed { code: Some(404), .. }));
}

#[test]
fn notes_collection_is_a_snapshot() {
    let (_fake, vault) = setup();
    vault.note_create("b", &CreateOptions::default()).unwrap();
    vault.note_create("a/c", &CreateOptions::default()).unwrap();

    let notes = vault.notes().unwrap();
    vault.note_create("z", &CreateOptions::default()).unwrap();

    assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["a/c", "b"]);
    assert!(notes.get("z").is_none());
    assert!(matches!(notes.require("z"), Err(VaultError::NotFound(_))));
}

#[test]
fn raw_call_unknown_route() {
    let (_fake, vault) = setup();
    let err = vault.call(&["nope"], Params::new()).unwrap_err();
    match err {
        VaultError::RemoteActionFailed { message, .. } => assert_eq!(message, "Unknown route"),
        other => panic!("unexpected {:?}", other),
    }
}
