//! Turning Dataview link output into note names.

use crate::note::note_name;
use regex::Regex;
use std::sync::LazyLock;

// [[target]], [[target|alias]], [[target#heading|alias]], optionally embedded (!)
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^!?\[\[([^\]\|#]+)(?:#[^\]\|]*)?(?:\|[^\]]*)?\]\]$").unwrap()
});

/// Extract the bare note name from a rendered link.
///
/// Anything that isn't link syntax is treated as a path.
pub fn link_target(text: &str) -> String {
    let text = text.trim();
    match WIKILINK.captures(text).and_then(|cap| cap.get(1)) {
        Some(target) => note_name(target.as_str()),
        None => note_name(text),
    }
}

/// Render a wikilink to a note.
pub fn wikilink(name: &str) -> String {
    format!("[[{}]]", name)
}
