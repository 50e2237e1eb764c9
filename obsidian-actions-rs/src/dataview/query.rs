//! Immutable builder for Dataview LIST and TABLE queries.

use crate::collection::Notes;
use crate::dataview::link::{link_target, wikilink};
use crate::error::{Result, VaultError};
use crate::note::Note;
use crate::vault::Vault;
use crate::xcall::parse_once;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Kind of query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    List,
    Table,
}

/// How several sources are combined in the FROM clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    fn keyword(self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// A page source for the FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Pages with a tag (stored without `#`).
    Tag(String),
    /// Pages inside a folder.
    Folder(String),
    /// Pages linking to a note.
    Incoming(String),
    /// Pages a note links to.
    Outgoing(String),
}

impl Source {
    pub fn tag(tag: &str) -> Self {
        Source::Tag(tag.strip_prefix('#').unwrap_or(tag).to_string())
    }

    pub fn folder(folder: &str) -> Self {
        Source::Folder(folder.trim_matches('/').to_string())
    }

    pub fn incoming(note: &str) -> Self {
        Source::Incoming(note.to_string())
    }

    pub fn outgoing(note: &str) -> Self {
        Source::Outgoing(note.to_string())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Tag(tag) => write!(f, "#{}", tag),
            Source::Folder(folder) => write!(f, "\"{}\"", folder),
            Source::Incoming(note) => f.write_str(&wikilink(note)),
            Source::Outgoing(note) => write!(f, "outgoing({})", wikilink(note)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SortTerm {
    field: String,
    descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Where(String),
    Flatten(String),
    GroupBy(String),
    Sort(Vec<SortTerm>),
    Limit(usize),
}

/// A Dataview query; every chained call returns a new query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataviewQuery {
    kind: QueryKind,
    fields: Vec<String>,
    from: String,
    clauses: Vec<Clause>,
}

impl DataviewQuery {
    /// Create a query.
    ///
    /// TABLE queries need output fields, LIST queries must not have any.
    /// Several sources need a combinator.
    pub fn new(
        kind: QueryKind,
        fields: &[&str],
        sources: &[Source],
        combinator: Option<Combinator>,
    ) -> Result<Self> {
        match (kind, fields.is_empty()) {
            (QueryKind::Table, true) => {
                return Err(VaultError::InvalidArguments(
                    "a TABLE query needs at least one field".to_string(),
                ));
            }
            (QueryKind::List, false) => {
                return Err(VaultError::InvalidArguments(
                    "a LIST query can't have fields".to_string(),
                ));
            }
            _ => {}
        }

        let from = match (sources, combinator) {
            ([], _) => {
                return Err(VaultError::InvalidArguments(
                    "a query needs at least one source".to_string(),
                ));
            }
            ([single], _) => single.to_string(),
            (_, None) => {
                return Err(VaultError::InvalidArguments(
                    "combine several sources with AND or OR".to_string(),
                ));
            }
            (many, Some(combinator)) => many
                .iter()
                .map(Source::to_string)
                .collect::<Vec<_>>()
                .join(combinator.keyword()),
        };

        Ok(Self {
            kind,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            from,
            clauses: Vec::new(),
        })
    }

    pub fn list(sources: &[Source], combinator: Option<Combinator>) -> Result<Self> {
        Self::new(QueryKind::List, &[], sources, combinator)
    }

    pub fn table(fields: &[&str], sources: &[Source], combinator: Option<Combinator>) -> Result<Self> {
        Self::new(QueryKind::Table, fields, sources, combinator)
    }

    fn with(&self, clause: Clause) -> Self {
        let mut next = self.clone();
        next.clauses.push(clause);
        next
    }

    /// Add a `WHERE` condition.
    pub fn filter(&self, condition: &str) -> Self {
        self.with(Clause::Where(condition.to_string()))
    }

    pub fn flatten(&self, field: &str) -> Self {
        self.with(Clause::Flatten(field.to_string()))
    }

    pub fn group_by(&self, field: &str) -> Self {
        self.with(Clause::GroupBy(field.to_string()))
    }

    /// Sort ascending by `field`, after any earlier sort terms.
    pub fn sort(&self, field: &str) -> Self {
        self.sort_by(field, false)
    }

    /// Sort descending by `field`, after any earlier sort terms.
    pub fn sort_desc(&self, field: &str) -> Self {
        self.sort_by(field, true)
    }

    fn sort_by(&self, field: &str, descending: bool) -> Self {
        let term = SortTerm {
            field: field.to_string(),
            descending,
        };
        let mut next = self.clone();
        let last_sort = next.clauses.iter_mut().rev().find_map(|clause| match clause {
            Clause::Sort(terms) => Some(terms),
            _ => None,
        });
        match last_sort {
            Some(terms) => terms.push(term),
            None => next.clauses.push(Clause::Sort(vec![term])),
        }
        next
    }

    /// Limit the number of results; the last limit wins.
    pub fn limit(&self, count: usize) -> Self {
        self.with(Clause::Limit(count))
    }

    /// Render the query text.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        match self.kind {
            QueryKind::List => lines.push("LIST".to_string()),
            QueryKind::Table => lines.push(format!("TABLE {}", self.fields.join(", "))),
        }
        lines.push(format!("FROM {}", self.from));

        for clause in &self.clauses {
            if let Clause::Where(condition) = clause {
                lines.push(format!("WHERE {}", condition));
            }
        }
        for clause in &self.clauses {
            if let Clause::Flatten(field) = clause {
                lines.push(format!("FLATTEN {}", field));
            }
        }
        for clause in &self.clauses {
            if let Clause::GroupBy(field) = clause {
                lines.push(format!("GROUP BY {}", field));
            }
        }

        let terms: Vec<String> = self
            .clauses
            .iter()
            .filter_map(|clause| match clause {
                Clause::Sort(terms) => Some(terms),
                _ => None,
            })
            .flatten()
            .map(|term| {
                format!(
                    "{} {}",
                    term.field,
                    if term.descending { "DESC" } else { "ASC" }
                )
            })
            .collect();
        if !terms.is_empty() {
            lines.push(format!("SORT {}", terms.join(", ")));
        }

        let limit = self.clauses.iter().rev().find_map(|clause| match clause {
            Clause::Limit(count) => Some(*count),
            _ => None,
        });
        if let Some(count) = limit {
            lines.push(format!("LIMIT {}", count));
        }

        lines.join("\n")
    }

    /// Run the query in `vault`.
    pub fn execute(&self, vault: &Vault) -> Result<QueryResult> {
        let dql = self.render();
        match self.kind {
            QueryKind::List => {
                let reply = vault.dataview_list_links(&dql)?;
                Ok(QueryResult::Notes(notes_from_links(vault, reply)?))
            }
            QueryKind::Table => Ok(QueryResult::Table(vault.dataview_table_query(&dql)?)),
        }
    }
}

impl fmt::Display for DataviewQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Turn a LIST reply into notes.
///
/// The list arrives JSON-encoded; it is decoded one level so links such as
/// `[[2024]]` stay text.
fn notes_from_links(vault: &Vault, reply: Value) -> Result<Notes> {
    let reply = match reply {
        Value::String(s) => parse_once(&s),
        other => other,
    };
    let items = match reply {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        other => {
            return Err(VaultError::UnexpectedReply(format!(
                "expected a list of links, got {}",
                other
            )));
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(link) => Some(Note::new(vault, &link_target(&link))),
            Value::Null => {
                warn!("skipping empty list entry");
                None
            }
            other => Some(Note::new(vault, &link_target(&other.to_string()))),
        })
        .collect())
}

/// Result of running a query.
#[derive(Debug, Clone)]
pub enum QueryResult {
    /// LIST results.
    Notes(Notes),
    /// TABLE results, as returned by the plugin.
    Table(Value),
}

impl QueryResult {
    pub fn into_notes(self) -> Result<Notes> {
        match self {
            QueryResult::Notes(notes) => Ok(notes),
            QueryResult::Table(_) => Err(VaultError::UnexpectedReply(
                "a TABLE query doesn't produce notes".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::rc::Rc;

    fn tags(names: &[&str]) -> Vec<Source> {
        names.iter().map(|n| Source::tag(n)).collect()
    }

    #[test]
    fn test_or_sources() {
        let query = DataviewQuery::list(&tags(&["a", "#b"]), Some(Combinator::Or)).unwrap();
        assert_eq!(query.render(), "LIST\nFROM #a OR #b");
    }

    #[test]
    fn test_single_source_ignores_combinator() {
        let query = DataviewQuery::list(&tags(&["a"]), None).unwrap();
        assert_eq!(query.to_string(), "LIST\nFROM #a");
        let query = DataviewQuery::list(&tags(&["a"]), Some(Combinator::And)).unwrap();
        assert_eq!(query.to_string(), "LIST\nFROM #a");
    }

    #[test]
    fn test_source_rendering() {
        let sources = vec![
            Source::folder("/projects/"),
            Source::incoming("Hub"),
            Source::outgoing("Hub"),
        ];
        let query = DataviewQuery::list(&sources, Some(Combinator::And)).unwrap();
        assert_eq!(
            query.render(),
            "LIST\nFROM \"projects\" AND [[Hub]] AND outgoing([[Hub]])"
        );
    }

    #[test]
    fn test_missing_combinator() {
        let result = DataviewQuery::list(&tags(&["a", "b"]), None);
        assert!(matches!(result, Err(VaultError::InvalidArguments(_))));
    }

    #[test]
    fn test_no_sources() {
        let result = DataviewQuery::list(&[], Some(Combinator::Or));
        assert!(matches!(result, Err(VaultError::InvalidArguments(_))));
    }

    #[test]
    fn test_table_requires_fields() {
        let result = DataviewQuery::table(&[], &tags(&["a"]), None);
        assert!(matches!(result, Err(VaultError::InvalidArguments(_))));
    }

    #[test]
    fn test_list_rejects_fields() {
        let result = DataviewQuery::new(QueryKind::List, &["due"], &tags(&["a"]), None);
        assert!(matches!(result, Err(VaultError::InvalidArguments(_))));
    }

    #[test]
    fn test_sort_merges() {
        let query = DataviewQuery::list(&tags(&["a"]), None)
            .unwrap()
            .sort("file.name")
            .sort_desc("due");
        assert_eq!(query.render(), "LIST\nFROM #a\nSORT file.name ASC, due DESC");
    }

    #[test]
    fn test_clause_order_fixed() {
        let query = DataviewQuery::table(&["due", "status"], &tags(&["task"]), None)
            .unwrap()
            .limit(5)
            .sort("due")
            .group_by("status")
            .filter("due")
            .flatten("file.tasks")
            .filter("!completed")
            .sort("file.name")
            .limit(10);
        assert_eq!(
            query.render(),
            "TABLE due, status\n\
             FROM #task\n\
             WHERE due\n\
             WHERE !completed\n\
             FLATTEN file.tasks\n\
             GROUP BY status\n\
             SORT due ASC, file.name ASC\n\
             LIMIT 10"
        );
    }

    #[test]
    fn test_builder_is_immutable() {
        let base = DataviewQuery::list(&tags(&["a"]), None).unwrap();
        let filtered = base.filter("x > 1");
        assert_eq!(base.render(), "LIST\nFROM #a");
        assert_ne!(base, filtered);
    }

    #[test]
    fn test_execute_list() {
        let transport = Rc::new(MockTransport::new());
        let vault = Vault::with_transport("Main", transport.clone());
        transport.push_success(r#"{"result-data": "[\"[[a/One.md|One]]\", \"[[Two]]\", 3]"}"#);

        let query = DataviewQuery::list(&tags(&["a"]), None).unwrap().limit(2);
        let notes = query.execute(&vault).unwrap().into_notes().unwrap();

        assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["a/One", "Two", "3"]);
        assert_eq!(
            transport.urls(),
            vec!["obsidian://actions-uri/dataview/list-query?vault=Main&dql=LIST%0AFROM%20%23a%0ALIMIT%202"]
        );
    }

    #[test]
    fn test_execute_list_keeps_json_like_links() {
        let transport = Rc::new(MockTransport::new());
        let vault = Vault::with_transport("Main", transport.clone());
        transport.push_success(
            r#"{"result-data": "[\"[[2024]]\", \"[[true]]\", \"[[Plan]]\"]"}"#,
        );

        let notes = DataviewQuery::list(&tags(&["year"]), None)
            .unwrap()
            .execute(&vault)
            .unwrap()
            .into_notes()
            .unwrap();

        assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["2024", "true", "Plan"]);
    }

    #[test]
    fn test_execute_table() {
        let transport = Rc::new(MockTransport::new());
        let vault = Vault::with_transport("Main", transport.clone());
        transport.push_success(r#"{"result-data": "[[\"[[One]]\", \"2024-01-01\"]]"}"#);

        let query = DataviewQuery::table(&["due"], &tags(&["a"]), None).unwrap();
        let result = query.execute(&vault).unwrap();

        match result {
            QueryResult::Table(value) => assert_eq!(value, json!([["[[One]]", "2024-01-01"]])),
            other => panic!("expected table, got {:?}", other),
        }
        assert!(transport.urls()[0].contains("dataview/table-query"));
    }

    #[test]
    fn test_table_result_has_no_notes() {
        assert!(QueryResult::Table(json!([])).into_notes().is_err());
    }
}
