//! x-callback-url construction.

use crate::error::{Result, VaultError};
use std::fmt;

/// A single keyword argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Bool(bool),
    Int(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => f.write_str(s),
            ParamValue::Bool(true) => f.write_str("true"),
            ParamValue::Bool(false) => f.write_str("false"),
            ParamValue::Int(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

/// Ordered keyword arguments for an action call.
///
/// Absent values are remembered but never rendered into the URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, Option<ParamValue>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a keyword argument, replacing an earlier value for the same key.
    pub fn set(self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.set_opt(key, Some(value))
    }

    /// Set a keyword argument that may be absent.
    pub fn set_opt<V: Into<ParamValue>>(mut self, key: &str, value: Option<V>) -> Self {
        let value = value.map(Into::into);
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    /// Keyword arguments that will actually be rendered.
    pub fn present(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k.as_str(), v)))
    }

    /// Whether any argument would be rendered.
    pub fn has_present(&self) -> bool {
        self.present().next().is_some()
    }

    /// Append the arguments of `rest` after those already set.
    pub fn chain(mut self, rest: Params) -> Self {
        for (key, value) in rest.entries {
            self = self.set_opt(&key, value);
        }
        self
    }
}

/// Build the URL used to call `app` with the given actions and arguments.
///
/// The result looks like `app://action/action?key=value&key=value`.
pub fn build_url(app: &str, actions: &[&str], params: &Params) -> Result<String> {
    let scheme = app.strip_suffix(".app").unwrap_or(app);

    if actions.is_empty() && params.has_present() {
        return Err(VaultError::InvalidArguments(
            "cannot construct a URL with keywords but no actions".to_string(),
        ));
    }

    let path = actions
        .iter()
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");

    let query = params
        .present()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(&key.replace('_', "-")),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        Ok(format!("{}://{}", scheme, path))
    } else {
        Ok(format!("{}://{}?{}", scheme, path, query))
    }
}

/// Resolve a call target into a URL.
///
/// A target that already contains a scheme separator is used verbatim.
pub fn resolve_url(target: &str, actions: &[&str], params: &Params) -> Result<String> {
    if target.contains("://") {
        if !actions.is_empty() || params.has_present() {
            return Err(VaultError::InvalidArguments(format!(
                "cannot set actions or keywords when supplying the full URL {}",
                target
            )));
        }
        return Ok(target.to_string());
    }
    build_url(target, actions, params)
}
