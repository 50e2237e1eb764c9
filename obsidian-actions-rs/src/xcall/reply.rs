//! Interpreting helper replies.

use crate::error::{Result, VaultError};
use crate::xcall::binary::{Reply, Transport};
use crate::xcall::url::{resolve_url, Params};
use serde_json::Value;
use tracing::debug;

/// Turn a raw reply into its success text, or the remote failure it reports.
///
/// Any output on stderr means the action failed.
pub fn interpret(reply: Reply) -> Result<String> {
    if !reply.stderr.is_empty() {
        let text = String::from_utf8_lossy(&reply.stderr);
        debug!(stderr = %text, "remote action failed");
        return Err(remote_failure(text.trim()));
    }
    Ok(String::from_utf8_lossy(&reply.stdout).into_owned())
}

/// Build the failure for an error reply, preferring its `errorMessage` field.
fn remote_failure(text: &str) -> VaultError {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        if let Some(message) = map.get("errorMessage").and_then(Value::as_str) {
            let code = map.get("errorCode").and_then(|code| match code {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            });
            return VaultError::RemoteActionFailed {
                message: message.to_string(),
                code,
            };
        }
    }
    VaultError::RemoteActionFailed {
        message: text.to_string(),
        code: None,
    }
}

/// Parse reply text, expanding anything that looks like JSON.
pub fn parse_reply(text: &str) -> Value {
    expand(Value::String(text.to_string()))
}

/// Parse JSON-looking text once; nested JSON-looking strings stay text.
pub fn parse_once(text: &str) -> Value {
    if looks_like_json(text) {
        if let Ok(parsed) = serde_json::from_str::<Value>(text.trim()) {
            return parsed;
        }
    }
    Value::String(text.to_string())
}

/// Recursively replace JSON-looking strings with their parsed value.
///
/// Strings that look like JSON but fail to parse are kept as they are.
pub fn expand(value: Value) -> Value {
    match value {
        Value::String(s) => {
            if looks_like_json(&s) {
                match serde_json::from_str::<Value>(s.trim()) {
                    Ok(parsed) => expand(parsed),
                    Err(_) => Value::String(s),
                }
            } else {
                Value::String(s)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(expand).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, expand(v))).collect()),
        other => other,
    }
}

fn looks_like_json(s: &str) -> bool {
    let trimmed = s.trim();
    (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'))
}

/// Call an application and return the success text unparsed.
///
/// `target` is either an application identifier combined with `actions` and
/// `params`, or a complete URL used as is.
pub fn xcall_raw(
    transport: &dyn Transport,
    target: &str,
    actions: &[&str],
    params: &Params,
) -> Result<String> {
    let url = resolve_url(target, actions, params)?;
    interpret(transport.send(&url)?)
}

/// Call an application and parse the success text.
pub fn xcall(
    transport: &dyn Transport,
    target: &str,
    actions: &[&str],
    params: &Params,
) -> Result<Value> {
    xcall_raw(transport, target, actions, params).map(|text| parse_reply(&text))
}
