//! The x-callback-url layer: URL building, the `xcall` helper, and replies.

pub mod binary;
pub mod reply;
pub mod url;

pub use binary::{Reply, Transport, XCall};
pub use reply::{expand, interpret, parse_once, parse_reply, xcall, xcall_raw};
pub use url::{build_url, resolve_url, ParamValue, Params};
