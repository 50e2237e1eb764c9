//! Raw route calls.

use crate::cli::args::CallArgs;
use crate::cli::output::Output;
use crate::error::{Result, VaultError};
use crate::vault::Vault;
use crate::xcall::Params;

pub fn run(vault: &Vault, args: &CallArgs, output: &Output) -> Result<()> {
    let params = parse_params(&args.params)?;
    let actions: Vec<&str> = args.actions.iter().map(String::as_str).collect();
    let reply = vault.call(&actions, params)?;
    output.print(&reply)
}

/// Parse `key=value` pairs.
pub fn parse_params(pairs: &[String]) -> Result<Params> {
    pairs.iter().try_fold(Params::new(), |params, pair| {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            VaultError::InvalidArguments(format!("expected key=value, got '{}'", pair))
        })?;
        if key.is_empty() {
            return Err(VaultError::InvalidArguments(format!("empty key in '{}'", pair)));
        }
        Ok(params.set(key, value))
    })
}
