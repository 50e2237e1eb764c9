//! Info and periodic note commands.

use crate::cli::args::PeriodicArgs;
use crate::cli::output::Output;
use crate::error::Result;
use crate::vault::Vault;

pub fn info(vault: &Vault, output: &Output) -> Result<()> {
    output.print(vault.info()?)
}

pub fn periodic(vault: &Vault, args: &PeriodicArgs, output: &Output) -> Result<()> {
    let note = vault.periodic_note(args.period)?;
    output.print(note.data()?)
}
