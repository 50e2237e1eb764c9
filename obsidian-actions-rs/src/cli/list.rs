//! Listing commands: notes, tags, commands, files, folders and search.

use crate::cli::args::{ExecArgs, SearchArgs};
use crate::cli::note::print_notes;
use crate::cli::output::Output;
use crate::error::Result;
use crate::vault::Vault;
use serde::Serialize;

/// A tag with its identifier-safe key.
#[derive(Debug, Serialize)]
pub struct TagOutput<'a> {
    pub tag: String,
    pub key: &'a str,
}

/// A command palette entry.
#[derive(Debug, Serialize)]
pub struct CommandOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TagsOutput<'a> {
    pub tags: Vec<TagOutput<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CommandsOutput<'a> {
    pub commands: Vec<CommandOutput<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PathsOutput {
    pub paths: Vec<String>,
    pub total: usize,
}

impl PathsOutput {
    fn new(paths: Vec<String>) -> Self {
        Self {
            total: paths.len(),
            paths,
        }
    }
}

pub fn notes(vault: &Vault, output: &Output) -> Result<()> {
    print_notes(&vault.notes()?, output)
}

pub fn tags(vault: &Vault, output: &Output) -> Result<()> {
    let tags = vault.tags()?;
    let result = TagsOutput {
        tags: tags
            .iter()
            .map(|tag| TagOutput {
                tag: tag.hashtag(),
                key: tag.key(),
            })
            .collect(),
    };
    output.print(&result)
}

pub fn commands(vault: &Vault, output: &Output) -> Result<()> {
    let commands = vault.commands()?;
    let result = CommandsOutput {
        commands: commands
            .iter()
            .map(|command| CommandOutput {
                id: command.id(),
                name: command.name(),
            })
            .collect(),
    };
    output.print(&result)
}

pub fn exec(vault: &Vault, args: &ExecArgs, output: &Output) -> Result<()> {
    let ids: Vec<&str> = args.ids.iter().map(String::as_str).collect();
    let reply = vault.execute_command(&ids, args.pause)?;
    output.print(&reply)
}

pub fn files(vault: &Vault, output: &Output) -> Result<()> {
    output.print(&PathsOutput::new(vault.file_list()?))
}

pub fn folders(vault: &Vault, output: &Output) -> Result<()> {
    output.print(&PathsOutput::new(vault.folder_list()?))
}

pub fn search(vault: &Vault, args: &SearchArgs, output: &Output) -> Result<()> {
    if args.open {
        let reply = vault.search_open(&args.query)?;
        output.info("Search opened in Obsidian");
        return output.print(&reply);
    }
    print_notes(&vault.search(&args.query)?, output)
}
