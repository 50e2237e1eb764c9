//! Note commands.

use crate::cli::args::{NoteCommands, NoteCreateArgs, NoteInsertArgs, NoteReplaceArgs};
use crate::cli::output::{NotesResponse, Output};
use crate::collection::Notes;
use crate::error::Result;
use crate::types::{CreateOptions, InsertOptions, ReplaceMode};
use crate::vault::Vault;

pub fn run(vault: &Vault, command: &NoteCommands, output: &Output) -> Result<()> {
    match command {
        NoteCommands::Get(args) => {
            let note = vault.note_get(&args.name, !args.first_named, args.silent)?;
            output.print(note.data()?)
        }
        NoteCommands::Create(args) => create(vault, args, output),
        NoteCommands::Append(args) => insert(vault, args, false, output),
        NoteCommands::Prepend(args) => insert(vault, args, true, output),
        NoteCommands::Replace(args) => replace(vault, args, output),
        NoteCommands::Delete(args) => output.print(&vault.note_delete(&args.name)?),
        NoteCommands::Trash(args) => output.print(&vault.note_trash(&args.name)?),
        NoteCommands::Open(args) => output.print(&vault.note_open(&args.name)?),
        NoteCommands::Incoming(args) => print_notes(&vault.note(&args.name).incoming()?, output),
        NoteCommands::Outgoing(args) => print_notes(&vault.note(&args.name).outgoing()?, output),
    }
}

fn create(vault: &Vault, args: &NoteCreateArgs, output: &Output) -> Result<()> {
    let options = CreateOptions {
        // Unescape newlines
        content: args.content.as_ref().map(|c| c.replace("\\n", "\n")),
        template: args.template.clone(),
        overwrite: args.overwrite,
        silent: args.silent,
    };
    let note = vault.note_create(&args.name, &options)?;
    output.print(note.data()?)
}

fn insert(vault: &Vault, args: &NoteInsertArgs, prepend: bool, output: &Output) -> Result<()> {
    let options = InsertOptions {
        below_headline: args.below_headline.clone(),
        create_if_not_found: args.create,
        ensure_newline: args.ensure_newline,
        silent: args.silent,
    };
    let content = args.content.replace("\\n", "\n");
    let reply = if prepend {
        vault.note_prepend(&args.name, &content, &options)?
    } else {
        vault.note_append(&args.name, &content, &options)?
    };
    output.print(&reply)
}

fn replace(vault: &Vault, args: &NoteReplaceArgs, output: &Output) -> Result<()> {
    let mode = if args.regex { ReplaceMode::Regex } else { ReplaceMode::Literal };
    let reply = vault.note_search_replace(&args.name, &args.search, &args.replace, mode)?;
    output.print(&reply)
}

pub fn print_notes(notes: &Notes, output: &Output) -> Result<()> {
    let names: Vec<&str> = notes.keys().collect();
    output.print(&NotesResponse {
        total: names.len(),
        notes: names,
    })
}
