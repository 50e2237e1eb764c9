//! Dataview query command.

use crate::cli::args::QueryArgs;
use crate::cli::note::print_notes;
use crate::cli::output::Output;
use crate::dataview::{Combinator, DataviewQuery, QueryKind, QueryResult, Source};
use crate::error::Result;
use crate::vault::Vault;

/// Build the query described by the command line flags.
pub fn build_query(args: &QueryArgs) -> Result<DataviewQuery> {
    let sources: Vec<Source> = args
        .tag
        .iter()
        .map(|t| Source::tag(t))
        .chain(args.folder.iter().map(|f| Source::folder(f)))
        .chain(args.incoming.iter().map(|n| Source::incoming(n)))
        .chain(args.outgoing.iter().map(|n| Source::outgoing(n)))
        .collect();

    let combinator = match (args.and, args.or) {
        (true, _) => Some(Combinator::And),
        (_, true) => Some(Combinator::Or),
        _ => None,
    };

    let kind = if args.fields.is_empty() { QueryKind::List } else { QueryKind::Table };
    let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();

    let mut query = DataviewQuery::new(kind, &fields, &sources, combinator)?;
    for condition in &args.conditions {
        query = query.filter(condition);
    }
    for field in &args.flatten {
        query = query.flatten(field);
    }
    for field in &args.group_by {
        query = query.group_by(field);
    }
    for field in &args.sort {
        query = query.sort(field);
    }
    for field in &args.sort_desc {
        query = query.sort_desc(field);
    }
    if let Some(limit) = args.limit {
        query = query.limit(limit);
    }
    Ok(query)
}

/// Print the query text without contacting Obsidian.
pub fn dry_run(args: &QueryArgs, output: &Output) -> Result<()> {
    output.print_raw(&build_query(args)?.render());
    Ok(())
}

pub fn run(vault: &Vault, args: &QueryArgs, output: &Output) -> Result<()> {
    match build_query(args)?.execute(vault)? {
        QueryResult::Notes(notes) => print_notes(&notes, output),
        QueryResult::Table(table) => output.print(&table),
    }
}
