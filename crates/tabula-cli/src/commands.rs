use std::io::{self, Read, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::Value;
use tabula_store::{DocumentStore, DocumentStoreExt, FsDocumentStore, StoreConfig};
use tracing::debug;

use crate::cli::*;
use crate::config::load_config;
use crate::seed::{employees, User, USERS};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.root.as_deref())?;
    let store = open_store(config)?;
    let mut out = io::stdout().lock();
    execute(&store, cli.command, &cli.format, &mut out)
}

fn open_store(config: StoreConfig) -> anyhow::Result<FsDocumentStore> {
    debug!(
        root = %config.root.display(),
        sync = ?config.sync,
        dir_mode = format_args!("{:o}", config.dir_mode),
        file_mode = format_args!("{:o}", config.file_mode),
        "resolved store config"
    );
    FsDocumentStore::with_config(config).context("opening store")
}

pub fn execute(
    store: &dyn DocumentStore,
    command: Command,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Command::Write(args) => cmd_write(store, args, out),
        Command::Read(args) => cmd_read(store, args, format, out),
        Command::ReadAll(args) => cmd_read_all(store, &args.collection, format, out),
        Command::Delete(args) => cmd_delete(store, args, out),
        Command::List(args) => cmd_list(store, args, format, out),
        Command::Seed => cmd_seed(store, format, out),
    }
}

fn cmd_write(
    store: &dyn DocumentStore,
    args: WriteArgs,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let text = match args.document {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading document from stdin")?;
            buf
        }
    };
    let document: Value = serde_json::from_str(&text).context("document is not valid JSON")?;

    store.write(&args.collection, &args.resource, &document)?;
    writeln!(
        out,
        "{} Wrote {}/{}",
        "✓".green().bold(),
        args.collection,
        args.resource.yellow()
    )?;
    Ok(())
}

fn cmd_read(
    store: &dyn DocumentStore,
    args: ReadArgs,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let bytes = store.read_raw(&args.collection, &args.resource)?;
            out.write_all(&bytes)?;
        }
        OutputFormat::Json => {
            let document: Value = store.read(&args.collection, &args.resource)?;
            writeln!(out, "{}", serde_json::to_string(&document)?)?;
        }
    }
    Ok(())
}

fn cmd_read_all(
    store: &dyn DocumentStore,
    collection: &str,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let records = store.read_all(collection)?;
    match format {
        OutputFormat::Text => {
            writeln!(
                out,
                "{} record(s) in {}",
                records.len().to_string().bold(),
                collection.cyan()
            )?;
            for record in &records {
                write!(out, "{record}")?;
            }
        }
        OutputFormat::Json => {
            let documents = records
                .iter()
                .map(|r| serde_json::from_str::<Value>(r))
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("collection {collection} holds invalid JSON"))?;
            writeln!(out, "{}", serde_json::to_string(&documents)?)?;
        }
    }
    Ok(())
}

fn cmd_delete(
    store: &dyn DocumentStore,
    args: DeleteArgs,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match (&args.resource, args.all) {
        (Some(resource), _) => {
            store.delete(&args.collection, resource)?;
            writeln!(
                out,
                "{} Deleted {}/{}",
                "✓".green().bold(),
                args.collection,
                resource.yellow()
            )?;
        }
        (None, true) => {
            store.delete_collection(&args.collection)?;
            writeln!(
                out,
                "{} Deleted collection {}",
                "✓".green().bold(),
                args.collection.cyan()
            )?;
        }
        (None, false) => bail!("specify a resource to delete, or --all for the whole collection"),
    }
    Ok(())
}

fn cmd_list(
    store: &dyn DocumentStore,
    args: ListArgs,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let names = match &args.collection {
        Some(collection) => store.list_resources(collection)?,
        None => store.list_collections()?,
    };
    match format {
        OutputFormat::Text => {
            if names.is_empty() {
                writeln!(out, "(empty)")?;
            }
            for name in &names {
                writeln!(out, "{name}")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&names)?)?,
    }
    Ok(())
}

fn cmd_seed(
    store: &dyn DocumentStore,
    format: &OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for employee in employees() {
        store
            .write(USERS, &employee.name, &employee)
            .with_context(|| format!("writing {}", employee.name))?;
    }

    let mut users: Vec<User> = store.read_all_as(USERS)?;
    users.sort_by(|a, b| a.name.cmp(&b.name));

    match format {
        OutputFormat::Text => {
            for u in &users {
                writeln!(
                    out,
                    "  {} ({}) {} in {}",
                    u.name.yellow().bold(),
                    u.age,
                    u.company,
                    u.address.city.cyan(),
                )?;
            }
            writeln!(out, "{} Seeded {} users", "✓".green().bold(), users.len())?;
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&users)?)?,
    }
    Ok(())
}
