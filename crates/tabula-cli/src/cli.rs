use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tabula",
    about = "Tabula: embedded JSON document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root directory (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a document (from the argument or stdin)
    Write(WriteArgs),
    /// Print one document
    Read(ReadArgs),
    /// Print every document in a collection
    ReadAll(ReadAllArgs),
    /// Delete a document or a nested directory
    Delete(DeleteArgs),
    /// List collections, or the resources of one collection
    List(ListArgs),
    /// Write the sample employee records into `users`
    Seed,
}

#[derive(Args)]
pub struct WriteArgs {
    pub collection: String,
    pub resource: String,
    /// JSON document; read from stdin when omitted
    pub document: Option<String>,
}

#[derive(Args)]
pub struct ReadArgs {
    pub collection: String,
    pub resource: String,
}

#[derive(Args)]
pub struct ReadAllArgs {
    pub collection: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub collection: String,
    pub resource: Option<String>,
    /// Delete the whole collection
    #[arg(long, conflicts_with = "resource")]
    pub all: bool,
}

#[derive(Args)]
pub struct ListArgs {
    pub collection: Option<String>,
}
