use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gchurn")]
#[command(about = "Per-author contribution vs. churn over a git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        alias = "after",
        global = true,
        help = "Only commits on or after this commit or date (RFC3339, YYYY-MM-DD, or natural language)"
    )]
    pub since: Option<String>,

    #[arg(
        long,
        alias = "before",
        global = true,
        help = "Only commits on or before this commit or date (RFC3339, YYYY-MM-DD, or natural language)"
    )]
    pub until: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct TallyArgs {
    #[arg(long, help = "Only tally authors whose name or email contains this text")]
    pub author: Option<String>,

    #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON")]
    pub ndjson: bool,

    #[arg(long, help = "Include per-file line ledgers in JSON output")]
    pub detail: bool,

    #[arg(long, help = "Draw a contribution/churn bar per author after the table")]
    pub chart: bool,

    #[arg(help = "Path prefix to analyze")]
    pub path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Contribution, churn and net per author
    Tally(TallyArgs),
    /// List author identities found in the history
    Authors {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Tally(args) => crate::churn::exec(self.common, args),
            Commands::Authors { json } => crate::churn::exec::list_authors(self.common, json),
        }
    }
}
