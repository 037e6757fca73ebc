use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

/// Merge independently edited copies of a linked file
///
/// A linked file is one physical file included into several projects. Each
/// project may edit its copy; linkmerge folds the edits together against
/// their common base. Edits that overlap but disagree keep the first
/// project's version and get a conflict comment showing the other.
///
/// EXAMPLES:
///
///   linkmerge merge --base a.cs --sibling net48=a.net48.cs --sibling net8=a.net8.cs
///   linkmerge merge --base a.cs --sibling x=x.cs --sibling y=y.cs --json
///   linkmerge diff a.cs a.net8.cs
///
/// Exit status is 1 when conflict comments were inserted.
///
/// Set LINKMERGE_LOG=debug (or any tracing filter directive) for logs on
/// stderr, or LINKMERGE_LOG=stderr for JSON logs.
#[derive(Parser)]
#[command(name = "linkmerge")]
#[command(version, about)]
#[command(propagate_version = true)]
#[command(verbatim_doc_comment)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge sibling copies of a file against their common base
    Merge(commands::MergeArgs),

    /// Print the line changes between two files as JSON
    Diff(commands::DiffArgs),
}

fn main() -> Result<ExitCode> {
    let _telemetry = linkmerge::telemetry::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge(ref args) => {
            let conflicts = commands::merge(args)?;
            Ok(if conflicts {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Diff(ref args) => {
            commands::diff(args)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
