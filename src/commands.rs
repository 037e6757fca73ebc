//! `linkmerge merge` and `linkmerge diff`.
//!
//! `merge` treats every `--sibling` file as one project's copy of the
//! `--base` file: the old solution holds the base text in every project, the
//! new solution holds each sibling's text, and a merge session reconciles
//! them.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use clap::Args;
use linkmerge::config::{CONFIG_FILE_NAME, Config};
use linkmerge::merge::{LinkedFileMergeSession, TracingObserver};
use linkmerge::model::solution::{Document, Project, Solution};
use linkmerge::model::types::{DocumentId, ProjectId};
use linkmerge_text::{SourceText, TextChange, TextDiffer as _, TextSpan};
use serde::Serialize;

/// Arguments of `linkmerge merge`.
#[derive(Args)]
pub struct MergeArgs {
    /// The common ancestor every sibling was edited from.
    #[arg(long, value_name = "FILE")]
    base: PathBuf,

    /// One project's edited copy, as `PROJECT=FILE`. Repeat for each
    /// sibling; siblings are folded in project name order.
    #[arg(long = "sibling", value_name = "PROJECT=FILE", value_parser = parse_sibling, required = true)]
    siblings: Vec<(String, PathBuf)>,

    /// Configuration file.
    #[arg(long, value_name = "FILE", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Print a JSON report instead of the merged text.
    #[arg(long)]
    json: bool,

    /// Write the output here instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// Arguments of `linkmerge diff`.
#[derive(Args)]
pub struct DiffArgs {
    /// The old version.
    old: PathBuf,

    /// The new version.
    new: PathBuf,

    /// Configuration file.
    #[arg(long, value_name = "FILE", default_value = CONFIG_FILE_NAME)]
    config: PathBuf,
}

fn parse_sibling(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((project, path)) if !project.is_empty() && !path.is_empty() => {
            Ok((project.to_owned(), PathBuf::from(path)))
        }
        _ => Err(format!("expected PROJECT=FILE, got `{s}`")),
    }
}

fn read_text(path: &Path) -> Result<SourceText> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    Ok(SourceText::new(text))
}

// ---------------------------------------------------------------------------
// merge
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct MergeReport<'a> {
    merged_text: &'a str,
    conflict_spans: &'a [TextSpan],
    unmerged: Vec<UnmergedReport<'a>>,
    stats: linkmerge::merge::SessionStats,
}

#[derive(Serialize)]
struct UnmergedReport<'a> {
    project: &'a str,
    changes: &'a [TextChange],
}

/// Run `linkmerge merge`. Returns `true` if conflict comments were inserted.
pub fn merge(args: &MergeArgs) -> Result<bool> {
    ensure!(
        args.siblings.len() >= 2,
        "need at least two --sibling files to merge"
    );
    let config = Config::load(&args.config)?;
    let base = read_text(&args.base)?;
    let shared_path = args.base.file_name().map_or_else(
        || args.base.clone(),
        PathBuf::from,
    );

    let mut old = Solution::new();
    let mut new = Solution::new();
    let mut ids = Vec::with_capacity(args.siblings.len());
    for (name, path) in &args.siblings {
        let project_id: ProjectId = name
            .parse()
            .with_context(|| format!("invalid project name `{name}`"))?;
        let document_id = DocumentId::new(&format!("{name}:{}", shared_path.display()))
            .with_context(|| format!("invalid document id for project `{name}`"))?;
        let sibling = read_text(path)?;

        for (solution, text) in [(&mut old, base.clone()), (&mut new, sibling)] {
            solution
                .add_project(Project::new(project_id.clone(), name.as_str()))
                .with_context(|| format!("project `{name}` given more than once"))?;
            solution.add_document(Document::new(
                document_id.clone(),
                project_id.clone(),
                &shared_path,
                text,
            ))?;
        }
        ids.push(document_id);
    }

    let differ = config.differ();
    let formatter = config.comment_formatter();
    let observer = TracingObserver;
    let result = LinkedFileMergeSession::new(&old, &new, &differ, &formatter)
        .with_observer(&observer)
        .merge_diffs(&old.changed_documents(&new))
        .context("merge failed")?;

    if let Some(failure) = result.failures.first() {
        bail!(
            "could not diff {}: {}",
            failure.document_id,
            failure.message
        );
    }

    let merged = ids
        .first()
        .and_then(|id| result.merged_solution.document(id))
        .map(|d| d.text.clone())
        .context("merged solution lost its documents")?;
    let group = result.merge_results.first();
    let spans = group.map_or(&[][..], |g| g.merge_conflict_resolution_spans.as_slice());

    let output = if args.json {
        let report = MergeReport {
            merged_text: merged.as_str(),
            conflict_spans: spans,
            unmerged: group
                .map(|g| {
                    g.unmerged_changes
                        .iter()
                        .map(|u| UnmergedReport {
                            project: &u.project_name,
                            changes: &u.changes,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            stats: result.stats,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        merged.as_str().to_owned()
    };
    write_output(args.output.as_deref(), &output)?;

    Ok(!spans.is_empty())
}

fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, contents)
            .with_context(|| format!("could not write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

/// Run `linkmerge diff`.
pub fn diff(args: &DiffArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let changes = config.differ().text_changes(&old, &new)?;
    println!("{}", serde_json::to_string_pretty(&changes)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_argument_splits_on_first_equals() {
        assert_eq!(
            parse_sibling("App=a=b.cs").unwrap(),
            ("App".to_owned(), PathBuf::from("a=b.cs"))
        );
        assert!(parse_sibling("App").is_err());
        assert!(parse_sibling("=a.cs").is_err());
        assert!(parse_sibling("App=").is_err());
    }
}
