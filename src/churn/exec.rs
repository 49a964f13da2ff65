use super::aggregate::{sort_reports, tally_authors};
use super::output::{output_chart, output_json, output_ndjson, output_table};
use crate::cli::{CommonArgs, TallyArgs};
use crate::git::GitRepo;
use crate::model::{AuthorEntry, TallyOutput, SCHEMA_VERSION};
use crate::source::HistorySource;
use crate::util::authors_matching;
use anyhow::Context;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

pub fn exec(common: CommonArgs, args: TallyArgs) -> anyhow::Result<()> {
    let machine = args.json || args.ndjson;
    let repo = GitRepo::open(common.repo.as_ref())
        .context("Failed to open git repository")?
        .with_progress(!machine);

    let range = repo
        .resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let authors = repo.authors().context("Failed to list authors")?;
    let selected: Vec<_> = authors_matching(&authors, args.author.as_deref()).collect();

    let pb = if machine {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(selected.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    };

    let mut reports = tally_authors(
        &repo,
        selected,
        &range,
        args.path.as_deref(),
        |report| {
            pb.set_message(report.author.name.clone());
            pb.inc(1);
        },
    )
    .context("Failed to replay commit history")?;
    pb.finish_and_clear();

    // authors outside the range have nothing to report
    reports.retain(|r| r.commit_count > 0);
    sort_reports(&mut reports);

    let entries: Vec<AuthorEntry> = reports
        .into_iter()
        .map(|r| r.into_entry(args.detail))
        .collect();

    if args.json {
        output_json(&TallyOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            repository_path: repo.path().to_string_lossy().to_string(),
            path_prefix: args.path.clone(),
            since: common.since.clone(),
            until: common.until.clone(),
            entries,
        })?;
    } else if args.ndjson {
        output_ndjson(&entries)?;
    } else {
        output_table(&entries)?;
        if args.chart {
            output_chart(&entries)?;
        }
    }

    Ok(())
}

pub fn list_authors(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref())
        .context("Failed to open git repository")?
        .with_progress(!json);
    let authors = repo.authors().context("Failed to list authors")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&authors)?);
    } else {
        for author in &authors {
            println!("{author}");
        }
    }
    Ok(())
}
