use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::aggregate::{keyword_stats, metric_stats, post_stats};
use crate::client::RecordSource;
use crate::console::Console;
use crate::error::{FetchError, FetchResult};
use crate::record::Record;
use crate::resource::Resource;
use crate::sink::write_report;
use crate::stats::Report;
use crate::Args;

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub limit: u32,
    pub parallel: bool,
    pub inspect_schema: bool,
    pub output: PathBuf,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            limit: 1000,
            parallel: false,
            inspect_schema: false,
            output: PathBuf::from("db-info.json"),
        }
    }
}

impl From<&Args> for ExtractOptions {
    fn from(args: &Args) -> Self {
        Self {
            limit: args.limit,
            parallel: args.parallel,
            inspect_schema: args.schema,
            output: args.output.clone(),
        }
    }
}

pub fn fetch_resource<S: RecordSource + ?Sized>(
    source: &S,
    resource: Resource,
    limit: u32,
) -> FetchResult<Vec<Record>> {
    source.fetch(resource.table(), resource.select(), resource.limit(limit))
}

/// All four tables at once, in `Resource::ALL` order.
fn fetch_parallel<S: RecordSource>(source: &S, limit: u32) -> Vec<FetchResult<Vec<Record>>> {
    let ((blogs, posts), (keywords, metrics)) = rayon::join(
        || {
            rayon::join(
                || fetch_resource(source, Resource::Blogs, limit),
                || fetch_resource(source, Resource::Posts, limit),
            )
        },
        || {
            rayon::join(
                || fetch_resource(source, Resource::Keywords, limit),
                || fetch_resource(source, Resource::Metrics, limit),
            )
        },
    );
    vec![blogs, posts, keywords, metrics]
}

/// Narrates a fetch outcome. Status failures leave the section empty, anything
/// else aborts the run.
fn settle<W: Write>(
    console: &mut Console<W>,
    resource: Resource,
    result: FetchResult<Vec<Record>>,
) -> Result<Vec<Record>> {
    match result {
        Ok(records) => {
            console.fetched(resource, records.len())?;
            Ok(records)
        }
        Err(FetchError::Status { status, body }) => {
            warn!(
                action = "recover",
                component = "report_builder",
                resource = %resource,
                status,
                "Fetch failed, section left empty"
            );
            console.fetch_failed(resource, status, &body)?;
            Ok(Vec::new())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to fetch {}", resource)),
    }
}

pub fn build_report<S: RecordSource, W: Write>(
    source: &S,
    options: &ExtractOptions,
    console: &mut Console<W>,
) -> Result<Report> {
    let start_time = Instant::now();
    info!(
        action = "start",
        component = "report_builder",
        limit = options.limit,
        parallel = options.parallel,
        "Starting database extraction"
    );
    console.banner()?;

    let mut prefetched: Vec<Option<FetchResult<Vec<Record>>>> = if options.parallel {
        fetch_parallel(source, options.limit)
            .into_iter()
            .map(Some)
            .collect()
    } else {
        Vec::new()
    };
    let mut fetch = |resource: Resource| {
        prefetched
            .get_mut(resource as usize)
            .and_then(Option::take)
            .unwrap_or_else(|| fetch_resource(source, resource, options.limit))
    };

    console.fetching(Resource::Blogs)?;
    let blogs = settle(console, Resource::Blogs, fetch(Resource::Blogs))?;
    console.blogs(&blogs)?;

    console.fetching(Resource::Posts)?;
    let posts_stats = post_stats(&settle(console, Resource::Posts, fetch(Resource::Posts))?);
    console.post_breakdown(&posts_stats, &blogs)?;

    console.fetching(Resource::Keywords)?;
    let keywords_stats =
        keyword_stats(&settle(console, Resource::Keywords, fetch(Resource::Keywords))?);
    console.keyword_breakdown(&keywords_stats, &blogs)?;

    console.fetching(Resource::Metrics)?;
    let analytics_stats =
        metric_stats(&settle(console, Resource::Metrics, fetch(Resource::Metrics))?);
    console.metric_breakdown(&analytics_stats, &blogs)?;

    if options.inspect_schema {
        inspect_schema(source, console)?;
    }

    let report = Report::new(blogs, posts_stats, keywords_stats, analytics_stats);
    info!(
        action = "complete",
        component = "report_builder",
        blogs = report.blogs.len(),
        post_groups = report.posts_stats.len(),
        keyword_groups = report.keywords_stats.len(),
        metric_groups = report.analytics_stats.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Report assembled"
    );
    Ok(report)
}

/// Prints the columns of one sample row per table. Rejected or empty tables are skipped.
pub fn inspect_schema<S: RecordSource + ?Sized, W: Write>(
    source: &S,
    console: &mut Console<W>,
) -> Result<()> {
    console.schema_header()?;
    for resource in Resource::ALL {
        match source.fetch(resource.table(), None, Some(1)) {
            Ok(rows) => {
                if let Some(row) = rows.first() {
                    let columns: Vec<&str> = row.keys().map(String::as_str).collect();
                    console.columns(resource.table(), &columns)?;
                }
            }
            Err(err) if err.is_recoverable() => {
                debug!(action = "skip", component = "schema_inspect", table = resource.table(), error = %err, "Table not inspected");
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to inspect {}", resource.table()));
            }
        }
    }
    Ok(())
}

/// Builds the report, writes it and prints the summary. Nothing is written
/// when the build fails.
pub fn run<S: RecordSource, W: Write>(
    source: &S,
    options: &ExtractOptions,
    console: &mut Console<W>,
) -> Result<Report> {
    let report = build_report(source, options, console)?;
    write_report(&report, &options.output)?;
    console.saved(&options.output)?;
    console.summary(&report.summary())?;
    Ok(report)
}
