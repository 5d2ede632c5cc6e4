use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::stats::Report;

/// Writes the report as pretty-printed JSON, replacing whatever is at `path`.
pub fn write_report(report: &Report, path: &Path) -> Result<()> {
    let start_time = Instant::now();
    info!(action = "start", component = "report_sink", path = ?path, "Writing report");

    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to serialize report to {:?}", path))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {:?}", path))?;

    info!(
        action = "complete",
        component = "report_sink",
        path = ?path,
        duration_ms = start_time.elapsed().as_millis(),
        "Report written"
    );
    Ok(())
}

pub fn read_report(path: &Path) -> Result<Report> {
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse report at {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{KeywordTally, MetricTally, PostTally, TallyMap};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;

    fn sample() -> Report {
        let blog = match json!({"id": "1", "name": "Café Brasil", "url": "https://cafe.example", "owner": "ana"}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Report {
            blogs: vec![blog],
            posts_stats: TallyMap::from([(
                "1".into(),
                PostTally { total: 2, published: 1, draft: 1 },
            )]),
            keywords_stats: TallyMap::from([("1".into(), KeywordTally { total: 1, active: 0 })]),
            analytics_stats: TallyMap::from([(
                "1".into(),
                MetricTally::from([("pageview".into(), 2)]),
            )]),
            extracted_at: "2025-06-22T10:15:30.123456".into(),
        }
    }

    #[test]
    fn written_report_reads_back_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db-info.json");
        let report = sample();

        write_report(&report, &path).unwrap();
        assert_eq!(read_report(&path).unwrap(), report);
    }

    #[test]
    fn output_is_indented_and_keeps_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db-info.json");
        write_report(&sample(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"blogs\": [\n    {\n      \"id\": \"1\""));
        assert!(text.contains("Café Brasil"));
        assert!(!text.contains("\\u00e9"));
        assert!(text.contains("\"posts_stats\": {\n    \"1\": {\n      \"total\": 2,"));
        assert!(text.contains("\"extracted_at\": \"2025-06-22T10:15:30.123456\""));
    }

    #[test]
    fn unknown_blog_fields_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db-info.json");
        write_report(&sample(), &path).unwrap();

        let back = read_report(&path).unwrap();
        assert_eq!(back.blogs[0].get("owner"), Some(&json!("ana")));
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db-info.json");
        fs::write(&path, "stale content that is much longer than nothing at all").unwrap();

        let mut report = sample();
        report.blogs.clear();
        write_report(&report, &path).unwrap();
        assert_eq!(read_report(&path).unwrap(), report);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("db-info.json");
        assert!(write_report(&sample(), &path).is_err());
    }
}
