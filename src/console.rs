use std::io::{self, Write};
use std::path::Path;

use crate::record::{display_field, key_text, str_field, Record};
use crate::resource::Resource;
use crate::stats::{KeywordTally, MetricTally, PostTally, Summary, TallyMap};
use crate::utils::format_number;

/// Human-readable narration of an extraction run.
pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out, "Extracting database information...\n")
    }

    pub fn fetching(&mut self, resource: Resource) -> io::Result<()> {
        writeln!(self.out, "Fetching {}...", resource)
    }

    pub fn fetched(&mut self, resource: Resource, count: usize) -> io::Result<()> {
        match resource {
            Resource::Blogs => writeln!(self.out, "Found {} blogs:", count),
            _ => writeln!(self.out, "Found {} {} in total", count, resource),
        }
    }

    pub fn fetch_failed(&mut self, resource: Resource, status: u16, body: &str) -> io::Result<()> {
        writeln!(self.out, "Error fetching {}: {}", resource, status)?;
        writeln!(self.out, "Response: {}", body)
    }

    pub fn blogs(&mut self, blogs: &[Record]) -> io::Result<()> {
        for blog in blogs {
            writeln!(
                self.out,
                "  - {} (ID: {})",
                display_field(blog, "name"),
                display_field(blog, "id")
            )?;
            writeln!(self.out, "    URL: {}", display_field(blog, "url"))?;
            writeln!(self.out, "    Domain: {}", display_field(blog, "domain"))?;
            writeln!(self.out, "    Status: {}", display_field(blog, "status"))?;
            writeln!(self.out)?;
        }
        Ok(())
    }

    pub fn post_breakdown(
        &mut self,
        stats: &TallyMap<PostTally>,
        blogs: &[Record],
    ) -> io::Result<()> {
        for (blog_id, tally) in stats {
            writeln!(
                self.out,
                "  {}: {} total, {} published, {} drafts",
                blog_name(blogs, blog_id),
                tally.total,
                tally.published,
                tally.draft
            )?;
        }
        Ok(())
    }

    pub fn keyword_breakdown(
        &mut self,
        stats: &TallyMap<KeywordTally>,
        blogs: &[Record],
    ) -> io::Result<()> {
        for (blog_id, tally) in stats {
            writeln!(
                self.out,
                "  {}: {} total, {} active",
                blog_name(blogs, blog_id),
                tally.total,
                tally.active
            )?;
        }
        Ok(())
    }

    pub fn metric_breakdown(
        &mut self,
        stats: &TallyMap<MetricTally>,
        blogs: &[Record],
    ) -> io::Result<()> {
        for (blog_id, metrics) in stats {
            writeln!(self.out, "  {}:", blog_name(blogs, blog_id))?;
            for (metric_type, count) in metrics {
                writeln!(self.out, "    - {}: {} records", metric_type, count)?;
            }
        }
        Ok(())
    }

    pub fn schema_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nChecking table structure...")
    }

    pub fn columns(&mut self, table: &str, columns: &[&str]) -> io::Result<()> {
        writeln!(self.out, "Table {} columns:", table)?;
        writeln!(self.out, "  {}", columns.join(", "))
    }

    pub fn saved(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "\nInformation extracted and saved to {}", path.display())
    }

    pub fn summary(&mut self, summary: &Summary) -> io::Result<()> {
        writeln!(self.out, "\nSUMMARY:")?;
        writeln!(self.out, "Blogs: {}", format_number(summary.blogs))?;
        writeln!(self.out, "Posts: {}", format_number(summary.posts))?;
        writeln!(self.out, "Keywords: {}", format_number(summary.keywords))?;
        writeln!(self.out, "Metrics: {}", format_number(summary.metrics))
    }

    pub fn failure(&mut self, error: &anyhow::Error) -> io::Result<()> {
        writeln!(self.out, "Extraction failed: {:#}", error)
    }
}

/// The blog's name when the id matches a fetched blog, otherwise the id itself.
fn blog_name<'a>(blogs: &'a [Record], blog_id: &'a str) -> &'a str {
    blogs
        .iter()
        .find(|blog| key_text(blog.get("id")) == blog_id)
        .and_then(|blog| str_field(blog, "name"))
        .unwrap_or(blog_id)
}
