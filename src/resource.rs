use std::fmt;

/// The four tables the extraction reads, in the order it reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Blogs,
    Posts,
    Keywords,
    Metrics,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Blogs,
        Resource::Posts,
        Resource::Keywords,
        Resource::Metrics,
    ];

    pub fn table(self) -> &'static str {
        match self {
            Resource::Blogs => "blogs",
            Resource::Posts => "content_posts",
            Resource::Keywords => "keywords",
            Resource::Metrics => "analytics_metrics",
        }
    }

    /// Column projection; blogs are fetched whole.
    pub fn select(self) -> Option<&'static [&'static str]> {
        match self {
            Resource::Blogs => None,
            Resource::Posts => Some(&["blog_id", "status", "title"]),
            Resource::Keywords => Some(&["blog_id", "status"]),
            Resource::Metrics => Some(&["blog_id", "metric_type"]),
        }
    }

    /// Row cap; blogs are never capped.
    pub fn limit(self, cap: u32) -> Option<u32> {
        match self {
            Resource::Blogs => None,
            _ => Some(cap),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resource::Blogs => "blogs",
            Resource::Posts => "posts",
            Resource::Keywords => "keywords",
            Resource::Metrics => "metrics",
        };
        f.write_str(label)
    }
}
