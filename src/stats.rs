use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::record::Record;

/// Tallies keyed by blog id. Ordered so output is stable across runs.
pub type TallyMap<T> = BTreeMap<String, T>;

/// Per-blog metric counts keyed by `metric_type`. Carries no total of its own.
pub type MetricTally = BTreeMap<String, u64>;

pub trait Total {
    fn total(&self) -> u64;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTally {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTally {
    pub total: u64,
    pub active: u64,
}

impl Total for PostTally {
    fn total(&self) -> u64 {
        self.total
    }
}

impl Total for KeywordTally {
    fn total(&self) -> u64 {
        self.total
    }
}

impl Total for MetricTally {
    fn total(&self) -> u64 {
        self.values().sum()
    }
}

pub fn sum_totals<T: Total>(map: &TallyMap<T>) -> u64 {
    map.values().map(Total::total).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub blogs: Vec<Record>,
    pub posts_stats: TallyMap<PostTally>,
    pub keywords_stats: TallyMap<KeywordTally>,
    pub analytics_stats: TallyMap<MetricTally>,
    pub extracted_at: String,
}

impl Report {
    /// Assembles the report and stamps it with the local time of construction.
    pub fn new(
        blogs: Vec<Record>,
        posts_stats: TallyMap<PostTally>,
        keywords_stats: TallyMap<KeywordTally>,
        analytics_stats: TallyMap<MetricTally>,
    ) -> Self {
        Self {
            blogs,
            posts_stats,
            keywords_stats,
            analytics_stats,
            extracted_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }

    /// Counts derived from the aggregated sections, never from raw rows.
    pub fn summary(&self) -> Summary {
        Summary {
            blogs: self.blogs.len() as u64,
            posts: sum_totals(&self.posts_stats),
            keywords: sum_totals(&self.keywords_stats),
            metrics: sum_totals(&self.analytics_stats),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub blogs: u64,
    pub posts: u64,
    pub keywords: u64,
    pub metrics: u64,
}
