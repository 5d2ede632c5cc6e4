use std::collections::BTreeMap;

use crate::record::{key_text, str_field, Record};
use crate::stats::{KeywordTally, MetricTally, PostTally, TallyMap};

pub const GROUP_FIELD: &str = "blog_id";
pub const METRIC_FIELD: &str = "metric_type";
pub const UNKNOWN_METRIC: &str = "unknown";

/// A named test over a record. Predicates need not be exclusive or exhaustive.
#[derive(Clone, Copy)]
pub struct Predicate {
    pub label: &'static str,
    pub matches: fn(&Record) -> bool,
}

pub const POST_PREDICATES: &[Predicate] = &[
    Predicate {
        label: "published",
        matches: is_published,
    },
    Predicate {
        label: "draft",
        matches: is_draft,
    },
];

pub const KEYWORD_PREDICATES: &[Predicate] = &[Predicate {
    label: "active",
    matches: is_active,
}];

fn is_published(record: &Record) -> bool {
    str_field(record, "status") == Some("publish")
}

fn is_draft(record: &Record) -> bool {
    str_field(record, "status") == Some("draft")
}

fn is_active(record: &Record) -> bool {
    str_field(record, "status") == Some("active")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTally {
    pub total: u64,
    pub counts: BTreeMap<&'static str, u64>,
}

impl LabelTally {
    fn seeded(predicates: &[Predicate]) -> Self {
        Self {
            total: 0,
            counts: predicates.iter().map(|p| (p.label, 0)).collect(),
        }
    }

    pub fn count(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }
}

/// Groups records by `key_field`. Each record bumps its group's total once and
/// every predicate it satisfies once.
pub fn aggregate(
    records: &[Record],
    key_field: &str,
    predicates: &[Predicate],
) -> TallyMap<LabelTally> {
    let mut tallies = TallyMap::new();
    for record in records {
        let tally = tallies
            .entry(key_text(record.get(key_field)))
            .or_insert_with(|| LabelTally::seeded(predicates));
        tally.total += 1;
        for predicate in predicates {
            if (predicate.matches)(record) {
                *tally.counts.entry(predicate.label).or_insert(0) += 1;
            }
        }
    }
    tallies
}

/// Two-level grouping: by `key_field`, then by the value of `label_field`.
/// Records without `label_field` count under `missing_label`.
pub fn aggregate_nested(
    records: &[Record],
    key_field: &str,
    label_field: &str,
    missing_label: &str,
) -> TallyMap<MetricTally> {
    let mut tallies: TallyMap<MetricTally> = TallyMap::new();
    for record in records {
        let label = match record.get(label_field) {
            Some(value) => key_text(Some(value)),
            None => missing_label.to_string(),
        };
        *tallies
            .entry(key_text(record.get(key_field)))
            .or_default()
            .entry(label)
            .or_insert(0) += 1;
    }
    tallies
}

pub fn post_stats(records: &[Record]) -> TallyMap<PostTally> {
    aggregate(records, GROUP_FIELD, POST_PREDICATES)
        .into_iter()
        .map(|(blog_id, tally)| {
            let stats = PostTally {
                total: tally.total,
                published: tally.count("published"),
                draft: tally.count("draft"),
            };
            (blog_id, stats)
        })
        .collect()
}

pub fn keyword_stats(records: &[Record]) -> TallyMap<KeywordTally> {
    aggregate(records, GROUP_FIELD, KEYWORD_PREDICATES)
        .into_iter()
        .map(|(blog_id, tally)| {
            let stats = KeywordTally {
                total: tally.total,
                active: tally.count("active"),
            };
            (blog_id, stats)
        })
        .collect()
}

pub fn metric_stats(records: &[Record]) -> TallyMap<MetricTally> {
    aggregate_nested(records, GROUP_FIELD, METRIC_FIELD, UNKNOWN_METRIC)
}
