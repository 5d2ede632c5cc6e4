pub mod aggregate;
pub mod args;
pub mod client;
pub mod console;
pub mod error;
pub mod extract;
pub mod record;
pub mod resource;
pub mod sink;
pub mod stats;
pub mod utils;

pub use args::Args;
pub use client::{RecordSource, RestClient};
pub use console::Console;
pub use error::{FetchError, FetchResult};
pub use extract::{build_report, run, ExtractOptions};
pub use record::Record;
pub use stats::{KeywordTally, MetricTally, PostTally, Report, Summary};
