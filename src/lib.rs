pub mod args;
pub mod domain;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod stats;
pub mod timestamp;
pub mod utils;
pub mod writer;

pub use args::Args;
pub use pipeline::run_lookup;
pub use stats::{LookupResult, UrlSummary};
