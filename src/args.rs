use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wayback-urls",
    about = "List every URL the Wayback Machine has archived for a domain",
    version,
    long_about = None
)]
pub struct Args {
    /// Domain to look up (an http:// or https:// prefix is stripped)
    pub domain: String,

    /// Write the listing to a custom path instead of {domain}_wayback_urls.txt
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
