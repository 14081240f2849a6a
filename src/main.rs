use anyhow::Result;
use clap::Parser;
use tracing::error;

use wayback_urls::{pipeline, utils, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);

    match pipeline::run_lookup(&args) {
        Ok(result) => {
            pipeline::print_lookup_results(&result);
            Ok(())
        }
        Err(e) => {
            error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
