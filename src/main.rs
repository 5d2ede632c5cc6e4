use anyhow::Result;
use clap::Parser;
use tracing::error;

use dbinfo::{run, utils, Args, Console, ExtractOptions, RestClient};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    let client = RestClient::new(&args.url, &args.key)?;
    let options = ExtractOptions::from(&args);
    let mut console = Console::stdout();

    match run(&client, &options, &mut console) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!(action = "abort", component = "main", error = %e, "Extraction failed");
            if let Err(write_err) = console.failure(&e) {
                error!(action = "report", component = "console", error = %write_err, "Failed to print failure");
            }
            std::process::exit(1);
        }
    }
}
