use clap::Parser;
use std::io;

use book2ru_cli::cli::Args;
use book2ru_cli::cli::commands::{translate, version};
use book2ru_cli::error::exit_code;
use book2ru_cli::output::{self, OutputConfig};
use book2ru_cli::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || OutputConfig::default().no_color,
    });

    let result = if args.version {
        version::run_version(&args.into(), &mut io::stdout().lock())
    } else {
        translate::run_translate(args.into()).await.map(drop)
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", Style::error("[ERROR]"));
        std::process::exit(exit_code(&err));
    }
}
