use clap::Parser;
use std::process;

use delphi::cli::{self, Cli};

fn main() {
  let cli = Cli::parse();
  marquee::init_tracing(cli.verbose);

  match cli::run(&cli) {
    Ok(output) => print!("{output}"),
    Err(e) => {
      marquee::error!(&format!("Dashboard Update Error: {e:#}"));
      process::exit(1);
    }
  }
}
