//! Size baseline for `simple-argscan`: the same program with clap.
#![forbid(unsafe_code)]
use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Cli {
    #[arg(long, short)]
    verbose: bool,
    file: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    std::hint::black_box(&cli);
}
