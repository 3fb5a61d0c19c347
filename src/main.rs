//! # Datavista Command Line
//!
//! ```bash
//! datavista signup --username alice
//! datavista upload --file sales.csv --name sales --description "Q1 sales"
//! datavista list
//! datavista explore --id 1 --view info
//! ```
//!
//! Passwords are read from `--password` or `DATAVISTA_PASSWORD`. Results are
//! printed as JSON on stdout; logs go to stderr and the log directory.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Results are the program's output

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    datavista::logging::init()?;

    let cli = cli::Cli::parse();
    tokio::runtime::Runtime::new()?.block_on(async {
        let output = cli::run_command(cli).await?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok::<_, anyhow::Error>(())
    })
}
