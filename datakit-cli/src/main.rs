//! Unified test and benchmark runner for the datakit crates.
//!
//! Exit codes: 0 when everything passes, otherwise the number of failed
//! suites; −3 for an unknown command, suite, or benchmark name.

use std::process;

use clap::{
    error::ErrorKind,
    Parser,
    Subcommand,
};

mod bench;
mod harness;
mod speed;
mod suites;

const EXIT_UNKNOWN: i32 = -3;

#[derive(Debug, Parser)]
#[command(name = "datakit")]
#[command(about = "Test and benchmark runner for the datakit library")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enumerate the registered test suites.
    List {
        /// Emit the suite names as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Run one or more named suites; `ALL` runs every suite.
    Test {
        /// Suite names, or the special name `ALL`.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Run a named micro-benchmark.
    Bench {
        /// Benchmark name.
        name: String,
    },
    /// Stream values through the adaptive codec and report throughput.
    Speed {
        /// Emit the report as JSON.
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        /// Emit the report as CSV.
        #[arg(long)]
        csv: bool,
        /// Megabytes of input per iteration.
        mb: Option<usize>,
        /// Iterations to run.
        iters: Option<usize>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let _ = err.print();
            process::exit(EXIT_UNKNOWN);
        }
    };

    let code = match cli.command {
        Command::List { json } => {
            suites::list(json);
            0
        }
        Command::Test { names } => match suites::run(&names) {
            Ok(failed) => failed,
            Err(unknown) => {
                eprintln!("unknown suite: {unknown}");
                EXIT_UNKNOWN
            }
        },
        Command::Bench { name } => match bench::run(&name) {
            Ok(()) => 0,
            Err(unknown) => {
                eprintln!("unknown benchmark: {unknown}");
                EXIT_UNKNOWN
            }
        },
        Command::Speed {
            json,
            csv,
            mb,
            iters,
        } => {
            speed::run(speed::Format::from_flags(json, csv), mb, iters);
            0
        }
    };
    process::exit(code);
}
