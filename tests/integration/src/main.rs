//! Integration test runner
//!
//! Runs the integration test targets one by one through `cargo test` and
//! prints a summary table.
//!
//! # Usage
//!
//! ```text
//! cargo run -p integration-tests
//! cargo run -p integration-tests -- --only dispatch_tests --only message_tests
//! cargo run -p integration-tests -- --list
//! ```
//!
//! A single target can also be run directly:
//! ```text
//! cargo test -p integration-tests --test ndr_codec_tests
//! ```

use std::process::{Command, ExitCode};
use std::time::{Duration, Instant};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "integration-tests")]
#[command(about = "Run the stub runtime integration suites")]
struct Args {
    /// Run only these targets (repeatable)
    #[arg(long = "only", value_name = "TARGET")]
    only: Vec<String>,

    /// List the targets and exit
    #[arg(long)]
    list: bool,

    /// Forward --nocapture to the test binaries
    #[arg(long)]
    nocapture: bool,
}

struct Suite {
    target: &'static str,
    covers: &'static str,
}

const SUITES: &[Suite] = &[
    Suite {
        target: "ndr_codec_tests",
        covers: "null pointers, shared counts, overflow checks, data representations",
    },
    Suite {
        target: "dispatch_tests",
        covers: "base interface delegation, Return handling, IPID resolution",
    },
    Suite {
        target: "message_tests",
        covers: "IMSMQMessage property accessors and Send",
    },
    Suite {
        target: "concurrency_tests",
        covers: "concurrent clients on one connection, call timeouts",
    },
];

struct Outcome {
    target: &'static str,
    passed: bool,
    elapsed: Duration,
    detail: String,
}

fn run_suite(suite: &Suite, nocapture: bool) -> Outcome {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "-p", "integration-tests", "--test", suite.target]);
    if nocapture {
        cmd.args(["--", "--nocapture"]);
    }

    println!("--- {} ({})", suite.target, suite.covers);
    let start = Instant::now();
    let status = cmd.status();
    let elapsed = start.elapsed();

    match status {
        Ok(status) if status.success() => Outcome {
            target: suite.target,
            passed: true,
            elapsed,
            detail: "ok".to_string(),
        },
        Ok(status) => Outcome {
            target: suite.target,
            passed: false,
            elapsed,
            detail: match status.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            },
        },
        Err(err) => Outcome {
            target: suite.target,
            passed: false,
            elapsed,
            detail: format!("could not start cargo: {err}"),
        },
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list {
        for suite in SUITES {
            println!("{:<20} {}", suite.target, suite.covers);
        }
        return ExitCode::SUCCESS;
    }

    let selected: Vec<&Suite> = SUITES
        .iter()
        .filter(|suite| args.only.is_empty() || args.only.iter().any(|t| t == suite.target))
        .collect();
    if selected.is_empty() {
        eprintln!("no integration target matches {:?}", args.only);
        return ExitCode::FAILURE;
    }

    let total = Instant::now();
    let outcomes: Vec<Outcome> = selected.iter().map(|suite| run_suite(suite, args.nocapture)).collect();

    println!();
    println!("{:<20} {:<6} {:>10}  detail", "target", "result", "time");
    for outcome in &outcomes {
        let result = if outcome.passed { "PASS" } else { "FAIL" };
        println!(
            "{:<20} {:<6} {:>9.2}s  {}",
            outcome.target,
            result,
            outcome.elapsed.as_secs_f64(),
            outcome.detail
        );
    }

    let failed = outcomes.iter().filter(|o| !o.passed).count();
    println!(
        "\n{} of {} targets passed in {:.2}s",
        outcomes.len() - failed,
        outcomes.len(),
        total.elapsed().as_secs_f64()
    );

    if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
