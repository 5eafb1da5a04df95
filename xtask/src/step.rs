//! One reported `cargo` (or tool) invocation.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// What a failing step does to the whole task.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Print the output and abort
    Abort,
    /// Print a warning and carry on
    Warn,
}

/// Run `program args`, print a pass/fail line and return the captured output.
pub fn run(label: &str, program: &str, args: &[&str], on_failure: OnFailure) -> Result<Output> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("Failed to run {program} for: {label}"))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
    } else if on_failure == OnFailure::Abort {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stdout));
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    } else {
        eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    }
    println!();
    Ok(output)
}

/// Print a task title.
pub fn banner(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!();
}

/// Print the total time of a task started at `start`.
pub fn finish(start: Instant) {
    println!(
        "{}",
        format!("✓ Done in {:.2}s", start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
}

/// Pull "N passed; M failed; ..." out of libtest output.
pub fn test_summary(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .lines()
        .filter_map(|line| line.split("test result:").nth(1))
        .map(|summary| summary.trim().to_string())
        .last()
        .unwrap_or_else(|| "(summary not available)".to_string())
}
