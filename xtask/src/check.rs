use anyhow::Result;
use std::time::Instant;

use crate::step::{self, OnFailure};
use crate::TARGET;

pub fn run() -> Result<()> {
    step::banner("🔍 Checking builds...");
    let start = Instant::now();

    step::run(
        "Checking firmware (STM32F411)",
        "cargo",
        &["check", "-p", "firmware", "--target", TARGET, "--features", "hardware"],
        OnFailure::Abort,
    )?;
    step::run(
        "Checking display core (no_std)",
        "cargo",
        &["check", "-p", "display", "--target", TARGET, "--features", "defmt"],
        OnFailure::Abort,
    )?;
    step::run(
        "Checking platform (no_std)",
        "cargo",
        &["check", "-p", "platform", "--target", TARGET, "--no-default-features"],
        OnFailure::Abort,
    )?;
    step::run(
        "Running clippy lints",
        "cargo",
        &["clippy", "-p", "display", "-p", "platform", "--all-targets", "--features", "std", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;
    step::run(
        "Checking code formatting",
        "cargo",
        &["fmt", "--all", "--check"],
        OnFailure::Warn,
    )?;

    step::finish(start);
    Ok(())
}
