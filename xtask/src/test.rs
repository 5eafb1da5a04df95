use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{self, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    step::banner("🧪 Running tests...");
    let start = Instant::now();

    if !integration_only {
        let out = step::run(
            "Unit tests",
            "cargo",
            &["test", "--lib", "--workspace", "--exclude", "xtask"],
            OnFailure::Abort,
        )?;
        println!("   {}", step::test_summary(&out).dimmed());
    }

    if !unit_only {
        // The pipeline tests drive the simulated panel, which needs `std`.
        for package in ["platform", "display", "firmware"] {
            let label = format!("Integration tests ({package})");
            let out = step::run(
                &label,
                "cargo",
                &["test", "-p", package, "--features", "std", "--tests"],
                OnFailure::Abort,
            )?;
            println!("   {}", step::test_summary(&out).dimmed());
        }
    }

    step::run(
        "Doc tests",
        "cargo",
        &["test", "--doc", "--workspace", "--exclude", "xtask"],
        OnFailure::Warn,
    )?;

    step::finish(start);
    Ok(())
}
