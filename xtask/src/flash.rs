use anyhow::Result;
use colored::Colorize;

use crate::step::{self, OnFailure};
use crate::{CHIP, TARGET};

pub fn run(release: bool) -> Result<()> {
    let mode = if release { "release" } else { "debug" };
    step::banner(&format!("🔨 Building firmware ({mode} mode)..."));

    let mut build = vec!["build", "-p", "firmware", "--target", TARGET, "--features", "hardware"];
    if release {
        build.push("--release");
    }
    step::run("Build", "cargo", &build, OnFailure::Abort)?;

    let size = step::run(
        "Binary size",
        "cargo",
        &["size", "-p", "firmware", "--features", "hardware", "--target", TARGET, "--", "-A"],
        OnFailure::Warn,
    )?;
    for line in String::from_utf8_lossy(&size.stdout).lines() {
        println!("   {}", line.dimmed());
    }

    let binary = format!("target/{TARGET}/{mode}/firmware");
    println!("{}", format!("📡 Flashing to {CHIP}...").cyan().bold());
    step::run(
        "Flash",
        "probe-rs",
        &["run", "--chip", CHIP, "--probe-index", "0", binary.as_str()],
        OnFailure::Abort,
    )?;

    println!("{}", "ST7789 pipeline firmware is running on hardware".bold());
    println!(
        "   {}",
        format!("Use 'probe-rs attach --chip {CHIP}' to view RTT logs").dimmed()
    );
    println!();
    Ok(())
}
