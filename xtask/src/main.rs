// Desktop/tooling crate — unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod flash;
mod step;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Cross-compilation target of the firmware
pub const TARGET: &str = "thumbv7em-none-eabihf";

/// probe-rs chip name of the board
pub const CHIP: &str = "STM32F411CEUx";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "ST7789 pipeline development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flash firmware to the STM32F411 board via probe-rs
    Flash {
        /// Build and flash release version
        #[arg(short, long)]
        release: bool,
    },
    /// Check the firmware and no_std library builds, clippy and formatting
    Check,
    /// Run unit, pipeline and property tests
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Flash { release } => flash::run(release),
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
    }
}
