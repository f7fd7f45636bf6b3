use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for the fetch controller")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy and tests, stopping at the first failure
    Ci,
    /// cargo fmt --check
    Fmt,
    /// clippy with warnings denied
    Clippy,
    /// Run every workspace test
    Test,
    /// Play the built-in meadow level with the default key script
    Demo {
        /// Keys to press, one per frame
        #[arg(short, long)]
        script: Option<String>,
    },
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];
const TEST: &[&str] = &["test", "--workspace"];

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed with {status}", args[0]);
    }
    Ok(())
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Ci => {
            for step in [FMT, CLIPPY, TEST] {
                cargo(step)?;
            }
        }
        Commands::Fmt => cargo(FMT)?,
        Commands::Clippy => cargo(CLIPPY)?,
        Commands::Test => cargo(TEST)?,
        Commands::Demo { script } => {
            let mut args = vec!["run", "-p", "fetch-cli", "--", "play"];
            if let Some(script) = script.as_deref() {
                args.extend(["--script", script]);
            }
            cargo(&args)?;
        }
    }
    Ok(())
}
