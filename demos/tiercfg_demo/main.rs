//! # tiercfg demo application
//!
//! A small CLI for poking at a tiercfg setup by hand. It loads the layers the
//! same way an application would and prints what a key resolves to.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example tiercfg_demo -- get STRING_A
//! cargo run --example tiercfg_demo -- --dir demos/tiercfg_demo get URLS --list
//! cargo run --example tiercfg_demo -- dump
//! ```
//!
//! | Feature              | How to exercise it                                          |
//! |----------------------|-------------------------------------------------------------|
//! | Discovery            | Put `base_config.ini` in cwd or any parent, then run `get`  |
//! | Explicit directory   | `--dir path/to/configs get KEY`                             |
//! | Env override         | `HOST=example.org cargo run --example tiercfg_demo -- get HOST` |
//! | Sectioned env        | `HOST_DEV=dev.local ... get dev::HOST`                      |
//! | Multi-value expansion| `get URLS --list`                                           |
//! | Debug logging        | `RUST_LOG=tiercfg=trace cargo run --example tiercfg_demo -- get URLS` |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tiercfg::{DEFAULT_LIST_SEPARATOR, Lookup, SearchPath, Tiercfg, TiercfgError};

/// tiercfg demo: resolve keys from layered INI files.
#[derive(Parser, Debug)]
#[command(name = "tiercfg-demo")]
struct Cli {
    /// Search only this directory for config files.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Global key prefix.
    #[arg(long, global = true, default_value = "")]
    key_prefix: String,

    /// Ignore the process environment.
    #[arg(long, global = true)]
    no_env: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved value of a key.
    Get {
        key: String,
        /// Split the value and print one item per line.
        #[arg(long)]
        list: bool,
    },
    /// Print the raw value of a key, before placeholder expansion.
    Raw { key: String },
    /// Print both file layers as JSON.
    Dump,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), TiercfgError> {
    let mut builder = Tiercfg::builder().key_prefix(&cli.key_prefix);
    if let Some(dir) = cli.dir {
        builder = builder.search_paths(vec![SearchPath::Path(dir)]);
    }
    if cli.no_env {
        builder = builder.no_env();
    }
    let config = builder.load()?;

    match cli.command {
        Commands::Get { key, list: false } => println!("{}", config.string(&key)?),
        Commands::Get { key, list: true } => {
            for item in config.strings(&key, DEFAULT_LIST_SEPARATOR)? {
                println!("{item}");
            }
        }
        Commands::Raw { key } => match config.raw(&key) {
            Some(value) => println!("{value}"),
            None => return Err(TiercfgError::KeyNotFound(key)),
        },
        Commands::Dump => println!("{}", config.dump()?),
    }
    Ok(())
}
