//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// POSの価格エクスポートから値札を生成するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "pricelabel")]
#[command(about = "Generate price labels from a POS price export", long_about = None)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = "./pricelabel.json")]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the pipeline once against the input file
    Run {
        /// Input CSV (overrides `input_file` from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Re-run the pipeline whenever the input file changes
    Watch {
        /// Input CSV (overrides `input_file` from the config)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Serve the upload endpoint
    Serve {
        /// Listen address (overrides `server.bind` from the config)
        #[arg(short, long)]
        bind: Option<String>,
    },
}
