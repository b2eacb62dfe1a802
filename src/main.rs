//! Pricelabel - POS price label generator
//!
//! 価格エクスポートから価格ラベルを生成する

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use pricelabel::adapter::config::Config;
use pricelabel::driver::{Args, PriceLabelWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration (file + environment overrides)
    let config = Config::load(&args.config)?.with_env_overrides();

    // Create workflow with injected configuration
    let workflow = PriceLabelWorkflow::new(config)?;

    workflow.execute(args.command).await
}
