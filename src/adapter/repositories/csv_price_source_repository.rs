//! CSV Price Source Repository Implementation
//!
//! PriceSourceRepositoryのCSVファイル実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::adapter::csv_codec::{read_raw_table, write_records};
use crate::domain::entities::price_row::{PriceTable, RawTable};
use crate::domain::repositories::price_source_repository::PriceSourceRepository;

/// CSVファイルベースの価格ソースリポジトリ
#[derive(Debug, Default)]
pub struct CsvPriceSourceRepository;

impl CsvPriceSourceRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    fn load_sync(path: &Path) -> Result<RawTable> {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let table = read_raw_table(file)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(
            "Loaded {} records from {}",
            table.records.len(),
            path.display()
        );
        Ok(table)
    }

    /// 現在価格は保持しているセルの文字列、新価格は書式なしの数値で書き出す
    fn encode(table: &PriceTable) -> Result<Vec<u8>> {
        let records: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| table.record(row, &row.raw_current, &row.new_price.to_string()))
            .collect();
        write_records(table.headers(), &records)
    }

    fn save_sync(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved price table to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl PriceSourceRepository for CsvPriceSourceRepository {
    async fn load(&self, path: &Path) -> Result<RawTable> {
        let path: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }

    async fn load_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        read_raw_table(bytes)
    }

    async fn save(&self, path: &Path, table: &PriceTable) -> Result<()> {
        let bytes = Self::encode(table)?;
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::save_sync(&path, &bytes))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}
