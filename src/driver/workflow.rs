//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション（依存性の組み立てと run / watch / serve）

use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::adapter::config::{expand_path, Config};
use crate::adapter::http;
use crate::adapter::repositories::csv_price_source_repository::CsvPriceSourceRepository;
use crate::adapter::repositories::file_artifact_repository::FileArtifactRepository;
use crate::adapter::repositories::http_catalog_sync_repository::HttpCatalogSyncRepository;
use crate::adapter::repositories::jsonl_audit_repository::JsonlAuditRepository;
use crate::adapter::repositories::postgres_audit_repository::PostgresAuditRepository;
use crate::adapter::watcher::{ChangeWatcher, FileHashWatcher};
use crate::application::dto::run_report::{RunReport, SyncStatus};
use crate::application::use_cases::generate_labels::GenerateLabelsUseCase;
use crate::application::use_cases::parse_upload::ParseUploadUseCase;
use crate::application::use_cases::record_batch::RecordBatchUseCase;
use crate::application::use_cases::sync_catalog::SyncCatalogUseCase;
use crate::domain::repositories::audit_repository::AuditRepository;
use crate::domain::repositories::catalog_sync_repository::CatalogSyncRepository;

use super::cli::Command;

/// Price Label Workflow
pub struct PriceLabelWorkflow {
    config: Config,
    generate_labels: Arc<GenerateLabelsUseCase<CsvPriceSourceRepository, FileArtifactRepository>>,
    parse_upload: Arc<ParseUploadUseCase<CsvPriceSourceRepository>>,
}

impl PriceLabelWorkflow {
    /// Create a new workflow instance with dependency injection
    ///
    /// Must be called inside a tokio runtime (the database pool is created lazily on it).
    pub fn new(config: Config) -> Result<Self> {
        // Repository implementations
        let source_repo = Arc::new(CsvPriceSourceRepository::new());
        let artifact_repo = Arc::new(FileArtifactRepository::new());

        let audit_repo: Arc<dyn AuditRepository> = match config.database_url() {
            Some(url) => {
                info!("Recording batches in PostgreSQL");
                Arc::new(PostgresAuditRepository::connect_lazy(url)?)
            }
            None => {
                let path = config.audit_log_path();
                info!("Recording batches in {}", path.display());
                Arc::new(JsonlAuditRepository::new(path))
            }
        };

        let sync_repo: Option<Arc<dyn CatalogSyncRepository>> = match config.sync_settings() {
            Some(settings) => {
                debug!("Catalog endpoint: {}", settings.url);
                Some(Arc::new(HttpCatalogSyncRepository::new(&settings)?))
            }
            None => None,
        };

        // Use Cases construction
        let record_batch = Arc::new(RecordBatchUseCase::new(audit_repo));
        let sync_catalog = Arc::new(SyncCatalogUseCase::new(sync_repo));
        if sync_catalog.is_enabled() {
            info!("Catalog sync enabled");
        } else {
            info!("Catalog sync disabled");
        }
        let pipeline_config = config.to_pipeline_config();

        let generate_labels = Arc::new(GenerateLabelsUseCase::new(
            source_repo.clone(),
            artifact_repo,
            record_batch.clone(),
            sync_catalog,
            pipeline_config.clone(),
        ));
        let parse_upload = Arc::new(ParseUploadUseCase::new(
            source_repo,
            record_batch,
            pipeline_config,
        ));

        Ok(Self {
            config,
            generate_labels,
            parse_upload,
        })
    }

    /// Execute a subcommand
    pub async fn execute(&self, command: Command) -> Result<()> {
        match command {
            Command::Run { input } => {
                self.run_once(&self.input_path(input)).await?;
                Ok(())
            }
            Command::Watch { input } => {
                let watcher = FileHashWatcher::new(
                    self.input_path(input),
                    self.config.poll_interval(),
                    self.config.settle_delay(),
                );
                self.watch_with(watcher, shutdown_signal()).await
            }
            Command::Serve { bind } => {
                let bind = bind.unwrap_or_else(|| self.config.server.bind.clone());
                let listener = TcpListener::bind(&bind)
                    .await
                    .with_context(|| format!("Failed to bind {}", bind))?;
                println!("✓ Listening on {}", bind);
                http::serve(listener, self.router(), shutdown_signal()).await
            }
        }
    }

    /// Upload server router
    pub fn router(&self) -> axum::Router {
        http::router(self.parse_upload.clone(), self.config.server.max_upload_bytes)
    }

    fn input_path(&self, input: Option<PathBuf>) -> PathBuf {
        input
            .map(|p| expand_path(&p))
            .unwrap_or_else(|| self.config.input_path())
    }

    /// Run the pipeline once and print a summary
    pub async fn run_once(&self, input: &Path) -> Result<RunReport> {
        println!("✓ Processing {}", input.display());

        let report = self
            .generate_labels
            .execute(input, Local::now().naive_local())
            .await
            .map_err(|e| {
                println!("✗ {}", e);
                e
            })?;

        println!(
            "✓ Processed {} rows ({} price changes)",
            report.batch.items_processed(),
            report.changed_rows
        );
        if report.source_rewritten {
            println!("✓ Updated {}", input.display());
        }
        println!("✓ Wrote {}", report.report_path.display());
        println!(
            "✓ Wrote {} ({} pages)",
            report.document_path.display(),
            report.page_count
        );

        match &report.audit {
            Ok(()) => println!("✓ Logged batch {}", report.batch.batch_id()),
            Err(e) => println!("⚠ {}", e),
        }
        match &report.sync {
            Ok(SyncStatus::Synced) => println!("✓ Synced with catalog"),
            Ok(SyncStatus::Disabled) => {}
            Err(e) => println!("⚠ {}", e),
        }

        Ok(report)
    }

    /// Re-run the pipeline on every change reported by `watcher` until `shutdown` resolves
    ///
    /// A failed run is reported and the loop keeps watching.
    pub async fn watch_with<W, F>(&self, mut watcher: W, shutdown: F) -> Result<()>
    where
        W: ChangeWatcher,
        F: Future<Output = ()>,
    {
        println!("✓ Watching {}", watcher.path().display());
        tokio::pin!(shutdown);

        loop {
            let changed = tokio::select! {
                _ = &mut shutdown => None,
                changed = watcher.next_change() => Some(changed),
            };
            let Some(changed) = changed else {
                println!("✓ Stopped watching");
                return Ok(());
            };
            changed?;
            info!("Change detected in {}", watcher.path().display());

            let input = watcher.path().to_path_buf();
            match self.run_once(&input).await {
                Ok(report) if report.source_rewritten => watcher.rebaseline().await?,
                Ok(_) => {}
                Err(e) => log::warn!("Run failed: {:#}", e),
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
