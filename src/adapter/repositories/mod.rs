//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod csv_price_source_repository;
pub mod file_artifact_repository;
pub mod http_catalog_sync_repository;
pub mod jsonl_audit_repository;
pub mod postgres_audit_repository;
