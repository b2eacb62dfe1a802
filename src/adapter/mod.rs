//! Adapter Layer
//!
//! 外部システム（ファイルシステム、PostgreSQL、カタログAPI、HTTP）との統合

pub mod config;
pub mod csv_codec;
pub mod http;
pub mod pdf;
pub mod repositories;
pub mod watcher;
