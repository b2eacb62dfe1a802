//! HTTP Catalog Sync Repository Implementation
//!
//! CatalogSyncRepositoryのHTTP実装（Bearerトークン付きでJSON配列をPOSTする）

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::adapter::config::SyncSettings;
use crate::domain::repositories::catalog_sync_repository::CatalogSyncRepository;

/// HTTPカタログ同期リポジトリ
pub struct HttpCatalogSyncRepository {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpCatalogSyncRepository {
    /// 同期設定からリポジトリを作成
    ///
    /// # Errors
    ///
    /// HTTPクライアントを構築できない場合にエラーを返す
    pub fn new(settings: &SyncSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            url: settings.url.clone(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl CatalogSyncRepository for HttpCatalogSyncRepository {
    async fn push(&self, records: &[serde_json::Value]) -> Result<()> {
        debug!("POST {} ({} records)", self.url, records.len());
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(records)
            .send()
            .await
            .context("Failed to reach catalog endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} {}", status, body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/prices")
    }

    fn settings(url: String) -> SyncSettings {
        SyncSettings {
            url,
            api_key: "secret".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_push_sends_bearer_and_json() {
        let received: Arc<Mutex<Option<(String, Value)>>> = Arc::new(Mutex::new(None));
        let captured = received.clone();
        let router = Router::new().route(
            "/prices",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    *captured.lock().unwrap() = Some((auth, body));
                    StatusCode::OK
                }
            }),
        );
        let repo = HttpCatalogSyncRepository::new(&settings(serve(router).await)).unwrap();

        repo.push(&[json!({"SKU": "A1", "NEW PRICE": 0.0})])
            .await
            .unwrap();

        let (auth, body) = received.lock().unwrap().take().unwrap();
        assert_eq!(auth, "Bearer secret");
        assert_eq!(body[0]["SKU"], "A1");
    }

    #[tokio::test]
    async fn test_push_accepts_any_2xx() {
        let router = Router::new().route("/prices", post(|| async { StatusCode::ACCEPTED }));
        let repo = HttpCatalogSyncRepository::new(&settings(serve(router).await)).unwrap();

        assert!(repo.push(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_push_reports_error_status() {
        let router = Router::new().route(
            "/prices",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let repo = HttpCatalogSyncRepository::new(&settings(serve(router).await)).unwrap();

        let err = repo.push(&[]).await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_push_unreachable_endpoint() {
        let repo =
            HttpCatalogSyncRepository::new(&settings("http://127.0.0.1:1/prices".to_string()))
                .unwrap();

        assert!(repo.push(&[]).await.is_err());
    }
}
