//! # Pipeline Configuration DTO
//!
//! パイプライン設定のData Transfer Object

use std::path::PathBuf;

use crate::domain::services::label_layout::{HighlightBasis, LabelLayoutConfig};
use crate::domain::services::report_format::CurrencyFormat;

/// パイプライン設定
///
/// ラベル生成とアップロード取り込みに必要な設定情報
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 成果物とステージングファイルの出力先
    pub data_dir: PathBuf,
    /// CSVレポートの通貨書式
    pub report_currency: CurrencyFormat,
    /// PDFの通貨書式（標準フォントで描ける記号を使う）
    pub document_currency: CurrencyFormat,
    /// 新価格の強調表示の比較基準
    pub highlight_basis: HighlightBasis,
    /// ページの寸法と余白
    pub layout: LabelLayoutConfig,
}

impl PipelineConfig {
    /// 新しいパイプライン設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use pricelabel::application::dto::pipeline_config::PipelineConfig;
    /// use pricelabel::domain::services::label_layout::HighlightBasis;
    ///
    /// let config = PipelineConfig::new("data", "₹", "Rs.", HighlightBasis::PreReconciliation);
    ///
    /// assert_eq!(config.data_dir.to_str(), Some("data"));
    /// assert_eq!(config.report_currency.symbol(), "₹");
    /// assert_eq!(config.document_currency.symbol(), "Rs.");
    /// assert_eq!(config.layout.rows_per_page(), 38);
    /// ```
    pub fn new(
        data_dir: impl Into<PathBuf>,
        report_symbol: &str,
        document_symbol: &str,
        highlight_basis: HighlightBasis,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            report_currency: CurrencyFormat::new(report_symbol),
            document_currency: CurrencyFormat::new(document_symbol),
            highlight_basis,
            layout: LabelLayoutConfig::default(),
        }
    }

    /// ローカル実行のCSVレポートのパス
    pub fn report_path(&self, token: &str) -> PathBuf {
        self.data_dir.join(format!("price_labels_{token}.csv"))
    }

    /// ローカル実行のPDFのパス
    pub fn document_path(&self, token: &str) -> PathBuf {
        self.data_dir.join(format!("price_labels_{token}.pdf"))
    }

    /// アップロード取り込みのステージングファイルのパス
    pub fn staging_path(&self, token: &str) -> PathBuf {
        self.data_dir.join(format!("price_update_{token}.csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_artifact_paths() {
        let config = PipelineConfig::new("/srv/data", "₹", "Rs.", HighlightBasis::default());

        assert_eq!(
            config.report_path("20240101-120000"),
            Path::new("/srv/data/price_labels_20240101-120000.csv")
        );
        assert_eq!(
            config.document_path("20240101-120000"),
            Path::new("/srv/data/price_labels_20240101-120000.pdf")
        );
        assert_eq!(
            config.staging_path("20240101-120000"),
            Path::new("/srv/data/price_update_20240101-120000.csv")
        );
    }

    #[test]
    fn test_clone() {
        let config = PipelineConfig::new("data", "$", "$", HighlightBasis::PostReconciliation);
        let cloned = config.clone();

        assert_eq!(cloned.data_dir, config.data_dir);
        assert_eq!(cloned.highlight_basis, config.highlight_basis);
    }
}
