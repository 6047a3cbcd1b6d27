use serde::Serialize;

use crate::fitting::ProcessingResult;

/// 処理結果の検証レポート（結果をそのまま射影したもの）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub width: u32,
    pub height: u32,
    /// 小数第 2 位で丸めた KB
    pub size_kb: f64,
    /// 大文字の形式名（"JPG" / "PNG"）
    pub format: String,
    pub valid: bool,
}

impl From<&ProcessingResult> for ValidationReport {
    fn from(result: &ProcessingResult) -> Self {
        Self {
            width: result.width,
            height: result.height,
            size_kb: round_kb(result.size_kb),
            format: result.format.label(),
            valid: result.valid,
        }
    }
}

/// 小数第 2 位で丸める
pub fn round_kb(size_kb: f64) -> f64 {
    (size_kb * 100.0).round() / 100.0
}
