use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::TransformError;

/// 出力フォーマット
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    Png,
}

/// 文字列から OutputFormat を作成（JPEG / PNG 以外は UnsupportedFormat）
impl FromStr for OutputFormat {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            _ => Err(TransformError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl OutputFormat {
    /// 正規化された名前（"jpg" / "png"）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// レポート表示用の大文字表記
    pub fn label(&self) -> String {
        self.name().to_uppercase()
    }

    /// Content-Type を取得
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
