use serde::Serialize;

use crate::constants::{
    DEFAULT_HEIGHT, DEFAULT_MAX_KB, DEFAULT_MIN_KB, DEFAULT_WIDTH, MAX_DIMENSION,
};
use crate::errors::RuleError;
use crate::transform::OutputFormat;

/// 出力サイズの許容範囲（KB, 閉区間）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeWindow {
    pub min_kb: f64,
    pub max_kb: f64,
}

impl SizeWindow {
    pub fn new(min_kb: f64, max_kb: f64) -> Self {
        Self { min_kb, max_kb }
    }

    pub fn contains(&self, size_kb: f64) -> bool {
        self.min_kb <= size_kb && size_kb <= self.max_kb
    }
}

/// 画像を合わせ込む目標仕様
///
/// 生成時に検証済みで、以降は変更できない。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    width: u32,
    height: u32,
    min_kb: f64,
    max_kb: f64,
    format: OutputFormat,
}

impl Spec {
    /// 検証付きで Spec を作成する
    ///
    /// min_kb > max_kb や max_kb = 0 のように決して満たせない範囲は
    /// 探索を回し切る前にここで拒否する。
    pub fn new(
        width: u32,
        height: u32,
        min_kb: f64,
        max_kb: f64,
        format: OutputFormat,
    ) -> Result<Self, RuleError> {
        if width == 0 || height == 0 {
            return Err(RuleError::InvalidSpec(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RuleError::InvalidSpec(format!(
                "dimensions must be at most {MAX_DIMENSION}, got {width}x{height}"
            )));
        }
        if !min_kb.is_finite() || !max_kb.is_finite() || min_kb < 0.0 {
            return Err(RuleError::InvalidSpec(format!(
                "size range must be finite and non-negative, got {min_kb}-{max_kb}kb"
            )));
        }
        if max_kb <= 0.0 {
            return Err(RuleError::InvalidSpec(
                "maximum size must be greater than 0kb".to_string(),
            ));
        }
        if min_kb > max_kb {
            return Err(RuleError::InvalidSpec(format!(
                "minimum size {min_kb}kb exceeds maximum {max_kb}kb"
            )));
        }

        Ok(Self::from_parts(width, height, min_kb, max_kb, format))
    }

    /// 検証なしで作成する（プリセット表の定数用）
    pub(crate) const fn from_parts(
        width: u32,
        height: u32,
        min_kb: f64,
        max_kb: f64,
        format: OutputFormat,
    ) -> Self {
        Self {
            width,
            height,
            min_kb,
            max_kb,
            format,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn min_kb(&self) -> f64 {
        self.min_kb
    }

    pub fn max_kb(&self) -> f64 {
        self.max_kb
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn window(&self) -> SizeWindow {
        SizeWindow::new(self.min_kb, self.max_kb)
    }
}

impl Default for Spec {
    fn default() -> Self {
        Self::from_parts(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            DEFAULT_MIN_KB,
            DEFAULT_MAX_KB,
            OutputFormat::Jpeg,
        )
    }
}
