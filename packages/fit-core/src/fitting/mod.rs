//! サイズ合わせ: 指定寸法に一度だけリサイズし、品質を探索して KB 範囲に収める

pub mod encoder;
pub mod quality;
pub mod search;

pub use encoder::{CanvasEncoder, ImageEncoder, QualityEncoder};
pub use quality::Quality;
pub use search::{search_quality, size_in_kb, SearchOutcome};

use crate::constants::{DEFAULT_MAX_ATTEMPTS, MIN_MAX_ATTEMPTS};
use crate::errors::TransformError;
use crate::rules::Spec;
use crate::transform::{decode_image, OutputFormat};

/// 品質探索の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitConfig {
    max_attempts: u32,
}

impl FitConfig {
    /// 試行回数は MIN_MAX_ATTEMPTS 未満にならないよう切り上げる
    pub fn new(max_attempts: u32) -> Self {
        if max_attempts < MIN_MAX_ATTEMPTS {
            tracing::warn!(
                requested = max_attempts,
                applied = MIN_MAX_ATTEMPTS,
                "max attempts below minimum, raising"
            );
        }
        Self {
            max_attempts: max_attempts.max(MIN_MAX_ATTEMPTS),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// サイズ合わせの結果
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    pub bytes: Vec<u8>,
    /// リサイズ後の実寸
    pub width: u32,
    pub height: u32,
    pub size_kb: f64,
    pub format: OutputFormat,
    /// size_kb が Spec の範囲内か
    pub valid: bool,
    /// 最終品質（パーセント）
    pub quality: u8,
    pub attempts: u32,
}

/// サーバー側の経路で画像を Spec に合わせる
pub fn fit(source: &[u8], spec: &Spec, config: &FitConfig) -> Result<ProcessingResult, TransformError> {
    let decoded = decode_image(source)?;
    let mut encoder = ImageEncoder::new(&decoded.image, spec.width(), spec.height(), spec.format())?;
    fit_with(&mut encoder, spec, config)
}

/// ローカル（フォールバック）経路で画像を Spec に合わせる
pub fn fit_local(
    source: &[u8],
    spec: &Spec,
    config: &FitConfig,
) -> Result<ProcessingResult, TransformError> {
    let decoded = decode_image(source)?;
    let mut encoder = CanvasEncoder::new(&decoded.image, spec.width(), spec.height(), spec.format())?;
    fit_with(&mut encoder, spec, config)
}

/// 任意のエンコーダで品質探索を行う
pub fn fit_with<E: QualityEncoder + ?Sized>(
    encoder: &mut E,
    spec: &Spec,
    config: &FitConfig,
) -> Result<ProcessingResult, TransformError> {
    let outcome = search_quality(encoder, spec.window(), config.max_attempts())?;

    if outcome.valid {
        tracing::info!(
            size_kb = outcome.size_kb,
            quality = outcome.quality.percent(),
            attempts = outcome.attempts,
            "image fitted within size window"
        );
    } else {
        tracing::warn!(
            size_kb = outcome.size_kb,
            min_kb = spec.min_kb(),
            max_kb = spec.max_kb(),
            attempts = outcome.attempts,
            "size window not reached, returning last attempt"
        );
    }

    Ok(ProcessingResult {
        bytes: outcome.bytes,
        width: encoder.width(),
        height: encoder.height(),
        size_kb: outcome.size_kb,
        format: encoder.format(),
        valid: outcome.valid,
        quality: outcome.quality.percent(),
        attempts: outcome.attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::find_preset;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: &DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// 決定的な疑似乱数ノイズ画像（圧縮しにくい）
    fn noise(width: u32, height: u32) -> DynamicImage {
        let mut state: u32 = 0x2545_F491;
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Rgb([r, g, b])
        }))
    }

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([180, 40, 90])))
    }

    #[test]
    fn test_fit_config_floor() {
        assert_eq!(FitConfig::default().max_attempts(), 20);
        assert_eq!(FitConfig::new(3).max_attempts(), 15);
        assert_eq!(FitConfig::new(40).max_attempts(), 40);
    }

    #[test]
    fn test_fit_exact_dimensions_for_any_aspect_ratio() {
        let spec = find_preset("photo").unwrap();
        for (w, h) in [(1000, 1000), (1600, 300), (120, 900), (10, 10)] {
            let source = png_bytes(&solid(w, h));
            let result = fit(&source, &spec, &FitConfig::default()).unwrap();
            assert_eq!((result.width, result.height), (200, 230), "source {w}x{h}");

            let decoded = image::load_from_memory(&result.bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (200, 230));
        }
    }

    #[test]
    fn test_fit_solid_color_signature() {
        // 単色画像は最高品質でも 10KB に届かないので、探索は上限まで品質を上げて終わる
        let spec = find_preset("signature").unwrap();
        let source = png_bytes(&solid(1000, 1000));
        let config = FitConfig::default();
        let result = fit(&source, &spec, &config).unwrap();

        assert_eq!((result.width, result.height), (140, 60));
        assert_eq!(result.format, OutputFormat::Jpeg);
        assert!(result.size_kb < 10.0);
        assert!(!result.valid);
        assert_eq!(result.quality, 100);
        assert_eq!(result.attempts, config.max_attempts());
    }

    #[test]
    fn test_fit_solid_color_within_reachable_window() {
        let spec = Spec::new(140, 60, 0.0, 20.0, OutputFormat::Jpeg).unwrap();
        let source = png_bytes(&solid(1000, 1000));
        let result = fit(&source, &spec, &FitConfig::default()).unwrap();

        assert!(result.valid);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.quality, 92);
        assert!(result.size_kb <= 20.0);
    }

    #[test]
    fn test_fit_terminates_when_window_unreachable() {
        // ノイズ画像は最低品質でも 1KB を超える
        let spec = Spec::new(640, 640, 0.0, 1.0, OutputFormat::Jpeg).unwrap();
        let source = png_bytes(&noise(640, 640));
        let config = FitConfig::new(15);
        let result = fit(&source, &spec, &config).unwrap();

        assert!(!result.valid);
        assert_eq!(result.attempts, 15);
        assert!(result.size_kb > 1.0);
        assert_eq!((result.width, result.height), (640, 640));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let spec = Spec::new(120, 90, 2.0, 4.0, OutputFormat::Jpeg).unwrap();
        let source = png_bytes(&noise(300, 200));
        let first = fit(&source, &spec, &FitConfig::default()).unwrap();
        let second = fit(&source, &spec, &FitConfig::default()).unwrap();

        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.quality, second.quality);
    }

    #[test]
    fn test_fit_png_output() {
        let spec = Spec::new(64, 64, 0.0, 500.0, OutputFormat::Png).unwrap();
        let source = png_bytes(&noise(128, 128));
        let result = fit(&source, &spec, &FitConfig::default()).unwrap();

        assert!(result.valid);
        assert_eq!(result.format, OutputFormat::Png);
        assert_eq!(&result.bytes[0..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_fit_local_matches_spec_semantics() {
        let spec = find_preset("signature").unwrap();
        let source = png_bytes(&noise(500, 300));
        let server = fit(&source, &spec, &FitConfig::default()).unwrap();
        let local = fit_local(&source, &spec, &FitConfig::default()).unwrap();

        assert_eq!((local.width, local.height), (server.width, server.height));
        assert_eq!(local.format, server.format);
        assert_eq!(local.valid, spec.window().contains(local.size_kb));
    }

    #[test]
    fn test_fit_rejects_corrupt_source() {
        let spec = Spec::default();
        let result = fit(b"not an image at all", &spec, &FitConfig::default());
        assert!(matches!(result, Err(TransformError::DecodeFailed(_))));

        let result = fit_local(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0], &spec, &FitConfig::default());
        assert!(matches!(result, Err(TransformError::DecodeFailed(_))));
    }
}
