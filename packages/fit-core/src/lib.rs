//! 画像を目標仕様（寸法・KB 範囲・形式）に合わせ込むコアライブラリ

pub mod constants;
pub mod errors;
pub mod fitting;
pub mod report;
pub mod rules;
pub mod transform;
pub mod validation;

// 公開API
pub use constants::{DEFAULT_MAX_ATTEMPTS, MAX_DIMENSION, MAX_UPLOAD_BYTES};
pub use errors::{ErrorKind, MediaError, RuleError, TransformError};
pub use fitting::{
    fit, fit_local, fit_with, search_quality, CanvasEncoder, FitConfig, ImageEncoder,
    ProcessingResult, Quality, QualityEncoder, SearchOutcome,
};
pub use report::ValidationReport;
pub use rules::{
    derive_spec, find_preset, parse_rule_text, presets, Preset, RuleSource, SizeWindow, Spec,
};
pub use transform::{decode_image, encode_image, resize_exact, OutputFormat, SourceFormat};
pub use validation::validate_upload;
