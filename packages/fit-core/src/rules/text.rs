use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::{DEFAULT_HEIGHT, DEFAULT_MAX_KB, DEFAULT_MIN_KB, DEFAULT_WIDTH};
use crate::errors::RuleError;
use crate::rules::spec::Spec;
use crate::transform::OutputFormat;

lazy_static! {
    /// "200x230", "200 X 230", "200×230"
    static ref DIMENSIONS_PATTERN: Regex = Regex::new(r"(?i)(\d+)\s*[x×]\s*(\d+)").unwrap();

    /// "width: 200 ... height: 230"
    static ref LABELLED_DIMENSIONS_PATTERN: Regex =
        Regex::new(r"(?is)width\s*:\s*(\d+).*?height\s*:\s*(\d+)").unwrap();

    /// "20-50kb", "20 – 50 KB"
    static ref SIZE_RANGE_PATTERN: Regex = Regex::new(r"(?i)(\d+)\s*[-–]\s*(\d+)\s*kb").unwrap();

    /// "size: 20 to 50kb", "size: 20kb to 50kb"
    static ref LABELLED_SIZE_PATTERN: Regex =
        Regex::new(r"(?is)size\s*:\s*(\d+)(?:\s*kb)?\b.*?\b(\d+)\s*kb").unwrap();

    /// "jpg", "jpeg", "png"
    static ref FORMAT_PATTERN: Regex = Regex::new(r"(?i)\b(jpe?g|png)\b").unwrap();
}

/// 自由記述のルール文から Spec を読み取る
///
/// 寸法・サイズ範囲・形式をそれぞれ独立に探し、見つからない項目は既定値
/// (200x230, 20-50kb, jpg) で埋める。読み取れない文章でもエラーにはしないが、
/// 読み取った値が矛盾する場合（例: 50-20kb）は Spec の検証で拒否される。
pub fn parse_rule_text(text: &str) -> Result<Spec, RuleError> {
    let (width, height) = extract_dimensions(text).unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT));
    let (min_kb, max_kb) = extract_size_range(text).unwrap_or((DEFAULT_MIN_KB, DEFAULT_MAX_KB));
    let format = extract_format(text).unwrap_or(OutputFormat::Jpeg);

    tracing::debug!(width, height, min_kb, max_kb, format = %format, "parsed rule text");

    Spec::new(width, height, min_kb, max_kb, format)
}

/// 寸法を探す（"WxH" を優先し、無ければ "width: .. height: .."）
fn extract_dimensions(text: &str) -> Option<(u32, u32)> {
    first_pair(&DIMENSIONS_PATTERN, text).or_else(|| first_pair(&LABELLED_DIMENSIONS_PATTERN, text))
}

/// サイズ範囲を探す（"A-Bkb" を優先し、無ければ "size: A .. Bkb"）
fn extract_size_range(text: &str) -> Option<(f64, f64)> {
    first_pair(&SIZE_RANGE_PATTERN, text)
        .or_else(|| first_pair(&LABELLED_SIZE_PATTERN, text))
        .map(|(min, max)| (f64::from(min), f64::from(max)))
}

fn extract_format(text: &str) -> Option<OutputFormat> {
    FORMAT_PATTERN
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// 最初のマッチから 2 つの整数を取り出す（u32 に収まらない値は不一致扱い）
fn first_pair(pattern: &Regex, text: &str) -> Option<(u32, u32)> {
    let caps = pattern.captures(text)?;
    let first = caps[1].parse().ok()?;
    let second = caps[2].parse().ok()?;
    Some((first, second))
}
