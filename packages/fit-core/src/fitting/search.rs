use crate::constants::{QUALITY_STEP_DOWN, QUALITY_STEP_UP};
use crate::errors::TransformError;
use crate::fitting::encoder::QualityEncoder;
use crate::fitting::quality::Quality;
use crate::rules::SizeWindow;

/// 品質探索の結果（最後に試したエンコード）
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub bytes: Vec<u8>,
    pub size_kb: f64,
    pub quality: Quality,
    pub attempts: u32,
    pub valid: bool,
}

/// バイト数を KB に換算する
pub fn size_in_kb(len: usize) -> f64 {
    len as f64 / 1024.0
}

/// サイズが範囲に入るまで品質を調整しながら再エンコードする
///
/// 初期品質 92 から始め、範囲を超えたら 5 下げ、足りなければ 3 上げる。
/// 範囲に入るか試行回数を使い切った時点で、最後のエンコード結果を返す
/// （それ以前のより良い結果には戻らない）。エンコーダのエラーは即座に返す。
pub fn search_quality<E: QualityEncoder + ?Sized>(
    encoder: &mut E,
    window: SizeWindow,
    max_attempts: u32,
) -> Result<SearchOutcome, TransformError> {
    let max_attempts = max_attempts.max(1);
    let mut quality = Quality::INITIAL;
    let mut attempts = 0;

    loop {
        attempts += 1;
        let bytes = encoder.encode(quality)?;
        let size_kb = size_in_kb(bytes.len());
        let valid = window.contains(size_kb);

        tracing::debug!(
            attempt = attempts,
            quality = quality.percent(),
            size_kb,
            valid,
            "encoded candidate"
        );

        if valid || attempts >= max_attempts {
            return Ok(SearchOutcome {
                bytes,
                size_kb,
                quality,
                attempts,
                valid,
            });
        }

        quality = if size_kb > window.max_kb {
            quality.lower(QUALITY_STEP_DOWN)
        } else {
            quality.raise(QUALITY_STEP_UP)
        };
    }
}
