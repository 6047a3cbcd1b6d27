use crate::constants::MAX_UPLOAD_BYTES;
use crate::errors::MediaError;
use crate::transform::{sniff_format, SourceFormat};

/// 宣言された Content-Type として受け付けるもの
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/pjpeg", "image/png"];

/// アップロードされたファイルを検証する
///
/// 処理を始める前に、サイズ・宣言された Content-Type・実データの
/// マジックナンバーを確認し、JPEG / PNG 以外は拒否する。
pub fn validate_upload(content_type: Option<&str>, data: &[u8]) -> Result<SourceFormat, MediaError> {
    // 空ファイルチェック
    if data.is_empty() {
        return Err(MediaError::Validation("uploaded file is empty".to_string()));
    }

    // サイズチェック（10MB まで）
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(MediaError::Validation(format!(
            "uploaded file is too large ({} bytes, max {MAX_UPLOAD_BYTES})",
            data.len()
        )));
    }

    // 宣言された Content-Type（パラメータは無視）
    if let Some(declared) = content_type {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !ALLOWED_CONTENT_TYPES.contains(&essence.as_str()) {
            return Err(MediaError::Validation(format!(
                "unsupported content type: {declared} (JPEG or PNG required)"
            )));
        }
    }

    // 実データが JPEG / PNG であること
    sniff_format(data).ok_or_else(|| {
        MediaError::Validation("file content is not a JPEG or PNG image".to_string())
    })
}
