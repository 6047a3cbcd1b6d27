use std::io::Write;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fit_core::{
    presets, ErrorKind, MediaError, Preset, ProcessingResult, ValidationReport, MAX_UPLOAD_BYTES,
};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::process::{process_upload, FitRequest, ProcessError};
use crate::AppState;

/// 処理結果のレスポンス
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    pub width: u32,
    pub height: u32,
    pub file_size_kb: f64,
    pub format: String,
    pub valid: bool,
    /// data URL (data:<mime>;base64,...)
    pub encoded_image: String,
    pub quality: u8,
    pub attempts: u32,
}

impl From<ProcessingResult> for ProcessResponse {
    fn from(result: ProcessingResult) -> Self {
        let report = ValidationReport::from(&result);
        let encoded_image = format!(
            "data:{};base64,{}",
            result.format.content_type(),
            STANDARD.encode(&result.bytes)
        );

        Self {
            width: report.width,
            height: report.height,
            file_size_kb: report.size_kb,
            format: report.format,
            valid: report.valid,
            encoded_image,
            quality: result.quality,
            attempts: result.attempts,
        }
    }
}

pub async fn list_presets() -> Json<&'static [Preset]> {
    Json(presets())
}

/// multipart の image / preset / rule を受け取り、Spec に合わせた画像を返す
pub async fn process(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let mut upload: Option<(NamedTempFile, Option<String>)> = None;
    let mut preset = None;
    let mut rule = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                check_declared_type(content_type.as_deref())?;
                let file = save_field(field, &state).await?;
                upload = Some((file, content_type));
            }
            "preset" => preset = Some(field.text().await?),
            "rule" => rule = Some(field.text().await?),
            other => {
                tracing::debug!(field = %other, "ignoring unknown multipart field");
            }
        }
    }

    let (upload, content_type) =
        upload.ok_or_else(|| AppError::BadRequest("missing image field".to_string()))?;

    tracing::info!(preset = ?preset, rule = ?rule, "processing upload");

    let request = FitRequest {
        upload,
        content_type,
        preset,
        rule,
    };
    let config = state.config.fit;
    let result = tokio::task::spawn_blocking(move || process_upload(request, &config))
        .await
        .map_err(|e| AppError::Internal(format!("processing task failed: {e}")))??;

    Ok(Json(ProcessResponse::from(result)))
}

/// 宣言された Content-Type が画像でなければ保存前に拒否する
fn check_declared_type(content_type: Option<&str>) -> Result<(), AppError> {
    match content_type {
        Some(declared) if !declared.to_ascii_lowercase().starts_with("image/") => {
            Err(AppError::BadRequest(format!(
                "unsupported content type: {declared} (JPEG or PNG required)"
            )))
        }
        _ => Ok(()),
    }
}

/// アップロードを一時ファイルに書き出す（10MB を超えたら中断）
///
/// 一時ファイルはドロップ時に削除されるので、途中で失敗しても残らない。
async fn save_field(mut field: Field<'_>, state: &AppState) -> Result<NamedTempFile, AppError> {
    let mut file = NamedTempFile::new_in(&state.config.upload_dir)
        .map_err(|e| AppError::Internal(format!("failed to create upload file: {e}")))?;
    let mut written = 0usize;

    while let Some(chunk) = field.chunk().await? {
        written += chunk.len();
        if written > MAX_UPLOAD_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "upload exceeds {MAX_UPLOAD_BYTES} bytes"
            )));
        }
        file.write_all(&chunk)
            .map_err(|e| AppError::Internal(format!("failed to write upload file: {e}")))?;
    }

    tracing::debug!(path = %file.path().display(), bytes = written, "upload saved");
    Ok(file)
}

/// エンコード失敗を示すエラーコード（クライアントはこれをサーバー障害と区別する）
pub const ENCODE_FAILED_CODE: &str = "encode_failed";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge(String),
    DecodeFailed(String),
    /// サーバーは応答できたがエンコードに失敗した
    EncodeFailed(String),
    Internal(String),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::InvalidInput => {
                tracing::warn!(error = %message, "invalid input");
                AppError::BadRequest(message)
            }
            ErrorKind::DecodeError => {
                tracing::warn!(error = %message, "source image could not be decoded");
                AppError::DecodeFailed(message)
            }
            ErrorKind::EncodeError => {
                tracing::error!(error = %message, "image encoding failed");
                AppError::EncodeFailed(message)
            }
        }
    }
}

impl From<ProcessError> for AppError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Media(media_err) => media_err.into(),
            ProcessError::Io(e) => AppError::Internal(format!("upload io error: {e}")),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        let status = err.status();
        let message = err.body_text();
        tracing::warn!(status = %status, error = %message, "multipart error");
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            AppError::BadRequest(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg),
            AppError::DecodeFailed(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "decode_failed", msg),
            AppError::EncodeFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, ENCODE_FAILED_CODE, msg),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "internal server error".to_string(),
                )
            }
        };

        let body = serde_json::json!({ "error": message, "code": code });
        (status, Json(body)).into_response()
    }
}
