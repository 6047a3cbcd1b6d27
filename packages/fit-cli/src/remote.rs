use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fit_core::ValidationReport;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// サーバーがエンコード失敗時に返すエラーコード
const ENCODE_FAILED_CODE: &str = "encode_failed";

/// サーバー呼び出しの失敗
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// 接続できない・サーバー側の障害（ローカル処理に切り替える対象）
    #[error("server unavailable: {0}")]
    Unavailable(String),

    /// 入力不正としてサーバーに拒否された
    #[error("server rejected the request ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// サーバーは稼働しているがエンコードに失敗した
    #[error("server failed to process the image ({status}): {message}")]
    Failed { status: StatusCode, message: String },

    #[error("invalid server response: {0}")]
    InvalidResponse(String),
}

/// サーバーのレスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProcessPayload {
    width: u32,
    height: u32,
    file_size_kb: f64,
    format: String,
    valid: bool,
    encoded_image: String,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// サーバーで処理した結果
#[derive(Debug)]
pub struct RemoteResult {
    pub bytes: Vec<u8>,
    pub report: ValidationReport,
}

/// fit-server の HTTP クライアント
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 画像をアップロードしてサーバー側でサイズ合わせを行う
    pub fn process(
        &self,
        data: Vec<u8>,
        content_type: &str,
        preset: Option<&str>,
        rule: Option<&str>,
    ) -> Result<RemoteResult, RemoteError> {
        let url = format!("{}/api/process", self.base_url);

        let image = Part::bytes(data)
            .file_name("upload")
            .mime_str(content_type)
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        let mut form = Form::new().part("image", image);
        if let Some(preset) = preset {
            form = form.text("preset", preset.to_string());
        }
        if let Some(rule) = rule {
            form = form.text("rule", rule.to_string());
        }

        tracing::debug!(url = %url, "sending image to server");
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| RemoteError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_else(|e| {
                tracing::debug!(status = %status, error = %e, "failed to read error body");
                String::new()
            });
            return Err(classify_failure(status, &body));
        }

        let payload: ProcessPayload = response
            .json()
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;
        payload.into_result()
    }
}

impl ProcessPayload {
    fn into_result(self) -> Result<RemoteResult, RemoteError> {
        let bytes = decode_data_url(&self.encoded_image)?;
        Ok(RemoteResult {
            bytes,
            report: ValidationReport {
                width: self.width,
                height: self.height,
                size_kb: self.file_size_kb,
                format: self.format,
                valid: self.valid,
            },
        })
    }
}

/// 失敗ステータスを分類する
///
/// エンコード失敗のコードが付いた応答は処理失敗、それ以外の 5xx はサーバー障害。
fn classify_failure(status: StatusCode, body: &str) -> RemoteError {
    let (message, code) = match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => (payload.error, payload.code),
        Err(_) => (body.trim().to_string(), None),
    };

    if code.as_deref() == Some(ENCODE_FAILED_CODE) {
        RemoteError::Failed { status, message }
    } else if status.is_server_error() {
        RemoteError::Unavailable(format!("{status}: {message}"))
    } else {
        RemoteError::Rejected { status, message }
    }
}

/// "data:<mime>;base64,<payload>" を復号する
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, RemoteError> {
    let (header, payload) = data_url
        .split_once(',')
        .ok_or_else(|| RemoteError::InvalidResponse("malformed data URL".to_string()))?;
    if !header.starts_with("data:") || !header.ends_with(";base64") {
        return Err(RemoteError::InvalidResponse(format!(
            "unexpected data URL header: {header}"
        )));
    }

    STANDARD
        .decode(payload)
        .map_err(|e| RemoteError::InvalidResponse(format!("invalid base64 payload: {e}")))
}
