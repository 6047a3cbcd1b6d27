use std::path::Path;

use fit_core::{
    derive_spec, fit, validate_upload, FitConfig, MediaError, ProcessingResult, RuleSource,
};
use tempfile::NamedTempFile;

/// 処理中の失敗
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("failed to read uploaded file: {0}")]
    Io(#[from] std::io::Error),
}

/// 一時ファイルに保存済みのアップロード 1 件分
#[derive(Debug)]
pub struct FitRequest {
    pub upload: NamedTempFile,
    pub content_type: Option<String>,
    pub preset: Option<String>,
    pub rule: Option<String>,
}

/// アップロードを Spec に合わせる
///
/// 成功・失敗にかかわらず一時ファイルは必ず削除する。
pub fn process_upload(
    request: FitRequest,
    config: &FitConfig,
) -> Result<ProcessingResult, ProcessError> {
    let FitRequest {
        upload,
        content_type,
        preset,
        rule,
    } = request;

    let result = fit_upload(
        upload.path(),
        content_type.as_deref(),
        preset.as_deref(),
        rule.as_deref(),
        config,
    );

    let path = upload.path().to_path_buf();
    if let Err(e) = upload.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove uploaded file");
    }

    result
}

/// 検証 → Spec 導出 → デコード・リサイズ・品質探索
fn fit_upload(
    path: &Path,
    content_type: Option<&str>,
    preset: Option<&str>,
    rule: Option<&str>,
    config: &FitConfig,
) -> Result<ProcessingResult, ProcessError> {
    let data = std::fs::read(path)?;

    // 入力不正は処理を始める前に拒否する
    let source_format = validate_upload(content_type, &data)?;
    let spec = derive_spec(RuleSource::from_request(preset, rule)).map_err(MediaError::from)?;

    tracing::info!(
        source = source_format.content_type(),
        bytes = data.len(),
        width = spec.width(),
        height = spec.height(),
        min_kb = spec.min_kb(),
        max_kb = spec.max_kb(),
        format = %spec.format(),
        "fitting uploaded image"
    );

    let result = fit(&data, &spec, config).map_err(MediaError::from)?;
    Ok(result)
}
