use thiserror::Error;

/// 画像フィット処理の統合エラー型
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// 呼び出し側に見せるエラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// ファイル種別・サイズ・プリセット名などの入力不正（処理前に拒否）
    InvalidInput,
    /// 元画像が読めない
    DecodeError,
    /// 出力形式が非対応、またはエンコーダの失敗
    EncodeError,
}

impl MediaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::Validation(_) | MediaError::Rule(_) => ErrorKind::InvalidInput,
            MediaError::Transform(err) => err.kind(),
        }
    }
}

/// ルール（Spec）導出エラー
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    #[error("invalid spec: {0}")]
    InvalidSpec(String),
}

/// 画像変換エラー
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("image resolution exceeds maximum ({width}x{height})")]
    ResolutionTooLarge { width: u32, height: u32 },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("decode failed: {0}")]
    DecodeFailed(String),

    #[error("encode failed: {0}")]
    EncodeFailed(String),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::InvalidParams(_) | TransformError::ResolutionTooLarge { .. } => {
                ErrorKind::InvalidInput
            }
            TransformError::DecodeFailed(_) => ErrorKind::DecodeError,
            TransformError::UnsupportedFormat(_) | TransformError::EncodeFailed(_) => {
                ErrorKind::EncodeError
            }
        }
    }
}
