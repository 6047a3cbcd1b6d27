/// 出力画像の最大寸法（幅・高さ）
pub const MAX_DIMENSION: u32 = 4096;

/// 入力画像の最大ピクセル数（デコード後のメモリ枯渇を防止）
pub const MAX_PIXELS: u64 = 100_000_000;

/// アップロードの最大サイズ（10MB）
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 品質探索の試行回数（デフォルト）
pub const DEFAULT_MAX_ATTEMPTS: u32 = 20;

/// 品質探索の試行回数の下限
pub const MIN_MAX_ATTEMPTS: u32 = 15;

/// 品質の範囲（パーセント）
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// 探索の初期品質（スケール上限の約92%）
pub const INITIAL_QUALITY: u8 = 92;

/// サイズ超過時に下げる幅
pub const QUALITY_STEP_DOWN: u8 = 5;

/// サイズ不足時に上げる幅
pub const QUALITY_STEP_UP: u8 = 3;

/// ルール文字列から読み取れなかった場合の既定値
pub const DEFAULT_WIDTH: u32 = 200;
pub const DEFAULT_HEIGHT: u32 = 230;
pub const DEFAULT_MIN_KB: f64 = 20.0;
pub const DEFAULT_MAX_KB: f64 = 50.0;
