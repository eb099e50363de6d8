use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarcodeScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力が見つかりません: {0}")]
    InputNotFound(String),

    #[error("検出ログが見つかりません: {0}")]
    NoDetectionLogs(String),

    #[error("検出イベントが不正: {file}:{line}: {message}")]
    InvalidDetection {
        file: String,
        line: usize,
        message: String,
    },

    #[error("バーコード形式が不正: {0}")]
    InvalidCode(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] barcode_scan_common::Error),
}

pub type Result<T> = std::result::Result<T, BarcodeScanError>;
