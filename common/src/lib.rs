//! Barcode Scan Common Library
//!
//! 商品バーコードの検証・分類と、デコーダ出力の安定化（確定判定）を行うコア。
//! カメラ・画素デコード・画面表示は外部に任せる。

pub mod types;
pub mod validator;
pub mod gs1;
pub mod stabilizer;
pub mod session;
pub mod decoder;
pub mod export;
pub mod error;

pub use types::{BarcodeRecord, RawDetection, Symbology};
pub use validator::{
    classify, expand_upce, identify_barcode_type, is_valid_ean13, is_valid_ean8,
    is_valid_upca, is_valid_upce, validate_barcode, Classification,
};
pub use gs1::ean_country;
pub use stabilizer::{DetectionBuffer, Observation, Stabilizer, StabilizerConfig};
pub use session::{ScanSession, ScanStats, SessionState};
pub use decoder::{CachingDecoder, Frame, FrameDecoder};
pub use error::{Error, Result};
