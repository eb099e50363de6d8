//! 読取結果の安定化モジュール
//!
//! デコーダのフレーム単位の生出力はノイズが多いため、以下の順で確定判定を行う:
//! 1. 信頼度フィルタ（閾値未満は破棄、バッファに入れない）
//! 2. 最小間隔フィルタ（直前の確定から一定時間内は破棄）
//! 3. 連続一致バッファ（直近K件がすべて同じコードになるまで保留）
//! 4. 重複抑止（セッション内で確定済みのコードは破棄）
//!
//! 単一の検出ストリームから順番に呼ばれる前提で、スレッドセーフではない。

use crate::types::{BarcodeRecord, RawDetection};
use crate::validator;
use chrono::{DateTime, Local};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// 連続一致の既定回数
pub const DEFAULT_CONSECUTIVE_READS: usize = 3;

/// 信頼度の既定閾値（%）
pub const DEFAULT_MIN_CONFIDENCE: f32 = 70.0;

/// 即時確定ポリシーの既定間隔（ミリ秒）
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 1000;

/// 安定化の設定
///
/// 各項目は `None` で無効。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// 確定に必要な連続一致回数
    pub consecutive_reads: Option<usize>,
    /// 信頼度の下限（%）
    pub min_confidence: Option<f32>,
    /// 直前の確定からの最小間隔（ミリ秒）
    pub min_interval_ms: Option<u64>,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self::consecutive(DEFAULT_CONSECUTIVE_READS, Some(DEFAULT_MIN_CONFIDENCE))
    }
}

impl StabilizerConfig {
    /// 連続一致ポリシー
    pub fn consecutive(reads: usize, min_confidence: Option<f32>) -> Self {
        Self {
            consecutive_reads: Some(reads),
            min_confidence,
            min_interval_ms: None,
        }
    }

    /// 即時確定ポリシー（初見のコードを間隔制限のみで確定）
    pub fn immediate(min_interval_ms: u64) -> Self {
        Self {
            consecutive_reads: None,
            min_confidence: None,
            min_interval_ms: Some(min_interval_ms),
        }
    }

    /// バッファ容量（1以下は連続一致なしと同じ）
    fn buffer_capacity(&self) -> Option<usize> {
        self.consecutive_reads.filter(|&k| k > 1)
    }
}

/// 連続一致判定用の直近読取バッファ（古い順）
#[derive(Debug, Clone)]
pub struct DetectionBuffer {
    entries: VecDeque<String>,
    capacity: usize,
}

impl DetectionBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// 追加し、容量を超えた分を古い順に捨てる
    pub fn push(&mut self, text: &str) {
        self.entries.push_back(text.to_string());
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// 満杯かつ全件が `text` と一致
    pub fn is_stable(&self, text: &str) -> bool {
        self.entries.len() == self.capacity && self.entries.iter().all(|e| e == text)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// 1回の観測の判定結果
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    /// 確定（新しいレコード）
    Confirmed(BarcodeRecord),
    /// 連続一致待ち
    Pending,
    /// 信頼度不足
    LowConfidence,
    /// 最小間隔内
    Throttled,
    /// セッション内で確定済み
    Duplicate,
}

impl Observation {
    pub fn record(&self) -> Option<&BarcodeRecord> {
        match self {
            Observation::Confirmed(record) => Some(record),
            _ => None,
        }
    }

    pub fn into_record(self) -> Option<BarcodeRecord> {
        match self {
            Observation::Confirmed(record) => Some(record),
            _ => None,
        }
    }
}

/// 検出ストリームの安定化器
#[derive(Debug, Clone)]
pub struct Stabilizer {
    config: StabilizerConfig,
    buffer: DetectionBuffer,
    seen: HashSet<String>,
    last_accepted: Option<DateTime<Local>>,
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new(StabilizerConfig::default())
    }
}

impl Stabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            buffer: DetectionBuffer::new(config.buffer_capacity().unwrap_or(1)),
            config,
            seen: HashSet::new(),
            last_accepted: None,
        }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// 設定を差し替える（バッファは作り直し、確定済み集合は維持）
    pub fn set_config(&mut self, config: StabilizerConfig) {
        self.buffer = DetectionBuffer::new(config.buffer_capacity().unwrap_or(1));
        self.config = config;
    }

    pub fn buffer(&self) -> &DetectionBuffer {
        &self.buffer
    }

    /// 確定済みかどうか
    pub fn is_seen(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// 確定済み集合から外す（再読取を許可）
    pub fn forget(&mut self, text: &str) -> bool {
        self.seen.remove(text)
    }

    /// バッファ・確定済み集合・最終確定時刻をすべて消去
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.seen.clear();
        self.last_accepted = None;
    }

    /// 現在時刻で観測し、確定した場合のみレコードを返す
    pub fn observe(&mut self, detection: &RawDetection) -> Option<BarcodeRecord> {
        self.observe_at(detection, Local::now())
    }

    pub fn observe_at(&mut self, detection: &RawDetection, now: DateTime<Local>) -> Option<BarcodeRecord> {
        self.evaluate_at(detection, now).into_record()
    }

    /// 現在時刻で観測し、判定結果を返す
    pub fn evaluate(&mut self, detection: &RawDetection) -> Observation {
        self.evaluate_at(detection, Local::now())
    }

    /// 指定時刻で観測し、判定結果を返す
    pub fn evaluate_at(&mut self, detection: &RawDetection, now: DateTime<Local>) -> Observation {
        let text = detection.text.as_str();

        if let (Some(min), Some(confidence)) = (self.config.min_confidence, detection.confidence) {
            if confidence.is_nan() || confidence < min {
                debug!("信頼度不足で破棄: {} ({:.1} < {:.1})", text, confidence, min);
                return Observation::LowConfidence;
            }
        }

        if let (Some(interval_ms), Some(last)) = (self.config.min_interval_ms, self.last_accepted) {
            let elapsed = now.signed_duration_since(last).num_milliseconds();
            if elapsed < i64::try_from(interval_ms).unwrap_or(i64::MAX) {
                debug!("間隔不足で破棄: {} ({}ms)", text, elapsed);
                return Observation::Throttled;
            }
        }

        if self.config.buffer_capacity().is_some() {
            self.buffer.push(text);
            if !self.buffer.is_stable(text) {
                debug!("連続一致待ち: {} ({}/{})", text, self.buffer.len(), self.buffer.capacity());
                return Observation::Pending;
            }
        }

        self.buffer.clear();

        if self.seen.contains(text) {
            debug!("確定済みのため破棄: {}", text);
            return Observation::Duplicate;
        }

        let classification = validator::classify(text);
        let record = BarcodeRecord {
            text: text.to_string(),
            symbology: classification.symbology,
            is_valid: classification.is_valid,
            origin_info: classification.origin_info,
            timestamp: now,
            confidence: detection.confidence,
        };

        self.seen.insert(text.to_string());
        self.last_accepted = Some(now);
        info!("確定: {} ({}, valid={})", record.text, record.symbology, record.is_valid);

        Observation::Confirmed(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Symbology;
    use chrono::Duration;

    fn detection(text: &str) -> RawDetection {
        RawDetection::new(text, "UPC_A")
    }

    #[test]
    fn test_buffer_fifo_eviction() {
        let mut buffer = DetectionBuffer::new(3);
        for text in ["a", "b", "c", "d"] {
            buffer.push(text);
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.iter().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_buffer_stability_requires_full_capacity() {
        let mut buffer = DetectionBuffer::new(3);
        buffer.push("x");
        buffer.push("x");
        assert!(!buffer.is_stable("x"));
        buffer.push("x");
        assert!(buffer.is_stable("x"));
        assert!(!buffer.is_stable("y"));
    }

    #[test]
    fn test_third_consecutive_read_confirms() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(3, None));
        let d = detection("012345678905");

        assert!(stabilizer.observe(&d).is_none());
        assert!(stabilizer.observe(&d).is_none());

        let record = stabilizer.observe(&d).expect("3回目で確定するはず");
        assert_eq!(record.text, "012345678905");
        assert_eq!(record.symbology, Symbology::UpcA);
        assert!(record.is_valid);
        assert!(record.origin_info.is_none());
        assert!(stabilizer.buffer().is_empty());
    }

    #[test]
    fn test_duplicate_suppressed_in_session() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(3, None));
        let d = detection("012345678905");

        for _ in 0..3 {
            stabilizer.observe(&d);
        }
        assert!(stabilizer.is_seen("012345678905"));

        assert_eq!(stabilizer.evaluate(&d), Observation::Pending);
        assert_eq!(stabilizer.evaluate(&d), Observation::Pending);
        assert_eq!(stabilizer.evaluate(&d), Observation::Duplicate);
        assert!(stabilizer.buffer().is_empty());
    }

    #[test]
    fn test_interleaved_reads_do_not_confirm() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(3, None));

        assert!(stabilizer.observe(&detection("4006381333931")).is_none());
        assert!(stabilizer.observe(&detection("4006381333931")).is_none());
        assert!(stabilizer.observe(&detection("4006381333932")).is_none());
        assert!(stabilizer.observe(&detection("4006381333931")).is_none());
        assert!(stabilizer.observe(&detection("4006381333931")).is_none());
        // 誤読がバッファから押し出されて初めて確定
        assert!(stabilizer.observe(&detection("4006381333931")).is_some());
    }

    #[test]
    fn test_low_confidence_not_buffered() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(3, Some(70.0)));
        let good = detection("012345678905").with_confidence(90.0);
        let weak = detection("012345678905").with_confidence(65.0);

        stabilizer.observe(&good);
        stabilizer.observe(&good);
        assert_eq!(stabilizer.buffer().len(), 2);

        assert_eq!(stabilizer.evaluate(&weak), Observation::LowConfidence);
        assert_eq!(stabilizer.buffer().len(), 2);

        let record = stabilizer.observe(&good).expect("確定するはず");
        assert_eq!(record.confidence, Some(90.0));
    }

    #[test]
    fn test_nan_confidence_rejected() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(1, Some(70.0)));
        let d = detection("012345678905").with_confidence(f32::NAN);
        assert_eq!(stabilizer.evaluate(&d), Observation::LowConfidence);
        assert!(!stabilizer.is_seen("012345678905"));
    }

    #[test]
    fn test_huge_consecutive_reads_does_not_preallocate() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(usize::MAX, None));
        assert_eq!(stabilizer.buffer().capacity(), usize::MAX);

        for _ in 0..5 {
            assert_eq!(stabilizer.evaluate(&detection("012345678905")), Observation::Pending);
        }
        assert_eq!(stabilizer.buffer().len(), 5);

        stabilizer.set_config(StabilizerConfig::consecutive(1_000_000_000, None));
        assert!(stabilizer.buffer().is_empty());
    }

    #[test]
    fn test_missing_confidence_passes_threshold() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(1, Some(70.0)));
        assert!(stabilizer.observe(&detection("96385074")).is_some());
    }

    #[test]
    fn test_confidence_at_threshold_accepted() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(1, Some(70.0)));
        let d = detection("96385074").with_confidence(70.0);
        assert!(stabilizer.observe(&d).is_some());
    }

    #[test]
    fn test_immediate_policy_throttles_by_interval() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::immediate(1000));
        let t0 = Local::now();

        let first = stabilizer.observe_at(&detection("4006381333931"), t0);
        assert!(first.is_some());

        let too_soon = stabilizer.evaluate_at(&detection("96385074"), t0 + Duration::milliseconds(400));
        assert_eq!(too_soon, Observation::Throttled);

        let later = stabilizer.observe_at(&detection("96385074"), t0 + Duration::milliseconds(1000));
        assert!(later.is_some());
    }

    #[test]
    fn test_immediate_policy_duplicate_does_not_reset_interval() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::immediate(1000));
        let t0 = Local::now();

        stabilizer.observe_at(&detection("4006381333931"), t0);
        let dup = stabilizer.evaluate_at(&detection("4006381333931"), t0 + Duration::milliseconds(1500));
        assert_eq!(dup, Observation::Duplicate);

        // 重複は確定扱いではないので間隔の起点は t0 のまま
        let next = stabilizer.evaluate_at(&detection("96385074"), t0 + Duration::milliseconds(1600));
        assert!(matches!(next, Observation::Confirmed(_)));
    }

    #[test]
    fn test_invalid_code_still_recorded_as_unknown() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(1, None));
        let record = stabilizer.observe(&detection("4006381333932")).unwrap();
        assert!(!record.is_valid);
        assert_eq!(record.symbology, Symbology::Unknown);
        assert!(record.origin_info.is_none());
    }

    #[test]
    fn test_forget_allows_rescan() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig::consecutive(1, None));
        let d = detection("96385074");

        assert!(stabilizer.observe(&d).is_some());
        assert!(stabilizer.observe(&d).is_none());
        assert!(stabilizer.forget("96385074"));
        assert!(stabilizer.observe(&d).is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut stabilizer = Stabilizer::new(StabilizerConfig {
            consecutive_reads: Some(2),
            min_confidence: None,
            min_interval_ms: Some(5000),
        });
        let t0 = Local::now();
        let d = detection("96385074");

        stabilizer.observe_at(&d, t0);
        stabilizer.observe_at(&d, t0);
        assert!(stabilizer.is_seen("96385074"));

        stabilizer.observe_at(&detection("4006381333931"), t0);
        stabilizer.reset();

        assert!(!stabilizer.is_seen("96385074"));
        assert!(stabilizer.buffer().is_empty());
        stabilizer.observe_at(&d, t0);
        assert!(stabilizer.observe_at(&d, t0).is_some());
    }

    #[test]
    fn test_set_config_rebuilds_buffer() {
        let mut stabilizer = Stabilizer::default();
        assert_eq!(stabilizer.buffer().capacity(), DEFAULT_CONSECUTIVE_READS);

        stabilizer.set_config(StabilizerConfig::consecutive(5, None));
        assert_eq!(stabilizer.buffer().capacity(), 5);
        assert!(stabilizer.buffer().is_empty());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: StabilizerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, StabilizerConfig::default());

        let config: StabilizerConfig =
            serde_json::from_str(r#"{"consecutive_reads": null, "min_interval_ms": 1000}"#).unwrap();
        assert_eq!(config.consecutive_reads, None);
        assert_eq!(config.min_interval_ms, Some(1000));
    }
}
