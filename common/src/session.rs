//! 読取セッション
//!
//! 確定レコードの一覧（確定順）と安定化器をまとめて保持する。
//! 画面表示・エクスポート・音やバイブレーションは呼び出し側の責務。

use crate::stabilizer::{Observation, Stabilizer, StabilizerConfig};
use crate::types::{BarcodeRecord, RawDetection};
use chrono::{DateTime, Local};
use log::{debug, info};

/// セッション状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// 読取停止中（観測は無視される）
    #[default]
    Idle,
    /// 読取中
    Armed,
}

/// 観測結果の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub observed: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub low_confidence: usize,
    pub throttled: usize,
    pub duplicates: usize,
    pub ignored: usize,
}

impl ScanStats {
    pub fn record(&mut self, observation: Option<&Observation>) {
        self.observed += 1;
        match observation {
            Some(Observation::Confirmed(_)) => self.confirmed += 1,
            Some(Observation::Pending) => self.pending += 1,
            Some(Observation::LowConfidence) => self.low_confidence += 1,
            Some(Observation::Throttled) => self.throttled += 1,
            Some(Observation::Duplicate) => self.duplicates += 1,
            None => self.ignored += 1,
        }
    }
}

/// 読取セッション
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    stabilizer: Stabilizer,
    records: Vec<BarcodeRecord>,
    state: SessionState,
    stats: ScanStats,
}

impl ScanSession {
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            stabilizer: Stabilizer::new(config),
            ..Default::default()
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Armed
    }

    /// 読取開始
    pub fn start(&mut self) {
        info!("読取開始");
        self.state = SessionState::Armed;
    }

    /// 読取停止（レコードは保持）
    pub fn stop(&mut self) {
        info!("読取停止 ({}件)", self.records.len());
        self.state = SessionState::Idle;
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    pub fn set_config(&mut self, config: StabilizerConfig) {
        self.stabilizer.set_config(config);
    }

    /// 観測（現在時刻）
    ///
    /// 停止中は `None`。確定したレコードは一覧に追加される。
    pub fn observe(&mut self, detection: &RawDetection) -> Option<Observation> {
        self.observe_at(detection, Local::now())
    }

    /// 観測（指定時刻）
    pub fn observe_at(&mut self, detection: &RawDetection, now: DateTime<Local>) -> Option<Observation> {
        let observation = if self.is_active() {
            let observation = self.stabilizer.evaluate_at(detection, now);
            if let Observation::Confirmed(record) = &observation {
                self.records.push(record.clone());
            }
            Some(observation)
        } else {
            debug!("停止中のため無視: {}", detection.text);
            None
        };

        self.stats.record(observation.as_ref());
        observation
    }

    /// 確定レコード（確定順）
    pub fn records(&self) -> &[BarcodeRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<BarcodeRecord> {
        self.records
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 1件削除（同じコードの再読取が可能になる）
    pub fn remove(&mut self, text: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.text != text);
        let removed = self.records.len() != before;
        if removed {
            self.stabilizer.forget(text);
            debug!("削除: {}", text);
        }
        removed
    }

    /// 全件削除（重複判定・バッファもリセット）
    pub fn clear_all(&mut self) {
        info!("全件削除 ({}件)", self.records.len());
        self.records.clear();
        self.stabilizer.reset();
    }

    /// 件数表示
    pub fn summary(&self) -> String {
        let n = self.records.len();
        format!("Total: {} código{}", n, if n != 1 { "s" } else { "" })
    }
}
