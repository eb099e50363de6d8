mod event;

pub use event::{DetectionEvent, ScannedDetection};

use crate::error::{BarcodeScanError, Result};
use barcode_scan_common::{ScanSession, StabilizerConfig};
use chrono::Local;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LOG_EXTENSIONS: &[&str] = &["jsonl", "ndjson", "JSONL", "NDJSON"];

/// 検出ログを探す
///
/// - ファイルならそのまま
/// - フォルダなら直下（`recursive` で再帰）の `.jsonl` / `.ndjson` をパス順に
pub fn find_detection_logs(input: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(BarcodeScanError::InputNotFound(input.display().to_string()));
    }

    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut logs: Vec<PathBuf> = WalkDir::new(input)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(e) => {
                log::warn!("読み込めないエントリをスキップ: {}", e);
                None
            }
        })
        .filter(|path| path.is_file() && is_log_file(path))
        .collect();

    logs.sort();
    Ok(logs)
}

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| LOG_EXTENSIONS.iter().any(|&e| e == ext.to_string_lossy()))
        .unwrap_or(false)
}

/// JSON Lines を読み、成功した読取だけを順番に返す
///
/// 空行は読み飛ばす。JSONとして不正な行はエラー（ファイル名・行番号付き）。
pub fn read_detections<R: BufRead>(reader: R, source: &str) -> Result<Vec<ScannedDetection>> {
    let mut detections = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event: DetectionEvent = serde_json::from_str(trimmed).map_err(|e| {
            BarcodeScanError::InvalidDetection {
                file: source.to_string(),
                line: idx + 1,
                message: e.to_string(),
            }
        })?;

        match event.into_detection() {
            Some(detection) => detections.push(detection),
            None => log::debug!("{}:{}: 読取なしのイベントを無視", source, idx + 1),
        }
    }

    Ok(detections)
}

/// 1ファイル分を読む
pub fn read_detection_log(path: &Path) -> Result<Vec<ScannedDetection>> {
    let file = File::open(path)?;
    read_detections(BufReader::new(file), &path.display().to_string())
}

/// 入力（ファイル/フォルダ/`-`）からすべての検出を順番に読む
pub fn load_detections(input: &Path, recursive: bool) -> Result<Vec<ScannedDetection>> {
    if input.as_os_str() == "-" {
        let stdin = std::io::stdin();
        return read_detections(stdin.lock(), "<stdin>");
    }

    let logs = find_detection_logs(input, recursive)?;
    if logs.is_empty() {
        return Err(BarcodeScanError::NoDetectionLogs(input.display().to_string()));
    }

    let mut detections = Vec::new();
    for log_path in &logs {
        let mut batch = read_detection_log(log_path)?;
        log::info!("{}: {}件", log_path.display(), batch.len());
        detections.append(&mut batch);
    }

    Ok(detections)
}

/// 検出を順番にセッションへ流す
///
/// 検出時刻がなければ現在時刻を使う。
pub fn stabilize(detections: &[ScannedDetection], config: StabilizerConfig) -> ScanSession {
    let mut session = ScanSession::new(config);
    session.start();

    for scanned in detections {
        let now = scanned.at.unwrap_or_else(Local::now);
        session.observe_at(&scanned.detection, now);
    }

    session.stop();
    session
}
