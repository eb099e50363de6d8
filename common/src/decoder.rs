//! 外部デコーダとの境界
//!
//! 画素からバーコード文字列を得る処理（ZXing/Quagga等）は外部に任せ、
//! ここでは呼び出しの型と、同一フレームの再デコードを省くキャッシュだけを持つ。

use crate::types::RawDetection;
use log::debug;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};

/// キャッシュの既定件数
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// グレースケールのフレーム（行優先・1画素8bit）
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self { data, width, height }
    }
}

/// 外部デコーダ
///
/// 検出できなければ `None`（エラー扱いしない）。
pub trait FrameDecoder {
    fn decode(&mut self, frame: &Frame<'_>) -> Option<RawDetection>;
}

impl<F> FrameDecoder for F
where
    F: FnMut(&Frame<'_>) -> Option<RawDetection>,
{
    fn decode(&mut self, frame: &Frame<'_>) -> Option<RawDetection> {
        self(frame)
    }
}

/// フレームのハッシュ（SHA-256, hex）
pub fn frame_hash(frame: &Frame<'_>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(frame.width.to_le_bytes());
    hasher.update(frame.height.to_le_bytes());
    hasher.update(frame.data);
    hex::encode(hasher.finalize())
}

/// フレームハッシュをキーにデコード結果をキャッシュするラッパー
///
/// 未検出（`None`）も結果としてキャッシュする。容量を超えたら古い順に捨てる。
pub struct CachingDecoder<D> {
    inner: D,
    entries: HashMap<String, Option<RawDetection>>,
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<D: FrameDecoder> CachingDecoder<D> {
    pub fn new(inner: D) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: D, capacity: usize) -> Self {
        Self {
            inner,
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn insert(&mut self, hash: String, result: Option<RawDetection>) {
        if self.entries.insert(hash.clone(), result).is_none() {
            self.order.push_back(hash);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

impl<D: FrameDecoder> FrameDecoder for CachingDecoder<D> {
    fn decode(&mut self, frame: &Frame<'_>) -> Option<RawDetection> {
        let hash = frame_hash(frame);

        if let Some(cached) = self.entries.get(&hash) {
            self.hits += 1;
            debug!("フレームキャッシュヒット: {}", &hash[..12]);
            return cached.clone();
        }

        self.misses += 1;
        let result = self.inner.decode(frame);
        self.insert(hash, result.clone());
        result
    }
}
