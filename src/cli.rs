use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "barcode-scan")]
#[command(about = "商品バーコード検証・読取結果安定化ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// コードを検証して種別・原産国を表示
    Validate {
        /// 検証するコード
        #[arg(required = true)]
        codes: Vec<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// UPC-EをUPC-Aに展開
    Expand {
        /// UPC-Eコード（8桁）
        #[arg(required = true)]
        code: String,
    },

    /// デコーダの検出ログを安定化して確定コードを出力
    Scan {
        /// 検出ログ（JSON Lines）ファイル/フォルダ、`-` で標準入力
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ（省略時は表示のみ）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (csv/excel/json/both)（省略時は設定値）
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 確定に必要な連続一致回数（0で無効）
        #[arg(short = 'k', long)]
        consecutive: Option<usize>,

        /// 信頼度の下限（%、0で無効）
        #[arg(long)]
        min_confidence: Option<f32>,

        /// 直前の確定からの最小間隔（ミリ秒、0で無効）
        #[arg(long)]
        min_interval_ms: Option<u64>,

        /// 即時確定モード（連続一致・信頼度なし、間隔のみ）
        #[arg(long)]
        immediate: bool,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// 確定レコード（JSON）をCSV/Excelに変換
    Export {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (csv/excel/json/both)（省略時は設定値）
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 連続一致回数を設定（0で無効）
        #[arg(long)]
        set_consecutive: Option<usize>,

        /// 信頼度の下限を設定（0で無効）
        #[arg(long)]
        set_min_confidence: Option<f32>,

        /// 最小間隔を設定（ミリ秒、0で無効）
        #[arg(long)]
        set_min_interval: Option<u64>,

        /// 既定値に戻す
        #[arg(long)]
        reset: bool,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
    Json,
    /// CSV + Excel
    Both,
}

impl ExportFormat {
    /// 出力する拡張子
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Csv => &["csv"],
            ExportFormat::Excel => &["xlsx"],
            ExportFormat::Json => &["json"],
            ExportFormat::Both => &["csv", "xlsx"],
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "json" => Ok(ExportFormat::Json),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use csv, excel, json, or both", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Both => write!(f, "both"),
        }
    }
}
