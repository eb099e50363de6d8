use barcode_scan::{cli, config, error, export, report, scanner};
use barcode_scan_common::{expand_upce, StabilizerConfig};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG があればそちらを優先
    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = Config::load()?;

    match cli.command {
        Commands::Validate { codes, json } => {
            let reports: Vec<report::ValidationReport> = codes
                .iter()
                .map(|code| report::ValidationReport::from_code(code.trim()))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for r in &reports {
                    println!("{}", r.render());
                }
            }
        }

        Commands::Expand { code } => {
            let upc_a = expand_upce(code.trim())
                .ok_or_else(|| error::BarcodeScanError::InvalidCode(format!("UPC-Eは8桁の数字です: {}", code)))?;
            println!("{}", upc_a);
        }

        Commands::Scan { input, output, format, consecutive, min_confidence, min_interval_ms, immediate, recursive } => {
            println!("📷 barcode-scan - 読取結果の確定\n");

            let mut stabilizer = if immediate {
                StabilizerConfig::immediate(
                    config.stabilizer.min_interval_ms.unwrap_or(barcode_scan_common::stabilizer::DEFAULT_MIN_INTERVAL_MS),
                )
            } else {
                config.stabilizer
            };
            if let Some(k) = consecutive {
                stabilizer.consecutive_reads = (k > 0).then_some(k);
            }
            if let Some(p) = min_confidence {
                stabilizer.min_confidence = (p > 0.0).then_some(p);
            }
            if let Some(ms) = min_interval_ms {
                stabilizer.min_interval_ms = (ms > 0).then_some(ms);
            }
            log::debug!("安定化設定: {:?}", stabilizer);

            // 1. 検出ログ読み込み
            println!("[1/3] 検出ログを読み込み中...");
            let detections = scanner::load_detections(&input, recursive)?;
            println!("✔ {}件の検出\n", detections.len());

            // 2. 安定化
            println!("[2/3] 確定判定中...");
            let session = scanner::stabilize(&detections, stabilizer);
            for record in session.records() {
                let r = report::ValidationReport::from_code(&record.text);
                println!("  {} [{}]", r.render(), record.timestamp.format("%H:%M:%S"));
            }
            let stats = session.stats();
            println!(
                "✔ 確定 {} / 保留 {} / 信頼度不足 {} / 間隔内 {} / 重複 {}",
                stats.confirmed, stats.pending, stats.low_confidence, stats.throttled, stats.duplicates
            );
            println!("  {}\n", session.summary());

            // 3. 出力
            match output {
                Some(output) => {
                    println!("[3/3] 出力中...");
                    let format = config.resolve_format(format)?;
                    let stem = export::default_file_stem(&config.file_prefix);
                    export::export_records(session.records(), format, &output, &stem)?;
                }
                None => println!("[3/3] 出力先未指定のためスキップ (--output)"),
            }

            println!("\n✅ 完了");
        }

        Commands::Export { input, format, output } => {
            println!("📄 barcode-scan - エクスポート\n");

            let format = config.resolve_format(format)?;
            let records = export::json::read_json(&input)?;
            println!("✔ {}件のレコード", records.len());

            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .unwrap_or_else(|| export::default_file_stem(&config.file_prefix));

            export::export_records(&records, format, &output_dir, &stem)?;

            println!("\n✅ エクスポート完了");
        }

        Commands::Config { set_consecutive, set_min_confidence, set_min_interval, reset, show } => {
            let mut config = config;
            let mut changed = false;

            if reset {
                config.reset();
                changed = true;
            }
            if let Some(k) = set_consecutive {
                config.set_consecutive_reads(k);
                changed = true;
            }
            if let Some(p) = set_min_confidence {
                config.set_min_confidence(p);
                changed = true;
            }
            if let Some(ms) = set_min_interval {
                config.set_min_interval_ms(ms);
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                let off = || "無効".to_string();
                println!("設定:");
                println!(
                    "  連続一致回数: {}",
                    config.stabilizer.consecutive_reads.map_or_else(off, |k| k.to_string())
                );
                println!(
                    "  信頼度の下限: {}",
                    config.stabilizer.min_confidence.map_or_else(off, |p| format!("{}%", p))
                );
                println!(
                    "  最小間隔: {}",
                    config.stabilizer.min_interval_ms.map_or_else(off, |ms| format!("{}ms", ms))
                );
                println!("  ファイル名接頭辞: {}", config.file_prefix);
                println!("  既定の出力形式: {}", config.default_format);
            }
        }
    }

    Ok(())
}
