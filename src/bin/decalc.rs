// パス: src/bin/decalc.rs
// 役割: Binary entrypoint that wires config, observers, and the REPL
// 意図: Offer a CLI executable for interactive calculation sessions
// 関連ファイル: src/repl/mod.rs, src/engine.rs, src/config.rs
//! 対話電卓の起動バイナリ。
//!
//! 環境変数由来の設定を CLI フラグで上書きし、観測者を登録してから
//! REPL を開始する。ログは `DECALC_LOG` で制御し stderr へ流す。

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use decalc::config::CalculatorConfig;
use decalc::engine::Calculator;
use decalc::observers::{AutoSaveObserver, LoggingObserver};
use decalc::persistence::HistoryStore;

#[derive(Debug, Parser)]
#[command(name = "decalc-repl", version, about = "Interactive decimal calculator")]
struct Cli {
    /// 履歴 CSV の保存先（環境変数 DECALC_HISTORY_FILE より優先）
    #[arg(long, value_name = "PATH")]
    history_file: Option<PathBuf>,
    /// 起動時に保存済み履歴を読み込まない
    #[arg(long)]
    no_load: bool,
}

fn main() {
    init_tracing_subscriber();
    let cli = Cli::parse();

    let mut config = CalculatorConfig::from_env();
    if let Some(path) = cli.history_file {
        config.history_file = path;
    }

    let mut calc = Calculator::with_config(config.clone());
    calc.add_observer(Box::new(LoggingObserver));
    if config.auto_save {
        calc.add_observer(Box::new(AutoSaveObserver::new(HistoryStore::new(
            config.history_file.clone(),
        ))));
    }
    if !cli.no_load {
        calc.load_history_if_present();
    }

    decalc::repl::run_repl(&mut calc);
}

fn init_tracing_subscriber() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DECALC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
