// パス: src/config.rs
// 役割: Environment-driven calculator configuration
// 意図: Keep tunables out of the engine and resolvable without flags
// 関連ファイル: src/engine.rs, src/persistence.rs, src/bin/decalc.rs
//! 電卓の設定。環境変数から解決し、CLI から上書きできる。
//!
//! - `DECALC_HISTORY_FILE`   履歴 CSV の保存先
//! - `DECALC_MAX_HISTORY`    確定履歴の上限件数（既定 1000）
//! - `DECALC_AUTO_SAVE`      自動保存の有効/無効（既定 on）
//! - `DECALC_MAX_INPUT_VALUE` 被演算子の絶対値上限（既定 無制限）

use std::env;
use std::path::PathBuf;

use rust_decimal::Decimal;

const DEFAULT_MAX_HISTORY: usize = 1000;
const HISTORY_FILE_NAME: &str = ".decalc_history.csv";

/// エンジンと永続化層が参照する設定値の束。
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    pub history_file: PathBuf,
    pub max_history_size: usize,
    pub auto_save: bool,
    pub max_input_value: Option<Decimal>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_path(),
            max_history_size: DEFAULT_MAX_HISTORY,
            auto_save: true,
            max_input_value: None,
        }
    }
}

impl CalculatorConfig {
    /// 環境変数を読み取って設定を構築する。解釈できない値は既定値に落とす。
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(path) = env::var_os("DECALC_HISTORY_FILE") {
            config.history_file = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("DECALC_MAX_HISTORY") {
            match raw.parse::<usize>() {
                Ok(n) if n > 0 => config.max_history_size = n,
                _ => tracing::warn!(value = %raw, "ignoring invalid DECALC_MAX_HISTORY"),
            }
        }
        if let Ok(raw) = env::var("DECALC_AUTO_SAVE") {
            match parse_bool(&raw) {
                Some(on) => config.auto_save = on,
                None => tracing::warn!(value = %raw, "ignoring invalid DECALC_AUTO_SAVE"),
            }
        }
        if let Ok(raw) = env::var("DECALC_MAX_INPUT_VALUE") {
            match raw.parse::<Decimal>() {
                Ok(limit) if limit.is_sign_positive() && !limit.is_zero() => {
                    config.max_input_value = Some(limit)
                }
                _ => tracing::warn!(value = %raw, "ignoring invalid DECALC_MAX_INPUT_VALUE"),
            }
        }
        config
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// 履歴ファイルの既定パスをユーザーのホームから決定する。
fn default_history_path() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .map(|home| home.join(HISTORY_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
}
