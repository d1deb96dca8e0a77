// パス: src/observers.rs
// 役割: Observer trait and the logging / auto-save implementations
// 意図: Decouple side effects from the engine's computation path
// 関連ファイル: src/engine.rs, src/persistence.rs, src/calculation.rs
//! 新しい計算レコードに反応する観測者フック。
//!
//! エンジンは登録順に `notify` を呼ぶ。観測者の失敗はエンジン側で
//! 飲み込んでログに残し、REPL へは伝搬させない。

use crate::calculation::Calculation;
use crate::errors::PersistenceError;
use crate::persistence::HistoryStore;

/// エンジンが観測者へ配送するイベント。
#[derive(Debug)]
pub enum CalculatorEvent<'a> {
    /// 新しいレコードが確定した。`history` は確定履歴のスナップショット。
    Recorded {
        calculation: &'a Calculation,
        history: &'a [Calculation],
    },
    /// 履歴が明示的に消去された。
    Cleared,
}

/// 計算イベントを受け取る観測者の能力。
pub trait Observer {
    /// ログ出力で観測者を識別するための名前。
    fn name(&self) -> &'static str;

    /// イベントを処理する。失敗はエンジンがログへ流す。
    fn notify(&mut self, event: &CalculatorEvent<'_>) -> Result<(), PersistenceError>;
}

/// 確定した計算を構造化ログへ流す観測者。
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn notify(&mut self, event: &CalculatorEvent<'_>) -> Result<(), PersistenceError> {
        match event {
            CalculatorEvent::Recorded { calculation, .. } => {
                tracing::info!(calculation = %calculation, "calculation recorded");
            }
            CalculatorEvent::Cleared => {
                tracing::info!("history cleared");
            }
        }
        Ok(())
    }
}

/// 確定履歴をイベントごとに保存する自動保存観測者。
pub struct AutoSaveObserver {
    store: HistoryStore,
}

impl AutoSaveObserver {
    pub fn new(store: HistoryStore) -> Self {
        Self { store }
    }
}

impl Observer for AutoSaveObserver {
    fn name(&self) -> &'static str {
        "auto_save"
    }

    fn notify(&mut self, event: &CalculatorEvent<'_>) -> Result<(), PersistenceError> {
        match event {
            CalculatorEvent::Recorded { history, .. } => self.store.save(history),
            CalculatorEvent::Cleared => self.store.save(&[]),
        }
    }
}
