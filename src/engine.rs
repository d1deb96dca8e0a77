// パス: src/engine.rs
// 役割: Calculator engine orchestrating operations, history, and observers
// 意図: Own all mutable session state behind a small explicit API
// 関連ファイル: src/history.rs, src/observers.rs, src/persistence.rs, src/repl/cmd.rs
//! 電卓エンジン。
//!
//! 演算の選択・実行、履歴スタックの更新、観測者への通知、保存/読込を
//! 1 つの所有者にまとめる。単一スレッドからのみ操作される前提で、
//! ロックは持たない。

use rust_decimal::Decimal;

use crate::calculation::Calculation;
use crate::config::CalculatorConfig;
use crate::errors::{CalcError, CalcResult};
use crate::history::HistoryStack;
use crate::observers::{CalculatorEvent, Observer};
use crate::operations::{create_operation, Operation};
use crate::persistence::HistoryStore;

/// セッション状態（保留演算・履歴・観測者・永続化ハンドル）の所有者。
pub struct Calculator {
    config: CalculatorConfig,
    history: HistoryStack,
    observers: Vec<Box<dyn Observer>>,
    store: HistoryStore,
    pending: Option<Operation>,
}

impl Calculator {
    /// 環境変数由来の既定設定でエンジンを構築する。
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::from_env())
    }

    /// 指定した設定でエンジンを構築する。
    pub fn with_config(config: CalculatorConfig) -> Self {
        let history = HistoryStack::new(config.max_history_size);
        let store = HistoryStore::new(config.history_file.clone());
        Self {
            config,
            history,
            observers: Vec::new(),
            store,
            pending: None,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// 観測者を通知リストの末尾へ登録する。通知は登録順。
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// 演算名をファクトリで解決し、保留演算として保持する。
    pub fn set_operation(&mut self, name: &str) -> CalcResult<()> {
        self.pending = Some(create_operation(name)?);
        Ok(())
    }

    /// 保留中の演算を 2 つの被演算子へ適用する。
    ///
    /// 成功時はレコードを履歴へ確定し、観測者へ通知してから結果を返す。
    pub fn perform_operation(&mut self, a: Decimal, b: Decimal) -> CalcResult<Decimal> {
        let operation = self
            .pending
            .ok_or_else(|| CalcError::operation("no operation selected"))?;
        self.validate_operand(a)?;
        self.validate_operand(b)?;
        let result = operation.apply(a, b)?;
        self.history
            .record(Calculation::new(operation.name(), a, b, result));
        self.notify_recorded();
        Ok(result)
    }

    /// 直近の計算を取り消す。取り消すものが無ければ false。
    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    /// 直近の undo をやり直す。やり直すものが無ければ false。
    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    /// 確定履歴の読み取り専用ビュー。
    pub fn history(&self) -> &[Calculation] {
        self.history.snapshot()
    }

    /// `a op b = result` 形式の表示用行を古い順で返す。
    pub fn show_history(&self) -> Vec<String> {
        self.history
            .snapshot()
            .iter()
            .map(|entry| entry.to_string())
            .collect()
    }

    /// 履歴を消去し、観測者へ消去イベントを通知する。
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.dispatch(&CalculatorEvent::Cleared);
    }

    /// 確定履歴を設定済みのファイルへ保存する。
    pub fn save_history(&self) -> CalcResult<()> {
        self.store.save(self.history.snapshot())?;
        Ok(())
    }

    /// 履歴ファイルを読み込み、確定履歴を置き換える。
    ///
    /// 読込はファイル全体の解析が済むまで確定しないため、失敗時は
    /// エンジンの状態が読込前のまま残る。redo バッファは破棄される。
    pub fn load_history(&mut self) -> CalcResult<()> {
        let entries = self.store.load()?;
        self.history.restore(entries);
        Ok(())
    }

    /// 起動時用のベストエフォート読込。失敗は警告ログに留める。
    pub fn load_history_if_present(&mut self) {
        if !self.store.exists() {
            tracing::debug!(path = %self.store.path().display(), "no history file to load");
            return;
        }
        if let Err(e) = self.load_history() {
            tracing::warn!(error = %e, "could not load persisted history");
        }
    }

    fn validate_operand(&self, value: Decimal) -> CalcResult<()> {
        if let Some(limit) = self.config.max_input_value {
            if value.abs() > limit {
                return Err(CalcError::operation(format!(
                    "operand {} exceeds the maximum allowed value {}",
                    value.normalize(),
                    limit.normalize()
                )));
            }
        }
        Ok(())
    }

    fn notify_recorded(&mut self) {
        let history = self.history.snapshot();
        let Some(calculation) = history.last() else {
            return;
        };
        let event = CalculatorEvent::Recorded {
            calculation,
            history,
        };
        for observer in &mut self.observers {
            if let Err(e) = observer.notify(&event) {
                tracing::warn!(observer = observer.name(), error = %e, "observer failed");
            }
        }
    }

    fn dispatch(&mut self, event: &CalculatorEvent<'_>) {
        for observer in &mut self.observers {
            if let Err(e) = observer.notify(event) {
                tracing::warn!(observer = observer.name(), error = %e, "observer failed");
            }
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
