// パス: src/lib.rs
// 役割: Crate root wiring modules and exports
// 意図: Expose minimal API surface for the calculator components
// 関連ファイル: src/engine.rs, src/repl/mod.rs, src/errors.rs
//! decalc（Rust）ルートモジュール
//!
//! 目的:
//! - undo/redo 付き履歴と CSV 永続化を備えた対話型 10 進電卓を提供する。
//! - 実装は読みやすさと変更容易性を最優先。
//!
//! 方針:
//! - コメント/ドキュメントは日本語、識別子は英語。
//! - 状態は 1 つの `Calculator` が所有し、REPL へ明示的に渡す。
//! - パブリックAPIは最小限。

pub mod calculation;
pub mod config;
pub mod engine;
pub mod errors;
pub mod history;
pub mod observers;
pub mod operations;
pub mod persistence;
pub mod repl;

// 便利な再エクスポート（利用側から主要型のみ直接参照可）
pub use crate::calculation::Calculation;
pub use crate::config::CalculatorConfig;
pub use crate::engine::Calculator;
pub use crate::errors::{CalcError, CalcResult, PersistenceError};
