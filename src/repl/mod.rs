// パス: src/repl/mod.rs
// 役割: REPL module facade and re-exports
// 意図: Expose the interactive entry point without leaking internals
// 関連ファイル: src/repl/cmd.rs, src/repl/line_reader.rs, src/bin/decalc.rs
//! 電卓の対話環境を構成するモジュール群をまとめたファサード。
//!
//! - `cmd`: メインループとコマンド解釈
//! - `line_reader`: 行入力と割り込み・EOF の判別
//! - `printer`: ユーザー向けの表示ロジック

pub mod cmd;
mod line_reader;
mod printer;

pub use cmd::run_repl;
