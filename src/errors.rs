// パス: src/errors.rs
// 役割: Error taxonomy shared by the engine and the persistence layer
// 意図: Render every failure as a single user-facing line at the REPL boundary
// 関連ファイル: src/engine.rs, src/persistence.rs, src/repl/cmd.rs
//! エラー型の定義（電卓エンジンと永続化層の共通分類）。

use std::io;

use thiserror::Error;

/// 電卓エンジンが返しうるエラー種別。
///
/// REPL 境界で 1 行のメッセージとして描画される前提のため、
/// どの変種もユーザーに見せられる文言を `Display` で生成する。
#[derive(Debug, Error)]
pub enum CalcError {
    /// ファクトリが解決できなかった演算トークン。
    #[error("unknown operation '{name}'")]
    UnknownOperation { name: String },
    /// ゼロ除算・定義域違反・オーバーフローなどの算術エラー。
    #[error("{message}")]
    Operation { message: String },
    /// 履歴の保存・読込に失敗した場合。呼び出し側へそのまま伝搬する。
    #[error("{source}")]
    Persistence {
        #[from]
        source: PersistenceError,
    },
}

impl CalcError {
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation {
            message: message.into(),
        }
    }
}

/// 永続化層（CSV ファイル入出力）のエラー種別。
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("history file is malformed: {0}")]
    Csv(#[from] csv::Error),
}

impl From<tempfile::PersistError> for PersistenceError {
    fn from(err: tempfile::PersistError) -> Self {
        PersistenceError::Io(err.error)
    }
}

/// 電卓エンジン操作の結果を表す型。
pub type CalcResult<T> = Result<T, CalcError>;
