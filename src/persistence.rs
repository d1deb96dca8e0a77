// パス: src/persistence.rs
// 役割: CSV-backed save/load of the committed calculation history
// 意図: Keep file-format concerns out of the engine and make saves atomic
// 関連ファイル: src/calculation.rs, src/engine.rs, src/observers.rs
//! 履歴の永続化ストア。
//!
//! 確定履歴を `operation,operand_a,operand_b,result` の CSV として保存する。
//! 保存は同じディレクトリ内の一時ファイルへ書いてから `persist` で
//! 差し替えるため、途中失敗で既存ファイルが壊れることはない。
//! 読込はファイル全体を解析し終えるまで結果を返さない。

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::calculation::Calculation;
use crate::errors::PersistenceError;

/// 履歴 CSV ファイル 1 つを指す永続化ハンドル。
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 保存先ファイルが存在するかどうかを返す。
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// 確定履歴のスナップショットを保存する。
    pub fn save(&self, entries: &[Calculation]) -> Result<(), PersistenceError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let tmp = NamedTempFile::new_in(parent)?;
        let mut writer = csv::Writer::from_writer(tmp);
        for entry in entries {
            writer.serialize(entry)?;
        }
        let tmp = writer
            .into_inner()
            .map_err(|e| PersistenceError::Io(e.into_error()))?;
        tmp.persist(&self.path)?;
        Ok(())
    }

    /// 履歴ファイルを読み込み、レコード列を返す。
    ///
    /// ファイルが無い・開けない・1 行でも解析できない場合はエラーとし、
    /// 部分的な結果は返さない。
    pub fn load(&self) -> Result<Vec<Calculation>, PersistenceError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut entries = Vec::new();
        for row in reader.deserialize() {
            let entry: Calculation = row?;
            entries.push(entry);
        }
        Ok(entries)
    }
}
