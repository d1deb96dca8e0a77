// パス: src/history.rs
// 役割: Two-stack undo/redo store for calculation records
// 意図: Keep the editor-style history discipline in one small type
// 関連ファイル: src/calculation.rs, src/engine.rs, src/persistence.rs
//! 計算履歴のスタック。
//!
//! `committed`（古い→新しい）と `redo_buffer` の 2 スタック方式。
//! 不変条件: 新しい記録は redo バッファを必ず破棄する（履歴は直線で、
//! 分岐したタイムラインを持たない）。

use crate::calculation::Calculation;

/// undo/redo 可能な計算レコードの順序付きストア。
#[derive(Debug, Clone)]
pub struct HistoryStack {
    committed: Vec<Calculation>,
    redo_buffer: Vec<Calculation>,
    max_size: usize,
}

impl HistoryStack {
    /// 上限件数を指定して空の履歴を構築する。
    pub fn new(max_size: usize) -> Self {
        Self {
            committed: Vec::new(),
            redo_buffer: Vec::new(),
            max_size,
        }
    }

    /// 新しいレコードを確定履歴へ追加する。redo バッファは無条件に破棄する。
    pub fn record(&mut self, entry: Calculation) {
        self.redo_buffer.clear();
        self.committed.push(entry);
        while self.committed.len() > self.max_size {
            self.committed.remove(0);
        }
    }

    /// 直近のレコードを redo バッファへ退避する。空なら何もせず false。
    pub fn undo(&mut self) -> bool {
        match self.committed.pop() {
            Some(entry) => {
                self.redo_buffer.push(entry);
                true
            }
            None => false,
        }
    }

    /// redo バッファの先頭を確定履歴へ戻す。空なら何もせず false。
    pub fn redo(&mut self) -> bool {
        match self.redo_buffer.pop() {
            Some(entry) => {
                self.committed.push(entry);
                true
            }
            None => false,
        }
    }

    /// 両スタックを空にする。
    pub fn clear(&mut self) {
        self.committed.clear();
        self.redo_buffer.clear();
    }

    /// 確定履歴の読み取り専用ビュー（古い→新しい）。
    pub fn snapshot(&self) -> &[Calculation] {
        &self.committed
    }

    /// 確定履歴を丸ごと差し替える。redo バッファは空になり、上限を超える
    /// 分は古い側から切り捨てる。読込の置換に使う。
    pub fn restore(&mut self, mut entries: Vec<Calculation>) {
        if entries.len() > self.max_size {
            entries.drain(..entries.len() - self.max_size);
        }
        self.committed = entries;
        self.redo_buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// 直近の確定レコードを参照する。
    pub fn last(&self) -> Option<&Calculation> {
        self.committed.last()
    }
}

#[cfg(test)]
mod tests {
    use super::HistoryStack;
    use crate::calculation::Calculation;
    use rust_decimal::Decimal;

    fn entry(n: i64) -> Calculation {
        Calculation::new("add", Decimal::from(n), Decimal::ONE, Decimal::from(n + 1))
    }

    #[test]
    /// n 件記録したら undo がちょうど n 回成功し、n+1 回目は false になる。
    fn undo_succeeds_exactly_n_times() {
        let mut h = HistoryStack::new(100);
        let n = 5;
        for i in 0..n {
            h.record(entry(i));
        }
        for _ in 0..n {
            assert!(h.undo());
        }
        assert!(!h.undo());
        assert!(h.is_empty());
    }

    #[test]
    /// redo は直前に成功した undo の回数だけ成功する。
    fn redo_capacity_matches_consecutive_undos() {
        let mut h = HistoryStack::new(100);
        for i in 0..3 {
            h.record(entry(i));
        }
        assert!(h.undo());
        assert!(h.undo());
        assert!(h.redo());
        assert!(h.redo());
        assert!(!h.redo());
        assert_eq!(h.len(), 3);
    }

    #[test]
    /// 新しい記録が挟まると保留中の redo 容量がゼロになる。
    fn record_clears_pending_redo() {
        let mut h = HistoryStack::new(100);
        h.record(entry(0));
        h.record(entry(1));
        assert!(h.undo());
        h.record(entry(2));
        assert!(!h.redo());
        assert_eq!(h.len(), 2);
    }

    #[test]
    /// 空バッファへの undo/redo が状態を変えないことを確認する。
    fn undo_redo_on_empty_are_noops() {
        let mut h = HistoryStack::new(100);
        assert!(!h.undo());
        assert!(!h.redo());
        assert!(h.is_empty());
        assert!(h.snapshot().is_empty());
    }

    #[test]
    /// clear が両スタックを空にすることを確認する。
    fn clear_empties_both_stacks() {
        let mut h = HistoryStack::new(100);
        h.record(entry(0));
        h.record(entry(1));
        assert!(h.undo());
        h.clear();
        assert!(h.is_empty());
        assert!(!h.redo());
    }

    #[test]
    /// 上限を超えた記録で最古のレコードが追い出されることを確認する。
    fn record_evicts_oldest_beyond_max_size() {
        let mut h = HistoryStack::new(3);
        for i in 0..5 {
            h.record(entry(i));
        }
        assert_eq!(h.len(), 3);
        assert_eq!(h.snapshot()[0].operand_a, Decimal::from(2));
    }

    #[test]
    /// restore が redo バッファを破棄し、上限で古い側を切り詰める。
    fn restore_replaces_and_trims() {
        let mut h = HistoryStack::new(2);
        h.record(entry(9));
        assert!(h.undo());
        h.restore(vec![entry(0), entry(1), entry(2)]);
        assert_eq!(h.len(), 2);
        assert_eq!(h.snapshot()[0].operand_a, Decimal::from(1));
        assert!(!h.redo());
    }

    #[test]
    /// undo で退避したレコードが redo で同一内容のまま戻ることを確認する。
    fn undo_then_redo_roundtrips_content() {
        let mut h = HistoryStack::new(10);
        h.record(entry(7));
        let before = h.last().cloned().unwrap();
        assert!(h.undo());
        assert!(h.last().is_none());
        assert!(h.redo());
        assert_eq!(h.last(), Some(&before));
    }
}
