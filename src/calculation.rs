// パス: src/calculation.rs
// 役割: Immutable record of one evaluated operation
// 意図: Give history and persistence a single shared value type
// 関連ファイル: src/history.rs, src/persistence.rs, src/engine.rs
//! 1 回の演算結果を表す不変レコード。
//! エンジンが成功した演算ごとに生成し、履歴スタックと CSV 永続化で共有する。

use std::fmt::{self, Display, Formatter};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 演算名・被演算子・結果を保持する計算レコード。
///
/// 生成後は変更しない。結果は正確な 10 進数 (`Decimal`) で保持し、
/// 表示時のみ末尾ゼロを正規化する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Calculation {
    pub operation: String,
    pub operand_a: Decimal,
    pub operand_b: Decimal,
    pub result: Decimal,
}

impl Calculation {
    pub fn new(
        operation: impl Into<String>,
        operand_a: Decimal,
        operand_b: Decimal,
        result: Decimal,
    ) -> Self {
        Self {
            operation: operation.into(),
            operand_a,
            operand_b,
            result,
        }
    }
}

impl Display for Calculation {
    /// `a op b = result` 形式の 1 行表現。履歴表示とログで共用する。
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.operand_a.normalize(),
            self.operation,
            self.operand_b.normalize(),
            self.result.normalize()
        )
    }
}
