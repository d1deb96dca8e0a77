// パス: src/operations.rs
// 役割: Operation enum, the fixed name registry, and decimal arithmetic
// 意図: Resolve operation tokens in one place and keep the math checked
// 関連ファイル: src/engine.rs, src/errors.rs, src/repl/cmd.rs
//! 演算ファクトリと各演算の実装。
//!
//! 認識する演算名は [`REGISTRY`] の 1 テーブルに集約する。エンジンや REPL が
//! 名前の一覧を別途ハードコードすることはない。

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::errors::{CalcError, CalcResult};

/// 2 項演算の種別。タグ付き列挙でディスパッチする。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Root,
    Modulus,
    IntDivide,
    Percent,
    AbsDiff,
}

/// 演算名からの固定引き当てテーブル。ここが設定定数の唯一の置き場所。
static REGISTRY: Lazy<BTreeMap<&'static str, Operation>> = Lazy::new(|| {
    BTreeMap::from([
        ("add", Operation::Add),
        ("subtract", Operation::Subtract),
        ("multiply", Operation::Multiply),
        ("divide", Operation::Divide),
        ("power", Operation::Power),
        ("root", Operation::Root),
        ("modulus", Operation::Modulus),
        ("int_divide", Operation::IntDivide),
        ("percent", Operation::Percent),
        ("abs_diff", Operation::AbsDiff),
    ])
});

/// 演算名を `Operation` に解決する。未知の名前は `UnknownOperation`。
pub fn create_operation(name: &str) -> CalcResult<Operation> {
    REGISTRY
        .get(name)
        .copied()
        .ok_or_else(|| CalcError::unknown_operation(name))
}

/// 名前がレジストリに登録済みかどうかを返す。
pub fn is_known(name: &str) -> bool {
    REGISTRY.contains_key(name)
}

/// 登録済みの演算名を辞書順で返す。ヘルプ表示に使う。
pub fn operation_names() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

impl Operation {
    /// レジストリ上の正規名を返す。
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
            Operation::Root => "root",
            Operation::Modulus => "modulus",
            Operation::IntDivide => "int_divide",
            Operation::Percent => "percent",
            Operation::AbsDiff => "abs_diff",
        }
    }

    /// 2 つの被演算子へ演算を適用する。
    ///
    /// ゼロ除算と定義域違反は `Operation` エラー、`Decimal` の表現範囲を
    /// 超えた場合はオーバーフローとして報告する。
    pub fn apply(self, a: Decimal, b: Decimal) -> CalcResult<Decimal> {
        match self {
            Operation::Add => a.checked_add(b).ok_or_else(overflow),
            Operation::Subtract => a.checked_sub(b).ok_or_else(overflow),
            Operation::Multiply => a.checked_mul(b).ok_or_else(overflow),
            Operation::Divide => {
                if b.is_zero() {
                    return Err(CalcError::operation("division by zero is not allowed"));
                }
                a.checked_div(b).ok_or_else(overflow)
            }
            Operation::Power => power(a, b),
            Operation::Root => root(a, b),
            Operation::Modulus => {
                if b.is_zero() {
                    return Err(CalcError::operation("modulus by zero is not allowed"));
                }
                a.checked_rem(b).ok_or_else(overflow)
            }
            Operation::IntDivide => {
                if b.is_zero() {
                    return Err(CalcError::operation(
                        "integer division by zero is not allowed",
                    ));
                }
                a.checked_div(b).map(|q| q.trunc()).ok_or_else(overflow)
            }
            Operation::Percent => {
                if b.is_zero() {
                    return Err(CalcError::operation(
                        "cannot calculate percentage with zero base",
                    ));
                }
                a.checked_div(b)
                    .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
                    .ok_or_else(overflow)
            }
            Operation::AbsDiff => a.checked_sub(b).map(|d| d.abs()).ok_or_else(overflow),
        }
    }
}

fn overflow() -> CalcError {
    CalcError::operation("result exceeds the representable decimal range")
}

fn power(base: Decimal, exponent: Decimal) -> CalcResult<Decimal> {
    // 整数指数は正確な checked_powi 経路に乗せる。負の底もここでは有効。
    if exponent.fract().is_zero() {
        if let Some(exp) = exponent.to_i64() {
            return base.checked_powi(exp).ok_or_else(overflow);
        }
    }
    if base.is_sign_negative() {
        return Err(CalcError::operation(
            "cannot raise a negative base to a fractional power",
        ));
    }
    base.checked_powd(exponent).ok_or_else(overflow)
}

fn root(value: Decimal, degree: Decimal) -> CalcResult<Decimal> {
    if degree.is_zero() {
        return Err(CalcError::operation("zeroth root is undefined"));
    }
    if value.is_sign_negative() {
        return Err(CalcError::operation(
            "cannot compute the root of a negative number",
        ));
    }
    let exponent = Decimal::ONE.checked_div(degree).ok_or_else(overflow)?;
    value.checked_powd(exponent).ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::{create_operation, is_known, operation_names, Operation};
    use crate::errors::CalcError;
    use rust_decimal::Decimal;

    #[test]
    /// 登録済みの名前が解決され、未知の名前が拒否されることを確認する。
    fn factory_resolves_known_names_only() {
        assert_eq!(create_operation("add").unwrap(), Operation::Add);
        assert_eq!(create_operation("root").unwrap(), Operation::Root);
        match create_operation("frobnicate") {
            Err(CalcError::UnknownOperation { name }) => assert_eq!(name, "frobnicate"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(is_known("modulus"));
        assert!(!is_known("ADD"));
    }

    #[test]
    /// 名前一覧が辞書順で全演算を含むことを確認する。
    fn operation_names_are_sorted_and_complete() {
        let names = operation_names();
        assert_eq!(names.len(), 10);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(names.contains(&"int_divide"));
    }

    #[test]
    /// 基本 4 演算の結果を確認する。
    fn basic_arithmetic() {
        let one = Decimal::ONE;
        let two = Decimal::TWO;
        assert_eq!(Operation::Add.apply(one, two).unwrap(), Decimal::from(3));
        assert_eq!(
            Operation::Subtract.apply(one, two).unwrap(),
            Decimal::from(-1)
        );
        assert_eq!(
            Operation::Multiply.apply(two, two).unwrap(),
            Decimal::from(4)
        );
        assert_eq!(
            Operation::Divide.apply(Decimal::from(7), two).unwrap(),
            Decimal::new(35, 1)
        );
    }

    #[test]
    /// ゼロ除算系がすべて `Operation` エラーになることを確認する。
    fn zero_divisors_are_rejected() {
        for op in [
            Operation::Divide,
            Operation::Modulus,
            Operation::IntDivide,
            Operation::Percent,
        ] {
            match op.apply(Decimal::ONE, Decimal::ZERO) {
                Err(CalcError::Operation { message }) => assert!(message.contains("zero")),
                other => panic!("{:?}: unexpected {:?}", op, other),
            }
        }
    }

    #[test]
    /// 整数指数の冪が正確に計算されることを確認する。
    fn integer_power_is_exact() {
        let v = Operation::Power
            .apply(Decimal::TWO, Decimal::from(10))
            .unwrap();
        assert_eq!(v, Decimal::from(1024));
        // 負の底でも整数指数なら有効。
        let v = Operation::Power
            .apply(Decimal::from(-3), Decimal::TWO)
            .unwrap();
        assert_eq!(v, Decimal::from(9));
    }

    #[test]
    /// 負数の根と負の底の小数冪が定義域エラーになることを確認する。
    fn domain_errors_for_root_and_power() {
        assert!(matches!(
            Operation::Root.apply(Decimal::from(-8), Decimal::from(3)),
            Err(CalcError::Operation { .. })
        ));
        assert!(matches!(
            Operation::Root.apply(Decimal::from(8), Decimal::ZERO),
            Err(CalcError::Operation { .. })
        ));
        assert!(matches!(
            Operation::Power.apply(Decimal::from(-2), Decimal::new(5, 1)),
            Err(CalcError::Operation { .. })
        ));
    }

    #[test]
    /// 剰余・整数除算・百分率・絶対差の結果を確認する。
    fn extended_operations() {
        assert_eq!(
            Operation::Modulus
                .apply(Decimal::from(7), Decimal::from(3))
                .unwrap(),
            Decimal::ONE
        );
        assert_eq!(
            Operation::IntDivide
                .apply(Decimal::from(7), Decimal::TWO)
                .unwrap(),
            Decimal::from(3)
        );
        assert_eq!(
            Operation::Percent
                .apply(Decimal::ONE, Decimal::from(4))
                .unwrap(),
            Decimal::from(25)
        );
        assert_eq!(
            Operation::AbsDiff
                .apply(Decimal::TWO, Decimal::from(5))
                .unwrap(),
            Decimal::from(3)
        );
    }

    #[test]
    /// オーバーフローが算術エラーとして報告されることを確認する。
    fn overflow_is_reported() {
        assert!(matches!(
            Operation::Multiply.apply(Decimal::MAX, Decimal::TWO),
            Err(CalcError::Operation { .. })
        ));
    }
}
