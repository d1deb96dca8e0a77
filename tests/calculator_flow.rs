// 日本語コメント: 電卓エンジンと永続化の統合テスト

use rust_decimal::Decimal;

use decalc::config::CalculatorConfig;
use decalc::observers::AutoSaveObserver;
use decalc::persistence::HistoryStore;
use decalc::Calculator;

fn calc_in(dir: &std::path::Path) -> Calculator {
    Calculator::with_config(CalculatorConfig {
        history_file: dir.join("history.csv"),
        max_history_size: 100,
        auto_save: false,
        max_input_value: None,
    })
}

fn perform(calc: &mut Calculator, op: &str, a: i64, b: i64) -> Decimal {
    calc.set_operation(op).expect("set operation");
    calc.perform_operation(Decimal::from(a), Decimal::from(b))
        .expect("perform operation")
}

#[test]
fn undo_succeeds_exactly_as_many_times_as_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = calc_in(dir.path());
    let n = 4;
    for i in 0..n {
        perform(&mut calc, "add", i, 1);
    }
    for _ in 0..n {
        assert!(calc.undo());
    }
    assert!(!calc.undo());
}

#[test]
fn new_operation_after_undo_discards_redo() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = calc_in(dir.path());
    perform(&mut calc, "add", 1, 2);
    perform(&mut calc, "multiply", 2, 3);
    assert!(calc.undo());
    perform(&mut calc, "subtract", 9, 4);
    assert!(!calc.redo());
    assert_eq!(
        calc.show_history(),
        vec!["1 add 2 = 3", "9 subtract 4 = 5"]
    );
}

#[test]
fn save_then_load_into_fresh_engine_reproduces_history() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = calc_in(dir.path());
    perform(&mut calc, "add", 1, 2);
    perform(&mut calc, "power", 2, 10);
    calc.save_history().expect("save");

    let mut fresh = calc_in(dir.path());
    fresh.load_history().expect("load");
    assert_eq!(fresh.history(), calc.history());
    assert_eq!(
        fresh.show_history(),
        vec!["1 add 2 = 3", "2 power 10 = 1024"]
    );
}

#[test]
fn load_failure_is_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = calc_in(dir.path());
    perform(&mut calc, "add", 1, 2);

    // 壊れた履歴ファイルを直接用意する。
    std::fs::write(
        dir.path().join("history.csv"),
        "operation,operand_a,operand_b,result\nadd,one,2,3\n",
    )
    .unwrap();

    assert!(calc.load_history().is_err());
    assert_eq!(calc.show_history(), vec!["1 add 2 = 3"]);
}

#[test]
fn auto_save_observer_keeps_file_in_sync_with_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    let mut calc = calc_in(dir.path());
    calc.add_observer(Box::new(AutoSaveObserver::new(HistoryStore::new(
        path.clone(),
    ))));

    perform(&mut calc, "add", 1, 2);
    let store = HistoryStore::new(path);
    assert_eq!(store.load().unwrap(), calc.history());

    perform(&mut calc, "multiply", 3, 3);
    assert_eq!(store.load().unwrap().len(), 2);

    calc.clear_history();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn unknown_operation_is_rejected_without_state_change() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = calc_in(dir.path());
    assert!(calc.set_operation("nope").is_err());
    assert!(calc.history().is_empty());
    assert!(!calc.undo());
}
