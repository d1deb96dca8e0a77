// パス: src/repl/cmd.rs
// 役割: REPL command loop, command parsing, and operand collection
// 意図: Drive interactive usage by dispatching onto the calculator engine
// 関連ファイル: src/engine.rs, src/repl/line_reader.rs, src/repl/printer.rs
//! 電卓 REPL のコマンド処理と状態遷移を担当するモジュール。
//! 入力をメタコマンドか演算名として解釈し、エンジンへ橋渡しする。
//!
//! エラーはすべてこの境界で 1 行のメッセージに変換し、ループは
//! 1 回の失敗で停止しない。ループを終えるのは `exit` と入力終端のみ。

use std::io::{self, Write};

use rust_decimal::Decimal;

use crate::engine::Calculator;
use crate::operations::is_known;

use super::line_reader::{LineReader, ReadResult};
use super::printer::{render_help, write_history};

/// 被演算子入力を中断する予約トークン。
const CANCEL_TOKEN: &str = "cancel";

/// 対話セッションを開始し、ユーザー入力を処理し続ける。
///
/// エンジンはセッションの外で構築して渡す。観測者の登録や起動時読込は
/// 呼び出し側（バイナリ）の責務。
pub fn run_repl(calc: &mut Calculator) {
    let mut reader = LineReader::new();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    if let Err(err) = run_repl_with(&mut reader, calc, &mut stdout, &mut stderr) {
        let _ = writeln!(stderr, "calculator REPL failed: {}", err);
    }
}

/// REPL が必要とする最小限の行入力抽象。テストでは台本駆動の実装を使う。
pub(crate) trait ReplLineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult>;
}

impl ReplLineSource for LineReader {
    fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult> {
        LineReader::read_line(self, prompt)
    }
}

pub(crate) fn run_repl_with<S, W, E>(
    reader: &mut S,
    calc: &mut Calculator,
    out: &mut W,
    err: &mut E,
) -> io::Result<()>
where
    S: ReplLineSource,
    W: Write,
    E: Write,
{
    writeln!(out, "Decimal Calculator REPL :: type 'help' for commands")?;

    loop {
        let line = match reader.read_line("> ")? {
            ReadResult::Line(line) => line,
            ReadResult::Eof => {
                finish_input_terminated(calc, out)?;
                break;
            }
            // 割り込みは進行中の操作だけを捨て、ループは続行する。
            ReadResult::Interrupted => {
                writeln!(out, "Operation cancelled")?;
                continue;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match parse_repl_command(input) {
            ReplCommand::Help => render_help(out)?,
            ReplCommand::Exit => {
                if let Err(e) = calc.save_history() {
                    writeln!(err, "Warning: could not save history: {}", e)?;
                }
                writeln!(out, "Goodbye!")?;
                break;
            }
            ReplCommand::History => write_history(out, &calc.show_history())?,
            ReplCommand::Clear => {
                calc.clear_history();
                writeln!(out, "History cleared")?;
            }
            ReplCommand::Undo => {
                if calc.undo() {
                    writeln!(out, "Operation undone")?;
                } else {
                    writeln!(out, "Nothing to undo")?;
                }
            }
            ReplCommand::Redo => {
                if calc.redo() {
                    writeln!(out, "Operation redone")?;
                } else {
                    writeln!(out, "Nothing to redo")?;
                }
            }
            ReplCommand::Save => match calc.save_history() {
                Ok(()) => writeln!(out, "History saved successfully")?,
                Err(e) => writeln!(err, "Error saving history: {}", e)?,
            },
            ReplCommand::Load => match calc.load_history() {
                Ok(()) => writeln!(out, "History loaded successfully")?,
                Err(e) => writeln!(err, "Error loading history: {}", e)?,
            },
            ReplCommand::Operation(name) => {
                match run_operation(reader, calc, &name, out, err)? {
                    OperationFlow::Completed => {}
                    OperationFlow::Terminated => {
                        finish_input_terminated(calc, out)?;
                        break;
                    }
                }
            }
            ReplCommand::Unknown(token) => writeln!(
                out,
                "Unknown command: '{}'. Type 'help' for available commands.",
                token
            )?,
        }
    }

    Ok(())
}

/// 入力終端時の共通後始末。保存失敗はログに残すだけで表示しない。
fn finish_input_terminated<W: Write>(calc: &Calculator, out: &mut W) -> io::Result<()> {
    writeln!(out, "Input terminated. Exiting...")?;
    if let Err(e) = calc.save_history() {
        tracing::warn!(error = %e, "could not save history on shutdown");
    }
    Ok(())
}

/// 演算コマンド 1 回分の被演算子収集と実行。
enum OperationFlow {
    Completed,
    Terminated,
}

/// 被演算子プロンプト 1 回分の結果。
enum OperandOutcome {
    Value(Decimal),
    Cancelled,
    Invalid(String),
    Terminated,
}

fn run_operation<S, W, E>(
    reader: &mut S,
    calc: &mut Calculator,
    name: &str,
    out: &mut W,
    err: &mut E,
) -> io::Result<OperationFlow>
where
    S: ReplLineSource,
    W: Write,
    E: Write,
{
    writeln!(out, "Enter two numbers (or '{}' to abort):", CANCEL_TOKEN)?;

    let mut operands = [Decimal::ZERO; 2];
    for (slot, prompt) in operands
        .iter_mut()
        .zip(["First number: ", "Second number: "])
    {
        match read_operand(reader, prompt)? {
            OperandOutcome::Value(value) => *slot = value,
            OperandOutcome::Cancelled => {
                writeln!(out, "Operation cancelled")?;
                return Ok(OperationFlow::Completed);
            }
            OperandOutcome::Invalid(raw) => {
                writeln!(err, "Error: invalid number: '{}'", raw)?;
                return Ok(OperationFlow::Completed);
            }
            OperandOutcome::Terminated => return Ok(OperationFlow::Terminated),
        }
    }

    let outcome = calc
        .set_operation(name)
        .and_then(|()| calc.perform_operation(operands[0], operands[1]));
    match outcome {
        Ok(result) => writeln!(out, "Result: {}", result.normalize())?,
        Err(e) => writeln!(err, "Error: {}", e)?,
    }
    Ok(OperationFlow::Completed)
}

fn read_operand<S: ReplLineSource>(reader: &mut S, prompt: &str) -> io::Result<OperandOutcome> {
    match reader.read_line(prompt)? {
        ReadResult::Line(line) => {
            let token = line.trim();
            if token.eq_ignore_ascii_case(CANCEL_TOKEN) {
                return Ok(OperandOutcome::Cancelled);
            }
            match token.parse::<Decimal>() {
                Ok(value) => Ok(OperandOutcome::Value(value)),
                Err(_) => Ok(OperandOutcome::Invalid(token.to_string())),
            }
        }
        ReadResult::Interrupted => Ok(OperandOutcome::Cancelled),
        ReadResult::Eof => Ok(OperandOutcome::Terminated),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// REPL が解釈できるトップレベルコマンドの集合。
pub(crate) enum ReplCommand {
    Help,
    Exit,
    History,
    Undo,
    Redo,
    Save,
    Load,
    Clear,
    /// ファクトリが解決できる演算名。
    Operation(String),
    /// どのコマンドにも演算名にも該当しない入力。
    Unknown(String),
}

/// 生の入力文字列を `ReplCommand` 列挙に解析する。
pub(crate) fn parse_repl_command(input: &str) -> ReplCommand {
    let token = input.trim().to_ascii_lowercase();
    match token.as_str() {
        "help" => ReplCommand::Help,
        "exit" => ReplCommand::Exit,
        "history" => ReplCommand::History,
        "undo" => ReplCommand::Undo,
        "redo" => ReplCommand::Redo,
        "save" => ReplCommand::Save,
        "load" => ReplCommand::Load,
        "clear" => ReplCommand::Clear,
        _ if is_known(&token) => ReplCommand::Operation(token),
        _ => ReplCommand::Unknown(token),
    }
}
