// パス: src/repl/printer.rs
// 役割: Helpers for rendering REPL help and history output
// 意図: Keep interactive messaging consistent across commands
// 関連ファイル: src/repl/cmd.rs, src/engine.rs, src/operations.rs
//! REPL のヘルプと履歴表示を集約したモジュール。
//! 表示形式を一箇所にまとめ、対話時の出力を統一する。

use std::io::{self, Write};

use crate::operations::operation_names;

const HELP_HEADER: &str = concat!(
    "Available commands:\n",
    "  help       show this message\n",
    "  history    show the calculation history\n",
    "  undo       undo the last calculation\n",
    "  redo       redo the last undone calculation\n",
    "  clear      clear the calculation history\n",
    "  save       save the history to disk\n",
    "  load       load the history from disk\n",
    "  exit       save and quit\n",
);

/// ヘルプメッセージを任意のライターへ描画する。
pub(crate) fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(HELP_HEADER.as_bytes())?;
    writeln!(out)?;
    writeln!(
        out,
        "Operations (each prompts for two numbers, 'cancel' aborts):"
    )?;
    writeln!(out, "  {}", operation_names().join(", "))
}

/// 履歴行を番号付きで描画する。空なら専用メッセージを出す。
pub(crate) fn write_history<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    if lines.is_empty() {
        return writeln!(out, "No calculations in history");
    }
    writeln!(out, "Calculation History:")?;
    for (index, line) in lines.iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, line)?;
    }
    Ok(())
}
