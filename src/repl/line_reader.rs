// パス: src/repl/line_reader.rs
// 役割: Terminal line reader distinguishing lines, EOF, and interrupts
// 意図: Let the command loop treat Ctrl-C as a recoverable event
// 関連ファイル: src/repl/cmd.rs, src/repl/printer.rs
//! 対話入力の行リーダー。
//!
//! UNIX では端末を Raw モードへ切り替えて 1 文字ずつ読み、Ctrl-C を
//! プロセス終了ではなく `Interrupted` として呼び出し側へ返す。
//! Raw モードが使えない環境では通常の行読みにフォールバックする
//! （その場合 Ctrl-C はシグナル既定動作のまま）。

use std::io::{self, Read, Write};

/// 行入力が返す 3 種類の結果を表す列挙体。
pub enum ReadResult {
    Line(String),
    Eof,
    Interrupted,
}

/// プロンプト付きの行読み取りを提供するリーダー。
pub struct LineReader;

impl LineReader {
    pub fn new() -> Self {
        Self
    }

    /// プロンプトを出力し、1 行分の入力または制御シグナルを取得する。
    pub fn read_line(&mut self, prompt: &str) -> io::Result<ReadResult> {
        #[cfg(unix)]
        {
            self.read_line_unix(prompt)
        }
        #[cfg(not(unix))]
        {
            self.read_line_fallback(prompt)
        }
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(unix))]
impl LineReader {
    /// Raw モードが利用できない環境向けのフォールバック読み取り。
    fn read_line_fallback(&mut self, prompt: &str) -> io::Result<ReadResult> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        let mut line = String::new();
        let bytes = io::stdin().read_line(&mut line)?;
        if bytes == 0 {
            return Ok(ReadResult::Eof);
        }
        if line.ends_with('\n') {
            line.pop();
        }
        if line.ends_with('\r') {
            line.pop();
        }
        Ok(ReadResult::Line(line))
    }
}

#[cfg(unix)]
impl LineReader {
    /// UNIX 端末を Raw モードに切り替えて対話入力を処理する。
    fn read_line_unix(&mut self, prompt: &str) -> io::Result<ReadResult> {
        let _raw = RawMode::new()?;
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let stdin = io::stdin();
        let mut stdin = stdin.lock();
        let mut session = EditSession::new();
        loop {
            let mut byte = [0u8; 1];
            if stdin.read(&mut byte)? == 0 {
                return Ok(ReadResult::Eof);
            }
            match interpret_action(byte[0], &mut stdin)? {
                EditAction::Submit => {
                    write!(stdout, "\r\n")?;
                    stdout.flush()?;
                    return Ok(ReadResult::Line(session.into_string()));
                }
                EditAction::Interrupt => {
                    write!(stdout, "^C\r\n")?;
                    stdout.flush()?;
                    return Ok(ReadResult::Interrupted);
                }
                EditAction::Eof => {
                    if session.is_empty() {
                        return Ok(ReadResult::Eof);
                    }
                }
                EditAction::DeleteLeft => {
                    if session.delete_left() {
                        refresh_line(&mut stdout, prompt, session.buffer(), session.cursor())?;
                    }
                }
                EditAction::MoveLeft => {
                    if session.move_left() {
                        refresh_line(&mut stdout, prompt, session.buffer(), session.cursor())?;
                    }
                }
                EditAction::MoveRight => {
                    if session.move_right() {
                        refresh_line(&mut stdout, prompt, session.buffer(), session.cursor())?;
                    }
                }
                EditAction::InsertChar(ch) => {
                    session.insert_char(ch);
                    refresh_line(&mut stdout, prompt, session.buffer(), session.cursor())?;
                }
                EditAction::Ignore => {}
            }
        }
    }
}

/// 先頭バイトと後続バイトから UTF-8 の 1 文字を復元する。
fn read_utf8_char<R: Read>(first: u8, reader: &mut R) -> io::Result<Option<char>> {
    let width = match first {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Ok(None),
    };
    let mut buf = [0u8; 4];
    buf[0] = first;
    for idx in 1..width {
        reader.read_exact(&mut buf[idx..idx + 1])?;
    }
    match std::str::from_utf8(&buf[..width]) {
        Ok(s) => Ok(s.chars().next()),
        Err(_) => Ok(None),
    }
}

#[cfg(unix)]
/// 読み取った制御シーケンスを編集操作へ写像する。
fn interpret_action<R: Read>(first: u8, reader: &mut R) -> io::Result<EditAction> {
    match first {
        b'\n' | b'\r' => Ok(EditAction::Submit),
        0x03 => Ok(EditAction::Interrupt),
        0x04 => Ok(EditAction::Eof),
        0x7f | 0x08 => Ok(EditAction::DeleteLeft),
        0x1b => {
            let mut seq = [0u8; 2];
            if reader.read_exact(&mut seq[..1]).is_err() {
                return Ok(EditAction::Ignore);
            }
            if seq[0] != b'[' {
                return Ok(EditAction::Ignore);
            }
            if reader.read_exact(&mut seq[1..2]).is_err() {
                return Ok(EditAction::Ignore);
            }
            Ok(match seq[1] {
                b'C' => EditAction::MoveRight,
                b'D' => EditAction::MoveLeft,
                _ => EditAction::Ignore,
            })
        }
        _ => {
            if let Some(ch) = read_utf8_char(first, reader)? {
                if ch.is_control() {
                    Ok(EditAction::Ignore)
                } else {
                    Ok(EditAction::InsertChar(ch))
                }
            } else {
                Ok(EditAction::Ignore)
            }
        }
    }
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditAction {
    Submit,
    Interrupt,
    Eof,
    DeleteLeft,
    MoveLeft,
    MoveRight,
    InsertChar(char),
    Ignore,
}

#[cfg(unix)]
struct EditSession {
    buffer: Vec<char>,
    cursor: usize,
}

#[cfg(unix)]
impl EditSession {
    fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    fn buffer(&self) -> &[char] {
        &self.buffer
    }

    fn cursor(&self) -> usize {
        self.cursor
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
    }

    fn delete_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    fn into_string(self) -> String {
        self.buffer.into_iter().collect()
    }
}

#[cfg(unix)]
/// バッファとカーソル位置に合わせて行全体を再描画する。
fn refresh_line<W: Write>(
    writer: &mut W,
    prompt: &str,
    buffer: &[char],
    cursor: usize,
) -> io::Result<()> {
    let rendered: String = buffer.iter().collect();
    write!(writer, "\r{}{}", prompt, rendered)?;
    write!(writer, "\x1b[K")?;
    let total = prompt.chars().count() + buffer.len();
    let target = prompt.chars().count() + cursor;
    if total > target {
        write!(writer, "\x1b[{}D", total - target)?;
    }
    writer.flush()
}

#[cfg(unix)]
/// Raw モードへの切り替えと復帰を担う RAII ガード。
struct RawMode {
    original: Termios,
}

#[cfg(unix)]
impl RawMode {
    /// 標準入力の termios 設定を Raw モードへ変更する。
    fn new() -> io::Result<Self> {
        let fd = 0; // 標準入力のファイルディスクリプタ
        let mut termios = Termios::default();
        if unsafe { tcgetattr(fd, &mut termios as *mut _) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = termios;
        // OS ごとの差分は `cfmakeraw` に任せて Raw モードへ移行する。
        unsafe {
            cfmakeraw(&mut raw as *mut _);
        }
        if unsafe { tcsetattr(fd, TCSANOW, &raw as *const _) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self { original: termios })
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    /// スコープ終了時に取得済みの termios 設定へ戻す。
    fn drop(&mut self) {
        let fd = 0;
        unsafe {
            let _ = tcsetattr(fd, TCSANOW, &self.original as *const _);
        }
    }
}

#[cfg(unix)]
const TCSANOW: i32 = 0;

#[cfg(unix)]
#[repr(C)]
#[derive(Clone, Copy)]
/// POSIX 端末属性 (`termios`) を Rust 表現に写した構造体。
struct Termios {
    c_iflag: u32,
    c_oflag: u32,
    c_cflag: u32,
    c_lflag: u32,
    c_line: u8,
    c_cc: [u8; NCCS],
    c_ispeed: u32,
    c_ospeed: u32,
}

#[cfg(unix)]
impl Default for Termios {
    fn default() -> Self {
        Self {
            c_iflag: 0,
            c_oflag: 0,
            c_cflag: 0,
            c_lflag: 0,
            c_line: 0,
            c_cc: [0; NCCS],
            c_ispeed: 0,
            c_ospeed: 0,
        }
    }
}

#[cfg(unix)]
#[cfg(any(target_os = "linux", target_os = "android"))]
const NCCS: usize = 32;
#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
))]
const NCCS: usize = 20;
#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly",
    target_os = "netbsd",
    target_os = "openbsd",
)))]
const NCCS: usize = 32;

#[cfg(unix)]
extern "C" {
    fn tcgetattr(fd: i32, termios: *mut Termios) -> i32;
    fn tcsetattr(fd: i32, optional_actions: i32, termios: *const Termios) -> i32;
    fn cfmakeraw(termios: *mut Termios);
}
