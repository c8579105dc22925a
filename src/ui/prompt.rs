//! Line prompts for the add-server wizard.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, BufRead, IsTerminal, Write};

/// Ask until a non-empty answer is given.
pub fn prompt(label: &str) -> io::Result<String> {
    loop {
        let answer = prompt_allowing_empty(label)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
    }
}

/// Ask once, accepting an empty answer.
pub fn prompt_allowing_empty(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    read_line(&mut io::stdin().lock())
}

/// Ask for a secret without echoing it.
///
/// Falls back to a plain line read when stdin is not a terminal.
pub fn prompt_password(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    if !io::stdin().is_terminal() {
        return read_line(&mut io::stdin().lock());
    }

    let password = {
        let _raw = RawMode::enable()?;
        read_masked()?
    };
    println!();
    Ok(password)
}

fn read_line(input: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
    }
    Ok(line.trim().to_string())
}

fn read_masked() -> io::Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if !apply_key(&mut password, key)? {
            return Ok(password);
        }
    }
}

/// Returns false once the input is complete.
fn apply_key(buffer: &mut String, key: KeyEvent) -> io::Result<bool> {
    match key.code {
        KeyCode::Enter => Ok(false),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"))
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            Ok(true)
        }
        KeyCode::Backspace => {
            buffer.pop();
            Ok(true)
        }
        _ => Ok(true),
    }
}

/// Restores cooked mode when dropped.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_read_line_trims() {
        let mut input = io::Cursor::new(b"  https://h/  \n".to_vec());
        assert_eq!(read_line(&mut input).unwrap(), "https://h/");
    }

    #[test]
    fn test_read_line_eof() {
        let mut input = io::Cursor::new(Vec::new());
        assert_eq!(
            read_line(&mut input).unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
    }

    #[test]
    fn test_masked_input_editing() {
        let mut buffer = String::new();
        for code in [
            KeyCode::Char('p'),
            KeyCode::Char('x'),
            KeyCode::Backspace,
            KeyCode::Char('w'),
            KeyCode::Left,
        ] {
            assert!(apply_key(&mut buffer, key(code)).unwrap());
        }
        assert!(!apply_key(&mut buffer, key(KeyCode::Enter)).unwrap());
        assert_eq!(buffer, "pw");
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut buffer = String::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            apply_key(&mut buffer, ctrl_c).unwrap_err().kind(),
            io::ErrorKind::Interrupted
        );
    }
}
