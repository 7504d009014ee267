use std::io::{BufRead, ErrorKind, Write};

use tracing::warn;

use crate::application::{InputClosed, KeyEntry, Keypad, Screen};
use crate::domain::parse_cents;

/// Keypad backed by a line-oriented reader, usually stdin.
/// Each request consumes one line.
pub struct ConsoleKeypad<R> {
    reader: R,
}

impl<R: BufRead> ConsoleKeypad<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next line of input, or `None` when the line is not valid UTF-8.
    fn read_line(&mut self) -> Result<Option<String>, InputClosed> {
        let mut bytes = Vec::new();
        loop {
            match self.reader.read_until(b'\n', &mut bytes) {
                Ok(0) if bytes.is_empty() => return Err(InputClosed),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!(error = %err, "Failed to read from keypad");
                    return Err(InputClosed);
                }
            }
        }
        match String::from_utf8(bytes) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(err) => {
                warn!(error = %err, "Discarding undecodable keypad line");
                Ok(None)
            }
        }
    }

    fn read_integer(&mut self) -> KeyEntry {
        Ok(self.read_line()?.and_then(|line| line.parse().ok()))
    }
}

impl<R: BufRead> Keypad for ConsoleKeypad<R> {
    fn request_account_id(&mut self) -> KeyEntry {
        self.read_integer()
    }

    fn request_pin(&mut self) -> KeyEntry {
        self.read_integer()
    }

    fn request_menu_choice(&mut self) -> KeyEntry {
        self.read_integer()
    }

    // Typed as units ("300" or "300.00"), handed on as cents.
    fn request_amount(&mut self) -> KeyEntry {
        Ok(self
            .read_line()?
            .and_then(|line| parse_cents(&line).ok()))
    }

    fn request_target_account_id(&mut self) -> KeyEntry {
        self.read_integer()
    }
}

/// Screen backed by a writer, usually stdout.
pub struct ConsoleScreen<W> {
    writer: W,
}

impl<W: Write> ConsoleScreen<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, text: &str) {
        let result = writeln!(self.writer, "{}", text).and_then(|_| self.writer.flush());
        if let Err(err) = result {
            warn!(error = %err, "Failed to write to screen");
        }
    }
}

impl<W: Write> Screen for ConsoleScreen<W> {
    fn display_line(&mut self, text: &str) {
        self.write(text);
    }

    fn display_error(&mut self, text: &str) {
        self.write(&format!("Error: {}", text));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_keypad_reads_one_line_per_request() {
        let mut keypad = ConsoleKeypad::new(Cursor::new("12345\n 1234 \nabc\n300\n"));
        assert_eq!(keypad.request_account_id(), Ok(Some(12345)));
        assert_eq!(keypad.request_pin(), Ok(Some(1234)));
        assert_eq!(keypad.request_menu_choice(), Ok(None));
        assert_eq!(keypad.request_amount(), Ok(Some(30000)));
        assert_eq!(keypad.request_target_account_id(), Err(InputClosed));
    }

    #[test]
    fn test_keypad_amounts() {
        let mut keypad = ConsoleKeypad::new(Cursor::new("12.50\n\n1.234\n"));
        assert_eq!(keypad.request_amount(), Ok(Some(1250)));
        assert_eq!(keypad.request_amount(), Ok(None));
        assert_eq!(keypad.request_amount(), Ok(None));
    }

    #[test]
    fn test_undecodable_line_is_a_bad_entry() {
        let mut input = b"12345\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"4\n");
        let mut keypad = ConsoleKeypad::new(Cursor::new(input));
        assert_eq!(keypad.request_account_id(), Ok(Some(12345)));
        assert_eq!(keypad.request_menu_choice(), Ok(None));
        assert_eq!(keypad.request_menu_choice(), Ok(Some(4)));
        assert_eq!(keypad.request_menu_choice(), Err(InputClosed));
    }

    #[test]
    fn test_interrupted_read_is_retried() {
        struct Flaky {
            interrupted: bool,
            inner: Cursor<&'static [u8]>,
        }

        impl std::io::Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                std::io::Read::read(&mut self.inner, buf)
            }
        }

        impl BufRead for Flaky {
            fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
                if !self.interrupted {
                    self.interrupted = true;
                    return Err(ErrorKind::Interrupted.into());
                }
                self.inner.fill_buf()
            }

            fn consume(&mut self, amount: usize) {
                self.inner.consume(amount)
            }
        }

        let mut keypad = ConsoleKeypad::new(Flaky {
            interrupted: false,
            inner: Cursor::new(&b"2\n"[..]),
        });
        assert_eq!(keypad.request_menu_choice(), Ok(Some(2)));
    }

    #[test]
    fn test_screen_prefixes_errors() {
        let mut screen = ConsoleScreen::new(Vec::new());
        screen.display_line("Welcome!");
        screen.display_error("Invalid amount: Amount must be positive");

        let output = String::from_utf8(screen.into_inner()).unwrap();
        assert_eq!(
            output,
            "Welcome!\nError: Invalid amount: Amount must be positive\n"
        );
    }
}
