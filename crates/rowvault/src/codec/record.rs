//! Record framing: comma-joined fields with minimal quoting.
//!
//! One record per row. A field is quoted only when it contains a comma, a
//! double quote, or a line break, or when it is present but empty; internal
//! quotes are doubled. The reader preserves whether each field was quoted,
//! because that flag is what keeps the absent empty token and a
//! present-but-empty one apart.
//!
//! Quoted fields may span line breaks. Both `\n` and `\r\n` (and bare `\r`)
//! terminate records, so artifacts survive CRLF transports. An empty line
//! is a record with a single absent field, mirroring the write side where a
//! one-column row holding an absent value produces exactly that.

use std::io::BufRead;

use crate::error::{Result, VaultError};

/// One field as it appeared in a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field text, with quoting removed and doubled quotes collapsed.
    pub text: String,

    /// Whether the field was quoted in the record.
    pub quoted: bool,
}

/// Join encoded tokens into one record line, without the terminator.
///
/// `None` tokens are absent and render as the empty token. Present tokens
/// are quoted when the content requires it or when they are empty.
pub fn write_record(tokens: &[Option<String>]) -> String {
    let mut line = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        if let Some(token) = token {
            push_field(&mut line, token);
        }
    }
    line
}

fn needs_quoting(token: &str) -> bool {
    token.is_empty() || token.chars().any(|c| matches!(c, ',' | '"' | '\n' | '\r'))
}

fn push_field(line: &mut String, token: &str) {
    if !needs_quoting(token) {
        line.push_str(token);
        return;
    }
    line.push('"');
    for c in token.chars() {
        if c == '"' {
            line.push('"');
        }
        line.push(c);
    }
    line.push('"');
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    InUnquoted,
    InQuoted,
    AfterQuote,
}

/// Incremental record reader over a buffered input.
///
/// Yields one record at a time. The structural bytes (`,`, `"`, `\n`, `\r`)
/// are all ASCII, so the scan works on bytes and validates UTF-8 once per
/// field.
pub struct RecordReader<R> {
    input: R,
    peeked: Option<u8>,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a reader over `input`.
    pub fn new(input: R) -> Self {
        Self {
            input,
            peeked: None,
        }
    }

    /// The next record, or `None` at end of input.
    ///
    /// A final record without a trailing line break is still returned.
    pub fn next_record(&mut self) -> Result<Option<Vec<Field>>> {
        let mut fields: Vec<Field> = Vec::new();
        let mut text: Vec<u8> = Vec::new();
        let mut state = State::FieldStart;

        loop {
            let byte = match self.read_byte()? {
                Some(b) => b,
                None => {
                    return match state {
                        State::FieldStart if fields.is_empty() => Ok(None),
                        State::InQuoted => Err(VaultError::MalformedRecord(
                            "unterminated quoted field".to_string(),
                        )),
                        State::AfterQuote => {
                            fields.push(finish_field(&mut text, true)?);
                            Ok(Some(fields))
                        }
                        _ => {
                            fields.push(finish_field(&mut text, false)?);
                            Ok(Some(fields))
                        }
                    };
                }
            };

            match state {
                State::FieldStart => match byte {
                    b'"' => state = State::InQuoted,
                    b',' => fields.push(finish_field(&mut text, false)?),
                    b'\n' | b'\r' => {
                        if byte == b'\r' {
                            self.skip_linefeed()?;
                        }
                        fields.push(finish_field(&mut text, false)?);
                        return Ok(Some(fields));
                    }
                    other => {
                        text.push(other);
                        state = State::InUnquoted;
                    }
                },
                State::InUnquoted => match byte {
                    b',' => {
                        fields.push(finish_field(&mut text, false)?);
                        state = State::FieldStart;
                    }
                    b'\n' | b'\r' => {
                        if byte == b'\r' {
                            self.skip_linefeed()?;
                        }
                        fields.push(finish_field(&mut text, false)?);
                        return Ok(Some(fields));
                    }
                    other => text.push(other),
                },
                State::InQuoted => match byte {
                    // Line breaks and commas are ordinary content here.
                    b'"' => state = State::AfterQuote,
                    other => text.push(other),
                },
                State::AfterQuote => match byte {
                    b'"' => {
                        // Doubled quote: literal quote, still inside the field.
                        text.push(b'"');
                        state = State::InQuoted;
                    }
                    b',' => {
                        fields.push(finish_field(&mut text, true)?);
                        state = State::FieldStart;
                    }
                    b'\n' | b'\r' => {
                        if byte == b'\r' {
                            self.skip_linefeed()?;
                        }
                        fields.push(finish_field(&mut text, true)?);
                        return Ok(Some(fields));
                    }
                    other => {
                        return Err(VaultError::MalformedRecord(format!(
                            "unexpected byte 0x{:02x} after closing quote",
                            other
                        )))
                    }
                },
            }
        }
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.peeked.take() {
            return Ok(Some(b));
        }
        loop {
            let buf = match self.input.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                return Ok(None);
            }
            let byte = buf[0];
            self.input.consume(1);
            return Ok(Some(byte));
        }
    }

    // A record terminated by \r may be followed by \n; swallow it.
    fn skip_linefeed(&mut self) -> Result<()> {
        if let Some(b) = self.read_byte()? {
            if b != b'\n' {
                self.peeked = Some(b);
            }
        }
        Ok(())
    }
}

fn finish_field(text: &mut Vec<u8>, quoted: bool) -> Result<Field> {
    let bytes = std::mem::take(text);
    let text = String::from_utf8(bytes)
        .map_err(|_| VaultError::MalformedRecord("field is not valid UTF-8".to_string()))?;
    Ok(Field { text, quoted })
}
