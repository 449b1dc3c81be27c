//! A line-oriented CSV record reader for byte streams.

use std::io::{ErrorKind, Read, Result};

/// The separator bytes steering CSV record parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// The byte separating the fields of a record.
    pub delimiter: u8,
    /// The byte enclosing fields that contain separators or line breaks.
    pub quote: u8,
    /// The byte that makes the byte following it literal.
    pub escape: u8,
}

impl Dialect {
    /// Creates a `Dialect` from the given separator bytes.
    pub fn new(delimiter: u8, quote: u8, escape: u8) -> Self {
        Self{ delimiter, quote, escape }
    }
}

impl Default for Dialect {
    /// The conventional dialect: comma-separated, double-quoted,
    /// backslash-escaped.
    fn default() -> Self {
        Self::new(b',', b'"', b'\\')
    }
}

/// Reads the next CSV record from the given stream, consuming bytes up to and
/// including the record terminator.
///
/// A record ends at an unquoted line feed - a carriage return directly before
/// it is dropped - or at the end of the stream. Inside a quoted field,
/// separators and line breaks are literal, a doubled quote yields one literal
/// quote, and the escape byte makes the byte after it literal.
///
/// Returns `None` if the stream was already at its end, so an empty trailing
/// line is distinguishable from exhaustion.
///
/// The stream is read one byte at a time, so the caller's position in a
/// seekable stream stays exact - nothing beyond the terminator is consumed.
///
/// # Errors
///
/// In case of an IO error, an error variant is returned.
pub fn read_record<R: Read>(reader: &mut R, dialect: &Dialect) -> Result<Option<Vec<String>>> {
    let mut bytes = ByteReader::new(reader);
    let mut fields = Vec::new();
    let mut field: Vec<u8> = Vec::new();
    let mut quoted = false;
    let mut consumed = false;

    while let Some(byte) = bytes.next()? {
        consumed = true;
        if byte == dialect.escape {
            // The next byte is literal, quoted or not
            match bytes.next()? {
                Some(literal) => field.push(literal),
                None => {
                    field.push(byte);
                    break;
                }
            }
        }
        else if quoted {
            if byte == dialect.quote {
                if bytes.peek()? == Some(dialect.quote) {
                    // Doubled quote, keep one
                    bytes.next()?;
                    field.push(dialect.quote);
                }
                else {
                    quoted = false;
                }
            }
            else {
                field.push(byte);
            }
        }
        else if byte == dialect.quote && field.is_empty() {
            quoted = true;
        }
        else if byte == dialect.delimiter {
            fields.push(finish_field(&mut field));
        }
        else if byte == b'\n' {
            if field.last() == Some(&b'\r') {
                field.pop();
            }
            break;
        }
        else {
            field.push(byte);
        }
    }

    if !consumed {
        return Ok(None);
    }
    fields.push(finish_field(&mut field));
    Ok(Some(fields))
}

/// Takes the collected bytes of a field and decodes them into a `String`.
fn finish_field(field: &mut Vec<u8>) -> String {
    let bytes = std::mem::take(field);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A bytewise reader with a single byte of lookahead.
#[derive(Debug)]
struct ByteReader<'a, R: Read> {
    reader: &'a mut R,
    pending: Option<u8>,
}

impl <'a, R: Read> ByteReader<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self{ reader, pending: None }
    }

    /// Reads the next byte from the stream, `None` at the end of it.
    fn next(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pending.take() {
            return Ok(Some(byte));
        }
        let mut buffer = [0u8];
        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buffer[0])),
                Err(ref error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            }
        }
    }

    /// Peeks the next byte without consuming it.
    fn peek(&mut self) -> Result<Option<u8>> {
        if self.pending.is_none() {
            self.pending = self.next()?;
        }
        Ok(self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(input: &[u8]) -> Result<Option<Vec<String>>> {
        let mut input = input;
        read_record(&mut input, &Dialect::default())
    }

    #[test]
    fn test_simple_record() -> Result<()> {
        let mut input: &[u8] = b"hoge,fuga,\"piyo\"";
        let fields = read_record(&mut input, &Dialect::default())?;
        assert_eq!(fields, Some(vec![
            "hoge".to_string(),
            "fuga".to_string(),
            "piyo".to_string(),
        ]));
        // The stream is exhausted now
        assert_eq!(read_record(&mut input, &Dialect::default())?, None);
        Ok(())
    }

    #[test]
    fn test_terminators() -> Result<()> {
        let mut input: &[u8] = b"a,b\r\nc,d\ne";
        let dialect = Dialect::default();
        assert_eq!(read_record(&mut input, &dialect)?,
            Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(read_record(&mut input, &dialect)?,
            Some(vec!["c".to_string(), "d".to_string()]));
        assert_eq!(read_record(&mut input, &dialect)?,
            Some(vec!["e".to_string()]));
        assert_eq!(read_record(&mut input, &dialect)?, None);
        Ok(())
    }

    #[test]
    fn test_quoted_field() -> Result<()> {
        let fields = record(b"\"Doe, John\",42\n")?;
        assert_eq!(fields, Some(vec!["Doe, John".to_string(), "42".to_string()]));
        Ok(())
    }

    #[test]
    fn test_quoted_line_break() -> Result<()> {
        let mut input: &[u8] = b"\"two\nlines\",x\nnext";
        let dialect = Dialect::default();
        assert_eq!(read_record(&mut input, &dialect)?,
            Some(vec!["two\nlines".to_string(), "x".to_string()]));
        assert_eq!(read_record(&mut input, &dialect)?,
            Some(vec!["next".to_string()]));
        Ok(())
    }

    #[test]
    fn test_doubled_quote() -> Result<()> {
        let fields = record(b"\"say \"\"hi\"\"\"")?;
        assert_eq!(fields, Some(vec!["say \"hi\"".to_string()]));
        Ok(())
    }

    #[test]
    fn test_escape() -> Result<()> {
        let fields = record(b"a\\,b,c")?;
        assert_eq!(fields, Some(vec!["a,b".to_string(), "c".to_string()]));
        let fields = record(b"\"a\\\"b\"")?;
        assert_eq!(fields, Some(vec!["a\"b".to_string()]));
        Ok(())
    }

    #[test]
    fn test_empty_stream() -> Result<()> {
        assert_eq!(record(b"")?, None);
        Ok(())
    }

    #[test]
    fn test_blank_line() -> Result<()> {
        // A blank line is a record with one empty field, not exhaustion
        assert_eq!(record(b"\n")?, Some(vec![String::new()]));
        Ok(())
    }

    #[test]
    fn test_custom_dialect() -> Result<()> {
        let dialect = Dialect::new(b';', b'\'', b'^');
        let mut input: &[u8] = b"'a;b';c^;d\n";
        let fields = read_record(&mut input, &dialect)?;
        assert_eq!(fields, Some(vec!["a;b".to_string(), "c;d".to_string()]));
        Ok(())
    }
}
