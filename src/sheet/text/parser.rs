//! Record parser for delimited text

use crate::common::{Error, Result};

use super::config::TextConfig;

/// Splits decoded text into records of raw field strings.
///
/// Handles quoted fields with doubled quotes, quoted line breaks, and `\n`,
/// `\r\n` or bare `\r` line ends. A blank line is a record with one empty
/// field, so record N is always line N of the file when no quoted field
/// spans lines.
pub struct TextParser<'a> {
    data: &'a [u8],
    pos: usize,
    /// One-based line of the next unread byte
    line: usize,
    config: &'a TextConfig,
}

impl<'a> TextParser<'a> {
    pub fn new(text: &'a str, config: &'a TextConfig) -> Self {
        TextParser {
            data: text.as_bytes(),
            pos: 0,
            line: 1,
            config,
        }
    }

    /// Parse the next record, or `None` at end of input.
    pub fn parse_row(&mut self) -> Option<Result<Vec<String>>> {
        if self.pos >= self.data.len() {
            return None;
        }

        let mut fields = Vec::new();
        loop {
            let field = if self.data.get(self.pos) == Some(&self.config.quote) {
                match self.quoted_field() {
                    Ok(field) => field,
                    Err(e) => {
                        self.pos = self.data.len();
                        return Some(Err(e));
                    },
                }
            } else {
                self.plain_field()
            };
            fields.push(field);

            match self.data.get(self.pos) {
                Some(&b) if b == self.config.delimiter => self.pos += 1,
                Some(b'\r') => {
                    self.pos += 1;
                    if self.data.get(self.pos) == Some(&b'\n') {
                        self.pos += 1;
                    }
                    self.line += 1;
                    return Some(Ok(fields));
                },
                Some(b'\n') => {
                    self.pos += 1;
                    self.line += 1;
                    return Some(Ok(fields));
                },
                _ => return Some(Ok(fields)),
            }
        }
    }

    // Unquoted field: everything up to the delimiter or a line end.
    fn plain_field(&mut self) -> String {
        let rest = &self.data[self.pos..];
        let len = memchr::memchr3(self.config.delimiter, b'\n', b'\r', rest).unwrap_or(rest.len());
        self.pos += len;
        String::from_utf8_lossy(&rest[..len]).into_owned()
    }

    // Quoted field starting at the opening quote. Text between the closing
    // quote and the next delimiter is kept verbatim.
    fn quoted_field(&mut self) -> Result<String> {
        let quote = self.config.quote;
        let start_line = self.line;
        let mut field = Vec::new();
        self.pos += 1;

        loop {
            let rest = &self.data[self.pos..];
            let Some(offset) = memchr::memchr(quote, rest) else {
                return Err(Error::MalformedCsv {
                    line: start_line,
                    reason: "unterminated quoted field".to_string(),
                });
            };
            field.extend_from_slice(&rest[..offset]);
            self.line += memchr::memchr_iter(b'\n', &rest[..offset]).count();
            self.pos += offset + 1;

            if self.data.get(self.pos) == Some(&quote) {
                field.push(quote);
                self.pos += 1;
            } else {
                break;
            }
        }

        let rest = &self.data[self.pos..];
        let trailing =
            memchr::memchr3(self.config.delimiter, b'\n', b'\r', rest).unwrap_or(rest.len());
        field.extend_from_slice(&rest[..trailing]);
        self.pos += trailing;

        Ok(String::from_utf8_lossy(&field).into_owned())
    }

    /// Line number the parser has reached.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Iterator for TextParser<'_> {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.parse_row()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<String>> {
        let config = TextConfig::default();
        TextParser::new(text, &config)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_simple_csv_parsing() {
        let parsed = rows("name,age,city\nJohn,25,New York\nJane,30,London");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], ["name", "age", "city"]);
        assert_eq!(parsed[1], ["John", "25", "New York"]);
        assert_eq!(parsed[2], ["Jane", "30", "London"]);
    }

    #[test]
    fn test_quoted_fields() {
        let parsed = rows("\"Hello, World\",\"Value with \"\"quotes\"\"\",\"Normal\"");
        assert_eq!(
            parsed[0],
            ["Hello, World", "Value with \"quotes\"", "Normal"]
        );
    }

    #[test]
    fn test_line_endings_and_blank_lines() {
        let parsed = rows("a,b\r\n\r\nc,d\re,f\n");
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[1], [""]);
        assert_eq!(parsed[2], ["c", "d"]);
        assert_eq!(parsed[3], ["e", "f"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_empty_field() {
        let parsed = rows("a,b,\n");
        assert_eq!(parsed[0], ["a", "b", ""]);
    }

    #[test]
    fn test_quoted_line_break() {
        let config = TextConfig::default();
        let mut parser = TextParser::new("\"line one\nline two\",x\nnext,y\n", &config);
        let first = parser.parse_row().unwrap().unwrap();
        assert_eq!(first, ["line one\nline two", "x"]);
        assert_eq!(parser.line(), 3);
        let second = parser.parse_row().unwrap().unwrap();
        assert_eq!(second, ["next", "y"]);
        assert!(parser.parse_row().is_none());
    }

    #[test]
    fn test_unterminated_quote() {
        let config = TextConfig::default();
        let mut parser = TextParser::new("ok,1\n\"never closed,2\n", &config);
        assert!(parser.parse_row().unwrap().is_ok());
        match parser.parse_row() {
            Some(Err(Error::MalformedCsv { line, .. })) => assert_eq!(line, 2),
            other => panic!("expected MalformedCsv, got {other:?}"),
        }
        assert!(parser.parse_row().is_none());
    }

    #[test]
    fn test_custom_delimiter_and_quote() {
        let config = TextConfig::new().with_delimiter(b';').with_quote(b'\'');
        let parsed: Vec<_> = TextParser::new("'a;b';c\n", &config)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(parsed[0], ["a;b", "c"]);
    }

    #[test]
    fn test_multibyte_text() {
        let parsed = rows("確定,\"山田 太郎\"\n");
        assert_eq!(parsed[0], ["確定", "山田 太郎"]);
    }
}
