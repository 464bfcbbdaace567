//! Delimited tables (TSV / CSV).
//!
//! Files start with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding. Fields are quoted only when they contain the delimiter, a
//! double quote or a line break; rows end with `\r\n`.

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub const UTF8_BOM: &str = "\u{feff}";

pub struct DelimitedWriter<W: Write> {
    inner: W,
    delimiter: char,
}

impl DelimitedWriter<BufWriter<File>> {
    /// Truncate (or create) `path` and write the byte-order mark.
    pub fn create(path: &Path, delimiter: char) -> io::Result<Self> {
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(UTF8_BOM.as_bytes())?;
        Ok(Self::new(file, delimiter))
    }

    /// Open `path` for appending. The byte-order mark is written only when the
    /// file is new or empty.
    pub fn append(path: &Path, delimiter: char) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let empty = file.metadata()?.len() == 0;
        let mut file = BufWriter::new(file);
        if empty {
            file.write_all(UTF8_BOM.as_bytes())?;
        }
        Ok(Self::new(file, delimiter))
    }
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(inner: W, delimiter: char) -> Self {
        Self { inner, delimiter }
    }

    pub fn write_row<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buf = [0u8; 4];
        let delim = self.delimiter.encode_utf8(&mut buf);
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.inner.write_all(delim.as_bytes())?;
            }
            let field = quote_field(field.as_ref(), self.delimiter);
            self.inner.write_all(field.as_bytes())?;
        }
        self.inner.write_all(b"\r\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

pub fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\r' || c == '\n');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_quoting() {
        assert_eq!(quote_field("sākšana", '\t'), "sākšana");
        assert_eq!(quote_field("a,b", ','), "\"a,b\"");
        assert_eq!(quote_field("a,b", '\t'), "a,b");
        assert_eq!(quote_field("say \"hi\"", '\t'), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("a\tb", '\t'), "\"a\tb\"");
    }

    #[test]
    fn rows_end_with_crlf() {
        let mut w = DelimitedWriter::new(Vec::new(), '\t');
        w.write_row(["Lemma", "Kandidāts"]).unwrap();
        w.write_row(["sākt", ""]).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, "Lemma\tKandidāts\r\nsākt\t\r\n");
    }

    #[test]
    fn append_writes_bom_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.tsv");
        for row in [["a", "b"], ["c", "d"]] {
            let mut w = DelimitedWriter::append(&path, '\t').unwrap();
            w.write_row(row).unwrap();
            w.flush().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{UTF8_BOM}a\tb\r\nc\td\r\n"));
    }

    #[test]
    fn create_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        std::fs::write(&path, "old contents").unwrap();
        let mut w = DelimitedWriter::create(&path, '\t').unwrap();
        w.write_row(["x"]).unwrap();
        w.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{UTF8_BOM}x\r\n"));
    }
}
