//! NDJSON (newline-delimited JSON) stream sink.
//!
//! Each row is serialized directly to the writer without intermediate
//! `String` allocation.
//!
//! ```ignore
//! let mut sink = JsonStreamSink::stdout();
//! sink.write_modules(&rows.modules)?;
//! sink.write_definitions(&rows.definitions)?;
//! let written = sink.finish()?;
//! ```

use super::{DefinitionRow, ModuleRow, ParamRow, TreeRows};
use serde::Serialize;
use std::io::{self, BufWriter, Write};

/// Buffered NDJSON writer over any `Write` impl.
pub struct JsonStreamSink<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl JsonStreamSink<io::Stdout> {
    /// Write NDJSON to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonStreamSink<W> {
    /// Create a sink wrapping any writer (file, `Vec<u8>`, etc.).
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
            rows_written: 0,
        }
    }

    fn write_row<T: Serialize>(&mut self, row: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.writer, row)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.writer.write_all(b"\n")?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_modules(&mut self, rows: &[ModuleRow]) -> io::Result<()> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    pub fn write_definitions(&mut self, rows: &[DefinitionRow]) -> io::Result<()> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    pub fn write_params(&mut self, rows: &[ParamRow]) -> io::Result<()> {
        rows.iter().try_for_each(|row| self.write_row(row))
    }

    /// Writes every row of a flattened tree.
    pub fn write_tree(&mut self, rows: &TreeRows) -> io::Result<()> {
        self.write_modules(&rows.modules)?;
        self.write_definitions(&rows.definitions)?;
        self.write_params(&rows.params)
    }

    /// Flush and return how many rows were written.
    pub fn finish(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        Ok(self.rows_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndjson_rows_are_line_delimited_json() {
        let mut buf = Vec::new();
        let mut sink = JsonStreamSink::new(&mut buf);

        let module = ModuleRow {
            module: "pkg".into(),
            kind: "package",
            file: "pkg/__init__.py".into(),
            classes: 1,
            functions: 2,
            variables: 0,
        };
        let definition = DefinitionRow {
            module: "pkg".into(),
            kind: "function",
            name: "test_function".into(),
            class: String::new(),
            signature: "def test_function(a, *args):".into(),
            is_async: false,
            bases: vec![],
        };
        let param = ParamRow {
            module: "pkg".into(),
            function: "test_function".into(),
            class: String::new(),
            name: "args".into(),
            kind: "var_positional",
            annotation: None,
            default: None,
        };

        sink.write_modules(&[module]).unwrap();
        sink.write_definitions(&[definition]).unwrap();
        sink.write_params(&[param]).unwrap();
        let written = sink.finish().unwrap();
        assert_eq!(written, 3);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 3);

        for line in &lines {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }

        let parsed: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(parsed["kind"], "var_positional");
    }
}
