use std::fmt::{Display, Formatter};

use hex::encode_upper;
use log::warn;

/// Bytes shown per binary dump row.
const BINARY_ROW_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RowKind {
    /// Marker or note not tied to a decoded field.
    Comment,
    /// Segment type and size.
    Segment,
    /// A decoded segment field.
    Field,
    /// Hex dump of raw bytes.
    Binary,
    /// Consistency problem found in the data.
    Warning,
}

/// One line of the analysis trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: RowKind,
    /// File offset the row refers to, `None` for continuation lines.
    pub offset: Option<u64>,
    /// Analysis nesting level.
    pub level: u8,
    pub col1: String,
    pub col2: String,
    pub col3: String,
}

impl Row {
    pub fn display(&self, format: OffsetFormat) -> RowDisplay<'_> {
        RowDisplay { row: self, format }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OffsetFormat {
    #[default]
    Decimal,
    Hexadecimal,
}

impl OffsetFormat {
    pub fn format(self, offset: u64) -> String {
        match self {
            Self::Decimal => format!("{}", offset),
            Self::Hexadecimal => format!("{:08x}", offset),
        }
    }
}

pub struct RowDisplay<'a> {
    row: &'a Row,
    format: OffsetFormat,
}

impl<'a> Display for RowDisplay<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let row = self.row;
        let offset = row.offset.map(|o| self.format.format(o)).unwrap_or_default();
        write!(
            f,
            "{:>10}  {:indent$}{:<8} {:<4} {:<28} {}",
            offset,
            "",
            row.kind,
            row.col1,
            row.col2,
            row.col3,
            indent = row.level as usize * 2,
        )
    }
}

/// Receives the rows produced while decoding.
pub trait RowSink {
    fn push(&mut self, row: Row);
}

impl RowSink for Vec<Row> {
    fn push(&mut self, row: Row) {
        Vec::push(self, row);
    }
}

/// A warning of up to three lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    lines: Vec<String>,
}

impl Diagnostic {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        debug_assert!(self.lines.len() < 3, "diagnostic longer than 3 lines");
        self.lines.push(line.into());
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Writes rows for the structure that starts at `base`.
pub(crate) struct Emitter<'s> {
    sink: &'s mut dyn RowSink,
    level: u8,
    base: u64,
    col1: String,
}

impl<'s> Emitter<'s> {
    pub fn new(sink: &'s mut dyn RowSink, level: u8) -> Self {
        Self {
            sink,
            level,
            base: 0,
            col1: String::new(),
        }
    }

    /// Start a new structure at file offset `base`, rows are labelled `col1`.
    pub fn begin(&mut self, base: u64, col1: impl Into<String>) {
        self.base = base;
        self.col1 = col1.into();
    }

    fn push(&mut self, kind: RowKind, offset: Option<u64>, level: u8, col2: String, col3: String) {
        self.sink.push(Row {
            kind,
            offset,
            level,
            col1: self.col1.clone(),
            col2,
            col3,
        });
    }

    pub fn comment(&mut self, rel: usize, col2: impl Into<String>, col3: impl Into<String>) {
        let offset = self.base + rel as u64;
        self.push(RowKind::Comment, Some(offset), self.level, col2.into(), col3.into());
    }

    pub fn segment(&mut self, rel: usize, col2: impl Into<String>, col3: impl Into<String>) {
        let offset = self.base + rel as u64;
        self.push(RowKind::Segment, Some(offset), self.level, col2.into(), col3.into());
    }

    pub fn field(&mut self, rel: usize, col2: impl Into<String>, col3: impl Into<String>) {
        let offset = self.base + rel as u64;
        self.push(RowKind::Field, Some(offset), self.level + 1, col2.into(), col3.into());
    }

    /// Field line without an offset of its own, derived from the field above.
    pub fn note(&mut self, col2: impl Into<String>, col3: impl Into<String>) {
        self.push(RowKind::Field, None, self.level + 2, col2.into(), col3.into());
    }

    pub fn binary(&mut self, rel: usize, bytes: &[u8]) {
        for (i, chunk) in bytes.chunks(BINARY_ROW_LEN).enumerate() {
            let offset = self.base + (rel + i * BINARY_ROW_LEN) as u64;
            let hex = chunk.chunks(4).map(encode_upper).collect::<Vec<_>>().join(" ");
            self.push(RowKind::Binary, Some(offset), self.level + 1, String::new(), hex);
        }
    }

    pub fn warning(&mut self, rel: usize, diag: &Diagnostic) {
        let offset = self.base + rel as u64;
        for (i, line) in diag.lines().iter().enumerate() {
            warn!("offset {}: {}", offset, line);
            let offset = (i == 0).then_some(offset);
            self.push(RowKind::Warning, offset, self.level, String::new(), line.clone());
        }
    }
}

#[cfg(test)]
mod tests;
