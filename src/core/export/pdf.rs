//! Local PDF statement builder
//!
//! Writes a single-page PDF 1.4 document by hand. [`PdfBuilder`] tracks the
//! byte offset of every object as it is written, so the cross-reference table
//! is exact without a second pass.

use crate::domain::{DateRange, MetricsSnapshot, TransferRecord};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;

/// Default statement title
pub const DEFAULT_TITLE: &str = "VaultFlow - Monthly Statement";

/// Default number of ledger rows on the page
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Low-level PDF object writer
///
/// Objects are numbered from 1 in the order they are added.
#[derive(Debug)]
pub struct PdfBuilder {
    buffer: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut buffer = Vec::with_capacity(4096);
        buffer.extend_from_slice(b"%PDF-1.4\n");
        Self {
            buffer,
            offsets: Vec::new(),
        }
    }

    /// Append an object; returns its number
    pub fn add_object(&mut self, body: &[u8]) -> usize {
        let number = self.offsets.len() + 1;
        self.offsets.push(self.buffer.len());
        self.buffer
            .extend_from_slice(format!("{number} 0 obj\n").as_bytes());
        self.buffer.extend_from_slice(body);
        self.buffer.extend_from_slice(b"\nendobj\n");
        number
    }

    /// Append a stream object with an exact `/Length`
    pub fn add_stream(&mut self, content: &[u8]) -> usize {
        let mut body = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(b"\nendstream");
        self.add_object(&body)
    }

    /// Byte offsets of the objects written so far
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Write the xref table and trailer
    pub fn finish(mut self, root: usize) -> Vec<u8> {
        let xref_offset = self.buffer.len();
        let size = self.offsets.len() + 1;

        let mut tail = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = write!(tail, "{offset:010} 00000 n \n");
        }
        let _ = write!(
            tail,
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        );

        self.buffer.extend_from_slice(tail.as_bytes());
        self.buffer
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for a PDF string literal
///
/// Backslash and parentheses are escaped; anything outside ASCII becomes `?`.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Page layout for locally built statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLayout {
    pub title: String,
    pub max_rows: usize,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

/// Format an amount with two decimals, rounding half away from zero
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Text lines of the statement page, top to bottom
pub fn statement_lines(
    range: &DateRange,
    snapshot: &MetricsSnapshot,
    records: &[TransferRecord],
    layout: &StatementLayout,
) -> Vec<String> {
    let mut lines = vec![
        layout.title.clone(),
        format!("Period: {}", range.period_label()),
        format!(
            "Total transferred: ${}",
            format_amount(snapshot.total_transferred)
        ),
        format!(
            "{:<12} {:<12} {:<12} {:<11} {}",
            "Date", "FromAcct", "ToAcct", "Amount", "Ref"
        ),
    ];

    for record in records.iter().take(layout.max_rows) {
        lines.push(format!(
            "{:<12} {:<12} {:<12} ${:<10} {}",
            record.date.format("%Y-%m-%d"),
            truncate(&record.from_account, 12),
            truncate(&record.to_account, 12),
            format_amount(record.amount),
            truncate(&record.reference, 28)
        ));
    }

    if records.len() > layout.max_rows {
        lines.push(format!("...and {} more", records.len() - layout.max_rows));
    }

    lines
}

/// Build the complete single-page statement
///
/// Objects: 1 catalog, 2 page tree, 3 page, 4 content stream, 5 font.
pub fn build_pdf(
    range: &DateRange,
    snapshot: &MetricsSnapshot,
    records: &[TransferRecord],
    layout: &StatementLayout,
) -> Vec<u8> {
    let lines = statement_lines(range, snapshot, records, layout);
    let content = content_stream(&lines);

    let mut pdf = PdfBuilder::new();
    let catalog = pdf.add_object(b"<< /Type /Catalog /Pages 2 0 R >>");
    pdf.add_object(b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>");
    pdf.add_object(
        b"<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
          /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
    );
    pdf.add_stream(content.as_bytes());
    pdf.add_object(b"<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>");
    pdf.finish(catalog)
}

fn content_stream(lines: &[String]) -> String {
    let mut stream = String::from("BT\n/F1 16 Tf\n50 742 Td\n");

    for (i, line) in lines.iter().enumerate() {
        match i {
            0 => {}
            1 => stream.push_str("/F1 11 Tf\n0 -24 Td\n"),
            2 => stream.push_str("0 -16 Td\n"),
            3 => stream.push_str("/F1 9 Tf\n0 -24 Td\n"),
            _ => stream.push_str("0 -13 Td\n"),
        }
        let _ = writeln!(stream, "({}) Tj", escape_text(line));
    }

    stream.push_str("ET");
    stream
}
