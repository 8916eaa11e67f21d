//! Delimited ledger parsing
//!
//! The statement server emits comma-separated text with a header row. Parsing
//! is total: rows that cannot be read are skipped and counted, never reported
//! as errors.

use crate::domain::transfer::sort_newest_first;
use crate::domain::{DateRange, Result, TransferRecord};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Anything that can produce the ledger for a period
#[async_trait]
pub trait LedgerSource: Send + Sync {
    async fn fetch_ledger(&self, range: &DateRange) -> Result<Vec<TransferRecord>>;
}

/// Row counts from one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Data rows after the header
    pub rows_seen: usize,
    pub rows_skipped: usize,
}

/// Parse ledger text into records, newest first
///
/// # Example
///
/// ```
/// use vaultflow::core::ledger::parse;
///
/// let records = parse("date,from,to,amount,reference\n\
///                      2025-03-01,A,B,\"1,250.00\",rent\n\
///                      2025-03-04,A,C,100,\"groceries, weekly\"\n");
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].reference, "groceries, weekly");
/// assert_eq!(records[1].amount.to_string(), "1250.00");
/// ```
pub fn parse(raw: &str) -> Vec<TransferRecord> {
    parse_with_report(raw).0
}

/// Same as [`parse`], also returning row counts
pub fn parse_with_report(raw: &str) -> (Vec<TransferRecord>, ParseReport) {
    let mut report = ParseReport::default();
    let mut records = Vec::new();

    for (line, fields) in tokenize(raw).into_iter().enumerate().skip(1) {
        if fields.len() == 1 && !fields[0].quoted && fields[0].text.trim().is_empty() {
            continue;
        }
        report.rows_seen += 1;

        match parse_row(&fields) {
            Some(record) => records.push(record),
            None => {
                report.rows_skipped += 1;
                tracing::debug!(record = line, fields = fields.len(), "Skipping ledger row");
            }
        }
    }

    sort_newest_first(&mut records);
    (records, report)
}

fn parse_row(fields: &[Field]) -> Option<TransferRecord> {
    if fields.len() < 5 {
        return None;
    }

    let date = parse_date(&fields[0].text)?;
    Some(TransferRecord {
        date,
        from_account: fields[1].value(),
        to_account: fields[2].value(),
        amount: parse_amount(&fields[3].text),
        reference: fields[4].value(),
    })
}

/// Calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_date(field: &str) -> Option<NaiveDate> {
    let field = field.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(field) {
        return Some(ts.date_naive());
    }

    let prefix = field.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Signed amount from a loosely formatted field; unreadable input is zero
///
/// A single comma with no dot is a decimal comma (`100,50`); any other comma
/// groups thousands. Everything except digits, `.` and `-` is then dropped.
pub fn parse_amount(field: &str) -> Decimal {
    let field = field.trim();
    let commas = field.matches(',').count();

    let normalized = if commas == 1 && !field.contains('.') {
        field.replace(',', ".")
    } else {
        field.replace(',', "")
    };

    let cleaned: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// One tokenized field
#[derive(Debug, Default)]
struct Field {
    text: String,
    quoted: bool,
}

impl Field {
    /// Quoted content is literal; unquoted content is trimmed
    fn value(&self) -> String {
        if self.quoted {
            self.text.clone()
        } else {
            self.text.trim().to_string()
        }
    }
}

/// Split text into records of fields
///
/// Outside quotes, LF, CRLF and a bare CR end a record. Inside quotes, commas
/// and line breaks are literal and `""` is one quote.
fn tokenize(raw: &str) -> Vec<Vec<Field>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = Field::default();
    let mut state = State::FieldStart;
    let mut chars = raw.chars().peekable();

    let mut end_record = |fields: &mut Vec<Field>, field: &mut Field| {
        fields.push(std::mem::take(field));
        records.push(std::mem::take(fields));
    };

    while let Some(c) = chars.next() {
        match (state, c) {
            (State::Quoted, '"') => state = State::QuoteInQuoted,
            (State::Quoted, _) => field.text.push(c),
            (State::QuoteInQuoted, '"') => {
                field.text.push('"');
                state = State::Quoted;
            }
            (State::FieldStart, '"') => {
                field.quoted = true;
                state = State::Quoted;
            }
            (_, ',') => {
                fields.push(std::mem::take(&mut field));
                state = State::FieldStart;
            }
            (_, '\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                end_record(&mut fields, &mut field);
                state = State::FieldStart;
            }
            (_, '\n') => {
                end_record(&mut fields, &mut field);
                state = State::FieldStart;
            }
            // Text after a closing quote is kept as-is
            (_, _) => {
                field.text.push(c);
                state = State::Unquoted;
            }
        }
    }

    if !field.text.is_empty() || field.quoted || !fields.is_empty() {
        end_record(&mut fields, &mut field);
    }

    records
}
