//! Local CSV statement builder

use crate::domain::TransferRecord;

/// Column header of locally built statements
pub const CSV_HEADER: &str = "Date,Sender,Recipient,Amount,Reference";

/// Build a CSV statement from `records`, in the order given
///
/// Columns follow the ledger parser's positional order, so the output parses
/// back into the same records. Lines end with LF.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use vaultflow::core::export::csv::build_csv;
/// use vaultflow::domain::TransferRecord;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
/// let csv = build_csv(&[TransferRecord::new(date, "A1", "B2", dec!(12.50), "rent, march")]);
/// assert_eq!(
///     String::from_utf8(csv).unwrap(),
///     "Date,Sender,Recipient,Amount,Reference\n2025-03-02,A1,B2,12.50,\"rent, march\"\n"
/// );
/// ```
pub fn build_csv(records: &[TransferRecord]) -> Vec<u8> {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + records.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');

    for record in records {
        let date = record.date.format("%Y-%m-%d").to_string();
        let amount = record.amount.to_string();
        let fields = [
            date.as_str(),
            record.from_account.as_str(),
            record.to_account.as_str(),
            amount.as_str(),
            record.reference.as_str(),
        ];

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, field);
        }
        out.push('\n');
    }

    out.into_bytes()
}

/// Append `field`, quoted when it holds a delimiter, a quote, a line break or
/// edge whitespace
fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains(&[',', '"', '\r', '\n'][..])
        || field.trim() != field;
    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}
