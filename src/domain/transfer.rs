//! Ledger transfer records

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the delimited ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Booking date
    pub date: NaiveDate,

    /// Sender account number
    pub from_account: String,

    /// Recipient account number
    pub to_account: String,

    /// Signed amount
    pub amount: Decimal,

    /// Free-form reference (transaction id on server exports)
    pub reference: String,
}

impl TransferRecord {
    pub fn new(
        date: NaiveDate,
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount: Decimal,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            date,
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount,
            reference: reference.into(),
        }
    }
}

/// Sort records by date descending, keeping input order among equal dates
pub fn sort_newest_first(records: &mut [TransferRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}
