//! Lenient mapping of metrics payloads
//!
//! Field names have drifted across server versions. Each snapshot field has a
//! list of aliases; the first present, non-null one wins. Dotted aliases are
//! nested lookups (`transfers.total` reads `{"transfers": {"total": ...}}`).

use crate::domain::MetricsSnapshot;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

pub const TOTAL_ALIASES: &[&str] = &["totalTransferred", "totalAmount", "transfers.total"];
pub const NEW_USERS_ALIASES: &[&str] = &["newUsers", "newUserCount", "users.new"];
pub const UNUSUAL_ALIASES: &[&str] = &[
    "unusualActivityCount",
    "unusualActivity",
    "unusualCount",
    "unusualDays",
];
pub const TRANSFER_SERIES_ALIASES: &[&str] =
    &["dailyTransferSeries", "dailyTransfers", "transfers.daily"];
pub const USER_SERIES_ALIASES: &[&str] = &["dailyUserSeries", "dailyNewUsers", "users.daily"];

/// Map a JSON object to a snapshot
///
/// Missing, null or unparsable values become zero (or an empty series).
/// Negative counts clamp to zero.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use vaultflow::adapters::api::mapping::map_snapshot;
///
/// let snapshot = map_snapshot(&json!({
///     "totalAmount": "1250.75",
///     "users": { "new": 4 },
///     "dailyTransfers": [1, "2.5", null]
/// }));
///
/// assert_eq!(snapshot.total_transferred.to_string(), "1250.75");
/// assert_eq!(snapshot.new_users, 4);
/// assert_eq!(snapshot.daily_transfer_series.len(), 3);
/// ```
pub fn map_snapshot(body: &Value) -> MetricsSnapshot {
    MetricsSnapshot {
        total_transferred: lookup(body, TOTAL_ALIASES)
            .map(to_decimal)
            .unwrap_or_default(),
        new_users: lookup(body, NEW_USERS_ALIASES).map(to_count).unwrap_or(0),
        unusual_activity_count: lookup(body, UNUSUAL_ALIASES).map(to_count).unwrap_or(0),
        daily_transfer_series: lookup(body, TRANSFER_SERIES_ALIASES)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(to_decimal).collect())
            .unwrap_or_default(),
        daily_user_series: lookup(body, USER_SERIES_ALIASES)
            .and_then(Value::as_array)
            .map(|items| items.iter().map(to_count).collect())
            .unwrap_or_default(),
    }
}

/// First present, non-null value among `aliases`
pub fn lookup<'a>(body: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| {
            alias
                .split('.')
                .try_fold(body, |node, key| node.get(key))
        })
        .find(|value| !value.is_null())
}

/// Numeric value as a decimal; anything unreadable is zero
pub fn to_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64()
                    .and_then(Decimal::from_f64)
                    .unwrap_or_default()
            }
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .unwrap_or_default()
        }
        _ => Decimal::ZERO,
    }
}

/// Non-negative integer count; fractions truncate, negatives clamp to zero
pub fn to_count(value: &Value) -> u64 {
    let decimal = to_decimal(value);
    if decimal.is_sign_negative() {
        return 0;
    }
    decimal.trunc().to_u64().unwrap_or(0)
}
