//! The single source of the month-derivation rule.
//!
//! A transaction's month bucket is the `YYYY-MM` prefix of its `YYYY-MM-DD`
//! date. Deriving it in one place keeps the creation and reconciliation paths
//! from drifting apart.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Validate `date` as a `YYYY-MM-DD` calendar date and return its `YYYY-MM`
/// month bucket.
///
/// # Errors
/// Returns [Error::InvalidDate] if `date` does not parse as a calendar date
/// in that format.
pub fn derive_month(date: &str) -> Result<String, Error> {
    Date::parse(date, DATE_FORMAT).map_err(|_| Error::InvalidDate(date.to_owned()))?;

    Ok(date[..7].to_owned())
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::derive_month;

    #[test]
    fn derives_month_from_date() {
        assert_eq!(derive_month("2025-03-05").unwrap(), "2025-03");
    }

    #[test]
    fn rejects_malformed_dates() {
        for date in ["", "2025-03", "05-03-2025", "2025-3-5", "2025-03-05T12:00", "garbage"] {
            let result = derive_month(date);
            assert_eq!(result, Err(Error::InvalidDate(date.to_owned())), "date: {date:?}");
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        assert!(derive_month("2025-02-30").is_err());
        assert!(derive_month("2025-13-01").is_err());
    }
}
