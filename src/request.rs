use std::fmt;
use chrono::NaiveDate;

pub const INVALID_DATE_MESSAGE: &str = "invalid date format, use YYYY-MM-DD";

#[derive(Debug, PartialEq)]
pub struct ValidationError(pub String);

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidationError: {}", self.0)
    }
}

/// A validated date together with its inclusive day bounds
///
#[derive(Debug, Clone, PartialEq)]
pub struct DayWindow {
    pub date: String,
    pub from: String,
    pub to: String,
}

/// Validates the date parameter of a request and derives the day bounds from it
///
/// Only the `YYYY-MM-DD` shape is checked, so a date such as `2024-13-40` passes and will
/// simply match no readings.
///
/// # Arguments
///
/// * 'date' - the date parameter, if any
/// * 'today' - the date to use when no parameter was given
pub fn validate_date(date: Option<&str>, today: NaiveDate) -> Result<DayWindow, ValidationError> {
    let date = match date {
        Some(d) => {
            if !is_date_shaped(d) {
                return Err(ValidationError(format!("{:?} is not shaped YYYY-MM-DD", d)));
            }
            d.to_string()
        }
        None => today.format("%Y-%m-%d").to_string(),
    };

    Ok(DayWindow {
        from: format!("{} 00:00:00", date),
        to: format!("{} 23:59:59", date),
        date,
    })
}

fn is_date_shaped(date: &str) -> bool {
    let bytes = date.as_bytes();
    bytes.len() == 10 && bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn derives_day_bounds() {
        let window = validate_date(Some("2024-01-01"), today()).unwrap();
        assert_eq!(window.date, "2024-01-01");
        assert_eq!(window.from, "2024-01-01 00:00:00");
        assert_eq!(window.to, "2024-01-01 23:59:59");
    }

    #[test]
    fn defaults_to_today() {
        let window = validate_date(None, today()).unwrap();
        assert_eq!(window, validate_date(Some("2024-03-09"), today()).unwrap());
    }

    #[test]
    fn accepts_non_calendar_dates() {
        let window = validate_date(Some("2024-13-40"), today()).unwrap();
        assert_eq!(window.from, "2024-13-40 00:00:00");
    }

    #[test]
    fn rejects_malformed_dates() {
        for d in ["not-a-date", "", "2024-1-01", "2024/01/01", "24-01-01", "2024-01-011",
                  " 2024-01-01", "2024-01-01\n", "２０２４-01-01", "2024-01-01 00:00:00"] {
            assert!(validate_date(Some(d), today()).is_err(), "{:?} should be rejected", d);
        }
    }
}
