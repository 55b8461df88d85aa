use chrono::Datelike;
pub use time::Date;
use time::{Duration, Month, UtcOffset};

// strptime-style formats of the source spreadsheets.
// US middle-endian, as in the brokerage sale books.
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";
// ISO big-endian
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
// Eg. "02 Jan 08", from the central bank rates workbook.
pub const BOI_DATE_FORMAT: &str = "%d %b %y";

#[derive(thiserror::Error, PartialEq, Eq, Clone, Debug)]
#[error("Unable to parse date \"{value}\" with format \"{format}\": {reason}")]
pub struct DateParseError {
    pub value: String,
    pub format: &'static str,
    pub reason: String,
}

/// Parses a date with a strptime-style format.
/// Surrounding whitespace is ignored, and single digit days and months are
/// accepted for zero-padded fields.
pub fn parse_date_fmt(date_str: &str, format: &'static str)
-> Result<Date, DateParseError> {
    let err = |reason: String| DateParseError {
        value: date_str.to_string(),
        format,
        reason,
    };
    let naive = chrono::NaiveDate::parse_from_str(date_str.trim(), format)
        .map_err(|e| err(e.to_string()))?;
    date_naive_to_date(&naive)
        .ok_or_else(|| err("date out of range".to_string()))
}

pub fn parse_us_date(date_str: &str) -> Result<Date, DateParseError> {
    parse_date_fmt(date_str, US_DATE_FORMAT)
}

pub fn parse_iso_date(date_str: &str) -> Result<Date, DateParseError> {
    parse_date_fmt(date_str, ISO_DATE_FORMAT)
}

pub fn parse_boi_date(date_str: &str) -> Result<Date, DateParseError> {
    parse_date_fmt(date_str, BOI_DATE_FORMAT)
}

fn date_naive_to_date(dn: &chrono::NaiveDate) -> Option<Date> {
    Date::from_calendar_date(
        dn.year(),
        Month::December.nth_next(dn.month() as u8),
        dn.day() as u8,
    )
    .ok()
}

// 9999-12-31, the last date Excel can represent.
pub const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Converts an Excel serial date number (days since 1899-12-30, with the
/// time of day as the fraction) to a Date.
pub fn excel_serial_to_date(serial: f64) -> Option<Date> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_EXCEL_SERIAL {
        return None;
    }
    let epoch = Date::from_calendar_date(1899, Month::December, 30).ok()?;
    epoch.checked_add(Duration::days(serial.floor() as i64))
}

// Using UtcOffset::current_local_offset is apparently unsafe on Linux,
// and will return an error if used without enabling some "unsafe" feature.
// Local::now doesn't block itself the same way, so use that.
pub fn local_utc_offset() -> Result<UtcOffset, time::error::ComponentRange> {
    let now = chrono::offset::Local::now();
    let offset = now.offset();
    UtcOffset::from_whole_seconds(-1 * offset.utc_minus_local())
}

// Used by both unit and integration tests
pub mod pub_testlib {
    use time::{Date, Month};

    pub fn ymd(year: i32, month: u8, day: u8) -> Date {
        Date::from_calendar_date(year, Month::try_from(month).unwrap(), day)
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use time::{Date, Month};

    use super::pub_testlib::ymd;
    use super::{
        date_naive_to_date, excel_serial_to_date, parse_boi_date, parse_iso_date,
        parse_us_date,
    };

    #[test]
    fn test_parse_us_date() {
        assert_eq!(parse_us_date("12/20/2019").unwrap(), ymd(2019, 12, 20));
        assert_eq!(parse_us_date("1/30/2018").unwrap(), ymd(2018, 1, 30));
        assert_eq!(parse_us_date(" 01/31/2018 ").unwrap(), ymd(2018, 1, 31));
        assert!(parse_us_date("20/12/2019").is_err());
        assert!(parse_us_date("2019-12-20").is_err());
        assert!(parse_us_date("").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2019-12-20").unwrap(), ymd(2019, 12, 20));
        assert!(parse_iso_date("12/20/2019").is_err());
    }

    #[test]
    fn test_parse_boi_date() {
        assert_eq!(parse_boi_date("02 Jan 08").unwrap(), ymd(2008, 1, 2));
        assert_eq!(parse_boi_date("31 dec 99").unwrap(), ymd(1999, 12, 31));
        assert_eq!(parse_boi_date("7 Jul 21").unwrap(), ymd(2021, 7, 7));
        assert!(parse_boi_date("Jan 08").is_err());
        assert!(parse_boi_date("2008-01-02").is_err());

        let e = parse_boi_date("bogus").unwrap_err();
        assert_eq!(e.value, "bogus");
        assert_eq!(e.format, "%d %b %y");
    }

    #[test]
    fn test_date_naive_to_date() {
        let naive_date = NaiveDate::from_ymd_opt(2024, 4, 13).unwrap();
        let date = date_naive_to_date(&naive_date);
        assert_eq!(
            date,
            Some(Date::from_calendar_date(2024, Month::April, 13).unwrap())
        );
    }

    #[test]
    fn test_excel_serial_to_date() {
        assert_eq!(excel_serial_to_date(43819.0), Some(ymd(2019, 12, 20)));
        assert_eq!(excel_serial_to_date(43819.75), Some(ymd(2019, 12, 20)));
        assert_eq!(excel_serial_to_date(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(excel_serial_to_date(-1.0), None);
        assert_eq!(excel_serial_to_date(f64::NAN), None);
        assert_eq!(excel_serial_to_date(2_958_465.5), Some(ymd(9999, 12, 31)));
        assert_eq!(excel_serial_to_date(2_958_466.0), None);
        assert_eq!(excel_serial_to_date(1e20), None);
        assert_eq!(excel_serial_to_date(f64::INFINITY), None);
    }
}
