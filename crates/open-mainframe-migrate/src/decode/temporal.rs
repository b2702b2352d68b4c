//! DATE, TIME and TIMESTAMP layouts.
//!
//! Internal form is unsigned BCD: DATE `YYYYMMDD` in 4 bytes, TIME `HHMMSS`
//! in 3 bytes, TIMESTAMP `YYYYMMDDHHMMSS` followed by at least six fraction
//! digits. Text form is `YYYY-MM-DD`, `HH.MM.SS` and
//! `YYYY-MM-DD-HH.MM.SS[.f...]`, matched strictly.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::value::Timestamp;

const DATE_TEMPLATE: &[u8] = b"9999-99-99";
const TIME_TEMPLATE: &[u8] = b"99.99.99";
const TIMESTAMP_TEMPLATE: &[u8] = b"9999-99-99-99.99.99";

/// Date from eight `YYYYMMDD` digits.
pub(crate) fn date_from_digits(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(
        digits[0..4].parse().ok()?,
        digits[4..6].parse().ok()?,
        digits[6..8].parse().ok()?,
    )
}

/// Time from six `HHMMSS` digits.
pub(crate) fn time_from_digits(digits: &str) -> Option<NaiveTime> {
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(
        digits[0..2].parse().ok()?,
        digits[2..4].parse().ok()?,
        digits[4..6].parse().ok()?,
    )
}

/// Timestamp from `YYYYMMDDHHMMSS` plus fraction digits, keeping the
/// first `precision` of them.
pub(crate) fn timestamp_from_digits(digits: &str, precision: u8) -> Option<Timestamp> {
    let p = usize::from(precision);
    if digits.len() < 14 + p || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let seconds = datetime(
        &digits[0..8],
        &digits[8..10],
        &digits[10..12],
        &digits[12..14],
    )?;
    let fraction = fraction(&digits[14..14 + p])?;
    Some(Timestamp::new(seconds, fraction, precision))
}

/// Strict `YYYY-MM-DD`.
pub(crate) fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if !matches_template(text.as_bytes(), DATE_TEMPLATE) {
        return None;
    }
    date_from_digits(&[&text[0..4], &text[5..7], &text[8..10]].concat())
}

/// Strict `HH.MM.SS`.
pub(crate) fn parse_time_text(text: &str) -> Option<NaiveTime> {
    if !matches_template(text.as_bytes(), TIME_TEMPLATE) {
        return None;
    }
    time_from_digits(&[&text[0..2], &text[3..5], &text[6..8]].concat())
}

/// Strict `YYYY-MM-DD-HH.MM.SS`, then `.` and exactly `precision` digits
/// when `precision > 0`.
pub(crate) fn parse_timestamp_text(text: &str, precision: u8) -> Option<Timestamp> {
    let bytes = text.as_bytes();
    let p = usize::from(precision);
    let expected = TIMESTAMP_TEMPLATE.len() + if p > 0 { 1 + p } else { 0 };
    if bytes.len() != expected || !matches_template(&bytes[..19], TIMESTAMP_TEMPLATE) {
        return None;
    }

    let fraction = if p > 0 {
        let tail = &text[19..];
        if !tail.starts_with('.') || !tail[1..].bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self::fraction(&tail[1..])?
    } else {
        0
    };

    let date = [&text[0..4], &text[5..7], &text[8..10]].concat();
    let seconds = datetime(&date, &text[11..13], &text[14..16], &text[17..19])?;
    Some(Timestamp::new(seconds, fraction, precision))
}

/// `9` in the template matches an ASCII digit, anything else itself.
fn matches_template(bytes: &[u8], template: &[u8]) -> bool {
    bytes.len() == template.len()
        && bytes.iter().zip(template).all(|(&b, &t)| match t {
            b'9' => b.is_ascii_digit(),
            _ => b == t,
        })
}

fn datetime(date: &str, hour: &str, minute: &str, second: &str) -> Option<NaiveDateTime> {
    let date = date_from_digits(date)?;
    let time = NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, second.parse().ok()?)?;
    Some(NaiveDateTime::new(date, time))
}

fn fraction(digits: &str) -> Option<u64> {
    if digits.is_empty() {
        Some(0)
    } else {
        digits.parse().ok()
    }
}
