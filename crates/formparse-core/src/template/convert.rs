//! Float and date conversion of extracted values.
//!
//! Both conversions fall back silently: an unparsable float becomes `0.0`
//! and an unparsable date keeps its string value.

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{Datelike, NaiveDateTime};
use tracing::debug;

use crate::models::result::FieldValue;

use super::options::ExtractionOptions;

/// Convert a `..float` field value.
pub fn to_float(value: &str, options: &ExtractionOptions) -> f64 {
    let mut value = value.to_string();

    if !options.thousand_separator.is_empty() {
        value = value.replace(options.thousand_separator.as_str(), "");
    }
    if !options.decimal_separator.is_empty() && options.decimal_separator != "." {
        value = value.replace(options.decimal_separator.as_str(), ".");
    }

    parse_leading_float(&value).unwrap_or_else(|| {
        debug!("No number in '{}', using 0.0", value);
        0.0
    })
}

/// Parse the longest numeric prefix of `s`, ignoring leading whitespace.
///
/// `"12.50 EUR"` parses as `12.5`; a string without a leading number gives `None`.
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_at = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_at(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_at(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_at(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    let number: f64 = s[..end].parse().ok()?;
    number.is_finite().then_some(number)
}

/// Convert a `..date` field value; `None` when it does not fit `format`.
///
/// Components the format does not carry are taken from `now`.
pub fn to_date(value: &str, format: &str, now: NaiveDateTime) -> Option<FieldValue> {
    let date_format = match DateFormat::parse(format) {
        Ok(date_format) => date_format,
        Err(token) => {
            debug!("Unsupported token '{}' in date format '{}'", token, format);
            return None;
        }
    };

    let mut parsed = Parsed::new();
    if let Err(err) = format::parse(&mut parsed, value, date_format.items.iter()) {
        debug!("Date '{}' does not match '{}': {}", value, format, err);
        return None;
    }

    if !date_format.has_year {
        parsed.set_year(i64::from(now.year())).ok()?;
    }
    if !date_format.has_month {
        parsed.set_month(i64::from(now.month())).ok()?;
    }
    if !date_format.has_day {
        parsed.set_day(i64::from(now.day())).ok()?;
    }

    let date = parsed.to_naive_date().ok()?;
    if !date_format.has_hour {
        return Some(FieldValue::Date(date));
    }

    if !date_format.has_minute {
        parsed.set_minute(0).ok()?;
    }
    if !date_format.has_second {
        parsed.set_second(0).ok()?;
    }
    let time = parsed.to_naive_time().ok()?;
    Some(FieldValue::DateTime(NaiveDateTime::new(date, time)))
}

/// A `dd.MM.yyyy` style date format translated to chrono items.
#[derive(Debug)]
struct DateFormat {
    items: Vec<Item<'static>>,
    has_year: bool,
    has_month: bool,
    has_day: bool,
    has_hour: bool,
    has_minute: bool,
    has_second: bool,
}

impl DateFormat {
    /// Translate `format`; an unsupported letter token is returned as the error.
    fn parse(format: &str) -> Result<Self, String> {
        let mut df = Self {
            items: Vec::new(),
            has_year: false,
            has_month: false,
            has_day: false,
            has_hour: false,
            has_minute: false,
            has_second: false,
        };
        let chars: Vec<char> = format.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            let run = chars[i..].iter().take_while(|&&n| n == c).count();

            if c == '\'' {
                // '' is an escaped quote, otherwise a quoted literal up to the next quote
                if run >= 2 {
                    df.literal("'");
                    i += 2;
                    continue;
                }
                let end = chars[i + 1..]
                    .iter()
                    .position(|&n| n == '\'')
                    .map_or(chars.len(), |p| i + 1 + p);
                let text: String = chars[i + 1..end].iter().collect();
                df.literal(&text);
                i = (end + 1).min(chars.len());
                continue;
            }

            if !c.is_ascii_alphabetic() {
                df.literal(&c.to_string());
                i += 1;
                continue;
            }

            let item = match (c, run) {
                ('d', 1 | 2) => {
                    df.has_day = true;
                    Item::Numeric(Numeric::Day, Pad::Zero)
                }
                ('M', 1 | 2) => {
                    df.has_month = true;
                    Item::Numeric(Numeric::Month, Pad::Zero)
                }
                ('M', 3) => {
                    df.has_month = true;
                    Item::Fixed(Fixed::ShortMonthName)
                }
                ('M', 4) => {
                    df.has_month = true;
                    Item::Fixed(Fixed::LongMonthName)
                }
                ('y', 2) => {
                    df.has_year = true;
                    Item::Numeric(Numeric::YearMod100, Pad::Zero)
                }
                ('y', _) => {
                    df.has_year = true;
                    Item::Numeric(Numeric::Year, Pad::Zero)
                }
                ('H', 1 | 2) => {
                    df.has_hour = true;
                    Item::Numeric(Numeric::Hour, Pad::Zero)
                }
                ('m', 1 | 2) => {
                    df.has_minute = true;
                    Item::Numeric(Numeric::Minute, Pad::Zero)
                }
                ('s', 1 | 2) => {
                    df.has_second = true;
                    Item::Numeric(Numeric::Second, Pad::Zero)
                }
                _ => return Err(c.to_string().repeat(run)),
            };
            df.items.push(item);
            i += run;
        }

        Ok(df)
    }

    fn literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if text.chars().all(char::is_whitespace) {
            self.items.push(Item::OwnedSpace(text.into()));
        } else {
            self.items.push(Item::OwnedLiteral(text.into()));
        }
    }
}
