//! Runtime text parsing.
//!
//! Source files describe running time as free text such as `2h 22m`, `3h`
//! or `45m`. [`parse_runtime_minutes()`] turns any such value into a whole
//! number of minutes without ever failing: components that are missing or
//! unreadable count as zero. Digits from any script are accepted, so
//! fullwidth `２h` reads the same as `2h`.

use std::sync::LazyLock;

use regex::Regex;

// `\d` is Unicode-aware: any decimal digit (`2`, `２`, `٢`) counts.
static HOURS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)h").expect("hours pattern compiles"));
static MINUTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)m").expect("minutes pattern compiles"));
static DECIMAL_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("digit pattern compiles"));

/// Converts a runtime such as `"2h 22m"` into total minutes (`142`).
///
/// `None` stands for a cell that carried no text at all and yields `0`.
/// The hour and minute components are located independently, so their
/// order and the separator between them do not matter.
pub fn parse_runtime_minutes(value: Option<&str>) -> i64 {
    let Some(text) = value else {
        return 0;
    };
    let hours = first_component(&HOURS_PATTERN, text);
    let minutes = first_component(&MINUTES_PATTERN, text);
    hours.saturating_mul(60).saturating_add(minutes)
}

fn first_component(pattern: &Regex, text: &str) -> i64 {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| parse_decimal(digits.as_str()))
        .unwrap_or(0)
}

/// Parses a run of decimal digits from any script. `None` on overflow.
fn parse_decimal(digits: &str) -> Option<i64> {
    digits.chars().try_fold(0i64, |total, ch| {
        total
            .checked_mul(10)?
            .checked_add(i64::from(decimal_value(ch)?))
    })
}

fn is_decimal_digit(ch: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(ch.encode_utf8(&mut buf))
}

/// Value of one decimal digit. Unicode assigns decimal digits in contiguous
/// ascending `0..=9` runs, so the value is the count of digits directly
/// below `ch`, modulo ten.
fn decimal_value(ch: char) -> Option<u32> {
    if let Some(value) = ch.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(ch) {
        return None;
    }
    let below = (1..=u32::from(ch))
        .map_while(|offset| char::from_u32(u32::from(ch) - offset))
        .take_while(|&prev| is_decimal_digit(prev))
        .count();
    Some((below % 10) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_hours_and_minutes() {
        assert_eq!(parse_runtime_minutes(Some("2h 22m")), 142);
        assert_eq!(parse_runtime_minutes(Some("1h59m")), 119);
    }

    #[test]
    fn single_component_defaults_the_other_to_zero() {
        assert_eq!(parse_runtime_minutes(Some("3h")), 180);
        assert_eq!(parse_runtime_minutes(Some("45m")), 45);
    }

    #[test]
    fn component_order_and_separators_are_irrelevant() {
        assert_eq!(parse_runtime_minutes(Some("22m / 2h")), 142);
        assert_eq!(parse_runtime_minutes(Some("runtime: 2h, 22m")), 142);
    }

    #[test]
    fn unreadable_values_yield_zero() {
        assert_eq!(parse_runtime_minutes(None), 0);
        assert_eq!(parse_runtime_minutes(Some("")), 0);
        assert_eq!(parse_runtime_minutes(Some("n/a")), 0);
        // Matching is case-sensitive.
        assert_eq!(parse_runtime_minutes(Some("2H 22M")), 0);
    }

    #[test]
    fn non_ascii_decimal_digits_are_read() {
        // Fullwidth, Arabic-Indic and mathematical bold digits.
        assert_eq!(parse_runtime_minutes(Some("２h １５m")), 135);
        assert_eq!(parse_runtime_minutes(Some("١h ٤٥m")), 105);
        assert_eq!(parse_runtime_minutes(Some("\u{1D7D0}h")), 120);
        assert_eq!(decimal_value('９'), Some(9));
        assert_eq!(decimal_value('x'), None);
    }

    #[test]
    fn oversized_components_never_go_negative() {
        assert_eq!(parse_runtime_minutes(Some("99999999999999999999h 5m")), 5);
        assert_eq!(
            parse_runtime_minutes(Some("9223372036854775807h")),
            i64::MAX
        );
    }
}
