//! Conversion of run times between the 60 FPS and 59.7275 FPS refresh rates.
//!
//! All arithmetic is done on integer milliseconds so that the same input
//! always renders to the same output.

use std::fmt;

/// Ratio numerator: 60 FPS, scaled by 10^4.
const SOURCE_RATE: u64 = 600_000;
/// Ratio denominator: 59.7275 FPS, scaled by 10^4.
const TARGET_RATE: u64 = 597_275;

/// Why a time could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    Empty,
    TooManyComponents,
    NotANumber(String),
    OutOfRange(String),
    BadFraction(String),
    TooLong(String),
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::Empty => write!(f, "no time given"),
            TimeError::TooManyComponents => write!(f, "too many `:` separated components"),
            TimeError::NotANumber(s) => write!(f, "`{s}` is not a number"),
            TimeError::OutOfRange(s) => write!(f, "`{s}` must be below 60"),
            TimeError::BadFraction(s) => write!(f, "`{s}` is not a valid fraction of a second"),
            TimeError::TooLong(s) => write!(f, "`{s}` is too long to convert"),
        }
    }
}

impl std::error::Error for TimeError {}

/// Parse `S`, `M:SS` or `H:MM:SS`, each with an optional `.f`, `.ff` or `.fff`, into milliseconds.
pub fn parse_millis(input: &str) -> Result<u64, TimeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimeError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (input, None),
    };

    let components: Vec<&str> = whole.split(':').collect();
    if components.len() > 3 {
        return Err(TimeError::TooManyComponents);
    }

    let mut seconds: u64 = 0;
    for (i, component) in components.iter().enumerate() {
        if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeError::NotANumber(component.to_string()));
        }

        let value: u64 = component.parse().map_err(|_| TimeError::NotANumber(component.to_string()))?;

        // Everything after the leading component is a base-60 digit.
        if i > 0 && value >= 60 {
            return Err(TimeError::OutOfRange(component.to_string()));
        }

        seconds = seconds.checked_mul(60).and_then(|s| s.checked_add(value)).ok_or_else(|| TimeError::TooLong(input.to_string()))?;
    }

    let millis = match fraction {
        None => 0,
        Some(f) if (1..=3).contains(&f.len()) && f.bytes().all(|b| b.is_ascii_digit()) => {
            let padded = format!("{f:0<3}");
            padded.parse::<u64>().map_err(|_| TimeError::BadFraction(f.to_string()))?
        }
        Some(f) => return Err(TimeError::BadFraction(f.to_string())),
    };

    seconds.checked_mul(1000).and_then(|ms| ms.checked_add(millis)).ok_or_else(|| TimeError::TooLong(input.to_string()))
}

/// Scale a 60 FPS duration to 59.7275 FPS, rounding half up.
///
/// `None` if the result does not fit in a `u64`.
pub fn convert_millis(millis: u64) -> Option<u64> {
    let scaled = u128::from(millis) * u128::from(SOURCE_RATE);
    let target = u128::from(TARGET_RATE);
    let (quotient, remainder) = (scaled / target, scaled % target);

    u64::try_from(quotient + u128::from(remainder * 2 >= target)).ok()
}

/// Render milliseconds as `HH:MM:SS.mmm`.
pub fn format_millis(millis: u64) -> String {
    let hours = millis / 3_600_000;
    let minutes = millis / 60_000 % 60;
    let seconds = millis / 1000 % 60;
    let ms = millis % 1000;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{ms:03}")
}

/// Parse, convert and render a time in one go.
pub fn convert(input: &str) -> Result<String, TimeError> {
    let millis = parse_millis(input)?;
    let converted = convert_millis(millis).ok_or_else(|| TimeError::TooLong(input.trim().to_string()))?;

    Ok(format_millis(converted))
}

/// The full reply for the `convert` command.
pub fn reply(input: &str) -> String {
    match convert(input) {
        Ok(output) => format!("`{}` at 60 FPS is `{output}` at 59.7275 FPS", input.trim()),
        Err(e) => format!("Couldn't read that time ({e}). Usage: `convert H:MM:SS.mmm`"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hour_converts_to_known_value() {
        assert_eq!(convert("01:00:00").unwrap(), "01:00:16.425");
    }

    #[test]
    fn accepts_short_forms() {
        assert_eq!(parse_millis("59").unwrap(), 59_000);
        assert_eq!(parse_millis("1:05").unwrap(), 65_000);
        assert_eq!(parse_millis("1:02:03.4").unwrap(), 3_723_400);
        assert_eq!(parse_millis("0:00.05").unwrap(), 50);
    }

    #[test]
    fn leading_component_may_exceed_sixty() {
        assert_eq!(parse_millis("90:00").unwrap(), 5_400_000);
    }

    #[test]
    fn rounds_half_up() {
        // 1000 * 600000 / 597275 = 1004.56...
        assert_eq!(convert_millis(1000), Some(1005));
        assert_eq!(convert_millis(0), Some(0));
    }

    #[test]
    fn formats_past_a_day_without_wrapping() {
        assert_eq!(format_millis(90_061_500), "25:01:01.500");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_millis(""), Err(TimeError::Empty));
        assert_eq!(parse_millis("1:2:3:4"), Err(TimeError::TooManyComponents));
        assert_eq!(parse_millis("1:60"), Err(TimeError::OutOfRange("60".to_string())));
        assert_eq!(parse_millis("1::00"), Err(TimeError::NotANumber("".to_string())));
        assert_eq!(parse_millis("-1"), Err(TimeError::NotANumber("-1".to_string())));
        assert_eq!(parse_millis("1.2345"), Err(TimeError::BadFraction("2345".to_string())));
        assert_eq!(parse_millis("1."), Err(TimeError::BadFraction("".to_string())));
    }

    #[test]
    fn results_past_u64_are_rejected() {
        assert_eq!(convert_millis(u64::MAX), None);
        assert_eq!(convert("18446744073709551"), Err(TimeError::TooLong("18446744073709551".to_string())));
        assert_eq!(parse_millis("18446744073709552"), Err(TimeError::TooLong("18446744073709552".to_string())));
    }

    #[test]
    fn reply_includes_both_times() {
        assert_eq!(reply(" 01:00:00 "), "`01:00:00` at 60 FPS is `01:00:16.425` at 59.7275 FPS");
        assert!(reply("abc").starts_with("Couldn't read that time"));
    }
}
