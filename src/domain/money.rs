use thiserror::Error;

/// All amounts are integer minor units. 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Format cents as a human-readable amount.
/// Example: 30000 -> "300.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a keypad entry into cents.
/// Whole numbers are read as units: "300" -> 30000, "12.5" -> 1250.
/// More than two decimal places is rejected, never rounded.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::Empty);
    }

    let units: i64 = if units.is_empty() {
        0
    } else {
        parse_digits(units)?
    };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => parse_digits(fraction)? * 10,
        2 => parse_digits(fraction)?,
        _ => {
            parse_digits(fraction)?;
            return Err(ParseCentsError::TooPrecise);
        }
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or(ParseCentsError::Overflow)?;
    Ok(if negative { -cents } else { cents })
}

fn parse_digits(s: &str) -> Result<i64, ParseCentsError> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }
    s.parse().map_err(|_| ParseCentsError::Overflow)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCentsError {
    #[error("no amount entered")]
    Empty,
    #[error("invalid money format")]
    InvalidFormat,
    #[error("amounts have at most two decimal places")]
    TooPrecise,
    #[error("amount is too large")]
    Overflow,
}
