use shared::error::{RemoteCallError, ValidationError};

#[derive(Debug, Clone, PartialEq)]
pub struct NumericInput {
    pub raw: String,
    pub value: f64,
}

pub fn parse_numeric_input(input: &str) -> Result<NumericInput, ValidationError> {
    let invalid = || ValidationError::InvalidNumber {
        input: input.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let value = parse_radix_literal(trimmed)
        .or_else(|| parse_decimal(trimmed))
        .ok_or_else(invalid)?;

    Ok(NumericInput {
        raw: input.to_string(),
        value,
    })
}

fn parse_decimal(text: &str) -> Option<f64> {
    // f64's parser also takes "inf" and "nan" spellings.
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
    {
        return None;
    }
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let lower = text.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else {
        return None;
    };
    u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
}

/// Converts a validated number into a call argument. Runs inside the work
/// unit, so a rejection here is reported as a failed remote call.
pub fn to_integral_argument(value: f64) -> Result<i64, RemoteCallError> {
    if value.fract() != 0.0 {
        return Err(RemoteCallError::invalid_argument(format!(
            "underflow: fractional component exceeds decimals (value={value})"
        )));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(RemoteCallError::invalid_argument(format!(
            "overflow: value out of range (value={value})"
        )));
    }
    Ok(value as i64)
}
