//! Sanitizing raw user entry before it reaches the fee engine.
//!
//! The engine assumes finite, non-negative volumes; everything that can be
//! typed by a person is checked here.

use asterfee::TradingMode;

use crate::error::InputError;

/// Parse a number with optional `$`, `,`/`_` separators and a `k`/`m`/`b` suffix.
pub fn parse_number(raw: &str) -> Result<f64, InputError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }

    let (digits, scale) = match cleaned.as_bytes()[cleaned.len() - 1] {
        b'k' => (&cleaned[..cleaned.len() - 1], 1e3),
        b'm' => (&cleaned[..cleaned.len() - 1], 1e6),
        b'b' => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    let value: f64 = digits
        .parse()
        .map_err(|_| InputError::NotANumber(raw.trim().to_string()))?;
    let value = value * scale;

    if !value.is_finite() {
        return Err(InputError::NotFinite(raw.trim().to_string()));
    }
    Ok(value)
}

/// Parse a monthly volume: finite and non-negative.
pub fn parse_volume(raw: &str) -> Result<f64, InputError> {
    let value = parse_number(raw)?;
    if value < 0.0 {
        return Err(InputError::Negative(raw.trim().to_string()));
    }
    Ok(value)
}

/// Parse a dollar amount. Negative amounts are allowed (they translate to nothing).
pub fn parse_amount(raw: &str) -> Result<f64, InputError> {
    parse_number(raw)
}

/// Round a volume to a granularity that grows with its magnitude.
pub fn smart_round(value: f64) -> f64 {
    let step = if value < 10_000.0 {
        100.0
    } else if value < 100_000.0 {
        1_000.0
    } else if value < 1_000_000.0 {
        10_000.0
    } else {
        100_000.0
    };
    (value / step).round() * step
}

/// A partial change to the watched `(volume, mode)` selection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WatchUpdate {
    pub volume_usd: Option<f64>,
    pub mode: Option<TradingMode>,
}

/// Parse a line such as `5m`, `pro`, or `250k simple`.
pub fn parse_watch_line(line: &str) -> Result<WatchUpdate, InputError> {
    let mut update = WatchUpdate::default();
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return Err(InputError::Empty);
    }

    for token in tokens {
        if let Ok(mode) = token.parse::<TradingMode>() {
            update.mode = Some(mode);
            continue;
        }
        match parse_volume(token) {
            Ok(volume) => update.volume_usd = Some(volume),
            Err(InputError::NotANumber(_)) => {
                return Err(InputError::UnknownToken(token.to_string()))
            }
            Err(e) => return Err(e),
        }
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_separated_numbers() {
        assert_eq!(parse_volume("50000").unwrap(), 50_000.0);
        assert_eq!(parse_volume(" 1,000,000 ").unwrap(), 1_000_000.0);
        assert_eq!(parse_volume("2_500_000").unwrap(), 2_500_000.0);
        assert_eq!(parse_volume("$750").unwrap(), 750.0);
        assert_eq!(parse_volume("1e6").unwrap(), 1_000_000.0);
    }

    #[test]
    fn test_suffixes() {
        assert_eq!(parse_volume("250k").unwrap(), 250_000.0);
        assert_eq!(parse_volume("5M").unwrap(), 5_000_000.0);
        assert_eq!(parse_volume("1.5b").unwrap(), 1_500_000_000.0);
    }

    #[test]
    fn test_rejects_bad_volumes() {
        assert!(matches!(parse_volume(""), Err(InputError::Empty)));
        assert!(matches!(parse_volume("   "), Err(InputError::Empty)));
        assert!(matches!(parse_volume("abc"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_volume("-5"), Err(InputError::Negative(_))));
        assert!(matches!(parse_volume("inf"), Err(InputError::NotFinite(_))));
        assert!(matches!(parse_volume("NaN"), Err(InputError::NotFinite(_))));
        assert!(matches!(parse_volume("k"), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_amount_allows_negative() {
        assert_eq!(parse_amount("-100").unwrap(), -100.0);
    }

    #[test]
    fn test_smart_round_by_magnitude() {
        assert_eq!(smart_round(1_234.0), 1_200.0);
        assert_eq!(smart_round(56_789.0), 57_000.0);
        assert_eq!(smart_round(456_789.0), 460_000.0);
        assert_eq!(smart_round(5_049_999.0), 5_000_000.0);
        assert_eq!(smart_round(0.0), 0.0);
    }

    #[test]
    fn test_watch_line_volume_and_mode() {
        let update = parse_watch_line("5m pro").unwrap();
        assert_eq!(update.volume_usd, Some(5_000_000.0));
        assert_eq!(update.mode, Some(TradingMode::Pro));

        let update = parse_watch_line("simple").unwrap();
        assert_eq!(update.volume_usd, None);
        assert_eq!(update.mode, Some(TradingMode::Simple));
    }

    #[test]
    fn test_watch_line_errors() {
        assert!(matches!(parse_watch_line(""), Err(InputError::Empty)));
        assert!(matches!(
            parse_watch_line("hybrid"),
            Err(InputError::UnknownToken(t)) if t == "hybrid"
        ));
        assert!(matches!(parse_watch_line("-1"), Err(InputError::Negative(_))));
    }
}
