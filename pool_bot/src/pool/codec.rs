//! Arena-style pack text decoding.
//!
//! Upstream pack generators emit one `"<count> <name> (<set>) <number>"` line
//! per card. Only the text before the first `" ("` is the card name.

use super::{
    errors::{FormatError, FormatResult},
    models::{CardEntry, CardList},
};

const CODE_FENCE: &str = "```";
const SET_CODE_OPENER: &str = " (";

/// Decode newline-separated pack text into card entries.
///
/// Trailing whitespace is trimmed and blank lines are skipped. Entries are
/// returned in input order and are not aggregated.
///
/// # Errors
///
/// * `FormatError::MissingSeparator` - A line has no space after the count
/// * `FormatError::InvalidCount` - The count is not a positive integer
/// * `FormatError::EmptyName` - The line carries no card name
pub fn decode(text: &str) -> FormatResult<CardList> {
    let mut entries = Vec::new();

    for (index, raw) in text.trim_end().lines().enumerate() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        let line_number = index + 1;

        let (count, card) = line
            .split_once(' ')
            .ok_or_else(|| FormatError::MissingSeparator {
                line: line_number,
                text: line.to_string(),
            })?;

        let count = match count.trim().parse::<i64>() {
            Ok(count) if count > 0 => count,
            _ => {
                return Err(FormatError::InvalidCount {
                    line: line_number,
                    count: count.to_string(),
                });
            }
        };

        let name = card
            .split(SET_CODE_OPENER)
            .next()
            .unwrap_or_default()
            .trim();
        if name.is_empty() {
            return Err(FormatError::EmptyName { line: line_number });
        }

        entries.push(CardEntry::new(name, count));
    }

    Ok(entries)
}

/// Trimmed contents of the first fenced code block in a message.
///
/// Returns `None` when the text carries no fence at all. An unterminated
/// fence yields everything after the opener.
pub fn extract_code_block(text: &str) -> Option<&str> {
    if !text.contains(CODE_FENCE) {
        return None;
    }
    text.split(CODE_FENCE).nth(1).map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strips_set_codes() {
        let cards = decode("2 Lightning Bolt (M11)\n1 Counterspell (7ED)").unwrap();
        assert_eq!(
            cards,
            vec![
                CardEntry::new("Lightning Bolt", 2),
                CardEntry::new("Counterspell", 1),
            ]
        );
    }

    #[test]
    fn test_decode_keeps_name_without_set_code() {
        let cards = decode("1 Island\n").unwrap();
        assert_eq!(cards, vec![CardEntry::new("Island", 1)]);
    }

    #[test]
    fn test_decode_collector_number_after_set() {
        let cards = decode("1 Fable of the Mirror-Breaker (NEO) 141").unwrap();
        assert_eq!(cards[0].name, "Fable of the Mirror-Breaker");
    }

    #[test]
    fn test_decode_trims_trailing_whitespace_and_blank_lines() {
        let cards = decode("1 Island (M21)\r\n\n1 Forest (M21)  \n \n").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].name, "Forest");
    }

    #[test]
    fn test_decode_double_faced_name() {
        let cards = decode("1 Delver of Secrets // Insectile Aberration (ISD)").unwrap();
        assert_eq!(cards[0].name, "Delver of Secrets // Insectile Aberration");
    }

    #[test]
    fn test_decode_empty_text() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_missing_separator() {
        let err = decode("1 Island\nForest").unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingSeparator {
                line: 2,
                text: "Forest".to_string()
            }
        );
    }

    #[test]
    fn test_decode_non_numeric_count() {
        let err = decode("x Island").unwrap_err();
        assert!(matches!(err, FormatError::InvalidCount { line: 1, .. }));
    }

    #[test]
    fn test_decode_rejects_zero_count() {
        let err = decode("0 Island").unwrap_err();
        assert!(matches!(err, FormatError::InvalidCount { .. }));
    }

    #[test]
    fn test_decode_empty_name() {
        let err = decode("1  (M21)").unwrap_err();
        assert_eq!(err, FormatError::EmptyName { line: 1 });
    }

    #[test]
    fn test_extract_code_block() {
        let message = "Pack for someone\n```\n1 Island (M21)\n1 Forest (M21)\n```";
        assert_eq!(
            extract_code_block(message),
            Some("1 Island (M21)\n1 Forest (M21)")
        );
        assert_eq!(extract_code_block("no fences here"), None);
    }
}
