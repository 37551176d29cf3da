//! Base-36 codec
//!
//! Digits are `0-9` followed by `A-Z`, most significant digit first.
//! This is the only place ticket IDs cross the text boundary.

use super::error::{TableError, TableResult};

const RADIX: u64 = 36;
const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Encodes a value as an uppercase base-36 string without padding
pub fn encode(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value != 0 {
        digits.push(DIGITS[(value % RADIX) as usize]);
        value /= RADIX;
    }
    digits.reverse();

    // Every byte comes from DIGITS, so this is always ASCII
    digits.into_iter().map(char::from).collect()
}

/// Decodes a case-insensitive base-36 string
///
/// Fails with [`TableError::InvalidParameter`] on characters outside
/// `[0-9A-Z]` and with [`TableError::IntegerOverflow`] when the value
/// does not fit in a `u64`.
pub fn decode(text: &str) -> TableResult<u64> {
    let mut value: u64 = 0;

    for character in text.chars() {
        let digit = character
            .to_digit(RADIX as u32)
            .ok_or_else(|| TableError::InvalidParameter(format!("'{}' is not a base-36 digit", character)))?;

        value = value
            .checked_mul(RADIX)
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or(TableError::IntegerOverflow)?;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_zero() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn encode_known_values() {
        assert_eq!(encode(35), "Z");
        assert_eq!(encode(36), "10");
        assert_eq!(encode(36u64.pow(5)), "100000");
        assert_eq!(encode(36u64.pow(5) - 1), "ZZZZZ");
    }

    #[test]
    fn decode_is_case_insensitive() {
        assert_eq!(decode("zz").unwrap(), 35 * 36 + 35);
        assert_eq!(decode("Zz").unwrap(), decode("ZZ").unwrap());
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        assert!(matches!(decode("AB-C"), Err(TableError::InvalidParameter(_))));
        assert!(matches!(decode(" 1"), Err(TableError::InvalidParameter(_))));
        assert!(matches!(decode("É"), Err(TableError::InvalidParameter(_))));
    }

    #[test]
    fn decode_max_value() {
        assert_eq!(decode(&encode(u64::MAX)).unwrap(), u64::MAX);
    }

    #[test]
    fn decode_rejects_overflow() {
        // u64::MAX is "3W5E11264SGSF"; one more digit always overflows
        assert!(matches!(decode("3W5E11264SGSG"), Err(TableError::IntegerOverflow)));
        assert!(matches!(decode("ZZZZZZZZZZZZZZ"), Err(TableError::IntegerOverflow)));
    }

    proptest! {
        #[test]
        fn roundtrip_in_ticket_range(x in 0u64..36u64.pow(5)) {
            prop_assert_eq!(decode(&encode(x)).unwrap(), x);
        }

        #[test]
        fn roundtrip_full_width(x in any::<u64>()) {
            prop_assert_eq!(decode(&encode(x)).unwrap(), x);
        }

        #[test]
        fn lowercase_decodes_like_uppercase(x in any::<u64>()) {
            prop_assert_eq!(decode(&encode(x).to_lowercase()).unwrap(), x);
        }

        #[test]
        fn rejects_non_alphanumeric(prefix in "[0-9A-Z]{0,4}", bad in "[^0-9A-Za-z]", suffix in "[0-9A-Z]{0,4}") {
            let text = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(matches!(decode(&text), Err(TableError::InvalidParameter(_))));
        }
    }
}
