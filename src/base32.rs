// Base32 https://datatracker.ietf.org/doc/html/rfc4648#section-6

// decode only, secrets never go back to their string form
// padding is optional, trailing bits that don't fill a byte are dropped

use thiserror::Error;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Base32Error {
    #[error("invalid base32 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

fn symbol_value(c: char) -> Option<u8> {
    ALPHABET
        .iter()
        .position(|&symbol| symbol as char == c)
        .map(|index| index as u8)
}

/// Decode an RFC 4648 base32 string.
///
/// Whitespace is ignored, lowercase letters are accepted and `=` is discarded
/// wherever it appears. The output is `floor(5n / 8)` bytes for `n` symbols.
pub fn decode(input: &str) -> Result<Vec<u8>, Base32Error> {
    // positions count characters of the raw input, whitespace included
    let normalized = input
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(position, c)| (position, c.to_ascii_uppercase()));

    let mut bytes = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for (position, c) in normalized {
        if c == '=' {
            continue;
        }
        let value = symbol_value(c).ok_or(Base32Error::InvalidCharacter {
            character: c,
            position,
        })?;

        // 5 bits in, a byte out once 8 are buffered
        buffer = (buffer << 5) | value as u32;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            bytes.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_encoding::{BASE32, BASE32_NOPAD};
    use test_case::test_case;

    // https://datatracker.ietf.org/doc/html/rfc4648#section-10
    #[test_case("", "")]
    #[test_case("MY======", "f")]
    #[test_case("MZXQ====", "fo")]
    #[test_case("MZXW6===", "foo")]
    #[test_case("MZXW6YQ=", "foob")]
    #[test_case("MZXW6YTB", "fooba")]
    #[test_case("MZXW6YTBOI======", "foobar")]
    fn decodes_rfc4648_vectors(input: &str, expected: &str) {
        assert_eq!(decode(input).unwrap(), expected.as_bytes());
    }

    #[test]
    fn decodes_without_padding() {
        assert_eq!(decode("MZXW6YTBOI").unwrap(), b"foobar");
        assert_eq!(decode("MY").unwrap(), b"f");
    }

    #[test]
    fn matches_reference_codec() {
        let keys: [&[u8]; 4] = [
            b"12345678901234567890",
            b"1234567890",
            &[0u8, 255, 16, 32, 64, 128, 7],
            &[0xde, 0xad, 0xbe, 0xef, 0x01],
        ];
        for key in keys {
            let encoded = BASE32.encode(key);
            assert_eq!(decode(&encoded).unwrap(), key);
            let encoded = BASE32_NOPAD.encode(key);
            assert_eq!(decode(&encoded).unwrap(), key);
        }
    }

    #[test]
    fn output_length_is_five_eighths_of_input() {
        let symbols = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";
        for n in 0..=symbols.len() {
            let decoded = decode(&symbols[..n]).unwrap();
            assert_eq!(decoded.len(), 5 * n / 8, "length for {} symbols", n);
        }
    }

    #[test]
    fn drops_incomplete_trailing_byte() {
        // 3 symbols = 15 bits, one full byte plus 7 leftover bits
        assert_eq!(decode("MZX").unwrap(), b"f");
        assert_eq!(decode("A").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn ignores_case_and_whitespace() {
        let canonical = decode("GEZDGNBVGY3TQOJQ").unwrap();
        assert_eq!(decode("gezdgnbvgy3tqojq").unwrap(), canonical);
        assert_eq!(decode("gezd gnbv gy3t qojq").unwrap(), canonical);
        assert_eq!(decode(" GEZD\tGNBV\nGY3T\r\nQOJQ ").unwrap(), canonical);
    }

    #[test]
    fn ignores_padding_anywhere() {
        assert_eq!(decode("MZ=XW6YTB=OI").unwrap(), b"foobar");
        assert_eq!(decode("========").unwrap(), Vec::<u8>::new());
    }

    #[test_case("GEZDGNBVGY3TQOJ1", '1', 15)]
    #[test_case("GEZDGNBV8", '8', 8)]
    #[test_case("0EZD", '0', 0)]
    #[test_case("GE-ZD", '-', 2)]
    #[test_case("GE ZD!", '!', 5)]
    #[test_case(" \tgezd 9", '9', 7)]
    #[test_case("GEZDé", 'é', 4)]
    fn rejects_characters_outside_alphabet(input: &str, character: char, position: usize) {
        assert_eq!(
            decode(input),
            Err(Base32Error::InvalidCharacter {
                character,
                position
            })
        );
    }
}
