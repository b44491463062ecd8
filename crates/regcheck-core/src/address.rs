//! # Address Checksums (EIP-55)
//!
//! Data directories keyed by contract address must spell the address in
//! its canonical mixed-case form. The casing encodes a checksum: hex letter
//! `i` is upper-cased when nibble `i` of `keccak256(lowercase_hex)` is 8 or
//! greater. A name is accepted only if it is byte-for-byte equal to the
//! checksummed rendering of the address it denotes.

use std::fmt;

use sha3::{Digest, Keccak256};

use crate::error::AddressError;

/// Prefix that marks a directory name as an address.
pub const ADDRESS_PREFIX: &str = "0x";

/// Number of hex digits in an address body.
const ADDRESS_HEX_LEN: usize = 40;

/// Outcome of checking one directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressVerdict {
    /// Valid syntax and canonical casing.
    Ok,
    /// The name cannot be parsed as an address at all.
    InvalidSyntax {
        /// Why parsing failed.
        reason: AddressError,
    },
    /// The name parses but is not spelled in checksummed form.
    WrongCasing {
        /// The canonical spelling of the same address.
        expected: ChecksumAddress,
    },
}

impl AddressVerdict {
    /// Returns true for [`AddressVerdict::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Decides whether an address-like name is valid and canonically cased.
///
/// The tree walker only calls this for directory names that start with
/// [`ADDRESS_PREFIX`].
pub trait AddressChecker {
    /// Check a single name.
    fn check(&self, name: &str) -> AddressVerdict;
}

/// [`AddressChecker`] implementing EIP-55 with Keccak-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip55Checker;

impl AddressChecker for Eip55Checker {
    fn check(&self, name: &str) -> AddressVerdict {
        match ChecksumAddress::parse(name) {
            Ok(canonical) if canonical.as_str() == name => AddressVerdict::Ok,
            Ok(canonical) => AddressVerdict::WrongCasing {
                expected: canonical,
            },
            Err(reason) => AddressVerdict::InvalidSyntax { reason },
        }
    }
}

/// A 20-byte address held in its EIP-55 checksummed spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChecksumAddress(String);

impl ChecksumAddress {
    /// Parse an address in any casing and normalize it to checksummed form.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError`] if the prefix is missing, a character is
    /// not hex, or the body is not exactly 40 digits long.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let body = s
            .strip_prefix(ADDRESS_PREFIX)
            .ok_or(AddressError::MissingPrefix)?;

        if let Some((position, ch)) = body
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(AddressError::InvalidCharacter { ch, position });
        }
        if body.len() != ADDRESS_HEX_LEN {
            return Err(AddressError::InvalidLength(body.len()));
        }

        Ok(Self(checksum_hex(&body.to_ascii_lowercase())))
    }

    /// Build the checksummed spelling of raw address bytes.
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        let lower: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(checksum_hex(&lower))
    }

    /// The checksummed spelling, including the `0x` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChecksumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Apply EIP-55 casing to 40 lowercase hex digits and prepend `0x`.
fn checksum_hex(lower: &str) -> String {
    let hash = Keccak256::digest(lower.as_bytes());
    let mut out = String::with_capacity(ADDRESS_PREFIX.len() + lower.len());
    out.push_str(ADDRESS_PREFIX);
    for (i, c) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference vectors from EIP-55.
    const EIP55_VECTORS: &[&str] = &[
        "0x52908400098527886E0F7030069857D2E4169EE7",
        "0x8617E340B3D01FA5F11F306F4090FD50E238070D",
        "0xde709f2102306220921060314715629080e2fb77",
        "0x27b1fdb04752bbc536007a920d24acb045561c26",
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    #[test]
    fn reference_vectors_are_accepted() {
        for v in EIP55_VECTORS {
            assert_eq!(Eip55Checker.check(v), AddressVerdict::Ok, "{v}");
        }
    }

    #[test]
    fn reference_vectors_normalize_from_lowercase() {
        for v in EIP55_VECTORS {
            let lower = v.to_ascii_lowercase();
            assert_eq!(ChecksumAddress::parse(&lower).unwrap().as_str(), *v);
        }
    }

    #[test]
    fn lowercase_mixed_address_is_wrong_casing() {
        let name = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        match Eip55Checker.check(name) {
            AddressVerdict::WrongCasing { expected } => {
                assert_eq!(expected.as_str(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
            }
            other => panic!("expected WrongCasing, got {other:?}"),
        }
    }

    #[test]
    fn uppercase_address_is_wrong_casing() {
        let name = "0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED";
        assert!(matches!(
            Eip55Checker.check(name),
            AddressVerdict::WrongCasing { .. }
        ));
    }

    #[test]
    fn single_flipped_letter_is_wrong_casing() {
        let name = "0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert!(matches!(
            Eip55Checker.check(name),
            AddressVerdict::WrongCasing { .. }
        ));
    }

    #[test]
    fn short_address_is_invalid_syntax() {
        assert_eq!(
            Eip55Checker.check("0x1234"),
            AddressVerdict::InvalidSyntax {
                reason: AddressError::InvalidLength(4)
            }
        );
    }

    #[test]
    fn non_hex_character_is_invalid_syntax() {
        let name = "0xZZaeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
        assert_eq!(
            Eip55Checker.check(name),
            AddressVerdict::InvalidSyntax {
                reason: AddressError::InvalidCharacter { ch: 'Z', position: 0 }
            }
        );
    }

    #[test]
    fn bare_prefix_is_invalid_syntax() {
        assert!(matches!(
            Eip55Checker.check("0x"),
            AddressVerdict::InvalidSyntax { .. }
        ));
    }

    #[test]
    fn missing_prefix_is_rejected_by_parse() {
        let err = ChecksumAddress::parse("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap_err();
        assert_eq!(err, AddressError::MissingPrefix);
    }

    #[test]
    fn zero_address_has_no_letters_to_case() {
        let zero = ChecksumAddress::from_bytes(&[0u8; 20]);
        assert_eq!(zero.as_str(), "0x0000000000000000000000000000000000000000");
        assert!(Eip55Checker.check(zero.as_str()).is_ok());
    }

    proptest! {
        #[test]
        fn checksummed_rendering_is_a_fixed_point(bytes in proptest::array::uniform20(any::<u8>())) {
            let addr = ChecksumAddress::from_bytes(&bytes);
            prop_assert_eq!(Eip55Checker.check(addr.as_str()), AddressVerdict::Ok);
        }

        #[test]
        fn parse_is_case_insensitive(bytes in proptest::array::uniform20(any::<u8>())) {
            let addr = ChecksumAddress::from_bytes(&bytes);
            let upper = format!("0x{}", addr.as_str()[2..].to_ascii_uppercase());
            prop_assert_eq!(ChecksumAddress::parse(&upper).unwrap(), addr);
        }
    }
}
