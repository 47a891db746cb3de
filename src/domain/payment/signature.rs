//! SHA signatures for the PostFinance e-commerce protocol.
//!
//! Both directions use the same scheme: the field values are concatenated in
//! a fixed order with no delimiters, the shared secret is appended, and the
//! result is hashed. Field order is part of the contract; a wrong order makes
//! every signature fail.

use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;

/// Digest used for request and callback signatures.
///
/// Configured per merchant account in the provider back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShaAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
}

impl ShaAlgorithm {
    /// Hashes `input` and returns the lowercase hex digest.
    pub fn digest_hex(&self, input: &[u8]) -> String {
        match self {
            ShaAlgorithm::Sha1 => hex::encode(Sha1::digest(input)),
            ShaAlgorithm::Sha256 => hex::encode(Sha256::digest(input)),
            ShaAlgorithm::Sha512 => hex::encode(Sha512::digest(input)),
        }
    }

    /// Signs `fields` followed by `secret`, concatenated without delimiters.
    pub fn sign(&self, fields: &[&str], secret: &str) -> String {
        let mut source = String::with_capacity(
            fields.iter().map(|f| f.len()).sum::<usize>() + secret.len(),
        );
        for field in fields {
            source.push_str(field);
        }
        source.push_str(secret);
        self.digest_hex(source.as_bytes())
    }
}

/// Compares a computed digest with a provider-supplied one.
///
/// Hex case is ignored; the comparison itself is constant time.
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    let expected = expected.to_ascii_lowercase();
    let provided = provided.trim().to_ascii_lowercase();
    constant_time_compare(expected.as_bytes(), provided.as_bytes())
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
