//! Deterministic hashing for ledger transactions
//!
//! Transaction hashes are content hashes, not random tokens:
//! - RFC 8785 JSON Canonicalization Scheme (JCS) for payload hashing
//! - Domain separation prefixes for all hash operations
//! - Big-endian encoding for integers
//!
//! # RFC 8785 Compliance
//!
//! This module uses `serde_json_canonicalizer` for RFC 8785 compliant JSON
//! canonicalization, ensuring consistent hashing regardless of field order
//! in the in-memory representation. Key properties:
//! - Deterministic key ordering (lexicographic UTF-8)
//! - ES6-compatible number serialization (handles floats, -0, etc.)
//! - Proper Unicode handling

use sha2::{Digest, Sha256};

/// 32-byte SHA-256 hash
pub type Hash256 = [u8; 32];

// ============================================================================
// Domain Separation Constants
// ============================================================================

/// Domain prefix for transaction payload hashing
pub const DOMAIN_PAYLOAD: &[u8] = b"HEALTHCHAIN_PAYLOAD_V1";

/// Domain prefix for the full transaction content hash
pub const DOMAIN_TRANSACTION: &[u8] = b"HEALTHCHAIN_TX_V1";

// ============================================================================
// Binary Encoding Helpers
// ============================================================================

/// Encode a u64 as 8 bytes big-endian
#[inline]
pub fn u64_be(n: u64) -> [u8; 8] {
    n.to_be_bytes()
}

/// Encode a string as length-prefixed UTF-8 bytes
/// Format: U32_BE(len) || UTF8_bytes
pub fn encode_string(s: &str) -> Vec<u8> {
    let utf8_bytes = s.as_bytes();
    let mut result = Vec::with_capacity(4 + utf8_bytes.len());
    result.extend_from_slice(&(utf8_bytes.len() as u32).to_be_bytes());
    result.extend_from_slice(utf8_bytes);
    result
}

// ============================================================================
// Canonical JSON (RFC 8785 JCS)
// ============================================================================

/// Convert a JSON value to its canonical string representation per RFC 8785.
///
/// # Panics
///
/// Panics if the JSON value contains a float that cannot be represented
/// (NaN or Infinity). Per RFC 8785, these are not valid JSON.
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    serde_json_canonicalizer::to_string(value)
        .expect("Failed to canonicalize JSON - contains invalid values (NaN or Infinity)")
}

/// Compute SHA-256 hash of canonical JSON representation with domain prefix
///
/// payload_hash = SHA256(b"HEALTHCHAIN_PAYLOAD_V1" || JCS(payload))
pub fn canonical_json_hash(value: &serde_json::Value) -> Hash256 {
    let canonical = canonicalize_json(value);

    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_PAYLOAD);
    hasher.update(canonical.as_bytes());
    hasher.finalize().into()
}

/// Parameters for computing a transaction content hash
#[derive(Clone, Copy)]
pub struct TransactionHashParams<'a> {
    pub position: u64,
    pub kind: &'a str,
    pub from_address: &'a str,
    pub to_address: Option<&'a str>,
    pub payload_hash: &'a Hash256,
    pub timestamp_millis: i64,
}

/// Compute the content hash of a ledger transaction.
///
/// ```text
/// tx_hash = SHA256(
///     b"HEALTHCHAIN_TX_V1"
///     || U64_BE(position)
///     || STR(kind)
///     || STR(from_address)
///     || STR(to_address)          // empty string when absent
///     || payload_hash
///     || U64_BE(timestamp_millis)
/// )
/// ```
///
/// Including the ledger position makes hashes unique even for two
/// byte-identical payloads appended back to back.
pub fn transaction_hash(params: &TransactionHashParams<'_>) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_TRANSACTION);
    hasher.update(u64_be(params.position));
    hasher.update(encode_string(params.kind));
    hasher.update(encode_string(params.from_address));
    hasher.update(encode_string(params.to_address.unwrap_or("")));
    hasher.update(params.payload_hash);
    hasher.update(u64_be(params.timestamp_millis as u64));
    hasher.finalize().into()
}
