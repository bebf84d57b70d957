//! Security limits for decoding untrusted input.
//!
//! These are the defaults for [`DecodeOptions`](crate::codec::DecodeOptions);
//! callers may tighten or relax them per call.

/// Maximum size of a single JSON payload in bytes (16 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Maximum number of objects in one collection or bundle.
pub const MAX_COLLECTION_LEN: usize = 100_000;
