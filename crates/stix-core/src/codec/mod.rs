//! JSON encoding/decoding for STIX objects.
//!
//! Objects encode as one flat JSON record: the identity envelope, the shared
//! block and the type-specific fields side by side. Decoding dispatches on
//! the `type` discriminator to the matching shape in the catalog.

pub mod collection;
pub mod lenient;
pub mod object;

pub use collection::{
    decode_collection, decode_collection_with_options, encode_bundle, encode_collection, Bundle,
};
pub use object::{
    decode, decode_any, decode_any_with_options, decode_with_options, encode, encode_pretty,
    encode_with_options, sniff_kind,
};

use crate::limits::{MAX_COLLECTION_LEN, MAX_PAYLOAD_SIZE};

/// Options for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Indent the output for humans. Compact output is the default.
    pub pretty: bool,
}

impl EncodeOptions {
    /// Creates default (compact) encoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates indented encoding options.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Options for decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Run the [`lenient`] coercion pass before typed decoding.
    pub lenient: bool,
    /// Largest accepted payload in bytes.
    pub max_payload_size: usize,
    /// Largest accepted number of objects in a collection.
    pub max_collection_len: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            lenient: false,
            max_payload_size: MAX_PAYLOAD_SIZE,
            max_collection_len: MAX_COLLECTION_LEN,
        }
    }
}

impl DecodeOptions {
    /// Creates strict decoding options with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables lenient coercion.
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn max_payload_size(mut self, max: usize) -> Self {
        self.max_payload_size = max;
        self
    }

    pub fn max_collection_len(mut self, max: usize) -> Self {
        self.max_collection_len = max;
        self
    }
}
