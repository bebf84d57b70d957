//! Utility modules for STIX text handling.

pub mod text;

pub use text::{clean_text, escape_html, indent, strip_control, unescape_html};
