//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Segment identification prompt (stage 1)
pub const GENERATE: &str = include_str!("../../prompts/generate.pmt");

/// Segment deep-dive prompt (stage 2)
pub const ENHANCE: &str = include_str!("../../prompts/enhance.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "generate" => Some(GENERATE),
        "enhance" => Some(ENHANCE),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
