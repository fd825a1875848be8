//! Research stages
//!
//! - [`SegmentGenerator`] - stage 1, raw segment list for an industry
//! - [`SegmentEnhancer`] - stage 2, four-part deep dive per segment
//! - [`SegmentService`] - the seam the orchestrator drives, served either
//!   in-process ([`LocalSegmentService`]) or over HTTP ([`HttpSegmentService`])

mod enhancer;
mod error;
mod generator;
pub mod messages;
mod remote;
mod service;

pub use enhancer::{MAX_SEGMENT_CHARS, SegmentEnhancer, truncate_chars, validate_segments};
pub use error::ResearchError;
pub use generator::{SegmentGenerator, validate_industry};
pub use messages::{EnhanceRequest, ErrorEnvelope, GenerateRequest, ResultResponse};
pub use remote::HttpSegmentService;
pub use service::{LocalSegmentService, SegmentService};
