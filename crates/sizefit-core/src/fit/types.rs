//! Result and error types for size fitting.

use thiserror::Error;

use super::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::format::ImageFormat;
use crate::sharpness::SharpnessError;

/// One encoded output produced during the search.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedCandidate {
    /// Encoded file bytes
    pub bytes: Vec<u8>,
    /// Drawn width in pixels
    pub width: u32,
    /// Drawn height in pixels
    pub height: u32,
    /// Encoder quality used (0.0 to 1.0)
    pub quality: f64,
    /// Output format (always the source format)
    pub format: ImageFormat,
}

impl EncodedCandidate {
    /// Encoded size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Record of a single encode attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitAttempt {
    pub width: u32,
    pub height: u32,
    pub quality: f64,
    pub scale: f64,
    pub size: u64,
}

/// Outcome of a fit request.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// The accepted candidate, or the smallest one if the target was missed
    pub candidate: EncodedCandidate,
    /// True if any attempt used fewer pixels than the original in either axis.
    ///
    /// Under best effort the returned candidate can be a full-size attempt
    /// even when this is set; see [`FitResult::candidate_reduced`].
    pub dimensions_reduced: bool,
    /// Luma variance of the decoded candidate
    pub sharpness_score: f64,
    /// Whether `candidate.size() <= target_size`
    pub met_target: bool,
    /// Requested budget in bytes
    pub target_size: u64,
    /// Width and height of the decoded source
    pub original_dimensions: (u32, u32),
    /// Every encode performed, in order
    pub attempts: Vec<FitAttempt>,
}

impl FitResult {
    /// Number of encodes the search performed.
    pub fn iterations(&self) -> usize {
        self.attempts.len()
    }

    /// Whether the returned candidate is smaller than the original in
    /// either axis.
    pub fn candidate_reduced(&self) -> bool {
        let (width, height) = self.original_dimensions;
        self.candidate.width < width || self.candidate.height < height
    }
}

/// Errors that terminate a fit request.
#[derive(Debug, Error)]
pub enum FitError {
    /// A zero-byte target can never be met.
    #[error("Target size must be at least 1 byte")]
    InvalidTarget,

    /// The search schedule is malformed.
    #[error("Invalid fit configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The source (or a candidate) could not be decoded or drawn.
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    /// The encoder failed to produce output.
    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    /// The accepted candidate decoded to an unusable surface.
    #[error("Failed to estimate sharpness: {0}")]
    Sharpness(#[from] SharpnessError),

    /// No schedule entry reached the target and the policy is strict.
    #[error("Could not reach {target} bytes; the smallest attempt was {smallest} bytes")]
    Unattainable { target: u64, smallest: u64 },

    /// The stop token fired between iterations.
    #[error("Fit cancelled: {0}")]
    Cancelled(enough::StopReason),
}

impl From<enough::StopReason> for FitError {
    fn from(reason: enough::StopReason) -> Self {
        FitError::Cancelled(reason)
    }
}
