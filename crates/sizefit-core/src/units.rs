//! Size units and the small text helpers used by the page around the fitter.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::format::ImageFormat;

const BYTES_PER_KILOBYTE: f64 = 1024.0;

/// Base name for downloaded results.
pub const DOWNLOAD_STEM: &str = "resized-image";

/// Unit a size threshold is entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeUnit {
    #[default]
    Kilobytes,
    Megabytes,
}

impl SizeUnit {
    /// Bytes in one of this unit (binary multiples).
    pub fn bytes(self) -> f64 {
        match self {
            SizeUnit::Kilobytes => BYTES_PER_KILOBYTE,
            SizeUnit::Megabytes => BYTES_PER_KILOBYTE * BYTES_PER_KILOBYTE,
        }
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeUnit::Kilobytes => write!(f, "KB"),
            SizeUnit::Megabytes => write!(f, "MB"),
        }
    }
}

impl FromStr for SizeUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "KB" => Ok(SizeUnit::Kilobytes),
            "MB" => Ok(SizeUnit::Megabytes),
            _ => Err(UnitError::UnknownUnit(s.to_string())),
        }
    }
}

/// Errors converting a threshold to bytes.
#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("Unknown size unit: {0} (expected KB or MB)")]
    UnknownUnit(String),

    #[error("Size threshold must be a positive number, got {0}")]
    InvalidThreshold(f64),
}

/// Convert a threshold entered in `unit` to a whole number of bytes.
///
/// Fractions of a byte are dropped. Thresholds that come out below one byte
/// are rejected.
pub fn target_bytes(value: f64, unit: SizeUnit) -> Result<u64, UnitError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(UnitError::InvalidThreshold(value));
    }
    let bytes = (value * unit.bytes()).floor();
    if bytes < 1.0 || bytes > u64::MAX as f64 {
        return Err(UnitError::InvalidThreshold(value));
    }
    Ok(bytes as u64)
}

/// Human-readable size, always in kilobytes with two decimals (`"12.50 KB"`).
pub fn format_kilobytes(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / BYTES_PER_KILOBYTE)
}

/// Name for a downloaded result, keeping the original file's extension.
///
/// The extension is whatever follows the last `.`. A name without one takes
/// the extension of `format`, or is used whole when the format is unknown.
pub fn download_file_name(original_name: &str, format: Option<ImageFormat>) -> String {
    let extension = match original_name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext,
        _ => match format {
            Some(format) => format.extension(),
            None => original_name,
        },
    };
    format!("{DOWNLOAD_STEM}.{extension}")
}
