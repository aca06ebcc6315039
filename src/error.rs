//! Error type shared by every stage of wheel generation.
//!
//! Every variant is raised at the boundary of the operation that first sees
//! the violated precondition. Nothing is retried and nothing is clamped into a
//! default geometry.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WheelError>;

#[derive(Error, Debug)]
pub enum WheelError {
    /// A width or height handed to the scaling math was zero or negative.
    #[error("invalid dimension in {context}: {width} x {height} (both sides must be positive)")]
    InvalidDimension {
        context: &'static str,
        width: f64,
        height: f64,
    },

    /// The measured string produced no glyphs.
    #[error("cannot measure {text:?}: it shapes to zero glyphs")]
    EmptyInput { text: String },

    /// The paddings and widths of a slice's regions need more than the radius.
    #[error(
        "placeholder paddings and widths take up {total:.4} of the slice length, more than 100%"
    )]
    LayoutOverflow { total: f64 },

    #[error("no font file found for family '{family}'")]
    FontNotFound { family: String },

    /// The barcode encoder emitted something other than rectangles.
    #[error("unsupported barcode geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid UPC value {value:?}: {reason}")]
    InvalidUpc { value: String, reason: &'static str },

    #[error("barcode encoder failed: {0}")]
    BarcodeEncoder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WheelError {
    pub(crate) fn invalid_dimension(context: &'static str, width: f64, height: f64) -> Self {
        Self::InvalidDimension {
            context,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_message_reports_total() {
        let err = WheelError::LayoutOverflow { total: 1.25 };
        assert!(err.to_string().contains("1.2500"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WheelError = io.into();
        assert!(matches!(err, WheelError::Io(_)));
    }
}
