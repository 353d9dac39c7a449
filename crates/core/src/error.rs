//! Error taxonomy shared by all three stages.
//!
//! Every variant here maps to one of the kinds in the error-handling design:
//! structural input, record format, bounds/reference, numeric-decidability,
//! and I/O. There is no retry path anywhere in this crate — a `CoreError`
//! always means the calling stage must abort.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("structural input error: {0}")]
    StructuralInput(String),

    #[error("record format error: {0}")]
    RecordFormat(String),

    #[error("bounds/reference error: {0}")]
    BoundsReference(String),

    #[error("exact engine could not decide a comparison after {precision_bits} bits: {context}")]
    NumericIndecision {
        precision_bits: u32,
        context: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
