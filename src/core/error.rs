use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid unit {field}: {reason} (got {value})")]
    InvalidUnit {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("grid shape {height}x{width}, attempted coords ({row}, {col})")]
    OutOfGrid {
        row: i64,
        col: i64,
        height: usize,
        width: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
