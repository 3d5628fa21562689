/// Errors of the fallible surfaces around the register engine. Register
/// writes themselves never fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Channel is not one of 0, 1, 2, 9, 10, 11.
    #[error("channel {channel} cannot start a 4-op channel")]
    InvalidPair { channel: usize },

    /// Register log ends in the middle of a record.
    #[error("truncated IMF record at offset {offset}")]
    TruncatedRecord { offset: usize },

    /// Length header of an IMF chunk exceeds the data.
    #[error("IMF chunk declares {declared} bytes, only {available} available")]
    LengthMismatch { declared: usize, available: usize },

    /// Malformed `ADDR=VALUE` register write.
    #[error("invalid register write: {0}")]
    InvalidWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
