use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading an image.
///
/// Only unrecoverable framing problems surface here; anything that can be
/// localized to a row, a field, or a single stream degrades to a warning on
/// the [`ClrImage`](crate::ClrImage) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a well-formed PE image.
    #[error("invalid PE image: {0}")]
    InvalidPe(&'static str),

    /// The PE image carries no CLR directory entry.
    #[error("image has no CLR header")]
    NotDotNet,

    /// Malformed CLR metadata framing: truncated header, wrong signature,
    /// impossible length prefix.
    #[error("invalid CLR metadata: {0}")]
    InvalidFormat(String),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Error {
        Error::InvalidFormat(msg.into())
    }
}

/// Accumulator for best-effort parse warnings.
///
/// Every message is pushed in encounter order and also emitted through the
/// `log` facade, so callers get both a programmatic list and log output.
#[derive(Debug, Default)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Warnings {
        Warnings::default()
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.0.push(msg);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}
