/// Failure conditions reported by [`XorSequence`](crate::XorSequence) operations.
///
/// Every failing call leaves the sequence exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An index was outside the valid interval of the operation.
    #[error("index {index} is out of range for a sequence of size {size}")]
    OutOfRange { index: usize, size: usize },
    /// An end of the sequence was accessed while it held no elements.
    #[error("the sequence is empty")]
    EmptyContainer,
}

pub type Result<T> = std::result::Result<T, Error>;
