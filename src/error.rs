#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("degenerate input: {0} has no positive peak to normalize by")]
    DegenerateInput(&'static str),
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid(msg: impl ToString) -> Self {
        Self::InvalidParameter(msg.to_string())
    }
    /// Checks that two grids can be combined element-wise
    pub(crate) fn same_shape(left: (usize, usize), right: (usize, usize)) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { left, right })
        }
    }
}
