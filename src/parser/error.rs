use crate::Error;

/// The error of parser handling.
///
/// Not recommended to use it at other times.
#[derive(Debug)]
pub enum PError {
    /// If parser mismatched, just choose another one.
    Mismatch,
    /// The parser is the only one can be matched.
    Terminate(Error),
}

/// The result of the sub-parsers.
pub type PResult<T> = Result<T, PError>;

impl From<Error> for PError {
    fn from(e: Error) -> Self {
        Self::Terminate(e)
    }
}

impl PError {
    /// Transform to the public error, a mismatch here is a bug of the caller.
    pub fn into_error(self, fallback: impl FnOnce() -> Error) -> Error {
        match self {
            Self::Mismatch => fallback(),
            Self::Terminate(e) => e,
        }
    }
}

/// Try the next sub-parser if the first one is mismatched.
macro_rules! err_own {
    ($e:expr, $then:expr) => {
        match $e {
            Err($crate::parser::PError::Mismatch) => $then,
            r => r,
        }
    };
}
pub(crate) use err_own;
