use std::fmt;
use std::path::PathBuf;

/// The crate's single fallible-operation error type.
///
/// Non-fatal conditions encountered mid-parse (a mismatched closing tag, an
/// unresolved `#template` reference, a `{{` with no closing `}}`) are not
/// represented here; they are tolerated and, where relevant, logged through
/// the `log` facade. Only conditions that prevent an operation from
/// completing at all reach this type.
#[derive(Debug)]
pub enum ParseError {
    /// A caller passed arguments the API cannot act on, e.g. requesting
    /// buffered output without supplying an output string.
    ArgumentError(String),

    /// Reading or opening a file failed.
    Io(std::io::Error),

    /// A file exceeded the maximum size the cache will hold.
    SizeError { path: PathBuf, size: u64 },

    /// A filesystem-level condition other than a bare I/O error, such as a
    /// template path resolving outside of the configured root.
    FilesystemError(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ArgumentError(message) => write!(f, "argument error: {message}"),
            ParseError::Io(err) => write!(f, "I/O error: {err}"),
            ParseError::SizeError { path, size } => {
                write!(f, "file too large ({size} bytes): {}", path.display())
            }
            ParseError::FilesystemError(message) => write!(f, "filesystem error: {message}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(err) => Some(err),
            ParseError::ArgumentError(_)
            | ParseError::SizeError { .. }
            | ParseError::FilesystemError(_) => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io(err)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
