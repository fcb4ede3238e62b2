//! Errors returned while opening, scanning and reporting a Fasta file.

use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong inside an otherwise readable Fasta file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind
{
    /// A non-blank line was found before the first `>` header.
    MissingHeader,
    /// A header line carries no identifier after the `>` marker.
    MissingId,
    /// A header line is not valid UTF-8.
    InvalidUtf8,
}

#[derive(Debug)]
pub enum ErrorKind
{
    /// The input path is missing, unreadable or a directory.
    FileAccess
    {
        path: PathBuf,
        source: io::Error,
    },
    /// Malformed Fasta content at the given (1-based) line.
    Format
    {
        line: u64,
        kind: FormatErrorKind,
    },
    /// Read error after opening, or write error on the output.
    Io(io::Error),
}

#[derive(Debug)]
pub struct Error
{
    kind: Box<ErrorKind>,
}

impl Error
{
    pub fn new(kind: ErrorKind) -> Self
    {
        Error { kind: Box::new(kind) }
    }

    pub fn file_access(path: impl Into<PathBuf>, source: io::Error) -> Self
    {
        Error::new(ErrorKind::FileAccess { path: path.into(), source })
    }

    pub fn format(line: u64, kind: FormatErrorKind) -> Self
    {
        Error::new(ErrorKind::Format { line, kind })
    }

    pub fn kind(&self) -> &ErrorKind
    {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind
    {
        *self.kind
    }

    /// True if the error is a write into a closed pipe (e.g. `fastalen x.fa | head`).
    pub fn is_broken_pipe(&self) -> bool
    {
        match self.kind()
        {
            ErrorKind::Io(e) => e.kind() == io::ErrorKind::BrokenPipe,
            _ => false,
        }
    }
}

impl fmt::Display for FormatErrorKind
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self
        {
            FormatErrorKind::MissingHeader => write!(f, "expected '>' at record start"),
            FormatErrorKind::MissingId => write!(f, "header has no identifier"),
            FormatErrorKind::InvalidUtf8 => write!(f, "header is not valid UTF-8"),
        }
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self.kind()
        {
            ErrorKind::FileAccess { path, source } =>
                write!(f, "cannot read '{}': {}", path.display(), source),
            ErrorKind::Format { line, kind } =>
                write!(f, "Fasta parse error at line {}: {}", line, kind),
            ErrorKind::Io(e) => e.fmt(f),
        }
    }
}

impl error::Error for Error
{
    fn source(&self) -> Option<&(dyn error::Error + 'static)>
    {
        match self.kind()
        {
            ErrorKind::FileAccess { source, .. } => Some(source),
            ErrorKind::Io(e) => Some(e),
            ErrorKind::Format { .. } => None,
        }
    }
}

impl From<io::Error> for Error
{
    fn from(e: io::Error) -> Self
    {
        Error::new(ErrorKind::Io(e))
    }
}
