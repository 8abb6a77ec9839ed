use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected at the request boundary before the engine runs.
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// The lexicon could not be located or parsed. Every check fails until the
    /// assets are fixed.
    #[error("Failed to load dictionary '{language}': {reason}")]
    DictionaryUnavailable { language: String, reason: Unavailable },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Text is required")]
    MissingText,

    #[error("Text too long. Maximum {} characters allowed.", group_thousands(*.limit))]
    TooLong { length: usize, limit: usize },
}

/// Why a dictionary load failed.
#[derive(Debug)]
pub enum Unavailable {
    NotFound { searched: Vec<PathBuf> },
    Unreadable { path: PathBuf, source: std::io::Error },
    Malformed { path: PathBuf, line: usize, message: String },
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NotFound { searched } => {
                write!(f, "no .aff/.dic pair found (searched ")?;
                for (i, path) in searched.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                write!(f, ")")
            }
            Unavailable::Unreadable { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
            Unavailable::Malformed {
                path,
                line,
                message,
            } => write!(f, "{}:{}: {}", path.display(), line, message),
        }
    }
}

impl Error {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

/// Formats `50000` as `50,000`.
pub(crate) fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
