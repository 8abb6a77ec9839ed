pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;

pub use checker::dictionary::Lexicon;
pub use checker::SpellChecker;
pub use config::Config;
pub use error::{Error, Result};

use serde::{Deserialize, Serialize};

/// Result of checking one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub errors: Vec<SpellingError>,
    pub stats: CheckStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingError {
    pub word: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatistics {
    pub character_count: usize,
    /// Every token, duplicates included
    pub word_count: usize,
    pub sentence_count: usize,
    pub error_count: usize,
}

/// Check `text` against the process-wide lexicon for `config.language`.
///
/// Fails with [`Error::DictionaryUnavailable`] when the lexicon cannot be
/// loaded; no partial report is produced in that case.
pub fn check_spelling(text: &str, config: &Config) -> Result<CheckReport> {
    let checker = SpellChecker::new(config)?;
    Ok(checker.check(text))
}
