pub mod affix;
pub mod corrections;
pub mod dictionary;
pub mod suggestions;
pub mod tokenizer;

use crate::{CheckReport, CheckStatistics, Config, SpellingError};
use anyhow::Result;
use dictionary::Lexicon;
use suggestions::ScanBudget;
use std::collections::HashSet;
use std::sync::Arc;

/// Single letters that are words on their own.
const SINGLE_LETTER_WORDS: [&str; 2] = ["I", "a"];

/// No misspelling is reported with more suggestions than this.
pub const MAX_REPORTED_SUGGESTIONS: usize = 5;

/// Fallback stem scans allowed per check; later misspellings only get
/// single-edit suggestions.
pub const FALLBACK_SCANS_PER_CHECK: usize = 32;

pub struct SpellChecker {
    lexicon: Arc<Lexicon>,
    max_suggestions: usize,
}

impl SpellChecker {
    /// Checker backed by the process-wide lexicon.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let lexicon = Lexicon::shared(config)?;
        Ok(Self::with_lexicon(lexicon, config.max_suggestions))
    }

    /// `max_suggestions` is capped at [`MAX_REPORTED_SUGGESTIONS`].
    pub fn with_lexicon(lexicon: Arc<Lexicon>, max_suggestions: usize) -> Self {
        Self {
            lexicon,
            max_suggestions: max_suggestions.min(MAX_REPORTED_SUGGESTIONS),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Find misspelled words in `text`, in order of first appearance, with
    /// statistics about the text.
    pub fn check(&self, text: &str) -> CheckReport {
        let tokens = tokenizer::tokenize(text);

        let mut checked = HashSet::new();
        let mut errors = Vec::new();
        let mut budget = ScanBudget::new(FALLBACK_SCANS_PER_CHECK);

        for token in &tokens {
            let word = token.text;

            // Stray initials are noise rather than words
            if word.len() == 1 && !SINGLE_LETTER_WORDS.contains(&word) {
                continue;
            }
            if !checked.insert(word) {
                continue;
            }
            if self.is_correct(word) {
                continue;
            }

            let mut suggestions = self.lexicon.suggest_within(word, &mut budget);
            suggestions.truncate(self.max_suggestions);
            log::debug!("Misspelled '{}' ({} suggestions)", word, suggestions.len());

            errors.push(SpellingError {
                word: word.to_string(),
                suggestions,
            });
        }

        let stats = CheckStatistics {
            character_count: text.chars().count(),
            word_count: tokens.len(),
            sentence_count: tokenizer::count_sentences(text),
            error_count: errors.len(),
        };

        CheckReport { errors, stats }
    }

    fn is_correct(&self, word: &str) -> bool {
        self.lexicon.is_known(word) || self.lexicon.is_known(&word.to_lowercase())
    }

    /// Check a file and replace every misspelling that has a suggestion with
    /// the first one, writing the file back when anything changed.
    pub fn fix_file(&self, path: &std::path::Path) -> Result<(CheckReport, usize)> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let report = self.check(&content);
        let corrected = corrections::apply_top_suggestions(&content, &report.errors);

        if corrected.replaced > 0 {
            std::fs::write(path, &corrected.text)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }

        Ok((report, corrected.replaced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::dictionary::tests::fixture;
    use tempfile::tempdir;

    fn checker() -> SpellChecker {
        SpellChecker::with_lexicon(Arc::new(fixture()), 5)
    }

    fn misspelled(report: &CheckReport) -> Vec<&str> {
        report.errors.iter().map(|e| e.word.as_str()).collect()
    }

    #[test]
    fn test_statistics() {
        let text = "Helllo world. This is a test!";
        let report = checker().check(text);

        assert_eq!(report.stats.word_count, 6);
        assert_eq!(report.stats.sentence_count, 2);
        assert_eq!(report.stats.character_count, text.len());
        assert_eq!(report.stats.error_count, 1);
        assert_eq!(misspelled(&report), vec!["Helllo"]);
        assert_eq!(report.errors[0].suggestions.first().map(String::as_str), Some("Hello"));
    }

    #[test]
    fn test_correct_text_in_any_casing() {
        let checker = checker();
        for text in [
            "The quick brown fox jumps over the lazy dog.",
            "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG",
            "I don't know. Tried, tested, and rereading!",
        ] {
            let report = checker.check(text);
            assert!(report.errors.is_empty(), "{text}: {:?}", report.errors);
        }
    }

    #[test]
    fn test_duplicates_reported_once_in_first_seen_order() {
        let report = checker().check("zorp blarg zorp Zorp blarg");
        assert_eq!(misspelled(&report), vec!["zorp", "blarg", "Zorp"]);
        assert_eq!(report.stats.word_count, 5);
        assert_eq!(report.stats.error_count, 3);
    }

    #[test]
    fn test_single_letters() {
        let report = checker().check("I saw a x and Q. A i");
        // "saw" is unknown to the fixture; single letters are never reported
        assert_eq!(misspelled(&report), vec!["saw"]);
        assert_eq!(report.stats.word_count, 8);
    }

    #[test]
    fn test_sentence_initial_capital_falls_back_to_lowercase() {
        let report = checker().check("Spelling. Checked. Hello.");
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_suggestion_bound() {
        let checker = SpellChecker::with_lexicon(Arc::new(fixture()), 2);
        let report = checker.check("tst wrld helllo tets");
        assert!(!report.errors.is_empty());
        assert!(report.errors.iter().all(|e| e.suggestions.len() <= 2));

        let report = self::checker().check("tst wrld helllo tets");
        assert!(report.errors.iter().all(|e| e.suggestions.len() <= 5));
    }

    #[test]
    fn test_configured_suggestion_limit_is_capped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_suggestions = 12\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.max_suggestions, 12);

        let checker = SpellChecker::with_lexicon(Arc::new(fixture()), config.max_suggestions);
        let report = checker.check("it ot is");
        assert_eq!(misspelled(&report), vec!["ot"]);
        assert!(!report.errors[0].suggestions.is_empty());
        assert!(report.errors[0].suggestions.len() <= MAX_REPORTED_SUGGESTIONS);
    }

    #[test]
    fn test_fallback_scans_are_bounded_per_check() {
        let mut text: String = (b'a'..=b'z')
            .flat_map(|c| [format!("zzqx{} ", c as char), format!("zzqw{} ", c as char)])
            .collect();
        text.push_str("hxlpq");

        let report = checker().check(&text);
        assert_eq!(report.errors.len(), 53);
        let last = report.errors.last().unwrap();
        assert_eq!(last.word, "hxlpq");
        assert!(last.suggestions.is_empty());

        // Alone, the same word still gets the scan
        let report = checker().check("hxlpq");
        assert!(report.errors[0].suggestions.contains(&"help".to_string()));
    }

    #[test]
    fn test_empty_and_non_alphabetic_input() {
        let report = checker().check("");
        assert!(report.errors.is_empty());
        assert_eq!(report.stats.word_count, 0);
        assert_eq!(report.stats.sentence_count, 0);

        let report = checker().check("1234 -- ## !!");
        assert!(report.errors.is_empty());
        assert_eq!(report.stats.character_count, 13);
    }

    #[test]
    fn test_fix_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, "# Helllo\nrecieve the helllo text").unwrap();

        let (report, replaced) = checker().fix_file(&path).unwrap();
        assert_eq!(report.errors.len(), 3);
        assert_eq!(replaced, 3);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# Hello\nreceive the hello text"
        );
    }
}
