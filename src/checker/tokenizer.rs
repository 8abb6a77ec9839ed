use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    // Markdown markers and line structure; each is a single byte, so cleaning
    // never shifts offsets.
    static ref MARKDOWN_NOISE: Regex = Regex::new(r"[#\-*\n\r\t]").unwrap();
    // Letters, optionally joined by one apostrophe: don't, O'Connor
    static ref WORD: Regex = Regex::new(r"[A-Za-z]+(?:'[A-Za-z]+)?").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+").unwrap();
}

/// A word candidate, borrowed from the text it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'t> {
    pub text: &'t str,
    /// Byte offset in the original text
    pub offset: usize,
}

/// Replace markdown noise and line breaks with spaces.
pub fn clean(text: &str) -> Cow<'_, str> {
    MARKDOWN_NOISE.replace_all(text, " ")
}

/// Extract word tokens in order of appearance, duplicates included.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let cleaned = clean(text);
    WORD.find_iter(&cleaned)
        .map(|m| Token {
            text: &text[m.range()],
            offset: m.start(),
        })
        .collect()
}

/// Number of non-blank segments between runs of `.`, `!` and `?`.
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|segment| !segment.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<&str> {
        tokenize(text).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_markdown_noise_is_stripped() {
        assert_eq!(words("# Title\n- item *one*"), vec!["Title", "item", "one"]);
        assert_eq!(words("**bold**-dash\tnext"), vec!["bold", "dash", "next"]);
    }

    #[test]
    fn test_apostrophes() {
        assert_eq!(words("don't stop"), vec!["don't", "stop"]);
        assert_eq!(words("O'Connor's"), vec!["O'Connor", "s"]);
        assert_eq!(words("'quoted' words'"), vec!["quoted", "words"]);
    }

    #[test]
    fn test_digits_and_symbols_separate_words() {
        assert_eq!(words("abc123def"), vec!["abc", "def"]);
        assert_eq!(words("snake_case, x@y.z"), vec!["snake", "case", "x", "y", "z"]);
        assert_eq!(words("café"), vec!["caf"]);
        assert!(words("").is_empty());
        assert!(words("42 !? --").is_empty());
    }

    #[test]
    fn test_duplicates_and_offsets_preserved() {
        let text = "the cat\nthe";
        let tokens = tokenize(text);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].text, "the");
        assert_eq!(tokens[2].offset, 8);
        assert_eq!(&text[tokens[1].offset..tokens[1].offset + 3], "cat");
    }

    #[test]
    fn test_count_sentences() {
        assert_eq!(count_sentences("Helllo world. This is a test!"), 2);
        assert_eq!(count_sentences("Wait... what?! Yes"), 3);
        assert_eq!(count_sentences("   "), 0);
        assert_eq!(count_sentences("..."), 0);
        assert_eq!(count_sentences("no terminator"), 1);
    }
}
