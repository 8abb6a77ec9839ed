//! Locating and correcting misspellings in the checked text.

use crate::checker::tokenizer::{self, Token};
use crate::SpellingError;
use serde::Serialize;
use std::collections::HashMap;

/// One place a misspelled word appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub word: String,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corrected {
    pub text: String,
    pub replaced: usize,
}

/// Every whole-token occurrence of each error word, in text order.
pub fn locate(text: &str, errors: &[SpellingError]) -> Vec<Occurrence> {
    if errors.is_empty() {
        return Vec::new();
    }
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    tokenizer::tokenize(text)
        .into_iter()
        .filter(|token| errors.iter().any(|e| e.word == token.text))
        .map(|token| {
            let line = line_starts.partition_point(|&start| start <= token.offset);
            let line_start = line_starts[line - 1];
            Occurrence {
                word: token.text.to_string(),
                line,
                column: text[line_start..token.offset].chars().count() + 1,
                offset: token.offset,
            }
        })
        .collect()
}

/// Replace whole-token occurrences of `word`; text inside longer words is left alone.
pub fn replace_word(text: &str, word: &str, replacement: &str) -> Corrected {
    let mut map = HashMap::new();
    map.insert(word, replacement);
    replace_tokens(text, &map)
}

/// Replace each error that has suggestions with its first suggestion.
pub fn apply_top_suggestions(text: &str, errors: &[SpellingError]) -> Corrected {
    let map: HashMap<&str, &str> = errors
        .iter()
        .filter_map(|e| Some((e.word.as_str(), e.suggestions.first()?.as_str())))
        .collect();
    replace_tokens(text, &map)
}

fn replace_tokens(text: &str, replacements: &HashMap<&str, &str>) -> Corrected {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut replaced = 0;

    for Token { text: word, offset } in tokenizer::tokenize(text) {
        if let Some(replacement) = replacements.get(word) {
            out.push_str(&text[last..offset]);
            out.push_str(replacement);
            last = offset + word.len();
            replaced += 1;
        }
    }
    out.push_str(&text[last..]);

    Corrected {
        text: out,
        replaced,
    }
}
