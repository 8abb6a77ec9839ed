use crate::checker::dictionary::{capitalize, Casing, Lexicon};
use std::collections::HashSet;

/// Words longer than this get no suggestions.
const MAX_WORD_LEN: usize = 100;

/// Fallback candidates must be within this Damerau-Levenshtein distance.
const MAX_FALLBACK_DISTANCE: usize = 2;

/// How many fallback stem scans a caller may still run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanBudget {
    remaining: usize,
}

impl ScanBudget {
    pub fn new(scans: usize) -> Self {
        Self { remaining: scans }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// Generate spelling suggestions, most likely first.
///
/// Cheap single-edit candidates are tried in the conventional Hunspell order.
/// A scan over stems of similar length only runs when none of them is a known
/// word and `budget` still has a scan to spend.
pub fn generate(
    word: &str,
    lexicon: &Lexicon,
    max_suggestions: usize,
    budget: &mut ScanBudget,
) -> Vec<String> {
    let len = word.chars().count();
    if max_suggestions == 0 || len == 0 || len > MAX_WORD_LEN {
        return Vec::new();
    }

    let casing = Casing::of(word);
    let base = match casing {
        Casing::Capitalized | Casing::AllUpper => word.to_lowercase(),
        Casing::Lower | Casing::Mixed => word.to_string(),
    };
    let mut found = Collector::new(word, lexicon, casing, max_suggestions);

    // 1. Casing alone
    let lower = word.to_lowercase();
    for variant in [lower.clone(), capitalize(&lower), word.to_uppercase()] {
        found.offer_verbatim(variant);
    }

    let chars: Vec<char> = base.chars().collect();
    let try_chars = try_chars(lexicon);
    let stages: [&dyn Fn() -> Vec<String>; 8] = [
        &|| replacements(&base, lexicon),
        &|| transpositions(&chars),
        &|| keyboard_neighbours(&chars, &lexicon.affixes().keyboard),
        &|| deletions(&chars),
        &|| insertions(&chars, &try_chars),
        &|| substitutions(&chars, &try_chars),
        &|| doubled_pairs(&chars),
        &|| two_words(&chars),
    ];

    for stage in stages {
        for candidate in stage() {
            found.offer(candidate);
        }
        if found.is_full() {
            return found.into_vec();
        }
    }

    if found.is_empty() && budget.spend() {
        for candidate in nearest_stems(&base, lexicon) {
            found.offer(candidate);
            if found.is_full() {
                break;
            }
        }
    }

    found.into_vec()
}

/// Accumulates unique, acceptable suggestions up to a limit.
struct Collector<'a> {
    word: &'a str,
    lexicon: &'a Lexicon,
    casing: Casing,
    max: usize,
    seen: HashSet<String>,
    out: Vec<String>,
}

impl<'a> Collector<'a> {
    fn new(word: &'a str, lexicon: &'a Lexicon, casing: Casing, max: usize) -> Self {
        Self {
            word,
            lexicon,
            casing,
            max,
            seen: HashSet::new(),
            out: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.out.len() >= self.max
    }

    fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    fn into_vec(self) -> Vec<String> {
        self.out
    }

    /// Offer a candidate built from the lowercased word; it is re-cased to
    /// match the input before being checked. A lowercase candidate that is
    /// only known capitalized is offered as the proper noun.
    fn offer(&mut self, candidate: String) {
        let recased = self.casing.apply(&candidate);
        if self.acceptable(&recased) {
            self.push(recased);
        } else if self.casing == Casing::Lower
            && !candidate.split(' ').all(|part| self.lexicon.is_known(part))
        {
            let proper = capitalize(&candidate);
            if self.acceptable(&proper) {
                self.push(proper);
            }
        }
    }

    fn offer_verbatim(&mut self, candidate: String) {
        if self.acceptable(&candidate) {
            self.push(candidate);
        }
    }

    fn acceptable(&self, candidate: &str) -> bool {
        candidate != self.word
            && !self.seen.contains(candidate)
            && candidate
                .split(' ')
                .all(|part| self.lexicon.is_suggestible(part))
    }

    fn push(&mut self, candidate: String) {
        if self.is_full() {
            return;
        }
        self.seen.insert(candidate.clone());
        self.out.push(candidate);
    }
}

fn try_chars(lexicon: &Lexicon) -> Vec<char> {
    let mut chars: Vec<char> = Vec::new();
    for ch in lexicon.affixes().try_chars.chars() {
        if !ch.is_uppercase() && !chars.contains(&ch) {
            chars.push(ch);
        }
    }
    chars
}

/// REP table patterns; `^` and `$` anchor a pattern to the word edges.
fn replacements(word: &str, lexicon: &Lexicon) -> Vec<String> {
    let mut out = Vec::new();
    for (pattern, replacement) in &lexicon.affixes().replacements {
        let at_start = pattern.starts_with('^');
        let at_end = pattern.ends_with('$') && pattern.len() > 1;
        let needle = pattern.trim_start_matches('^').trim_end_matches('$');
        if needle.is_empty() {
            continue;
        }

        for (idx, _) in word.match_indices(needle) {
            if (at_start && idx != 0) || (at_end && idx + needle.len() != word.len()) {
                continue;
            }
            let mut candidate = String::with_capacity(word.len() + replacement.len());
            candidate.push_str(&word[..idx]);
            candidate.push_str(replacement);
            candidate.push_str(&word[idx + needle.len()..]);
            out.push(candidate);
        }
    }
    out
}

fn transpositions(chars: &[char]) -> Vec<String> {
    let mut out = Vec::new();
    for i in 0..chars.len().saturating_sub(1) {
        if chars[i] == chars[i + 1] {
            continue;
        }
        let mut new_word = chars.to_vec();
        new_word.swap(i, i + 1);
        out.push(new_word.iter().collect());
    }
    out
}

/// Substitutions by horizontally adjacent keys, rows separated by `|`.
fn keyboard_neighbours(chars: &[char], keyboard: &str) -> Vec<String> {
    let rows: Vec<Vec<char>> = keyboard.split('|').map(|row| row.chars().collect()).collect();
    let mut out = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        for row in &rows {
            let Some(pos) = row.iter().position(|&k| k == ch) else {
                continue;
            };
            let neighbours = [pos.checked_sub(1), Some(pos + 1)];
            for key in neighbours.into_iter().flatten().filter_map(|p| row.get(p)) {
                let mut new_word = chars.to_vec();
                new_word[i] = *key;
                out.push(new_word.iter().collect());
            }
        }
    }
    out
}

fn deletions(chars: &[char]) -> Vec<String> {
    (0..chars.len())
        .map(|i| {
            let mut new_word = chars.to_vec();
            new_word.remove(i);
            new_word.iter().collect()
        })
        .collect()
}

fn insertions(chars: &[char], try_chars: &[char]) -> Vec<String> {
    let mut out = Vec::new();
    for &ch in try_chars {
        for i in 0..=chars.len() {
            let mut new_word = chars.to_vec();
            new_word.insert(i, ch);
            out.push(new_word.iter().collect());
        }
    }
    out
}

fn substitutions(chars: &[char], try_chars: &[char]) -> Vec<String> {
    let mut out = Vec::new();
    for &ch in try_chars {
        for i in 0..chars.len() {
            if chars[i] == ch {
                continue;
            }
            let mut new_word = chars.to_vec();
            new_word[i] = ch;
            out.push(new_word.iter().collect());
        }
    }
    out
}

/// Drops a repeated two-letter sequence: "vacacation" -> "vacation".
fn doubled_pairs(chars: &[char]) -> Vec<String> {
    let mut out = Vec::new();
    for i in 3..chars.len() {
        if chars[i] == chars[i - 2] && chars[i - 1] == chars[i - 3] {
            let mut new_word = chars.to_vec();
            new_word.drain(i - 1..=i);
            let candidate: String = new_word.iter().collect();
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out
}

fn two_words(chars: &[char]) -> Vec<String> {
    (1..chars.len())
        .map(|i| {
            let left: String = chars[..i].iter().collect();
            let right: String = chars[i..].iter().collect();
            format!("{} {}", left, right)
        })
        .collect()
}

/// Stems close to `word`, nearest first, ties broken alphabetically.
fn nearest_stems(word: &str, lexicon: &Lexicon) -> Vec<String> {
    let len = word.chars().count();
    let mut scored: Vec<(usize, &str)> = lexicon
        .stems_near(len, MAX_FALLBACK_DISTANCE)
        .filter_map(|stem| {
            let distance = strsim::damerau_levenshtein(word, &stem.to_lowercase());
            (distance <= MAX_FALLBACK_DISTANCE).then_some((distance, stem))
        })
        .collect();
    scored.sort_unstable();
    scored.into_iter().map(|(_, stem)| stem.to_string()).collect()
}
