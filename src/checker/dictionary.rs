use crate::checker::affix::{AffixFile, Flag, ParseError};
use crate::checker::suggestions::{self, ScanBudget};
use crate::error::{Error, Result, Unavailable};
use crate::Config;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Upper bound on the suggestions the lexicon itself produces.
pub const MAX_SUGGESTIONS: usize = 15;

static SHARED: OnceCell<Arc<Lexicon>> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("affix file {0}")]
    Affix(ParseError),
    #[error("word list {0}")]
    Words(ParseError),
}

/// The `.aff`/`.dic` pair for one candidate location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryPaths {
    pub aff: PathBuf,
    pub dic: PathBuf,
}

impl DictionaryPaths {
    pub fn exists(&self) -> bool {
        self.aff.is_file() && self.dic.is_file()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LexiconInfo {
    pub language: String,
    pub stems: usize,
    pub prefixes: usize,
    pub suffixes: usize,
    pub replacements: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Casing {
    Lower,
    Capitalized,
    AllUpper,
    Mixed,
}

impl Casing {
    pub(crate) fn of(word: &str) -> Self {
        let mut letters = word.chars().filter(|c| c.is_alphabetic());
        let Some(first) = letters.next() else {
            return Casing::Lower;
        };
        let rest: Vec<char> = letters.collect();
        let rest_upper = rest.iter().filter(|c| c.is_uppercase()).count();

        match (first.is_uppercase(), rest_upper) {
            (false, 0) => Casing::Lower,
            (true, 0) => Casing::Capitalized,
            (true, n) if n == rest.len() => Casing::AllUpper,
            _ => Casing::Mixed,
        }
    }

    /// Re-cases a lowercase candidate to follow this casing.
    pub(crate) fn apply(self, word: &str) -> String {
        match self {
            Casing::Capitalized => capitalize(word),
            Casing::AllUpper => word.to_uppercase(),
            Casing::Lower | Casing::Mixed => word.to_string(),
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

enum Lookup<'a> {
    Missing,
    Forbidden,
    Found(&'a [Flag]),
}

/// An affix-compressed dictionary. Immutable once built, so a single instance
/// can serve any number of concurrent checks.
#[derive(Debug)]
pub struct Lexicon {
    language: String,
    affixes: AffixFile,
    words: HashMap<String, Vec<Vec<Flag>>>,
    prefix_index: HashMap<String, Vec<usize>>,
    suffix_index: HashMap<String, Vec<usize>>,
    /// Suggestible stems grouped by length in chars.
    stems_by_len: Vec<Vec<String>>,
}

impl Lexicon {
    /// Build a lexicon from the text of an affix file and a word list.
    pub fn parse(language: &str, aff: &str, dic: &str) -> std::result::Result<Self, LexiconError> {
        let affixes = AffixFile::parse(aff).map_err(LexiconError::Affix)?;
        let words = parse_word_list(&affixes, dic).map_err(LexiconError::Words)?;

        let mut prefix_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in affixes.prefixes.iter().enumerate() {
            prefix_index.entry(rule.append.clone()).or_default().push(i);
        }
        let mut suffix_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in affixes.suffixes.iter().enumerate() {
            suffix_index.entry(rule.append.clone()).or_default().push(i);
        }

        let mut lexicon = Self {
            language: language.to_string(),
            affixes,
            words,
            prefix_index,
            suffix_index,
            stems_by_len: Vec::new(),
        };
        lexicon.index_stems();
        Ok(lexicon)
    }

    /// The process-wide lexicon. The first successful load is kept for the
    /// lifetime of the process; later calls ignore `config`. A failed load is
    /// not cached, so the next call tries again.
    pub fn shared(config: &Config) -> Result<Arc<Lexicon>> {
        Self::cached_in(&SHARED, config)
    }

    fn cached_in(cell: &OnceCell<Arc<Lexicon>>, config: &Config) -> Result<Arc<Lexicon>> {
        if let Some(lexicon) = cell.get() {
            return Ok(Arc::clone(lexicon));
        }
        cell.get_or_try_init(|| Lexicon::load(config).map(Arc::new))
            .map(Arc::clone)
    }

    /// Locate, read and parse the lexicon for `config.language`, bypassing the cache.
    pub fn load(config: &Config) -> Result<Self> {
        let start = Instant::now();
        let paths = locate(config)?;
        log::debug!(
            "Loading dictionary from {} and {}",
            paths.aff.display(),
            paths.dic.display()
        );

        let unavailable = |reason| Error::DictionaryUnavailable {
            language: config.language.clone(),
            reason,
        };
        let aff = read_decoded(&paths.aff).map_err(unavailable)?;
        let dic = read_decoded(&paths.dic).map_err(unavailable)?;

        let mut lexicon = Self::parse(&config.language, &aff, &dic).map_err(|err| {
            let (path, source) = match err {
                LexiconError::Affix(e) => (paths.aff.clone(), e),
                LexiconError::Words(e) => (paths.dic.clone(), e),
            };
            unavailable(Unavailable::Malformed {
                path,
                line: source.line,
                message: source.message,
            })
        })?;

        if let Some(personal) = &config.personal_dictionary {
            let added = lexicon.add_personal_words(personal);
            log::debug!("Added {} personal words from {}", added, personal.display());
        }

        log::info!(
            "Loaded dictionary '{}' ({} stems) in {:?}",
            config.language,
            lexicon.words.len(),
            start.elapsed()
        );
        Ok(lexicon)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn info(&self) -> LexiconInfo {
        LexiconInfo {
            language: self.language.clone(),
            stems: self.words.len(),
            prefixes: self.affixes.prefixes.len(),
            suffixes: self.affixes.suffixes.len(),
            replacements: self.affixes.replacements.len(),
        }
    }

    /// Check if a word is accepted, either as-is or through the usual casing
    /// relaxations (sentence-initial capital, all caps).
    pub fn is_known(&self, word: &str) -> bool {
        self.find(word).is_some()
    }

    /// Ordered correction candidates for `word`, at most [`MAX_SUGGESTIONS`].
    pub fn suggest(&self, word: &str) -> Vec<String> {
        self.suggest_within(word, &mut ScanBudget::new(1))
    }

    /// Like [`Lexicon::suggest`], but the fallback stem scan only runs while
    /// `budget` has scans left. One budget is shared by every word of a check.
    pub fn suggest_within(&self, word: &str, budget: &mut ScanBudget) -> Vec<String> {
        suggestions::generate(word, self, MAX_SUGGESTIONS, budget)
    }

    pub(crate) fn affixes(&self) -> &AffixFile {
        &self.affixes
    }

    /// Known and not marked NOSUGGEST.
    pub(crate) fn is_suggestible(&self, word: &str) -> bool {
        match self.find(word) {
            Some(flags) => !self.has(flags, self.affixes.no_suggest),
            None => false,
        }
    }

    /// Suggestible stems whose length in chars is within `spread` of `len`.
    pub(crate) fn stems_near(&self, len: usize, spread: usize) -> impl Iterator<Item = &str> + '_ {
        let lo = len.saturating_sub(spread);
        let hi = (len + spread + 1).min(self.stems_by_len.len());
        self.stems_by_len
            .get(lo..hi)
            .unwrap_or_default()
            .iter()
            .flatten()
            .map(String::as_str)
    }

    fn index_stems(&mut self) {
        let mut buckets: Vec<Vec<String>> = Vec::new();
        for (word, homonyms) in &self.words {
            let usable = homonyms.iter().any(|flags| {
                !self.has(flags, self.affixes.need_affix)
                    && !self.has(flags, self.affixes.forbidden)
                    && !self.has(flags, self.affixes.no_suggest)
            });
            if !usable {
                continue;
            }
            let len = word.chars().count();
            if buckets.len() <= len {
                buckets.resize_with(len + 1, Vec::new);
            }
            buckets[len].push(word.clone());
        }
        for bucket in &mut buckets {
            bucket.sort_unstable();
        }
        self.stems_by_len = buckets;
    }

    fn find(&self, word: &str) -> Option<&[Flag]> {
        if word.is_empty() {
            return None;
        }
        match self.lookup(word) {
            Lookup::Found(flags) => return Some(flags),
            Lookup::Forbidden => return None,
            Lookup::Missing => {}
        }

        let lower = word.to_lowercase();
        let variants = match Casing::of(word) {
            Casing::Capitalized => vec![lower],
            Casing::AllUpper => vec![capitalize(&lower), lower],
            Casing::Lower | Casing::Mixed => Vec::new(),
        };
        variants.iter().find_map(|variant| match self.lookup(variant) {
            Lookup::Found(flags) if !self.has(flags, self.affixes.keep_case) => Some(flags),
            _ => None,
        })
    }

    fn lookup(&self, word: &str) -> Lookup<'_> {
        if let Some(homonyms) = self.words.get(word) {
            if homonyms.iter().any(|f| self.has(f, self.affixes.forbidden)) {
                return Lookup::Forbidden;
            }
            if let Some(flags) = homonyms
                .iter()
                .find(|f| !self.has(f, self.affixes.need_affix))
            {
                return Lookup::Found(flags);
            }
        }

        if let Some(flags) = self.strip_suffix(word, None) {
            return Lookup::Found(flags);
        }
        if let Some(flags) = self.strip_prefix(word) {
            return Lookup::Found(flags);
        }
        Lookup::Missing
    }

    /// Matches `word` as stem + suffix. With `prefix_flag`, the stem must also
    /// carry that flag and the suffix must allow cross products.
    fn strip_suffix(&self, word: &str, prefix_flag: Option<Flag>) -> Option<&[Flag]> {
        for (split, _) in word.char_indices().skip(1).chain([(word.len(), ' ')]) {
            let Some(rules) = self.suffix_index.get(&word[split..]) else {
                continue;
            };
            for &i in rules {
                let rule = &self.affixes.suffixes[i];
                if prefix_flag.is_some() && !rule.cross_product {
                    continue;
                }
                let stem = format!("{}{}", &word[..split], rule.strip);
                if !rule.condition.matches_end(&stem) {
                    continue;
                }
                if let Some(flags) = self.stem_with(&stem, rule.flag, prefix_flag) {
                    return Some(flags);
                }
            }
        }
        None
    }

    fn strip_prefix(&self, word: &str) -> Option<&[Flag]> {
        for (split, _) in word.char_indices().skip(1).chain([(word.len(), ' ')]) {
            let Some(rules) = self.prefix_index.get(&word[..split]) else {
                continue;
            };
            for &i in rules {
                let rule = &self.affixes.prefixes[i];
                let stem = format!("{}{}", rule.strip, &word[split..]);
                if !rule.condition.matches_start(&stem) {
                    continue;
                }
                if let Some(flags) = self.stem_with(&stem, rule.flag, None) {
                    return Some(flags);
                }
                if rule.cross_product {
                    if let Some(flags) = self.strip_suffix(&stem, Some(rule.flag)) {
                        return Some(flags);
                    }
                }
            }
        }
        // Prefixes that append nothing only apply through their strip.
        if let Some(rules) = self.prefix_index.get("") {
            for &i in rules {
                let rule = &self.affixes.prefixes[i];
                let stem = format!("{}{}", rule.strip, word);
                if rule.condition.matches_start(&stem) {
                    if let Some(flags) = self.stem_with(&stem, rule.flag, None) {
                        return Some(flags);
                    }
                }
            }
        }
        None
    }

    fn stem_with(&self, stem: &str, flag: Flag, also: Option<Flag>) -> Option<&[Flag]> {
        if stem.is_empty() {
            return None;
        }
        self.words.get(stem)?.iter().find_map(|flags| {
            let ok = flags.binary_search(&flag).is_ok()
                && also.map_or(true, |f| flags.binary_search(&f).is_ok())
                && !self.has(flags, self.affixes.forbidden);
            ok.then_some(flags.as_slice())
        })
    }

    fn has(&self, flags: &[Flag], flag: Option<Flag>) -> bool {
        flag.is_some_and(|f| flags.binary_search(&f).is_ok())
    }

    /// Adds one word per line as plain stems; `#` starts a comment line.
    /// Returns how many words were added. A missing file adds nothing.
    pub fn add_personal_words(&mut self, path: &Path) -> usize {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Failed to read personal dictionary {}: {}",
                        path.display(),
                        err
                    );
                }
                return 0;
            }
        };
        let mut added = 0;
        for line in content.lines() {
            let word = line.trim();
            if !word.is_empty() && !word.starts_with('#') {
                self.words.entry(word.to_string()).or_default().push(Vec::new());
                added += 1;
            }
        }
        if added > 0 {
            self.index_stems();
        }
        added
    }
}

fn parse_word_list(
    affixes: &AffixFile,
    dic: &str,
) -> std::result::Result<HashMap<String, Vec<Vec<Flag>>>, ParseError> {
    let mut words: HashMap<String, Vec<Vec<Flag>>> = HashMap::new();
    let mut first = true;

    for (i, line) in dic.lines().enumerate() {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }
        if std::mem::take(&mut first) && line.parse::<usize>().is_ok() {
            continue;
        }

        let entry = line.split(['\t', ' ']).next().unwrap_or_default();
        let (word, raw_flags) = split_entry(entry);
        if word.is_empty() {
            continue;
        }
        let flags = match raw_flags {
            Some(raw) => affixes
                .resolve_flags(raw)
                .map_err(|message| ParseError::new(i + 1, message))?,
            None => Vec::new(),
        };
        words.entry(word).or_default().push(flags);
    }

    Ok(words)
}

/// Splits `word/flags` on the first unescaped slash.
fn split_entry(entry: &str) -> (String, Option<&str>) {
    let mut word = String::with_capacity(entry.len());
    let mut escaped = false;
    for (i, ch) in entry.char_indices() {
        match ch {
            '\\' if !escaped => escaped = true,
            '/' if !escaped && i > 0 => return (word, Some(&entry[i + 1..])),
            _ => {
                word.push(ch);
                escaped = false;
            }
        }
    }
    (word, None)
}

/// Every location searched for `config.language`, in order: flat
/// `<dir>/<lang>.aff` then nested `<dir>/<lang>/<lang>.aff` for each base dir.
pub fn candidate_paths(config: &Config) -> Vec<DictionaryPaths> {
    let lang = &config.language;
    config
        .dictionary_dirs
        .iter()
        .flat_map(|dir| {
            let nested = dir.join(lang);
            [
                DictionaryPaths {
                    aff: dir.join(format!("{}.aff", lang)),
                    dic: dir.join(format!("{}.dic", lang)),
                },
                DictionaryPaths {
                    aff: nested.join(format!("{}.aff", lang)),
                    dic: nested.join(format!("{}.dic", lang)),
                },
            ]
        })
        .collect()
}

/// First candidate location holding both files.
pub fn locate(config: &Config) -> Result<DictionaryPaths> {
    let candidates = candidate_paths(config);
    if let Some(found) = candidates.iter().find(|paths| paths.exists()) {
        return Ok(found.clone());
    }
    Err(Error::DictionaryUnavailable {
        language: config.language.clone(),
        reason: Unavailable::NotFound {
            searched: candidates.into_iter().map(|paths| paths.aff).collect(),
        },
    })
}

/// Reads a dictionary file as UTF-8, falling back to ISO-8859-1.
fn read_decoded(path: &Path) -> std::result::Result<String, Unavailable> {
    let bytes = fs::read(path).map_err(|source| Unavailable::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::tempdir;

    pub(crate) const FIXTURE_AFF: &str = include_str!("../../tests/fixtures/en_US.aff");
    pub(crate) const FIXTURE_DIC: &str = include_str!("../../tests/fixtures/en_US.dic");

    pub(crate) fn fixture() -> Lexicon {
        Lexicon::parse("en_US", FIXTURE_AFF, FIXTURE_DIC).unwrap()
    }

    fn config_for(dir: &Path) -> Config {
        Config {
            dictionary_dirs: vec![dir.to_path_buf()],
            ..Default::default()
        }
    }

    #[test]
    fn test_stems_and_affixed_forms() {
        let lex = fixture();
        assert!(lex.is_known("hello"));
        assert!(lex.is_known("tests"));
        assert!(lex.is_known("tested"));
        assert!(lex.is_known("testing"));
        assert!(lex.is_known("tried"));
        assert!(lex.is_known("tries"));
        assert!(lex.is_known("making"));
        assert!(lex.is_known("foxes"));
        assert!(lex.is_known("quickly"));
        assert!(!lex.is_known("tryed"));
        assert!(!lex.is_known("makeing"));
        assert!(!lex.is_known("helllo"));
    }

    #[test]
    fn test_prefix_and_cross_product() {
        let lex = fixture();
        assert!(lex.is_known("unhappy"));
        assert!(lex.is_known("happier"));
        assert!(lex.is_known("unhappier"));
        assert!(lex.is_known("reread"));
        assert!(lex.is_known("rereads"));
        assert!(!lex.is_known("unread"));
    }

    #[test]
    fn test_casing_relaxation() {
        let lex = fixture();
        assert!(lex.is_known("Hello"));
        assert!(lex.is_known("HELLO"));
        assert!(lex.is_known("Paris"));
        assert!(lex.is_known("PARIS"));
        assert!(!lex.is_known("paris"));
        assert!(!lex.is_known("hELLO"));
        assert!(lex.is_known("I"));
        assert!(!lex.is_known("i"));
    }

    #[test]
    fn test_special_flags() {
        let lex = fixture();
        // NEEDAFFIX: the bare stem is not a word
        assert!(!lex.is_known("scissor"));
        assert!(lex.is_known("scissors"));
        // FORBIDDENWORD
        assert!(!lex.is_known("alot"));
        assert!(!lex.is_known("Alot"));
        // KEEPCASE
        assert!(lex.is_known("km"));
        assert!(!lex.is_known("Km"));
        assert!(!lex.is_known("KM"));
        // NOSUGGEST words are still correct
        assert!(lex.is_known("dang"));
        assert!(!lex.is_suggestible("dang"));
    }

    #[test]
    fn test_empty_and_odd_input() {
        let lex = fixture();
        assert!(!lex.is_known(""));
        assert!(!lex.is_known("123"));
        assert!(lex.suggest("").is_empty());
    }

    #[test]
    fn test_word_list_details() {
        let aff = "FLAG long\nSFX Sx Y 1\nSFX Sx 0 s .\n";
        let dic = "3\nand/or\ncat/Sx\tpo:noun\nhalf\\/way\n";
        let lex = Lexicon::parse("xx", aff, dic).unwrap();
        assert!(lex.is_known("cats"));
        assert!(lex.is_known("half/way"));
        assert!(lex.is_known("and"));
        assert!(!lex.is_known("and/or"));

        let err = Lexicon::parse("xx", aff, "1\ncat/S\n").unwrap_err();
        assert!(matches!(err, LexiconError::Words(ParseError { line: 2, .. })));
    }

    #[test]
    fn test_casing_classification() {
        assert_eq!(Casing::of("hello"), Casing::Lower);
        assert_eq!(Casing::of("Hello"), Casing::Capitalized);
        assert_eq!(Casing::of("HELLO"), Casing::AllUpper);
        assert_eq!(Casing::of("hELLO"), Casing::Mixed);
        assert_eq!(Casing::of("O'Connor"), Casing::Mixed);
        assert_eq!(Casing::of("I"), Casing::Capitalized);
        assert_eq!(Casing::AllUpper.apply("hello"), "HELLO");
        assert_eq!(Casing::Capitalized.apply("a lot"), "A lot");
    }

    #[test]
    fn test_locate_flat_then_nested() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path());

        let nested = dir.path().join("en_US");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(nested.join("en_US.dic"), FIXTURE_DIC).unwrap();
        assert_eq!(locate(&config).unwrap().aff, nested.join("en_US.aff"));

        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();
        assert_eq!(locate(&config).unwrap().aff, dir.path().join("en_US.aff"));
    }

    #[test]
    fn test_locate_requires_both_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();

        let err = locate(&config_for(dir.path())).unwrap_err();
        match err {
            Error::DictionaryUnavailable {
                reason: Unavailable::NotFound { searched },
                ..
            } => assert_eq!(searched.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_with_personal_words() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();
        let personal = dir.path().join("personal.txt");
        fs::write(&personal, "# project words\nrustacean\n\nserde\n").unwrap();

        let config = Config {
            personal_dictionary: Some(personal),
            ..config_for(dir.path())
        };
        let lex = Lexicon::load(&config).unwrap();
        assert!(lex.is_known("rustacean"));
        assert!(lex.is_known("serde"));
        assert!(lex.is_known("hello"));
    }

    #[test]
    fn test_shared_lexicon_is_loaded_once() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();
        let config = config_for(dir.path());

        let first = Lexicon::shared(&config).unwrap();
        let second = Lexicon::shared(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_callers_share_one_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();
        let config = config_for(dir.path());
        let cell = OnceCell::new();
        let (shared, config) = (&cell, &config);

        let loaded: Vec<Arc<Lexicon>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || Lexicon::cached_in(shared, config).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let cached = cell.get().unwrap();
        assert!(loaded.iter().all(|lexicon| Arc::ptr_eq(lexicon, cached)));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path());
        let cell = OnceCell::new();

        assert!(Lexicon::cached_in(&cell, &config).is_err());
        assert!(cell.get().is_none());

        fs::write(dir.path().join("en_US.aff"), FIXTURE_AFF).unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();
        let lexicon = Lexicon::cached_in(&cell, &config).unwrap();
        assert!(lexicon.is_known("hello"));
        assert!(Arc::ptr_eq(&lexicon, cell.get().unwrap()));
    }

    #[test]
    fn test_load_malformed_affix_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("en_US.aff"), "SFX S Y many\n").unwrap();
        fs::write(dir.path().join("en_US.dic"), FIXTURE_DIC).unwrap();

        let err = Lexicon::load(&config_for(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            Error::DictionaryUnavailable {
                reason: Unavailable::Malformed { line: 1, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_latin1_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.dic");
        fs::write(&path, [b'1', b'\n', b'c', b'a', b'f', 0xE9, b'\n']).unwrap();
        assert_eq!(read_decoded(&path).unwrap(), "1\ncafé\n");
    }
}
