//! Parser for Hunspell-style `.aff` files.
//!
//! Only the directives that affect membership and suggestions are kept;
//! compounding, morphology and conversion tables are skipped.

use std::collections::HashMap;
use thiserror::Error;

pub type Flag = u32;

pub const DEFAULT_TRY: &str = "esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ'";
pub const DEFAULT_KEY: &str = "qwertyuiop|asdfghjkl|zxcvbnm";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// How flag strings are encoded, set by the `FLAG` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagMode {
    #[default]
    Short,
    Long,
    Numeric,
    Utf8,
}

impl FlagMode {
    fn from_directive(value: &str) -> Option<Self> {
        match value {
            "long" => Some(FlagMode::Long),
            "num" => Some(FlagMode::Numeric),
            "UTF-8" => Some(FlagMode::Utf8),
            _ => None,
        }
    }

    pub fn parse_flags(self, raw: &str) -> Result<Vec<Flag>, String> {
        let mut flags = match self {
            FlagMode::Short | FlagMode::Utf8 => raw.chars().map(|c| c as Flag).collect::<Vec<_>>(),
            FlagMode::Long => {
                let chars: Vec<char> = raw.chars().collect();
                if chars.len() % 2 != 0 {
                    return Err(format!("odd number of characters in long flags '{}'", raw));
                }
                chars
                    .chunks(2)
                    .map(|pair| ((pair[0] as Flag) << 16) | pair[1] as Flag)
                    .collect()
            }
            FlagMode::Numeric => raw
                .split(',')
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.trim()
                        .parse::<Flag>()
                        .map_err(|_| format!("invalid numeric flag '{}'", part))
                })
                .collect::<Result<Vec<_>, _>>()?,
        };
        flags.sort_unstable();
        flags.dedup();
        Ok(flags)
    }

    fn parse_single(self, raw: &str) -> Result<Flag, String> {
        let flags = self.parse_flags(raw)?;
        match flags.as_slice() {
            [flag] => Ok(*flag),
            _ => Err(format!("expected a single flag, got '{}'", raw)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CondUnit {
    Any,
    Char(char),
    Class { chars: Vec<char>, negated: bool },
}

impl CondUnit {
    fn matches(&self, ch: char) -> bool {
        match self {
            CondUnit::Any => true,
            CondUnit::Char(c) => *c == ch,
            CondUnit::Class { chars, negated } => chars.contains(&ch) != *negated,
        }
    }
}

/// An affix condition such as `[^aeiou]y`, matched against the start of the
/// stem for prefixes and against its end for suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    units: Vec<CondUnit>,
}

impl Condition {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut units = Vec::new();
        let mut chars = raw.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => units.push(CondUnit::Any),
                '[' => {
                    let mut class = Vec::new();
                    let mut negated = false;
                    let mut closed = false;
                    for (i, c) in chars.by_ref().enumerate() {
                        match c {
                            '^' if i == 0 => negated = true,
                            ']' => {
                                closed = true;
                                break;
                            }
                            _ => class.push(c),
                        }
                    }
                    if !closed {
                        return Err(format!("unterminated character class in condition '{}'", raw));
                    }
                    units.push(CondUnit::Class {
                        chars: class,
                        negated,
                    });
                }
                _ => units.push(CondUnit::Char(ch)),
            }
        }

        if units.iter().all(|u| *u == CondUnit::Any) && units.len() <= 1 {
            units.clear();
        }
        Ok(Self { units })
    }

    pub fn matches_start(&self, stem: &str) -> bool {
        let mut chars = stem.chars();
        self.units
            .iter()
            .all(|unit| chars.next().is_some_and(|c| unit.matches(c)))
    }

    pub fn matches_end(&self, stem: &str) -> bool {
        let mut chars = stem.chars().rev();
        self.units
            .iter()
            .rev()
            .all(|unit| chars.next().is_some_and(|c| unit.matches(c)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone)]
pub struct AffixRule {
    pub flag: Flag,
    pub kind: AffixKind,
    pub cross_product: bool,
    pub strip: String,
    pub append: String,
    pub condition: Condition,
}

#[derive(Debug, Clone)]
pub struct AffixFile {
    pub flag_mode: FlagMode,
    pub encoding: Option<String>,
    pub try_chars: String,
    pub keyboard: String,
    pub replacements: Vec<(String, String)>,
    pub aliases: Vec<Vec<Flag>>,
    pub prefixes: Vec<AffixRule>,
    pub suffixes: Vec<AffixRule>,
    pub need_affix: Option<Flag>,
    pub forbidden: Option<Flag>,
    pub no_suggest: Option<Flag>,
    pub keep_case: Option<Flag>,
}

impl Default for AffixFile {
    fn default() -> Self {
        Self {
            flag_mode: FlagMode::Short,
            encoding: None,
            try_chars: DEFAULT_TRY.to_string(),
            keyboard: DEFAULT_KEY.to_string(),
            replacements: Vec::new(),
            aliases: Vec::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            need_affix: None,
            forbidden: None,
            no_suggest: None,
            keep_case: None,
        }
    }
}

/// Remaining entry lines for a table directive (`REP`, `AF`, `PFX x`, `SFX x`).
#[derive(Default)]
struct Pending {
    tables: HashMap<String, usize>,
    cross_product: HashMap<String, bool>,
}

impl Pending {
    fn take(&mut self, key: &str) -> bool {
        match self.tables.get_mut(key) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

impl AffixFile {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut aff = AffixFile::default();

        // FLAG changes how every other flag is read, so it is resolved first.
        for (idx, line) in lines(text) {
            let mut fields = line.split_whitespace();
            if fields.next() == Some("FLAG") {
                let value = fields.next().unwrap_or_default();
                aff.flag_mode = FlagMode::from_directive(value)
                    .ok_or_else(|| ParseError::new(idx, format!("unknown FLAG type '{}'", value)))?;
            }
        }

        let mut pending = Pending::default();
        for (idx, line) in lines(text) {
            let fields: Vec<&str> = line.split_whitespace().collect();
            let Some(&directive) = fields.first() else {
                continue;
            };

            let result = match directive {
                "SET" => {
                    aff.encoding = fields.get(1).map(|s| s.to_string());
                    Ok(())
                }
                "TRY" => {
                    if let Some(chars) = fields.get(1) {
                        aff.try_chars = chars.to_string();
                    }
                    Ok(())
                }
                "KEY" => {
                    if let Some(key) = fields.get(1) {
                        aff.keyboard = key.to_string();
                    }
                    Ok(())
                }
                "NEEDAFFIX" => aff.special_flag(&fields).map(|f| aff.need_affix = Some(f)),
                "FORBIDDENWORD" => aff.special_flag(&fields).map(|f| aff.forbidden = Some(f)),
                "NOSUGGEST" => aff.special_flag(&fields).map(|f| aff.no_suggest = Some(f)),
                "KEEPCASE" => aff.special_flag(&fields).map(|f| aff.keep_case = Some(f)),
                "REP" => aff.parse_rep(&fields, &mut pending),
                "AF" => aff.parse_alias(&fields, &mut pending),
                "PFX" => aff.parse_affix(AffixKind::Prefix, &fields, &mut pending),
                "SFX" => aff.parse_affix(AffixKind::Suffix, &fields, &mut pending),
                _ => Ok(()),
            };
            result.map_err(|message| ParseError::new(idx, message))?;
        }

        Ok(aff)
    }

    /// Resolves a `.dic` flag field, expanding `AF` aliases when present.
    pub fn resolve_flags(&self, raw: &str) -> Result<Vec<Flag>, String> {
        if self.aliases.is_empty() {
            return self.flag_mode.parse_flags(raw);
        }
        let index: usize = raw
            .parse()
            .map_err(|_| format!("expected an AF alias number, got '{}'", raw))?;
        index
            .checked_sub(1)
            .and_then(|i| self.aliases.get(i))
            .cloned()
            .ok_or_else(|| format!("AF alias {} is out of range", index))
    }

    fn special_flag(&self, fields: &[&str]) -> Result<Flag, String> {
        let raw = fields
            .get(1)
            .ok_or_else(|| format!("{} requires a flag", fields[0]))?;
        self.flag_mode.parse_single(raw)
    }

    fn parse_rep(&mut self, fields: &[&str], pending: &mut Pending) -> Result<(), String> {
        if pending.take("REP") {
            match fields {
                [_, from, to, ..] => {
                    self.replacements.push((from.to_string(), to.replace('_', " ")));
                    Ok(())
                }
                _ => Err("REP entry needs a pattern and a replacement".to_string()),
            }
        } else {
            let count = parse_count(fields.get(1))?;
            pending.tables.insert("REP".to_string(), count);
            Ok(())
        }
    }

    fn parse_alias(&mut self, fields: &[&str], pending: &mut Pending) -> Result<(), String> {
        if pending.take("AF") {
            let raw = fields.get(1).copied().unwrap_or_default();
            let flags = self.flag_mode.parse_flags(raw)?;
            self.aliases.push(flags);
        } else {
            let count = parse_count(fields.get(1))?;
            pending.tables.insert("AF".to_string(), count);
        }
        Ok(())
    }

    fn parse_affix(
        &mut self,
        kind: AffixKind,
        fields: &[&str],
        pending: &mut Pending,
    ) -> Result<(), String> {
        let name = fields.get(1).ok_or("affix directive without a flag")?;
        let key = format!("{}:{}", fields[0], name);
        let flag = self.flag_mode.parse_single(name)?;

        if !pending.take(&key) {
            let cross_product = match fields.get(2) {
                Some(&"Y") => true,
                Some(&"N") => false,
                other => {
                    return Err(format!(
                        "expected Y or N for cross product, got '{}'",
                        other.unwrap_or(&"")
                    ))
                }
            };
            let count = parse_count(fields.get(3))?;
            pending.tables.insert(key.clone(), count);
            pending.cross_product.insert(key, cross_product);
            return Ok(());
        }

        let (strip, append) = match (fields.get(2), fields.get(3)) {
            (Some(strip), Some(append)) => (*strip, *append),
            _ => return Err(format!("affix entry for '{}' is missing fields", name)),
        };
        // Continuation flags after '/' are accepted but not applied.
        let append = append.split('/').next().unwrap_or_default();
        let condition = Condition::parse(fields.get(4).copied().unwrap_or("."))?;

        let rule = AffixRule {
            flag,
            kind,
            cross_product: pending.cross_product.get(&key).copied().unwrap_or(false),
            strip: zero_as_empty(strip),
            append: zero_as_empty(append),
            condition,
        };
        match kind {
            AffixKind::Prefix => self.prefixes.push(rule),
            AffixKind::Suffix => self.suffixes.push(rule),
        }
        Ok(())
    }
}

fn zero_as_empty(field: &str) -> String {
    if field == "0" {
        String::new()
    } else {
        field.to_string()
    }
}

fn parse_count(field: Option<&&str>) -> Result<usize, String> {
    let raw = field.ok_or("missing entry count")?;
    raw.parse()
        .map_err(|_| format!("invalid entry count '{}'", raw))
}

/// Non-empty, non-comment lines with their 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().filter_map(|(i, line)| {
        let line = line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() || line.starts_with('#') {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
SET UTF-8
TRY esianrt
KEY qwerty|asdfgh
NOSUGGEST !

REP 2
REP alot a_lot
REP ph f

PFX U Y 1
PFX U   0     un         .

SFX D Y 2
SFX D   y     ied        [^aeiou]y
SFX D   0     ed/X       [^ey]
";

    #[test]
    fn test_parse_directives() {
        let aff = AffixFile::parse(SAMPLE).unwrap();
        assert_eq!(aff.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(aff.try_chars, "esianrt");
        assert_eq!(aff.keyboard, "qwerty|asdfgh");
        assert_eq!(aff.no_suggest, Some('!' as Flag));
        assert_eq!(
            aff.replacements,
            vec![
                ("alot".to_string(), "a lot".to_string()),
                ("ph".to_string(), "f".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_affix_rules() {
        let aff = AffixFile::parse(SAMPLE).unwrap();
        assert_eq!(aff.prefixes.len(), 1);
        assert_eq!(aff.prefixes[0].append, "un");
        assert!(aff.prefixes[0].strip.is_empty());
        assert!(aff.prefixes[0].cross_product);

        assert_eq!(aff.suffixes.len(), 2);
        assert_eq!(aff.suffixes[0].strip, "y");
        assert_eq!(aff.suffixes[0].append, "ied");
        // continuation flags are dropped from the appended text
        assert_eq!(aff.suffixes[1].append, "ed");
        assert_eq!(aff.suffixes[1].flag, 'D' as Flag);
    }

    #[test]
    fn test_conditions() {
        let cond = Condition::parse("[^aeiou]y").unwrap();
        assert!(cond.matches_end("try"));
        assert!(!cond.matches_end("play"));
        assert!(!cond.matches_end("y"));

        let any = Condition::parse(".").unwrap();
        assert!(any.matches_end("x"));
        assert!(any.matches_start("x"));

        let prefix_cond = Condition::parse("[ab]c").unwrap();
        assert!(prefix_cond.matches_start("bcd"));
        assert!(!prefix_cond.matches_start("cbd"));

        assert!(Condition::parse("[abc").is_err());
    }

    #[test]
    fn test_flag_modes() {
        assert_eq!(
            FlagMode::Long.parse_flags("AaBb").unwrap(),
            vec![('A' as Flag) << 16 | 'a' as Flag, ('B' as Flag) << 16 | 'b' as Flag]
        );
        assert_eq!(FlagMode::Numeric.parse_flags("12,7").unwrap(), vec![7, 12]);
        assert!(FlagMode::Long.parse_flags("abc").is_err());
        assert!(FlagMode::Numeric.parse_flags("1,x").is_err());
    }

    #[test]
    fn test_aliases() {
        let aff = AffixFile::parse("AF 2\nAF SD\nAF G\n").unwrap();
        assert_eq!(
            aff.resolve_flags("1").unwrap(),
            vec!['D' as Flag, 'S' as Flag]
        );
        assert_eq!(aff.resolve_flags("2").unwrap(), vec!['G' as Flag]);
        assert!(aff.resolve_flags("3").is_err());
    }

    #[test]
    fn test_bad_header_reports_line() {
        let err = AffixFile::parse("SET UTF-8\nSFX S Q 1\n").unwrap_err();
        assert_eq!(err.line, 2);

        let err = AffixFile::parse("FLAG weird\n").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
