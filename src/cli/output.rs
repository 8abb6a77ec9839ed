use crate::checker::corrections::{locate, Occurrence};
use crate::checker::dictionary::LexiconInfo;
use crate::{CheckReport, CheckStatistics, SpellingError};
use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// Characters of context shown on each side of a misspelling.
const CONTEXT_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    source: &'a str,
    errors: &'a [SpellingError],
    occurrences: Vec<Occurrence>,
    stats: CheckStatistics,
}

/// What the user picked at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Skip,
    Replace(String),
    Quit,
}

pub fn print_report(source: &str, text: &str, report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print_text_report(source, text, report);
            Ok(())
        }
        OutputFormat::Json => print_json_report(source, text, report),
    }
}

fn print_text_report(source: &str, text: &str, report: &CheckReport) {
    if report.errors.is_empty() {
        return;
    }

    println!("\n{}", source.bold().underline());

    for occurrence in locate(text, &report.errors) {
        let line_info = format!("{}:{}", occurrence.line, occurrence.column);
        println!(
            "  {} {} {}",
            line_info.blue().bold(),
            occurrence.word.red().bold(),
            get_context(text, &occurrence).dimmed()
        );

        let suggestions = report
            .errors
            .iter()
            .find(|e| e.word == occurrence.word)
            .map(|e| e.suggestions.as_slice())
            .unwrap_or_default();
        if !suggestions.is_empty() {
            let suggestions = suggestions
                .iter()
                .map(|s| s.green().to_string())
                .collect::<Vec<_>>()
                .join(&", ".dimmed().to_string());
            println!("    {} {}", "→".dimmed(), suggestions);
        }
    }

    let stats = &report.stats;
    println!(
        "  {}",
        format!(
            "{} characters, {} words, {} sentences",
            stats.character_count, stats.word_count, stats.sentence_count
        )
        .dimmed()
    );
}

fn print_json_report(source: &str, text: &str, report: &CheckReport) -> Result<()> {
    let output = JsonReport {
        source,
        errors: &report.errors,
        occurrences: locate(text, &report.errors),
        stats: report.stats,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// The line holding `occurrence`, trimmed to a window around the word.
pub fn get_context(text: &str, occurrence: &Occurrence) -> String {
    let line_start = text[..occurrence.offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[occurrence.offset..]
        .find('\n')
        .map_or(text.len(), |i| occurrence.offset + i);
    let line = text[line_start..line_end].trim_end_matches('\r');

    let chars: Vec<char> = line.chars().collect();
    let word_start = occurrence.column - 1;
    let word_end = word_start + occurrence.word.chars().count();
    let start = word_start.saturating_sub(CONTEXT_CHARS);
    let end = (word_end + CONTEXT_CHARS).min(chars.len());
    let context: String = chars[start..end].iter().collect();

    match (start > 0, end < chars.len()) {
        (true, true) => format!("...{}...", context),
        (true, false) => format!("...{}", context),
        (false, true) => format!("{}...", context),
        (false, false) => context,
    }
}

pub fn print_check_summary(total_errors: usize, sources: usize) {
    println!();
    if total_errors == 0 {
        println!("{}", "✓ No spelling errors found!".green().bold());
    } else {
        let error_word = if total_errors == 1 { "error" } else { "errors" };
        println!(
            "{} {} {} found in {} {}",
            "✗".red().bold(),
            total_errors.to_string().red().bold(),
            error_word,
            sources,
            if sources == 1 { "input" } else { "inputs" }
        );
    }
}

pub fn print_fix_summary(total_fixed: usize, sources: usize) {
    println!();
    if total_fixed == 0 {
        println!("{}", "No corrections needed!".green().bold());
    } else {
        let fix_word = if total_fixed == 1 { "correction" } else { "corrections" };
        println!(
            "{} {} {} applied to {} {}",
            "✓".green().bold(),
            total_fixed.to_string().green().bold(),
            fix_word,
            sources,
            if sources == 1 { "file" } else { "files" }
        );
    }
}

pub fn print_dictionary_info(info: &LexiconInfo, aff: &str, dic: &str) {
    println!("{} {}", "Dictionary:".bold(), info.language.cyan().bold());
    println!("  Affix file:   {}", aff);
    println!("  Word list:    {}", dic);
    println!("  Stems:        {}", info.stems);
    println!("  Prefix rules: {}", info.prefixes);
    println!("  Suffix rules: {}", info.suffixes);
    println!("  Replacements: {}", info.replacements);
}

pub fn print_interactive_prompt(
    occurrence: &Occurrence,
    suggestions: &[String],
    context: &str,
) -> Result<Choice> {
    println!(
        "\n{} {}:{}",
        "Misspelling found:".yellow().bold(),
        occurrence.line.to_string().blue(),
        occurrence.column.to_string().blue()
    );
    println!(
        "  {}",
        context.replace(&occurrence.word, &occurrence.word.red().bold().to_string())
    );
    println!("\n{}", "Suggestions:".cyan().bold());

    println!("  [s] Skip");
    for (i, suggestion) in suggestions.iter().take(9).enumerate() {
        println!("  [{}] {}", i + 1, suggestion.green());
    }
    println!("  [q] Quit");

    print!("\nChoice: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(parse_choice(input.trim(), suggestions))
}

fn parse_choice(input: &str, suggestions: &[String]) -> Choice {
    match input {
        "q" | "Q" => Choice::Quit,
        num => match num.parse::<usize>() {
            Ok(idx) if idx > 0 && idx <= suggestions.len().min(9) => {
                Choice::Replace(suggestions[idx - 1].clone())
            }
            _ => Choice::Skip,
        },
    }
}
