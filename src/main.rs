use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use colored::*;
use log::LevelFilter;
use spellcheck::checker::corrections;
use spellcheck::checker::dictionary::{self, Lexicon};
use spellcheck::cli::output::{self, Choice, OutputFormat};
use spellcheck::service::{self, Status};
use spellcheck::{Config, SpellChecker};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "spellcheck")]
#[command(version, about = "Spell-check text against a Hunspell dictionary", long_about = None)]
struct Cli {
    /// Files to check; reads stdin when none are given or for "-"
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Replace misspellings in place with their top suggestion
    #[arg(short, long)]
    fix: bool,

    /// Pick each correction interactively
    #[arg(short, long, requires = "fix")]
    interactive: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Dictionary language (e.g., en_US, en_GB)
    #[arg(short, long, env = "SPELLCHECK_LANGUAGE")]
    language: Option<String>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Directory holding <lang>.aff/<lang>.dic, searched before the configured ones
    #[arg(long = "dict-dir", value_name = "DIR")]
    dict_dirs: Vec<PathBuf>,

    /// Personal dictionary file (one word per line)
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Answer a JSON request `{"text": "..."}` read from stdin
    Request,
    /// Dictionary inspection
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// Show the dictionary that would be used
    Info,
    /// List every location searched for the dictionary
    Paths,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Handle shell completion generation
    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellcheck", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(
        cli.language.clone(),
        cli.dict_dirs.clone(),
        cli.personal_dict.clone(),
    )?;

    if let Some(command) = cli.command {
        return handle_command(command, &config);
    }

    let checker = SpellChecker::new(&config)?;

    let sources = if cli.files.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        cli.files.clone()
    };

    let mut total_errors = 0;
    let mut total_fixed = 0;

    for path in &sources {
        let from_stdin = path.as_os_str() == "-";
        if cli.fix && from_stdin {
            anyhow::bail!("--fix needs file arguments");
        }
        if !from_stdin && !path.exists() {
            eprintln!("Error: File not found: {}", path.display());
            continue;
        }

        if cli.fix {
            total_fixed += if cli.interactive {
                fix_interactive(&checker, path)?
            } else {
                checker.fix_file(path)?.1
            };
            continue;
        }

        let (name, text) = if from_stdin {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            ("<stdin>".to_string(), text)
        } else {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            (path.display().to_string(), text)
        };

        let report = checker.check(&text);
        output::print_report(&name, &text, &report, cli.format)?;
        total_errors += report.errors.len();
    }

    if cli.format == OutputFormat::Text {
        if cli.fix {
            output::print_fix_summary(total_fixed, sources.len());
        } else {
            output::print_check_summary(total_errors, sources.len());
        }
    }

    if total_errors > 0 && !cli.no_fail && !cli.fix {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}

fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Request => {
            let mut body = String::new();
            io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;

            let (status, response) = service::respond(&body, config);
            println!("{}", serde_json::to_string(&response)?);
            log::info!("Request answered with status {}", status.code());

            match status {
                Status::Ok => {}
                Status::BadRequest => std::process::exit(2),
                Status::InternalError => std::process::exit(3),
            }
        }
        Commands::Dict { action } => match action {
            DictCommands::Info => {
                let paths = dictionary::locate(config)?;
                let lexicon = Lexicon::load(config)?;
                output::print_dictionary_info(
                    &lexicon.info(),
                    &paths.aff.display().to_string(),
                    &paths.dic.display().to_string(),
                );
            }
            DictCommands::Paths => {
                for candidate in dictionary::candidate_paths(config) {
                    let marker = if candidate.exists() {
                        "✓".green()
                    } else {
                        "✗".dimmed()
                    };
                    println!("  {} {}", marker, candidate.aff.display());
                    println!("    {}", candidate.dic.display());
                }
            }
        },
    }
    Ok(())
}

fn fix_interactive(checker: &SpellChecker, path: &Path) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let report = checker.check(&content);

    let mut text = content.clone();
    let mut fixed = 0;

    for error in &report.errors {
        let Some(first) = corrections::locate(&content, std::slice::from_ref(error))
            .into_iter()
            .next()
        else {
            continue;
        };
        let context = output::get_context(&content, &first);

        match output::print_interactive_prompt(&first, &error.suggestions, &context)? {
            Choice::Skip => {}
            Choice::Replace(replacement) => {
                let corrected = corrections::replace_word(&text, &error.word, &replacement);
                text = corrected.text;
                fixed += corrected.replaced;
            }
            Choice::Quit => break,
        }
    }

    if fixed > 0 {
        fs::write(path, &text)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
    }

    Ok(fixed)
}
