//! lvderiv CLI
//!
//! Command-line entry points for the Latvian derivation experiments:
//! - `regex`: ask a model for sed-style derivation rules and test them
//! - `derive`: ask a model for derivatives directly (zero- or few-shot)
//! - `filter-corpus`: build (word, lemma) pairs from a vertical corpus
//! - `validate` / `apply` / `catalog`: small inspection helpers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lvderiv_corpus::{filter_corpus_file, FrequencyValidator, NoSketchValidator};
use lvderiv_llm::{create_backend, LlmConfig, ModelBackend};
use lvderiv_rules::DerivationRule;
use lvderiv_sweep::{
    derivation_results_path, regex_results_path, rules_table_path, write_derivations,
    write_results, DirectDerivation, RegexSweep, ShotMode, SweepConfig, DERIVATION_RESULTS_DIR,
    EVALUATION_LEMMAS, REGEX_RESULTS_DIR, TRANSFORMATIONS,
};

mod settings;

use settings::{env_lookup, resolve_model, resolve_model_delay, resolve_reasoning};

#[derive(Parser)]
#[command(name = "lvderiv")]
#[command(
    author,
    version,
    about = "Latvian word derivation experiments with large language models"
)]
struct Cli {
    /// Model selector: o3-2025-04-16, gpt-4.1-2025-04-14, gemini-2.5-flash,
    /// claude-3-7-sonnet or mock (env: LVDERIV_MODEL).
    #[arg(long, global = true)]
    model: Option<String>,

    /// Enable reasoning (Gemini and Claude only; env: LVDERIV_REASONING).
    #[arg(long, global = true)]
    reasoning: bool,

    /// Debug logging (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Elicit sed-style rules per transformation category and validate the
    /// candidates they derive.
    Regex {
        #[arg(long, default_value = REGEX_RESULTS_DIR)]
        out_dir: PathBuf,
    },

    /// Ask the model for derivatives of each evaluation lemma directly.
    Derive {
        /// Leave out the worked examples.
        #[arg(long)]
        zero_shot: bool,

        #[arg(long, default_value = DERIVATION_RESULTS_DIR)]
        out_dir: PathBuf,
    },

    /// Turn a vertical corpus export into a (word, lemma) CSV.
    FilterCorpus {
        input: PathBuf,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Look words up in the corpus and print their frequency tier.
    Validate {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Apply one rule line to some lemmas.
    Apply {
        /// Rule in `s#<pattern>#<replacement>#` form.
        rule: String,

        #[arg(required = true)]
        lemmas: Vec<String>,
    },

    /// Print the transformation catalog and the evaluation lemmas.
    Catalog,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Regex { out_dir } => cmd_regex(&cli, out_dir),
        Commands::Derive { zero_shot, out_dir } => {
            cmd_derive(&cli, ShotMode::from_zero_shot(*zero_shot), out_dir)
        }
        Commands::FilterCorpus { input, out } => cmd_filter_corpus(input, out),
        Commands::Validate { words } => cmd_validate(words),
        Commands::Apply { rule, lemmas } => cmd_apply(rule, lemmas),
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve the backend once; credential problems stop the run here.
fn backend(cli: &Cli) -> Result<(Box<dyn ModelBackend>, String)> {
    let kind = resolve_model(cli.model.as_deref(), env_lookup)?;
    let reasoning = resolve_reasoning(cli.reasoning, env_lookup)?;
    let config = LlmConfig::from_env(kind, reasoning)?;
    let label = config.run_label();
    let backend = create_backend(&config)?;
    info!(model = %kind, reasoning, %label, "backend ready");
    Ok((backend, label))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
}

fn wrote(path: &Path) {
    eprintln!("{} {}", "wrote".green().bold(), path.display().to_string().bold());
}

fn cmd_regex(cli: &Cli, out_dir: &Path) -> Result<()> {
    let (backend, label) = backend(cli)?;
    let validator = NoSketchValidator::from_env()?;
    let delay = resolve_model_delay(env_lookup)?;
    ensure_dir(out_dir)?;

    let rules_path = rules_table_path(out_dir, &label);
    let config = SweepConfig::new(rules_path.clone()).with_model_delay(delay);
    let records = RegexSweep::new(backend.as_ref(), &validator, config).run()?;

    let out = regex_results_path(out_dir, &label);
    write_results(&out, &records)?;
    wrote(&rules_path);
    wrote(&out);
    println!("{} {} records", "ok".green().bold(), records.len());
    Ok(())
}

fn cmd_derive(cli: &Cli, mode: ShotMode, out_dir: &Path) -> Result<()> {
    let (backend, label) = backend(cli)?;
    let validator = NoSketchValidator::from_env()?;
    let delay = resolve_model_delay(env_lookup)?;
    ensure_dir(out_dir)?;

    let records = DirectDerivation::new(backend.as_ref(), &validator, mode)
        .with_model_delay(delay)
        .run();

    let out = derivation_results_path(out_dir, &label, mode);
    write_derivations(&out, &records)?;
    wrote(&out);
    println!("{} {} records", "ok".green().bold(), records.len());
    Ok(())
}

fn cmd_filter_corpus(input: &Path, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let kept = filter_corpus_file(input, out)?;
    wrote(out);
    println!("{} {} pairs", "ok".green().bold(), kept);
    Ok(())
}

fn cmd_validate(words: &[String]) -> Result<()> {
    let validator = NoSketchValidator::from_env()?;
    for word in words {
        let result = validator.validate(word);
        let tier = match result.tier.code() {
            "T" => "T".green(),
            "M" => "M".yellow(),
            "F" => "F".red(),
            other => other.red().bold(),
        };
        println!("{word}\t{tier}\t{}", result.frequency_cell());
    }
    Ok(())
}

fn cmd_apply(rule: &str, lemmas: &[String]) -> Result<()> {
    let rule = DerivationRule::parse(rule)?;
    for lemma in lemmas {
        match rule.apply(lemma) {
            Some(candidate) => println!("{lemma}\t{candidate}"),
            None => println!("{lemma}\t{}", "-".dimmed()),
        }
    }
    Ok(())
}

fn cmd_catalog() {
    println!("{}", "Transformations".bold());
    for t in TRANSFORMATIONS {
        let examples: Vec<String> = t
            .examples
            .iter()
            .map(|(a, b)| format!("{a} → {b}"))
            .collect();
        println!(
            "  {} → {}: {}",
            t.source.cyan(),
            t.target.cyan(),
            examples.join(", ")
        );
    }
    println!();
    println!("{}", "Evaluation lemmas".bold());
    for l in EVALUATION_LEMMAS {
        println!("  [{}] {}: {} → {}", l.group, l.text.bold(), l.source, l.target);
    }
}
