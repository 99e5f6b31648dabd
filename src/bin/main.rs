use clap::Parser;
use crossterm::style::Stylize;
use scorer_core::dataset::load_training_set;
use scorer_core::{BackendKind, ScorerError, ScoringConfig, ScoringModel};
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Score text by analogy with a labeled training set.
#[derive(Parser)]
#[command(name = "scorer_engine", version)]
struct Cli {
    /// JSON training set: {"text": score, ...} or [{"text": ..., "score": ...}]
    #[arg(long, short)]
    train: PathBuf,

    /// JSON scoring config; missing fields use defaults
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Similarity backend (knn, index); overrides the config file
    #[arg(long, short)]
    backend: Option<BackendKind>,

    /// Show debug logs
    #[arg(long, short)]
    verbose: bool,

    /// Texts to score. Starts an interactive prompt when empty.
    texts: Vec<String>,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_model(cli: &Cli) -> Result<ScoringModel, ScorerError> {
    let mut config = match &cli.config {
        Some(path) => ScoringConfig::from_json_file(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }

    let model = ScoringModel::with_config(config)?;
    model.train(&load_training_set(&cli.train)?)?;
    Ok(model)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let model = match build_model(&cli) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if !cli.texts.is_empty() {
        let mut failed = false;
        for text in &cli.texts {
            match model.analyze(text) {
                Ok(score) => println!("{score:.4}\t{text}"),
                Err(e) => {
                    eprintln!("{} '{}': {}", "[ERROR]".red().bold(), text, e);
                    failed = true;
                }
            }
        }
        return if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS };
    }

    match run_prompt(&model) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_prompt(model: &ScoringModel) -> std::io::Result<()> {
    print_banner(model);

    loop {
        print!("{} ", ">".cyan().bold());
        stdout().flush()?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "exit" => break,
            "" => continue,
            text => match model.analyze(text) {
                Ok(score) => println!("  score: {}", format!("{score:.4}").green().bold()),
                Err(e) => println!("  {}", e.to_string().yellow()),
            },
        }
    }
    Ok(())
}

fn print_banner(model: &ScoringModel) {
    println!("{}", "Analogy Scorer".bold());
    println!("---------------------------------------------------------------");
    if let Some(snapshot) = model.snapshot() {
        println!(
            "Trained on {} examples ({} backend, {} vocabulary terms, fallback {:.4}).",
            snapshot.example_count(),
            snapshot.backend_name(),
            snapshot.vocabulary().map_or(0, |v| v.len()),
            snapshot.fallback_score()
        );
    }
    println!("Type a text and press [Enter] to score it. 'exit' to quit.\n");
}
