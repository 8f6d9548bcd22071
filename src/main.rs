//! Planform - business intake to marketing plan
//!
//! CLI entry point for the interview surfaces and batch generation.

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use planform::cli::{Cli, Command, OutputFormat, get_log_path};
use planform::config::Config;
use planform::interview::Interview;
use planform::llm::create_client;
use planform::planner::Planner;
use planform::prompts::PromptLoader;
use planform::questions::{QuestionId, QuestionSet};
use planform::record::BusinessRecord;
use planform::session::IntakeSession;
use planform::tui;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planform")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Setup tracing subscriber - write to log file, not stdout/stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("planform.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OPENAI_API_KEY etc from a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "Planform loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    // Dispatch command; the TUI is the default surface
    match cli.command {
        Some(Command::Tui) | None => cmd_tui(&config).await,
        Some(Command::Interview) => cmd_interview(&config).await,
        Some(Command::Run { answers, out }) => cmd_run(&config, &answers, out.as_deref()).await,
        Some(Command::Questions { format }) => cmd_questions(&config, format),
        Some(Command::Logs { follow, lines }) => cmd_logs(follow, lines),
    }
}

/// Load the question catalog, preferring a configured file over the built-in set
fn load_questions(config: &Config) -> Result<(QuestionSet, Option<PathBuf>)> {
    match &config.questions.file {
        Some(path) => {
            let questions = QuestionSet::from_file(path)
                .with_context(|| format!("Failed to load questions from {}", path.display()))?;
            Ok((questions, Some(path.clone())))
        }
        None => Ok((QuestionSet::builtin(), None)),
    }
}

/// Build the planner from configuration
fn build_planner(config: &Config) -> Result<Planner> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let root = std::env::current_dir().context("Failed to get current directory")?;
    let prompts = PromptLoader::new(&root);
    Ok(Planner::new(llm, prompts, &config.llm.model, config.llm.max_tokens))
}

/// Launch the TUI
async fn cmd_tui(config: &Config) -> Result<()> {
    config.validate()?;

    let (questions, questions_file) = load_questions(config)?;
    let planner = build_planner(config)?;

    tui::run(questions, planner, questions_file).await
}

/// Run the plain-terminal interview
async fn cmd_interview(config: &Config) -> Result<()> {
    config.validate()?;

    let (questions, _) = load_questions(config)?;
    let planner = build_planner(config)?;

    Interview::new(questions, planner).run().await
}

/// Generate a plan from a saved answers file (batch mode)
async fn cmd_run(config: &Config, answers_path: &std::path::Path, out: Option<&std::path::Path>) -> Result<()> {
    config.validate()?;

    let (questions, _) = load_questions(config)?;

    let content = fs::read_to_string(answers_path)
        .with_context(|| format!("Failed to read answers file: {}", answers_path.display()))?;
    let answers: HashMap<QuestionId, String> =
        serde_yaml::from_str(&content).context("Failed to parse answers file")?;

    let session = IntakeSession::from_saved_answers(&questions, &answers)?;
    let record = BusinessRecord::from_session(&session)?;

    let planner = build_planner(config)?;
    let plan = planner.generate(&record).await?;

    match out {
        Some(path) => {
            fs::write(path, &plan.text).with_context(|| format!("Failed to write plan to {}", path.display()))?;
            println!("Plan written to {}", path.display());
            println!(
                "  Model: {} ({} in / {} out tokens)",
                plan.model, plan.usage.input_tokens, plan.usage.output_tokens
            );
        }
        None => {
            // Keep stdout clean so the plan can be piped
            println!("{}", plan.text);
        }
    }

    Ok(())
}

/// Print the active question set
fn cmd_questions(config: &Config, format: OutputFormat) -> Result<()> {
    let (questions, source) = load_questions(config)?;

    match format {
        OutputFormat::Json => {
            let list: Vec<_> = questions.iter().collect();
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        OutputFormat::Text => {
            match source {
                Some(path) => println!("Questions ({})", path.display()),
                None => println!("Questions (built-in)"),
            }
            println!();
            for (i, question) in questions.iter().enumerate() {
                println!("  {}. [{}]", i + 1, question.id.as_str());
                println!("     {}", question.text);
            }
        }
    }

    Ok(())
}

/// Show logs
fn cmd_logs(follow: bool, lines: usize) -> Result<()> {
    let log_path = get_log_path();

    if !log_path.exists() {
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    if follow {
        println!("Following log file: {} (Ctrl+C to stop)", log_path.display());
        println!();

        // Use tail -f for following
        let mut child = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(&log_path)
            .spawn()
            .context("Failed to run tail -f")?;

        child.wait()?;
    } else {
        // Read last N lines
        let file = fs::File::open(&log_path).context("Failed to open log file")?;
        let reader = BufReader::new(file);
        let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

        let start = if all_lines.len() > lines { all_lines.len() - lines } else { 0 };

        for line in &all_lines[start..] {
            println!("{}", line);
        }
    }

    Ok(())
}
