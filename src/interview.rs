//! Plain-terminal interview mode
//!
//! One question per prompt, a readout on completion, then a confirm-and-
//! generate step. The agent call blocks here; the TUI is the responsive
//! surface.

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::planner::{MarketingPlan, Planner, failure_message};
use crate::questions::QuestionSet;
use crate::record::BusinessRecord;
use crate::session::{IntakeSession, SubmitOutcome};

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// What the user chose at a yes/no prompt
enum Choice {
    Yes,
    No,
    Quit,
}

/// Interactive interview session
pub struct Interview {
    questions: QuestionSet,
    session: IntakeSession,
    planner: Planner,
}

impl Interview {
    /// Create a new interview over the given catalog
    pub fn new(questions: QuestionSet, planner: Planner) -> Self {
        let session = IntakeSession::new(&questions);
        Self {
            questions,
            session,
            planner,
        }
    }

    /// Run the interview main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            // Collect answers one question at a time
            while let Some(question) = self.session.current_question(&self.questions) {
                let label = format!("Q{}/{}:", self.session.step() + 1, self.questions.len());
                println!();
                println!("{} {}", label.bright_cyan().bold(), question.text.bright_white());

                let readline = rl.readline(&format!("{} ", ">".bright_green()));
                match readline {
                    Ok(line) => {
                        let input = line.trim();

                        if input.starts_with('/') {
                            match self.handle_slash_command(input) {
                                SlashResult::Continue => continue,
                                SlashResult::Quit => {
                                    println!("Goodbye!");
                                    return Ok(());
                                }
                            }
                        }

                        let _ = rl.add_history_entry(input);

                        if self.session.submit(&self.questions, input) == SubmitOutcome::RejectedEmpty {
                            println!("{}", "Please enter an answer (or /quit to leave).".yellow());
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        // Ctrl+C - re-present the same question
                        println!("^C");
                        continue;
                    }
                    Err(ReadlineError::Eof) => {
                        println!();
                        return Ok(());
                    }
                    Err(err) => {
                        return Err(eyre::eyre!("Readline error: {}", err));
                    }
                }
            }

            // All answers collected
            self.print_readout();

            match self.generate_phase(&mut rl).await? {
                true => {
                    // Start over with a fresh session
                    self.session.reset(&self.questions);
                    println!();
                    println!("{}", "Starting over.".dimmed());
                }
                false => {
                    println!("Goodbye!");
                    return Ok(());
                }
            }
        }
    }

    /// Offer generation until the user moves on
    ///
    /// Returns true to start a fresh interview, false to quit. A failed
    /// agent call leaves the answers untouched and re-offers generation.
    async fn generate_phase(&mut self, rl: &mut DefaultEditor) -> Result<bool> {
        loop {
            match ask(rl, "Generate the marketing plan now? [Y/n]", true)? {
                Choice::Yes => {
                    let record = BusinessRecord::from_session(&self.session)?;
                    println!("{}", "Generating your marketing plan...".dimmed());

                    match self.planner.generate(&record).await {
                        Ok(plan) => {
                            self.print_plan(&plan);
                            return match ask(rl, "Start over with a new interview? [y/N]", false)? {
                                Choice::Yes => Ok(true),
                                Choice::No | Choice::Quit => Ok(false),
                            };
                        }
                        Err(e) => {
                            println!("{} {}", "Plan generation failed:".red(), failure_message(&e));
                            println!("{}", "Your answers are unchanged; you can try again.".dimmed());
                        }
                    }
                }
                Choice::No => {
                    return match ask(rl, "Start over and discard these answers? [y/N]", false)? {
                        Choice::Yes => Ok(true),
                        Choice::No | Choice::Quit => Ok(false),
                    };
                }
                Choice::Quit => return Ok(false),
            }
        }
    }

    /// Print welcome message
    fn print_welcome(&self) {
        println!();
        println!("{}", "Planform Business Interview".bright_cyan().bold());
        println!(
            "{} questions, then a social media marketing plan.",
            self.questions.len()
        );
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
    }

    /// Handle slash commands
    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/restart" | "/r" => {
                self.session.reset(&self.questions);
                println!("{}", "Answers discarded, starting from the first question.".dimmed());
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    /// Print help message
    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:12} Show this help", "/help".yellow());
        println!("  {:12} Discard answers and start over", "/restart".yellow());
        println!("  {:12} Exit the interview", "/quit".yellow());
        println!();
    }

    /// Print the collected answers
    fn print_readout(&self) {
        println!();
        println!("{}", "All business info collected!".bright_green().bold());
        println!();
        for answer in self.session.answers() {
            println!("  {:20} {}", format!("{}:", answer.id.label()).bright_cyan(), answer.text);
        }
        println!();
    }

    /// Print the generated plan with a status line
    fn print_plan(&self, plan: &MarketingPlan) {
        println!();
        println!("{}", "Social Media Marketing Plan".bright_cyan().bold());
        println!();
        println!("{}", plan.text);
        println!();
        println!(
            "{}",
            format!(
                "Generated by {} at {} ({} in / {} out tokens)",
                plan.model,
                plan.generated_at.format("%Y-%m-%d %H:%M UTC"),
                plan.usage.input_tokens,
                plan.usage.output_tokens
            )
            .dimmed()
        );
        println!();
    }
}

/// Ask a yes/no question; empty input takes the default
fn ask(rl: &mut DefaultEditor, prompt: &str, default_yes: bool) -> Result<Choice> {
    loop {
        let readline = rl.readline(&format!("{} ", prompt.bright_green()));
        match readline {
            Ok(line) => {
                let input = line.trim().to_lowercase();
                return Ok(match input.as_str() {
                    "" => {
                        if default_yes {
                            Choice::Yes
                        } else {
                            Choice::No
                        }
                    }
                    "y" | "yes" => Choice::Yes,
                    "n" | "no" => Choice::No,
                    "q" | "quit" | "/quit" => Choice::Quit,
                    _ => {
                        println!("{}", "Please answer y or n.".yellow());
                        continue;
                    }
                });
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!();
                return Ok(Choice::Quit);
            }
            Err(err) => {
                return Err(eyre::eyre!("Readline error: {}", err));
            }
        }
    }
}
