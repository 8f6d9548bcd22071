//! TUI Runner - main loop that owns the terminal and the plan task
//!
//! The TuiRunner is responsible for:
//! - Dispatching events to App for handling
//! - Spawning the plan request as a background task so the UI stays live
//! - Aborting that task when the user cancels
//! - Re-reading the questions file so catalog edits take effect

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eyre::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::planner::{MarketingPlan, Planner, failure_message};
use crate::questions::QuestionSet;
use crate::record::BusinessRecord;

use super::Tui;
use super::app::App;
use super::events::{Event, EventHandler};
use super::views;

/// How often to re-check the questions file for edits
const CATALOG_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Result of the background plan task
enum GenerateOutcome {
    Plan(MarketingPlan),
    Failed(String),
}

/// TUI Runner that manages the terminal and event loop
pub struct TuiRunner {
    /// Application state
    app: App,
    /// Terminal handle
    terminal: Tui,
    /// Plan generator
    planner: Arc<Planner>,
    /// Questions file to watch for edits, if the catalog came from disk
    questions_file: Option<PathBuf>,
    /// Event handler
    event_handler: EventHandler,
    /// Handle to the in-flight plan task
    generate_task: Option<JoinHandle<()>>,
    /// Receiver for the plan task result
    result_rx: Option<mpsc::Receiver<GenerateOutcome>>,
    /// Last questions file check
    last_catalog_check: Instant,
}

impl TuiRunner {
    /// Create a new TuiRunner
    pub fn new(terminal: Tui, questions: QuestionSet, planner: Planner, questions_file: Option<PathBuf>) -> Self {
        Self {
            app: App::new(questions),
            terminal,
            planner: Arc::new(planner),
            questions_file,
            event_handler: EventHandler::new(Duration::from_millis(33)), // ~30 FPS
            generate_task: None,
            result_rx: None,
            last_catalog_check: Instant::now(),
        }
    }

    /// Run the TUI main loop
    pub async fn run(&mut self) -> Result<()> {
        loop {
            // Draw the UI
            self.terminal.draw(|frame| views::render(self.app.state(), frame))?;

            // Handle events
            match self.event_handler.next().await? {
                Event::Tick => {
                    self.handle_tick();
                }
                Event::Key(key_event) => {
                    if self.app.handle_key(key_event) {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => {
                    self.app.handle_mouse(mouse_event);
                }
                Event::Resize(_, _) => {}
            }

            // Check if we should quit
            if self.app.state().should_quit {
                break;
            }
        }

        // Drop any in-flight request on the way out
        if let Some(task) = self.generate_task.take() {
            task.abort();
        }

        Ok(())
    }

    /// Handle tick event - consume pending flags and poll the plan task
    fn handle_tick(&mut self) {
        if self.app.state().cancel_generate {
            self.cancel_generate();
        }

        if self.app.state().pending_generate {
            self.app.state_mut().pending_generate = false;
            self.start_generate();
        }

        self.poll_generate_result();

        // Catalog edits are picked up between requests, never during one
        if self.generate_task.is_none() && self.last_catalog_check.elapsed() >= CATALOG_CHECK_INTERVAL {
            self.check_catalog();
            self.last_catalog_check = Instant::now();
        }
    }

    /// Spawn the plan request as a background task
    fn start_generate(&mut self) {
        if self.generate_task.is_some() {
            debug!("TuiRunner::start_generate: request already in flight, ignoring");
            return;
        }

        let record = match BusinessRecord::from_session(&self.app.state().session) {
            Ok(record) => record,
            Err(e) => {
                self.app.state_mut().set_error(format!("Cannot generate yet: {}", e));
                return;
            }
        };

        info!("Spawning plan request task");
        self.app.state_mut().begin_generating();

        let planner = Arc::clone(&self.planner);
        let (result_tx, result_rx) = mpsc::channel::<GenerateOutcome>(1);
        self.result_rx = Some(result_rx);

        self.generate_task = Some(tokio::spawn(async move {
            let outcome = match planner.generate(&record).await {
                Ok(plan) => GenerateOutcome::Plan(plan),
                Err(e) => {
                    warn!("Plan request failed: {:#}", e);
                    GenerateOutcome::Failed(failure_message(&e))
                }
            };
            let _ = result_tx.send(outcome).await;
        }));
    }

    /// Abort the in-flight plan task
    fn cancel_generate(&mut self) {
        if let Some(task) = self.generate_task.take() {
            info!("Cancelling plan request");
            task.abort();
        }
        self.result_rx = None;
        self.app.state_mut().cancel_generating();
    }

    /// Check whether the background task finished
    fn poll_generate_result(&mut self) {
        let Some(rx) = &mut self.result_rx else { return };

        match rx.try_recv() {
            Ok(GenerateOutcome::Plan(plan)) => {
                info!("Plan request completed");
                self.app.state_mut().finish_generating(plan);
                self.generate_task = None;
                self.result_rx = None;
            }
            Ok(GenerateOutcome::Failed(message)) => {
                self.app
                    .state_mut()
                    .fail_generating(format!("Plan generation failed: {}", message));
                self.generate_task = None;
                self.result_rx = None;
            }
            Err(mpsc::error::TryRecvError::Empty) => {}
            Err(mpsc::error::TryRecvError::Disconnected) => {
                // Sender dropped without a result: the task panicked
                self.app.state_mut().fail_generating("Plan task stopped unexpectedly");
                self.generate_task = None;
                self.result_rx = None;
            }
        }
    }

    /// Reload the questions file and swap in the catalog if it parses
    fn check_catalog(&mut self) {
        let Some(path) = &self.questions_file else { return };

        match QuestionSet::from_file(path) {
            Ok(questions) => {
                self.app.state_mut().adopt_catalog(questions);
            }
            Err(e) => {
                // An unreadable or invalid file keeps the current catalog
                debug!("TuiRunner::check_catalog: reload failed: {}", e);
            }
        }
    }
}
