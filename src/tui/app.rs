//! TUI application - event handling and state management
//!
//! The App struct owns the AppState and handles all keyboard events.
//! It does not do any rendering - that's delegated to the views module.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::questions::QuestionSet;

use super::state::{AppState, ConfirmAction, ConfirmDialog, InteractionMode, View};

/// TUI application
#[derive(Debug)]
pub struct App {
    /// Application state
    state: AppState,
}

impl App {
    /// Create a new application instance over the given catalog
    pub fn new(questions: QuestionSet) -> Self {
        Self {
            state: AppState::new(questions),
        }
    }

    /// Get reference to state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get mutable reference to state
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Handle a key event
    ///
    /// Returns true if the application should exit immediately.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Clear any transient messages on key press
        self.state.clear_error();
        self.state.notice = None;

        // Ctrl+C force-quits from anywhere
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        match &self.state.interaction_mode {
            InteractionMode::Normal => self.handle_normal_key(key),
            InteractionMode::Confirm(_) => self.handle_confirm_key(key),
            InteractionMode::Help => self.handle_help_key(key),
        }

        false
    }

    /// Handle a mouse event (scroll in the plan view)
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.state.view != View::Plan {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_sub(1);
            }
            MouseEventKind::ScrollDown => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    /// Handle key in normal mode, dispatching on the current view
    fn handle_normal_key(&mut self, key: KeyEvent) {
        match self.state.view {
            View::Form => self.handle_form_key(key),
            View::Summary => self.handle_summary_key(key),
            View::Generating => self.handle_generating_key(key),
            View::Plan => self.handle_plan_key(key),
        }
    }

    /// Form view: every printable character belongs to the answer
    fn handle_form_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => {
                self.state.submit_input();
            }
            (KeyCode::Backspace, _) => {
                self.state.input.pop();
            }
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
                if self.state.session.step() > 0 || !self.state.input.is_empty() {
                    self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::restart());
                }
            }
            (KeyCode::F(1), _) => {
                self.state.interaction_mode = InteractionMode::Help;
            }
            (KeyCode::Esc, _) => {
                if !self.state.input.is_empty() {
                    self.state.input.clear();
                } else if self.state.session.step() > 0 {
                    self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::quit());
                } else {
                    self.state.should_quit = true;
                }
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.state.input.push(c);
            }
            _ => {}
        }
    }

    /// Summary view: generate, restart, or quit
    fn handle_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('g') | KeyCode::Enter => {
                self.state.pending_generate = true;
            }
            KeyCode::Char('r') => {
                self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::restart());
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::quit());
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }
            _ => {}
        }
    }

    /// Generating view: only cancel is available
    fn handle_generating_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.cancel_generate = true;
        }
    }

    /// Plan view: scroll, go back, restart, or quit
    fn handle_plan_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.state.plan_scroll = self.state.plan_scroll.saturating_add(10);
            }
            KeyCode::Home => {
                self.state.plan_scroll = 0;
            }
            KeyCode::Char('b') | KeyCode::Esc => {
                self.state.view = View::Summary;
            }
            KeyCode::Char('g') => {
                // Regenerate from the same answers
                self.state.pending_generate = true;
            }
            KeyCode::Char('r') => {
                self.state.interaction_mode = InteractionMode::Confirm(ConfirmDialog::restart());
            }
            KeyCode::Char('q') => {
                self.state.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Help;
            }
            _ => {}
        }
    }

    /// Handle key in confirm dialog mode
    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Enter => {
                if let InteractionMode::Confirm(dialog) = &self.state.interaction_mode
                    && dialog.selected_button
                {
                    let action = dialog.action;
                    match action {
                        ConfirmAction::Restart => {
                            self.state.restart();
                        }
                        ConfirmAction::Quit => {
                            self.state.should_quit = true;
                        }
                    }
                }
                self.state.interaction_mode = InteractionMode::Normal;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('y') | KeyCode::Char('Y') => {
                // Toggle button selection
                if let InteractionMode::Confirm(dialog) = &mut self.state.interaction_mode {
                    if key.code == KeyCode::Char('y') || key.code == KeyCode::Char('Y') {
                        dialog.selected_button = true;
                    } else {
                        dialog.selected_button = !dialog.selected_button;
                    }
                }
            }
            _ => {}
        }
    }

    /// Handle key in help overlay mode
    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
                self.state.interaction_mode = InteractionMode::Normal;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app() -> App {
        App::new(QuestionSet::builtin())
    }

    #[test]
    fn test_typing_builds_input() {
        let mut app = app();
        type_str(&mut app, "Acme");
        assert_eq!(app.state().input, "Acme");

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state().input, "Acm");
    }

    #[test]
    fn test_enter_submits_answer() {
        let mut app = app();
        type_str(&mut app, "Acme Coffee");
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state().session.step(), 1);
        assert!(app.state().input.is_empty());
    }

    #[test]
    fn test_empty_enter_shows_validation() {
        let mut app = app();
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.state().session.step(), 0);
        assert!(app.state().validation.is_some());
        assert_eq!(app.state().view, View::Form);
    }

    #[test]
    fn test_full_interview_reaches_summary() {
        let mut app = app();
        for i in 0..9 {
            type_str(&mut app, &format!("answer {}", i));
            app.handle_key(key(KeyCode::Enter));
        }

        assert_eq!(app.state().view, View::Summary);
        assert_eq!(app.state().session.phase(), Phase::Complete);
    }

    #[test]
    fn test_summary_g_queues_generate() {
        let mut app = app();
        for i in 0..9 {
            type_str(&mut app, &format!("answer {}", i));
            app.handle_key(key(KeyCode::Enter));
        }

        app.handle_key(key(KeyCode::Char('g')));
        assert!(app.state().pending_generate);
    }

    #[test]
    fn test_generating_esc_queues_cancel() {
        let mut app = app();
        app.state_mut().begin_generating();

        app.handle_key(key(KeyCode::Esc));
        assert!(app.state().cancel_generate);
    }

    #[test]
    fn test_restart_requires_confirmation() {
        let mut app = app();
        type_str(&mut app, "Acme");
        app.handle_key(key(KeyCode::Enter));

        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(matches!(app.state().interaction_mode, InteractionMode::Confirm(_)));

        // Default button is No
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().session.step(), 1);

        // Confirm with y then Enter
        app.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        app.handle_key(key(KeyCode::Char('y')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state().session.step(), 0);
    }

    #[test]
    fn test_form_keeps_question_mark() {
        // '?' must be typeable in answers, not open help
        let mut app = app();
        type_str(&mut app, "maybe?");
        assert_eq!(app.state().input, "maybe?");
        assert!(matches!(app.state().interaction_mode, InteractionMode::Normal));
    }

    #[test]
    fn test_esc_clears_input_before_quitting() {
        let mut app = app();
        type_str(&mut app, "half an answer");

        app.handle_key(key(KeyCode::Esc));
        assert!(app.state().input.is_empty());
        assert!(!app.state().should_quit);

        // No progress at all: Esc quits directly
        app.handle_key(key(KeyCode::Esc));
        assert!(app.state().should_quit);
    }

    #[test]
    fn test_ctrl_c_force_quits() {
        let mut app = app();
        let quit = app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(quit);
    }

    #[test]
    fn test_plan_view_scroll_and_back() {
        let mut app = app();
        app.state_mut().view = View::Plan;
        app.state_mut().plan_scroll = 5;

        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.state().plan_scroll, 6);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.state().plan_scroll, 5);
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.state().plan_scroll, 0);

        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.state().view, View::Summary);
    }
}
