//! TUI views and rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use super::state::{AppState, ConfirmDialog, InteractionMode, View};

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);

    match state.view {
        View::Form => render_form(state, frame, chunks[1]),
        View::Summary => render_summary(state, frame, chunks[1]),
        View::Generating => render_generating(state, frame, chunks[1]),
        View::Plan => render_plan(state, frame, chunks[1]),
    }

    render_footer(state, frame, chunks[2]);

    // Modal overlays on top of everything
    match &state.interaction_mode {
        InteractionMode::Confirm(dialog) => render_confirm_overlay(frame, chunks[1], dialog),
        InteractionMode::Help => render_help_overlay(frame, chunks[1], state.view),
        InteractionMode::Normal => {}
    }
}

/// Render the header bar
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let progress = if state.session.is_complete() {
        format!("{}/{} answered", state.session.step(), state.questions.len())
    } else {
        format!("Question {}/{}", state.session.step() + 1, state.questions.len())
    };

    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Planform ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(state.view.display_name(), Style::default().fg(Color::Yellow)),
        Span::raw(" │ "),
        Span::styled(progress, Style::default().fg(Color::Green)),
    ])])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Render the form view: current question, input box, collected answers
fn render_form(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Question
            Constraint::Length(3), // Input
            Constraint::Length(1), // Validation line
            Constraint::Min(0),    // Answers so far
        ])
        .split(area);

    let question_text = state
        .session
        .current_question(&state.questions)
        .map(|q| q.text.clone())
        .unwrap_or_default();

    let question = Paragraph::new(Line::from(Span::styled(
        question_text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default().borders(Borders::ALL).title(format!(
            " Question {}/{} ",
            state.session.step() + 1,
            state.questions.len()
        )),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(question, chunks[0]);

    let input = Paragraph::new(state.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(" Your answer "));
    frame.render_widget(input, chunks[1]);

    // Put the cursor at the end of the input text, unless an overlay is up
    if matches!(state.interaction_mode, InteractionMode::Normal) {
        let typed = u16::try_from(state.input.chars().count()).unwrap_or(u16::MAX);
        let cursor_x = chunks[1].x + 1 + typed.min(chunks[1].width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, chunks[1].y + 1));
    }

    if let Some(validation) = &state.validation {
        let line = Paragraph::new(Line::from(Span::styled(
            validation.as_str(),
            Style::default().fg(Color::Yellow),
        )));
        frame.render_widget(line, chunks[2]);
    }

    render_answer_table(state, frame, chunks[3], " Answered so far ");
}

/// Render the summary view: all answers plus a generate hint
fn render_summary(state: &AppState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    render_answer_table(state, frame, chunks[0], " Review your answers ");

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("g", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled(
            " to generate the marketing plan",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(hint, chunks[1]);
}

/// Render the collected answers as a label/answer table
fn render_answer_table(state: &AppState, frame: &mut Frame, area: Rect, title: &str) {
    let rows: Vec<Row> = state
        .session
        .answers()
        .iter()
        .map(|answer| {
            Row::new(vec![
                Cell::from(Span::styled(answer.id.label(), Style::default().fg(Color::Cyan))),
                Cell::from(answer.text.as_str()),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(0)])
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    frame.render_widget(table, area);
}

/// Render the generating view with a spinner and elapsed time
fn render_generating(state: &AppState, frame: &mut Frame, area: Rect) {
    let elapsed = state.generating_elapsed().unwrap_or_default();
    let frame_idx = (elapsed.as_millis() / 120) as usize % SPINNER_FRAMES.len();

    let status = format!(
        "{} Generating your marketing plan... (Esc to cancel · {}s)",
        SPINNER_FRAMES[frame_idx],
        elapsed.as_secs()
    );

    let popup_area = centered_rect(60, 20, area);
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(status, Style::default().fg(Color::Yellow))),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Working "))
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Render the plan view as scrollable markdown
fn render_plan(state: &AppState, frame: &mut Frame, area: Rect) {
    let Some(plan) = &state.plan else {
        let empty = Paragraph::new("No plan generated yet")
            .block(Block::default().borders(Borders::ALL).title(" Marketing Plan "));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let markdown = tui_markdown::from_str(&plan.text);
    let lines: Vec<Line> = markdown.lines.iter().cloned().collect();
    let scroll = clamp_scroll(state.plan_scroll, lines.len(), chunks[0].height.saturating_sub(2));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Marketing Plan "))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, chunks[0]);

    let status = Paragraph::new(Line::from(Span::styled(
        format!(
            "Generated by {} · ↑{} ↓{} tokens · {}",
            plan.model,
            plan.usage.input_tokens,
            plan.usage.output_tokens,
            plan.generated_at.format("%Y-%m-%d %H:%M UTC")
        ),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(status, chunks[1]);
}

/// Render the confirmation dialog overlay
fn render_confirm_overlay(frame: &mut Frame, area: Rect, dialog: &ConfirmDialog) {
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);

    let yes_style = if dialog.selected_button {
        Style::default().fg(Color::Black).bg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let no_style = if dialog.selected_button {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
    };

    let content = vec![
        Line::from(""),
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::raw("      "),
            Span::styled("[ Yes ]", yes_style),
            Span::raw("   "),
            Span::styled("[ No ]", no_style),
        ]),
    ];

    let confirm = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Confirm "))
        .wrap(Wrap { trim: true });

    frame.render_widget(confirm, popup_area);
}

/// Render help overlay with keys for the current view
fn render_help_overlay(frame: &mut Frame, area: Rect, view: View) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Ctrl+c     ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit immediately"),
        ]),
        Line::from(vec![
            Span::styled("F1         ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle help"),
        ]),
        Line::from(""),
    ];

    let view_help: &[(&str, &str)] = match view {
        View::Form => &[
            ("Enter      ", "Submit the answer"),
            ("Esc        ", "Clear input / quit"),
            ("Ctrl+r     ", "Start over"),
        ],
        View::Summary => &[
            ("g, Enter   ", "Generate the plan"),
            ("r          ", "Start over"),
            ("q, Esc     ", "Quit"),
        ],
        View::Generating => &[("Esc        ", "Cancel the request")],
        View::Plan => &[
            ("j/k, ↑/↓   ", "Scroll"),
            ("PgUp/PgDn  ", "Scroll faster"),
            ("g          ", "Regenerate"),
            ("b, Esc     ", "Back to review"),
            ("r          ", "Start over"),
            ("q          ", "Quit"),
        ],
    };

    help_text.push(Line::from(vec![Span::styled(
        view.display_name(),
        Style::default().add_modifier(Modifier::BOLD),
    )]));
    for (keys, desc) in view_help {
        help_text.push(Line::from(vec![
            Span::styled(*keys, Style::default().fg(Color::Cyan)),
            Span::raw(*desc),
        ]));
    }

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Render the footer bar with hints for the current view
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    // Errors and notices take over the footer until the next key press
    let line = if let Some(error) = &state.error_message {
        Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(format!(" {} ", notice), Style::default().fg(Color::Yellow)))
    } else {
        match state.view {
            View::Form => hint_line(&[("Enter", "Submit"), ("Esc", "Clear/Quit"), ("Ctrl+r", "Restart"), ("F1", "Help")]),
            View::Summary => hint_line(&[("g", "Generate"), ("r", "Restart"), ("q", "Quit"), ("?", "Help")]),
            View::Generating => hint_line(&[("Esc", "Cancel")]),
            View::Plan => hint_line(&[("j/k", "Scroll"), ("g", "Regenerate"), ("b", "Back"), ("q", "Quit")]),
        }
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Build a footer hint line from key/description pairs
fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(
            format!(" {}", key),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {} ", desc)));
    }
    Line::from(spans)
}

/// Clamp the requested scroll so the text cannot run entirely off-screen
///
/// Plans longer than `u16::MAX` lines saturate rather than wrap around.
fn clamp_scroll(requested: u16, total_lines: usize, viewport: u16) -> u16 {
    let total = u16::try_from(total_lines).unwrap_or(u16::MAX);
    requested.min(total.saturating_sub(viewport))
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
