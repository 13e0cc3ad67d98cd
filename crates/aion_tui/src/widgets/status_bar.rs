//! Status bar widget.
//!
//! Renders a single-line status bar at the bottom showing the current
//! simulation time, input mode, signal count, and status message.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::TuiApp;
use crate::state::InputMode;

/// Renders the status bar into the given area.
pub fn render_status_bar(app: &TuiApp, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
        return;
    }

    let mode_str = match app.state.mode {
        InputMode::Normal => "NORMAL",
        InputMode::Command => "COMMAND",
    };

    let mode_style = match app.state.mode {
        InputMode::Normal => Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    };

    let time_str = app.time_str();
    let signal_count = app.signal_info.len();
    let finished = if app.kernel.is_finished() {
        " [DONE]"
    } else {
        ""
    };
    let auto = if app.state.auto_running { " [RUN]" } else { "" };

    let status_msg = if app.state.status_message.is_empty() {
        String::new()
    } else {
        format!(" | {}", app.state.status_message)
    };

    let line = Line::from(vec![
        Span::styled(format!(" {mode_str} "), mode_style),
        Span::styled(format!(" T={time_str}"), Style::default().fg(Color::White)),
        Span::styled(
            format!(" | {signal_count} signals"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{finished}{auto}"),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(status_msg, Style::default().fg(Color::Cyan)),
    ]);

    // Fill the entire line with background color
    let bg_style = Style::default().bg(Color::DarkGray);
    for x in area.x..area.x + area.width {
        if x < buf.area().right() {
            buf.get_mut(x, area.y).set_style(bg_style);
        }
    }

    Widget::render(line, area, buf);
}
