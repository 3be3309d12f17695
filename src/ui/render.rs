//! Rendering of the single timer screen

use ratatui::{prelude::*, widgets::*};

use crate::state::{TimerPhase, TimerSnapshot};

const NORMAL_ACCENT: Color = Color::Green;
const FINISHED_ACCENT: Color = Color::Red;

/// Render one frame of the timer screen from a snapshot
pub fn render(f: &mut Frame, snap: &TimerSnapshot) {
    let accent = accent_color(snap);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            " tickdown ",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(outer, f.size());

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Length(2), // Icon
            Constraint::Length(1),
            Constraint::Length(7), // Phase content
            Constraint::Min(1),
            Constraint::Length(2), // Controls help
        ])
        .split(f.size());

    let icon = Paragraph::new(phase_icon(snap.phase))
        .style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(icon, sections[1]);

    match snap.phase {
        TimerPhase::Idle => render_idle(f, snap, sections[3]),
        TimerPhase::Running => render_running(f, snap, sections[3]),
        TimerPhase::Finished => render_finished(f, sections[3]),
    }

    let controls = Paragraph::new(controls_line(snap.phase))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(controls, sections[5]);
}

fn render_idle(f: &mut Frame, snap: &TimerSnapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input box
            Constraint::Length(1),
            Constraint::Length(1), // Notice
        ])
        .split(area);

    let field = centered_rect(30, rows[0]);
    let input = Paragraph::new(Line::from(vec![
        Span::styled(snap.input.as_str(), Style::default().fg(Color::White)),
        Span::styled("_", Style::default().fg(NORMAL_ACCENT)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(NORMAL_ACCENT))
            .title(" Seconds "),
    );
    f.render_widget(input, field);

    if let Some(notice) = snap.notice {
        let warning = Paragraph::new(notice.to_string())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);
        f.render_widget(warning, rows[2]);
    }
}

fn render_running(f: &mut Frame, snap: &TimerSnapshot, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Readout
            Constraint::Length(1), // Status line
            Constraint::Length(1),
            Constraint::Length(3), // Progress bar
        ])
        .split(area);

    let readout = Paragraph::new(format!("{}s", snap.remaining_seconds()))
        .style(
            Style::default()
                .fg(NORMAL_ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(readout, rows[0]);

    let status = Paragraph::new(status_line(snap))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    f.render_widget(status, rows[1]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .gauge_style(Style::default().fg(NORMAL_ACCENT).bg(Color::Black))
        .ratio(snap.progress());
    f.render_widget(gauge, centered_rect(40, rows[3]));
}

fn render_finished(f: &mut Frame, area: Rect) {
    let banner = Paragraph::new("TIME'S UP")
        .style(
            Style::default()
                .fg(FINISHED_ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

fn accent_color(snap: &TimerSnapshot) -> Color {
    if snap.phase == TimerPhase::Finished {
        FINISHED_ACCENT
    } else {
        NORMAL_ACCENT
    }
}

fn phase_icon(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Finished => "⏰",
        _ => "⏲",
    }
}

fn controls_line(phase: TimerPhase) -> &'static str {
    match phase {
        TimerPhase::Idle => "type digits  •  Enter start  •  Q quit",
        TimerPhase::Running => "Q quit",
        TimerPhase::Finished => "Enter clear  •  Q quit",
    }
}

fn status_line(snap: &TimerSnapshot) -> String {
    let started = snap
        .started_at
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
        .unwrap_or_default();
    format!(
        "{} of {}s elapsed  •  started {}",
        snap.elapsed_seconds, snap.total_seconds, started
    )
}

/// Center a fixed-width strip inside the given area
fn centered_rect(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}
