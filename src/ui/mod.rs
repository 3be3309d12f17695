//! Terminal UI module
//!
//! This module owns the terminal lifecycle and the event loop that
//! multiplexes key input, snapshot updates, and shutdown signals.

pub mod render;

use std::{io, sync::Arc};

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use tracing::info;

use crate::state::{TimerController, TimerPhase};
use crate::utils::shutdown_signal;

use render::render;

/// Run the timer screen until the user quits or a shutdown signal lands.
///
/// Raw mode and the alternate screen are always restored on the way
/// out, and a tick source left running by a mid-run quit is cancelled
/// before the terminal is handed back.
pub async fn run(controller: Arc<TimerController>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &controller).await;

    // Quitting while running abandons the countdown; stop its callbacks
    controller.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &Arc<TimerController>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut updates = controller.subscribe();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        terminal.draw(|f| render(f, &controller.snapshot()))?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if handle_key(key, controller) {
                            info!("Quit requested from the keyboard");
                            return Ok(());
                        }
                    }
                    // Resizes redraw on the next pass
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
            _ = updates.changed() => {
                // A new snapshot arrived; redraw at the top of the loop
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

/// Apply one key event. Returns true when the user asked to quit.
fn handle_key(key: KeyEvent, controller: &Arc<TimerController>) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        _ => {}
    }

    match controller.snapshot().phase {
        TimerPhase::Idle => match key.code {
            KeyCode::Char(c) => controller.push_digit(c),
            KeyCode::Backspace => controller.pop_digit(),
            KeyCode::Enter => controller.start(),
            _ => {}
        },
        // No controls while counting down: starts are not re-entrant
        TimerPhase::Running => {}
        TimerPhase::Finished => match key.code {
            KeyCode::Enter | KeyCode::Char('c') => controller.clear(),
            _ => {}
        },
    }

    false
}
