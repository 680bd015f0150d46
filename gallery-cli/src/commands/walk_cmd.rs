use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use gallery_shared::input::KeyId;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::project;
use crate::state::{WalkState, TURN_STEP_PX};
use crate::ui;

const FRAME_RATE: u32 = 30;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(layout_path: Option<PathBuf>) -> anyhow::Result<()> {
    let (layout, source) = project::resolve_layout(layout_path.as_deref())?;
    let mut state = WalkState::new(&layout, source);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut state).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(terminal: &mut Term, state: &mut WalkState) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(64);
    let reader = tokio::task::spawn_blocking(move || read_events(tx));

    let dt = 1.0 / FRAME_RATE as f32;
    let mut ticker = tokio::time::interval(Duration::from_secs_f32(dt));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while !state.should_quit {
        tokio::select! {
            _ = ticker.tick() => {
                state.tick(dt);
                let view: &WalkState = state;
                terminal.draw(|frame| ui::render(frame, view))?;
            }
            received = rx.recv() => match received {
                Some(event) => handle_event(state, event),
                None => break,
            },
        }
    }

    drop(rx);
    reader.await??;
    Ok(())
}

/// Blocking terminal reader. Polls so it notices the receiver going away.
fn read_events(tx: mpsc::Sender<Event>) -> anyhow::Result<()> {
    while !tx.is_closed() {
        if event::poll(Duration::from_millis(50))? && tx.blocking_send(event::read()?).is_err() {
            break;
        }
    }
    Ok(())
}

/// Browser-style key name for a terminal key, if the walkthrough uses it.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Char(c) => c.to_string(),
        _ => return None,
    };
    KeyId::from_key_name(&name).map(|_| name)
}

pub fn handle_event(state: &mut WalkState, event: Event) {
    let Event::Key(key) = event else {
        return;
    };
    handle_key(state, key);
}

fn handle_key(state: &mut WalkState, key: KeyEvent) {
    // Only terminals with enhanced keyboard reporting send releases.
    if key.kind == KeyEventKind::Release {
        if let Some(name) = key_name(key.code) {
            state.key_released(&name);
        }
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') => state.should_quit = true,
        KeyCode::Esc | KeyCode::Enter => state.toggle_lock(),
        KeyCode::Char(' ') => state.skip_intro(),
        KeyCode::Char('?') => state.show_help = !state.show_help,
        KeyCode::Char('j') => state.turn(-TURN_STEP_PX, 0.0),
        KeyCode::Char('l') => state.turn(TURN_STEP_PX, 0.0),
        KeyCode::Char('i') => state.turn(0.0, -TURN_STEP_PX),
        KeyCode::Char('k') => state.turn(0.0, TURN_STEP_PX),
        KeyCode::PageUp => state.log.scroll_up(5),
        KeyCode::PageDown => state.log.scroll_down(5),
        KeyCode::Char('c') => state.log.clear(),
        code => {
            if let Some(name) = key_name(code) {
                state.key_pressed(&name);
            }
        }
    }
}
