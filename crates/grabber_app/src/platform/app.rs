use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use engine_logging::{engine_error, engine_info, engine_warn};
use grabber_core::{update, AppState, AppViewModel, Msg};

use super::config::{config_path, load_config};
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::ui::{self, render, Tui, UiState};

const TICK_INTERVAL: Duration = Duration::from_millis(75);
const INPUT_POLL: Duration = Duration::from_millis(50);

pub fn run_app() -> Result<()> {
    let path = config_path(std::env::args());
    let config = load_config(&path)?;
    logging::initialize(LogDestination::from_flag(config.log_to_file), config.level()?);
    engine_info!(
        "grabber starting; config={:?} service={}",
        path,
        config.service_url
    );

    let state = AppState::new(config.origin()?)
        .with_debounce(config.debounce())
        .with_format(config.format());
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(config.service_settings(), msg_tx.clone())
        .context("failed to start the download engine")?;

    // Background tick to throttle rendering.
    thread::spawn(move || {
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });

    let mut terminal = ui::init_terminal()?;
    let result = event_loop(&mut terminal, state, &effects, &msg_rx);
    ui::restore_terminal()?;
    if let Err(ref err) = result {
        engine_error!("app error: {err:#}");
    }
    engine_info!("grabber exiting");
    result
}

fn event_loop(
    terminal: &mut Tui,
    mut state: AppState,
    effects: &EffectRunner,
    msg_rx: &mpsc::Receiver<Msg>,
) -> Result<()> {
    let mut view = state.view();
    let mut ui_state = UiState::default();
    terminal.draw(|f| render::draw(f, &view, &ui_state))?;

    loop {
        let mut redraw = false;
        let mut inbox: Vec<Msg> = msg_rx.try_iter().collect();

        if event::poll(INPUT_POLL)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match map_key(key, &view, ui_state.cursor) {
                        KeyAction::Quit => return Ok(()),
                        KeyAction::Send(msg) => inbox.push(msg),
                        KeyAction::MoveCursor(delta) => {
                            ui_state.move_cursor(delta, entry_count(&view));
                            redraw = true;
                        }
                        KeyAction::OpenLink(url) => open_link(&url),
                        KeyAction::Ignore => {}
                    }
                }
                Event::Paste(text) => inbox.push(Msg::InputChanged(format!(
                    "{}{}",
                    view.input,
                    text.trim()
                ))),
                Event::Resize(..) => redraw = true,
                _ => {}
            }
        }

        for msg in inbox {
            let (next, was_dirty) = dispatch_msg(state, msg, effects);
            state = next;
            if was_dirty {
                view = state.view();
                ui_state.clamp(entry_count(&view));
                redraw = true;
            }
        }

        if redraw {
            terminal.draw(|f| render::draw(f, &view, &ui_state))?;
        }
    }
}

/// Runs one message through the core and hands its effects to the engine.
/// Returns whether the screen needs repainting.
fn dispatch_msg(state: AppState, msg: Msg, effects: &EffectRunner) -> (AppState, bool) {
    let (mut state, pending) = update(state, msg);
    effects.enqueue(pending);
    let was_dirty = state.consume_dirty();
    (state, was_dirty)
}

fn entry_count(view: &AppViewModel) -> usize {
    view.preview.as_ref().map_or(0, |preview| preview.entries.len())
}

fn open_link(url: &str) {
    match webbrowser::open(url) {
        Ok(()) => engine_info!("opened {}", url),
        Err(err) => engine_warn!("Could not open {} in a browser: {}", url, err),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Send(Msg),
    MoveCursor(isize),
    OpenLink(String),
    Quit,
    Ignore,
}

fn map_key(key: KeyEvent, view: &AppViewModel, cursor: usize) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // The alert is modal.
    if view.alert.is_some() {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
            KeyCode::Enter | KeyCode::Esc => KeyAction::Send(Msg::AlertDismissed),
            _ => KeyAction::Ignore,
        };
    }

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => KeyAction::Quit,
        KeyCode::Char('a') if ctrl => KeyAction::Send(Msg::SelectAllToggled),
        KeyCode::Char('x') if ctrl => KeyAction::Send(Msg::CancelClicked),
        KeyCode::Char('u') if ctrl => KeyAction::Send(Msg::InputChanged(String::new())),
        KeyCode::Char('o') if ctrl => match &view.result {
            Some(result) => KeyAction::OpenLink(result.download_url.clone()),
            None => KeyAction::Ignore,
        },
        KeyCode::Char(_) if ctrl => KeyAction::Ignore,
        KeyCode::Char(' ') if entry_count(view) > 0 => KeyAction::Send(Msg::EntryToggled(cursor)),
        KeyCode::Char(c) => KeyAction::Send(Msg::InputChanged(format!("{}{c}", view.input))),
        KeyCode::Backspace => {
            let mut input = view.input.clone();
            match input.pop() {
                Some(_) => KeyAction::Send(Msg::InputChanged(input)),
                None => KeyAction::Ignore,
            }
        }
        KeyCode::Tab | KeyCode::BackTab => {
            KeyAction::Send(Msg::FormatSelected(view.format.toggled()))
        }
        KeyCode::Up => KeyAction::MoveCursor(-1),
        KeyCode::Down => KeyAction::MoveCursor(1),
        KeyCode::Enter => KeyAction::Send(Msg::SubmitClicked),
        KeyCode::Esc if view.error.is_some() => KeyAction::Send(Msg::ErrorDismissed),
        _ => KeyAction::Ignore,
    }
}
