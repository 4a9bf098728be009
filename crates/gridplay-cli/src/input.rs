//! Keyboard controls for the critter animation.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::warn;

/// What a key press asks the animation to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePause,
    Reset,
    Quit,
}

pub const KEY_HELP: &str = "space pause/resume  r reset  q quit";

pub fn control_for(key: KeyEvent) -> Option<Control> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(Control::TogglePause),
        // raw mode delivers Ctrl+C as a key instead of a signal
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Control::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Control::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Control::Quit),
        _ => None,
    }
}

/// Forward key presses from the terminal until the receiver goes away.
pub fn spawn_key_reader(tx: UnboundedSender<Control>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => {}
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        if let Some(control) = control_for(key) {
                            if tx.send(control).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
    })
}

/// Keeps the terminal in raw mode while alive.
pub struct RawMode;

impl RawMode {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(control_for(press(KeyCode::Char(' '))), Some(Control::TogglePause));
        assert_eq!(control_for(press(KeyCode::Char('r'))), Some(Control::Reset));
        assert_eq!(control_for(press(KeyCode::Char('q'))), Some(Control::Quit));
        assert_eq!(control_for(press(KeyCode::Esc)), Some(Control::Quit));
        assert_eq!(control_for(press(KeyCode::Char('c'))), None);
        assert_eq!(control_for(press(KeyCode::Enter)), None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(control_for(ctrl_c), Some(Control::Quit));
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Char('r'));
        key.kind = KeyEventKind::Release;
        assert_eq!(control_for(key), None);
    }
}
