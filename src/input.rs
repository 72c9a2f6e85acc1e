//! Keyboard input.
//!
//! Terminals report key presses, not key state.  Instead of acting on each
//! event, `KeyboardInput` records the frame number of the last press/repeat
//! event for every key and treats a key as held while that record is fresh
//! (within `HOLD_WINDOW` frames).  Terminals with keyboard enhancement send
//! real release events, which drop the key at once; classic terminals rely
//! on OS key-repeat refreshing the record before it expires.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::compute::FrameInput;

/// 8 frames @ 60 FPS ≈ 133 ms, always refreshed by OS key-repeat (≥ 15 Hz).
pub const HOLD_WINDOW: u64 = 8;

/// The questions the game loop asks about the player's keys each frame.
pub trait Controls {
    fn left_held(&self) -> bool;
    fn right_held(&self) -> bool;
    /// Confirm was pressed since the previous poll.
    fn confirm_pressed(&self) -> bool;
    fn should_close(&self) -> bool;

    fn frame_input(&self) -> FrameInput {
        FrameInput {
            left: self.left_held(),
            right: self.right_held(),
        }
    }
}

pub struct KeyboardInput {
    rx: Receiver<Event>,
    /// Maps each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    confirm: bool,
    close: bool,
}

impl KeyboardInput {
    /// Dedicate a thread exclusively to blocking event reads, sending them
    /// through a channel so the game loop never blocks on I/O.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(err) => {
                    log::warn!("terminal event reader stopped: {err}");
                    break;
                }
            }
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: Receiver<Event>) -> Self {
        Self {
            rx,
            key_frame: HashMap::new(),
            frame: 0,
            confirm: false,
            close: false,
        }
    }

    /// Drain all pending events (non-blocking).  Call once per frame.
    pub fn poll(&mut self) {
        self.frame += 1;
        self.confirm = false;

        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    self.key_frame.insert(code, self.frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.close = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            self.close = true;
                        }
                        KeyCode::Enter => self.confirm = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }
    }

    /// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
    fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }
}

impl Controls for KeyboardInput {
    fn left_held(&self) -> bool {
        self.is_held(KeyCode::Left)
            || self.is_held(KeyCode::Char('a'))
            || self.is_held(KeyCode::Char('A'))
    }

    fn right_held(&self) -> bool {
        self.is_held(KeyCode::Right)
            || self.is_held(KeyCode::Char('d'))
            || self.is_held(KeyCode::Char('D'))
    }

    fn confirm_pressed(&self) -> bool {
        self.confirm
    }

    fn should_close(&self) -> bool {
        self.close
    }
}
