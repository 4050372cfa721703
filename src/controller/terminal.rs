// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event as TerminalEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{debug, span, Level};

use super::Event;
use crate::surface::layout::Layout;

/// How often the driver checks whether the controller is still listening.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A driver reading key presses and mouse clicks from a terminal in raw mode.
pub struct Driver {
    layout: Layout,
}

impl Driver {
    /// The layout is used to find which pad a mouse click landed on.
    pub fn new(layout: Layout) -> Driver {
        Driver { layout }
    }

    /// Translates a terminal event. Only key presses and left button clicks on a pad
    /// matter; releases, repeats, resizes and the rest are dropped.
    fn translate(layout: &Layout, event: TerminalEvent) -> Option<Event> {
        match event {
            TerminalEvent::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Esc => Some(Event::Quit),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Event::Quit),
                KeyCode::Char(c) => Some(Event::Key(c.to_string())),
                other => Some(Event::Key(format!("{:?}", other))),
            },
            TerminalEvent::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => layout
                .hit_test(column, row)
                .map(|cell| Event::Activate(cell.sound_id.clone())),
            _ => None,
        }
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        let layout = self.layout.clone();
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "terminal driver");
            let _enter = span.enter();

            debug!("Terminal driver started.");

            while !events_tx.is_closed() {
                if !event::poll(POLL_INTERVAL)? {
                    continue;
                }
                let Some(event) = Self::translate(&layout, event::read()?) else {
                    continue;
                };
                if events_tx.blocking_send(event).is_err() {
                    break;
                }
            }

            debug!("Terminal driver stopped.");
            Ok(())
        })
    }
}

#[cfg(test)]
mod test {
    use crossterm::event::KeyEventState;

    use super::*;
    use crate::pads::PadRegistry;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> TerminalEvent {
        TerminalEvent::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> TerminalEvent {
        TerminalEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_events() {
        let layout = Layout::new(&PadRegistry::builtin());
        let press = |code| Driver::translate(&layout, key(code, KeyModifiers::NONE, KeyEventKind::Press));

        assert_eq!(Some(Event::Key("q".to_string())), press(KeyCode::Char('q')));
        assert_eq!(Some(Event::Key("1".to_string())), press(KeyCode::Char('1')));
        assert_eq!(Some(Event::Key("Enter".to_string())), press(KeyCode::Enter));
        assert_eq!(Some(Event::Quit), press(KeyCode::Esc));
        assert_eq!(
            Some(Event::Quit),
            Driver::translate(
                &layout,
                key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press)
            )
        );

        for kind in [KeyEventKind::Release, KeyEventKind::Repeat] {
            assert_eq!(
                None,
                Driver::translate(&layout, key(KeyCode::Char('q'), KeyModifiers::NONE, kind))
            );
        }
    }

    #[test]
    fn test_mouse_events() {
        let layout = Layout::new(&PadRegistry::builtin());
        let x = layout.cell('X').expect("missing pad").clone();

        assert_eq!(
            Some(Event::Activate("RP4_KICK_1".to_string())),
            Driver::translate(&layout, click(MouseEventKind::Down(MouseButton::Left), x.x + 1, x.y + 1))
        );
        assert_eq!(
            None,
            Driver::translate(&layout, click(MouseEventKind::Down(MouseButton::Right), x.x, x.y))
        );
        assert_eq!(
            None,
            Driver::translate(&layout, click(MouseEventKind::Up(MouseButton::Left), x.x, x.y))
        );
        assert_eq!(
            None,
            Driver::translate(&layout, click(MouseEventKind::Down(MouseButton::Left), 0, 0))
        );
        assert_eq!(None, Driver::translate(&layout, TerminalEvent::Resize(80, 24)));
    }
}
