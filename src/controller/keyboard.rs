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

use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{info, span, Level};

use super::Event;

const CLICK: &str = "click";
const QUIT: &str = "quit";

/// A line-oriented driver: every line on stdin is one key press, `click <soundId>`,
/// or `quit`.
pub struct Driver {}

impl Driver {
    pub fn new() -> Driver {
        Driver {}
    }

    /// Turns one line of input into an event. Blank lines produce nothing.
    fn parse_line(line: &str) -> Option<Event> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return None;
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(QUIT), None, None) => Some(Event::Quit),
            (Some(CLICK), Some(sound_id), None) => Some(Event::Activate(sound_id.to_string())),
            _ => Some(Event::Key(line.trim().to_string())),
        }
    }

    /// Reads one line and forwards its event. Returns false once input is exhausted
    /// or the controller has gone away.
    fn monitor_io<R, W>(events_tx: &Sender<Event>, mut reader: R, mut writer: W) -> io::Result<bool>
    where
        R: io::BufRead,
        W: io::Write,
    {
        write!(writer, "Key ({} <sound>, {}): ", CLICK, QUIT)?;
        writer.flush()?;
        let mut input = String::default();
        if reader.read_line(&mut input)? == 0 {
            info!("End of input.");
            return Ok(false);
        }

        let Some(event) = Self::parse_line(&input) else {
            return Ok(true);
        };
        let quit = event == Event::Quit;
        if events_tx.blocking_send(event).is_err() {
            return Ok(false);
        }
        Ok(!quit)
    }
}

impl Default for Driver {
    fn default() -> Self {
        Driver::new()
    }
}

impl super::Driver for Driver {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>> {
        tokio::task::spawn_blocking(move || {
            let span = span!(Level::INFO, "keyboard driver");
            let _enter = span.enter();

            info!("Keyboard driver started.");

            while Self::monitor_io(&events_tx, io::stdin().lock(), io::stdout())? {}
            Ok(())
        })
    }
}
