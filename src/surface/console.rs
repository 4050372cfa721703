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
use std::collections::BTreeSet;
use std::io::{self, Write};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::display::DisplayText;

struct State<W> {
    out: W,
    active: BTreeSet<char>,
}

/// A plain line-oriented surface for line mode. Each display update prints one
/// line, tagged with the pads that are lit at that moment.
pub struct Console<W: Write + Send = io::Stdout> {
    state: Mutex<State<W>>,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Console<io::Stdout> {
        Console::new(io::stdout())
    }
}

impl<W: Write + Send> Console<W> {
    pub fn new(out: W) -> Console<W> {
        Console {
            state: Mutex::new(State {
                out,
                active: BTreeSet::new(),
            }),
        }
    }

    /// Keys whose marker is currently set.
    pub fn active_keys(&self) -> Vec<char> {
        self.state.lock().active.iter().copied().collect()
    }

    #[cfg(test)]
    fn with_output<T>(&self, f: impl FnOnce(&W) -> T) -> T {
        f(&self.state.lock().out)
    }
}

impl<W: Write + Send> super::Surface for Console<W> {
    fn set_active(&self, key: char, active: bool) {
        debug!(key = %key, active, "Pad marker");
        let mut state = self.state.lock();
        if active {
            state.active.insert(key);
        } else {
            state.active.remove(&key);
        }
    }

    fn show(&self, text: &DisplayText) {
        let mut state = self.state.lock();
        let lit: String = state.active.iter().collect();
        let result = if lit.is_empty() {
            writeln!(state.out, "{}", text)
        } else {
            writeln!(state.out, "[{}] {}", lit, text)
        };
        if let Err(e) = result.and_then(|_| state.out.flush()) {
            warn!(err = e.to_string(), "Unable to write display");
        }
    }
}
