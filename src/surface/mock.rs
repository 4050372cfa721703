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
use parking_lot::Mutex;

use crate::display::DisplayText;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Active(char, bool),
    Display(String),
}

/// A surface that remembers everything it was asked to do.
#[derive(Default)]
pub struct Recording {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl Recording {
    pub fn new() -> Recording {
        Recording::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().clone()
    }

    /// The marker changes for one pad, oldest first.
    pub fn marker_changes(&self, key: char) -> Vec<bool> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Active(k, active) if *k == key => Some(*active),
                _ => None,
            })
            .collect()
    }

    /// The most recent display line.
    pub fn last_display(&self) -> Option<String> {
        self.events
            .lock()
            .iter()
            .rev()
            .find_map(|event| match event {
                SurfaceEvent::Display(text) => Some(text.clone()),
                _ => None,
            })
    }
}

impl super::Surface for Recording {
    fn set_active(&self, key: char, active: bool) {
        self.events.lock().push(SurfaceEvent::Active(key, active));
    }

    fn show(&self, text: &DisplayText) {
        self.events.lock().push(SurfaceEvent::Display(text.to_string()));
    }
}
