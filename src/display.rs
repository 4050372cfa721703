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
use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use crate::pads::PadDefinition;
use crate::surface::Surface;

/// The label that precedes the sound identifier on the display.
pub const DISPLAY_LABEL: &str = "Soundname:";

/// The contents of the display: a fixed label and the identifier of the last sound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayText {
    sound_id: String,
}

impl DisplayText {
    pub fn new(sound_id: &str) -> DisplayText {
        DisplayText {
            sound_id: sound_id.to_string(),
        }
    }

    /// The label part of the text.
    pub fn label(&self) -> &str {
        DISPLAY_LABEL
    }

    /// The emphasized part of the text.
    pub fn sound_id(&self) -> &str {
        &self.sound_id
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", DISPLAY_LABEL, self.sound_id)
    }
}

/// The shared text display. Every trigger overwrites it completely.
pub struct Display {
    current: Mutex<Option<DisplayText>>,
    surface: Arc<dyn Surface>,
}

impl Display {
    /// Creates an empty display.
    pub fn new(surface: Arc<dyn Surface>) -> Display {
        Display {
            current: Mutex::new(None),
            surface,
        }
    }

    /// Replaces the display contents with the pad's sound identifier.
    pub fn show(&self, pad: &PadDefinition) {
        let text = DisplayText::new(pad.sound_id());
        debug!(text = text.to_string(), "Updating display");
        *self.current.lock() = Some(text.clone());
        self.surface.show(&text);
    }

    /// The current display text, if anything has been shown yet.
    pub fn text(&self) -> Option<String> {
        self.current.lock().as_ref().map(|text| text.to_string())
    }
}
