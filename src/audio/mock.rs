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
use std::{error::Error, fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::info;

#[cfg(test)]
use tracing::debug;

use crate::audio::{LoadedClip, Voice};

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// A mock device. Doesn't actually play anything; voices stay where they are until a
/// test moves them along.
#[derive(Clone)]
pub struct Device {
    name: String,
    /// Every clip played so far, with the voice it was given.
    plays: Arc<Mutex<Vec<(String, Voice)>>>,
}

impl Device {
    /// Gets the given mock device.
    pub fn get(name: &str) -> Device {
        Device {
            name: name.to_string(),
            plays: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the clip names and voices of every play, oldest first.
    #[cfg(test)]
    pub fn plays(&self) -> Vec<(String, Voice)> {
        self.plays.lock().clone()
    }

    /// Returns the voices that haven't been stopped or finished.
    #[cfg(test)]
    pub fn active_voices(&self) -> Vec<Voice> {
        self.plays
            .lock()
            .iter()
            .filter(|(_, voice)| voice.is_active())
            .map(|(_, voice)| voice.clone())
            .collect()
    }

    /// Moves every active voice forward, as if the output had rendered `frames` frames.
    #[cfg(test)]
    pub fn render(&self, frames: usize) {
        for voice in self.active_voices() {
            voice.advance(frames);
        }
        debug!(device = self.name, frames, "Rendered frames");
    }
}

impl crate::audio::Device for Device {
    fn play(&self, clip: &LoadedClip) -> Result<Voice, Box<dyn Error>> {
        let voice = Voice::new();
        info!(
            device = self.name,
            clip = clip.name(),
            voice = voice.id(),
            "Playing clip."
        );
        self.plays
            .lock()
            .push((clip.name().to_string(), voice.clone()));
        Ok(voice)
    }

    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<Device>, Box<dyn Error>> {
        Ok(Arc::new(self.clone()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name,)
    }
}
