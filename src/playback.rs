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
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::audio::{self, LoadedClip, Voice};
use crate::pads::PadDefinition;

/// A playable clip bound to a pad.
pub trait ClipHandle: Send + Sync {
    /// Moves playback back to the first frame. Whatever is currently sounding is cut.
    fn rewind(&self);

    /// Starts playback from the current position.
    fn play(&self) -> Result<(), Box<dyn Error>>;

    /// The current playback position, in frames.
    fn position(&self) -> usize;
}

/// A clip played through an audio device. At most one voice exists per clip: a
/// retrigger cuts the previous voice and starts a fresh one.
pub struct DeviceClip {
    clip: LoadedClip,
    device: Arc<dyn audio::Device>,
    voice: Mutex<Option<Voice>>,
}

impl DeviceClip {
    pub fn new(clip: LoadedClip, device: Arc<dyn audio::Device>) -> DeviceClip {
        DeviceClip {
            clip,
            device,
            voice: Mutex::new(None),
        }
    }

    pub fn clip(&self) -> &LoadedClip {
        &self.clip
    }
}

impl ClipHandle for DeviceClip {
    fn rewind(&self) {
        if let Some(voice) = self.voice.lock().take() {
            voice.stop();
        }
    }

    fn play(&self) -> Result<(), Box<dyn Error>> {
        let mut current = self.voice.lock();
        if let Some(voice) = current.as_ref() {
            if voice.is_active() {
                // Already sounding.
                return Ok(());
            }
        }
        *current = Some(self.device.play(&self.clip)?);
        Ok(())
    }

    fn position(&self) -> usize {
        self.voice
            .lock()
            .as_ref()
            .filter(|voice| !voice.is_stopped())
            .map(|voice| voice.position())
            .unwrap_or(0)
    }
}

/// Maps pads to their clip handles and replays them on trigger.
#[derive(Default)]
pub struct PlaybackTrigger {
    handles: HashMap<char, Arc<dyn ClipHandle>>,
}

impl PlaybackTrigger {
    pub fn new() -> PlaybackTrigger {
        PlaybackTrigger::default()
    }

    /// Binds a clip handle to the pad. A later call for the same pad replaces it.
    pub fn attach(&mut self, pad: &PadDefinition, handle: Arc<dyn ClipHandle>) {
        self.handles.insert(pad.key(), handle);
    }

    /// The handle bound to the pad, if any.
    pub fn handle(&self, pad: &PadDefinition) -> Option<&Arc<dyn ClipHandle>> {
        self.handles.get(&pad.key())
    }

    /// Number of pads with a handle.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Restarts the pad's clip from the beginning. Pads without a handle are
    /// silently skipped, and playback failures are only logged.
    pub fn trigger(&self, pad: &PadDefinition) {
        let Some(handle) = self.handles.get(&pad.key()) else {
            debug!(pad = pad.sound_id(), "No clip attached to pad");
            return;
        };

        handle.rewind();
        if let Err(e) = handle.play() {
            warn!(pad = pad.sound_id(), err = e.to_string(), "Unable to play clip");
        }
    }
}
