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
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::pads::PadDefinition;
use crate::surface::Surface;

/// How long a pad stays lit after a trigger.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_millis(100);

#[derive(Default)]
struct Marker {
    active: bool,
    /// Bumped on every flash. A pending removal only applies to its own flash.
    generation: u64,
}

/// Lights pads briefly when they're triggered.
#[derive(Clone)]
pub struct Flasher {
    markers: Arc<Mutex<HashMap<char, Marker>>>,
    surface: Arc<dyn Surface>,
    duration: Duration,
}

impl Flasher {
    pub fn new(surface: Arc<dyn Surface>, duration: Duration) -> Flasher {
        Flasher {
            markers: Arc::new(Mutex::new(HashMap::new())),
            surface,
            duration,
        }
    }

    /// Lights the pad and schedules it to go dark after the flash duration. Must be
    /// called from within a tokio runtime.
    pub fn flash(&self, pad: &PadDefinition) {
        let key = pad.key();
        let generation = {
            let mut markers = self.markers.lock();
            let marker = markers.entry(key).or_default();
            marker.generation += 1;
            marker.active = true;
            marker.generation
        };

        // Cleared and set again so a pad that's already lit visibly restarts.
        self.surface.set_active(key, false);
        self.surface.set_active(key, true);

        let flasher = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(flasher.duration).await;
            flasher.clear(key, generation);
        });
    }

    /// Clears the marker if no newer flash has happened since `generation`.
    fn clear(&self, key: char, generation: u64) {
        {
            let mut markers = self.markers.lock();
            let Some(marker) = markers.get_mut(&key) else {
                return;
            };
            if marker.generation != generation {
                debug!(key = %key, generation, "Skipping stale marker removal");
                return;
            }
            marker.active = false;
        }
        self.surface.set_active(key, false);
    }

    /// Whether the pad bound to the key is currently lit.
    pub fn is_active(&self, key: char) -> bool {
        self.markers
            .lock()
            .get(&key)
            .map(|marker| marker.active)
            .unwrap_or(false)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
