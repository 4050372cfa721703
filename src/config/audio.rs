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
use serde::Deserialize;

use super::error::ConfigError;

/// The device name that selects the system's default output.
pub const DEFAULT_AUDIO_DEVICE: &str = "default";

const DEFAULT_VOLUME: f32 = 1.0;

fn default_device() -> String {
    DEFAULT_AUDIO_DEVICE.to_string()
}

/// A YAML representation of the audio configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct Audio {
    /// The audio device. "default" for the system default, "mock..." for a silent device.
    #[serde(default = "default_device")]
    device: String,

    /// Linear gain applied to every clip (default: 1.0).
    volume: Option<f32>,
}

impl Audio {
    /// New will create a new Audio configuration.
    pub fn new(device: &str) -> Audio {
        Audio {
            device: device.to_string(),
            volume: None,
        }
    }

    /// Returns the device from the configuration.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns the volume (default: 1.0).
    pub fn volume(&self) -> f32 {
        self.volume.unwrap_or(DEFAULT_VOLUME)
    }

    /// Checks that the configured values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let volume = self.volume();
        if !volume.is_finite() || volume < 0.0 {
            return Err(ConfigError::InvalidVolume(volume));
        }
        Ok(())
    }
}

impl Default for Audio {
    fn default() -> Self {
        Audio::new(DEFAULT_AUDIO_DEVICE)
    }
}
