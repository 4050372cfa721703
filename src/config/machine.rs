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
use std::path::Path;
use std::time::Duration;

use config::{Config, File, FileFormat};
use duration_string::DurationString;
use serde::Deserialize;

use super::audio::Audio;
use super::error::ConfigError;
use crate::feedback::DEFAULT_FLASH_DURATION;
use crate::sounds::DEFAULT_SOUND_BASE;

/// Where the clips are found.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Sounds {
    /// The base location sound identifiers are resolved against.
    base: Option<String>,
}

/// The configuration for the drum machine. Every key is optional.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Machine {
    /// The audio output configuration.
    #[serde(default)]
    audio: Audio,

    /// The clip location configuration.
    #[serde(default)]
    sounds: Sounds,

    /// How long a pad stays lit after it's triggered, e.g. "100ms".
    flash_duration: Option<String>,
}

impl Machine {
    /// Parse a machine configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Machine, ConfigError> {
        Self::checked(
            Config::builder()
                .add_source(File::from(path))
                .build()?
                .try_deserialize::<Machine>()?,
        )
    }

    /// Parse a machine configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Machine, ConfigError> {
        Self::checked(
            Config::builder()
                .add_source(File::from_str(yaml, FileFormat::Yaml))
                .build()?
                .try_deserialize::<Machine>()?,
        )
    }

    fn checked(machine: Machine) -> Result<Machine, ConfigError> {
        machine.audio.validate()?;
        machine.flash_duration()?;
        Ok(machine)
    }

    /// The audio configuration.
    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    /// The base location for clips.
    pub fn sound_base(&self) -> &str {
        self.sounds.base.as_deref().unwrap_or(DEFAULT_SOUND_BASE)
    }

    /// How long a pad stays lit (default: 100ms).
    pub fn flash_duration(&self) -> Result<Duration, ConfigError> {
        match &self.flash_duration {
            Some(value) => Ok(DurationString::from_string(value.clone())
                .map_err(|e| ConfigError::InvalidDuration {
                    value: value.clone(),
                    reason: e.to_string(),
                })?
                .into()),
            None => Ok(DEFAULT_FLASH_DURATION),
        }
    }
}
