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

//! The fixed table of drum pads.
//!
//! Each pad binds one uppercase letter to a sound identifier. The order of the
//! registry is the on-screen order of the pads.

use std::collections::HashSet;
use std::fmt;

/// The compiled-in pad table: trigger key and sound identifier, in layout order.
const BUILTIN_PADS: [(char, &str); 9] = [
    ('Q', "Heater-1"),
    ('W', "Cev_H2"),
    ('E', "Chord_1"),
    ('A', "Dry_Ohh"),
    ('S', "Bld_H1"),
    ('D', "punchy_kick_1"),
    ('Z', "side_stick_1"),
    ('X', "RP4_KICK_1"),
    ('C', "Brk_Snr"),
];

/// Errors produced while building a pad registry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PadError {
    #[error("pad key {0:?} is not a single uppercase letter")]
    InvalidKey(char),

    #[error("pad key {0} is used by more than one pad")]
    DuplicateKey(char),

    #[error("pad {0} has no sound identifier")]
    EmptySoundId(char),
}

/// One pad: the key that triggers it, what it's labelled on screen, and the sound it plays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadDefinition {
    key: char,
    label: String,
    sound_id: String,
}

impl PadDefinition {
    /// Creates a pad definition. The key must be an uppercase ASCII letter.
    pub fn new(key: char, label: &str, sound_id: &str) -> Result<PadDefinition, PadError> {
        if !key.is_ascii_uppercase() {
            return Err(PadError::InvalidKey(key));
        }
        if sound_id.is_empty() {
            return Err(PadError::EmptySoundId(key));
        }

        Ok(PadDefinition {
            key,
            label: label.to_string(),
            sound_id: sound_id.to_string(),
        })
    }

    /// The key that triggers this pad.
    pub fn key(&self) -> char {
        self.key
    }

    /// The text shown on the pad.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The identifier of the sound this pad plays.
    pub fn sound_id(&self) -> &str {
        &self.sound_id
    }
}

impl fmt::Display for PadDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.label, self.sound_id)
    }
}

/// An ordered, immutable set of pads with unique keys.
#[derive(Debug, Clone)]
pub struct PadRegistry {
    pads: Vec<PadDefinition>,
}

impl PadRegistry {
    /// Creates a registry from the given pads, rejecting duplicate keys.
    pub fn new(pads: Vec<PadDefinition>) -> Result<PadRegistry, PadError> {
        let mut seen = HashSet::new();
        for pad in pads.iter() {
            if !seen.insert(pad.key) {
                return Err(PadError::DuplicateKey(pad.key));
            }
        }

        Ok(PadRegistry { pads })
    }

    /// The reference nine-pad drum kit.
    pub fn builtin() -> PadRegistry {
        // The table is fixed and known to be valid, so it bypasses validation.
        PadRegistry {
            pads: BUILTIN_PADS
                .iter()
                .map(|(key, sound_id)| PadDefinition {
                    key: *key,
                    label: key.to_string(),
                    sound_id: sound_id.to_string(),
                })
                .collect(),
        }
    }

    /// Finds the pad bound to the given key. Keys are matched exactly; callers normalize first.
    pub fn lookup_by_key(&self, key: char) -> Option<&PadDefinition> {
        self.pads.iter().find(|pad| pad.key == key)
    }

    /// Finds the pad that plays the given sound.
    pub fn lookup_by_sound_id(&self, sound_id: &str) -> Option<&PadDefinition> {
        self.pads.iter().find(|pad| pad.sound_id == sound_id)
    }

    /// All pads in layout order.
    pub fn all(&self) -> &[PadDefinition] {
        &self.pads
    }

    /// Returns the number of pads.
    pub fn len(&self) -> usize {
        self.pads.len()
    }

    /// Returns true if there are no pads.
    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }
}

impl Default for PadRegistry {
    fn default() -> Self {
        PadRegistry::builtin()
    }
}
