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
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::audio::ClipLoader;
use crate::machine::DrumMachine;
use crate::pads::PadRegistry;
use crate::playback::{DeviceClip, PlaybackTrigger};
use crate::sounds::SoundResolver;
use crate::surface::Surface;

mod audio;
mod error;
mod machine;

pub use self::audio::{Audio, DEFAULT_AUDIO_DEVICE};
pub use error::ConfigError;
pub use machine::Machine;

/// Loads the configuration at the given path, or the defaults if there's no path.
pub fn load(path: Option<&Path>) -> Result<Machine, ConfigError> {
    match path {
        Some(path) => Machine::deserialize(path),
        None => Ok(Machine::default()),
    }
}

/// Builds a drum machine from its configuration: opens the audio device, loads
/// every pad's clip, and wires the machine to the surface. A clip that can't be
/// loaded leaves its pad silent.
pub fn init_drum_machine(
    config: &Machine,
    surface: Arc<dyn Surface>,
) -> Result<DrumMachine, Box<dyn Error>> {
    let device = crate::audio::get_device(config.audio())?;
    info!(device = device.to_string(), "Using audio device");

    let registry = PadRegistry::builtin();
    let resolver = SoundResolver::new(config.sound_base());
    let playback = load_clips(&registry, &resolver, device);

    Ok(DrumMachine::new(
        registry,
        resolver,
        playback,
        surface,
        config.flash_duration()?,
    ))
}

/// Loads the clip for every pad in the registry and binds it to the device.
fn load_clips(
    registry: &PadRegistry,
    resolver: &SoundResolver,
    device: Arc<dyn crate::audio::Device>,
) -> PlaybackTrigger {
    let mut loader = ClipLoader::new(device.sample_rate());
    let mut playback = PlaybackTrigger::new();

    for pad in registry.all() {
        let locator = resolver.resolve(pad.sound_id());
        match loader.load(&locator) {
            Ok(clip) => playback.attach(pad, Arc::new(DeviceClip::new(clip, device.clone()))),
            Err(e) => warn!(
                pad = pad.sound_id(),
                err = e.to_string(),
                "Unable to load clip, pad will be silent"
            ),
        }
    }

    info!(
        loaded = playback.len(),
        pads = registry.len(),
        memory_kb = loader.total_memory_usage() / 1024,
        "Clips loaded"
    );
    playback
}
