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
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::controller::normalize_key;
use crate::display::Display;
use crate::feedback::Flasher;
use crate::pads::{PadDefinition, PadRegistry};
use crate::playback::PlaybackTrigger;
use crate::sounds::SoundResolver;
use crate::surface::Surface;

/// The drum machine: its pads, their clips, and the state the pads light up.
pub struct DrumMachine {
    registry: PadRegistry,
    resolver: SoundResolver,
    playback: PlaybackTrigger,
    flasher: Flasher,
    display: Display,
}

impl DrumMachine {
    pub fn new(
        registry: PadRegistry,
        resolver: SoundResolver,
        playback: PlaybackTrigger,
        surface: Arc<dyn Surface>,
        flash_duration: Duration,
    ) -> DrumMachine {
        info!(
            pads = registry.len(),
            clips = playback.len(),
            base = resolver.base(),
            "Drum machine ready"
        );
        DrumMachine {
            registry,
            resolver,
            playback,
            flasher: Flasher::new(surface.clone(), flash_duration),
            display: Display::new(surface),
        }
    }

    /// Handles a raw key press. Keys that don't normalize to a pad key, or whose pad
    /// doesn't exist, are ignored.
    pub fn handle_key(&self, raw: &str) -> Option<&PadDefinition> {
        let Some(key) = normalize_key(raw) else {
            debug!(key = raw, "Ignoring key");
            return None;
        };
        let pad = self.registry.lookup_by_key(key)?;
        self.trigger(pad);
        Some(pad)
    }

    /// Handles a direct activation of the pad with the given sound identifier.
    pub fn activate(&self, sound_id: &str) -> Option<&PadDefinition> {
        let Some(pad) = self.registry.lookup_by_sound_id(sound_id) else {
            debug!(sound_id, "Ignoring activation of unknown pad");
            return None;
        };
        self.trigger(pad);
        Some(pad)
    }

    /// Plays the pad's clip from the beginning, lights the pad, and shows its sound
    /// on the display. Must be called from within a tokio runtime.
    pub fn trigger(&self, pad: &PadDefinition) {
        debug!(pad = pad.sound_id(), key = %pad.key(), "Triggered");
        self.playback.trigger(pad);
        self.flasher.flash(pad);
        self.display.show(pad);
    }

    pub fn registry(&self) -> &PadRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &SoundResolver {
        &self.resolver
    }

    pub fn playback(&self) -> &PlaybackTrigger {
        &self.playback
    }

    pub fn flasher(&self) -> &Flasher {
        &self.flasher
    }

    pub fn display(&self) -> &Display {
        &self.display
    }
}

#[cfg(test)]
pub mod test {
    use std::error::Error;

    use super::*;
    use crate::audio::{mock, LoadedClip};
    use crate::feedback::DEFAULT_FLASH_DURATION;
    use crate::playback::DeviceClip;
    use crate::surface::mock::{Recording, SurfaceEvent};

    /// A drum machine with the built-in pads, each bound to a short silent clip
    /// played through the mock device.
    pub fn mock_machine(
        device: Arc<mock::Device>,
        surface: Arc<Recording>,
    ) -> Result<DrumMachine, Box<dyn Error>> {
        let registry = PadRegistry::builtin();
        let resolver = SoundResolver::default();
        let mut playback = PlaybackTrigger::new();
        for pad in registry.all() {
            let clip = LoadedClip::from_samples(
                &resolver.resolve(pad.sound_id()),
                vec![0.0; 4410],
                1,
                mock::DEFAULT_SAMPLE_RATE,
            );
            playback.attach(pad, Arc::new(DeviceClip::new(clip, device.clone())));
        }

        Ok(DrumMachine::new(
            registry,
            resolver,
            playback,
            surface,
            DEFAULT_FLASH_DURATION,
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_q() -> Result<(), Box<dyn Error>> {
        let device = Arc::new(mock::Device::get("mock"));
        let surface = Arc::new(Recording::new());
        let machine = mock_machine(device.clone(), surface.clone())?;

        let pad = machine.handle_key("q").expect("q didn't trigger");
        assert_eq!("Heater-1", pad.sound_id());

        let plays = device.plays();
        assert_eq!(1, plays.len());
        assert_eq!(
            "https://s3.amazonaws.com/freecodecamp/drums/Heater-1.mp3",
            plays[0].0
        );
        assert!(machine.flasher().is_active('Q'));
        assert_eq!(
            Some("Soundname: Heater-1".to_string()),
            machine.display().text()
        );

        tokio::time::sleep(Duration::from_millis(101)).await;
        assert!(!machine.flasher().is_active('Q'));
        assert_eq!(
            vec![
                SurfaceEvent::Active('Q', false),
                SurfaceEvent::Active('Q', true),
                SurfaceEvent::Display("Soundname: Heater-1".to_string()),
                SurfaceEvent::Active('Q', false),
            ],
            surface.events()
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_press_digit_does_nothing() -> Result<(), Box<dyn Error>> {
        let device = Arc::new(mock::Device::get("mock"));
        let surface = Arc::new(Recording::new());
        let machine = mock_machine(device.clone(), surface.clone())?;

        assert!(machine.handle_key("1").is_none());
        assert!(machine.handle_key("P").is_none());
        assert!(machine.handle_key("Shift").is_none());
        assert!(device.plays().is_empty());
        assert!(surface.events().is_empty());
        assert_eq!(None, machine.display().text());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_pads_case_insensitive() -> Result<(), Box<dyn Error>> {
        let device = Arc::new(mock::Device::get("mock"));
        let surface = Arc::new(Recording::new());
        let machine = mock_machine(device.clone(), surface.clone())?;

        let pads: Vec<(char, String)> = machine
            .registry()
            .all()
            .iter()
            .map(|pad| (pad.key(), pad.sound_id().to_string()))
            .collect();
        for (key, sound_id) in pads {
            for raw in [key.to_ascii_lowercase(), key] {
                let pad = machine
                    .handle_key(&raw.to_string())
                    .expect("pad not triggered");
                assert_eq!(sound_id, pad.sound_id());
                assert_eq!(
                    Some(format!("Soundname: {}", sound_id)),
                    machine.display().text()
                );
                assert!(machine.flasher().is_active(key));
            }
        }
        assert_eq!(18, device.plays().len());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_matches_key() -> Result<(), Box<dyn Error>> {
        let key_device = Arc::new(mock::Device::get("mock-key"));
        let key_surface = Arc::new(Recording::new());
        let by_key = mock_machine(key_device.clone(), key_surface.clone())?;

        let click_device = Arc::new(mock::Device::get("mock-click"));
        let click_surface = Arc::new(Recording::new());
        let by_click = mock_machine(click_device.clone(), click_surface.clone())?;

        by_key.handle_key("d");
        by_click.activate("punchy_kick_1");

        assert_eq!(key_surface.events(), click_surface.events());
        assert_eq!(by_key.display().text(), by_click.display().text());
        let names = |device: &mock::Device| -> Vec<String> {
            device.plays().into_iter().map(|(name, _)| name).collect()
        };
        assert_eq!(names(&key_device), names(&click_device));

        assert!(by_click.activate("cowbell").is_none());
        assert_eq!(1, click_device.plays().len());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_retrigger() -> Result<(), Box<dyn Error>> {
        let device = Arc::new(mock::Device::get("mock"));
        let surface = Arc::new(Recording::new());
        let machine = mock_machine(device.clone(), surface.clone())?;
        let pad = machine
            .registry()
            .lookup_by_key('Z')
            .expect("missing pad")
            .clone();
        let handle = machine
            .playback()
            .handle(&pad)
            .expect("missing handle")
            .clone();

        machine.trigger(&pad);
        device.render(2000);
        assert_eq!(2000, handle.position());

        tokio::time::sleep(Duration::from_millis(50)).await;
        machine.trigger(&pad);
        assert_eq!(0, handle.position());
        assert_eq!(1, device.active_voices().len());

        // Still lit 60ms after the second trigger, even though the first flash expired.
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(machine.flasher().is_active('Z'));
        tokio::time::sleep(Duration::from_millis(41)).await;
        assert!(!machine.flasher().is_active('Z'));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_pad_without_clip_still_lights() -> Result<(), Box<dyn Error>> {
        let surface = Arc::new(Recording::new());
        let machine = DrumMachine::new(
            PadRegistry::builtin(),
            SoundResolver::default(),
            PlaybackTrigger::new(),
            surface.clone(),
            DEFAULT_FLASH_DURATION,
        );

        machine.handle_key("c");
        assert!(machine.flasher().is_active('C'));
        assert_eq!(Some("Soundname: Brk_Snr".to_string()), surface.last_display());
        Ok(())
    }
}
