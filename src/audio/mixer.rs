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
// Sums every playing voice into the output buffer. The mixer is owned by the audio
// callback, so nothing in here takes a lock.
use crate::audio::clip::LoadedClip;
use crate::audio::voice::Voice;

/// A voice paired with the clip it renders.
pub struct ActiveSource {
    pub voice: Voice,
    pub clip: LoadedClip,
}

pub struct AudioMixer {
    /// Voices currently playing.
    sources: Vec<ActiveSource>,
    /// Number of output channels.
    num_channels: u16,
    sample_rate: u32,
    /// Linear gain applied to every voice.
    gain: f32,
}

impl AudioMixer {
    /// Creates a new audio mixer.
    pub fn new(num_channels: u16, sample_rate: u32) -> Self {
        Self {
            sources: Vec::new(),
            num_channels: num_channels.max(1),
            sample_rate,
            gain: 1.0,
        }
    }

    /// Sets the gain applied to every voice.
    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Adds a new voice to the mix.
    pub fn add_source(&mut self, source: ActiveSource) {
        self.sources.push(source);
    }

    /// Returns the number of voices still in the mix.
    pub fn active_count(&self) -> usize {
        self.sources.len()
    }

    pub fn num_channels(&self) -> u16 {
        self.num_channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Mixes `num_frames` interleaved frames into the start of `output`. Stopped voices
    /// are dropped before mixing; voices that reach their last frame are marked finished
    /// and dropped afterwards.
    pub fn process_into_output(&mut self, output: &mut [f32], num_frames: usize) {
        let num_channels = self.num_channels as usize;
        let num_frames = num_frames.min(output.len() / num_channels);
        let output = &mut output[..num_frames * num_channels];
        output.fill(0.0);

        let gain = self.gain;
        self.sources.retain(|source| {
            if source.voice.is_stopped() {
                return false;
            }

            let clip = &source.clip;
            let total_frames = clip.frames();
            let start = source.voice.position();
            let to_mix = total_frames.saturating_sub(start).min(num_frames);
            let clip_channels = clip.channel_count() as usize;
            let samples = clip.samples();

            for frame in 0..to_mix {
                let input = &samples[(start + frame) * clip_channels..][..clip_channels];
                let out = &mut output[frame * num_channels..][..num_channels];
                if clip_channels == 1 {
                    // Mono clips are spread across every output channel.
                    for sample in out.iter_mut() {
                        *sample += input[0] * gain;
                    }
                } else {
                    for (sample, value) in out.iter_mut().zip(input.iter()) {
                        *sample += value * gain;
                    }
                }
            }

            source.voice.advance(to_mix);
            if start + to_mix >= total_frames {
                source.voice.finish();
                return false;
            }
            true
        });
    }
}

impl std::fmt::Debug for AudioMixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioMixer")
            .field("active_sources", &self.sources.len())
            .field("num_channels", &self.num_channels)
            .field("sample_rate", &self.sample_rate)
            .field("gain", &self.gain)
            .finish()
    }
}
