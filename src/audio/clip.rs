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

//! Clip loading and caching.
//!
//! Drum hits are short, so clips are decoded entirely into memory when the machine
//! is built. Triggering a pad never touches the disk.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, info};

const FILE_SCHEME: &str = "file://";

/// Errors produced while loading a clip.
#[derive(Debug, thiserror::Error)]
pub enum ClipError {
    #[error("{0} is a remote locator, clips can only be loaded from local files")]
    Remote(String),

    #[error("unable to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: SymphoniaError,
    },

    #[error("{0} has no audio track")]
    NoAudioTrack(String),

    #[error("{0} contains no audio")]
    Empty(String),
}

/// A decoded clip. The sample data sits behind an Arc so every voice playing the
/// clip shares one copy.
#[derive(Clone)]
pub struct LoadedClip {
    /// The locator the clip was loaded from.
    name: Arc<str>,
    /// Interleaved f32 samples.
    data: Arc<Vec<f32>>,
    channel_count: u16,
    sample_rate: u32,
}

impl LoadedClip {
    /// Creates a clip from interleaved samples.
    pub fn from_samples(
        name: &str,
        samples: Vec<f32>,
        channel_count: u16,
        sample_rate: u32,
    ) -> LoadedClip {
        LoadedClip {
            name: Arc::from(name),
            data: Arc::new(samples),
            channel_count: channel_count.max(1),
            sample_rate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Interleaved sample data.
    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    pub fn channel_count(&self) -> u16 {
        self.channel_count
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.data.len() / self.channel_count as usize
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Returns the memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

impl std::fmt::Debug for LoadedClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedClip")
            .field("name", &self.name)
            .field("channels", &self.channel_count)
            .field("sample_rate", &self.sample_rate)
            .field("frames", &self.frames())
            .finish()
    }
}

/// Loads clips and caches them by locator.
pub struct ClipLoader {
    cache: HashMap<String, LoadedClip>,
    /// Output sample rate. Clips at other rates are converted on load.
    target_sample_rate: u32,
}

impl ClipLoader {
    pub fn new(target_sample_rate: u32) -> ClipLoader {
        ClipLoader {
            cache: HashMap::new(),
            target_sample_rate,
        }
    }

    /// Loads the clip at the given locator, returning the cached copy if there is one.
    pub fn load(&mut self, locator: &str) -> Result<LoadedClip, ClipError> {
        if let Some(clip) = self.cache.get(locator) {
            debug!(locator, "Using cached clip");
            return Ok(clip.clone());
        }

        let path = local_path(locator)?;
        info!(path = ?path, "Loading clip into memory");

        let (samples, channel_count, source_rate) = decode_file(&path)?;
        let samples = if source_rate != self.target_sample_rate {
            debug!(
                source_rate,
                target_rate = self.target_sample_rate,
                "Converting clip sample rate"
            );
            transcode_samples(&samples, channel_count, source_rate, self.target_sample_rate)
        } else {
            samples
        };

        let clip = LoadedClip::from_samples(
            locator,
            samples,
            channel_count,
            self.target_sample_rate,
        );
        info!(
            locator,
            channels = clip.channel_count(),
            duration_ms = clip.duration().as_millis(),
            memory_kb = clip.memory_size() / 1024,
            "Clip loaded"
        );

        self.cache.insert(locator.to_string(), clip.clone());
        Ok(clip)
    }

    /// Returns the total memory used by cached clips.
    pub fn total_memory_usage(&self) -> usize {
        self.cache.values().map(|clip| clip.memory_size()).sum()
    }
}

impl std::fmt::Debug for ClipLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipLoader")
            .field("cached_clips", &self.cache.len())
            .field("target_sample_rate", &self.target_sample_rate)
            .field("total_memory_kb", &(self.total_memory_usage() / 1024))
            .finish()
    }
}

/// Turns a locator into a path on disk. Only plain paths and file:// locators are loadable.
fn local_path(locator: &str) -> Result<PathBuf, ClipError> {
    if let Some(path) = locator.strip_prefix(FILE_SCHEME) {
        return Ok(PathBuf::from(path));
    }
    if locator.contains("://") {
        return Err(ClipError::Remote(locator.to_string()));
    }
    Ok(PathBuf::from(locator))
}

/// Decodes the first audio track of a file into interleaved f32 samples.
/// Returns the samples, the channel count and the file's sample rate.
fn decode_file(path: &Path) -> Result<(Vec<f32>, u16, u32), ClipError> {
    let display = path.display().to_string();
    let decode_error = |source: SymphoniaError| ClipError::Decode {
        path: display.clone(),
        source,
    };

    let file = File::open(path).map_err(|source| ClipError::Io {
        path: display.clone(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_error)?;
    let mut format_reader = probed.format;

    let track = format_reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ClipError::NoAudioTrack(display.clone()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channel_count = track
        .codec_params
        .channels
        .map(|channels| channels.count() as u16)
        .unwrap_or(0);
    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_error)?;

    let mut samples = Vec::new();
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(decode_error(e)),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                channel_count = spec.channels.count() as u16;
                sample_rate = spec.rate;

                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            // A corrupt frame is skipped, the rest of the clip is still usable.
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(path = %path.display(), error = e, "Skipping undecodable packet");
            }
            Err(e) => return Err(decode_error(e)),
        }
    }

    if samples.is_empty() || channel_count == 0 {
        return Err(ClipError::Empty(display));
    }

    Ok((samples, channel_count, sample_rate))
}

/// Converts interleaved samples between sample rates using linear interpolation,
/// which is plenty for one-shot drum hits.
fn transcode_samples(
    samples: &[f32],
    channel_count: u16,
    source_rate: u32,
    target_rate: u32,
) -> Vec<f32> {
    if source_rate == 0 || target_rate == 0 {
        return samples.to_vec();
    }

    let channels = channel_count.max(1) as usize;
    let ratio = target_rate as f64 / source_rate as f64;
    let source_frames = samples.len() / channels;
    let target_frames = (source_frames as f64 * ratio).ceil() as usize;

    let mut output = Vec::with_capacity(target_frames * channels);
    for target_frame in 0..target_frames {
        let source_pos = target_frame as f64 / ratio;
        let source_frame = source_pos.floor() as usize;
        let frac = source_pos.fract() as f32;

        for channel in 0..channels {
            let s0 = samples
                .get(source_frame * channels + channel)
                .copied()
                .unwrap_or(0.0);
            let s1 = samples
                .get((source_frame + 1) * channels + channel)
                .copied()
                .unwrap_or(s0);
            output.push(s0 + (s1 - s0) * frac);
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_wav;

    #[test]
    fn test_local_path() {
        assert_eq!(
            PathBuf::from("/srv/drums/Heater-1.mp3"),
            local_path("/srv/drums/Heater-1.mp3").expect("plain path rejected")
        );
        assert_eq!(
            PathBuf::from("/srv/drums/Heater-1.mp3"),
            local_path("file:///srv/drums/Heater-1.mp3").expect("file locator rejected")
        );
        assert!(matches!(
            local_path("https://s3.amazonaws.com/freecodecamp/drums/Heater-1.mp3"),
            Err(ClipError::Remote(_))
        ));
    }

    #[test]
    fn test_load_wav() -> Result<(), Box<dyn std::error::Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("Heater-1.wav");
        write_wav(path.clone(), vec![vec![1_i16, 2, 3, 4]], 44100)?;

        let mut loader = ClipLoader::new(44100);
        let locator = path.to_string_lossy().to_string();
        let clip = loader.load(&locator)?;

        assert_eq!(1, clip.channel_count());
        assert_eq!(44100, clip.sample_rate());
        assert_eq!(4, clip.frames());
        assert_eq!(locator, clip.name());
        assert!(clip.samples()[0] > 0.0);

        // A second load is served from the cache, sharing the same data.
        let cached = loader.load(&locator)?;
        assert!(Arc::ptr_eq(&clip.data, &cached.data));
        assert_eq!(clip.memory_size(), loader.total_memory_usage());
        Ok(())
    }

    #[test]
    fn test_load_converts_sample_rate() -> Result<(), Box<dyn std::error::Error>> {
        let tempdir = tempfile::tempdir()?;
        let path = tempdir.path().join("Cev_H2.wav");
        write_wav(path.clone(), vec![vec![1000_i16; 441]], 44100)?;

        let mut loader = ClipLoader::new(48000);
        let clip = loader.load(&path.to_string_lossy())?;

        assert_eq!(48000, clip.sample_rate());
        assert!((480..=481).contains(&clip.frames()));
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        let mut loader = ClipLoader::new(44100);
        assert!(matches!(
            loader.load("/definitely/not/here/Chord_1.mp3"),
            Err(ClipError::Io { .. })
        ));
        assert_eq!(0, loader.total_memory_usage());
    }

    #[test]
    fn test_transcode_samples() {
        let source: Vec<f32> = (0..4410)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();

        let result = transcode_samples(&source, 1, 44100, 48000);
        assert!((4800..=4801).contains(&result.len()));
        assert!(result.iter().all(|s| s.abs() <= 1.0));

        // Stereo keeps channels interleaved.
        let stereo = vec![0.0, 1.0, 0.0, 1.0];
        let result = transcode_samples(&stereo, 2, 22050, 44100);
        assert_eq!(8, result.len());
        assert!(result.chunks(2).all(|frame| frame[0] == 0.0 && frame[1] == 1.0));
    }

    #[test]
    fn test_clip_duration() {
        let clip = LoadedClip::from_samples("test", vec![0.0; 44100 * 2], 2, 44100);
        assert_eq!(44100, clip.frames());
        assert_eq!(Duration::from_secs(1), clip.duration());
    }
}
