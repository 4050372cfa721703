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
use std::{error::Error, fs::File, path::PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes 16 bit integer PCM to a wav file. Each inner vector is one channel;
/// channels are interleaved frame by frame.
pub fn write_wav(
    path: PathBuf,
    channels: Vec<Vec<i16>>,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let num_channels = channels.len();
    if num_channels == 0 || num_channels > u16::MAX.into() {
        return Err(format!("unsupported channel count {}", num_channels).into());
    }
    let frames = channels.iter().map(|channel| channel.len()).max().unwrap_or(0);

    let mut writer = WavWriter::new(
        File::create(path)?,
        WavSpec {
            channels: num_channels as u16,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for frame in 0..frames {
        for channel in &channels {
            writer.write_sample(channel.get(frame).copied().unwrap_or(0))?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Writes a short mono click for every sound identifier into the directory, named
/// `<sound_id>.<extension>` so a sound base pointing at the directory finds them.
pub fn write_kit(
    dir: &std::path::Path,
    sound_ids: &[&str],
    extension: &str,
) -> Result<(), Box<dyn Error>> {
    for sound_id in sound_ids {
        let samples: Vec<i16> = (0..441).map(|i| ((i % 50) * 400) as i16).collect();
        write_wav(
            dir.join(format!("{}.{}", sound_id, extension)),
            vec![samples],
            44100,
        )?;
    }
    Ok(())
}
