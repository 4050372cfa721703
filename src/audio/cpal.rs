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
use std::{error::Error, fmt, thread};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info, span, Level};

use crate::audio::mixer::{ActiveSource, AudioMixer};
use crate::audio::{Device as AudioDevice, LoadedClip, Voice};
use crate::config;

/// Pre-allocated mix buffer size, in samples. Grown on demand if a callback asks for more.
const SCRATCH_SAMPLES: usize = 8192;

/// A small wrapper around a cpal::Device.
pub struct Device {
    /// The name of the device.
    name: String,
    /// The maximum number of channels the device supports.
    max_channels: u16,
    /// The host ID of the device.
    host_id: cpal::HostId,
    /// The underlying cpal device.
    device: cpal::Device,
    /// The running output stream. Devices produced by listing have none.
    output: Option<OutputManager>,
}

/// Owns the thread that keeps the cpal stream alive. New voices are handed to the
/// audio callback over a channel; the callback owns the mixer.
struct OutputManager {
    /// Channel for sending new voices to the audio callback.
    source_tx: crossbeam_channel::Sender<ActiveSource>,
    /// Dropping this tells the output thread to tear the stream down.
    shutdown_tx: Option<crossbeam_channel::Sender<()>>,
    /// Handle to the output thread.
    output_thread: Option<thread::JoinHandle<()>>,
    /// The stream's sample rate.
    sample_rate: u32,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

impl Drop for OutputManager {
    fn drop(&mut self) {
        // Closing the shutdown channel releases the output thread.
        drop(self.shutdown_tx.take());
        if let Some(thread) = self.output_thread.take() {
            let _ = thread.join();
        }
    }
}

/// Builds an output stream whose callback drains new voices, mixes, and converts to the
/// device's sample type.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: AudioMixer,
    source_rx: crossbeam_channel::Receiver<ActiveSource>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::Sample + cpal::FromSample<f32>,
{
    let num_channels = config.channels.max(1) as usize;
    let mut scratch = vec![0.0f32; SCRATCH_SAMPLES];

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(source) = source_rx.try_recv() {
                mixer.add_source(source);
            }

            if scratch.len() < data.len() {
                scratch.resize(data.len(), 0.0);
            }
            let mixed = &mut scratch[..data.len()];
            mixer.process_into_output(mixed, data.len() / num_channels);

            for (dst, &src) in data.iter_mut().zip(mixed.iter()) {
                *dst = T::from_sample(src);
            }
        },
        |err| error!("CPAL output stream error: {}", err),
        None,
    )
}

impl OutputManager {
    /// Starts the output thread and waits until the stream is playing.
    fn start(device: cpal::Device, volume: f32) -> Result<OutputManager, Box<dyn Error>> {
        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let stream_config: cpal::StreamConfig = supported.config();
        let sample_rate = stream_config.sample_rate.0;

        let (source_tx, source_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded::<Result<(), String>>(1);

        let output_thread = thread::spawn(move || {
            let span = span!(Level::INFO, "audio output (cpal)");
            let _enter = span.enter();

            let mixer = AudioMixer::new(stream_config.channels, sample_rate).with_gain(volume);
            let stream_result = match sample_format {
                cpal::SampleFormat::F32 => {
                    build_stream::<f32>(&device, &stream_config, mixer, source_rx)
                }
                cpal::SampleFormat::I16 => {
                    build_stream::<i16>(&device, &stream_config, mixer, source_rx)
                }
                cpal::SampleFormat::I32 => {
                    build_stream::<i32>(&device, &stream_config, mixer, source_rx)
                }
                cpal::SampleFormat::U16 => {
                    build_stream::<u16>(&device, &stream_config, mixer, source_rx)
                }
                other => {
                    let _ = ready_tx.send(Err(format!("unsupported sample format {:?}", other)));
                    return;
                }
            };

            let stream = match stream_result {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("failed to create CPAL stream: {}", e)));
                    return;
                }
            };
            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(format!("failed to start CPAL stream: {}", e)));
                return;
            }

            info!(
                channels = stream_config.channels,
                sample_rate,
                format = format!("{:?}", sample_format),
                "CPAL output stream started"
            );
            let _ = ready_tx.send(Ok(()));

            // Blocks until the manager drops the sender. The stream lives until then.
            let _ = shutdown_rx.recv();
            drop(stream);
            info!("CPAL output stream stopped");
        });

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = output_thread.join();
                return Err(e.into());
            }
            Err(_) => {
                let _ = output_thread.join();
                return Err("audio output thread exited before the stream started".into());
            }
        }

        Ok(OutputManager {
            source_tx,
            shutdown_tx: Some(shutdown_tx),
            output_thread: Some(output_thread),
            sample_rate,
        })
    }
}

impl Device {
    /// Lists cpal devices and produces the Device trait.
    pub fn list() -> Result<Vec<Box<dyn AudioDevice>>, Box<dyn Error>> {
        Ok(Device::list_cpal_devices()?
            .into_iter()
            .map(|device| {
                let device: Box<dyn AudioDevice> = Box::new(device);
                device
            })
            .collect())
    }

    /// Lists cpal devices that have at least one output channel.
    fn list_cpal_devices() -> Result<Vec<Device>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<Device> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.output_devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                let max_channels = match device.supported_output_configs() {
                    Ok(configs) => configs.map(|config| config.channels()).max().unwrap_or(0),
                    Err(_) => continue,
                };

                if max_channels > 0 {
                    devices.push(Device {
                        name: device.name()?,
                        max_channels,
                        host_id,
                        device,
                        output: None,
                    })
                }
            }
        }

        devices.sort_by_key(|device| device.name.to_string());
        Ok(devices)
    }

    /// Gets the configured cpal device and starts its output stream. The name "default"
    /// picks the default host's default output device.
    pub fn get(config: &config::Audio) -> Result<Device, Box<dyn Error>> {
        let name = config.device();
        let mut device = if name == config::DEFAULT_AUDIO_DEVICE {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or("no default output device found")?;
            let max_channels = device
                .supported_output_configs()?
                .map(|config| config.channels())
                .max()
                .unwrap_or(0);
            Device {
                name: device.name()?,
                max_channels,
                host_id: host.id(),
                device,
                output: None,
            }
        } else {
            Device::list_cpal_devices()?
                .into_iter()
                .find(|device| device.name.trim() == name)
                .ok_or_else(|| format!("no device found with name {}", name))?
        };

        device.output = Some(OutputManager::start(
            device.device.clone(),
            config.volume(),
        )?);
        info!(device = device.name, "Audio device ready");

        Ok(device)
    }
}

impl AudioDevice for Device {
    fn play(&self, clip: &LoadedClip) -> Result<Voice, Box<dyn Error>> {
        let output = self
            .output
            .as_ref()
            .ok_or("audio output is not running")?;

        let voice = Voice::new();
        output
            .source_tx
            .send(ActiveSource {
                voice: voice.clone(),
                clip: clip.clone(),
            })
            .map_err(|_| "audio output has stopped")?;

        Ok(voice)
    }

    fn sample_rate(&self) -> u32 {
        self.output
            .as_ref()
            .map(|output| output.sample_rate)
            .unwrap_or(crate::audio::mock::DEFAULT_SAMPLE_RATE)
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<std::sync::Arc<super::mock::Device>, Box<dyn Error>> {
        Err("not a mock".into())
    }
}
