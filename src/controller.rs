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
use std::io;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio::{sync::mpsc::Sender, task::JoinHandle};
use tracing::{debug, error, info, span, Instrument, Level};

use crate::machine::DrumMachine;

pub mod keyboard;
pub mod terminal;

/// Raw input events produced by drivers. Drivers don't filter anything; the
/// controller decides what an event means.
#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    /// A key press, as the driver saw it.
    Key(String),

    /// A direct activation of the pad with the given sound identifier.
    Activate(String),

    /// The user asked to leave.
    Quit,
}

pub trait Driver: Send + Sync + 'static {
    fn monitor_events(&self, events_tx: Sender<Event>) -> JoinHandle<Result<(), io::Error>>;
}

/// Normalizes a raw key to a pad key: the uppercased key, if it is exactly one
/// ASCII letter.
pub fn normalize_key(raw: &str) -> Option<char> {
    let upper = raw.to_uppercase();
    let mut chars = upper.chars();
    match (chars.next(), chars.next()) {
        (Some(key), None) if key.is_ascii_alphabetic() => Some(key),
        _ => None,
    }
}

/// Subscribes a drum machine to a driver's events. The subscription lasts until
/// the controller is unmounted or dropped, the driver closes, or a quit arrives.
pub struct Controller {
    handle: JoinHandle<()>,
}

impl Controller {
    /// Starts delivering the driver's events to the drum machine.
    pub fn mount(machine: Arc<DrumMachine>, driver: Arc<dyn Driver>) -> Controller {
        let span = span!(Level::INFO, "controller");
        Controller {
            handle: tokio::spawn(Controller::dispatch_events(machine, driver).instrument(span)),
        }
    }

    /// Join will block until the controller finishes.
    pub async fn join(&mut self) -> Result<(), JoinError> {
        (&mut self.handle).await
    }

    /// Stops delivering events. The driver sees its channel close.
    pub fn unmount(self) {
        drop(self)
    }

    /// Whether the controller has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Dispatches driver events to the drum machine until the driver closes or a quit
    /// arrives.
    async fn dispatch_events(machine: Arc<DrumMachine>, driver: Arc<dyn Driver>) {
        let (events_tx, mut events_rx) = mpsc::channel(16);
        let join_handle = driver.monitor_events(events_tx);

        info!(pads = machine.registry().len(), "Controller started.");

        while let Some(event) = events_rx.recv().await {
            debug!(event = format!("{:?}", event), "Received event.");

            let pad = match event {
                Event::Key(raw) => machine.handle_key(&raw),
                Event::Activate(sound_id) => machine.activate(&sound_id),
                Event::Quit => {
                    info!("Quit requested.");
                    break;
                }
            };
            if pad.is_none() {
                debug!("Event did not match a pad.");
            }
        }

        // Closing the receiver tells the driver to stop.
        drop(events_rx);
        info!("Controller closing.");
        match join_handle.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(err = e.to_string(), "Event monitor failed"),
            Err(e) => error!(err = e.to_string(), "Error waiting for event monitor to stop"),
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
