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

//! A voice is one playing instance of a clip.
//!
//! The handle is cheap to clone: the copy held by the pad and the copy held by the
//! mixer share the same position, finished flag and cancel handle.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::playsync::CancelHandle;

/// Global voice ID counter.
static NEXT_VOICE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone)]
pub struct Voice {
    /// Unique ID for this voice.
    id: u64,
    /// The next frame to be rendered.
    position: Arc<AtomicUsize>,
    /// Set by the renderer once the last frame has been produced.
    finished: Arc<AtomicBool>,
    /// Stops the voice without touching the mixer.
    cancel_handle: CancelHandle,
}

impl Voice {
    /// Creates a new voice positioned at the first frame.
    pub fn new() -> Voice {
        Voice {
            id: NEXT_VOICE_ID.fetch_add(1, Ordering::Relaxed),
            position: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicBool::new(false)),
            cancel_handle: CancelHandle::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the next frame the voice will render.
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    /// Moves the voice forward by the given number of frames.
    pub fn advance(&self, frames: usize) {
        self.position.fetch_add(frames, Ordering::AcqRel);
    }

    /// Stops the voice. The mixer drops it on its next pass.
    pub fn stop(&self) {
        self.cancel_handle.cancel();
    }

    /// Marks the voice as having played to the end.
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel_handle.is_cancelled()
    }

    /// Returns true while the voice is still producing audio.
    pub fn is_active(&self) -> bool {
        !self.is_finished() && !self.is_stopped()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Voice::new()
    }
}

impl std::fmt::Debug for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Voice")
            .field("id", &self.id)
            .field("position", &self.position())
            .field("finished", &self.is_finished())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
