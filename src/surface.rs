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
use crate::display::DisplayText;

pub mod console;
pub mod layout;
#[cfg(test)]
pub mod mock;
pub mod terminal;

/// Where the drum machine's visible state ends up. Mutations are pushed as they
/// happen; nothing is re-rendered from scratch.
pub trait Surface: Send + Sync {
    /// Sets or clears the active marker on the pad bound to the given key.
    fn set_active(&self, key: char, active: bool);

    /// Replaces the display line.
    fn show(&self, text: &DisplayText);
}
