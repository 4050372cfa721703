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

/// Where the reference drum kit's clips live.
pub const DEFAULT_SOUND_BASE: &str = "https://s3.amazonaws.com/freecodecamp/drums";

/// Maps sound identifiers to clip locators. Resolution is plain string construction;
/// whether anything exists at the locator is the clip loader's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundResolver {
    base: String,
}

impl SoundResolver {
    /// Creates a resolver rooted at the given base location.
    pub fn new(base: &str) -> SoundResolver {
        SoundResolver {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the locator for the given sound: `<base>/<sound_id>.mp3`.
    pub fn resolve(&self, sound_id: &str) -> String {
        format!("{}/{}.mp3", self.base, sound_id)
    }

    /// The base location.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Default for SoundResolver {
    fn default() -> Self {
        SoundResolver::new(DEFAULT_SOUND_BASE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_resolve_default() {
        let resolver = SoundResolver::default();
        assert_eq!(
            "https://s3.amazonaws.com/freecodecamp/drums/Heater-1.mp3",
            resolver.resolve("Heater-1")
        );
    }

    #[test]
    fn test_resolve_trailing_slash() {
        let resolver = SoundResolver::new("/srv/drums/");
        assert_eq!("/srv/drums", resolver.base());
        assert_eq!("/srv/drums/Brk_Snr.mp3", resolver.resolve("Brk_Snr"));
    }
}
