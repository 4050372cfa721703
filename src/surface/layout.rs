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

//! Screen geometry of the pad grid. Rendering and mouse hit-testing share it so
//! a click always lands on the pad that's drawn there.

use crate::pads::PadRegistry;

/// Pads per grid row.
pub const COLUMNS: u16 = 3;
/// Cell width in terminal columns.
pub const CELL_WIDTH: u16 = 15;
/// Cell height in terminal rows.
pub const CELL_HEIGHT: u16 = 3;
/// Blank space between cells.
const GAP: u16 = 1;
/// Rows above the grid, used for the title.
const GRID_TOP: u16 = 2;

/// One pad's rectangle on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub key: char,
    pub label: String,
    pub sound_id: String,
    pub x: u16,
    pub y: u16,
}

impl Cell {
    /// Whether the given screen position falls inside the cell.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && column < self.x + CELL_WIDTH
            && row >= self.y
            && row < self.y + CELL_HEIGHT
    }
}

/// The pad grid, in registry order, row by row.
#[derive(Clone, Debug)]
pub struct Layout {
    cells: Vec<Cell>,
}

impl Layout {
    pub fn new(registry: &PadRegistry) -> Layout {
        let cells = registry
            .all()
            .iter()
            .enumerate()
            .map(|(i, pad)| {
                let i = i as u16;
                Cell {
                    key: pad.key(),
                    label: pad.label().to_string(),
                    sound_id: pad.sound_id().to_string(),
                    x: (i % COLUMNS) * (CELL_WIDTH + GAP),
                    y: GRID_TOP + (i / COLUMNS) * (CELL_HEIGHT + GAP),
                }
            })
            .collect();

        Layout { cells }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Finds the cell for the given key.
    pub fn cell(&self, key: char) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.key == key)
    }

    /// Finds the cell under the given screen position.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.contains(column, row))
    }

    /// The row the display line is drawn on, one blank row below the grid.
    pub fn display_row(&self) -> u16 {
        let rows = (self.cells.len() as u16).div_ceil(COLUMNS);
        GRID_TOP + rows * (CELL_HEIGHT + GAP)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grid_positions() {
        let layout = Layout::new(&PadRegistry::builtin());
        assert_eq!(9, layout.cells().len());

        let q = layout.cell('Q').expect("missing Q");
        assert_eq!((0, GRID_TOP), (q.x, q.y));
        let e = layout.cell('E').expect("missing E");
        assert_eq!((2 * (CELL_WIDTH + GAP), GRID_TOP), (e.x, e.y));
        let a = layout.cell('A').expect("missing A");
        assert_eq!((0, GRID_TOP + CELL_HEIGHT + GAP), (a.x, a.y));

        assert_eq!(GRID_TOP + 3 * (CELL_HEIGHT + GAP), layout.display_row());
    }

    #[test]
    fn test_hit_test() {
        let layout = Layout::new(&PadRegistry::builtin());

        let hit = layout.hit_test(0, GRID_TOP).expect("no hit");
        assert_eq!("Heater-1", hit.sound_id);

        // Bottom right corner of the last cell.
        let c = layout.cell('C').expect("missing C");
        let hit = layout
            .hit_test(c.x + CELL_WIDTH - 1, c.y + CELL_HEIGHT - 1)
            .expect("no hit");
        assert_eq!("Brk_Snr", hit.sound_id);

        // Gaps, the title and the display line hit nothing.
        assert_eq!(None, layout.hit_test(CELL_WIDTH, GRID_TOP));
        assert_eq!(None, layout.hit_test(0, 0));
        assert_eq!(None, layout.hit_test(0, layout.display_row()));
    }
}
