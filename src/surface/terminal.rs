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
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Attribute, Print, PrintStyledContent, SetAttribute, Stylize},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use parking_lot::Mutex;
use tracing::warn;

use super::layout::{Cell, Layout, CELL_HEIGHT, CELL_WIDTH};
use crate::display::DisplayText;

const TITLE: &str = "drum-machine (Esc to quit)";

/// Puts the terminal into raw mode on the alternate screen with mouse reporting,
/// and restores it when dropped.
pub struct ScreenGuard {}

impl ScreenGuard {
    pub fn enter() -> io::Result<ScreenGuard> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(ScreenGuard {})
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Draws the pad grid and display line with crossterm.
pub struct Terminal<W: Write + Send = io::Stdout> {
    layout: Layout,
    out: Mutex<W>,
}

impl Terminal<io::Stdout> {
    /// A terminal surface drawing to stdout.
    pub fn stdout(layout: Layout) -> Terminal<io::Stdout> {
        Terminal::new(layout, io::stdout())
    }
}

impl<W: Write + Send> Terminal<W> {
    pub fn new(layout: Layout, out: W) -> Terminal<W> {
        Terminal {
            layout,
            out: Mutex::new(out),
        }
    }

    /// Draws the whole screen with every pad inactive and an empty display.
    pub fn draw(&self) -> io::Result<()> {
        let mut out = self.out.lock();
        queue!(
            out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            PrintStyledContent(TITLE.bold())
        )?;
        for cell in self.layout.cells() {
            draw_cell(&mut *out, cell, false)?;
        }
        queue!(
            out,
            MoveTo(0, self.layout.display_row()),
            Clear(ClearType::UntilNewLine)
        )?;
        out.flush()
    }

    fn draw_active(&self, key: char, active: bool) -> io::Result<()> {
        let Some(cell) = self.layout.cell(key) else {
            return Ok(());
        };
        let mut out = self.out.lock();
        draw_cell(&mut *out, cell, active)?;
        out.flush()
    }

    fn draw_display(&self, text: &DisplayText) -> io::Result<()> {
        let mut out = self.out.lock();
        queue!(
            out,
            MoveTo(0, self.layout.display_row()),
            Clear(ClearType::UntilNewLine),
            Print(text.label()),
            Print(" "),
            PrintStyledContent(text.sound_id().bold())
        )?;
        out.flush()
    }

    #[cfg(test)]
    fn with_output<T>(&self, f: impl FnOnce(&W) -> T) -> T {
        f(&self.out.lock())
    }
}

/// Draws one cell: a blank row, the label, and the sound identifier, each padded
/// to the cell width. Active cells are drawn in reverse video.
fn draw_cell<W: Write>(out: &mut W, cell: &Cell, active: bool) -> io::Result<()> {
    let width = CELL_WIDTH as usize;
    let rows = [
        String::new(),
        format!("[{}]", cell.label),
        cell.sound_id.chars().take(width).collect(),
    ];
    if active {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    for (offset, text) in rows.iter().enumerate().take(CELL_HEIGHT as usize) {
        queue!(
            out,
            MoveTo(cell.x, cell.y + offset as u16),
            Print(format!("{:^width$}", text, width = width))
        )?;
    }
    queue!(out, SetAttribute(Attribute::Reset))
}

impl<W: Write + Send> super::Surface for Terminal<W> {
    fn set_active(&self, key: char, active: bool) {
        if let Err(e) = self.draw_active(key, active) {
            warn!(err = e.to_string(), key = %key, "Unable to draw pad");
        }
    }

    fn show(&self, text: &DisplayText) {
        if let Err(e) = self.draw_display(text) {
            warn!(err = e.to_string(), "Unable to draw display");
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pads::PadRegistry;
    use crate::surface::Surface;

    fn output(terminal: &Terminal<Vec<u8>>) -> String {
        terminal.with_output(|out| String::from_utf8_lossy(out).to_string())
    }

    #[test]
    fn test_draw_grid() -> io::Result<()> {
        let terminal = Terminal::new(Layout::new(&PadRegistry::builtin()), Vec::new());
        terminal.draw()?;

        let drawn = output(&terminal);
        assert!(drawn.contains(TITLE));
        for sound_id in ["Heater-1", "punchy_kick_1", "Brk_Snr"] {
            assert!(drawn.contains(sound_id), "{} not drawn", sound_id);
        }
        assert!(drawn.contains("[Q]"));
        Ok(())
    }

    #[test]
    fn test_display_bolds_identifier() {
        let terminal = Terminal::new(Layout::new(&PadRegistry::builtin()), Vec::new());
        terminal.show(&DisplayText::new("Chord_1"));

        let drawn = output(&terminal);
        let bold = format!("{}", "Chord_1".bold());
        assert!(drawn.contains("Soundname: "));
        assert!(drawn.contains(&bold));
    }

    #[test]
    fn test_active_uses_reverse_video() {
        let terminal = Terminal::new(Layout::new(&PadRegistry::builtin()), Vec::new());
        terminal.set_active('S', true);
        let reverse = format!("{}", SetAttribute(Attribute::Reverse));
        assert!(output(&terminal).contains(&reverse));

        // Keys without a pad draw nothing.
        let terminal = Terminal::new(Layout::new(&PadRegistry::builtin()), Vec::new());
        terminal.set_active('P', true);
        assert!(output(&terminal).is_empty());
    }
}
