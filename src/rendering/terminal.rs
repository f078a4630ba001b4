//! A frame sink that writes to a terminal using `crossterm`.
//!
//! Each frame cell becomes one terminal character. Colors are resolved to 24-bit RGB,
//! translucent backgrounds are blended over a default background color, and the foreground is
//! blended over the resolved background. Cursor moves and color changes are only emitted when
//! they are needed.

use crate::rendering::color::{Color, Rgba64, ToneMapping};
use crate::rendering::frame::Frame;
use crate::rendering::renderer::{Renderer, TileMetrics};
use crossterm::queue;
use crossterm::style::{self, Colors};
use crossterm::terminal::{self, ClearType};
use log::trace;
use std::io;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

/// Renders frames to a terminal, or to any other [`Write`] sink.
///
/// Tile metrics are ignored: a terminal character is always one tile.
pub struct TerminalRenderer<W: Write> {
    sink: W,
    tone_mapping: ToneMapping,
    default_bg_color: Rgba64,
    last_fg_color: Option<[u8; 3]>,
    last_bg_color: Option<[u8; 3]>,
    /// Where the terminal cursor is, if known.
    cursor: Option<(u16, u16)>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a new `TerminalRenderer` with a custom output sink.
    ///
    /// Allows rendering to targets such as `stdout`, files, or in-memory buffers.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            tone_mapping: ToneMapping::default(),
            default_bg_color: Rgba64::BLACK,
            last_fg_color: None,
            last_bg_color: None,
            cursor: None,
        }
    }

    /// Set the color translucent backgrounds are blended over. Works on the next frame.
    pub fn set_default_bg_color(&mut self, color: Rgba64) {
        self.default_bg_color = color.with_alpha(u16::MAX);
    }

    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        self.tone_mapping = tone_mapping;
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Forgets the cursor position and the active colors, e.g. after something else wrote to
    /// the terminal.
    pub fn forget_state(&mut self) {
        self.cursor = None;
        self.last_fg_color = None;
        self.last_bg_color = None;
    }

    fn resolve(&self, fg: Color, bg: Color) -> ([u8; 3], [u8; 3]) {
        let bg = bg.to_rgba64_with(self.tone_mapping).over(self.default_bg_color);
        let fg = fg.to_rgba64_with(self.tone_mapping).over(bg);
        (fg.to_rgb8(), bg.to_rgb8())
    }
}

fn rgb([r, g, b]: [u8; 3]) -> style::Color {
    style::Color::Rgb { r, g, b }
}

fn to_column(v: usize) -> io::Result<u16> {
    u16::try_from(v).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("position {v} is out of terminal range"),
        )
    })
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_frame(&mut self, frame: &Frame, _tiles: TileMetrics) -> io::Result<()> {
        let mut moves = 0;
        for frame_cell in frame {
            let cell = frame_cell.cell;
            let x = to_column(frame_cell.position.x)?;
            let y = to_column(frame_cell.position.y)?;
            if self.cursor != Some((x, y)) {
                queue!(self.sink, crossterm::cursor::MoveTo(x, y))?;
                moves += 1;
            }

            let (fg, bg) = self.resolve(cell.fg, cell.bg);
            let mut colors = Colors {
                foreground: None,
                background: None,
            };
            if self.last_fg_color != Some(fg) {
                colors.foreground = Some(rgb(fg));
                self.last_fg_color = Some(fg);
            }
            if self.last_bg_color != Some(bg) {
                colors.background = Some(rgb(bg));
                self.last_bg_color = Some(bg);
            }
            if colors.foreground.is_some() || colors.background.is_some() {
                queue!(self.sink, style::SetColors(colors))?;
            }

            let glyph = if cell.glyph.is_control() {
                ' '
            } else {
                cell.glyph
            };
            queue!(self.sink, style::Print(glyph))?;
            // wide and zero-width glyphs leave the cursor somewhere we cannot rely on
            self.cursor = match glyph.width() {
                Some(1) => x.checked_add(1).map(|next| (next, y)),
                _ => None,
            };
        }
        self.sink.flush()?;
        trace!("wrote {} cells with {moves} cursor moves", frame.len());
        Ok(())
    }

    fn clear(&mut self, color: Rgba64) -> io::Result<()> {
        let bg = color.over(self.default_bg_color).to_rgb8();
        queue!(
            self.sink,
            style::SetBackgroundColor(rgb(bg)),
            terminal::Clear(ClearType::All)
        )?;
        self.last_bg_color = Some(bg);
        self.cursor = None;
        Ok(())
    }
}
