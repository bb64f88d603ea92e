use crate::error::Result;
use crate::framebuffer::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH, CHIP8_FRAME_BYTES};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

/// Display is used by the interpreter to put frames on a screen. The
/// interpreter owns the pixels; a Display only ever gets finished frames, so
/// a variety of kinds of screen would work.
pub trait Display {
    /// commit one frame, packed one bit per pixel, row-major
    fn draw(&mut self, data: &[u8]) -> Result<()>;

    /// how big the frame data should be
    fn get_display_size_bytes(&self) -> usize;
}

// store useful metadata about the terminal
struct Resolution(usize, usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn byte_count(&self) -> usize {
        self.0 * self.1 * self.2 / 8
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// coords of every pixel in `data` whose bit equals `bitplane`
    fn bitplane_from_data<'a>(
        &self,
        data: &'a [u8],
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let bit = 1 & (data[count / 8] >> (7 - count % 8));
                if bit == bitplane {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT, 1),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        if let Err(e) = self.terminal.show_cursor() {
            log::warn!("could not restore the cursor: {}", e);
        }
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<()> {
        if data.len() != self.resolution.byte_count() {
            log::warn!(
                "dropping frame of {} bytes, expected {}",
                data.len(),
                self.resolution.byte_count()
            );
            return Ok(());
        }

        // this assumes a 1:1 ratio between terminal cells, chip-8 pixels and
        // the internal TUI canvas
        let resolution = &self.resolution;
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    // only the lit bitplane needs painting; the block is black
                    ctx.draw(&Points {
                        coords: &resolution.bitplane_from_data(data, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn get_display_size_bytes(&self) -> usize {
        self.resolution.byte_count()
    }
}

/// Display that renders nowhere, but remembers what it was given. Useful for
/// headless runs and for testing non-display routines
pub struct NullDisplay {
    frames: usize,
    last: Vec<u8>,
}

impl Default for NullDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl NullDisplay {
    pub fn new() -> NullDisplay {
        NullDisplay {
            frames: 0,
            last: Vec::new(),
        }
    }

    /// how many frames have been committed
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> &[u8] {
        &self.last
    }
}

impl Display for NullDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<()> {
        self.frames += 1;
        self.last.clear();
        self.last.extend_from_slice(data);
        Ok(())
    }

    fn get_display_size_bytes(&self) -> usize {
        CHIP8_FRAME_BYTES
    }
}
