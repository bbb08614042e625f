//! Terminal front end built on crossterm.
//!
//! [`TerminalRenderer`] draws the board on the alternate screen, one cell
//! per grid point, and repaints single cells on every draw or erase.
//! [`TerminalEvents`] turns mouse presses and quit keys into input events
//! using the same cell layout.

use std::io::{self, Stdout, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::style::{Color as TermColor, Print, PrintStyledContent, Stylize};
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};

use crate::constants::{TERM_ORIGIN_X, TERM_ORIGIN_Y, TERM_SPACING_X, TERM_SPACING_Y};
use crate::error::Result;
use crate::input::{EventSource, InputEvent, PointerButton};
use crate::render::{Canvas, GridTransform, Marker, Paint, Renderer};
use crate::rules::Point;

/// Cell layout shared by the renderer and the event source.
pub fn terminal_transform(size: usize) -> GridTransform {
    GridTransform {
        size,
        origin: (TERM_ORIGIN_X, TERM_ORIGIN_Y),
        spacing: (TERM_SPACING_X, TERM_SPACING_Y),
    }
}

pub struct TerminalRenderer {
    canvas: Canvas,
    transform: GridTransform,
    out: Stdout,
    active: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            canvas: Canvas::default(),
            transform: terminal_transform(0),
            out: io::stdout(),
            active: false,
        }
    }

    fn paint_cell(&mut self, point: Point) -> io::Result<()> {
        let (cx, cy) = self.transform.to_surface(point);
        let glyph = match self.canvas.marker(point) {
            Some(Marker {
                paint: Paint::Black,
                ..
            }) => "●".with(TermColor::Black).on(TermColor::DarkYellow),
            Some(Marker {
                paint: Paint::White,
                ..
            }) => "●".with(TermColor::White).on(TermColor::DarkYellow),
            Some(Marker {
                paint: Paint::Candidate,
                ..
            }) => "·".with(TermColor::Blue).on(TermColor::DarkYellow),
            None => "+".with(TermColor::DarkGrey).on(TermColor::DarkYellow),
        };
        queue!(self.out, MoveTo(cx as u16, cy as u16), PrintStyledContent(glyph))
    }
}

impl Renderer for TerminalRenderer {
    fn initialize(&mut self, size: usize) -> Result<()> {
        if !self.active {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
            self.active = true;
        }
        self.canvas.initialize(size)?;
        self.transform = terminal_transform(size);
        queue!(self.out, Clear(ClearType::All))?;
        for y in 1..=size {
            for x in 1..=size {
                self.paint_cell((x, y))?;
            }
        }
        let footer = (TERM_ORIGIN_Y + TERM_SPACING_Y * (size as f64 + 2.0)) as u16;
        queue!(
            self.out,
            MoveTo(0, footer),
            Print("click an empty point to play, q to quit")
        )?;
        self.present()
    }

    fn draw(&mut self, point: Point, marker: Marker) -> Result<()> {
        self.canvas.draw(point, marker)?;
        self.paint_cell(point)?;
        Ok(())
    }

    fn erase(&mut self, point: Point) -> Result<()> {
        self.canvas.erase(point)?;
        self.paint_cell(point)?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.canvas.save_snapshot(path)
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if self.active {
            let _ = execute!(self.out, DisableMouseCapture, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

/// Mouse and keyboard events from the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl TerminalEvents {
    fn translate(ev: Event) -> Option<InputEvent> {
        match ev {
            Event::Mouse(m) => match m.kind {
                MouseEventKind::Down(button) => Some(InputEvent::PointerPress {
                    button: match button {
                        MouseButton::Left => PointerButton::Primary,
                        MouseButton::Right => PointerButton::Secondary,
                        MouseButton::Middle => PointerButton::Middle,
                    },
                    x: m.column as f64,
                    y: m.row as f64,
                }),
                _ => None,
            },
            Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
                KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(InputEvent::Quit)
                }
                _ => None,
            },
            _ => None,
        }
    }
}

impl EventSource for TerminalEvents {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Self::translate(event::read()?))
    }

    fn pending(&mut self) -> Result<Option<InputEvent>> {
        // skip events with no meaning here (releases, resizes) without stopping
        while event::poll(Duration::ZERO)? {
            if let Some(ev) = Self::translate(event::read()?) {
                return Ok(Some(ev));
            }
        }
        Ok(None)
    }
}
