//! Incremental board rendering.
//!
//! The match controller talks to a [`Renderer`] through point-wise `draw`
//! and `erase` calls. Both are idempotent: a renderer keeps at most one
//! marker per point, so repeating a call never accumulates markers.
//!
//! [`Canvas`] is the in-memory renderer. It backs the terminal renderer and
//! writes snapshots as binary PPM rasters.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::{PIXEL_ORIGIN, PIXEL_SPACING, SNAPSHOT_CELL};
use crate::error::{Error, Result};
use crate::rules::{Color, Point};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Paint {
    Black,
    White,
    /// Legal-action candidate for the side to move.
    Candidate,
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Paint::Black,
            Color::White => Paint::White,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Marker {
    pub paint: Paint,
    /// Marker size; `None` draws a full stone.
    pub size: Option<u32>,
}

impl Marker {
    pub fn stone(color: Color) -> Self {
        Self {
            paint: color.into(),
            size: None,
        }
    }

    pub fn candidate(size: u32) -> Self {
        Self {
            paint: Paint::Candidate,
            size: Some(size),
        }
    }
}

/// Linear mapping between surface coordinates and grid points.
///
/// `grid = round((pixel - origin) / spacing)` on each axis. The outline
/// extends half a spacing past the outermost grid lines, so every press
/// inside it maps to a point on the board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridTransform {
    pub size: usize,
    pub origin: (f64, f64),
    pub spacing: (f64, f64),
}

impl GridTransform {
    /// The windowed pixel layout: origin 5, spacing 40 on both axes.
    pub fn pixels(size: usize) -> Self {
        Self {
            size,
            origin: (PIXEL_ORIGIN, PIXEL_ORIGIN),
            spacing: (PIXEL_SPACING, PIXEL_SPACING),
        }
    }

    /// Surface position of the grid point.
    pub fn to_surface(&self, (x, y): Point) -> (f64, f64) {
        (
            self.origin.0 + self.spacing.0 * x as f64,
            self.origin.1 + self.spacing.1 * y as f64,
        )
    }

    /// True if the surface position lies within the rendered board bounds.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let axis = |p: f64, origin: f64, spacing: f64| {
            let lo = origin + spacing * 0.5;
            let hi = origin + spacing * (self.size as f64 + 0.5);
            p >= lo && p < hi
        };
        axis(px, self.origin.0, self.spacing.0) && axis(py, self.origin.1, self.spacing.1)
    }

    /// Grid point nearest to a surface position inside the outline.
    pub fn to_grid(&self, px: f64, py: f64) -> Option<Point> {
        if !self.contains(px, py) {
            return None;
        }
        let x = ((px - self.origin.0) / self.spacing.0).round() as usize;
        let y = ((py - self.origin.1) / self.spacing.1).round() as usize;
        Some((x.clamp(1, self.size), y.clamp(1, self.size)))
    }
}

/// Drawing backend used by a rendered match.
pub trait Renderer {
    /// Prepare an empty board of the given size.
    fn initialize(&mut self, size: usize) -> Result<()>;

    /// Draw a marker at `point`, replacing whatever was there.
    fn draw(&mut self, point: Point, marker: Marker) -> Result<()>;

    /// Remove the marker at `point`, if any.
    fn erase(&mut self, point: Point) -> Result<()>;

    /// Flush pending visual updates. Called once per turn.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    /// Persist the current visual state as an image.
    fn save_snapshot(&self, path: &Path) -> Result<()>;
}

/// In-memory renderer: one marker per point.
#[derive(Clone, Debug, Default)]
pub struct Canvas {
    size: usize,
    markers: BTreeMap<Point, Marker>,
}

impl Canvas {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            markers: BTreeMap::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn marker(&self, point: Point) -> Option<Marker> {
        self.markers.get(&point).copied()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Points currently showing a candidate marker, in grid order.
    pub fn candidates(&self) -> Vec<Point> {
        self.points_with(|m| m.paint == Paint::Candidate)
    }

    /// Points currently showing a stone of `color`, in grid order.
    pub fn stones(&self, color: Color) -> Vec<Point> {
        let paint = Paint::from(color);
        self.points_with(|m| m.paint == paint)
    }

    fn points_with(&self, pred: impl Fn(&Marker) -> bool) -> Vec<Point> {
        let mut points: Vec<Point> = self
            .markers
            .iter()
            .filter(|(_, m)| pred(m))
            .map(|(&p, _)| p)
            .collect();
        points.sort_by_key(|&(x, y)| (y, x));
        points
    }

    fn rgb(paint: Option<Paint>) -> [u8; 3] {
        match paint {
            Some(Paint::Black) => [0, 0, 0],
            Some(Paint::White) => [255, 255, 255],
            Some(Paint::Candidate) => [0, 0, 255],
            None => [220, 179, 92],
        }
    }

    /// Encode the canvas as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let side = self.size * SNAPSHOT_CELL;
        write!(out, "P6\n{side} {side}\n255\n")?;
        let mut row = Vec::with_capacity(side * 3);
        for py in 0..side {
            row.clear();
            let y = py / SNAPSHOT_CELL + 1;
            let cy = py % SNAPSHOT_CELL;
            for px in 0..side {
                let x = px / SNAPSHOT_CELL + 1;
                let cx = px % SNAPSHOT_CELL;
                let paint = self.marker((x, y)).and_then(|m| {
                    let radius = m
                        .size
                        .map_or(SNAPSHOT_CELL / 2, |s| (s as usize / 2).min(SNAPSHOT_CELL / 2));
                    let dx = cx.abs_diff(SNAPSHOT_CELL / 2);
                    let dy = cy.abs_diff(SNAPSHOT_CELL / 2);
                    (dx * dx + dy * dy <= radius * radius).then_some(m.paint)
                });
                row.extend_from_slice(&Self::rgb(paint));
            }
            out.write_all(&row)?;
        }
        out.flush()
    }
}

impl Renderer for Canvas {
    fn initialize(&mut self, size: usize) -> Result<()> {
        self.size = size;
        self.markers.clear();
        Ok(())
    }

    fn draw(&mut self, point: Point, marker: Marker) -> Result<()> {
        self.markers.insert(point, marker);
        Ok(())
    }

    fn erase(&mut self, point: Point) -> Result<()> {
        self.markers.remove(&point);
        Ok(())
    }

    fn save_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot_err = |source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        };
        let file = File::create(path).map_err(snapshot_err)?;
        let mut out = BufWriter::new(file);
        self.write_ppm(&mut out).map_err(snapshot_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_is_idempotent() {
        let mut canvas = Canvas::new(9);
        canvas.draw((3, 3), Marker::candidate(8)).unwrap();
        canvas.draw((3, 3), Marker::candidate(8)).unwrap();
        assert_eq!(canvas.len(), 1);
        assert_eq!(canvas.marker((3, 3)), Some(Marker::candidate(8)));
    }

    #[test]
    fn test_erase_is_idempotent() {
        let mut canvas = Canvas::new(9);
        canvas.draw((3, 3), Marker::stone(Color::Black)).unwrap();
        canvas.erase((3, 3)).unwrap();
        canvas.erase((3, 3)).unwrap();
        canvas.erase((4, 4)).unwrap();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_draw_replaces_marker() {
        let mut canvas = Canvas::new(9);
        canvas.draw((5, 5), Marker::candidate(8)).unwrap();
        canvas.draw((5, 5), Marker::stone(Color::White)).unwrap();
        assert!(canvas.candidates().is_empty());
        assert_eq!(canvas.stones(Color::White), vec![(5, 5)]);
    }

    #[test]
    fn test_pixel_transform() {
        let t = GridTransform::pixels(19);
        assert_eq!(t.to_surface((10, 10)), (405.0, 405.0));
        assert_eq!(t.to_grid(405.0, 405.0), Some((10, 10)));
        assert_eq!(t.to_grid(419.0, 391.0), Some((10, 10)));
        assert_eq!(t.to_grid(45.0, 765.0), Some((1, 19)));
        // outside the outline
        assert_eq!(t.to_grid(10.0, 405.0), None);
        assert_eq!(t.to_grid(405.0, 790.0), None);
    }

    #[test]
    fn test_ppm_snapshot() {
        let mut canvas = Canvas::new(2);
        canvas.draw((1, 1), Marker::stone(Color::Black)).unwrap();
        let mut bytes = Vec::new();
        canvas.write_ppm(&mut bytes).unwrap();
        let side = 2 * SNAPSHOT_CELL;
        let header = format!("P6\n{side} {side}\n255\n");
        assert!(bytes.starts_with(header.as_bytes()));
        assert_eq!(bytes.len(), header.len() + side * side * 3);
        // center of the first cell is black
        let center = header.len() + ((SNAPSHOT_CELL / 2) * side + SNAPSHOT_CELL / 2) * 3;
        assert_eq!(&bytes[center..center + 3], &[0, 0, 0]);
    }
}
