//! Pixel rendering of a generation snapshot.
//!
//! Each cell is drawn as a `path_width` square followed by a one pixel wall gap to the east and
//! south. An open passage fills the gap with the passage colour, a wall leaves the background.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::debug;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::{ErrorKind, Result};
use crate::generators::Snapshot;
use crate::units::{Height, PathWidth, Width};

const WHITE: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
const DARK_YELLOW: Rgb<u8> = Rgb([0x80, 0x80, 0x00]);
const GREEN: Rgb<u8> = Rgb([0x00, 0xff, 0x00]);
const BLACK: Rgb<u8> = Rgb([0x00, 0x00, 0x00]);

#[derive(Debug, Clone)]
pub struct RenderOptions {
    path_width: PathWidth,
    output_file: Option<PathBuf>,
}

impl RenderOptions {
    pub fn path_width(&self) -> PathWidth {
        self.path_width
    }

    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            path_width: PathWidth(3),
            output_file: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder::default()
    }

    /// Side length in pixels of a cell interior. Zero is bumped to one.
    pub fn path_width(mut self, path_width: PathWidth) -> RenderOptionsBuilder {
        self.options.path_width = PathWidth(path_width.0.max(1));
        self
    }

    /// Save the rendered image as PNG to this path.
    pub fn output_file<P: AsRef<Path>>(mut self, file_path: Option<P>) -> RenderOptionsBuilder {
        self.options.output_file = file_path.map(|p| p.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

/// Pixel dimensions of the rendered image for a grid of the given size.
pub fn image_dimensions(width: Width, height: Height, path_width: PathWidth) -> Result<(u32, u32)> {
    let (Width(w), Height(h), PathWidth(pw)) = (width, height, path_width);
    let side = |cells: usize| (cells as u32).checked_mul(pw.checked_add(1)?)
        .filter(|_| cells <= u32::MAX as usize);
    match (side(w), side(h)) {
        (Some(image_width), Some(image_height)) => Ok((image_width, image_height)),
        _ => Err(ErrorKind::InvalidDimensions(w, h).into()),
    }
}

pub fn render_snapshot(snapshot: &Snapshot, options: &RenderOptions) -> Result<RgbImage> {
    let grid = snapshot.grid();
    let (image_width, image_height) = image_dimensions(grid.width(), grid.height(), options.path_width)?;
    let PathWidth(pw) = options.path_width;
    let stride = pw + 1;

    let mut image = RgbImage::from_pixel(image_width, image_height, BLACK);

    let fill = |image: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, colour: Rgb<u8>| {
        for py in y0..y0 + h {
            for px in x0..x0 + w {
                image.put_pixel(px, py, colour);
            }
        }
    };

    for (coord, &flags) in grid.iter().zip(grid.cells()) {
        let (x0, y0) = (coord.x * stride, coord.y * stride);
        let body = if flags.is_visited() { WHITE } else { DARK_YELLOW };
        fill(&mut image, x0, y0, pw, pw, body);

        if flags.is_open(CompassPrimary::South) {
            fill(&mut image, x0, y0 + pw, pw, 1, WHITE);
        }
        if flags.is_open(CompassPrimary::East) {
            fill(&mut image, x0 + pw, y0, 1, pw, WHITE);
        }
    }

    if let Some(Cartesian2DCoordinate { x, y }) = snapshot.active_cell() {
        fill(&mut image, x * stride, y * stride, pw, pw, GREEN);
    }

    if let Some(file_path) = options.output_file() {
        debug!("Saving {}x{} maze image to {}", image_width, image_height, file_path.display());
        image.save(file_path)?;
    }

    Ok(image)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::RecursiveBacktracker;
    use crate::grid::Grid;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn builder_defaults_and_overrides() {
        let defaults = RenderOptionsBuilder::new().build();
        assert_eq!(defaults.path_width(), PathWidth(3));
        assert!(defaults.output_file().is_none());

        let options = RenderOptionsBuilder::new()
            .path_width(PathWidth(0))
            .output_file(Some("maze.png"))
            .build();
        assert_eq!(options.path_width(), PathWidth(1));
        assert_eq!(options.output_file(), Some(Path::new("maze.png")));
    }

    #[test]
    fn image_is_sized_by_cells_and_walls() {
        let generator = RecursiveBacktracker::seeded(Width(40), Height(25), None, 5).unwrap();
        let image = render_snapshot(&generator.snapshot(), &RenderOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (160, 100));
    }

    #[test]
    fn unvisited_cells_are_dark_yellow_and_walls_black() {
        let grid = Grid::new(Width(2), Height(2)).unwrap();
        let snapshot = Snapshot::of_grid(&grid, None);
        let options = RenderOptionsBuilder::new().path_width(PathWidth(2)).build();
        let image = render_snapshot(&snapshot, &options).unwrap();

        assert_eq!(*image.get_pixel(0, 0), DARK_YELLOW);
        assert_eq!(*image.get_pixel(4, 4), DARK_YELLOW);
        assert_eq!(*image.get_pixel(2, 0), BLACK);
        assert_eq!(*image.get_pixel(0, 2), BLACK);
        assert_eq!(*image.get_pixel(2, 2), BLACK);
    }

    #[test]
    fn passages_visited_and_active_cells() {
        let mut generator = RecursiveBacktracker::seeded(Width(2), Height(1), Some(gc(0, 0)), 9)
            .unwrap();
        generator.step().unwrap();
        let options = RenderOptionsBuilder::new().path_width(PathWidth(2)).build();
        let image = render_snapshot(&generator.snapshot(), &options).unwrap();

        assert_eq!(image.dimensions(), (6, 3));
        // seed cell, visited
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(1, 1), WHITE);
        // east passage across the wall gap
        assert_eq!(*image.get_pixel(2, 0), WHITE);
        assert_eq!(*image.get_pixel(2, 1), WHITE);
        // the active cell
        assert_eq!(*image.get_pixel(3, 0), GREEN);
        assert_eq!(*image.get_pixel(4, 1), GREEN);
        // south walls and the east edge
        assert_eq!(*image.get_pixel(0, 2), BLACK);
        assert_eq!(*image.get_pixel(5, 0), BLACK);
    }

    #[test]
    fn oversized_images_are_rejected() {
        let result = image_dimensions(Width(usize::MAX / 2), Height(1), PathWidth(3));
        assert!(result.is_err());
    }
}
