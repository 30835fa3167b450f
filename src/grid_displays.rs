use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::generators::Snapshot;
use crate::grid::Grid;
use crate::units::{Height, Width};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Cartesian2DCoordinate) -> String {
        String::from("   ")
    }
}

/// Empty cell bodies, walls only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDisplay;

impl GridDisplay for PlainDisplay {}

/// Marks the cell a generator is growing from and the cells it has not reached yet.
#[derive(Debug, Clone, Copy)]
pub struct GenerationDisplay<'a> {
    snapshot: Snapshot<'a>,
}

impl<'a> GenerationDisplay<'a> {
    pub fn new(snapshot: Snapshot<'a>) -> GenerationDisplay<'a> {
        GenerationDisplay { snapshot }
    }
}

impl<'a> GridDisplay for GenerationDisplay<'a> {
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> String {
        if self.snapshot.active_cell() == Some(coord) {
            String::from(" @ ")
        } else if self.snapshot.cell(coord).map_or(false, |c| c.is_visited()) {
            String::from("   ")
        } else {
            String::from("░░░")
        }
    }
}

const WALL_LR_3: &str = "───";
const WALL_UD: &str = "│";

// Junction glyph from which of its four arms (left, right, up, down) are walls.
fn junction(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    match (left, right, up, down) {
        (true, true, true, true) => "┼",
        (true, true, true, false) => "┴",
        (true, true, false, true) => "┬",
        (true, false, true, true) => "┤",
        (false, true, true, true) => "├",
        (true, true, false, false) => "─",
        (false, false, true, true) => "│",
        (false, true, true, false) => "└",
        (true, false, false, true) => "┐",
        (true, false, true, false) => "┘",
        (false, true, false, true) => "┌",
        (true, false, false, false) => "╴",
        (false, true, false, false) => "╶",
        (false, false, true, false) => "╵",
        (false, false, false, true) => "╷",
        (false, false, false, false) => " ",
    }
}

impl Grid {
    fn has_wall(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        !self.is_neighbour_linked(coord, direction)
    }

    /// Render the grid as box drawing text, with `displayer` filling in each cell body.
    pub fn render_with(&self, displayer: &dyn GridDisplay) -> String {
        let (Width(columns_count), Height(rows_count)) = (self.width(), self.height());
        let gc = |x: usize, y: usize| Cartesian2DCoordinate::new(x as u32, y as u32);

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(junction(false, true, false, true));
        for x in 0..columns_count {
            output.push_str(WALL_LR_3);
            let is_last_column = x + 1 == columns_count;
            output.push_str(junction(true,
                                     !is_last_column,
                                     false,
                                     self.has_wall(gc(x, 0), CompassPrimary::East)));
        }
        output.push('\n');

        for row in self.iter_row() {
            let y = match row.first() {
                Some(coord) => coord.y as usize,
                None => continue,
            };
            let is_last_row = y + 1 == rows_count;

            // The top section of each cell was drawn by the previous row.
            let mut middle_section = String::from(WALL_UD);
            let mut bottom_section = String::from(junction(false,
                                                           self.has_wall(gc(0, y), CompassPrimary::South),
                                                           true,
                                                           !is_last_row));

            for coord in row {
                let x = coord.x as usize;
                let is_last_column = x + 1 == columns_count;

                middle_section.push_str(&displayer.render_cell_body(coord));
                middle_section.push_str(if self.has_wall(coord, CompassPrimary::East) {
                    WALL_UD
                } else {
                    " "
                });

                let south_wall = self.has_wall(coord, CompassPrimary::South);
                bottom_section.push_str(if south_wall { WALL_LR_3 } else { "   " });

                let right_arm = !is_last_column && self.has_wall(gc(x + 1, y), CompassPrimary::South);
                let down_arm = !is_last_row && self.has_wall(gc(x, y + 1), CompassPrimary::East);
                bottom_section.push_str(junction(south_wall,
                                                 right_arm,
                                                 self.has_wall(coord, CompassPrimary::East),
                                                 down_arm));
            }

            output.push_str(&middle_section);
            output.push('\n');
            output.push_str(&bottom_section);
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render_with(&PlainDisplay))
    }
}

impl<'a> fmt::Display for Snapshot<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let display = GenerationDisplay::new(*self);
        write!(f, "{}", self.grid().render_with(&display))
    }
}
