use error_chain::bail;
use smallvec::SmallVec;
use std::u32;

use crate::cells::{Cartesian2DCoordinate, CellFlags, CompassPrimary};
use crate::errors::{ErrorKind, Result};
use crate::grid_iterators::{BatchIter, CellIter};
use crate::units::{CellsCount, Height, Width};

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;
pub type DirectedNeighbours = SmallVec<[(CompassPrimary, Cartesian2DCoordinate); 4]>;
pub type CoordinatePairSmallVec = SmallVec<[(Cartesian2DCoordinate, Cartesian2DCoordinate); 2]>;

/// A rectangular maze grid: one `CellFlags` mask per cell, stored row-major.
///
/// Passages are always opened in pairs, so the open bit a cell holds towards a neighbour is
/// mirrored by the neighbour's open bit pointing back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<CellFlags>,
}

/// Checks that a `width` * `height` grid is non-empty and addressable by `u32` coordinates.
pub fn validate_dimensions(width: Width, height: Height) -> Result<CellsCount> {
    let (Width(w), Height(h)) = (width, height);
    if w == 0 || h == 0 || w > u32::MAX as usize || h > u32::MAX as usize {
        bail!(ErrorKind::InvalidDimensions(w, h));
    }
    w.checked_mul(h)
        .map(CellsCount)
        .ok_or_else(|| ErrorKind::InvalidDimensions(w, h).into())
}

impl Grid {
    /// A grid with every wall standing and no cell visited.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let CellsCount(cells_count) = validate_dimensions(width, height)?;
        Ok(Grid {
            width,
            height,
            cells: vec![CellFlags::empty(); cells_count],
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> CellsCount {
        CellsCount(self.cells.len())
    }

    /// Raw cell masks in row-major order.
    #[inline]
    pub fn cells(&self) -> &[CellFlags] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, coord: Cartesian2DCoordinate) -> Option<CellFlags> {
        self.grid_coordinate_to_index(coord).map(|index| self.cells[index])
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<Cartesian2DCoordinate> {
        if index < self.cells.len() {
            Some(Cartesian2DCoordinate::from_row_major_index(index, self.width))
        } else {
            None
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        direction.offset_coordinate(coord)
                 .filter(|neighbour_coord| self.is_valid_coordinate(*neighbour_coord))
    }

    /// Cells to the North, East, South or West of a particular cell, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL.iter()
                           .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                           .collect()
    }

    /// Neighbours not yet visited, in north, east, south, west order.
    pub fn unvisited_neighbours(&self, coord: Cartesian2DCoordinate) -> DirectedNeighbours {
        CompassPrimary::ALL.iter()
                           .filter_map(|dir| {
                               self.neighbour_at_direction(coord, *dir)
                                   .map(|neighbour_coord| (*dir, neighbour_coord))
                           })
                           .filter(|&(_, neighbour_coord)| !self.is_visited(neighbour_coord))
                           .collect()
    }

    /// Open the passage from `coord` towards `direction`, setting the open bit on both cells.
    ///
    /// Returns the coordinate of the neighbour the passage leads to.
    pub fn carve(&mut self,
                 coord: Cartesian2DCoordinate,
                 direction: CompassPrimary)
                 -> Result<Cartesian2DCoordinate> {
        let from_index = self.index_or_error(coord)?;
        let neighbour_coord = match direction.offset_coordinate(coord) {
            Some(neighbour_coord) => neighbour_coord,
            None => bail!(ErrorKind::InvalidGridCoordinate(coord.x, coord.y)),
        };
        let to_index = self.index_or_error(neighbour_coord)?;

        self.cells[from_index].insert(direction.passage_flag());
        self.cells[to_index].insert(direction.opposite().passage_flag());
        Ok(neighbour_coord)
    }

    /// Returns true if the cell was not visited before.
    pub fn mark_visited(&mut self, coord: Cartesian2DCoordinate) -> Result<bool> {
        let index = self.index_or_error(coord)?;
        let newly_visited = !self.cells[index].is_visited();
        self.cells[index].insert(CellFlags::VISITED);
        Ok(newly_visited)
    }

    #[inline]
    pub fn is_visited(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell(coord).map_or(false, CellFlags::is_visited)
    }

    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|flags| flags.is_visited()).count()
    }

    /// Are two cells in the grid linked? Both cells must record the passage.
    pub fn is_linked(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        CompassPrimary::ALL.iter()
                           .any(|dir| {
                               self.neighbour_at_direction(a, *dir) == Some(b) &&
                               self.is_neighbour_linked(a, *dir)
                           })
    }

    pub fn is_neighbour_linked(&self,
                               coord: Cartesian2DCoordinate,
                               direction: CompassPrimary)
                               -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| {
                let here_open = self.cell(coord).map_or(false, |c| c.is_open(direction));
                let there_open = self.cell(neighbour_coord)
                                     .map_or(false, |c| c.is_open(direction.opposite()));
                here_open && there_open
            })
    }

    /// Cells that are linked to a particular cell by a passage.
    pub fn links(&self, coord: Cartesian2DCoordinate) -> Option<CoordinateSmallVec> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        Some(CompassPrimary::ALL.iter()
                                .filter(|dir| self.is_neighbour_linked(coord, **dir))
                                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                                .collect())
    }

    /// Every passage exactly once, as (west or north cell, east or south cell) pairs.
    pub fn iter_links<'a>(&'a self)
                          -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::East, CompassPrimary::South]
                .iter()
                .filter(|dir| self.is_neighbour_linked(coord, **dir))
                .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
                .map(|neighbour_coord| (coord, neighbour_coord))
                .collect::<CoordinatePairSmallVec>()
        })
    }

    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.width, self.height)
    }

    #[inline]
    pub fn iter_row(&self) -> BatchIter {
        BatchIter::rows(self.width, self.height)
    }

    /// Build a grid from raw masks, bypassing the carving bookkeeping.
    #[cfg(test)]
    pub(crate) fn from_cells_unchecked(width: Width, height: Height, cells: Vec<CellFlags>) -> Grid {
        assert_eq!(width.0 * height.0, cells.len());
        Grid { width, height, cells }
    }

    fn index_or_error(&self, coord: Cartesian2DCoordinate) -> Result<usize> {
        self.grid_coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::InvalidGridCoordinate(coord.x, coord.y).into())
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use std::u32;

    use super::*;
    use crate::errors::{Error, ErrorKind};

    fn small_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let node_indices: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected_indices: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(node_indices, expected_indices);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);

        // Off the grid there are no neighbours at all
        assert!(g.neighbours(gc(10, 10)).is_empty());
    }

    #[test]
    fn neighbours_are_listed_north_east_south_west() {
        let g = small_grid(3, 3);
        assert_eq!(&*g.neighbours(gc(1, 1)), &[gc(1, 0), gc(2, 1), gc(1, 2), gc(0, 1)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, None);
        check_neighbour(gc(0, 0), CompassPrimary::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(1, 1), CompassPrimary::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::South, None);
        check_neighbour(gc(1, 1), CompassPrimary::East, None);
        check_neighbour(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 7);
        assert_eq!(g.size(), CellsCount(70));
        assert_eq!(g.cells().len(), 70);
        assert!(g.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let is_invalid_dims = |w, h| match Grid::new(Width(w), Height(h)) {
            Err(Error(ErrorKind::InvalidDimensions(ew, eh), _)) => ew == w && eh == h,
            _ => false,
        };
        assert!(is_invalid_dims(0, 5));
        assert!(is_invalid_dims(5, 0));
        assert!(is_invalid_dims(0, 0));
        assert!(validate_dimensions(Width(1), Height(1)).is_ok());
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> = coords.iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);

        assert_eq!(g.index_to_grid_coordinate(5), Some(gc(2, 1)));
        assert_eq!(g.index_to_grid_coordinate(9), None);
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(g.iter().len(), 4);
        assert_eq!(g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
                   &[gc(0, 0), gc(1, 0), gc(0, 1), gc(1, 1)]);
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 3);
        assert_eq!(g.iter_row().len(), 3);
        assert_eq!(g.iter_row().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
                   &[&[gc(0, 0), gc(1, 0)], &[gc(0, 1), gc(1, 1)], &[gc(0, 2), gc(1, 2)]]);
    }

    #[test]
    fn carving_links_cells_both_ways() {
        let mut g = small_grid(4, 4);
        let a = gc(0, 1);
        let b = gc(0, 2);
        let c = gc(0, 3);

        let sorted_links = |grid: &Grid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord).expect("coordinate is invalid").iter().cloned().sorted().collect()
        };

        assert!(!g.is_linked(a, b) && !g.is_linked(b, a));
        assert_eq!(sorted_links(&g, a), vec![]);

        let carved_to = g.carve(a, CompassPrimary::South).expect("carve failed");
        assert_eq!(carved_to, b);
        assert!(g.is_linked(a, b) && g.is_linked(b, a));
        assert!(g.is_neighbour_linked(a, CompassPrimary::South));
        assert!(g.is_neighbour_linked(b, CompassPrimary::North));
        assert_eq!(g.cell(a), Some(CellFlags::SOUTH));
        assert_eq!(g.cell(b), Some(CellFlags::NORTH));

        g.carve(c, CompassPrimary::North).expect("carve failed");
        assert!(g.is_linked(b, c));
        assert!(!g.is_linked(a, c));
        assert_eq!(sorted_links(&g, a), vec![b]);
        assert_eq!(sorted_links(&g, b), vec![a, c]);
        assert_eq!(sorted_links(&g, c), vec![b]);

        // Carving does not visit anything
        assert_eq!(g.visited_count(), 0);
    }

    #[test]
    fn carving_the_same_passage_twice_is_idempotent() {
        let mut g = small_grid(2, 2);
        g.carve(gc(0, 0), CompassPrimary::East).expect("carve failed");
        g.carve(gc(1, 0), CompassPrimary::West).expect("carve failed");
        assert_eq!(g.links_count(), 1);
        assert_eq!(&*g.links(gc(0, 0)).unwrap(), &[gc(1, 0)]);
    }

    #[test]
    fn no_carving_off_the_grid() {
        let mut g = small_grid(2, 2);
        let is_invalid_coord = |result: Result<Cartesian2DCoordinate>| match result {
            Err(Error(ErrorKind::InvalidGridCoordinate(_, _), _)) => true,
            _ => false,
        };
        assert!(is_invalid_coord(g.carve(gc(0, 0), CompassPrimary::North)));
        assert!(is_invalid_coord(g.carve(gc(0, 0), CompassPrimary::West)));
        assert!(is_invalid_coord(g.carve(gc(1, 1), CompassPrimary::East)));
        assert!(is_invalid_coord(g.carve(gc(5, 5), CompassPrimary::East)));
        assert!(g.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn one_sided_open_bit_is_not_a_link() {
        let mut g = small_grid(2, 1);
        g.cells[0].insert(CellFlags::EAST);
        assert!(!g.is_linked(gc(0, 0), gc(1, 0)));
        assert_eq!(g.links_count(), 0);
    }

    #[test]
    fn visiting_cells() {
        let mut g = small_grid(3, 2);
        assert!(!g.is_visited(gc(2, 1)));
        assert_eq!(g.mark_visited(gc(2, 1)).unwrap(), true);
        assert_eq!(g.mark_visited(gc(2, 1)).unwrap(), false);
        assert!(g.is_visited(gc(2, 1)));
        assert_eq!(g.visited_count(), 1);
        assert!(g.mark_visited(gc(3, 1)).is_err());
        assert!(!g.is_visited(gc(3, 1)));

        let unvisited = g.unvisited_neighbours(gc(1, 1));
        assert_eq!(&*unvisited,
                   &[(CompassPrimary::North, gc(1, 0)), (CompassPrimary::West, gc(0, 1))]);
    }

    #[test]
    fn links_iteration_lists_each_passage_once() {
        let mut g = small_grid(3, 3);
        g.carve(gc(0, 0), CompassPrimary::East).unwrap();
        g.carve(gc(1, 0), CompassPrimary::South).unwrap();
        g.carve(gc(1, 1), CompassPrimary::West).unwrap();
        let links = g.iter_links().collect::<Vec<_>>();
        assert_eq!(links,
                   vec![(gc(0, 0), gc(1, 0)), (gc(1, 0), gc(1, 1)), (gc(0, 1), gc(1, 1))]);
        assert_eq!(g.links_count(), 3);
    }
}
