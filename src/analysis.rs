//! Structural checks over a carved grid.
//!
//! The grid stores passages as per-cell open bits; here they are lifted into an undirected
//! petgraph graph so the spanning tree property can be checked with graph algorithms.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::units::CellsCount;

/// One node per cell, node index == row-major cell index, and one edge per mutual passage.
///
/// Edge weights are the direction of the passage seen from the west or north cell.
pub fn passage_graph(grid: &Grid) -> UnGraph<Cartesian2DCoordinate, CompassPrimary, u32> {
    let CellsCount(nodes) = grid.size();
    let mut graph = UnGraph::with_capacity(nodes, nodes.saturating_sub(1));
    for coord in grid.iter() {
        graph.add_node(coord);
    }

    for (a, b) in grid.iter_links() {
        let direction = if a.y == b.y {
            CompassPrimary::East
        } else {
            CompassPrimary::South
        };
        // Links only exist between valid coordinates.
        if let (Some(a_index), Some(b_index)) = (grid.grid_coordinate_to_index(a),
                                                 grid.grid_coordinate_to_index(b)) {
            graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), direction);
        }
    }
    graph
}

/// Every open bit is mirrored by the neighbour it points at, and no open bit points off the grid.
pub fn has_symmetric_walls(grid: &Grid) -> bool {
    grid.iter().all(|coord| {
        let flags = match grid.cell(coord) {
            Some(flags) => flags,
            None => return false,
        };
        flags.open_directions().iter().all(|&dir| {
            grid.neighbour_at_direction(coord, dir)
                .and_then(|neighbour_coord| grid.cell(neighbour_coord))
                .map_or(false, |neighbour| neighbour.is_open(dir.opposite()))
        })
    })
}

/// The passages connect every cell without a single cycle: V nodes, V - 1 edges, one component.
pub fn is_spanning_tree(grid: &Grid) -> bool {
    let graph = passage_graph(grid);
    let nodes = graph.node_count();
    nodes > 0 && graph.edge_count() == nodes - 1 && connected_components(&graph) == 1
}
