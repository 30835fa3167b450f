//! **backtracker** grows a perfect maze one step at a time with a randomised depth first search,
//! the recursive backtracker, and renders the growing maze as text or as an image.

pub mod analysis;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_iterators;
pub mod renderers;
pub mod units;
