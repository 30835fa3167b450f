// `error_chain!` creates the Error, ErrorKind, ResultExt and Result types.
// Other modules `use errors::*;` or name the pieces they need.
#![allow(deprecated)]

use error_chain::error_chain;

error_chain! {

    foreign_links {
        ImageSaveError(::image::ImageError);
    }

    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}: both sides must be at least 1 and the cell count must be addressable", width, height)
        }

        InvalidGridCoordinate(x: u32, y: u32) {
            description("grid coordinate outside of the grid")
            display("grid coordinate ({}, {}) is outside of the grid", x, y)
        }

        FrontierExhausted(visited: usize, total: usize) {
            description("frontier stack emptied before every cell was visited")
            display("frontier stack emptied with {} of {} cells visited", visited, total)
        }
    }
}
