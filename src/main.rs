use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use backtracker::{
    cells::Cartesian2DCoordinate,
    generators::{RecursiveBacktracker, StepOutcome},
    renderers,
    units::{Height, PathWidth, Width},
};
use docopt::Docopt;
use log::{debug, info};
use serde_derive::Deserialize;

const USAGE: &str = "Maze Driver

Usage:
    maze_driver -h | --help
    maze_driver [--width=<w>] [--height=<h>] [--seed=<n>] [--start-x=<x> --start-y=<y>] [--animate] [--delay-ms=<ms>] [--image-out=<path>] [--path-width=<n>] [--quiet]

Options:
    -h --help            Show this screen.
    --width=<w>          The maze width in cells [default: 40].
    --height=<h>         The maze height in cells [default: 25].
    --seed=<n>           Seed for the random source. A random seed is chosen and logged if not given.
    --start-x=<x>        x coordinate of the cell the maze grows from.
    --start-y=<y>        y coordinate of the cell the maze grows from.
    --animate            Print the maze as text after every generation step.
    --delay-ms=<ms>      Pause between animation frames in milliseconds [default: 20].
    --image-out=<path>   Output file path for an image rendering of the finished maze. Always PNG format.
    --path-width=<n>     Pixel side length of a cell in the image rendering [default: 3].
    --quiet              Do not print the finished maze.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u64>,
    flag_start_x: Option<u32>,
    flag_start_y: Option<u32>,
    flag_animate: bool,
    flag_delay_ms: u64,
    flag_image_out: String,
    flag_path_width: u32,
    flag_quiet: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::backtracker::errors::Error, ::backtracker::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() {
    env_logger::init();

    if let Err(ref e) = run() {
        let stderr = &mut io::stderr();
        let _ = writeln!(stderr, "error: {}", e);
        for e in e.iter().skip(1) {
            let _ = writeln!(stderr, "caused by: {}", e);
        }
        ::std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let seed = args.flag_seed.unwrap_or_else(rand::random);
    info!("Generating a {}x{} maze with seed {}", args.flag_width, args.flag_height, seed);

    let seed_cell = match (args.flag_start_x, args.flag_start_y) {
        (Some(x), Some(y)) => Some(Cartesian2DCoordinate::new(x, y)),
        _ => None,
    };

    let mut generator = RecursiveBacktracker::seeded(Width(args.flag_width),
                                                     Height(args.flag_height),
                                                     seed_cell,
                                                     seed)
        .chain_err(|| "Failed to initialise the maze generator")?;
    debug!("Growing the maze from {:?}", generator.snapshot().active_cell());

    let stdout = io::stdout();
    let frame_delay = Duration::from_millis(args.flag_delay_ms);

    if args.flag_animate {
        print_frame(&mut stdout.lock(), &generator)?;
    }

    let mut backtracks = 0;
    while !generator.is_complete() {
        if let StepOutcome::Backtracked { .. } = generator.step()? {
            backtracks += 1;
        }

        if args.flag_animate {
            print_frame(&mut stdout.lock(), &generator)?;
            thread::sleep(frame_delay);
        }
    }
    info!("Maze complete after {} steps, {} of them backtracks",
          generator.steps_taken(),
          backtracks);

    if !args.flag_animate && !args.flag_quiet {
        let mut out = stdout.lock();
        writeln!(out, "{}", generator.grid())?;
    }

    if !args.flag_image_out.is_empty() {
        let render_options = renderers::RenderOptionsBuilder::new()
            .path_width(PathWidth(args.flag_path_width))
            .output_file(Some(&args.flag_image_out))
            .build();
        renderers::render_snapshot(&generator.snapshot(), &render_options)
            .chain_err(|| format!("Failed to save the maze image to {}", args.flag_image_out))?;
    }

    Ok(())
}

// Clears the terminal and redraws the whole maze.
fn print_frame<W: Write>(out: &mut W, generator: &RecursiveBacktracker) -> io::Result<()> {
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "{}", generator.snapshot())?;
    writeln!(out,
             "visited {}/{}",
             generator.visited_count(),
             generator.total_cells().0)?;
    out.flush()
}
