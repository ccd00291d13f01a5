//! Load a grid, plan one route and print it.
//!
//! Run: cargo run --bin corridor -- [example | random W H SEED | FILE] [SX SY TX TY]
//!
//! Set `RUST_LOG=debug` to see planner build statistics.

use std::error::Error;

use corridor_core::{Grid, Point};
use corridor_demos::{
    CaveRule, EXAMPLE_START, EXAMPLE_TARGET, example_grid, format_path, random_cave, render,
};
use corridor_paths::Planner;

const USAGE: &str = "usage: corridor [example | random W H SEED | FILE] [SX SY TX TY]";

fn parse_num<T: std::str::FromStr>(s: &str) -> Result<T, Box<dyn Error>> {
    s.parse()
        .map_err(|_| format!("not a number: {s:?}\n{USAGE}").into())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (grid, rest) = match args.first().map(String::as_str) {
        None | Some("example") => (example_grid()?, args.get(1..).unwrap_or_default()),
        Some("random") => {
            if args.len() < 4 {
                return Err(USAGE.into());
            }
            let grid = random_cave(
                parse_num(&args[1])?,
                parse_num(&args[2])?,
                parse_num(&args[3])?,
                &CaveRule::default(),
            )?;
            (grid, &args[4..])
        }
        Some("-h" | "--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(file) => {
            let text = std::fs::read_to_string(file)?;
            (Grid::parse(&text)?, &args[1..])
        }
    };

    let (start, target) = match rest {
        [] => default_endpoints(&grid),
        [sx, sy, tx, ty] => (
            Point::new(parse_num(sx)?, parse_num(sy)?),
            Point::new(parse_num(tx)?, parse_num(ty)?),
        ),
        _ => return Err(USAGE.into()),
    };

    let mut planner = Planner::new(&grid);
    log::info!(
        "{}x{} grid, {} corners, {} graph vertices",
        grid.width(),
        grid.height(),
        planner.corners().len(),
        planner.graph().len()
    );
    let route = planner.search(start, target);
    if route.is_reachable() {
        println!("path length={}", route.distance);
    } else {
        println!("unreachable");
    }
    println!("path = {}", format_path(&route.path));
    println!("{}", render(&grid, &route.path));
    Ok(())
}

/// The bundled example's endpoints when they fit, otherwise the first and
/// last free cells in row-major order.
fn default_endpoints(grid: &Grid) -> (Point, Point) {
    let free = |p: &Point| !grid.is_blocked(*p);
    if free(&EXAMPLE_START) && free(&EXAMPLE_TARGET) {
        return (EXAMPLE_START, EXAMPLE_TARGET);
    }
    let first = grid.bounds().iter().find(free);
    let last = grid.bounds().iter().filter(free).last();
    match (first, last) {
        (Some(s), Some(t)) => (s, t),
        _ => (Point::ZERO, Point::ZERO),
    }
}
