//! CLI tool for sheetgrid - composes one frame from a JSON grid description
//!
//! Usage:
//!   sheetgrid_cli <grid.json>                        # Frame JSON to stdout
//!   sheetgrid_cli <grid.json> --scroll 120 4000      # Scroll before composing
//!   sheetgrid_cli <grid.json> --viewport 800 400     # Override viewport size
//!   sheetgrid_cli <grid.json> -o frame.json          # Frame JSON to file
//!   sheetgrid_cli - < grid.json                      # Read from stdin
//!
//! Set `RUST_LOG=sheetgrid=debug` to see layout diagnostics on stderr.

#![allow(clippy::exit)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Read, Write};

use sheetgrid::{GridViewer, Result};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: sheetgrid_cli <grid.json|-> [--scroll X Y] [--viewport W H] [--compact] [-o output.json]";

struct Args {
    input: String,
    output: Option<String>,
    scroll: Option<(f32, f32)>,
    viewport: Option<(f32, f32)>,
    pretty: bool,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_pair(args: &mut impl Iterator<Item = String>, flag: &str) -> (f32, f32) {
    let mut next = || {
        args.next()
            .and_then(|v| v.parse::<f32>().ok())
            .unwrap_or_else(|| fail(&format!("{flag} expects two numbers\n{USAGE}")))
    };
    let a = next();
    let b = next();
    (a, b)
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let mut parsed = Args {
        input: String::new(),
        output: None,
        scroll: None,
        viewport: None,
        pretty: true,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scroll" => parsed.scroll = Some(parse_pair(&mut args, "--scroll")),
            "--viewport" => parsed.viewport = Some(parse_pair(&mut args, "--viewport")),
            "--compact" => parsed.pretty = false,
            "-o" => {
                parsed.output = Some(args.next().unwrap_or_else(|| fail(USAGE)));
            }
            _ if parsed.input.is_empty() => parsed.input = arg,
            _ => fail(&format!("Unexpected argument: {arg}\n{USAGE}")),
        }
    }
    if parsed.input.is_empty() {
        fail(USAGE);
    }
    parsed
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(fs::read_to_string(input)?)
}

fn run(args: Args) -> Result<()> {
    let json = read_input(&args.input)?;

    let mut viewer = GridViewer::from_json(&json)?;
    if let Some((width, height)) = args.viewport {
        viewer.resize(width, height);
    }
    if let Some((x, y)) = args.scroll {
        viewer.set_scroll(x, y);
    }
    let output = viewer.frame_json(args.pretty)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &output)?;
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn main() {
    init_tracing();
    let args = parse_args();
    let input = args.input.clone();
    if let Err(e) = run(args) {
        fail(&format!("{input}: {e}"));
    }
}
