//! CLI tool for gridlayout - runs a command script and prints the layout
//!
//! Usage:
//!   gridlayout_cli <script>                   # Output JSON to stdout
//!   gridlayout_cli <script> -o out.json       # Output JSON to file
//!   gridlayout_cli <script> --text            # One line per cell
//!   gridlayout_cli <script> --epsilon 1e-6    # Override snap epsilon
//!   gridlayout_cli <script> --config cfg.json # Load settings from JSON
//!
//! Set `RUST_LOG=gridlayout=debug` to trace each command.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use gridlayout::{run_script, LayoutConfig};
use tracing_subscriber::EnvFilter;

const USAGE: &str =
    "Usage: gridlayout_cli <script> [-o output.json] [--text] [--epsilon <f64>] [--config <file.json>]";

struct Options {
    script: String,
    output: Option<String>,
    text: bool,
    epsilon: Option<f64>,
    config: Option<String>,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        script: String::new(),
        output: None,
        text: false,
        epsilon: None,
        config: None,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" => options.output = Some(iter.next().cloned().unwrap_or_else(|| fail(USAGE))),
            "--text" => options.text = true,
            "--epsilon" => {
                let value = iter.next().unwrap_or_else(|| fail(USAGE));
                match value.parse::<f64>() {
                    Ok(eps) if eps.is_finite() && eps >= 0.0 => options.epsilon = Some(eps),
                    _ => fail(&format!("Invalid epsilon: {value}")),
                }
            }
            "--config" => {
                options.config = Some(iter.next().cloned().unwrap_or_else(|| fail(USAGE)));
            }
            _ if options.script.is_empty() && !arg.starts_with('-') => {
                options.script = arg.clone();
            }
            _ => fail(USAGE),
        }
    }
    if options.script.is_empty() {
        fail(USAGE);
    }
    options
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);

    // Settings
    let mut config = match &options.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
            LayoutConfig::from_json(&json)
                .unwrap_or_else(|e| fail(&format!("Error parsing {path}: {e}")))
        }
        None => LayoutConfig::default(),
    };
    if let Some(eps) = options.epsilon {
        config = config.with_snap_epsilon(eps);
    }

    // Run script
    let source = fs::read_to_string(&options.script)
        .unwrap_or_else(|e| fail(&format!("Error reading {}: {e}", options.script)));
    let layout = run_script(&source, config)
        .unwrap_or_else(|e| fail(&format!("Error in {}: {e}", options.script)));

    // Render output
    let rendered = if options.text {
        layout
            .unique_elements()
            .iter()
            .zip(layout.export_records())
            .map(|(cell, record)| format!("{record}\n  {}", cell.label().replace('\n', " | ")))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        layout
            .export_json()
            .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")))
    };

    match options.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &rendered) {
                fail(&format!("Error writing {path}: {e}"));
            }
            eprintln!("Written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{rendered}") {
                fail(&format!("Error writing output: {e}"));
            }
        }
    }
}
