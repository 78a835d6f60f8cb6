//! Command-line front end: compiles a diagram document and prints either the
//! emitted runner script or a short compile report.

use clap::Parser;
use kairo::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kairo-cli", version, about = "Compile block-diagram documents")]
struct Args {
    /// Path to the diagram JSON document.
    diagram: PathBuf,

    /// Print a compile report instead of the emitted script.
    #[arg(long)]
    report: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let json = match std::fs::read_to_string(&args.diagram) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("error: cannot read {}: {err}", args.diagram.display());
            return ExitCode::FAILURE;
        }
    };

    let compiler = match Compiler::builder(json.as_str()).build() {
        Ok(compiler) => compiler,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if args.report {
        match compiler.build_system() {
            Ok((system, duration)) => {
                println!("blocks:      {}", system.blocks.len());
                println!("connections: {}", system.connections.len());
                println!("events:      {}", system.events.len());
                println!("solver:      {}", system.solver.solver);
                println!("duration:    {duration}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        }
    } else {
        match compiler.emit_script() {
            Ok(script) => {
                print!("{script}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        }
    }
}
