//! Interactive BASIC interpreter CLI.
//!
//! With no arguments: a REPL. Numbered lines go into the stored program,
//! everything else runs immediately. With a file argument: feed the file
//! through the same pipeline (a trailing `RUN` in the file starts it).

mod host;
mod repl;
mod tracing_setup;

use basic_eval::Interpreter;
use host::StdioHost;
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => repl::run(),
        [path] => run_file(path),
        _ => {
            print_usage();
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: basic [program.bas]");
    eprintln!("  no argument   start the interactive interpreter");
    eprintln!("  program.bas   run a program file (include RUN to start it)");
}

fn run_file(path: &str) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("basic: cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut basic = Interpreter::new(StdioHost);
    match basic.run_source(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}
