//! The read-eval loop.
//!
//! One source line per prompt. Parse errors print with their location
//! and never kill the session; runtime errors print in the dialect's
//! `?<MESSAGE> ERROR IN <line>` form.

use crate::host::StdioHost;
use basic_eval::Interpreter;
use std::io::{self, BufRead};
use std::process::ExitCode;

pub fn run() -> ExitCode {
    let mut basic = Interpreter::new(StdioHost);
    println!("READY.");

    let stdin = io::stdin();
    let mut buffer = String::new();
    loop {
        buffer.clear();
        match stdin.lock().read_line(&mut buffer) {
            Ok(0) => break, // EOF ends the session
            Ok(_) => {}
            Err(err) => {
                eprintln!("basic: {err}");
                return ExitCode::FAILURE;
            }
        }
        let text = buffer.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            continue;
        }
        feed(&mut basic, text);
    }
    ExitCode::SUCCESS
}

/// Parse and execute one line, reporting rather than propagating errors.
fn feed(basic: &mut Interpreter, text: &str) {
    match basic_parse::parse_line(text) {
        Ok(line) => {
            let executed = line.number.is_none();
            if let Err(err) = basic.run_immediate(line) {
                println!("{err}");
            } else if executed {
                println!("READY.");
            }
        }
        Err(errors) => {
            for error in errors {
                println!("?SYNTAX ERROR: {error}");
            }
        }
    }
}
