//! The stdio host: terminal output, terminal input, and program files in
//! the working directory.

use basic_eval::{Host, HostError, MemSurface, Surface};
use std::fs;
use std::io::{self, BufRead, Write};

/// Host wired to stdout/stdin and the local file system.
///
/// The graphics surface is the in-memory software surface; a terminal has
/// nowhere to blit it, but programs that draw and read pixels back still
/// behave.
pub struct StdioHost;

impl Host for StdioHost {
    fn print(&mut self, text: &str) -> Result<(), HostError> {
        println!("{text}");
        Ok(())
    }

    fn input(&mut self, prompt: Option<&str>) -> Result<String, HostError> {
        if let Some(prompt) = prompt {
            print!("{prompt}");
            io::stdout().flush().ok();
        }
        print!("? ");
        io::stdout().flush().ok();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            // EOF resolves as the empty string, matching cancellation.
            Ok(_) => Ok(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(err) => Err(HostError::Rejected(err.to_string())),
        }
    }

    fn load(&mut self, filename: &str) -> Result<String, HostError> {
        fs::read_to_string(filename).map_err(|_| HostError::NotFound)
    }

    fn save(&mut self, filename: &str, text: &str) -> Result<(), HostError> {
        fs::write(filename, text).map_err(|err| HostError::Rejected(err.to_string()))
    }

    fn create_image(&mut self, width: u32, height: u32) -> Result<Box<dyn Surface>, HostError> {
        Ok(Box::new(MemSurface::new(width, height)))
    }
}
