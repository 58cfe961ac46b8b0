//! The host interface — the only seam between the core and its embedder.
//!
//! The core reaches the outside world exclusively through [`Host`]:
//! printing, reading input, loading and saving program text, creating a
//! drawable surface, and rendering `LIST` output. Hosts may block inside
//! any of these calls; the execution loop treats each statement dispatch
//! as one discrete scheduling unit, so a blocking host call suspends
//! exactly one statement.
//!
//! [`MemHost`] is the in-memory implementation used by tests: scripted
//! input lines, captured print/list channels, an in-memory file store,
//! and an RGBA software surface.

use crate::graphics::Surface;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;

/// Rejection from the embedding environment.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// LOAD of a name the host has no source for.
    #[error("FILE NOT FOUND")]
    NotFound,
    /// Any other host-side refusal; the message is surfaced verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// The embedding environment as the core sees it.
pub trait Host {
    /// Emit one piece of output. The core appends no newline of its own.
    fn print(&mut self, text: &str) -> Result<(), HostError>;

    /// Read one line of user input, returned verbatim.
    ///
    /// A cancelled host should resolve with the empty string rather than
    /// blocking forever.
    fn input(&mut self, prompt: Option<&str>) -> Result<String, HostError>;

    /// Return the source of a saved program.
    fn load(&mut self, filename: &str) -> Result<String, HostError>;

    /// Persist program source under a name.
    fn save(&mut self, filename: &str, text: &str) -> Result<(), HostError>;

    /// Create a drawable surface of the given size.
    fn create_image(&mut self, width: u32, height: u32) -> Result<Box<dyn Surface>, HostError>;

    /// Render `LIST` output; defaults to the print channel.
    fn list(&mut self, text: &str) -> Result<(), HostError> {
        self.print(text)
    }
}

#[derive(Default)]
struct MemState {
    printed: Vec<String>,
    listed: Vec<String>,
    inputs: VecDeque<String>,
    files: FxHashMap<String, String>,
}

/// In-memory host for tests and embedding without real I/O.
pub struct MemHost {
    state: Arc<Mutex<MemState>>,
}

/// Inspection handle onto a [`MemHost`]'s captured state.
///
/// The handle stays usable while the interpreter owns the host.
#[derive(Clone)]
pub struct MemHostHandle {
    state: Arc<Mutex<MemState>>,
}

impl MemHost {
    /// Create the host together with its inspection handle.
    pub fn new() -> (MemHost, MemHostHandle) {
        let state = Arc::new(Mutex::new(MemState::default()));
        (
            MemHost {
                state: Arc::clone(&state),
            },
            MemHostHandle { state },
        )
    }
}

impl Host for MemHost {
    fn print(&mut self, text: &str) -> Result<(), HostError> {
        self.state.lock().printed.push(text.to_string());
        Ok(())
    }

    fn input(&mut self, _prompt: Option<&str>) -> Result<String, HostError> {
        // An exhausted input script resolves empty, the cancellation
        // contract for pending input.
        Ok(self.state.lock().inputs.pop_front().unwrap_or_default())
    }

    fn load(&mut self, filename: &str) -> Result<String, HostError> {
        self.state
            .lock()
            .files
            .get(filename)
            .cloned()
            .ok_or(HostError::NotFound)
    }

    fn save(&mut self, filename: &str, text: &str) -> Result<(), HostError> {
        self.state
            .lock()
            .files
            .insert(filename.to_string(), text.to_string());
        Ok(())
    }

    fn create_image(&mut self, width: u32, height: u32) -> Result<Box<dyn Surface>, HostError> {
        Ok(Box::new(MemSurface::new(width, height)))
    }

    fn list(&mut self, text: &str) -> Result<(), HostError> {
        self.state.lock().listed.push(text.to_string());
        Ok(())
    }
}

impl MemHostHandle {
    /// Everything printed so far, one entry per `host.print` call.
    pub fn printed(&self) -> Vec<String> {
        self.state.lock().printed.clone()
    }

    /// Everything sent to the `LIST` channel.
    pub fn listed(&self) -> Vec<String> {
        self.state.lock().listed.clone()
    }

    /// Queue one line of scripted input.
    pub fn push_input(&self, line: impl Into<String>) {
        self.state.lock().inputs.push_back(line.into());
    }

    /// Read back a saved file.
    pub fn file(&self, filename: &str) -> Option<String> {
        self.state.lock().files.get(filename).cloned()
    }

    /// Seed a file for LOAD.
    pub fn put_file(&self, filename: impl Into<String>, text: impl Into<String>) {
        self.state.lock().files.insert(filename.into(), text.into());
    }

    /// Drop captured output, keeping files and pending input.
    pub fn clear_output(&self) {
        let mut state = self.state.lock();
        state.printed.clear();
        state.listed.clear();
    }
}

/// Software RGBA surface backing the in-memory host.
pub struct MemSurface {
    width: u32,
    height: u32,
    pixels: Vec<String>,
}

impl MemSurface {
    pub fn new(width: u32, height: u32) -> Self {
        MemSurface {
            width,
            height,
            pixels: vec![String::new(); (width as usize) * (height as usize)],
        }
    }
}

impl Surface for MemSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: &str) {
        for pixel in &mut self.pixels {
            color.clone_into(pixel);
        }
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: &str) {
        if x < self.width && y < self.height {
            let index = (y as usize) * (self.width as usize) + x as usize;
            color.clone_into(&mut self.pixels[index]);
        }
    }

    fn get_pixel(&self, x: u32, y: u32) -> Option<String> {
        if x < self.width && y < self.height {
            let index = (y as usize) * (self.width as usize) + x as usize;
            Some(self.pixels[index].clone())
        } else {
            None
        }
    }
}
