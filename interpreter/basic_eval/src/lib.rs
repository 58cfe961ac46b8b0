//! Evaluator/runtime for the BASIC interpreter.
//!
//! Owns the stored program, the variable scopes, the FOR and GOSUB
//! stacks, the DATA pool, and the continuation point; talks to the
//! outside world only through the [`Host`] seam. Feed it parsed lines:
//! numbered ones are stored, unnumbered ones execute immediately.
//!
//! ```no_run
//! use basic_eval::{Interpreter, MemHost};
//!
//! let (host, handle) = MemHost::new();
//! let mut basic = Interpreter::new(host);
//! basic.run_source("10 PRINT \"HELLO\"\nRUN").ok();
//! assert_eq!(handle.printed(), vec!["HELLO"]);
//! ```

mod array;
mod builtins;
mod errors;
mod graphics;
mod host;
mod interpreter;
mod ops;
mod program;
mod scope;
mod value;

pub use array::{ArrayRef, ArrayValue, Dims};
pub use builtins::Builtin;
pub use errors::{EvalError, EvalResult};
pub use graphics::Surface;
pub use host::{Host, HostError, MemHost, MemHostHandle, MemSurface};
pub use interpreter::{Interpreter, InterpreterBuilder, State, StopHandle};
pub use program::{Program, ProgramLine};
pub use scope::{Environment, Scope};
pub use value::{FunctionValue, Value};
