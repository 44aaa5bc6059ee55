//! Side-effect boundary for the conversion pipeline.
//!
//! Everything the pipeline does to the outside world goes through one of two
//! capability traits:
//! - `process` - running an external converter and capturing its output
//! - `fs` - existence checks, directory listing and small text files
//!
//! Production code uses `ProcessRunner` and `LocalFs`. Tests substitute
//! scripted implementations.

pub mod fs;
pub mod process;

pub use fs::{LocalFs, ModelFs};
pub use process::{last_non_empty_line, ProcessRunner, ToolInvocation, ToolOutput, ToolRunner};
