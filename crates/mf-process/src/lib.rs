//! Ordered, nestable process graphs.
//!
//! A [`Process`] is an ordered list of named nodes. Each node is either a step
//! (a closure over a mutable context) or a nested process. Running a process
//! executes every step depth-first in insertion order; the first error aborts
//! the run and is returned unmodified.
//!
//! ```
//! use mf_process::Process;
//!
//! let inner = Process::<Vec<u32>, ()>::new()
//!     .step("b", |log| { log.push(2); Ok(()) });
//! let root = Process::new()
//!     .step("a", |log: &mut Vec<u32>| { log.push(1); Ok(()) })
//!     .sub("inner", inner)
//!     .step("c", |log| { log.push(3); Ok(()) });
//!
//! let mut log = Vec::new();
//! root.run(&mut log).unwrap();
//! assert_eq!(log, [1, 2, 3]);
//! ```

pub mod process;

pub use process::{Node, Process, Step};
