//! I/O collaborators for the finite element solver: JSON input document
//! loading and Gmsh result export.
//!
//! This crate owes the solver core exactly two things: populated input
//! records on the way in, and serialization of the displacement/stress
//! arrays on the way out. Everything numerical lives in `fea-solver`.

pub mod error;
pub mod gmsh;
pub mod loader;

pub use error::{IoError, Result};
pub use gmsh::{write_gmsh, write_gmsh_file};
pub use loader::{InputDocument, parse_input, read_input};
