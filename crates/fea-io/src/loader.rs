//! JSON input document loader.
//!
//! An input document carries the five records the solver facade consumes:
//! the task, the solution parameters, the node and element arrays, and the
//! prescribed boundary set. Deserialization here is structural only;
//! semantic validation (dof counts, Gauss rules, connectivity) is the
//! facade's job.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use fea_model::{Element, Mesh, Node, PrescribedBc, SolutionParams, Task};

use crate::error::{IoError, Result};

/// The deserialized input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    /// Task description: element type, material, solver configuration
    pub task: Task,
    /// Solution parameters; defaults to TET10 with the 5-point rule
    #[serde(default)]
    pub params: SolutionParams,
    /// Node coordinates, 0-indexed
    pub nodes: Vec<Node>,
    /// Element connectivity, 0-based node indices
    pub elements: Vec<Element>,
    /// Prescribed boundary conditions
    #[serde(default)]
    pub boundary: Vec<PrescribedBc>,
}

impl InputDocument {
    /// Split the document into the records the solver facade takes.
    pub fn into_records(self) -> (Task, SolutionParams, Mesh, Vec<PrescribedBc>) {
        let mesh = Mesh::new(self.nodes, self.elements);
        (self.task, self.params, mesh, self.boundary)
    }
}

/// Parse an input document from a JSON string.
pub fn parse_input(source: &str) -> Result<InputDocument> {
    let document: InputDocument = serde_json::from_str(source)?;
    if document.nodes.is_empty() {
        return Err(IoError::InvalidData("no nodes defined".to_string()));
    }
    if document.elements.is_empty() {
        return Err(IoError::InvalidData("no elements defined".to_string()));
    }
    Ok(document)
}

/// Read an input document from a file.
pub fn read_input(path: &Path) -> Result<InputDocument> {
    if !path.exists() {
        return Err(IoError::FileNotFound(path.display().to_string()));
    }
    let source = fs::read_to_string(path)?;
    parse_input(&source)
}
