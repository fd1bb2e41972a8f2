//! Gmsh `.msh` 2.0 ASCII export.
//!
//! Writes the reference mesh with the nodal displacement field and the
//! per-element Cauchy stress tensor attached, consumable by Gmsh for
//! post-processing.
//!
//! The solver's TET10 node ordering and Gmsh's differ in the last two
//! mid-edge nodes (local 8 and 9 are exchanged), so element connectivity
//! is permuted on output:
//!
//! ```text
//!    solver Tetrahedron10:                    Gmsh Tetrahedron10:
//!
//!            2                                        2
//!          ,/|`\                                    ,/|`\
//!        ,6  |  `5                                ,6  |  `5
//!      ,/    9    `\                            ,/    8    `\
//!     0-----4-'.----1                          0-----4-'.----1
//!      `\.   |    ,8                            `\.   |    ,9
//!         `7.|  ,/                                 `7.|  ,/
//!            `3                                       `3
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use fea_model::{Element, Node};

use crate::error::Result;

/// Gmsh element type id for the 10-node tetrahedron
const GMSH_TET10: u32 = 11;

/// Write the mesh with displacement and stress fields to a Gmsh stream.
///
/// `nodes` is the reference (undeformed) configuration; `displacements` is
/// the node-major solution vector; `stresses` holds one 3×3 tensor per
/// element.
pub fn write_gmsh<W: Write>(
    writer: &mut W,
    nodes: &[Node],
    elements: &[Element],
    displacements: &[f64],
    stresses: &[[[f64; 3]; 3]],
) -> Result<()> {
    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "2.0 0 8")?;
    writeln!(writer, "$EndMeshFormat")?;

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", nodes.len())?;
    for (i, node) in nodes.iter().enumerate() {
        writeln!(writer, "{} {:.6} {:.6} {:.6}", i + 1, node.x, node.y, node.z)?;
    }
    writeln!(writer, "$EndNodes")?;

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", elements.len())?;
    for (i, element) in elements.iter().enumerate() {
        write!(writer, "{} {} 3 1 1 1", i + 1, GMSH_TET10)?;
        for &node_id in &element.nodes[..8] {
            write!(writer, " {}", node_id + 1)?;
        }
        write!(writer, " {}", element.nodes[9] + 1)?;
        write!(writer, " {}", element.nodes[8] + 1)?;
        writeln!(writer)?;
    }
    writeln!(writer, "$EndElements")?;

    writeln!(writer, "$NodeData")?;
    writeln!(writer, "1")?;
    writeln!(writer, "\"Displacements\"")?;
    writeln!(writer, "1")?; // number of real tags
    writeln!(writer, "0.0")?; // timestamp
    writeln!(writer, "3")?; // number of integer tags
    writeln!(writer, "0")?; // step index
    writeln!(writer, "3")?; // field components
    writeln!(writer, "{}", nodes.len())?;
    for i in 0..nodes.len() {
        writeln!(
            writer,
            "{} {:.6} {:.6} {:.6}",
            i + 1,
            displacements[i * 3],
            displacements[i * 3 + 1],
            displacements[i * 3 + 2]
        )?;
    }
    writeln!(writer, "$EndNodeData")?;

    writeln!(writer, "$ElementData")?;
    writeln!(writer, "1")?;
    writeln!(writer, "\"Stress tensor\"")?;
    writeln!(writer, "1")?;
    writeln!(writer, "0.0")?;
    writeln!(writer, "3")?;
    writeln!(writer, "0")?;
    writeln!(writer, "9")?; // full tensor per element
    writeln!(writer, "{}", elements.len())?;
    for (i, tensor) in stresses.iter().enumerate() {
        write!(writer, "{}", i + 1)?;
        for row in tensor {
            for &entry in row {
                write!(writer, " {:.6}", entry)?;
            }
        }
        writeln!(writer)?;
    }
    writeln!(writer, "$EndElementData")?;

    Ok(())
}

/// Write the mesh with fields to a `.msh` file.
pub fn write_gmsh_file(
    path: &Path,
    nodes: &[Node],
    elements: &[Element],
    displacements: &[f64],
    stresses: &[[[f64; 3]; 3]],
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_gmsh(&mut writer, nodes, elements, displacements, stresses)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mesh() -> (Vec<Node>, Vec<Element>, Vec<f64>, Vec<[[f64; 3]; 3]>) {
        let nodes: Vec<Node> = (0..10)
            .map(|i| Node::new(i as f64, 0.0, 0.0))
            .collect();
        let elements = vec![Element::new((0..10).collect())];
        let displacements = vec![0.0; 30];
        let stresses = vec![[[1.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, 0.5]]];
        (nodes, elements, displacements, stresses)
    }

    #[test]
    fn output_carries_all_sections() {
        let (nodes, elements, displacements, stresses) = sample_mesh();
        let mut buffer = Vec::new();
        write_gmsh(&mut buffer, &nodes, &elements, &displacements, &stresses).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        for section in [
            "$MeshFormat",
            "$Nodes",
            "$Elements",
            "$NodeData",
            "\"Displacements\"",
            "$ElementData",
            "\"Stress tensor\"",
            "$EndElementData",
        ] {
            assert!(text.contains(section), "missing {section}");
        }
    }

    #[test]
    fn element_connectivity_swaps_last_mid_edge_nodes() {
        let (nodes, elements, displacements, stresses) = sample_mesh();
        let mut buffer = Vec::new();
        write_gmsh(&mut buffer, &nodes, &elements, &displacements, &stresses).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        // solver order 0..9 becomes 1-based 1..8, then 10, then 9
        assert!(text.contains("1 11 3 1 1 1 1 2 3 4 5 6 7 8 10 9"));
    }

    #[test]
    fn writes_to_file() {
        let (nodes, elements, displacements, stresses) = sample_mesh();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deformed.msh");
        write_gmsh_file(&path, &nodes, &elements, &displacements, &stresses).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("$MeshFormat"));
        assert!(text.trim_end().ends_with("$EndElementData"));
    }
}
