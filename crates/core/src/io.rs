//! The two structured JSON input documents (`spec.md` §6): the polyhedron
//! description and the root-pair list. Parsed once at load time; a malformed
//! or schema-mismatched document is a `StructuralInput` error, fatal before
//! any record is emitted.

use std::io::Read;

use serde::Deserialize;

use crate::error::{CoreError, Result};
use crate::poly::{EdgeId, Face, Polyhedron, RootPair};

const SCHEMA_VERSION: u32 = 1;

#[derive(Deserialize)]
struct PolyhedronDoc {
    schema_version: u32,
    polyhedron: PolyhedronMeta,
    faces: Vec<FaceDoc>,
}

#[derive(Deserialize)]
struct PolyhedronMeta {
    class: String,
    name: String,
}

#[derive(Deserialize)]
struct FaceDoc {
    face_id: usize,
    gon: usize,
    neighbors: Vec<NeighborDoc>,
}

#[derive(Deserialize)]
struct NeighborDoc {
    edge_id: EdgeId,
    face_id: usize,
}

/// Parse and validate a polyhedron document (`spec.md` §6).
pub fn parse_polyhedron(bytes: &[u8]) -> Result<Polyhedron> {
    let doc: PolyhedronDoc = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::StructuralInput(format!("malformed polyhedron document: {e}")))?;
    if doc.schema_version != SCHEMA_VERSION {
        return Err(CoreError::StructuralInput(format!(
            "unsupported polyhedron schema_version {}",
            doc.schema_version
        )));
    }
    let faces = doc
        .faces
        .into_iter()
        .map(|f| {
            let (edges, neighbors) = f
                .neighbors
                .into_iter()
                .map(|n| (n.edge_id, n.face_id))
                .unzip();
            Face {
                face_id: f.face_id,
                gon: f.gon,
                edges,
                neighbors,
            }
        })
        .collect();
    Polyhedron::new(doc.polyhedron.name, doc.polyhedron.class, faces)
}

/// Read and parse a polyhedron document from a reader.
pub fn read_polyhedron<R: Read>(mut reader: R) -> Result<Polyhedron> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_polyhedron(&bytes)
}

#[derive(Deserialize)]
struct RootPairDoc {
    schema_version: u32,
    root_pairs: Vec<RootPairEntry>,
}

#[derive(Deserialize)]
struct RootPairEntry {
    base_face: usize,
    base_edge: EdgeId,
}

/// Parse and validate a root-pair document (`spec.md` §6).
pub fn parse_root_pairs(bytes: &[u8]) -> Result<Vec<RootPair>> {
    let doc: RootPairDoc = serde_json::from_slice(bytes)
        .map_err(|e| CoreError::StructuralInput(format!("malformed root-pair document: {e}")))?;
    if doc.schema_version != SCHEMA_VERSION {
        return Err(CoreError::StructuralInput(format!(
            "unsupported root-pair schema_version {}",
            doc.schema_version
        )));
    }
    Ok(doc
        .root_pairs
        .into_iter()
        .map(|e| RootPair {
            base_face: e.base_face,
            base_edge: e.base_edge,
        })
        .collect())
}

/// Read and parse a root-pair document from a reader.
pub fn read_root_pairs<R: Read>(mut reader: R) -> Result<Vec<RootPair>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_root_pairs(&bytes)
}
