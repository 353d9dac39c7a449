//! The partial-unfolding stream record (`spec.md` §3, §6): one JSON object
//! per line, UTF-8, `\n`-terminated, with `x`/`y`/`angle_deg` written as
//! fixed six-decimal numbers rather than serde_json's default minimal float
//! representation.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{CoreError, Result};
use crate::geom::round6;
use crate::poly::EdgeId;

pub const SCHEMA_VERSION: u32 = 1;
const RECORD_TYPE: &str = "partial_unfolding";

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasePair {
    pub base_face: usize,
    pub base_edge: EdgeId,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct UnfoldedFace {
    pub face_id: usize,
    pub gon: usize,
    pub edge_id: EdgeId,
    pub x: f64,
    pub y: f64,
    pub angle_deg: f64,
}

impl Serialize for UnfoldedFace {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("UnfoldedFace", 6)?;
        s.serialize_field("face_id", &self.face_id)?;
        s.serialize_field("gon", &self.gon)?;
        s.serialize_field("edge_id", &self.edge_id)?;
        s.serialize_field("x", &fixed6(self.x))?;
        s.serialize_field("y", &fixed6(self.y))?;
        s.serialize_field("angle_deg", &fixed6(self.angle_deg))?;
        s.end()
    }
}

/// Format a value as a fixed six-decimal JSON number literal (half-away-from-zero).
fn fixed6(v: f64) -> Box<RawValue> {
    let rounded = round6(v);
    // Avoid emitting "-0.000000".
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    RawValue::from_string(format!("{rounded:.6}")).expect("fixed-point literal is valid JSON")
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapKind {
    FaceFace,
    EdgeEdge,
    EdgeVertex,
    VertexVertex,
}

impl OverlapKind {
    /// Strength ordering used by E3's priority classification (`spec.md` §4.3.4):
    /// face-face > edge-edge > edge-vertex = vertex-vertex.
    pub fn strength(self) -> u8 {
        match self {
            OverlapKind::FaceFace => 3,
            OverlapKind::EdgeEdge => 2,
            OverlapKind::EdgeVertex => 1,
            OverlapKind::VertexVertex => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExactOverlap {
    pub kind: OverlapKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PartialUnfolding {
    pub schema_version: u32,
    pub record_type: String,
    pub base_pair: BasePair,
    pub symmetric_used: bool,
    pub faces: Vec<UnfoldedFace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_overlap: Option<ExactOverlap>,
}

impl PartialUnfolding {
    pub fn new(base_pair: BasePair, symmetric_used: bool, faces: Vec<UnfoldedFace>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            record_type: RECORD_TYPE.to_string(),
            base_pair,
            symmetric_used,
            faces,
            exact_overlap: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(CoreError::RecordFormat(format!(
                "unsupported schema_version {}",
                self.schema_version
            )));
        }
        if self.record_type != RECORD_TYPE {
            return Err(CoreError::RecordFormat(format!(
                "unexpected record_type {:?}",
                self.record_type
            )));
        }
        if self.faces.is_empty() {
            return Err(CoreError::RecordFormat("faces must be non-empty".into()));
        }
        let mut seen = std::collections::HashSet::with_capacity(self.faces.len());
        for f in &self.faces {
            if !seen.insert(f.face_id) {
                return Err(CoreError::RecordFormat(format!(
                    "duplicate face_id {} within one record",
                    f.face_id
                )));
            }
        }
        Ok(())
    }
}

/// Parse one stream line into a validated record. Fatal (per §7) on any parse
/// or schema failure.
pub fn parse_line(line: &str) -> Result<PartialUnfolding> {
    let record: PartialUnfolding = serde_json::from_str(line)
        .map_err(|e| CoreError::RecordFormat(format!("malformed record: {e}")))?;
    record.validate()?;
    Ok(record)
}

/// Read every record from a line-oriented stream, in order.
pub fn read_all<R: BufRead>(reader: R) -> Result<Vec<PartialUnfolding>> {
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(parse_line(&line)?);
    }
    Ok(out)
}

/// Write one record as a line, `\n`-terminated.
pub fn write_line<W: Write>(mut writer: W, record: &PartialUnfolding) -> Result<()> {
    let line = serde_json::to_string(record)
        .map_err(|e| CoreError::RecordFormat(format!("failed to serialize record: {e}")))?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}
