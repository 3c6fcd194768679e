//! Loading of serialized program bundles.
//!
//! A bundle is the JSON form of everything one extraction run consumes:
//! the entity model, the instruction stream, the resolution map, the
//! well-known runtime handles, and one analysis snapshot per split point.
//! The code generator (or a test harness) produces it; nothing here
//! validates the liveness invariants — those remain the producer's
//! contract.

use crate::error::{FragexError, FragexResult};
use crate::ir::Stream;
use crate::liveness::AnalysisSnapshot;
use crate::model::{Program, WellKnownNames};
use crate::resolve::EntityMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything one extraction run consumes, in serializable form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramBundle {
    pub program: Program,
    pub stream: Stream,
    pub map: EntityMap,
    pub well_known: WellKnownNames,
    /// One snapshot per split point, in load order.
    pub snapshots: Vec<AnalysisSnapshot>,
}

/// Load a bundle from a JSON file.
pub fn load_bundle(path: &Path) -> FragexResult<ProgramBundle> {
    let text = fs::read_to_string(path).map_err(|e| FragexError::io(path, e))?;
    parse_bundle(&text).map_err(|e| match e {
        FragexError::Bundle { message, .. } => FragexError::bundle(path, message),
        other => other,
    })
}

/// Parse a bundle from JSON text.
pub fn parse_bundle(text: &str) -> FragexResult<ProgramBundle> {
    let mut bundle: ProgramBundle = serde_json::from_str(text)
        .map_err(|e| FragexError::bundle("<memory>", e.to_string()))?;
    // Interning indexes are not serialized; restore them before use.
    bundle.program.rebuild_indexes();
    Ok(bundle)
}
