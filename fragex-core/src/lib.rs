//! fragex-core: fragment extraction for code-splitting compiler backends.
//!
//! Given a compiled program emitted as an ordered instruction stream and
//! two liveness predicates — what a running client is assumed to have
//! already, and what must be runnable once a new downloadable fragment is
//! applied — this library selects the minimal ordered subsequence of
//! statements that fragment must ship.
//!
//! # What makes this hard
//!
//! - **Partial-statement liveness**: one registration or var-group
//!   statement can contain several independently live-or-dead sub-parts;
//!   those are pruned per sub-part, never whole-or-nothing.
//! - **Load-order dependency**: a method cannot be installed into a type's
//!   vtable before the type's registration ran, even when the registration
//!   was not independently selected for this fragment. The engine buffers
//!   the registration and hoists it immediately before the install.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fragex_core::prelude::*;
//!
//! let bundle = load_bundle(Path::new("program.json"))?;
//! let extractor = FragmentExtractor::new(
//!     &bundle.program, &bundle.stream, &bundle.map, bundle.well_known);
//! let fragments = extractor.extract_sequence(
//!     &bundle.snapshots.into_iter().map(AnalysisLiveness::new).collect::<Vec<_>>())?;
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: declared types, methods, fields, interned names
//! - [`ir`]: the instruction stream and expression language
//! - [`resolve`]: emitted-name/statement resolution back to entities
//! - [`liveness`]: liveness predicates (analysis-backed and nothing-live)
//! - [`classify`]: recognition of registration/var-group/install shapes
//! - [`minimize`]: constructor-level pruning of registration statements
//! - [`vargroup`]: declaration-level pruning of var groups
//! - [`extract`]: the single-pass extraction engine
//! - [`emit`]: rendering fragments to source text
//! - [`load`]: serialized program-bundle loading
//! - [`report`]: plain/JSON run reports with content digests
//! - [`error`]: typed error handling

pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod ir;
pub mod liveness;
pub mod load;
pub mod logging;
pub mod minimize;
pub mod model;
pub mod prelude;
pub mod report;
pub mod resolve;
pub mod vargroup;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{FragexError, FragexResult};

// Program model
pub use model::{
    FieldData, FieldId, MethodData, MethodId, MethodKind, NameId, Program, StringId, TypeData,
    TypeId, WellKnownNames,
};

// Instruction stream
pub use ir::{Expr, Statement, StatementId, StatementKind, Stream, VarDecl};

// Resolution
pub use resolve::EntityMap;

// Liveness
pub use liveness::{AnalysisLiveness, AnalysisSnapshot, LivenessPredicate, NothingLive};

// Classification
pub use classify::{
    has_removable_decls, method_for, registration_target, vtable_type_needed, REGISTRATION_PREFIX,
};

// Pruning
pub use minimize::{minimize_registration, MinimizedRegistration};
pub use vargroup::filter_var_group;

// The engine
pub use extract::{FragmentExtractor, StatementLogger, TracingStatementLogger};

// Rendering
pub use emit::{render_fragment, render_statement};

// Bundle loading
pub use load::{load_bundle, parse_bundle, ProgramBundle};

// Reporting
pub use report::{print_json, print_plain, ExtractionReport, FragmentSummary};

// Configuration
pub use config::{load_config, FragexConfig, OutputConfig};

// Logging
pub use logging::init_logging;
