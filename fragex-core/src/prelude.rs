//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use fragex_core::prelude::*;
//! ```

// Core extraction types
pub use crate::error::{FragexError, FragexResult};
pub use crate::extract::{FragmentExtractor, StatementLogger, TracingStatementLogger};

// Liveness predicates
pub use crate::liveness::{AnalysisLiveness, AnalysisSnapshot, LivenessPredicate, NothingLive};

// Program model and instruction stream
pub use crate::ir::{Expr, Statement, StatementId, StatementKind, Stream, VarDecl};
pub use crate::model::{
    FieldId, MethodId, MethodKind, NameId, Program, StringId, TypeId, WellKnownNames,
};
pub use crate::resolve::EntityMap;

// Bundle loading
pub use crate::load::{load_bundle, parse_bundle, ProgramBundle};

// Reporting
pub use crate::report::ExtractionReport;

// Configuration
pub use crate::config::{load_config, FragexConfig};
