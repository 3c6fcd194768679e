//! The fragment-extraction engine.
//!
//! Given the master instruction stream and two liveness predicates — what
//! must be runnable once this fragment loads (`current`) and what earlier
//! fragments already guaranteed (`already`) — a single forward pass selects
//! the minimal ordered subsequence of statements the fragment must ship.
//!
//! Liveness here is not the intuitive notion: an atom is live for the
//! current fragment when it can only run once this fragment has loaded,
//! which may be caused by another fragment's execution being unblocked
//! rather than by direct execution of this one. That is why a type can be
//! dead for a fragment while one of its constructors is live for it, and
//! why the registration keep-condition checks both independently.
//!
//! The one ordering constraint the pass enforces itself: a type's
//! registration statement must precede any statement that installs a method
//! into that type's vtable. A registration that was not independently
//! selected is buffered in a one-slot pending state and hoisted out
//! immediately before the first install that needs it. Everything else
//! keeps its original relative order.

use crate::classify;
use crate::error::{FragexError, FragexResult};
use crate::ir::{Expr, Statement, StatementKind, Stream};
use crate::liveness::{AnalysisLiveness, LivenessPredicate, NothingLive};
use crate::minimize::minimize_registration;
use crate::model::{MethodId, Program, TypeId, WellKnownNames};
use crate::resolve::EntityMap;
use crate::vargroup::filter_var_group;
use rayon::prelude::*;
use std::collections::HashSet;
use std::mem;
use tracing::{debug, trace};

/// Per-statement diagnostic callback: sees every master statement (in its
/// possibly pruned form) together with the keep decision. Implementations
/// must not fail.
pub trait StatementLogger: Send + Sync {
    fn log_statement(&self, statement: &Statement, kept: bool);
}

/// The default logger: discards everything.
struct NullStatementLogger;

impl StatementLogger for NullStatementLogger {
    fn log_statement(&self, _statement: &Statement, _kept: bool) {}
}

/// A [`StatementLogger`] that emits one `tracing` event per statement.
#[derive(Debug, Default)]
pub struct TracingStatementLogger;

impl StatementLogger for TracingStatementLogger {
    fn log_statement(&self, statement: &Statement, kept: bool) {
        let shape = match &statement.kind {
            StatementKind::Expr(_) => "expr",
            StatementKind::VarGroup(_) => "vars",
            StatementKind::Empty => "empty",
        };
        trace!(statement = statement.id.0, shape, kept);
    }
}

/// The one-slot buffer for a registration that was not independently
/// selected but may still be needed by a later vtable install.
enum PendingRegistration {
    Idle,
    Buffered { ty: TypeId, statement: Statement },
}

impl PendingRegistration {
    /// Buffer a minimized registration, displacing any prior occupant.
    /// Consecutive unselected registrations legitimately displace one
    /// another; only a mismatched take is an inconsistency.
    fn buffer(&mut self, program: &Program, ty: TypeId, statement: Statement) {
        if let PendingRegistration::Buffered { ty: prior, .. } = self {
            trace!(
                displaced = %program.type_data(*prior).name,
                buffered = %program.type_data(ty).name,
                "pending registration displaced"
            );
        }
        *self = PendingRegistration::Buffered { ty, statement };
    }

    /// Consume the buffer for an install that needs `required`'s
    /// registration in place. An empty or mismatched buffer means the
    /// program/predicate inputs violate their load-order contract.
    fn take_for(&mut self, program: &Program, required: TypeId) -> FragexResult<Statement> {
        match mem::replace(self, PendingRegistration::Idle) {
            PendingRegistration::Buffered { ty, statement } if ty == required => Ok(statement),
            PendingRegistration::Buffered { ty, .. } => Err(FragexError::PendingTypeMismatch {
                buffered: program.type_data(ty).name.clone(),
                required: program.type_data(required).name.clone(),
            }),
            PendingRegistration::Idle => Err(FragexError::NoPendingRegistration {
                required: program.type_data(required).name.clone(),
            }),
        }
    }
}

/// Extracts fragments out of the complete instruction stream based on
/// supplied type/method/field/string liveness conditions.
///
/// Constructed once per whole-program compile; bound read-only to the
/// program model, the stream, and the entity map, with the well-known
/// runtime handles injected up front. Each [`extract_statements`] call is
/// independent and side-effect-free on the inputs, so distinct fragments
/// may be extracted concurrently.
///
/// [`extract_statements`]: FragmentExtractor::extract_statements
pub struct FragmentExtractor<'a> {
    program: &'a Program,
    stream: &'a Stream,
    map: &'a EntityMap,
    names: WellKnownNames,
    logger: Box<dyn StatementLogger>,
}

impl<'a> FragmentExtractor<'a> {
    pub fn new(
        program: &'a Program,
        stream: &'a Stream,
        map: &'a EntityMap,
        names: WellKnownNames,
    ) -> Self {
        Self {
            program,
            stream,
            map,
            names,
            logger: Box::new(NullStatementLogger),
        }
    }

    /// Install a per-statement diagnostic logger.
    pub fn set_statement_logger(&mut self, logger: Box<dyn StatementLogger>) {
        self.logger = logger;
    }

    /// Assume everything described by `already` has been downloaded, and
    /// extract enough statements that everything described by `current`
    /// can also run. The caller guarantees `current` covers strictly more
    /// live code than `already`.
    ///
    /// Output preserves original relative order except for the documented
    /// hoist of a buffered registration immediately before the install
    /// statement that requires it.
    pub fn extract_statements(
        &self,
        current: &dyn LivenessPredicate,
        already: &dyn LivenessPredicate,
    ) -> FragexResult<Vec<Statement>> {
        let mut extracted: Vec<Statement> = Vec::new();
        let mut current_vtable_type: Option<TypeId> = None;
        let mut pending = PendingRegistration::Idle;

        for statement in self.stream.master() {
            let mut replacement: Option<Statement> = None;
            let keep;

            let registered = classify::registration_target(&self.names, self.map, statement);
            if let Some(ty) = registered {
                let minimized =
                    minimize_registration(self.program, self.map, statement, current, already);
                let newly_live_type = current.type_is_live(ty) && !already.type_is_live(ty);
                // Both conditions stand on their own: a type can become
                // newly live with zero retained constructors, and a dead
                // type can still have a constructor this fragment unlocks.
                if minimized.retained_constructors > 0 || newly_live_type {
                    replacement = Some(minimized.statement);
                    keep = true;
                } else {
                    pending.buffer(self.program, ty, minimized.statement);
                    keep = false;
                }
            } else if classify::has_removable_decls(self.map, statement) {
                let filtered = filter_var_group(self.map, statement, current, already);
                keep = filtered.kind != StatementKind::Empty;
                if keep {
                    replacement = Some(filtered.into_owned());
                }
            } else {
                keep = self.statement_is_live(statement, current)
                    && !self.statement_is_live(statement, already);
            }

            self.logger
                .log_statement(replacement.as_ref().unwrap_or(statement), keep);

            if keep {
                if let Some(ty) = registered {
                    current_vtable_type = Some(ty);
                }
                if let Some(needed) = classify::vtable_type_needed(self.program, self.map, statement)
                {
                    if current_vtable_type != Some(needed) {
                        let buffered = pending.take_for(self.program, needed)?;
                        extracted.push(buffered);
                        current_vtable_type = Some(needed);
                    }
                }
                extracted.push(replacement.unwrap_or_else(|| statement.clone()));
            }
        }

        debug!(
            total = self.stream.master().len(),
            extracted = extracted.len(),
            "fragment extraction finished"
        );
        Ok(extracted)
    }

    /// Extract one fragment per snapshot, each against the previous
    /// snapshot as already-loaded (the first against nothing). Fragments
    /// are independent, so the chain runs in parallel.
    pub fn extract_sequence(
        &self,
        snapshots: &[AnalysisLiveness],
    ) -> FragexResult<Vec<Vec<Statement>>> {
        snapshots
            .par_iter()
            .enumerate()
            .map(|(index, current)| {
                let already: &dyn LivenessPredicate = if index == 0 {
                    &NothingLive
                } else {
                    &snapshots[index - 1]
                };
                self.extract_statements(current, already)
            })
            .collect()
    }

    /// Build the single statement that notifies the runtime a fragment has
    /// finished loading: a call to the notification entry point, wrapped in
    /// the execution-entry guard, with the split point id as sole argument.
    pub fn create_on_loaded_call(&self, split_point: u32) -> Vec<Statement> {
        let handler = Expr::Call {
            callee: Box::new(Expr::Name(self.names.entry_wrapper)),
            args: vec![Expr::Name(self.names.on_fragment_loaded)],
        };
        let call = Expr::Call {
            callee: Box::new(handler),
            args: vec![Expr::Number(f64::from(split_point))],
        };
        vec![Statement::synthetic(StatementKind::Expr(call))]
    }

    /// Find every method whose defining or installing statement is still
    /// physically present in some finalized fragment block. Later passes
    /// use this to cross-check what pruning left behind.
    pub fn find_methods_in_fragments(&self) -> HashSet<MethodId> {
        let mut present = HashSet::new();
        for block in self.stream.fragments() {
            for statement in block {
                if let Some(method) = classify::method_for(self.map, statement) {
                    present.insert(method);
                }
            }
        }
        present
    }

    /// Liveness of a statement with no special shape: type liveness when
    /// the statement maps to a declared type, else method liveness gated on
    /// the enclosing type for vtable methods, else the miscellaneous flag.
    fn statement_is_live(&self, statement: &Statement, predicate: &dyn LivenessPredicate) -> bool {
        if let Some(ty) = self.map.type_for_statement(statement.id) {
            return predicate.type_is_live(ty);
        }

        if let Some(method) = classify::method_for(self.map, statement) {
            if !predicate.method_is_live(method) {
                return false;
            }
            let data = self.program.method(method);
            return !data.needs_vtable
                || data
                    .enclosing
                    .is_some_and(|ty| predicate.type_is_live(ty));
        }

        predicate.miscellaneous_live()
    }
}
