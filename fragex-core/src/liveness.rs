//! Liveness predicates over program atoms.
//!
//! A predicate answers, for each of the four atom kinds (declared type,
//! field, method, string literal), whether that atom is guaranteed runnable
//! once a given set of fragments has loaded, plus a catch-all answer for
//! statements the extractor does not recognize.
//!
//! Predicates must satisfy the load-order dependencies: for any atom
//! considered live, the atoms it depends on at load time are also live
//! (a live type implies its live supertype, a live instance method implies
//! its live enclosing type, a field statically initialized from a string
//! implies that string). The extraction pass relies on these properties and
//! does not re-derive them; they are the analysis collaborator's contract.

use crate::model::{FieldId, MethodId, StringId, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A read-only liveness oracle over the four atom kinds.
pub trait LivenessPredicate {
    fn type_is_live(&self, ty: TypeId) -> bool;

    fn field_is_live(&self, field: FieldId) -> bool;

    fn method_is_live(&self, method: MethodId) -> bool;

    fn string_is_live(&self, string: StringId) -> bool;

    /// Whether miscellaneous statements are live. Miscellaneous statements
    /// are any the extractor does not recognize as belonging to a specific
    /// atom. Almost always `true`; `false` only for [`NothingLive`].
    fn miscellaneous_live(&self) -> bool;
}

/// The result sets of a reachability analysis, computed upstream and
/// supplied fully formed. One snapshot exists per split point.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub instantiated_types: HashSet<TypeId>,
    pub live_methods: HashSet<MethodId>,
    pub live_fields: HashSet<FieldId>,
    /// Fields written somewhere reachable. A write-only field still needs
    /// its storage to exist, so these count as live even without a live read.
    pub written_fields: HashSet<FieldId>,
    pub live_strings: HashSet<StringId>,
}

/// A [`LivenessPredicate`] backed by one analysis snapshot.
#[derive(Debug, Clone)]
pub struct AnalysisLiveness {
    snapshot: AnalysisSnapshot,
}

impl AnalysisLiveness {
    pub fn new(snapshot: AnalysisSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &AnalysisSnapshot {
        &self.snapshot
    }
}

impl LivenessPredicate for AnalysisLiveness {
    fn type_is_live(&self, ty: TypeId) -> bool {
        self.snapshot.instantiated_types.contains(&ty)
    }

    fn field_is_live(&self, field: FieldId) -> bool {
        self.snapshot.live_fields.contains(&field) || self.snapshot.written_fields.contains(&field)
    }

    fn method_is_live(&self, method: MethodId) -> bool {
        self.snapshot.live_methods.contains(&method)
    }

    fn string_is_live(&self, string: StringId) -> bool {
        self.snapshot.live_strings.contains(&string)
    }

    fn miscellaneous_live(&self) -> bool {
        true
    }
}

/// A [`LivenessPredicate`] where nothing is alive. Used as the
/// already-loaded side of the very first fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NothingLive;

impl LivenessPredicate for NothingLive {
    fn type_is_live(&self, _ty: TypeId) -> bool {
        false
    }

    fn field_is_live(&self, _field: FieldId) -> bool {
        false
    }

    fn method_is_live(&self, _method: MethodId) -> bool {
        false
    }

    fn string_is_live(&self, _string: StringId) -> bool {
        false
    }

    fn miscellaneous_live(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_fields_count_as_live() {
        let mut snapshot = AnalysisSnapshot::default();
        snapshot.live_fields.insert(FieldId(0));
        snapshot.written_fields.insert(FieldId(1));
        let pred = AnalysisLiveness::new(snapshot);

        assert!(pred.field_is_live(FieldId(0)));
        assert!(pred.field_is_live(FieldId(1)));
        assert!(!pred.field_is_live(FieldId(2)));
    }

    #[test]
    fn test_analysis_sets_answer_each_atom_kind() {
        let mut snapshot = AnalysisSnapshot::default();
        snapshot.instantiated_types.insert(TypeId(3));
        snapshot.live_methods.insert(MethodId(5));
        snapshot.live_strings.insert(StringId(2));
        let pred = AnalysisLiveness::new(snapshot);

        assert!(pred.type_is_live(TypeId(3)));
        assert!(!pred.type_is_live(TypeId(4)));
        assert!(pred.method_is_live(MethodId(5)));
        assert!(pred.string_is_live(StringId(2)));
        assert!(pred.miscellaneous_live());
    }

    #[test]
    fn test_nothing_live() {
        let pred = NothingLive;
        assert!(!pred.type_is_live(TypeId(0)));
        assert!(!pred.field_is_live(FieldId(0)));
        assert!(!pred.method_is_live(MethodId(0)));
        assert!(!pred.string_is_live(StringId(0)));
        assert!(!pred.miscellaneous_live());
    }
}
