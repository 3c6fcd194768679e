//! Per-declaration filtering of var-group statements.

use crate::ir::{Statement, StatementKind, VarDecl};
use crate::liveness::LivenessPredicate;
use crate::resolve::EntityMap;
use std::borrow::Cow;

/// Filter a var-group down to its newly-live declarations.
///
/// Field-mapped declarations are retained iff the field is live under
/// `current` and not under `already`; unmapped declarations follow the
/// miscellaneous flags the same way. Returns the original statement
/// borrowed when nothing was pruned, a fresh var-group when some
/// declarations survive, and the explicit no-op when none do — an empty
/// var-group never reaches the output.
pub fn filter_var_group<'a>(
    map: &EntityMap,
    statement: &'a Statement,
    current: &dyn LivenessPredicate,
    already: &dyn LivenessPredicate,
) -> Cow<'a, Statement> {
    let StatementKind::VarGroup(decls) = &statement.kind else {
        return Cow::Borrowed(statement);
    };

    let retained: Vec<VarDecl> = decls
        .iter()
        .filter(|decl| decl_is_live(map, decl, current) && !decl_is_live(map, decl, already))
        .cloned()
        .collect();

    if retained.len() == decls.len() {
        return Cow::Borrowed(statement);
    }
    let kind = if retained.is_empty() {
        StatementKind::Empty
    } else {
        StatementKind::VarGroup(retained)
    };
    Cow::Owned(Statement {
        id: statement.id,
        kind,
    })
}

/// Whether one declaration is needed under the given predicate: field
/// liveness when the name maps to a field, the miscellaneous flag otherwise.
fn decl_is_live(map: &EntityMap, decl: &VarDecl, predicate: &dyn LivenessPredicate) -> bool {
    match map.field_for_name(decl.name) {
        Some(field) => predicate.field_is_live(field),
        None => predicate.miscellaneous_live(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{StatementId, Stream};
    use crate::liveness::{AnalysisLiveness, AnalysisSnapshot, NothingLive};
    use crate::model::{FieldId, NameId, Program};

    struct Fixture {
        map: EntityMap,
        statement: Statement,
        f1: FieldId,
        f2: FieldId,
        v1: NameId,
        v3: NameId,
    }

    // var v1, v2, v3; — v1/v2 map to fields, v3 is miscellaneous.
    fn fixture() -> Fixture {
        let mut program = Program::new();
        let v1 = program.intern_name("v1");
        let v2 = program.intern_name("v2");
        let v3 = program.intern_name("v3");
        let f1 = program.add_field("f1", None, None);
        let f2 = program.add_field("f2", None, None);

        let mut map = EntityMap::new();
        map.bind_field(v1, f1);
        map.bind_field(v2, f2);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::VarGroup(vec![
            VarDecl {
                name: v1,
                init: None,
            },
            VarDecl {
                name: v2,
                init: None,
            },
            VarDecl {
                name: v3,
                init: None,
            },
        ]));
        let statement = stream.statement(id).unwrap().clone();
        Fixture {
            map,
            statement,
            f1,
            f2,
            v1,
            v3,
        }
    }

    fn live_fields(fields: &[FieldId]) -> AnalysisLiveness {
        let mut snapshot = AnalysisSnapshot::default();
        snapshot.live_fields.extend(fields.iter().copied());
        AnalysisLiveness::new(snapshot)
    }

    #[test]
    fn test_retains_newly_live_and_miscellaneous_in_order() {
        let f = fixture();
        let current = live_fields(&[f.f1]);

        let result = filter_var_group(&f.map, &f.statement, &current, &NothingLive);

        let StatementKind::VarGroup(decls) = &result.kind else {
            panic!("expected a var group");
        };
        let names: Vec<NameId> = decls.iter().map(|d| d.name).collect();
        assert_eq!(names, vec![f.v1, f.v3]);
    }

    #[test]
    fn test_unchanged_group_is_not_cloned() {
        let f = fixture();
        let current = live_fields(&[f.f1, f.f2]);

        let result = filter_var_group(&f.map, &f.statement, &current, &NothingLive);

        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(*result, f.statement);
    }

    #[test]
    fn test_fully_pruned_group_becomes_noop() {
        let f = fixture();
        let current = live_fields(&[f.f1, f.f2]);
        // Everything current knows was already shipped.
        let already = live_fields(&[f.f1, f.f2]);

        let result = filter_var_group(&f.map, &f.statement, &current, &already);

        assert_eq!(result.kind, StatementKind::Empty);
        assert_eq!(result.id, f.statement.id);
    }

    #[test]
    fn test_miscellaneous_decl_dropped_once_loaded() {
        let f = fixture();
        let current = live_fields(&[f.f1, f.f2]);
        // Already-loaded predicate with the miscellaneous flag set drops v3.
        let already = live_fields(&[]);

        let result = filter_var_group(&f.map, &f.statement, &current, &already);

        let StatementKind::VarGroup(decls) = &result.kind else {
            panic!("expected a var group");
        };
        assert!(decls.iter().all(|d| d.name != f.v3));
    }

    #[test]
    fn test_non_vargroup_passes_through() {
        let map = EntityMap::new();
        let statement = Statement {
            id: StatementId(0),
            kind: StatementKind::Empty,
        };
        let result = filter_var_group(&map, &statement, &NothingLive, &NothingLive);
        assert!(matches!(result, Cow::Borrowed(_)));
    }
}
