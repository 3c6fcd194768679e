//! Recognition of the statement shapes the extraction pass treats specially.
//!
//! Everything here is a pure function of the statement and the read-only
//! collaborators. A statement that fails recognition is never an error; it
//! falls through to the generic (miscellaneous) handling, which keeps the
//! pass conservative in the face of shapes it has never seen.

use crate::ir::{Expr, Statement, StatementKind};
use crate::model::{MethodId, Program, TypeId, WellKnownNames};
use crate::resolve::EntityMap;

/// Number of fixed leading arguments in a registration call: the type id,
/// the supertype id, and the cast map. Everything after them is the
/// variable-length constructor-reference tail.
pub const REGISTRATION_PREFIX: usize = 3;

/// If the statement registers a declared type, return that type.
///
/// Two shapes qualify: a call to the injected registration helper with the
/// fixed prefix in place, and the special-cased assignment that installs
/// the built-in string type's dispatch table. A registration call with a
/// malformed argument list is simply not recognized.
pub fn registration_target(
    names: &WellKnownNames,
    map: &EntityMap,
    statement: &Statement,
) -> Option<TypeId> {
    match &statement.kind {
        StatementKind::Expr(Expr::Call { callee, args }) => {
            let Expr::Name(callee_name) = callee.as_ref() else {
                return None;
            };
            if *callee_name != names.register_helper || args.len() < REGISTRATION_PREFIX {
                return None;
            }
            map.type_for_statement(statement.id)
        }
        StatementKind::Expr(Expr::Assign { target, value }) => {
            // The string dispatch table is installed by aliasing the
            // built-in constructor's prototype rather than by a helper call.
            let Expr::Name(alias) = target.as_ref() else {
                return None;
            };
            if *alias != names.proto_alias {
                return None;
            }
            let Expr::Member { base, member } = value.as_ref() else {
                return None;
            };
            if *member != names.prototype_member {
                return None;
            }
            let Expr::Name(base_name) = base.as_ref() else {
                return None;
            };
            if *base_name != names.string_ctor {
                return None;
            }
            map.type_for_statement(statement.id)
        }
        _ => None,
    }
}

/// The method this statement defines or installs, if any.
///
/// Recognizes a named function value whose name resolves to a method, and
/// otherwise falls back to the statement's vtable-install mapping.
pub fn method_for(map: &EntityMap, statement: &Statement) -> Option<MethodId> {
    if let StatementKind::Expr(Expr::Function { name: Some(name) }) = &statement.kind {
        if let Some(method) = map.method_for_name(*name) {
            return Some(method);
        }
    }
    map.vtable_install_method(statement.id)
}

/// If the statement installs a method that is dispatched through a vtable,
/// return the type whose registration must already be in place.
pub fn vtable_type_needed(
    program: &Program,
    map: &EntityMap,
    statement: &Statement,
) -> Option<TypeId> {
    let method = map.vtable_install_method(statement.id)?;
    let data = program.method(method);
    if data.needs_vtable {
        data.enclosing
    } else {
        None
    }
}

/// Whether the statement is a var-group with at least one declaration that
/// maps to a field, i.e. one the var-group filter could prune.
pub fn has_removable_decls(map: &EntityMap, statement: &Statement) -> bool {
    match &statement.kind {
        StatementKind::VarGroup(decls) => decls
            .iter()
            .any(|decl| map.field_for_name(decl.name).is_some()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Stream, VarDecl};
    use crate::model::MethodKind;

    fn well_known(program: &mut Program) -> WellKnownNames {
        WellKnownNames {
            register_helper: program.intern_name("register"),
            entry_wrapper: program.intern_name("entry"),
            on_fragment_loaded: program.intern_name("onFragmentLoaded"),
            proto_alias: program.intern_name("_"),
            string_ctor: program.intern_name("String"),
            prototype_member: program.intern_name("prototype"),
        }
    }

    fn registration_kind(names: &WellKnownNames, tail: Vec<Expr>) -> StatementKind {
        let mut args = vec![Expr::Number(1.0), Expr::Number(0.0), Expr::Number(9.0)];
        args.extend(tail);
        StatementKind::Expr(Expr::Call {
            callee: Box::new(Expr::Name(names.register_helper)),
            args,
        })
    }

    #[test]
    fn test_registration_call_recognized() {
        let mut program = Program::new();
        let names = well_known(&mut program);
        let ty = program.add_type("Widget", None, true);

        let mut stream = Stream::new();
        let id = stream.push(registration_kind(&names, vec![]));
        let mut map = EntityMap::new();
        map.bind_statement_type(id, ty);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(registration_target(&names, &map, stmt), Some(ty));
    }

    #[test]
    fn test_short_argument_list_not_recognized() {
        let mut program = Program::new();
        let names = well_known(&mut program);
        let ty = program.add_type("Widget", None, true);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Expr(Expr::Call {
            callee: Box::new(Expr::Name(names.register_helper)),
            args: vec![Expr::Number(1.0)],
        }));
        let mut map = EntityMap::new();
        map.bind_statement_type(id, ty);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(registration_target(&names, &map, stmt), None);
    }

    #[test]
    fn test_other_callee_not_recognized() {
        let mut program = Program::new();
        let names = well_known(&mut program);
        let other = program.intern_name("somethingElse");

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Expr(Expr::Call {
            callee: Box::new(Expr::Name(other)),
            args: vec![Expr::Number(1.0), Expr::Number(0.0), Expr::Number(9.0)],
        }));
        let map = EntityMap::new();

        let stmt = stream.statement(id).unwrap();
        assert_eq!(registration_target(&names, &map, stmt), None);
    }

    #[test]
    fn test_string_prototype_assignment_recognized() {
        let mut program = Program::new();
        let names = well_known(&mut program);
        let string_ty = program.add_type("String", None, true);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Expr(Expr::Assign {
            target: Box::new(Expr::Name(names.proto_alias)),
            value: Box::new(Expr::Member {
                base: Box::new(Expr::Name(names.string_ctor)),
                member: names.prototype_member,
            }),
        }));
        let mut map = EntityMap::new();
        map.bind_statement_type(id, string_ty);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(registration_target(&names, &map, stmt), Some(string_ty));
    }

    #[test]
    fn test_unrelated_assignment_not_recognized() {
        let mut program = Program::new();
        let names = well_known(&mut program);
        let lhs = program.intern_name("x");

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Expr(Expr::Assign {
            target: Box::new(Expr::Name(lhs)),
            value: Box::new(Expr::Number(3.0)),
        }));
        let map = EntityMap::new();

        let stmt = stream.statement(id).unwrap();
        assert_eq!(registration_target(&names, &map, stmt), None);
    }

    #[test]
    fn test_method_for_named_function() {
        let mut program = Program::new();
        let fn_name = program.intern_name("Widget_render");
        let ty = program.add_type("Widget", None, true);
        let method = program.add_method("render", Some(ty), MethodKind::Regular, true);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Expr(Expr::Function {
            name: Some(fn_name),
        }));
        let mut map = EntityMap::new();
        map.bind_method(fn_name, method);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(method_for(&map, stmt), Some(method));
    }

    #[test]
    fn test_method_for_falls_back_to_vtable_install() {
        let mut program = Program::new();
        let ty = program.add_type("Widget", None, true);
        let method = program.add_method("render", Some(ty), MethodKind::Regular, true);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Empty);
        let mut map = EntityMap::new();
        map.bind_vtable_install(id, method);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(method_for(&map, stmt), Some(method));
        assert_eq!(vtable_type_needed(&program, &map, stmt), Some(ty));
    }

    #[test]
    fn test_vtable_not_needed_for_static_method() {
        let mut program = Program::new();
        let ty = program.add_type("Widget", None, true);
        let method = program.add_method("helper", Some(ty), MethodKind::Regular, false);

        let mut stream = Stream::new();
        let id = stream.push(StatementKind::Empty);
        let mut map = EntityMap::new();
        map.bind_vtable_install(id, method);

        let stmt = stream.statement(id).unwrap();
        assert_eq!(vtable_type_needed(&program, &map, stmt), None);
    }

    #[test]
    fn test_has_removable_decls() {
        let mut program = Program::new();
        let mapped = program.intern_name("q");
        let unmapped = program.intern_name("tmp");
        let field = program.add_field("q", None, None);

        let mut map = EntityMap::new();
        map.bind_field(mapped, field);

        let mut stream = Stream::new();
        let with_field = stream.push(StatementKind::VarGroup(vec![
            VarDecl {
                name: unmapped,
                init: None,
            },
            VarDecl {
                name: mapped,
                init: None,
            },
        ]));
        let without_field = stream.push(StatementKind::VarGroup(vec![VarDecl {
            name: unmapped,
            init: None,
        }]));

        assert!(has_removable_decls(&map, stream.statement(with_field).unwrap()));
        assert!(!has_removable_decls(&map, stream.statement(without_field).unwrap()));
    }
}
