//! Minimization of registration statements.
//!
//! A registration call carries every constructor of its type in the
//! variable-length tail, but only the constructors this fragment makes
//! newly live belong in this fragment's copy. The master statement is
//! cloned and the tail rebuilt into a fresh argument list, so later
//! fragments can minimize the same registration independently; thanks to
//! monotonic loading each constructor reference materializes in exactly one
//! fragment's output.

use crate::classify::REGISTRATION_PREFIX;
use crate::ir::{Expr, Statement, StatementKind};
use crate::liveness::LivenessPredicate;
use crate::model::{MethodId, Program};
use crate::resolve::EntityMap;

/// A pruned copy of a registration statement plus the number of
/// constructor references that survived.
#[derive(Debug, Clone)]
pub struct MinimizedRegistration {
    pub statement: Statement,
    pub retained_constructors: usize,
}

/// Clone the registration statement, keeping only constructor references
/// that are live under `current` and not under `already`.
///
/// The fixed argument prefix is always kept, as are tail arguments that do
/// not resolve to constructors. The string-dispatch assignment form carries
/// no constructor references and comes back as an unchanged clone.
pub fn minimize_registration(
    program: &Program,
    map: &EntityMap,
    statement: &Statement,
    current: &dyn LivenessPredicate,
    already: &dyn LivenessPredicate,
) -> MinimizedRegistration {
    let StatementKind::Expr(Expr::Call { callee, args }) = &statement.kind else {
        return MinimizedRegistration {
            statement: statement.clone(),
            retained_constructors: 0,
        };
    };

    let mut kept = Vec::with_capacity(args.len());
    let mut retained = 0;
    for (index, arg) in args.iter().enumerate() {
        if index < REGISTRATION_PREFIX {
            kept.push(arg.clone());
            continue;
        }
        match constructor_for_arg(program, map, arg) {
            Some(ctor) => {
                let newly_live = current.method_is_live(ctor) && !already.method_is_live(ctor);
                if newly_live {
                    retained += 1;
                    kept.push(arg.clone());
                }
            }
            None => kept.push(arg.clone()),
        }
    }

    MinimizedRegistration {
        statement: Statement {
            id: statement.id,
            kind: StatementKind::Expr(Expr::Call {
                callee: callee.clone(),
                args: kept,
            }),
        },
        retained_constructors: retained,
    }
}

fn constructor_for_arg(program: &Program, map: &EntityMap, arg: &Expr) -> Option<MethodId> {
    let Expr::Name(name) = arg else {
        return None;
    };
    let method = map.method_for_name(*name)?;
    program.is_constructor(method).then_some(method)
}
