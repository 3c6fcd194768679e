//! Rendering of extracted statements back to compact source text.
//!
//! The downstream generator owns real pretty-printing; this renderer
//! exists so fragments can be inspected, written to disk by the CLI, and
//! digested for content-derived fragment names. Output is deterministic:
//! identical statements render to identical text.

use crate::ir::{Expr, Statement, StatementKind};
use crate::model::Program;
use std::fmt::Write;

/// Render one statement as a single line of source text.
pub fn render_statement(program: &Program, statement: &Statement) -> String {
    let mut out = String::new();
    match &statement.kind {
        StatementKind::Expr(expr) => {
            write_expr(&mut out, program, expr);
            out.push(';');
        }
        StatementKind::VarGroup(decls) => {
            out.push_str("var ");
            for (index, decl) in decls.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                out.push_str(program.name(decl.name));
                if let Some(init) = &decl.init {
                    out.push_str(" = ");
                    write_expr(&mut out, program, init);
                }
            }
            out.push(';');
        }
        StatementKind::Empty => out.push(';'),
    }
    out
}

/// Render a whole fragment, one statement per line.
pub fn render_fragment(program: &Program, statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&render_statement(program, statement));
        out.push('\n');
    }
    out
}

fn write_expr(out: &mut String, program: &Program, expr: &Expr) {
    match expr {
        Expr::Call { callee, args } => {
            write_expr(out, program, callee);
            out.push('(');
            for (index, arg) in args.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_expr(out, program, arg);
            }
            out.push(')');
        }
        Expr::Name(name) => out.push_str(program.name(*name)),
        Expr::Member { base, member } => {
            write_expr(out, program, base);
            out.push('.');
            out.push_str(program.name(*member));
        }
        Expr::Assign { target, value } => {
            write_expr(out, program, target);
            out.push_str(" = ");
            write_expr(out, program, value);
        }
        Expr::Number(value) => {
            let _ = write!(out, "{}", value);
        }
        Expr::Str(id) => {
            out.push('"');
            for ch in program.string_literal(*id).chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    other => out.push(other),
                }
            }
            out.push('"');
        }
        Expr::Function { name } => {
            out.push_str("function");
            if let Some(name) = name {
                out.push(' ');
                out.push_str(program.name(*name));
            }
            out.push_str("() { }");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{StatementId, VarDecl};

    #[test]
    fn test_render_call_statement() {
        let mut program = Program::new();
        let register = program.intern_name("register");
        let ctor = program.intern_name("Widget_0");

        let statement = Statement {
            id: StatementId(0),
            kind: StatementKind::Expr(Expr::Call {
                callee: Box::new(Expr::Name(register)),
                args: vec![Expr::Number(7.0), Expr::Name(ctor)],
            }),
        };

        assert_eq!(
            render_statement(&program, &statement),
            "register(7, Widget_0);"
        );
    }

    #[test]
    fn test_render_var_group_with_string_init() {
        let mut program = Program::new();
        let v = program.intern_name("greeting");
        let w = program.intern_name("count");
        let s = program.intern_string("he said \"hi\"");

        let statement = Statement {
            id: StatementId(1),
            kind: StatementKind::VarGroup(vec![
                VarDecl {
                    name: v,
                    init: Some(Expr::Str(s)),
                },
                VarDecl {
                    name: w,
                    init: None,
                },
            ]),
        };

        assert_eq!(
            render_statement(&program, &statement),
            "var greeting = \"he said \\\"hi\\\"\", count;"
        );
    }

    #[test]
    fn test_render_fragment_is_deterministic() {
        let mut program = Program::new();
        let alias = program.intern_name("_");
        let string_ctor = program.intern_name("String");
        let prototype = program.intern_name("prototype");

        let statements = vec![
            Statement {
                id: StatementId(0),
                kind: StatementKind::Expr(Expr::Assign {
                    target: Box::new(Expr::Name(alias)),
                    value: Box::new(Expr::Member {
                        base: Box::new(Expr::Name(string_ctor)),
                        member: prototype,
                    }),
                }),
            },
            Statement {
                id: StatementId(1),
                kind: StatementKind::Empty,
            },
        ];

        let first = render_fragment(&program, &statements);
        assert_eq!(first, "_ = String.prototype;\n;\n");
        assert_eq!(first, render_fragment(&program, &statements));
    }
}
