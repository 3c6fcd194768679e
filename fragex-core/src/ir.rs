//! The emitted instruction stream: an ordered list of statements over a
//! minimal expression language.
//!
//! Only the shapes the extraction pass must see through are modeled —
//! calls, name references, member access, assignment, literals, and opaque
//! function values. Function bodies are atomic at this level: the pass
//! keeps or drops a definition whole, never rewrites inside one.
//!
//! `StatementId`s are assigned sequentially by [`Stream::push`] and survive
//! cloning and pruning, so entity-map entries keyed by them stay valid for
//! minimized copies of a statement.

use crate::model::{NameId, StringId};
use serde::{Deserialize, Serialize};

/// Identity of a statement in the master stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementId(pub u32);

impl StatementId {
    /// Reserved id for statements synthesized by the pass itself (e.g. the
    /// fragment-loaded notification call). No entity-map entry refers to it.
    pub const SYNTHETIC: StatementId = StatementId(u32::MAX);
}

/// An expression in the emitted output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `callee(arg, ...)` — the callee may itself be a call.
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// A bare reference to an emitted name.
    Name(NameId),
    /// `base.member`
    Member { base: Box<Expr>, member: NameId },
    /// `target = value`
    Assign { target: Box<Expr>, value: Box<Expr> },
    /// A numeric literal.
    Number(f64),
    /// An interned string literal.
    Str(StringId),
    /// A function value; the body is opaque to the extraction pass.
    Function { name: Option<NameId> },
}

/// One declaration inside a var-group statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: NameId,
    pub init: Option<Expr>,
}

/// The statement shapes the pass distinguishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// An expression statement.
    Expr(Expr),
    /// `var a = ..., b, c = ...;` — declarations prune individually.
    VarGroup(Vec<VarDecl>),
    /// The explicit no-op a fully pruned var-group collapses to.
    Empty,
}

/// A statement plus its stream identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub kind: StatementKind,
}

impl Statement {
    /// A statement synthesized by the pass, outside the master stream.
    pub fn synthetic(kind: StatementKind) -> Self {
        Self {
            id: StatementId::SYNTHETIC,
            kind,
        }
    }
}

/// The master instruction stream plus any already-finalized fragment blocks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Stream {
    master: Vec<Statement>,
    fragments: Vec<Vec<Statement>>,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement to the master stream, assigning its id.
    pub fn push(&mut self, kind: StatementKind) -> StatementId {
        let id = StatementId(self.master.len() as u32);
        self.master.push(Statement { id, kind });
        id
    }

    pub fn master(&self) -> &[Statement] {
        &self.master
    }

    pub fn statement(&self, id: StatementId) -> Option<&Statement> {
        self.master.get(id.0 as usize)
    }

    /// Record a finalized fragment block for later scanning.
    pub fn add_fragment(&mut self, statements: Vec<Statement>) {
        self.fragments.push(statements);
    }

    pub fn fragments(&self) -> &[Vec<Statement>] {
        &self.fragments
    }
}
