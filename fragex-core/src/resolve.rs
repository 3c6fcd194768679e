//! Resolution from emitted names and statements back to model entities.
//!
//! The map is produced by the code generator alongside the stream and is
//! consumed read-only here: which emitted name is a method or a field,
//! which statement introduces a declared type, and which statement installs
//! a method into a vtable.

use crate::ir::StatementId;
use crate::model::{FieldId, MethodId, NameId, TypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name/statement resolution tables for one compiled program.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EntityMap {
    name_to_method: HashMap<NameId, MethodId>,
    name_to_field: HashMap<NameId, FieldId>,
    statement_types: HashMap<StatementId, TypeId>,
    vtable_installs: HashMap<StatementId, MethodId>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_method(&mut self, name: NameId, method: MethodId) {
        self.name_to_method.insert(name, method);
    }

    pub fn bind_field(&mut self, name: NameId, field: FieldId) {
        self.name_to_field.insert(name, field);
    }

    /// Record that a statement introduces (registers) a declared type.
    pub fn bind_statement_type(&mut self, statement: StatementId, ty: TypeId) {
        self.statement_types.insert(statement, ty);
    }

    /// Record that a statement installs a method into its type's vtable.
    pub fn bind_vtable_install(&mut self, statement: StatementId, method: MethodId) {
        self.vtable_installs.insert(statement, method);
    }

    pub fn method_for_name(&self, name: NameId) -> Option<MethodId> {
        self.name_to_method.get(&name).copied()
    }

    pub fn field_for_name(&self, name: NameId) -> Option<FieldId> {
        self.name_to_field.get(&name).copied()
    }

    pub fn type_for_statement(&self, statement: StatementId) -> Option<TypeId> {
        self.statement_types.get(&statement).copied()
    }

    pub fn vtable_install_method(&self, statement: StatementId) -> Option<MethodId> {
        self.vtable_installs.get(&statement).copied()
    }
}
