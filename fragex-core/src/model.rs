//! The program model: declared types, methods, fields and interned names.
//!
//! Entities live in arena-style tables indexed by `u32` newtypes, the
//! cheap-to-copy handles the rest of the crate passes around. The model is
//! built (or deserialized) once per compile and is strictly read-only for
//! the extraction pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Handle to a [`TypeData`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Handle to a [`MethodData`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodId(pub u32);

/// Handle to a [`FieldData`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldId(pub u32);

/// Handle to an interned identifier in the emitted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameId(pub u32);

/// Handle to an interned string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StringId(pub u32);

/// A declared type in the compiled program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeData {
    pub name: String,
    /// Supertype link. Load-order invariant: a live type implies its live
    /// supertype; the analysis collaborator guarantees this.
    pub supertype: Option<TypeId>,
    /// Whether instances of this type require virtual-dispatch installation.
    pub needs_dispatch: bool,
}

/// Whether a method is an ordinary method or a constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Regular,
    Constructor,
}

/// A method (or constructor) belonging to a declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodData {
    pub name: String,
    /// The enclosing declared type, when there is one.
    pub enclosing: Option<TypeId>,
    pub kind: MethodKind,
    /// Whether the method is dispatched through its type's vtable.
    pub needs_vtable: bool,
}

/// A field belonging to a declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldData {
    pub name: String,
    pub owner: Option<TypeId>,
    /// The string literal this field is statically initialized from, if
    /// any. Load-order invariant: a live such field implies a live string.
    /// Carried for the analysis collaborator; the extractor itself relies
    /// on the invariant rather than re-deriving it.
    pub string_init: Option<StringId>,
}

/// Explicit handles to the well-known runtime names the extraction pass
/// must recognize. Resolved once when the program is built and injected at
/// engine construction, never looked up by spelling at call time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WellKnownNames {
    /// The runtime helper that registers a type and its dispatch metadata.
    pub register_helper: NameId,
    /// The execution-entry guard external entry calls are wrapped in.
    pub entry_wrapper: NameId,
    /// The fragment-loaded notification entry point.
    pub on_fragment_loaded: NameId,
    /// The prototype-cursor alias assigned during dispatch-table setup.
    pub proto_alias: NameId,
    /// The built-in string constructor.
    pub string_ctor: NameId,
    /// The `prototype` member name.
    pub prototype_member: NameId,
}

/// The read-only entity model for one whole-program compile.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Program {
    types: Vec<TypeData>,
    methods: Vec<MethodData>,
    fields: Vec<FieldData>,
    names: Vec<String>,
    strings: Vec<String>,
    #[serde(skip)]
    name_index: HashMap<String, NameId>,
    #[serde(skip)]
    string_index: HashMap<String, StringId>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an emitted identifier, returning its stable handle.
    pub fn intern_name(&mut self, name: &str) -> NameId {
        if let Some(&id) = self.name_index.get(name) {
            return id;
        }
        let id = NameId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), id);
        id
    }

    /// Intern a string literal, returning its stable handle.
    pub fn intern_string(&mut self, literal: &str) -> StringId {
        if let Some(&id) = self.string_index.get(literal) {
            return id;
        }
        let id = StringId(self.strings.len() as u32);
        self.strings.push(literal.to_string());
        self.string_index.insert(literal.to_string(), id);
        id
    }

    pub fn add_type(
        &mut self,
        name: impl Into<String>,
        supertype: Option<TypeId>,
        needs_dispatch: bool,
    ) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeData {
            name: name.into(),
            supertype,
            needs_dispatch,
        });
        id
    }

    pub fn add_method(
        &mut self,
        name: impl Into<String>,
        enclosing: Option<TypeId>,
        kind: MethodKind,
        needs_vtable: bool,
    ) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(MethodData {
            name: name.into(),
            enclosing,
            kind,
            needs_vtable,
        });
        id
    }

    pub fn add_field(
        &mut self,
        name: impl Into<String>,
        owner: Option<TypeId>,
        string_init: Option<StringId>,
    ) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(FieldData {
            name: name.into(),
            owner,
            string_init,
        });
        id
    }

    pub fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &MethodData {
        &self.methods[id.0 as usize]
    }

    pub fn field(&self, id: FieldId) -> &FieldData {
        &self.fields[id.0 as usize]
    }

    pub fn name(&self, id: NameId) -> &str {
        &self.names[id.0 as usize]
    }

    pub fn string_literal(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }

    pub fn is_constructor(&self, id: MethodId) -> bool {
        self.method(id).kind == MethodKind::Constructor
    }

    /// Rebuild the interning indexes after deserialization.
    ///
    /// The indexes are not serialized; a freshly loaded program must call
    /// this before any further interning.
    pub fn rebuild_indexes(&mut self) {
        self.name_index = self
            .names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), NameId(i as u32)))
            .collect();
        self.string_index = self
            .strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), StringId(i as u32)))
            .collect();
    }
}
