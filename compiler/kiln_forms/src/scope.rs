//! Lexical scopes and the variables they own.

use kiln_codegen::{Linkage, ValueId};
use kiln_types::Type;
use rustc_hash::FxHashMap;

/// A named storage location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    /// Name of the storage in the module (globals) or the stack slot label.
    pub internal_name: String,
    /// Declared type of the stored object.
    pub ty: Type,
    /// Pointer to the storage; typed `(p ty)`.
    pub storage: ValueId,
    /// `None` for stack slots.
    pub linkage: Option<Linkage>,
}

/// Chain of lexical scopes inside a routine, innermost last.
#[derive(Clone, Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<FxHashMap<String, Variable>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    /// Drop the innermost scope and everything it declared.
    pub fn pop(&mut self) -> Option<FxHashMap<String, Variable>> {
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Bind `var` in the innermost scope.
    ///
    /// Returns `false` if there is no open scope or the innermost scope
    /// already has the name.
    pub fn bind(&mut self, var: Variable) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.contains_key(&var.name) {
            return false;
        }
        scope.insert(var.name.clone(), var);
        true
    }

    /// True if the innermost scope can take a binding for `name`.
    pub fn can_bind(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| !scope.contains_key(name))
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}
