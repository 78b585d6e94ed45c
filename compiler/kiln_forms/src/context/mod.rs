//! Per-unit compilation state.
//!
//! One [`UnitContext`] exists per compilation unit. It owns everything a
//! form may read or mutate: the type registry, layout memo, scope chain,
//! unit namespace, diagnostic log, unique-name counter and the output
//! module (through its [`IrBuilder`]). Units never share a context.

use kiln_codegen::{BlockId, Constant, IrBuilder, Linkage, Module};
use kiln_diagnostic::{
    Checkpoint, Diagnostic, DiagnosticConfig, DiagnosticLog, ErrorCode, Renderer,
};
use kiln_ir::Span;
use kiln_types::{LayoutCache, LayoutError, TargetDescriptor, Type, TypeRegistry};
use rustc_hash::FxHashMap;

use crate::{FormError, FormErrorKind, FormTable, ScopeStack, Variable};

/// Settings for one compilation unit.
#[derive(Clone, Debug, Default)]
pub struct UnitConfig {
    pub name: String,
    pub target: TargetDescriptor,
    pub diagnostics: DiagnosticConfig,
}

impl UnitConfig {
    pub fn new(name: impl Into<String>) -> Self {
        UnitConfig {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: TargetDescriptor) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Create the unit's context.
    pub fn build(self) -> UnitContext {
        UnitContext::new(self)
    }
}

/// State shared by every form of one compilation unit.
pub struct UnitContext {
    pub(crate) types: TypeRegistry,
    pub(crate) target: TargetDescriptor,
    pub(crate) layout: LayoutCache,
    pub(crate) scopes: ScopeStack,
    /// Unit namespace: globals and materialized literals.
    pub(crate) namespace: FxHashMap<String, Variable>,
    pub(crate) diagnostics: DiagnosticLog,
    pub(crate) builder: IrBuilder,
    pub(crate) forms: FormTable,
    next_var: u32,
}

impl UnitContext {
    pub fn new(config: UnitConfig) -> Self {
        UnitContext {
            types: TypeRegistry::new(),
            target: config.target,
            layout: LayoutCache::new(),
            scopes: ScopeStack::new(),
            namespace: FxHashMap::default(),
            diagnostics: DiagnosticLog::with_config(config.diagnostics),
            builder: IrBuilder::new(config.name),
            forms: FormTable::core(),
            next_var: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    pub fn target(&self) -> &TargetDescriptor {
        &self.target
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    pub fn builder(&self) -> &IrBuilder {
        &self.builder
    }

    pub fn module(&self) -> &Module {
        self.builder.module()
    }

    pub fn forms_mut(&mut self) -> &mut FormTable {
        &mut self.forms
    }

    /// Tear the unit down, keeping its output and diagnostics.
    ///
    /// Instructions the builder could not place or type correctly are
    /// reported as one internal error.
    pub fn finish(mut self) -> (Module, DiagnosticLog) {
        let malformed = self.builder.codegen_error_count();
        if malformed > 0 {
            tracing::error!(malformed, "unit finished with malformed instructions");
            let diag = Diagnostic::error(ErrorCode::E9001).with_message(format!(
                "{malformed} instruction(s) could not be emitted correctly"
            ));
            self.diagnostics.emit_error(diag);
        }
        (self.builder.into_module(), self.diagnostics)
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Record `kind` at `span` and return the failure to propagate.
    pub fn fail(&mut self, kind: FormErrorKind, span: Span) -> FormError {
        let code = kind.code();
        tracing::debug!(%code, error = %kind, "form failed");
        let diag = Diagnostic::error(code)
            .with_message(kind.to_string())
            .at(span, code.title());
        let dropped = self.diagnostics.dropped_count();
        let guarantee = self.diagnostics.emit_error(diag);
        if self.diagnostics.dropped_count() > dropped {
            tracing::warn!(%code, "error limit reached, diagnostic dropped");
        }
        FormError {
            kind,
            span,
            guarantee,
        }
    }

    /// Human-readable report of the unit's diagnostics.
    ///
    /// With `source`, locations print as `line:column`.
    pub fn report(&self, source: Option<&str>, color: bool) -> String {
        let mut renderer = Renderer::new(color);
        if let Some(source) = source {
            renderer = renderer.with_source(source);
        }
        renderer.log(&self.diagnostics, &self.module().name)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.diagnostics.checkpoint()
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let discarded = self.diagnostics.len().saturating_sub(checkpoint.len());
        tracing::debug!(discarded, "diagnostics rolled back");
        self.diagnostics.rollback(checkpoint);
    }

    // -----------------------------------------------------------------------
    // Routines and scopes
    // -----------------------------------------------------------------------

    /// Start a routine; returns its entry block and opens its outermost scope.
    pub fn enter_function(&mut self, name: &str) -> BlockId {
        let function = self.builder.create_function(name);
        self.scopes.push();
        self.module().function(function).blocks[0]
    }

    pub fn push_scope(&mut self) {
        self.scopes.push();
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.pop().is_none() {
            tracing::warn!("pop_scope with no open scope");
        }
    }

    /// Resolve `name`: innermost scope first, then the unit namespace.
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.scopes
            .lookup(name)
            .or_else(|| self.namespace.get(name))
    }

    /// Declare a stack variable in the innermost scope at the current
    /// insertion point.
    pub fn declare_local(&mut self, name: &str, ty: Type) -> Result<Variable, FormError> {
        if !self.scopes.can_bind(name) {
            return Err(self.fail(FormErrorKind::Redefinition(name.to_owned()), Span::DUMMY));
        }
        let storage = self.builder.alloca(ty.clone(), name);
        let var = Variable {
            name: name.to_owned(),
            internal_name: name.to_owned(),
            ty,
            storage,
            linkage: None,
        };
        self.scopes.bind(var.clone());
        tracing::debug!(name, ty = %var.ty, "local declared");
        Ok(var)
    }

    /// Declare a module global in the unit namespace.
    pub fn declare_global(
        &mut self,
        name: &str,
        ty: Type,
        linkage: Linkage,
        init: Option<Constant>,
    ) -> Result<Variable, FormError> {
        self.register_global(name, ty, linkage, false, init, Span::DUMMY)
    }

    pub(crate) fn register_global(
        &mut self,
        name: &str,
        ty: Type,
        linkage: Linkage,
        constant: bool,
        init: Option<Constant>,
        span: Span,
    ) -> Result<Variable, FormError> {
        if self.namespace.contains_key(name) {
            return Err(self.fail(FormErrorKind::Redefinition(name.to_owned()), span));
        }
        let Some(global) = self
            .builder
            .add_global(name, ty.clone(), linkage, constant, init)
        else {
            return Err(self.fail(FormErrorKind::Redefinition(name.to_owned()), span));
        };
        let var = Variable {
            name: name.to_owned(),
            internal_name: name.to_owned(),
            ty,
            storage: self.builder.global_address(global),
            linkage: Some(linkage),
        };
        self.namespace.insert(name.to_owned(), var.clone());
        Ok(var)
    }

    /// A global name not yet used in this unit.
    pub(crate) fn unused_name(&mut self) -> String {
        loop {
            let name = format!("_kv{}", self.next_var);
            self.next_var += 1;
            if !self.namespace.contains_key(&name) && self.module().global_by_name(&name).is_none()
            {
                return name;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Alignment of `ty` in bytes.
    pub fn alignment_of(&mut self, ty: &Type) -> Result<u64, LayoutError> {
        self.layout.alignment_of(ty, &self.types, &self.target)
    }

    /// Size of `ty` in bytes, including trailing padding.
    pub fn size_of(&mut self, ty: &Type) -> Result<u64, LayoutError> {
        self.layout.size_of(ty, &self.types, &self.target)
    }

    /// Byte offset of field `index` of struct `ty`.
    pub fn field_offset(&mut self, ty: &Type, index: usize) -> Result<u64, LayoutError> {
        self.layout.field_offset(ty, index, &self.types, &self.target)
    }
}
