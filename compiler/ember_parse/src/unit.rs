//! Compilation unit: the symbol store for one source file.
//!
//! Every struct, global, function, parameter, scope and local variable is
//! owned by [`CompilationUnit`] and referred to by a small `Copy` handle.
//! Handles are dense indices assigned in insertion order, so growing a table
//! never invalidates one that was already handed out.
//!
//! The unit is generic over the backend's handle types: a variable's storage,
//! a function's prototype and its entry block are backend handles held here
//! but never inspected.
//!
//! Lookup follows lexical scoping: a scope's own locals first, then each
//! enclosing scope out to the function's root, then the function's
//! parameters, then globals. The first match wins, so inner declarations
//! shadow outer ones.

use ember_ir::{IdentifierTable, Name, Span};

use crate::backend::BackendTypes;
use crate::types::VariableType;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            fn from_index(index: usize) -> Self {
                $name(u32::try_from(index).unwrap_or(u32::MAX))
            }
        }
    };
}

define_handle!(
    /// Index of a struct type in the unit.
    StructId
);
define_handle!(
    /// Index of a global variable in the unit.
    GlobalId
);
define_handle!(
    /// Index of a function in the unit.
    FunctionId
);
define_handle!(
    /// Index of a scope within its function. Scope 0 is the body's root.
    ScopeId
);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);
}

/// Where a variable lives in the unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VariableRef {
    Global(GlobalId),
    Parameter {
        function: FunctionId,
        index: u32,
    },
    Local {
        function: FunctionId,
        scope: ScopeId,
        index: u32,
    },
}

/// A named storage cell: global, parameter or local.
#[derive(Debug)]
pub struct Variable<B: BackendTypes> {
    pub name: Name,
    pub ty: VariableType,
    /// Address of the backing storage; set once, before the first use.
    pub storage: Option<B::Value>,
    pub span: Span,
}

impl<B: BackendTypes> Variable<B> {
    pub fn new(name: Name, ty: VariableType, span: Span) -> Self {
        Variable {
            name,
            ty,
            storage: None,
            span,
        }
    }
}

#[derive(Debug)]
pub struct Scope<B: BackendTypes> {
    pub parent: Option<ScopeId>,
    pub variables: Vec<Variable<B>>,
}

#[derive(Debug)]
pub struct Function<B: BackendTypes> {
    pub name: Name,
    pub parameters: Vec<Variable<B>>,
    pub return_type: VariableType,
    pub scopes: Vec<Scope<B>>,
    /// Prototype in the backend module.
    pub backend: B::Function,
    /// Entry block, once the body has been emitted.
    pub entry: Option<B::Block>,
    pub span: Span,
}

impl<B: BackendTypes> Function<B> {
    pub fn new(name: Name, return_type: VariableType, backend: B::Function, span: Span) -> Self {
        Function {
            name,
            parameters: Vec::new(),
            return_type,
            scopes: Vec::new(),
            backend,
            entry: None,
            span,
        }
    }
}

/// A struct type. Only its name is recorded; members are skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructType {
    pub name: Name,
    pub span: Span,
}

/// Owner of every entity declared in one source file.
#[derive(Debug)]
pub struct CompilationUnit<B: BackendTypes> {
    pub identifiers: IdentifierTable,
    structs: Vec<StructType>,
    globals: Vec<Variable<B>>,
    functions: Vec<Function<B>>,
}

impl<B: BackendTypes> Default for CompilationUnit<B> {
    fn default() -> Self {
        CompilationUnit {
            identifiers: IdentifierTable::new(),
            structs: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
        }
    }
}

impl<B: BackendTypes> CompilationUnit<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_struct(&mut self, ty: StructType) -> StructId {
        let id = StructId::from_index(self.structs.len());
        self.structs.push(ty);
        id
    }

    pub fn add_global(&mut self, variable: Variable<B>) -> GlobalId {
        let id = GlobalId::from_index(self.globals.len());
        self.globals.push(variable);
        id
    }

    pub fn add_function(&mut self, function: Function<B>) -> FunctionId {
        let id = FunctionId::from_index(self.functions.len());
        self.functions.push(function);
        id
    }

    pub fn add_parameter(&mut self, function: FunctionId, variable: Variable<B>) -> VariableRef {
        let params = &mut self.functions[function.index()].parameters;
        let index = u32::try_from(params.len()).unwrap_or(u32::MAX);
        params.push(variable);
        VariableRef::Parameter { function, index }
    }

    /// Open a scope in `function`; `None` creates the root.
    pub fn add_scope(&mut self, function: FunctionId, parent: Option<ScopeId>) -> ScopeId {
        let scopes = &mut self.functions[function.index()].scopes;
        let id = ScopeId::from_index(scopes.len());
        scopes.push(Scope {
            parent,
            variables: Vec::new(),
        });
        tracing::trace!(scope = id.index(), parent = ?parent.map(ScopeId::index), "scope opened");
        id
    }

    pub fn add_scope_variable(
        &mut self,
        function: FunctionId,
        scope: ScopeId,
        variable: Variable<B>,
    ) -> VariableRef {
        let variables = &mut self.functions[function.index()].scopes[scope.index()].variables;
        let index = u32::try_from(variables.len()).unwrap_or(u32::MAX);
        variables.push(variable);
        VariableRef::Local {
            function,
            scope,
            index,
        }
    }

    pub fn struct_type(&self, id: StructId) -> &StructType {
        &self.structs[id.index()]
    }

    pub fn global(&self, id: GlobalId) -> &Variable<B> {
        &self.globals[id.index()]
    }

    pub fn function(&self, id: FunctionId) -> &Function<B> {
        &self.functions[id.index()]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function<B> {
        &mut self.functions[id.index()]
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function<B>)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FunctionId::from_index(i), f))
    }

    pub fn scope(&self, function: FunctionId, scope: ScopeId) -> &Scope<B> {
        &self.functions[function.index()].scopes[scope.index()]
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn variable(&self, var: VariableRef) -> &Variable<B> {
        match var {
            VariableRef::Global(id) => &self.globals[id.index()],
            VariableRef::Parameter { function, index } => {
                &self.functions[function.index()].parameters[index as usize]
            }
            VariableRef::Local {
                function,
                scope,
                index,
            } => &self.functions[function.index()].scopes[scope.index()].variables[index as usize],
        }
    }

    pub fn variable_mut(&mut self, var: VariableRef) -> &mut Variable<B> {
        match var {
            VariableRef::Global(id) => &mut self.globals[id.index()],
            VariableRef::Parameter { function, index } => {
                &mut self.functions[function.index()].parameters[index as usize]
            }
            VariableRef::Local {
                function,
                scope,
                index,
            } => {
                &mut self.functions[function.index()].scopes[scope.index()].variables
                    [index as usize]
            }
        }
    }

    pub fn find_struct(&self, name: Name) -> Option<StructId> {
        self.structs
            .iter()
            .position(|s| s.name == name)
            .map(StructId::from_index)
    }

    pub fn find_global(&self, name: Name) -> Option<GlobalId> {
        self.globals
            .iter()
            .position(|g| g.name == name)
            .map(GlobalId::from_index)
    }

    pub fn find_function(&self, name: Name) -> Option<FunctionId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(FunctionId::from_index)
    }

    /// Span of an existing top-level item called `name`, if any.
    pub fn find_top_level(&self, name: Name) -> Option<Span> {
        if let Some(id) = self.find_struct(name) {
            return Some(self.struct_type(id).span);
        }
        if let Some(id) = self.find_global(name) {
            return Some(self.global(id).span);
        }
        self.find_function(name).map(|id| self.function(id).span)
    }

    /// Look `name` up in `scope` only.
    pub fn find_in_scope(
        &self,
        function: FunctionId,
        scope: ScopeId,
        name: Name,
    ) -> Option<VariableRef> {
        self.scope(function, scope)
            .variables
            .iter()
            .position(|v| v.name == name)
            .map(|index| VariableRef::Local {
                function,
                scope,
                index: u32::try_from(index).unwrap_or(u32::MAX),
            })
    }

    /// Resolve `name` as seen from `scope`: enclosing scopes innermost first,
    /// then parameters, then globals.
    pub fn find_variable(
        &self,
        function: FunctionId,
        scope: ScopeId,
        name: Name,
    ) -> Option<VariableRef> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.find_in_scope(function, id, name) {
                return Some(found);
            }
            current = self.scope(function, id).parent;
        }
        if let Some(index) = self.functions[function.index()]
            .parameters
            .iter()
            .position(|p| p.name == name)
        {
            return Some(VariableRef::Parameter {
                function,
                index: u32::try_from(index).unwrap_or(u32::MAX),
            });
        }
        self.find_global(name).map(VariableRef::Global)
    }
}
