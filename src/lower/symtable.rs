//! Scoped name resolution for lowering
//!
//! Three independent namespaces map source names to IR declarations:
//! scalar variables, arrays (which also carry the index offset that turns a
//! source index into a zero-based one) and functions. A fourth slot holds the
//! result declaration of the function currently being lowered.

use super::errors::LowerError;
use crate::ir::IrHandle;
use rustc_hash::FxHashMap;
use tracing::debug;

/// An array declaration together with its index offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArraySymbol {
    /// Added to a source index to get the zero-based index (`-begin`)
    pub offset: i32,
    pub decl: IrHandle,
}

#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    vars: FxHashMap<String, IrHandle>,
    arrays: FxHashMap<String, ArraySymbol>,
    funs: FxHashMap<String, IrHandle>,
    result: Option<IrHandle>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for lowering a function body: the functions declared so far are
    /// visible, nothing else is.
    pub fn function_scope(&self) -> Self {
        Self {
            funs: self.funs.clone(),
            ..Self::default()
        }
    }

    pub fn lookup_var(&self, name: &str) -> Option<IrHandle> {
        let found = self.vars.get(name).copied();
        if found.is_none() {
            debug!(name, "variable lookup missed");
        }
        found
    }

    pub fn register_var(&mut self, name: &str, decl: IrHandle) -> Result<(), LowerError> {
        if self.vars.contains_key(name) {
            return Err(LowerError::DuplicateVariable {
                name: name.to_string(),
            });
        }
        debug!(name, %decl, "registered variable");
        self.vars.insert(name.to_string(), decl);
        Ok(())
    }

    pub fn unregister_var(&mut self, name: &str) -> Result<(), LowerError> {
        match self.vars.remove(name) {
            Some(_) => {
                debug!(name, "unregistered variable");
                Ok(())
            }
            None => Err(LowerError::MissingVariable {
                name: name.to_string(),
            }),
        }
    }

    pub fn lookup_array(&self, name: &str) -> Option<ArraySymbol> {
        let found = self.arrays.get(name).copied();
        if found.is_none() {
            debug!(name, "array lookup missed");
        }
        found
    }

    pub fn register_array(
        &mut self,
        name: &str,
        offset: i32,
        decl: IrHandle,
    ) -> Result<(), LowerError> {
        if self.arrays.contains_key(name) {
            return Err(LowerError::DuplicateArray {
                name: name.to_string(),
            });
        }
        debug!(name, offset, %decl, "registered array");
        self.arrays
            .insert(name.to_string(), ArraySymbol { offset, decl });
        Ok(())
    }

    pub fn unregister_array(&mut self, name: &str) -> Result<(), LowerError> {
        match self.arrays.remove(name) {
            Some(_) => {
                debug!(name, "unregistered array");
                Ok(())
            }
            None => Err(LowerError::MissingArray {
                name: name.to_string(),
            }),
        }
    }

    pub fn lookup_fun(&self, name: &str) -> Option<IrHandle> {
        let found = self.funs.get(name).copied();
        if found.is_none() {
            debug!(name, "function lookup missed");
        }
        found
    }

    pub fn register_fun(&mut self, name: &str, decl: IrHandle) -> Result<(), LowerError> {
        if self.funs.contains_key(name) {
            return Err(LowerError::DuplicateFunction {
                name: name.to_string(),
            });
        }
        debug!(name, %decl, "registered function");
        self.funs.insert(name.to_string(), decl);
        Ok(())
    }

    pub fn unregister_fun(&mut self, name: &str) -> Result<(), LowerError> {
        match self.funs.remove(name) {
            Some(_) => Ok(()),
            None => Err(LowerError::MissingFunction {
                name: name.to_string(),
            }),
        }
    }

    /// Result declaration of the enclosing function, if it returns a value.
    pub fn result(&self) -> Option<IrHandle> {
        self.result
    }

    pub fn set_result(&mut self, decl: IrHandle) -> Result<(), LowerError> {
        if self.result.is_some() {
            return Err(LowerError::ResultAlreadyRegistered);
        }
        self.result = Some(decl);
        Ok(())
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }
}
