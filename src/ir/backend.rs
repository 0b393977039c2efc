//! Interface to the code-generating backend
//!
//! Lowering hands each completed global declaration to a [`Backend`]. The
//! backend owns everything after that point (optimization, instruction
//! selection, object emission); this crate only ships [`GlobalRegistry`],
//! which records what it is given.

use super::{Ir, IrHandle, IrNode};
use tracing::debug;

/// Receiver of finished global declarations
pub trait Backend {
    /// Called once for every function that has a body, after the body is lowered.
    fn register_global_function(&mut self, ir: &Ir, function: IrHandle);

    /// Called for global variable declarations.
    fn register_global_variable(&mut self, ir: &Ir, variable: IrHandle);
}

/// Backend that records registrations in order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GlobalRegistry {
    pub functions: Vec<IrHandle>,
    pub variables: Vec<IrHandle>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the registered functions, in registration order.
    pub fn function_names<'a>(&self, ir: &'a Ir) -> Vec<&'a str> {
        self.functions
            .iter()
            .filter_map(|f| ir.decl_name(*f))
            .collect()
    }
}

impl Backend for GlobalRegistry {
    fn register_global_function(&mut self, ir: &Ir, function: IrHandle) {
        debug!(
            function = ir.decl_name(function).unwrap_or("<anonymous>"),
            defined = matches!(ir.get(function), IrNode::FunctionDecl { body: Some(_), .. }),
            "registering global function"
        );
        self.functions.push(function);
    }

    fn register_global_variable(&mut self, ir: &Ir, variable: IrHandle) {
        debug!(
            variable = ir.decl_name(variable).unwrap_or("<anonymous>"),
            "registering global variable"
        );
        self.variables.push(variable);
    }
}
