//! AST to IR lowering
//!
//! Every AST node that produces IR implements [`Lower`]. Children are lowered
//! first and the parent assembles their handles into its own node. Name
//! resolution goes through an explicit [`SymbolTable`] passed down the call
//! chain; blocks register their declarations on entry and unregister them on
//! exit, so the table always reflects exactly the names in scope.
//!
//! The first error aborts the whole translation unit.

mod declarations;
pub mod errors;
mod expressions;
mod statements;
pub mod symtable;
pub mod types;

pub use errors::LowerError;
pub use symtable::SymbolTable;

use crate::ir::backend::Backend;
use crate::ir::{Ir, IrHandle, IrNode, IrType};
use crate::parser::ast::Program;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Lowering of one AST construct
pub trait Lower {
    type Output;

    /// `scope` is the enclosing function declaration or bind, if any.
    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        scope: Option<IrHandle>,
    ) -> Result<Self::Output, LowerError>;
}

/// State shared by the whole translation: the IR arena being filled, the
/// backend, and the external runtime functions synthesized so far.
pub struct LowerContext<'b> {
    pub ir: Ir,
    backend: &'b mut dyn Backend,
    externs: FxHashMap<&'static str, IrHandle>,
}

impl<'b> LowerContext<'b> {
    pub fn new(backend: &'b mut dyn Backend) -> Self {
        Self {
            ir: Ir::new(),
            backend,
            externs: FxHashMap::default(),
        }
    }

    /// Declaration of a C-style `int name(const char *, ...)` runtime routine,
    /// created on first use.
    pub fn external_function(&mut self, name: &'static str) -> IrHandle {
        if let Some(&decl) = self.externs.get(name) {
            return decl;
        }

        let result = self.ir.push(IrNode::ResultDecl { ty: IrType::Int });
        let decl = self.ir.push(IrNode::FunctionDecl {
            name: name.to_string(),
            ty: IrType::Function {
                result: Box::new(IrType::Int),
                params: vec![IrType::pointer_to(IrType::Char)],
                variadic: true,
            },
            params: Vec::new(),
            result,
            body: None,
            external: true,
        });
        debug!(name, %decl, "declared external function");
        self.externs.insert(name, decl);
        decl
    }
}

/// Result of lowering a program
#[derive(Debug, Clone)]
pub struct Translation {
    pub ir: Ir,
    /// The translation unit node
    pub root: IrHandle,
}

impl Translation {
    pub fn dump(&self) -> String {
        self.ir.dump(self.root)
    }

    /// Defined functions, in source order.
    pub fn functions(&self) -> &[IrHandle] {
        match self.ir.get(self.root) {
            IrNode::TranslationUnit { functions, .. } => functions.as_slice(),
            _ => &[],
        }
    }

    /// Defined function with the given name.
    pub fn function(&self, name: &str) -> Option<IrHandle> {
        self.functions()
            .iter()
            .copied()
            .find(|f| self.ir.decl_name(*f) == Some(name))
    }
}

/// Lower a parsed program, handing each defined function to `backend`.
pub fn translate(program: &Program, backend: &mut dyn Backend) -> Result<Translation, LowerError> {
    let mut cx = LowerContext::new(backend);
    let mut symbols = SymbolTable::new();
    let mut functions = Vec::new();

    for function in &program.functions {
        let decl = function.lower(&mut cx, &mut symbols, None)?;
        if !function.is_forward() {
            cx.backend.register_global_function(&cx.ir, decl);
            functions.push(decl);
        }
    }

    let root = cx.ir.push(IrNode::TranslationUnit {
        name: program.name.clone(),
        functions,
    });
    debug!(program = %program.name, nodes = cx.ir.len(), "translation finished");

    Ok(Translation { ir: cx.ir, root })
}
