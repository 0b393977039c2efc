//! Lowering of local declarations and functions

use super::errors::LowerError;
use super::symtable::SymbolTable;
use super::types::{lookup_symbol, lower_type, register_symbol, unregister_symbol};
use super::{Lower, LowerContext};
use crate::ir::{IrHandle, IrNode, IrType};
use crate::parser::ast::{FunctionDecl, LocalDecl, TypeNode};
use tracing::debug;

impl LocalDecl {
    fn ty(&self) -> &TypeNode {
        match self {
            LocalDecl::Const(_) => &TypeNode::Int,
            LocalDecl::Var(var) => &var.ty,
        }
    }

    /// Create the IR declaration and make the name visible. Fails if the name
    /// is already in scope.
    pub(super) fn register(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
    ) -> Result<IrHandle, LowerError> {
        let decl = match self {
            LocalDecl::Const(constant) => {
                let initial = cx.ir.push(IrNode::IntCst(constant.value));
                cx.ir.push(IrNode::VarDecl {
                    name: constant.name.clone(),
                    ty: IrType::Int,
                    read_only: true,
                    initial: Some(initial),
                })
            }
            LocalDecl::Var(var) => cx.ir.push(IrNode::VarDecl {
                name: var.name.clone(),
                ty: lower_type(&var.ty),
                read_only: false,
                initial: None,
            }),
        };
        register_symbol(self.ty(), self.name(), decl, symbols)?;
        Ok(decl)
    }

    pub(super) fn unregister(&self, symbols: &mut SymbolTable) -> Result<(), LowerError> {
        unregister_symbol(self.ty(), self.name(), symbols)
    }
}

impl Lower for LocalDecl {
    type Output = IrHandle;

    /// Look the declaration up, creating it if it is not registered yet.
    /// Lowering an already registered declaration returns the same entity.
    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        _scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        match lookup_symbol(self.ty(), self.name(), symbols) {
            Some(decl) => Ok(decl),
            None => self.register(cx, symbols),
        }
    }
}

impl FunctionDecl {
    fn result_type(&self) -> IrType {
        self.result.as_ref().map_or(IrType::Void, lower_type)
    }

    fn param_types(&self) -> Vec<IrType> {
        self.args.iter().map(|(_, ty)| lower_type(ty)).collect()
    }

    fn ir_type(&self) -> IrType {
        IrType::Function {
            result: Box::new(self.result_type()),
            params: self.param_types(),
            variadic: false,
        }
    }

    /// Whether an earlier declaration has the same parameter and result types.
    fn matches_declaration(&self, cx: &LowerContext<'_>, existing: IrHandle) -> bool {
        match cx.ir.signature(existing) {
            Some((params, result)) => {
                params == self.param_types().as_slice() && *result == self.result_type()
            }
            None => false,
        }
    }

    /// Create the declaration node with its parameters and result slot.
    fn declare(&self, cx: &mut LowerContext<'_>) -> IrHandle {
        let params = self
            .args
            .iter()
            .map(|(name, ty)| {
                cx.ir.push(IrNode::ParmDecl {
                    name: name.clone(),
                    ty: lower_type(ty),
                })
            })
            .collect();
        let result = cx.ir.push(IrNode::ResultDecl {
            ty: self.result_type(),
        });
        cx.ir.push(IrNode::FunctionDecl {
            name: self.name.clone(),
            ty: self.ir_type(),
            params,
            result,
            body: None,
            external: false,
        })
    }
}

impl Lower for FunctionDecl {
    type Output = IrHandle;

    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        _scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        let fun = match symbols.lookup_fun(&self.name) {
            Some(existing) => {
                let defined = matches!(
                    cx.ir.get(existing),
                    IrNode::FunctionDecl { body: Some(_), .. }
                );
                if defined && self.body.is_some() {
                    return Err(LowerError::FunctionRedefined {
                        name: self.name.clone(),
                    });
                }
                if !self.matches_declaration(cx, existing) {
                    return Err(LowerError::SignatureMismatch {
                        name: self.name.clone(),
                    });
                }
                existing
            }
            None => {
                let fun = self.declare(cx);
                symbols.register_fun(&self.name, fun)?;
                fun
            }
        };

        let Some(body) = &self.body else {
            debug!(name = %self.name, "forward declaration");
            return Ok(fun);
        };

        let (params, result) = match cx.ir.get(fun) {
            IrNode::FunctionDecl { params, result, .. } => (params.clone(), *result),
            _ => {
                return Err(LowerError::UnknownFunction {
                    name: self.name.clone(),
                })
            }
        };

        let mut sub = symbols.function_scope();
        if let Some(ty) = &self.result {
            sub.set_result(result)?;
            register_symbol(ty, &self.name, result, &mut sub)?;
        }

        // a forward declaration may have used other parameter names
        for ((name, ty), &parm) in self.args.iter().zip(&params) {
            if let IrNode::ParmDecl { name: parm_name, .. } = cx.ir.get_mut(parm) {
                *parm_name = name.clone();
            }
            register_symbol(ty, name, parm, &mut sub)?;
        }

        let bind = body.lower(cx, &mut sub, Some(fun))?;
        if let IrNode::FunctionDecl { body, .. } = cx.ir.get_mut(fun) {
            *body = Some(bind);
        }
        sub.clear_result();

        debug!(name = %self.name, %fun, "lowered function");
        Ok(fun)
    }
}
