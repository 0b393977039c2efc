//! Lowering of blocks and statements

use super::errors::LowerError;
use super::symtable::SymbolTable;
use super::{Lower, LowerContext};
use crate::ir::{IrHandle, IrNode};
use crate::parser::ast::{AssignOp, Block, Expr, Stmt};

impl Lower for Block {
    type Output = IrHandle;

    /// Lower to a `Bind` linked under `scope`. Declarations are visible to
    /// the block's statements only.
    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        let bind = cx.ir.push(IrNode::Bind {
            vars: Vec::new(),
            body: Vec::new(),
            supercontext: scope,
            subblocks: Vec::new(),
        });
        if let Some(parent) = scope {
            if let IrNode::Bind { subblocks, .. } = cx.ir.get_mut(parent) {
                subblocks.push(bind);
            }
        }

        let mut vars = Vec::with_capacity(self.decls.len());
        let mut body = Vec::with_capacity(self.decls.len() + self.stmts.len());
        for decl in &self.decls {
            decl.register(cx, symbols)?;
            let var = decl.lower(cx, symbols, Some(bind))?;
            vars.push(var);
            body.push(cx.ir.push(IrNode::DeclExpr(var)));
        }

        for stmt in &self.stmts {
            body.push(stmt.lower(cx, symbols, Some(bind))?);
        }

        for decl in &self.decls {
            decl.unregister(symbols)?;
        }

        if let IrNode::Bind {
            vars: bind_vars,
            body: bind_body,
            ..
        } = cx.ir.get_mut(bind)
        {
            *bind_vars = vars;
            *bind_body = body;
        }
        Ok(bind)
    }
}

/// Lower an assignment target, rejecting constants.
fn lower_target(
    target: &Expr,
    cx: &mut LowerContext<'_>,
    symbols: &mut SymbolTable,
    scope: Option<IrHandle>,
) -> Result<IrHandle, LowerError> {
    let handle = target.lower(cx, symbols, scope)?;
    if cx.ir.is_read_only(handle) {
        return Err(LowerError::ReadOnlyAssignment {
            name: cx.ir.decl_name(handle).unwrap_or_default().to_string(),
        });
    }
    Ok(handle)
}

impl Lower for Stmt {
    type Output = IrHandle;

    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        let node = match self {
            Stmt::Assign { op, target, value } => {
                let target = lower_target(target, cx, symbols, scope)?;
                let value = value.lower(cx, symbols, scope)?;
                match op {
                    AssignOp::Assign => IrNode::Modify { target, value },
                    AssignOp::AddAssign => IrNode::PreIncrement {
                        target,
                        amount: value,
                    },
                    AssignOp::SubAssign => IrNode::PreDecrement {
                        target,
                        amount: value,
                    },
                }
            }
            Stmt::Call(call) => return call.lower(cx, symbols, scope),
            Stmt::Block(block) => return block.lower(cx, symbols, scope),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = cond.lower(cx, symbols, scope)?;
                let then_branch = then_branch.lower(cx, symbols, scope)?;
                let else_branch = match else_branch {
                    Some(block) => Some(block.lower(cx, symbols, scope)?),
                    None => None,
                };
                IrNode::Cond {
                    cond,
                    then_branch,
                    else_branch,
                }
            }
            Stmt::Loop(body) => IrNode::Loop(body.lower(cx, symbols, scope)?),
            Stmt::BreakIf(cond) => IrNode::ExitIf(cond.lower(cx, symbols, scope)?),
            Stmt::Exit => match symbols.result() {
                Some(result) => IrNode::Return(result),
                None => return Err(LowerError::ExitWithoutResult),
            },
            Stmt::Read { format, target } => {
                let scanf = cx.external_function("scanf");
                let format = cx.ir.push(IrNode::StringCst(format.clone()));
                let target = lower_target(target, cx, symbols, scope)?;
                let address = cx.ir.push(IrNode::AddrOf(target));
                IrNode::Call {
                    function: scanf,
                    args: vec![format, address],
                }
            }
            Stmt::Write { format, value } => {
                let printf = cx.external_function("printf");
                let format = cx.ir.push(IrNode::StringCst(format.clone()));
                let value = value.lower(cx, symbols, scope)?;
                IrNode::Call {
                    function: printf,
                    args: vec![format, value],
                }
            }
        };
        Ok(cx.ir.push(node))
    }
}
