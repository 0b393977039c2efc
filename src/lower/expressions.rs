//! Lowering of expressions and calls

use super::errors::LowerError;
use super::symtable::SymbolTable;
use super::{Lower, LowerContext};
use crate::ir::{IrBinaryOp, IrHandle, IrNode, IrUnaryOp};
use crate::parser::ast::{BinaryOp, CallExpr, Expr, UnaryOp};

impl From<UnaryOp> for IrUnaryOp {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Neg => IrUnaryOp::Negate,
            UnaryOp::Not => IrUnaryOp::TruthNot,
        }
    }
}

impl From<BinaryOp> for IrBinaryOp {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => IrBinaryOp::Plus,
            BinaryOp::Sub => IrBinaryOp::Minus,
            BinaryOp::Mul => IrBinaryOp::Mult,
            BinaryOp::Div => IrBinaryOp::TruncDiv,
            BinaryOp::Mod => IrBinaryOp::TruncMod,
            BinaryOp::Eq => IrBinaryOp::Eq,
            BinaryOp::Ne => IrBinaryOp::Ne,
            BinaryOp::Lt => IrBinaryOp::Lt,
            BinaryOp::Le => IrBinaryOp::Le,
            BinaryOp::Gt => IrBinaryOp::Gt,
            BinaryOp::Ge => IrBinaryOp::Ge,
            BinaryOp::Or => IrBinaryOp::TruthOr,
            BinaryOp::And => IrBinaryOp::TruthAnd,
        }
    }
}

impl Lower for Expr {
    type Output = IrHandle;

    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        let node = match self {
            Expr::Int(value) => IrNode::IntCst(*value),
            Expr::Str(text) => IrNode::StringCst(text.clone()),

            // Declarations are referenced directly, not wrapped
            Expr::Var(name) => {
                return symbols
                    .lookup_var(name)
                    .ok_or_else(|| LowerError::UnknownVariable { name: name.clone() })
            }

            Expr::Index { array, index } => {
                let symbol = symbols
                    .lookup_array(array)
                    .ok_or_else(|| LowerError::UnknownArray {
                        name: array.clone(),
                    })?;
                let index = index.lower(cx, symbols, scope)?;

                // rebase to zero; no arithmetic when the array already starts at 0
                let index = match symbol.offset {
                    0 => index,
                    offset if offset > 0 => {
                        let amount = cx.ir.push(IrNode::IntCst(offset));
                        cx.ir.push(IrNode::Binary {
                            op: IrBinaryOp::Plus,
                            lhs: index,
                            rhs: amount,
                        })
                    }
                    offset => {
                        let amount = cx.ir.push(IrNode::IntCst(-offset));
                        cx.ir.push(IrNode::Binary {
                            op: IrBinaryOp::Minus,
                            lhs: index,
                            rhs: amount,
                        })
                    }
                };

                IrNode::ArrayRef {
                    array: symbol.decl,
                    index,
                }
            }

            Expr::Call(call) => return call.lower(cx, symbols, scope),

            Expr::Unary { op, operand } => IrNode::Unary {
                op: (*op).into(),
                operand: operand.lower(cx, symbols, scope)?,
            },

            Expr::Binary { op, lhs, rhs } => {
                let lhs = lhs.lower(cx, symbols, scope)?;
                let rhs = rhs.lower(cx, symbols, scope)?;
                IrNode::Binary {
                    op: (*op).into(),
                    lhs,
                    rhs,
                }
            }
        };
        Ok(cx.ir.push(node))
    }
}

impl Lower for CallExpr {
    type Output = IrHandle;

    fn lower(
        &self,
        cx: &mut LowerContext<'_>,
        symbols: &mut SymbolTable,
        scope: Option<IrHandle>,
    ) -> Result<IrHandle, LowerError> {
        let function = symbols
            .lookup_fun(&self.name)
            .ok_or_else(|| LowerError::UnknownFunction {
                name: self.name.clone(),
            })?;

        let expected = match cx.ir.get(function) {
            IrNode::FunctionDecl { params, .. } => params.len(),
            _ => 0,
        };
        if expected != self.args.len() {
            return Err(LowerError::ArgumentCountMismatch {
                name: self.name.clone(),
                expected,
                found: self.args.len(),
            });
        }

        let args = self
            .args
            .iter()
            .map(|arg| arg.lower(cx, symbols, scope))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cx.ir.push(IrNode::Call { function, args }))
    }
}
