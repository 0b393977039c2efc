//! Source types to IR types, and type-directed symbol registration
//!
//! Scalars live in the variable namespace. Arrays live in the array
//! namespace together with the offset that rebases their declared lower bound
//! to zero.

use super::errors::LowerError;
use super::symtable::SymbolTable;
use crate::ir::{IrHandle, IrType};
use crate::parser::ast::TypeNode;

pub fn lower_type(ty: &TypeNode) -> IrType {
    match ty {
        TypeNode::Int => IrType::Int,
        TypeNode::Array { begin, end, elem } => IrType::Array {
            elem: Box::new(lower_type(elem)),
            // the parser guarantees end > begin
            len: (i64::from(*end) - i64::from(*begin) + 1) as u64,
        },
    }
}

/// Index offset for an array whose first element is `begin`.
///
/// Parsed bounds lie within `-i32::MAX ..= i32::MAX`, so the negation is exact.
pub fn array_offset(begin: i32) -> i32 {
    -begin
}

pub fn register_symbol(
    ty: &TypeNode,
    name: &str,
    decl: IrHandle,
    symbols: &mut SymbolTable,
) -> Result<(), LowerError> {
    match ty {
        TypeNode::Int => symbols.register_var(name, decl),
        TypeNode::Array { begin, .. } => symbols.register_array(name, array_offset(*begin), decl),
    }
}

pub fn lookup_symbol(ty: &TypeNode, name: &str, symbols: &SymbolTable) -> Option<IrHandle> {
    match ty {
        TypeNode::Int => symbols.lookup_var(name),
        TypeNode::Array { .. } => symbols.lookup_array(name).map(|array| array.decl),
    }
}

pub fn unregister_symbol(
    ty: &TypeNode,
    name: &str,
    symbols: &mut SymbolTable,
) -> Result<(), LowerError> {
    match ty {
        TypeNode::Int => symbols.unregister_var(name),
        TypeNode::Array { .. } => symbols.unregister_array(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Ir, IrNode};

    #[test]
    fn test_lower_nested_array_type() {
        let ty = TypeNode::array(-1, 1, TypeNode::array(0, 9, TypeNode::Int));
        assert_eq!(lower_type(&ty).to_string(), "int[10][3]");
    }

    #[test]
    fn test_array_length_spans_widest_range() {
        let ty = TypeNode::array(-i32::MAX, i32::MAX, TypeNode::Int);
        assert_eq!(
            lower_type(&ty),
            IrType::Array {
                elem: Box::new(IrType::Int),
                len: (1 << 32) - 1
            }
        );
        assert_eq!(array_offset(-i32::MAX), i32::MAX);
    }

    #[test]
    fn test_register_by_type() {
        let mut ir = Ir::new();
        let decl = ir.push(IrNode::IntCst(0));
        let mut symbols = SymbolTable::new();
        let array = TypeNode::array(5, 10, TypeNode::Int);

        register_symbol(&array, "a", decl, &mut symbols).unwrap();
        register_symbol(&TypeNode::Int, "a", decl, &mut symbols).unwrap();

        assert_eq!(symbols.lookup_array("a").map(|a| a.offset), Some(-5));
        assert_eq!(lookup_symbol(&array, "a", &symbols), Some(decl));

        unregister_symbol(&array, "a", &mut symbols).unwrap();
        assert_eq!(lookup_symbol(&array, "a", &symbols), None);
        assert_eq!(lookup_symbol(&TypeNode::Int, "a", &symbols), Some(decl));
    }
}
