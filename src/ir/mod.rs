//! Intermediate representation produced by lowering
//!
//! The IR mirrors the shape of a compiler backend's expression trees
//! (declarations, expressions, scope binds, loops with explicit exits) and is
//! stored in an arena: every node lives in [`Ir`] and is addressed by a
//! copyable [`IrHandle`]. Nodes refer to each other only through handles, so
//! the same declaration can be referenced from many places without shared
//! ownership.
//!
//! - [`backend`]: the collaborator that receives finished global declarations
//! - [`dump`]: s-expression rendering for debugging and shape comparisons

pub mod backend;
pub mod dump;

use std::fmt;

/// Index of a node in an [`Ir`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IrHandle(u32);

impl IrHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for IrHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Types of IR values and declarations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IrType {
    Void,
    Int,
    Char,
    /// Zero-based array of `len` elements
    Array { elem: Box<IrType>, len: u64 },
    Pointer(Box<IrType>),
    Function {
        result: Box<IrType>,
        params: Vec<IrType>,
        variadic: bool,
    },
}

impl IrType {
    pub fn pointer_to(ty: IrType) -> Self {
        IrType::Pointer(Box::new(ty))
    }

    /// Element type of an array type.
    pub fn element(&self) -> Option<&IrType> {
        match self {
            IrType::Array { elem, .. } => Some(&**elem),
            _ => None,
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => f.write_str("void"),
            IrType::Int => f.write_str("int"),
            IrType::Char => f.write_str("char"),
            IrType::Array { elem, len } => write!(f, "{}[{}]", elem, len),
            IrType::Pointer(inner) => write!(f, "{}*", inner),
            IrType::Function {
                result,
                params,
                variadic,
            } => {
                write!(f, "{}(", result)?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                if *variadic {
                    f.write_str(if params.is_empty() { "..." } else { ", ..." })?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Unary expression codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrUnaryOp {
    Negate,
    TruthNot,
}

/// Binary expression codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrBinaryOp {
    Plus,
    Minus,
    Mult,
    TruncDiv,
    TruncMod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    TruthOr,
    TruthAnd,
}

impl IrBinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            IrBinaryOp::Eq
                | IrBinaryOp::Ne
                | IrBinaryOp::Lt
                | IrBinaryOp::Le
                | IrBinaryOp::Gt
                | IrBinaryOp::Ge
        )
    }
}

/// IR node kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrNode {
    IntCst(i32),
    StringCst(String),

    // Declarations
    VarDecl {
        name: String,
        ty: IrType,
        read_only: bool,
        initial: Option<IrHandle>,
    },
    ParmDecl {
        name: String,
        ty: IrType,
    },
    ResultDecl {
        ty: IrType,
    },
    FunctionDecl {
        name: String,
        ty: IrType,
        params: Vec<IrHandle>,
        result: IrHandle,
        /// The outermost `Bind` once the function is defined
        body: Option<IrHandle>,
        external: bool,
    },

    // Expressions
    AddrOf(IrHandle),
    ArrayRef {
        array: IrHandle,
        index: IrHandle,
    },
    Unary {
        op: IrUnaryOp,
        operand: IrHandle,
    },
    Binary {
        op: IrBinaryOp,
        lhs: IrHandle,
        rhs: IrHandle,
    },
    Modify {
        target: IrHandle,
        value: IrHandle,
    },
    PreIncrement {
        target: IrHandle,
        amount: IrHandle,
    },
    PreDecrement {
        target: IrHandle,
        amount: IrHandle,
    },
    Call {
        function: IrHandle,
        args: Vec<IrHandle>,
    },

    // Statements
    DeclExpr(IrHandle),
    /// Lexical scope: its variables, statement list, and block tree links
    Bind {
        vars: Vec<IrHandle>,
        body: Vec<IrHandle>,
        supercontext: Option<IrHandle>,
        subblocks: Vec<IrHandle>,
    },
    Cond {
        cond: IrHandle,
        then_branch: IrHandle,
        else_branch: Option<IrHandle>,
    },
    Loop(IrHandle),
    /// Leaves the innermost loop when the condition holds
    ExitIf(IrHandle),
    Return(IrHandle),

    TranslationUnit {
        name: String,
        functions: Vec<IrHandle>,
    },
}

/// Arena holding every node built during one translation
#[derive(Debug, Default, Clone)]
pub struct Ir {
    nodes: Vec<IrNode>,
}

impl Ir {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: IrNode) -> IrHandle {
        let handle = IrHandle(self.nodes.len() as u32);
        self.nodes.push(node);
        handle
    }

    pub fn get(&self, handle: IrHandle) -> &IrNode {
        &self.nodes[handle.index()]
    }

    pub fn get_mut(&mut self, handle: IrHandle) -> &mut IrNode {
        &mut self.nodes[handle.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every handle in the arena, in creation order.
    pub fn handles(&self) -> impl Iterator<Item = IrHandle> {
        (0..self.nodes.len() as u32).map(IrHandle)
    }

    /// Name of a declaration node, if it has one.
    pub fn decl_name(&self, handle: IrHandle) -> Option<&str> {
        match self.get(handle) {
            IrNode::VarDecl { name, .. }
            | IrNode::ParmDecl { name, .. }
            | IrNode::FunctionDecl { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Whether the node is a read-only variable declaration.
    pub fn is_read_only(&self, handle: IrHandle) -> bool {
        matches!(self.get(handle), IrNode::VarDecl { read_only: true, .. })
    }

    /// Type of the value a node produces (`void` for statements).
    pub fn type_of(&self, handle: IrHandle) -> IrType {
        match self.get(handle) {
            IrNode::IntCst(_) => IrType::Int,
            IrNode::StringCst(_) => IrType::pointer_to(IrType::Char),
            IrNode::VarDecl { ty, .. }
            | IrNode::ParmDecl { ty, .. }
            | IrNode::ResultDecl { ty }
            | IrNode::FunctionDecl { ty, .. } => ty.clone(),
            IrNode::AddrOf(inner) => IrType::pointer_to(self.type_of(*inner)),
            IrNode::ArrayRef { array, .. } => self
                .type_of(*array)
                .element()
                .cloned()
                .unwrap_or(IrType::Void),
            IrNode::Unary { operand, .. } => self.type_of(*operand),
            IrNode::Binary { op, lhs, .. } => {
                if op.is_comparison() {
                    IrType::Int
                } else {
                    self.type_of(*lhs)
                }
            }
            IrNode::Modify { target, .. }
            | IrNode::PreIncrement { target, .. }
            | IrNode::PreDecrement { target, .. } => self.type_of(*target),
            IrNode::Call { function, .. } => match self.type_of(*function) {
                IrType::Function { result, .. } => *result,
                _ => IrType::Void,
            },
            IrNode::DeclExpr(_)
            | IrNode::Bind { .. }
            | IrNode::Cond { .. }
            | IrNode::Loop(_)
            | IrNode::ExitIf(_)
            | IrNode::Return(_)
            | IrNode::TranslationUnit { .. } => IrType::Void,
        }
    }

    /// Parameter and result types of a function declaration.
    pub fn signature(&self, function: IrHandle) -> Option<(&[IrType], &IrType)> {
        match self.get(function) {
            IrNode::FunctionDecl {
                ty: IrType::Function { result, params, .. },
                ..
            } => Some((params.as_slice(), &**result)),
            _ => None,
        }
    }
}
