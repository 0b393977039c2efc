// AST (Abstract Syntax Tree) definitions for the Pascal-like front end
//
// Every node exclusively owns its children. The parser performs all sugar
// expansion (`while`, `for`, `inc`, `readln`, ...), so the tree only holds the
// core constructs that lowering understands.

/// Type of a declared variable, argument or function result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Int,
    /// Inclusive bounds, `end > begin`
    Array {
        begin: i32,
        end: i32,
        elem: Box<TypeNode>,
    },
}

impl TypeNode {
    pub fn array(begin: i32, end: i32, elem: TypeNode) -> Self {
        TypeNode::Array {
            begin,
            end,
            elem: Box::new(elem),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Or,
    And,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "div",
            BinaryOp::Mod => "mod",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
        }
    }
}

/// Function call: callee name plus ordered arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<Expr>,
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Int(i32),
    Str(String),
    /// Variable or constant reference
    Var(String),
    Index {
        array: String,
        index: Box<Expr>,
    },
    Call(CallExpr),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

/// Assignment flavours; `inc`/`dec` become the compound forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => ":=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign {
        op: AssignOp,
        target: Expr,
        value: Expr,
    },
    Call(CallExpr),
    Block(Block),
    If {
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    /// Unconditional loop, left only through `BreakIf` or `Exit`
    Loop(Block),
    BreakIf(Expr),
    Exit,
    Read {
        format: String,
        target: Expr,
    },
    Write {
        format: String,
        value: Expr,
    },
}

impl Stmt {
    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            op: AssignOp::Assign,
            target,
            value,
        }
    }
}

/// Constant declaration: `const name = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: String,
    pub value: i32,
}

/// Variable declaration: `var name : ty;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeNode,
}

/// Block-local declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalDecl {
    Const(ConstDecl),
    Var(VarDecl),
}

impl LocalDecl {
    pub fn name(&self) -> &str {
        match self {
            LocalDecl::Const(c) => &c.name,
            LocalDecl::Var(v) => &v.name,
        }
    }
}

/// The only scope-introducing construct
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub decls: Vec<LocalDecl>,
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(decls: Vec<LocalDecl>, stmts: Vec<Stmt>) -> Self {
        Self { decls, stmts }
    }

    /// A declaration-free block around the given statements.
    pub fn of(stmts: Vec<Stmt>) -> Self {
        Self {
            decls: Vec::new(),
            stmts,
        }
    }
}

/// Function or procedure declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub args: Vec<(String, TypeNode)>,
    /// `None` for procedures
    pub result: Option<TypeNode>,
    /// `None` for forward declarations
    pub body: Option<Block>,
}

impl FunctionDecl {
    pub fn is_procedure(&self) -> bool {
        self.result.is_none()
    }

    pub fn is_forward(&self) -> bool {
        self.body.is_none()
    }
}

/// Name of the entry function wrapping the program's statement block
pub const MAIN_FUNCTION: &str = "main";

/// Root of the AST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    /// User functions in source order, followed by the synthesized `main`
    pub functions: Vec<FunctionDecl>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    /// The synthesized entry function, if the program has been completed.
    pub fn main(&self) -> Option<&FunctionDecl> {
        self.functions
            .last()
            .filter(|f| f.name == MAIN_FUNCTION)
    }
}
