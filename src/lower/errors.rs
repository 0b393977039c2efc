use thiserror::Error;

/// Semantic errors raised while lowering the AST to IR
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("Unknown variable `{name}'")]
    UnknownVariable { name: String },

    #[error("Unknown array `{name}'")]
    UnknownArray { name: String },

    #[error("Unknown function `{name}'")]
    UnknownFunction { name: String },

    #[error("Variable `{name}' declared more than once")]
    DuplicateVariable { name: String },

    #[error("Array `{name}' declared more than once")]
    DuplicateArray { name: String },

    #[error("Function `{name}' declared more than once")]
    DuplicateFunction { name: String },

    #[error("Cannot unregister variable `{name}': not registered")]
    MissingVariable { name: String },

    #[error("Cannot unregister array `{name}': not registered")]
    MissingArray { name: String },

    #[error("Cannot unregister function `{name}': not registered")]
    MissingFunction { name: String },

    #[error("Function `{name}' defined more than once")]
    FunctionRedefined { name: String },

    #[error("Declaration of function `{name}' conflicts with an earlier declaration")]
    SignatureMismatch { name: String },

    #[error("A function result is already registered in this scope")]
    ResultAlreadyRegistered,

    #[error("`exit' used outside of a function returning a value")]
    ExitWithoutResult,

    #[error("Function `{name}' expects {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Cannot assign to constant `{name}'")]
    ReadOnlyAssignment { name: String },
}
