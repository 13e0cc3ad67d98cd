//! Expression trees for behavioral IR.
//!
//! [`Expr`] represents language-independent expressions used inside
//! processes and assignments. All expressions are typed via [`TypeId`].

use crate::ids::TypeId;
use crate::signal::SignalRef;
use aion_common::{Ident, LogicVec};
use aion_source::Span;
use serde::{Deserialize, Serialize};

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Bitwise NOT (`~` / `not`).
    Not,
    /// Arithmetic negation (`-`).
    Neg,
    /// Reduction AND (`&`).
    RedAnd,
    /// Reduction OR (`|`).
    RedOr,
    /// Reduction XOR (`^`).
    RedXor,
    /// Logical NOT (`!`).
    LogicNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Sub,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Modulo (`%` / `mod`).
    Mod,
    /// Exponentiation (`**`).
    Pow,
    /// Bitwise AND (`&` / `and`).
    And,
    /// Bitwise OR (`|` / `or`).
    Or,
    /// Bitwise XOR (`^` / `xor`).
    Xor,
    /// Left shift (`<<` / `sll`).
    Shl,
    /// Right shift (`>>` / `srl`).
    Shr,
    /// Equality (`==` / `=`).
    Eq,
    /// Inequality (`!=` / `/=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Logical AND (`&&` / `and`).
    LogicAnd,
    /// Logical OR (`||` / `or`).
    LogicOr,
}

/// An expression in the behavioral IR.
///
/// Expressions are language-independent and fully typed after elaboration.
/// They appear inside process bodies, assignments, and case arms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// A reference to a signal (or part of a signal).
    Signal(SignalRef),
    /// A literal constant value.
    Literal(LogicVec),
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand expression.
        operand: Box<Expr>,
        /// The result type.
        ty: TypeId,
        /// Source location.
        span: Span,
    },
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: Box<Expr>,
        /// The right-hand side.
        rhs: Box<Expr>,
        /// The result type.
        ty: TypeId,
        /// Source location.
        span: Span,
    },
    /// A ternary/conditional expression (`cond ? a : b`).
    Ternary {
        /// The condition.
        condition: Box<Expr>,
        /// The value when true.
        true_val: Box<Expr>,
        /// The value when false.
        false_val: Box<Expr>,
        /// The result type.
        ty: TypeId,
        /// Source location.
        span: Span,
    },
    /// A function call expression.
    FuncCall {
        /// The function name.
        name: Ident,
        /// The argument expressions.
        args: Vec<Expr>,
        /// The return type.
        ty: TypeId,
        /// Source location.
        span: Span,
    },
    /// A concatenation of expressions.
    Concat(Vec<Expr>),
    /// A repeat expression (`{count{expr}}`).
    Repeat {
        /// The expression to repeat.
        expr: Box<Expr>,
        /// The number of repetitions.
        count: u32,
        /// Source location.
        span: Span,
    },
    /// A bit index expression (`expr[index]`).
    Index {
        /// The expression being indexed.
        expr: Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
        /// Source location.
        span: Span,
    },
    /// A bit slice expression (`expr[high:low]`).
    Slice {
        /// The expression being sliced.
        expr: Box<Expr>,
        /// The high bit bound.
        high: Box<Expr>,
        /// The low bit bound.
        low: Box<Expr>,
        /// Source location.
        span: Span,
    },
}
