//! Expression nodes and operator tags.

use serde::{Deserialize, Serialize};

use super::{ExprNode, StmtNode, WithSpan};
use crate::ast::stmt::{Annotation, ArgumentDeclaration};

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
    BitwiseComplement,
    PrePlusPlus,
    PreMinusMinus,
    PostPlusPlus,
    PostMinusMinus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Backslash,
    Power,
    Modulus,
    Concat,
    And,
    Or,
    Xor,
    Equivalence,
    Implies,
    Contains,
    NotContains,
    InstanceOf,
    CastAs,
    Elvis,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseSignedLeftShift,
    BitwiseSignedRightShift,
    BitwiseUnsignedRightShift,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    TEqual,
    TNotEqual,
    GreaterThan,
    GreaterThanEquals,
    LessThan,
    LessThanEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Equal,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    ModEqual,
    ConcatEqual,
}

/// Declaration modifiers attached to an assignment (`var x = 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignmentModifier {
    Var,
    Final,
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructType {
    Unordered,
    Ordered,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// One `key: value` entry of a struct literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructMember {
    pub key: ExprNode,
    pub value: ExprNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Expr {
    Null,
    BooleanLiteral {
        value: bool,
    },
    IntegerLiteral {
        value: String,
    },
    DecimalLiteral {
        value: String,
    },
    StringLiteral {
        value: String,
    },
    StringInterpolation {
        parts: Vec<ExprNode>,
    },
    StringConcat {
        parts: Vec<ExprNode>,
    },
    Identifier {
        name: String,
    },
    Scope {
        name: String,
    },
    /// A dotted type/class reference such as `java.lang.String`.
    Fqn {
        value: String,
    },
    Parenthesis {
        expression: Box<ExprNode>,
    },
    UnaryOperation {
        operator: UnaryOperator,
        expression: Box<ExprNode>,
    },
    BinaryOperation {
        left: Box<ExprNode>,
        operator: BinaryOperator,
        right: Box<ExprNode>,
    },
    ComparisonOperation {
        left: Box<ExprNode>,
        operator: ComparisonOperator,
        right: Box<ExprNode>,
    },
    TernaryOperation {
        condition: Box<ExprNode>,
        when_true: Box<ExprNode>,
        when_false: Box<ExprNode>,
    },
    Assignment {
        left: Box<ExprNode>,
        operator: Option<AssignmentOperator>,
        right: Option<Box<ExprNode>>,
        modifiers: Vec<AssignmentModifier>,
    },
    DotAccess {
        context: Box<ExprNode>,
        safe: bool,
        access: Box<ExprNode>,
    },
    StaticAccess {
        context: Box<ExprNode>,
        access: Box<ExprNode>,
    },
    ArrayAccess {
        context: Box<ExprNode>,
        safe: bool,
        access: Box<ExprNode>,
    },
    ArrayLiteral {
        values: Vec<ExprNode>,
    },
    StructLiteral {
        struct_type: StructType,
        members: Vec<StructMember>,
    },
    /// A call argument; `name` is set for `name=value` arguments.
    Argument {
        name: Option<Box<ExprNode>>,
        value: Box<ExprNode>,
    },
    FunctionInvocation {
        name: String,
        arguments: Vec<ExprNode>,
    },
    MethodInvocation {
        name: Box<ExprNode>,
        receiver: Box<ExprNode>,
        arguments: Vec<ExprNode>,
        safe: bool,
        uses_dot_access: bool,
    },
    /// A call whose callee is itself an expression, e.g. `obj.fn()()`.
    ExpressionInvocation {
        callee: Box<ExprNode>,
        arguments: Vec<ExprNode>,
    },
    StaticMethodInvocation {
        name: Box<ExprNode>,
        receiver: Box<ExprNode>,
        arguments: Vec<ExprNode>,
    },
    New {
        prefix: Option<Box<ExprNode>>,
        target: Box<ExprNode>,
        arguments: Vec<ExprNode>,
    },
    Closure {
        parameters: Vec<WithSpan<ArgumentDeclaration>>,
        annotations: Vec<WithSpan<Annotation>>,
        body: Box<StmtNode>,
    },
    Lambda {
        parameters: Vec<WithSpan<ArgumentDeclaration>>,
        annotations: Vec<WithSpan<Annotation>>,
        body: Box<StmtNode>,
    },
    /// Headless member reference: `.toUpperCase` or `.left(3)`.
    FunctionalMemberAccess {
        name: String,
        arguments: Option<Vec<ExprNode>>,
    },
    /// Headless built-in function reference: `::ucase`.
    FunctionalBifAccess {
        name: String,
    },
    ExpressionError,
}

impl Expr {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Null => "Null",
            Expr::BooleanLiteral { .. } => "BooleanLiteral",
            Expr::IntegerLiteral { .. } => "IntegerLiteral",
            Expr::DecimalLiteral { .. } => "DecimalLiteral",
            Expr::StringLiteral { .. } => "StringLiteral",
            Expr::StringInterpolation { .. } => "StringInterpolation",
            Expr::StringConcat { .. } => "StringConcat",
            Expr::Identifier { .. } => "Identifier",
            Expr::Scope { .. } => "Scope",
            Expr::Fqn { .. } => "Fqn",
            Expr::Parenthesis { .. } => "Parenthesis",
            Expr::UnaryOperation { .. } => "UnaryOperation",
            Expr::BinaryOperation { .. } => "BinaryOperation",
            Expr::ComparisonOperation { .. } => "ComparisonOperation",
            Expr::TernaryOperation { .. } => "TernaryOperation",
            Expr::Assignment { .. } => "Assignment",
            Expr::DotAccess { .. } => "DotAccess",
            Expr::StaticAccess { .. } => "StaticAccess",
            Expr::ArrayAccess { .. } => "ArrayAccess",
            Expr::ArrayLiteral { .. } => "ArrayLiteral",
            Expr::StructLiteral { .. } => "StructLiteral",
            Expr::Argument { .. } => "Argument",
            Expr::FunctionInvocation { .. } => "FunctionInvocation",
            Expr::MethodInvocation { .. } => "MethodInvocation",
            Expr::ExpressionInvocation { .. } => "ExpressionInvocation",
            Expr::StaticMethodInvocation { .. } => "StaticMethodInvocation",
            Expr::New { .. } => "New",
            Expr::Closure { .. } => "Closure",
            Expr::Lambda { .. } => "Lambda",
            Expr::FunctionalMemberAccess { .. } => "FunctionalMemberAccess",
            Expr::FunctionalBifAccess { .. } => "FunctionalBifAccess",
            Expr::ExpressionError => "ExpressionError",
        }
    }

    /// True for `name=value` arguments.
    pub fn is_named_argument(&self) -> bool {
        matches!(self, Expr::Argument { name: Some(_), .. })
    }
}
