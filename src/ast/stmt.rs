//! Statement, declaration and annotation nodes.

use serde::{Deserialize, Serialize};

use super::{Expr, ExprNode, StmtNode, WithSpan};

// ============================================================================
// DECLARATION PARTS
// ============================================================================

/// `key=value` metadata on a class, function, parameter, property or component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Always a qualified-name node.
    pub key: ExprNode,
    pub value: Option<ExprNode>,
}

impl Annotation {
    pub fn name(&self) -> &str {
        match &self.key.value {
            Expr::Fqn { value } => value,
            _ => &self.key.text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentDeclaration {
    pub required: bool,
    pub type_name: String,
    pub name: String,
    pub default_value: Option<ExprNode>,
    pub annotations: Vec<WithSpan<Annotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnType {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessModifier {
    Public,
    Private,
    Remote,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodModifier {
    Static,
    Final,
    Abstract,
    Default,
}

/// A `case` arm; no condition means `default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub condition: Option<ExprNode>,
    pub body: Vec<StmtNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryCatch {
    pub types: Vec<ExprNode>,
    pub exception: ExprNode,
    pub body: Vec<StmtNode>,
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum Stmt {
    Script {
        statements: Vec<StmtNode>,
    },
    Block {
        body: Vec<StmtNode>,
    },
    ExpressionStatement {
        expression: ExprNode,
    },
    IfElse {
        condition: ExprNode,
        then_body: Box<StmtNode>,
        else_body: Option<Box<StmtNode>>,
    },
    While {
        label: Option<String>,
        condition: ExprNode,
        body: Box<StmtNode>,
    },
    Do {
        label: Option<String>,
        condition: ExprNode,
        body: Box<StmtNode>,
    },
    ForIndex {
        label: Option<String>,
        initializer: Option<ExprNode>,
        condition: Option<ExprNode>,
        step: Option<ExprNode>,
        body: Box<StmtNode>,
    },
    ForIn {
        label: Option<String>,
        variable: ExprNode,
        collection: ExprNode,
        body: Box<StmtNode>,
        has_var: bool,
    },
    Switch {
        condition: ExprNode,
        cases: Vec<WithSpan<SwitchCase>>,
    },
    Try {
        body: Vec<StmtNode>,
        catches: Vec<WithSpan<TryCatch>>,
        finally: Vec<StmtNode>,
    },
    Throw {
        expression: Option<ExprNode>,
    },
    Rethrow,
    Return {
        expression: Option<ExprNode>,
    },
    Break {
        label: Option<String>,
    },
    Continue {
        label: Option<String>,
    },
    Assert {
        expression: ExprNode,
    },
    FunctionDeclaration {
        access: Option<AccessModifier>,
        modifiers: Vec<MethodModifier>,
        name: String,
        return_type: Option<WithSpan<ReturnType>>,
        parameters: Vec<WithSpan<ArgumentDeclaration>>,
        annotations: Vec<WithSpan<Annotation>>,
        /// `None` for abstract and interface methods.
        body: Option<Vec<StmtNode>>,
    },
    Property {
        annotations: Vec<WithSpan<Annotation>>,
    },
    Import {
        target: ExprNode,
        alias: Option<ExprNode>,
    },
    Class {
        imports: Vec<StmtNode>,
        body: Vec<StmtNode>,
        annotations: Vec<WithSpan<Annotation>>,
        documentation: Vec<WithSpan<Annotation>>,
        properties: Vec<StmtNode>,
    },
    Interface {
        imports: Vec<StmtNode>,
        body: Vec<StmtNode>,
        annotations: Vec<WithSpan<Annotation>>,
        documentation: Vec<WithSpan<Annotation>>,
    },
    StaticInitializer {
        body: Vec<StmtNode>,
    },
    /// Tag-style component invocation: `lock name="x" { ... }`.
    Component {
        name: String,
        attributes: Vec<WithSpan<Annotation>>,
        body: Option<Vec<StmtNode>>,
    },
    /// Raw template markup embedded in script, handed to the template stage.
    TemplateIsland {
        template: String,
    },
    StatementError,
}

impl Stmt {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Script { .. } => "Script",
            Stmt::Block { .. } => "Block",
            Stmt::ExpressionStatement { .. } => "ExpressionStatement",
            Stmt::IfElse { .. } => "IfElse",
            Stmt::While { .. } => "While",
            Stmt::Do { .. } => "Do",
            Stmt::ForIndex { .. } => "ForIndex",
            Stmt::ForIn { .. } => "ForIn",
            Stmt::Switch { .. } => "Switch",
            Stmt::Try { .. } => "Try",
            Stmt::Throw { .. } => "Throw",
            Stmt::Rethrow => "Rethrow",
            Stmt::Return { .. } => "Return",
            Stmt::Break { .. } => "Break",
            Stmt::Continue { .. } => "Continue",
            Stmt::Assert { .. } => "Assert",
            Stmt::FunctionDeclaration { .. } => "FunctionDeclaration",
            Stmt::Property { .. } => "Property",
            Stmt::Import { .. } => "Import",
            Stmt::Class { .. } => "Class",
            Stmt::Interface { .. } => "Interface",
            Stmt::StaticInitializer { .. } => "StaticInitializer",
            Stmt::Component { .. } => "Component",
            Stmt::TemplateIsland { .. } => "TemplateIsland",
            Stmt::StatementError => "StatementError",
        }
    }

    /// The statements directly contained in a script, block, class or interface.
    pub fn body(&self) -> Option<&[StmtNode]> {
        match self {
            Stmt::Script { statements } => Some(statements),
            Stmt::Block { body }
            | Stmt::Class { body, .. }
            | Stmt::Interface { body, .. }
            | Stmt::StaticInitializer { body } => Some(body),
            _ => None,
        }
    }
}
