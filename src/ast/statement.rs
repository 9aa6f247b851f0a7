use crate::lexer::Position;

use super::{expression::Call, expression::Expression, modifiers::Modifier, type_name::TypeName};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    DeclarationCallable(DeclarationCallable),
    Call(Call),
    Return(Return),
    If(If),
    While(While),
    For(For),
    Try(Try),
    Break(Position),
    Continue(Position),
    Import(Import),
    FromImport(FromImport),
    Expr(ExprStmt),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Declaration(node) => node.position,
            Statement::DeclarationCallable(node) => node.position,
            Statement::Call(node) => node.position,
            Statement::Return(node) => node.position,
            Statement::If(node) => node.position,
            Statement::While(node) => node.position,
            Statement::For(node) => node.position,
            Statement::Try(node) => node.position,
            Statement::Break(position) | Statement::Continue(position) => *position,
            Statement::Import(node) => node.position,
            Statement::FromImport(node) => node.position,
            Statement::Expr(node) => node.position,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub modifiers: Vec<Modifier>,
    pub declared_type: TypeName,
    pub name: String,
    pub initializer: Expression,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub declared_type: TypeName,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationCallable {
    pub modifiers: Vec<Modifier>,
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: TypeName,
    /// Absent for a forward declaration; such a callable cannot be invoked.
    pub body: Option<Vec<Statement>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub then_body: Vec<Statement>,
    pub else_body: Option<Vec<Statement>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: Box<Statement>,
    pub condition: Expression,
    pub update: Expression,
    pub body: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Handler {
    pub exception_name: String,
    pub bind_name: String,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub body: Vec<Statement>,
    pub handlers: Vec<Handler>,
    pub finally_body: Option<Vec<Statement>>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportEntry {
    pub module_path: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub entries: Vec<ImportEntry>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FromImportNames {
    Names(Vec<(String, Option<String>)>),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromImport {
    pub module_path: String,
    pub names: FromImportNames,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expression,
    pub position: Position,
}
