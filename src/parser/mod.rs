mod error;

pub use error::{ParseError, ParseResult};

use unescape::unescape;

use crate::ast::*;
use crate::lexer::{Position, Token, TokenKind};

const MODIFIER_KEYWORDS: [&str; 4] = ["const", "static", "global", "local"];
const TYPE_KEYWORDS: [&str; 8] = ["int", "float", "bool", "char", "str", "array", "tuple", "map"];

/// Recursive-descent parser over a pre-lexed token stream.
///
/// Dispatches on the current token's kind and, for identifiers, on the
/// lexeme to recognize keywords — the lexer never distinguishes keywords
/// from ordinary identifiers.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    source_lines: Vec<&'a str>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, source: &'a str) -> Self {
        Parser { tokens, pos: 0, source_lines: source.lines().collect() }
    }

    pub fn parse_program(mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.check_eof() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    // -- token stream primitives --------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn check_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !self.check_eof() {
            self.pos += 1;
        }
        token
    }

    fn peek_at(&self, offset: usize) -> &TokenKind {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn check_kind(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn current_keyword(&self) -> Option<&str> {
        match &self.current().kind {
            TokenKind::Id(word) => Some(word.as_str()),
            _ => None,
        }
    }

    fn is_keyword(&self, word: &str) -> bool {
        self.current_keyword() == Some(word)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self.current().position;
        let line_text = self.source_lines.get(position.line.saturating_sub(1)).copied();
        ParseError::new(message, position, line_text)
    }

    fn expect_kind(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        if self.check_kind(&kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!("expected {what}, found {}", self.current().kind)))
        }
    }

    fn expect_keyword(&mut self, word: &str) -> ParseResult<Position> {
        if self.is_keyword(word) {
            Ok(self.advance().position)
        } else {
            Err(self.error(format!("expected keyword '{word}', found {}", self.current().kind)))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<(String, Position)> {
        match &self.current().kind {
            TokenKind::Id(name) => {
                let name = name.clone();
                let position = self.current().position;
                self.advance();
                Ok((name, position))
            }
            other => Err(self.error(format!("expected {what}, found {other}"))),
        }
    }

    // -- statements -----------------------------------------------------

    fn statement(&mut self) -> ParseResult<Statement> {
        if self.is_keyword("if") {
            let stmt = self.if_stmt()?;
            self.skip_optional_semicolon();
            return Ok(stmt);
        }
        if self.is_keyword("while") {
            let stmt = self.while_stmt()?;
            self.skip_optional_semicolon();
            return Ok(stmt);
        }
        if self.is_keyword("for") {
            let stmt = self.for_stmt()?;
            self.skip_optional_semicolon();
            return Ok(stmt);
        }
        if self.is_keyword("try") {
            let stmt = self.try_stmt()?;
            self.skip_optional_semicolon();
            return Ok(stmt);
        }
        if self.is_keyword("return") {
            return self.return_stmt();
        }
        if self.is_keyword("import") {
            return self.import_stmt();
        }
        if self.is_keyword("from") {
            return self.from_import_stmt();
        }
        if self.is_keyword("break") {
            let position = self.advance().position;
            self.expect_kind(TokenKind::Semicolon, "';' after 'break'")?;
            return Ok(Statement::Break(position));
        }
        if self.is_keyword("continue") {
            let position = self.advance().position;
            self.expect_kind(TokenKind::Semicolon, "';' after 'continue'")?;
            return Ok(Statement::Continue(position));
        }
        if self.starts_declaration() {
            return self.declaration_stmt();
        }
        self.expr_or_call_stmt()
    }

    /// `if`/`while`/`for`/`try` are block-bodied statements; source in the
    /// wild (and every worked example in spec §8) terminates them with a
    /// trailing `;` same as any other statement, so a lone `;` right after
    /// one is swallowed here rather than left for `statement()` to choke on.
    fn skip_optional_semicolon(&mut self) {
        if self.check_kind(&TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn starts_declaration(&self) -> bool {
        match self.current_keyword() {
            Some(word) => {
                MODIFIER_KEYWORDS.contains(&word)
                    || TYPE_KEYWORDS.contains(&word)
                    || word == "auto"
                    || word == "callable"
            }
            None => false,
        }
    }

    fn block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect_kind(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.check_kind(&TokenKind::RBrace) {
            if self.check_eof() {
                return Err(self.error("unterminated block, expected '}'"));
            }
            statements.push(self.statement()?);
        }
        self.expect_kind(TokenKind::RBrace, "'}'")?;
        Ok(statements)
    }

    fn if_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("if")?;
        self.expect_kind(TokenKind::LParen, "'(' after 'if'")?;
        let condition = self.expression()?;
        self.expect_kind(TokenKind::RParen, "')' after if condition")?;
        let then_body = self.block()?;
        let else_body = if self.is_keyword("else") {
            self.advance();
            if self.is_keyword("if") {
                Some(vec![self.if_stmt()?])
            } else {
                Some(self.block()?)
            }
        } else {
            None
        };
        Ok(Statement::If(If { condition, then_body, else_body, position }))
    }

    fn while_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("while")?;
        self.expect_kind(TokenKind::LParen, "'(' after 'while'")?;
        let condition = self.expression()?;
        self.expect_kind(TokenKind::RParen, "')' after while condition")?;
        let body = self.block()?;
        Ok(Statement::While(While { condition, body, position }))
    }

    fn for_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("for")?;
        self.expect_kind(TokenKind::LParen, "'(' after 'for'")?;
        let init = Box::new(self.statement()?);
        let condition = self.expression()?;
        self.expect_kind(TokenKind::Semicolon, "';' after for condition")?;
        let update = self.expression()?;
        self.expect_kind(TokenKind::RParen, "')' after for clauses")?;
        let body = self.block()?;
        Ok(Statement::For(For { init, condition, update, body, position }))
    }

    fn try_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("try")?;
        let body = self.block()?;
        let mut handlers = Vec::new();
        while self.is_keyword("except") {
            self.advance();
            let (exception_name, _) = self.expect_identifier("exception type name")?;
            self.expect_keyword("as")?;
            let (bind_name, _) = self.expect_identifier("exception binding name")?;
            let handler_body = self.block()?;
            handlers.push(Handler { exception_name, bind_name, body: handler_body });
        }
        if handlers.is_empty() {
            return Err(self.error("'try' requires at least one 'except' handler"));
        }
        let finally_body = if self.is_keyword("finally") {
            self.advance();
            Some(self.block()?)
        } else {
            None
        };
        Ok(Statement::Try(Try { body, handlers, finally_body, position }))
    }

    fn return_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("return")?;
        let value = if self.check_kind(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect_kind(TokenKind::Semicolon, "';' after return value")?;
        Ok(Statement::Return(Return { value, position }))
    }

    fn dotted_path(&mut self) -> ParseResult<String> {
        let (first, _) = self.expect_identifier("module path segment")?;
        let mut path = first;
        while self.check_kind(&TokenKind::Dot) {
            self.advance();
            let (segment, _) = self.expect_identifier("module path segment")?;
            path.push('.');
            path.push_str(&segment);
        }
        Ok(path)
    }

    fn import_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("import")?;
        let mut entries = Vec::new();
        loop {
            let module_path = self.dotted_path()?;
            let alias = if self.is_keyword("as") {
                self.advance();
                Some(self.expect_identifier("import alias")?.0)
            } else {
                None
            };
            entries.push(ImportEntry { module_path, alias });
            if self.check_kind(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        self.expect_kind(TokenKind::Semicolon, "';' after import")?;
        Ok(Statement::Import(Import { entries, position }))
    }

    fn from_import_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.expect_keyword("from")?;
        let module_path = self.dotted_path()?;
        self.expect_keyword("import")?;
        let names = if self.check_kind(&TokenKind::Star) {
            self.advance();
            FromImportNames::Wildcard
        } else {
            let mut names = Vec::new();
            loop {
                let (name, _) = self.expect_identifier("imported name")?;
                let alias = if self.is_keyword("as") {
                    self.advance();
                    Some(self.expect_identifier("import alias")?.0)
                } else {
                    None
                };
                names.push((name, alias));
                if self.check_kind(&TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
            FromImportNames::Names(names)
        };
        self.expect_kind(TokenKind::Semicolon, "';' after from-import")?;
        Ok(Statement::FromImport(FromImport { module_path, names, position }))
    }

    fn declaration_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.current().position;
        let mut modifiers = Vec::new();
        loop {
            let Some(word) = self.current_keyword().map(str::to_string) else { break };
            if !MODIFIER_KEYWORDS.contains(&word.as_str()) {
                break;
            }
            modifiers.push(Modifier::from_keyword(&word).expect("checked by contains above"));
            self.advance();
        }

        if self.is_keyword("callable") {
            self.advance();
            return self.callable_tail(modifiers, position);
        }

        let declared_type = self.type_name()?;
        let (name, _) = self.expect_identifier("declared name")?;
        self.var_tail(modifiers, declared_type, name, position)
    }

    fn type_name(&mut self) -> ParseResult<TypeName> {
        let (name, _) = self.expect_identifier("type name")?;
        if self.check_kind(&TokenKind::Lt) {
            self.advance();
            let mut params = vec![self.type_name()?];
            while self.check_kind(&TokenKind::Comma) {
                self.advance();
                params.push(self.type_name()?);
            }
            self.expect_kind(TokenKind::Gt, "'>' to close generic type parameters")?;
            Ok(TypeName::Generic { name, params })
        } else {
            Ok(TypeName::simple(name))
        }
    }

    fn callable_tail(&mut self, modifiers: Vec<Modifier>, position: Position) -> ParseResult<Statement> {
        let (name, _) = self.expect_identifier("callable name")?;
        self.expect_kind(TokenKind::LParen, "'(' after callable name")?;
        let mut params = Vec::new();
        if !self.check_kind(&TokenKind::RParen) {
            loop {
                let declared_type = self.type_name()?;
                let (param_name, _) = self.expect_identifier("parameter name")?;
                params.push(Param { declared_type, name: param_name });
                if self.check_kind(&TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect_kind(TokenKind::RParen, "')' after parameters")?;
        self.expect_kind(TokenKind::Arrow, "'->' after parameter list")?;
        let (return_type_name, _) = self.expect_identifier("return type")?;
        let return_type = TypeName::simple(return_type_name);

        let body = if self.check_kind(&TokenKind::LBrace) {
            let body = self.block()?;
            self.expect_kind(TokenKind::Semicolon, "';' after callable body")?;
            Some(body)
        } else {
            self.expect_kind(TokenKind::Semicolon, "';' to end forward declaration")?;
            None
        };

        Ok(Statement::DeclarationCallable(DeclarationCallable { modifiers, name, params, return_type, body, position }))
    }

    fn var_tail(
        &mut self,
        modifiers: Vec<Modifier>,
        declared_type: TypeName,
        name: String,
        position: Position,
    ) -> ParseResult<Statement> {
        if self.check_kind(&TokenKind::Colon) {
            self.advance();
            self.expect_kind(TokenKind::Equal, "'=' after ':' in declaration")?;
        } else {
            self.expect_kind(TokenKind::Equal, "'=' or ':=' in declaration")?;
        }
        let initializer = self.expression()?;
        self.expect_kind(TokenKind::Semicolon, "';' after declaration")?;
        Ok(Statement::Declaration(Declaration { modifiers, declared_type, name, initializer, position }))
    }

    fn expr_or_call_stmt(&mut self) -> ParseResult<Statement> {
        let position = self.current().position;
        let expr = self.expression()?;
        self.expect_kind(TokenKind::Semicolon, "';' after expression")?;
        match expr {
            Expression::Call(call) => Ok(Statement::Call(call)),
            other => Ok(Statement::Expr(ExprStmt { expr: other, position })),
        }
    }

    // -- expressions ------------------------------------------------------

    fn expression(&mut self) -> ParseResult<Expression> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expression> {
        let left = self.logical_or()?;
        if self.check_kind(&TokenKind::Equal) {
            let position = self.current().position;
            self.advance();
            let value = self.assignment()?;
            match left {
                Expression::Identifier(id) => {
                    Ok(Expression::Assign(Assign { name: id.name, value: Box::new(value), position }))
                }
                _ => Err(self.error("assignment target must be an identifier")),
            }
        } else {
            Ok(left)
        }
    }

    fn logical_or(&mut self) -> ParseResult<Expression> {
        let mut left = self.logical_and()?;
        while self.is_keyword("or") {
            let position = self.advance().position;
            let right = self.logical_and()?;
            left = Expression::Logic(Logic { op: LogicOperator::Or, left: Box::new(left), right: Box::new(right), position });
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> ParseResult<Expression> {
        let mut left = self.unary_not()?;
        while self.is_keyword("and") {
            let position = self.advance().position;
            let right = self.unary_not()?;
            left = Expression::Logic(Logic { op: LogicOperator::And, left: Box::new(left), right: Box::new(right), position });
        }
        Ok(left)
    }

    fn unary_not(&mut self) -> ParseResult<Expression> {
        if self.is_keyword("not") {
            let position = self.advance().position;
            let operand = self.unary_not()?;
            return Ok(Expression::UnaryLogic(UnaryLogic { operand: Box::new(operand), position }));
        }
        self.comparison()
    }

    fn comparison(&mut self) -> ParseResult<Expression> {
        let mut left = self.additive()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Lt => BinaryOperator::Lt,
                TokenKind::Gt => BinaryOperator::Gt,
                TokenKind::Le => BinaryOperator::Le,
                TokenKind::Ge => BinaryOperator::Ge,
                TokenKind::EqEq => BinaryOperator::Eq,
                TokenKind::Neq => BinaryOperator::Neq,
                _ => break,
            };
            let position = self.advance().position;
            let right = self.additive()?;
            left = Expression::Binary(Binary { op, left: Box::new(left), right: Box::new(right), position });
        }
        Ok(left)
    }

    fn additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Sub,
                _ => break,
            };
            let position = self.advance().position;
            let right = self.multiplicative()?;
            left = Expression::Binary(Binary { op, left: Box::new(left), right: Box::new(right), position });
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.unary_incr_decr()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Star => BinaryOperator::Mul,
                TokenKind::Slash => BinaryOperator::Div,
                TokenKind::Percent => BinaryOperator::Mod,
                _ => break,
            };
            let position = self.advance().position;
            let right = self.unary_incr_decr()?;
            left = Expression::Binary(Binary { op, left: Box::new(left), right: Box::new(right), position });
        }
        Ok(left)
    }

    /// Pre forms are `++:x` / `--:x`; post forms are `x:++` / `x:--`. A bare
    /// `:` after an identifier with no following `++`/`--` is a no-op —
    /// some source variants treat it as a syntax error, this one doesn't.
    fn unary_incr_decr(&mut self) -> ParseResult<Expression> {
        if matches!(self.current().kind, TokenKind::Increment | TokenKind::Decrement) {
            let is_increment = matches!(self.current().kind, TokenKind::Increment);
            let position = self.advance().position;
            self.expect_kind(TokenKind::Colon, "':' after prefix '++'/'--'")?;
            let (target, _) = self.expect_identifier("increment/decrement target")?;
            let op = if is_increment { UnaryOpKind::PreIncrement } else { UnaryOpKind::PreDecrement };
            return Ok(Expression::UnaryOp(UnaryOp { op, target, position }));
        }

        let expr = self.primary()?;

        if let Expression::Identifier(id) = &expr {
            if self.check_kind(&TokenKind::Colon) {
                if matches!(self.peek_at(1), TokenKind::Increment | TokenKind::Decrement) {
                    self.advance();
                    let is_increment = matches!(self.current().kind, TokenKind::Increment);
                    self.advance();
                    let op = if is_increment { UnaryOpKind::PostIncrement } else { UnaryOpKind::PostDecrement };
                    return Ok(Expression::UnaryOp(UnaryOp { op, target: id.name.clone(), position: id.position }));
                }
                self.advance();
                return Ok(expr);
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expression> {
        let position = self.current().position;
        match self.current().kind.clone() {
            TokenKind::Number(lexeme) => {
                self.advance();
                let value = if lexeme.contains('.') {
                    LiteralValue::Float(lexeme.parse().map_err(|_| self.error(format!("invalid float literal '{lexeme}'")))?)
                } else {
                    LiteralValue::Integer(lexeme.parse().map_err(|_| self.error(format!("invalid integer literal '{lexeme}'")))?)
                };
                Ok(Expression::Literal(Literal { value, position }))
            }
            TokenKind::String(raw) => {
                self.advance();
                let inner = &raw[1..raw.len() - 1];
                let value = unescape(inner).ok_or_else(|| self.error("invalid escape sequence in string literal"))?;
                Ok(Expression::Literal(Literal { value: LiteralValue::Str(value), position }))
            }
            TokenKind::Char(raw) => {
                self.advance();
                let inner = &raw[1..raw.len() - 1];
                let unescaped = unescape(inner).ok_or_else(|| self.error("invalid escape sequence in char literal"))?;
                let mut chars = unescaped.chars();
                let (Some(c), None) = (chars.next(), chars.next()) else {
                    return Err(self.error("char literal must contain exactly one character"));
                };
                Ok(Expression::Literal(Literal { value: LiteralValue::Char(c), position }))
            }
            TokenKind::Id(name) if name == "true" || name == "false" => {
                self.advance();
                Ok(Expression::Literal(Literal { value: LiteralValue::Bool(name == "true"), position }))
            }
            TokenKind::Id(name) => {
                self.advance();
                let mut expr = Expression::Identifier(Identifier { name, position });
                while self.check_kind(&TokenKind::Dot) {
                    self.advance();
                    let (attribute, attr_position) = self.expect_identifier("attribute name")?;
                    expr = Expression::GetAttr(GetAttr { object: Box::new(expr), attribute, position: attr_position });
                }
                if self.check_kind(&TokenKind::LParen) {
                    expr = self.call_tail(expr, position)?;
                }
                Ok(expr)
            }
            TokenKind::LParen => {
                self.advance();
                let first = self.expression()?;
                if self.check_kind(&TokenKind::Comma) {
                    let mut elements = vec![first];
                    while self.check_kind(&TokenKind::Comma) {
                        self.advance();
                        if self.check_kind(&TokenKind::RParen) {
                            break;
                        }
                        elements.push(self.expression()?);
                    }
                    self.expect_kind(TokenKind::RParen, "')' to close tuple literal")?;
                    Ok(Expression::Tuple(TupleLiteral { elements, position }))
                } else {
                    self.expect_kind(TokenKind::RParen, "')' to close group")?;
                    Ok(first)
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check_kind(&TokenKind::RBracket) {
                    loop {
                        elements.push(self.expression()?);
                        if self.check_kind(&TokenKind::Comma) {
                            self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect_kind(TokenKind::RBracket, "']' to close array literal")?;
                Ok(Expression::Array(ArrayLiteral { elements, position }))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = Vec::new();
                if !self.check_kind(&TokenKind::RBrace) {
                    loop {
                        let key = self.expression()?;
                        self.expect_kind(TokenKind::Colon, "':' between map key and value")?;
                        let value = self.expression()?;
                        entries.push((key, value));
                        if self.check_kind(&TokenKind::Comma) {
                            self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect_kind(TokenKind::RBrace, "'}' to close map literal")?;
                Ok(Expression::Map(MapLiteral { entries, position }))
            }
            other => Err(self.error(format!("unexpected token {other} in expression position"))),
        }
    }

    fn call_tail(&mut self, callee: Expression, position: Position) -> ParseResult<Expression> {
        self.expect_kind(TokenKind::LParen, "'(' to start call arguments")?;
        let mut positional_args = Vec::new();
        let mut keyword_args = Vec::new();
        if !self.check_kind(&TokenKind::RParen) {
            loop {
                let is_keyword_arg = matches!(self.current().kind, TokenKind::Id(_))
                    && matches!(self.peek_at(1), TokenKind::Equal);
                if is_keyword_arg {
                    let (name, _) = self.expect_identifier("keyword argument name")?;
                    self.expect_kind(TokenKind::Equal, "'=' after keyword argument name")?;
                    let value = self.expression()?;
                    keyword_args.push((name, value));
                } else {
                    positional_args.push(self.expression()?);
                }
                if self.check_kind(&TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect_kind(TokenKind::RParen, "')' to close call arguments")?;
        Ok(Expression::Call(Call { callee: Box::new(callee), positional_args, keyword_args, position }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> ParseResult<Program> {
        let tokens = Lexer::new(source).lex().expect("lex should succeed in parser tests");
        Parser::new(tokens, source).parse_program()
    }

    #[test]
    fn parses_auto_declaration() {
        let program = parse("auto a = 2;").unwrap();
        assert!(matches!(&program[0], Statement::Declaration(d) if d.name == "a"));
    }

    #[test]
    fn parses_callable_with_body() {
        let program = parse("callable main() -> int { return 0; };").unwrap();
        match &program[0] {
            Statement::DeclarationCallable(decl) => {
                assert_eq!(decl.name, "main");
                assert!(decl.body.is_some());
            }
            other => panic!("expected callable declaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_forward_declaration_without_body() {
        let program = parse("callable helper(int x) -> int;").unwrap();
        match &program[0] {
            Statement::DeclarationCallable(decl) => assert!(decl.body.is_none()),
            other => panic!("expected forward declaration, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_statement_with_mixed_args() {
        let program = parse("print(1, name = 2);").unwrap();
        match &program[0] {
            Statement::Call(call) => {
                assert_eq!(call.positional_args.len(), 1);
                assert_eq!(call.keyword_args.len(), 1);
                assert_eq!(call.keyword_args[0].0, "name");
                assert!(matches!(
                    &call.keyword_args[0].1,
                    Expression::Literal(lit) if lit.value == LiteralValue::Integer(2)
                ));
            }
            other => panic!("expected call statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_else() {
        let program = parse("if (1) { return 1; } else { return 0; };").unwrap();
        assert!(matches!(&program[0], Statement::If(_)));
    }

    #[test]
    fn parses_for_loop() {
        let program = parse("for (auto i = 0; i < 10; i:++) { print(i); };").unwrap();
        assert!(matches!(&program[0], Statement::For(_)));
    }

    #[test]
    fn parses_try_except_finally() {
        let program = parse("try { auto a = 1; } except Exception as e { print(e); } finally { print(\"done\"); };").unwrap();
        match &program[0] {
            Statement::Try(try_stmt) => {
                assert_eq!(try_stmt.handlers.len(), 1);
                assert!(try_stmt.finally_body.is_some());
            }
            other => panic!("expected try statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_pre_and_post_increment() {
        let program = parse("auto a = 1; ++:a; a:++;").unwrap();
        assert!(matches!(&program[1], Statement::Expr(s) if matches!(&s.expr, Expression::UnaryOp(op) if op.op == UnaryOpKind::PreIncrement)));
        assert!(matches!(&program[2], Statement::Expr(s) if matches!(&s.expr, Expression::UnaryOp(op) if op.op == UnaryOpKind::PostIncrement)));
    }

    #[test]
    fn bare_postfix_colon_is_a_noop() {
        let program = parse("auto a = 1; a:;").unwrap();
        assert!(matches!(&program[1], Statement::Expr(s) if matches!(&s.expr, Expression::Identifier(_))));
    }

    #[test]
    fn parses_from_import_wildcard() {
        let program = parse("from std.io import *;").unwrap();
        match &program[0] {
            Statement::FromImport(node) => {
                assert_eq!(node.module_path, "std.io");
                assert!(matches!(node.names, FromImportNames::Wildcard));
            }
            other => panic!("expected from-import, got {other:?}"),
        }
    }

    #[test]
    fn parses_map_literal() {
        let program = parse(r#"auto m = {"a": 1, "b": 2};"#).unwrap();
        match &program[0] {
            Statement::Declaration(decl) => {
                assert!(matches!(&decl.initializer, Expression::Map(m) if m.entries.len() == 2));
            }
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn assignment_binds_looser_than_or() {
        let program = parse("auto a = 1; a = 1 or 0;").unwrap();
        assert!(matches!(&program[1], Statement::Expr(s) if matches!(&s.expr, Expression::Assign(_))));
    }

    #[test]
    fn get_attr_chains_before_call() {
        let program = parse("import std.io as io; io.print(\"x\");").unwrap();
        match &program[1] {
            Statement::Call(call) => assert!(matches!(&*call.callee, Expression::GetAttr(_))),
            other => panic!("expected call statement, got {other:?}"),
        }
    }

    #[test]
    fn reports_caret_excerpt_on_error() {
        let err = parse("auto a = ;").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains('^'));
    }
}
