mod error;
mod signal;

pub use error::{RuntimeError, RuntimeResult};
pub use signal::ControlFlow;

use std::rc::Rc;

use log::{debug, trace};

use error::AtPosition;

use crate::ast::*;
use crate::callable::Callable;
use crate::environment::Environment;
use crate::host::{HostError, HostExport, HostRegistry, OutputSink};
use crate::lexer::Position;
use crate::value::Value;

/// Walks an AST, driving control flow via [`ControlFlow`] signals and
/// resolving names through an [`Environment`].
pub struct Evaluator {
    globals: Rc<Environment>,
    host: HostRegistry,
}

impl Evaluator {
    /// Builds a fresh evaluator with `print`/`input` already bound into the
    /// global scope, mirroring `original_source`'s interpreter registering
    /// the stdio module at startup rather than requiring every program to
    /// import it explicitly.
    pub fn new(out: OutputSink) -> Self {
        let globals = Environment::root();
        let host = HostRegistry::new(out);
        if let Ok(io) = host.resolve("std.io") {
            for name in io.public_names() {
                if let Some(HostExport::Function(f)) = io.get(&name) {
                    globals.define_var(name, Value::HostFunction(f));
                }
            }
        }
        Evaluator { globals, host }
    }

    /// Runs a full program: imports, then callable declarations, then
    /// either `main()` or the remaining top-level statements in source
    /// order. This ordering is load-bearing — top-level code may refer to
    /// callables declared later in the file.
    pub fn run_program(&self, program: &Program) -> RuntimeResult<Value> {
        for stmt in program {
            if matches!(stmt, Statement::Import(_) | Statement::FromImport(_)) {
                self.eval_statement(stmt, &self.globals)?;
            }
        }

        let mut has_main = false;
        for stmt in program {
            if let Statement::DeclarationCallable(decl) = stmt {
                self.eval_statement(stmt, &self.globals)?;
                if decl.name == "main" {
                    has_main = true;
                }
            }
        }

        if has_main {
            // Top-level declarations still run when `main` is present — only
            // other top-level statements are suppressed (spec §8: programs
            // like scenario 2 rely on top-level `int x = 10;` being bound
            // before `main` reads it).
            for stmt in program {
                if let Statement::Declaration(_) = stmt {
                    self.eval_statement(stmt, &self.globals)?;
                }
            }
            let main_fn = self.globals.get_func("main").map_err(|e| e.at(Position::default()))?;
            return self.invoke_user_function(&main_fn, vec![], vec![], Position::default());
        }

        for stmt in program {
            if matches!(stmt, Statement::Import(_) | Statement::FromImport(_) | Statement::DeclarationCallable(_)) {
                continue;
            }
            match self.eval_statement(stmt, &self.globals)? {
                ControlFlow::Return(value) => return Ok(value),
                ControlFlow::Break | ControlFlow::Continue => {
                    return Err(RuntimeError::new("'break'/'continue' outside of a loop", stmt.position()))
                }
                ControlFlow::Normal(_) => {}
            }
        }
        Ok(Value::Unit)
    }

    fn exec_block(&self, body: &[Statement], env: &Rc<Environment>) -> RuntimeResult<ControlFlow> {
        for stmt in body {
            let signal = self.eval_statement(stmt, env)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
        }
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn eval_statement(&self, stmt: &Statement, env: &Rc<Environment>) -> RuntimeResult<ControlFlow> {
        match stmt {
            Statement::Declaration(decl) => {
                let value = self.eval_expr(&decl.initializer, env)?;
                env.define_var(decl.name.clone(), value);
                Ok(ControlFlow::Normal(Value::Unit))
            }
            Statement::DeclarationCallable(decl) => {
                if let Some(body) = &decl.body {
                    let callable = Rc::new(Callable::new(
                        decl.name.clone(),
                        decl.params.clone(),
                        body.clone(),
                        Rc::clone(env),
                    ));
                    env.define_func(decl.name.clone(), callable);
                }
                Ok(ControlFlow::Normal(Value::Unit))
            }
            Statement::Call(call) => {
                let value = self.eval_call(call, env)?;
                Ok(ControlFlow::Normal(value))
            }
            Statement::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr, env)?,
                    None => Value::Unit,
                };
                Ok(ControlFlow::Return(value))
            }
            Statement::If(if_stmt) => {
                if self.eval_expr(&if_stmt.condition, env)?.is_truthy() {
                    self.exec_block(&if_stmt.then_body, env)
                } else if let Some(else_body) = &if_stmt.else_body {
                    self.exec_block(else_body, env)
                } else {
                    Ok(ControlFlow::Normal(Value::Unit))
                }
            }
            Statement::While(while_stmt) => self.eval_while(while_stmt, env),
            Statement::For(for_stmt) => self.eval_for(for_stmt, env),
            Statement::Try(try_stmt) => self.eval_try(try_stmt, env),
            Statement::Break(_) => Ok(ControlFlow::Break),
            Statement::Continue(_) => Ok(ControlFlow::Continue),
            Statement::Import(import) => {
                for entry in &import.entries {
                    trace!("resolving import '{}'", entry.module_path);
                    let module = self
                        .host
                        .resolve(&entry.module_path)
                        .map_err(|e| e.at(import.position))?;
                    let alias = entry
                        .alias
                        .clone()
                        .unwrap_or_else(|| entry.module_path.rsplit('.').next().unwrap().to_string());
                    debug!("bound module '{}' as '{alias}'", entry.module_path);
                    env.define_module(alias, module);
                }
                Ok(ControlFlow::Normal(Value::Unit))
            }
            Statement::FromImport(from_import) => {
                self.eval_from_import(from_import, env)?;
                Ok(ControlFlow::Normal(Value::Unit))
            }
            Statement::Expr(expr_stmt) => {
                let value = self.eval_expr(&expr_stmt.expr, env)?;
                Ok(ControlFlow::Normal(value))
            }
        }
    }

    fn eval_while(&self, node: &While, env: &Rc<Environment>) -> RuntimeResult<ControlFlow> {
        while self.eval_expr(&node.condition, env)?.is_truthy() {
            match self.exec_block(&node.body, env)? {
                ControlFlow::Break => break,
                ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                ControlFlow::Continue | ControlFlow::Normal(_) => {}
            }
        }
        Ok(ControlFlow::Normal(Value::Unit))
    }

    fn eval_for(&self, node: &For, env: &Rc<Environment>) -> RuntimeResult<ControlFlow> {
        self.eval_statement(&node.init, env)?;
        while self.eval_expr(&node.condition, env)?.is_truthy() {
            match self.exec_block(&node.body, env)? {
                ControlFlow::Break => break,
                ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                ControlFlow::Continue | ControlFlow::Normal(_) => {}
            }
            self.eval_expr(&node.update, env)?;
        }
        Ok(ControlFlow::Normal(Value::Unit))
    }

    /// Handler bodies run in a child scope (spec: handler bodies, like
    /// function bodies, get a fresh scope). Whatever the body/handler
    /// outcome was is suspended while `finally` runs; if `finally`
    /// completes normally the suspended outcome is re-emitted, otherwise
    /// `finally`'s own outcome wins.
    fn eval_try(&self, node: &Try, env: &Rc<Environment>) -> RuntimeResult<ControlFlow> {
        let mut outcome = match self.exec_block(&node.body, env) {
            Ok(signal) => Ok(signal),
            Err(err) => {
                let mut handled = None;
                for handler in &node.handlers {
                    if handler.exception_name == "Exception" || handler.exception_name == "RuntimeError" {
                        let handler_env = Environment::child(env);
                        handler_env.define_var(handler.bind_name.clone(), Value::Str(err.message.clone()));
                        handled = Some(self.exec_block(&handler.body, &handler_env));
                        break;
                    }
                }
                handled.unwrap_or(Err(err))
            }
        };

        if let Some(finally_body) = &node.finally_body {
            match self.exec_block(finally_body, env) {
                Ok(ControlFlow::Normal(_)) => {}
                Ok(overriding_signal) => outcome = Ok(overriding_signal),
                Err(finally_err) => outcome = Err(finally_err),
            }
        }

        outcome
    }

    fn eval_from_import(&self, node: &FromImport, env: &Rc<Environment>) -> RuntimeResult<()> {
        trace!("resolving from-import '{}'", node.module_path);
        let module = self.host.resolve(&node.module_path).map_err(|e| e.at(node.position))?;
        let names: Vec<(String, Option<String>)> = match &node.names {
            FromImportNames::Wildcard => module.public_names().into_iter().map(|n| (n, None)).collect(),
            FromImportNames::Names(names) => names.clone(),
        };
        for (name, alias) in names {
            let export = module
                .get(&name)
                .ok_or_else(|| RuntimeError::new(format!("module '{}' has no export '{name}'", node.module_path), node.position))?;
            let bound_name = alias.unwrap_or(name);
            debug!("binding '{}' from '{}' as '{bound_name}'", name, node.module_path);
            match export {
                HostExport::Function(func) => env.define_var(bound_name, Value::HostFunction(func)),
                HostExport::Value(value) => env.define_var(bound_name, value),
            }
        }
        Ok(())
    }

    fn eval_expr(&self, expr: &Expression, env: &Rc<Environment>) -> RuntimeResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(match &lit.value {
                LiteralValue::Integer(n) => Value::Integer(*n),
                LiteralValue::Float(f) => Value::Float(*f),
                LiteralValue::Str(s) => Value::Str(s.clone()),
                LiteralValue::Char(c) => Value::Char(*c),
                LiteralValue::Bool(b) => Value::Boolean(*b),
            }),
            Expression::Identifier(id) => env.get_var(&id.name).map_err(|e| e.at(id.position)),
            Expression::Assign(assign) => {
                let value = self.eval_expr(&assign.value, env)?;
                env.set_var(&assign.name, value.clone()).map_err(|e| e.at(assign.position))?;
                Ok(value)
            }
            Expression::Binary(binary) => self.eval_binary(binary, env),
            Expression::Logic(logic) => self.eval_logic(logic, env),
            Expression::UnaryLogic(not_expr) => {
                let operand = self.eval_expr(&not_expr.operand, env)?;
                Ok(Value::Boolean(!operand.is_truthy()))
            }
            Expression::UnaryOp(op) => self.eval_unary_op(op, env),
            Expression::Call(call) => self.eval_call(call, env),
            Expression::GetAttr(get_attr) => self.eval_get_attr(get_attr, env),
            Expression::Array(array) => {
                let mut items = Vec::with_capacity(array.elements.len());
                for elem in &array.elements {
                    items.push(self.eval_expr(elem, env)?);
                }
                Ok(Value::Array(Rc::new(std::cell::RefCell::new(items))))
            }
            Expression::Tuple(tuple) => {
                let mut items = Vec::with_capacity(tuple.elements.len());
                for elem in &tuple.elements {
                    items.push(self.eval_expr(elem, env)?);
                }
                Ok(Value::Tuple(Rc::new(items)))
            }
            Expression::Map(map) => {
                let mut entries = indexmap::IndexMap::new();
                for (key_expr, value_expr) in &map.entries {
                    let key = self.eval_expr(key_expr, env)?;
                    let value = self.eval_expr(value_expr, env)?;
                    let hashable = key
                        .as_hashable()
                        .ok_or_else(|| RuntimeError::new(format!("value of type '{}' cannot be a map key", key.type_name()), key_expr.position()))?;
                    entries.insert(hashable, value);
                }
                Ok(Value::Map(Rc::new(std::cell::RefCell::new(entries))))
            }
        }
    }

    fn eval_unary_op(&self, op: &UnaryOp, env: &Rc<Environment>) -> RuntimeResult<Value> {
        let current = env.get_var(&op.target).map_err(|e| e.at(op.position))?;
        let delta = match op.op {
            UnaryOpKind::PreIncrement | UnaryOpKind::PostIncrement => 1,
            UnaryOpKind::PreDecrement | UnaryOpKind::PostDecrement => -1,
        };
        let updated = match &current {
            Value::Integer(n) => Value::Integer(n + delta as i64),
            Value::Float(f) => Value::Float(f + delta as f64),
            other => {
                return Err(RuntimeError::new(
                    format!("cannot increment/decrement a value of type '{}'", other.type_name()),
                    op.position,
                ))
            }
        };
        env.set_var(&op.target, updated.clone()).map_err(|e| e.at(op.position))?;
        match op.op {
            UnaryOpKind::PreIncrement | UnaryOpKind::PreDecrement => Ok(updated),
            UnaryOpKind::PostIncrement | UnaryOpKind::PostDecrement => Ok(current),
        }
    }

    fn eval_logic(&self, logic: &Logic, env: &Rc<Environment>) -> RuntimeResult<Value> {
        let left = self.eval_expr(&logic.left, env)?;
        match logic.op {
            LogicOperator::Or if left.is_truthy() => Ok(left),
            LogicOperator::Or => self.eval_expr(&logic.right, env),
            LogicOperator::And if !left.is_truthy() => Ok(left),
            LogicOperator::And => self.eval_expr(&logic.right, env),
        }
    }

    fn eval_binary(&self, binary: &Binary, env: &Rc<Environment>) -> RuntimeResult<Value> {
        let left = self.eval_expr(&binary.left, env)?;
        let right = self.eval_expr(&binary.right, env)?;
        numeric_or_string_op(binary.op, left, right, binary.position)
    }

    fn eval_call(&self, call: &Call, env: &Rc<Environment>) -> RuntimeResult<Value> {
        let mut positional = Vec::with_capacity(call.positional_args.len());
        for arg in &call.positional_args {
            positional.push(self.eval_expr(arg, env)?);
        }
        let mut keyword = Vec::with_capacity(call.keyword_args.len());
        for (name, arg) in &call.keyword_args {
            keyword.push((name.clone(), self.eval_expr(arg, env)?));
        }

        match &*call.callee {
            Expression::Identifier(id) => {
                if let Ok(callable) = env.get_func(&id.name) {
                    return self.invoke_user_function(&callable, positional, keyword, call.position);
                }
                match env.get_var(&id.name) {
                    Ok(Value::HostFunction(func)) => func.call(positional, keyword).map_err(|e| e.at(call.position)),
                    Ok(Value::UserFunction(callable)) => self.invoke_user_function(&callable, positional, keyword, call.position),
                    Ok(other) => Err(RuntimeError::new(format!("value of type '{}' is not callable", other.type_name()), call.position)),
                    Err(_) => Err(RuntimeError::new(format!("'{}' is not defined", id.name), call.position)),
                }
            }
            Expression::GetAttr(get_attr) => {
                let module = self.eval_module(get_attr, env)?;
                match module.get(&get_attr.attribute) {
                    Some(HostExport::Function(func)) => func.call(positional, keyword).map_err(|e| e.at(call.position)),
                    Some(HostExport::Value(value)) => Err(RuntimeError::new(
                        format!("'{}' ({}) is not callable", get_attr.attribute, value.type_name()),
                        call.position,
                    )),
                    None => Err(RuntimeError::new(format!("module '{}' has no export '{}'", module.path(), get_attr.attribute), call.position)),
                }
            }
            other => Err(RuntimeError::new(format!("expression of kind '{other:?}' is not callable", ), call.position)),
        }
    }

    fn eval_get_attr(&self, get_attr: &GetAttr, env: &Rc<Environment>) -> RuntimeResult<Value> {
        let module = self.eval_module(get_attr, env)?;
        match module.get(&get_attr.attribute) {
            Some(HostExport::Function(func)) => Ok(Value::HostFunction(func)),
            Some(HostExport::Value(value)) => Ok(value),
            None => Err(RuntimeError::new(format!("module '{}' has no export '{}'", module.path(), get_attr.attribute), get_attr.position)),
        }
    }

    fn eval_module(&self, get_attr: &GetAttr, env: &Rc<Environment>) -> RuntimeResult<crate::host::HostModuleHandle> {
        match &*get_attr.object {
            Expression::Identifier(id) => env.get_module(&id.name).map_err(|e| e.at(get_attr.position)),
            other => {
                let value = self.eval_expr(other, env)?;
                match value {
                    Value::HostModule(handle) => Ok(handle),
                    other => Err(RuntimeError::new(format!("value of type '{}' has no attributes", other.type_name()), get_attr.position)),
                }
            }
        }
    }

    fn invoke_user_function(
        &self,
        callable: &Rc<Callable>,
        positional: Vec<Value>,
        keyword: Vec<(String, Value)>,
        position: Position,
    ) -> RuntimeResult<Value> {
        if positional.len() > callable.arity() {
            return Err(RuntimeError::new(
                format!(
                    "arity mismatch: '{}' takes {} argument(s), got {}",
                    callable.name,
                    callable.arity(),
                    positional.len() + keyword.len()
                ),
                position,
            ));
        }

        debug!("entering scope for call to '{}'", callable.name);
        let call_env = Environment::child(&callable.closure);
        let mut bound = vec![false; callable.params.len()];
        for (i, value) in positional.into_iter().enumerate() {
            call_env.define_var(callable.params[i].name.clone(), value);
            bound[i] = true;
        }
        for (name, value) in keyword {
            let Some(index) = callable.params.iter().position(|p| p.name == name) else {
                return Err(RuntimeError::new(format!("'{}' has no parameter named '{name}'", callable.name), position));
            };
            if bound[index] {
                return Err(RuntimeError::new(format!("argument '{name}' given both positionally and by keyword"), position));
            }
            call_env.define_var(name, value);
            bound[index] = true;
        }
        if let Some(missing) = bound.iter().position(|b| !b) {
            return Err(RuntimeError::new(
                format!("arity mismatch: '{}' is missing argument '{}'", callable.name, callable.params[missing].name),
                position,
            ));
        }

        let result = self.exec_block(&callable.body, &call_env)?;
        trace!("leaving scope for call to '{}'", callable.name);
        match result {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal(_) => Ok(Value::Unit),
            ControlFlow::Break | ControlFlow::Continue => {
                Err(RuntimeError::new("'break'/'continue' outside of a loop", position))
            }
        }
    }
}

fn floor_div_mod_i64(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

fn floor_mod_f64(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn numeric_or_string_op(op: BinaryOperator, left: Value, right: Value, position: Position) -> RuntimeResult<Value> {
    use BinaryOperator::*;

    if let (Add, Value::Str(a), Value::Str(b)) = (op, &left, &right) {
        return Ok(Value::Str(format!("{a}{b}")));
    }

    if matches!(op, Eq | Neq) {
        let equal = values_equal(&left, &right);
        return Ok(Value::Boolean(if matches!(op, Eq) { equal } else { !equal }));
    }

    match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => match op {
            Add => Ok(Value::Integer(a + b)),
            Sub => Ok(Value::Integer(a - b)),
            Mul => Ok(Value::Integer(a * b)),
            Div => {
                if *b == 0 {
                    Err(RuntimeError::new("division by zero", position))
                } else {
                    Ok(Value::Float(*a as f64 / *b as f64))
                }
            }
            Mod => {
                if *b == 0 {
                    Err(RuntimeError::new("modulo by zero", position))
                } else {
                    Ok(Value::Integer(floor_div_mod_i64(*a, *b)))
                }
            }
            Lt => Ok(Value::Boolean(a < b)),
            Gt => Ok(Value::Boolean(a > b)),
            Le => Ok(Value::Boolean(a <= b)),
            Ge => Ok(Value::Boolean(a >= b)),
            Eq | Neq => unreachable!("handled above"),
        },
        (Value::Float(_), _) | (_, Value::Float(_)) if is_numeric(&left) && is_numeric(&right) => {
            let a = as_f64(&left);
            let b = as_f64(&right);
            match op {
                Add => Ok(Value::Float(a + b)),
                Sub => Ok(Value::Float(a - b)),
                Mul => Ok(Value::Float(a * b)),
                Div => {
                    if b == 0.0 {
                        Err(RuntimeError::new("division by zero", position))
                    } else {
                        Ok(Value::Float(a / b))
                    }
                }
                Mod => {
                    if b == 0.0 {
                        Err(RuntimeError::new("modulo by zero", position))
                    } else {
                        Ok(Value::Float(floor_mod_f64(a, b)))
                    }
                }
                Lt => Ok(Value::Boolean(a < b)),
                Gt => Ok(Value::Boolean(a > b)),
                Le => Ok(Value::Boolean(a <= b)),
                Ge => Ok(Value::Boolean(a >= b)),
                Eq | Neq => unreachable!("handled above"),
            }
        }
        (Value::Str(a), Value::Str(b)) => match op {
            Lt => Ok(Value::Boolean(a < b)),
            Gt => Ok(Value::Boolean(a > b)),
            Le => Ok(Value::Boolean(a <= b)),
            Ge => Ok(Value::Boolean(a >= b)),
            _ => Err(RuntimeError::new(format!("operator not supported between two strings"), position)),
        },
        _ => Err(RuntimeError::new(
            format!("unsupported operand types '{}' and '{}' for this operator", left.type_name(), right.type_name()),
            position,
        )),
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Integer(_) | Value::Float(_))
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Integer(n) => *n as f64,
        Value::Float(f) => *f,
        _ => unreachable!("caller checked is_numeric"),
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => *a as f64 == *b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Char(a), Value::Char(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Unit, Value::Unit) => true,
        (Value::Tuple(a), Value::Tuple(b)) => a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y)),
        (Value::Array(a), Value::Array(b)) => {
            let a = a.borrow();
            let b = b.borrow();
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        _ => false,
    }
}
