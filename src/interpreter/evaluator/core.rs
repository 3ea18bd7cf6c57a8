use logos::Logos;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        evaluator::{frame::Frame, literal::resolve_literal},
        lexer::{Declaration, DeclarationKind, LexerExtras, Token},
        registry::core::CallRegistry,
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or an `Error`
/// carrying the line it was raised on.
pub type EvalResult<T> = Result<T, Error>;

/// The variables bound by assignments in a document.
///
/// Later assignments overwrite earlier ones; there is a single scope per
/// document.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    variables: FxHashMap<String, Value>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Binds `name` to `value`, returning the previous binding.
    pub fn set(&mut self, name: &str, value: Value) -> Option<Value> {
        self.variables.insert(name.to_string(), value)
    }

    /// The number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Everything a reduction can reach outside the reducer.
///
/// Implemented by `Session` for real documents and by recording mocks in
/// tests, so the reduction order can be checked without a registry.
pub trait Scope {
    /// Returns the value bound to `name`.
    fn lookup(&self, name: &str) -> Option<Value>;
    /// Binds `name` to `value`.
    fn assign(&mut self, name: &str, value: Value);
    /// Handles an `import` statement.
    ///
    /// # Errors
    /// Returns the registry error if the import is rejected.
    fn import(&mut self, name: &str) -> Result<(), RuntimeError>;
    /// Handles a `constructor`, `static` or `virtual` declaration.
    ///
    /// # Errors
    /// Returns the registry error if the registration is rejected.
    fn declare(&mut self, declaration: &Declaration) -> Result<(), RuntimeError>;
    /// Handles `new T(args)`.
    ///
    /// # Errors
    /// Returns the registry error if no constructor accepts `args`.
    fn construct(&mut self, type_name: &str, args: &[Value]) -> Result<Value, RuntimeError>;
    /// Handles `receiver.name(args)`.
    ///
    /// # Errors
    /// Returns the registry error if no operation accepts the arguments.
    fn call(&mut self, name: &str, receiver: &Value, args: &[Value])
            -> Result<Value, RuntimeError>;
}

/// The scope of a document: its registry and its environment.
#[derive(Debug)]
pub struct Session<'a> {
    /// The document's call registry.
    pub registry:    &'a mut CallRegistry,
    /// The document's variables.
    pub environment: &'a mut Environment,
}

impl Scope for Session<'_> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.environment.get(name).cloned()
    }

    fn assign(&mut self, name: &str, value: Value) {
        debug!(variable = name, value = %value, "assigned");
        self.environment.set(name, value);
    }

    fn import(&mut self, name: &str) -> Result<(), RuntimeError> {
        self.registry.import_type(name).map(|_| ())
    }

    fn declare(&mut self, declaration: &Declaration) -> Result<(), RuntimeError> {
        let Declaration { kind,
                          type_name,
                          operation,
                          params,
                          narrowed, } = declaration;
        let narrowed = narrowed.as_deref();

        let registered = match (kind, operation.as_deref()) {
            (DeclarationKind::Static, Some(op)) => {
                self.registry.register_static(type_name, op, params, narrowed)
            },
            (DeclarationKind::Virtual, Some(op)) => {
                self.registry.register_virtual(type_name, op, params, narrowed)
            },
            _ => self.registry.register_constructor(type_name, params, narrowed),
        };

        registered.map(|_| ())
    }

    fn construct(&mut self, type_name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        self.registry.invoke(type_name, None, args)
    }

    /// Invokes the virtual operation `name` on the receiver's runtime type
    /// with the receiver as the first argument. If that fails, the receiver's
    /// printed form is tried as a type name for a static operation taking the
    /// explicit arguments only, which is how `Math.max(..)` is reached.
    fn call(&mut self,
            name: &str,
            receiver: &Value,
            args: &[Value])
            -> Result<Value, RuntimeError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(receiver.clone());
        full.extend_from_slice(args);

        let primary = match self.registry.invoke_virtual(receiver.type_name(), name, &full) {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let key = receiver.to_string();
        debug!(operation = name, receiver = %key, %primary, "retrying with receiver as type name");

        match self.registry.invoke_static(&key, name, args) {
            Err(RuntimeError::UnresolvableType { .. }) => Err(primary),
            result => result,
        }
    }
}

/// The shift-reduce engine for code lines.
///
/// Tokens are shifted one at a time. Text accumulates into a literal frame;
/// `+`, `,`, `)` and line ends are the boundaries at which a pending operand
/// is resolved and reduced into the frame below it.
#[derive(Debug, Default)]
pub struct Reducer {
    stack: Vec<Frame>,
}

impl Reducer {
    /// Creates a reducer with an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no expression is open.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.stack.is_empty()
    }

    /// Shifts one token.
    ///
    /// # Errors
    /// Returns a parse error if the token is not allowed here, or the
    /// registry error of a call the token completed.
    pub fn shift<S: Scope>(&mut self, token: Token, line: usize, scope: &mut S) -> EvalResult<()> {
        match token {
            Token::Word(text) | Token::Char(text) | Token::Quoted(text) => {
                self.push_text(&text, line)
            },
            Token::Space(text) => {
                match self.stack.last_mut() {
                    Some(Frame::Literal(buffer)) => buffer.push_str(&text),
                    Some(Frame::Computed(_)) => {},
                    _ => self.stack.push(Frame::Literal(text)),
                }
                Ok(())
            },
            Token::Plus => self.plus(line, scope),
            Token::Comma => self.comma(line, scope),
            Token::Close => self.close(line, scope),
            Token::Assign(name) => {
                self.expect_no_operand(&format!("{name} ="), line)?;
                self.stack.push(Frame::Assignment { name });
                Ok(())
            },
            Token::New(type_name) => {
                self.expect_no_operand(&format!("new {type_name}("), line)?;
                self.stack.push(Frame::Constructor { type_name,
                                                     args: Vec::new() });
                Ok(())
            },
            Token::Call(name) => {
                let receiver =
                    self.take_operand(scope).ok_or(ParseError::MissingValue { line })?;
                self.stack.push(Frame::Call { name,
                                              receiver,
                                              args: Vec::new() });
                Ok(())
            },
            Token::Import(name) => {
                self.expect_idle(&format!("import {name}"), line)?;
                scope.import(&name).map_err(|e| Error::runtime(e, line))
            },
            Token::Declaration(declaration) => {
                self.expect_idle(&declaration.type_name, line)?;
                scope.declare(&declaration).map_err(|e| Error::runtime(e, line))
            },
            Token::NewLine => self.close_line(line, scope).map(|_| ()),
        }
    }

    /// Closes every open sub-expression at the end of a line.
    ///
    /// Open calls are invoked with the arguments collected so far and
    /// pending assignments are bound.
    ///
    /// # Returns
    /// The value of the last expression on the line, if it produced one.
    ///
    /// # Errors
    /// Returns `ParseError::MissingValue` for an assignment or addition
    /// without a right-hand side, or the registry error of a call.
    pub fn close_line<S: Scope>(&mut self, line: usize, scope: &mut S) -> EvalResult<Option<Value>> {
        loop {
            let operand = self.finish_operand(line, scope)?;

            match self.stack.pop() {
                Some(mut frame @ (Frame::Call { .. } | Frame::Constructor { .. })) => {
                    if let Some(arg) = operand {
                        push_arg(&mut frame, arg);
                    }
                    let value = invoke(frame, line, scope)?;
                    self.stack.push(Frame::Computed(value));
                },
                Some(Frame::Assignment { name }) => {
                    let value = operand.ok_or(ParseError::MissingValue { line })?;
                    scope.assign(&name, value.clone());
                    self.stack.push(Frame::Computed(value));
                },
                Some(frame) => {
                    self.stack.clear();
                    return Err(ParseError::UnexpectedToken { token: format!("{frame:?}"),
                                                             line }.into());
                },
                None => return Ok(operand),
            }
        }
    }

    fn push_text(&mut self, text: &str, line: usize) -> EvalResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Literal(buffer)) => buffer.push_str(text),
            Some(Frame::Computed(_)) => {
                return Err(ParseError::UnexpectedToken { token: text.to_string(),
                                                         line }.into());
            },
            _ => self.stack.push(Frame::Literal(text.to_string())),
        }
        Ok(())
    }

    fn plus<S: Scope>(&mut self, line: usize, scope: &mut S) -> EvalResult<()> {
        match self.take_operand(scope) {
            Some(left) => {
                let left = self.fold(left, line)?;
                self.stack.push(Frame::Addition { left });
                Ok(())
            },
            None => self.push_text("+", line),
        }
    }

    fn comma<S: Scope>(&mut self, line: usize, scope: &mut S) -> EvalResult<()> {
        if !self.in_call() {
            return self.push_text(",", line);
        }

        let arg = self.finish_operand(line, scope)?
                      .ok_or(ParseError::EmptyArgument { line })?;
        if let Some(frame) = self.stack.last_mut() {
            push_arg(frame, arg);
        }
        Ok(())
    }

    fn close<S: Scope>(&mut self, line: usize, scope: &mut S) -> EvalResult<()> {
        if !self.in_call() {
            return self.push_text(")", line);
        }

        let arg = self.finish_operand(line, scope)?;
        let Some(mut frame) = self.stack.pop() else {
            return Ok(());
        };
        match arg {
            Some(arg) => push_arg(&mut frame, arg),
            None if has_args(&frame) => return Err(ParseError::EmptyArgument { line }.into()),
            None => {},
        }

        let value = invoke(frame, line, scope)?;
        self.stack.push(Frame::Computed(value));
        Ok(())
    }

    /// Returns `true` if the innermost open container is a call.
    fn in_call(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|frame| !frame.is_operand() && !matches!(frame, Frame::Addition { .. }))
            .is_some_and(Frame::is_call)
    }

    /// Pops the pending operand, resolving literal text.
    fn take_operand<S: Scope>(&mut self, scope: &S) -> Option<Value> {
        match self.stack.pop() {
            Some(Frame::Literal(text)) => resolve_literal(&text, |name| scope.lookup(name)),
            Some(Frame::Computed(value)) => Some(value),
            Some(frame) => {
                self.stack.push(frame);
                None
            },
            None => None,
        }
    }

    /// Takes the pending operand and folds it into any pending additions.
    fn finish_operand<S: Scope>(&mut self, line: usize, scope: &S) -> EvalResult<Option<Value>> {
        match self.take_operand(scope) {
            Some(value) => self.fold(value, line).map(Some),
            None if matches!(self.stack.last(), Some(Frame::Addition { .. })) => {
                Err(ParseError::MissingValue { line }.into())
            },
            None => Ok(None),
        }
    }

    /// Applies pending additions left to right.
    fn fold(&mut self, mut right: Value, line: usize) -> EvalResult<Value> {
        while let Some(Frame::Addition { .. }) = self.stack.last() {
            if let Some(Frame::Addition { left }) = self.stack.pop() {
                right = left.add(&right).map_err(|e| Error::runtime(e, line))?;
            }
        }
        Ok(right)
    }

    fn expect_no_operand(&mut self, token: &str, line: usize) -> EvalResult<()> {
        match self.stack.last() {
            Some(Frame::Literal(text)) if text.trim().is_empty() => {
                self.stack.pop();
                Ok(())
            },
            Some(frame) if frame.is_operand() => {
                Err(ParseError::UnexpectedToken { token: token.to_string(),
                                                  line }.into())
            },
            _ => Ok(()),
        }
    }

    fn expect_idle(&mut self, token: &str, line: usize) -> EvalResult<()> {
        self.expect_no_operand(token, line)?;
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken { token: token.to_string(),
                                              line }.into())
        }
    }
}

fn push_arg(frame: &mut Frame, arg: Value) {
    if let Frame::Call { args, .. } | Frame::Constructor { args, .. } = frame {
        args.push(arg);
    }
}

fn has_args(frame: &Frame) -> bool {
    matches!(frame, Frame::Call { args, .. } | Frame::Constructor { args, .. } if !args.is_empty())
}

fn invoke<S: Scope>(frame: Frame, line: usize, scope: &mut S) -> EvalResult<Value> {
    let result = match frame {
        Frame::Call { name,
                      receiver,
                      args, } => scope.call(&name, &receiver, &args),
        Frame::Constructor { type_name, args } => scope.construct(&type_name, &args),
        other => {
            return Err(ParseError::UnexpectedToken { token: format!("{other:?}"),
                                                     line }.into());
        },
    };

    result.map_err(|e| Error::runtime(e, line))
}

/// Evaluates a block of code.
///
/// `first_line` is the document line the block starts on and is used for
/// error positions.
///
/// # Returns
/// The value of the last line that produced one.
///
/// # Errors
/// Returns the first parse or runtime error; evaluation stops there.
///
/// # Example
/// ```
/// use interplay::{
///     config::InterpreterConfig,
///     interpreter::{
///         evaluator::core::{Environment, Session, evaluate},
///         registry::core::CallRegistry,
///         value::core::Value,
///     },
/// };
///
/// let mut registry = CallRegistry::new(interplay::builtins::catalog().unwrap(),
///                                      &InterpreterConfig::default().implicit_packages);
/// let mut environment = Environment::new();
/// let mut session = Session { registry:    &mut registry,
///                             environment: &mut environment, };
///
/// evaluate("x = 3 + 4", 1, &mut session).unwrap();
/// assert_eq!(environment.get("x"), Some(&Value::Int(7)));
/// ```
pub fn evaluate<S: Scope>(source: &str, first_line: usize, scope: &mut S) -> EvalResult<Option<Value>> {
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: first_line });
    let mut reducer = Reducer::new();
    let mut last = None;

    loop {
        let line = lexer.extras.line;
        let Some(token) = lexer.next() else {
            break;
        };
        let token = token.map_err(|()| ParseError::UnexpectedToken { token:
                                                                         lexer.slice()
                                                                              .to_string(),
                                                                     line })?;

        if token == Token::NewLine {
            if let Some(value) = reducer.close_line(line, scope)? {
                last = Some(value);
            }
        } else {
            reducer.shift(token, line, scope)?;
        }
    }

    if let Some(value) = reducer.close_line(lexer.extras.line, scope)? {
        last = Some(value);
    }

    Ok(last)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Records every reduction instead of touching a registry.
    #[derive(Default)]
    struct Recorder {
        variables: FxHashMap<String, Value>,
        log:       Vec<String>,
    }

    fn join(args: &[Value]) -> String {
        args.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }

    impl Scope for Recorder {
        fn lookup(&self, name: &str) -> Option<Value> {
            self.variables.get(name).cloned()
        }

        fn assign(&mut self, name: &str, value: Value) {
            self.variables.insert(name.to_string(), value);
        }

        fn import(&mut self, name: &str) -> Result<(), RuntimeError> {
            self.log.push(format!("import {name}"));
            Ok(())
        }

        fn declare(&mut self, declaration: &Declaration) -> Result<(), RuntimeError> {
            self.log.push(format!("declare {}{}", declaration.type_name, declaration.params));
            Ok(())
        }

        fn construct(&mut self, type_name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
            self.log.push(format!("new {type_name}({})", join(args)));
            Ok(Value::from(format!("<{type_name}>")))
        }

        fn call(&mut self,
                name: &str,
                receiver: &Value,
                args: &[Value])
                -> Result<Value, RuntimeError> {
            self.log.push(format!("{receiver}.{name}({})", join(args)));
            if name == "fail" {
                return Err(RuntimeError::NoHandle { type_name: receiver.type_name().to_string(),
                                                    operation: name.to_string(), });
            }
            Ok(Value::from(format!("{receiver}.{name}")))
        }
    }

    fn run(source: &str) -> (Recorder, EvalResult<Option<Value>>) {
        let mut recorder = Recorder::default();
        let result = evaluate(source, 1, &mut recorder);
        (recorder, result)
    }

    #[test]
    fn assignment_of_addition() {
        let (recorder, result) = run("x = 3 + 4");

        assert!(result.is_ok());
        assert_eq!(recorder.variables.get("x"), Some(&Value::Int(7)));
    }

    #[test]
    fn addition_folds_left_to_right() {
        let (recorder, _) = run("y = 1 + 2 + \"a\"");
        assert_eq!(recorder.variables.get("y"), Some(&Value::from("3a")));

        let (recorder, _) = run("y = \"a\" + 1 + 2");
        assert_eq!(recorder.variables.get("y"), Some(&Value::from("a12")));
    }

    #[test]
    fn constructor_then_chained_call() {
        let (recorder, result) = run("z = new List(1, \"a,b\").size()");

        assert!(result.is_ok());
        assert_eq!(recorder.log, vec!["new List(1, a,b)", "<List>.size()"]);
        assert_eq!(recorder.variables.get("z"), Some(&Value::from("<List>.size")));
    }

    #[test]
    fn nested_calls_are_reduced_innermost_first() {
        let (recorder, _) = run("a.f(b.g(1), 2)");

        assert_eq!(recorder.log, vec!["b.g(1)", "a.f(b.g, 2)"]);
    }

    #[test]
    fn bound_receiver_is_substituted() {
        let mut recorder = Recorder::default();
        recorder.variables.insert("list".to_string(), Value::Int(5));

        evaluate("list.add(list)", 1, &mut recorder).unwrap();

        assert_eq!(recorder.log, vec!["5.add(5)"]);
    }

    #[test]
    fn open_call_is_closed_at_line_end() {
        let (recorder, _) = run("a.f(1\nb.g(");

        assert_eq!(recorder.log, vec!["a.f(1)", "b.g()"]);
    }

    #[test]
    fn statements_are_passed_to_the_scope() {
        let (recorder, result) = run("import java.util.List\nconstructor List()");

        assert!(result.is_ok());
        assert_eq!(recorder.log, vec!["import java.util.List", "declare List()"]);
    }

    #[test]
    fn comma_and_bracket_outside_calls_are_text() {
        let (recorder, _) = run("x = a, b)");

        assert_eq!(recorder.variables.get("x"), Some(&Value::from("a, b)")));
    }

    #[test]
    fn plus_without_left_operand_is_text() {
        let (recorder, _) = run("x = + 1");

        assert_eq!(recorder.variables.get("x"), Some(&Value::from("+ 1")));
    }

    #[test]
    fn empty_argument_is_rejected() {
        let (_, result) = run("a.f(1, )");

        assert!(matches!(result, Err(Error::Parse(ParseError::EmptyArgument { line: 1 }))));
    }

    #[test]
    fn call_without_receiver_is_rejected() {
        let (_, result) = run("x = .f()");

        assert!(matches!(result, Err(Error::Parse(ParseError::MissingValue { line: 1 }))));
    }

    #[test]
    fn dangling_plus_is_rejected() {
        let (_, result) = run("x = 3 +");

        assert!(matches!(result, Err(Error::Parse(ParseError::MissingValue { line: 1 }))));
    }

    #[test]
    fn text_after_a_computed_value_is_rejected() {
        let (_, result) = run("\n\nnew A() b");

        assert!(matches!(result, Err(Error::Parse(ParseError::UnexpectedToken { line: 3, .. }))));
    }

    #[test]
    fn import_must_start_a_statement() {
        let (_, result) = run("a import b.C");

        assert!(matches!(result, Err(Error::Parse(ParseError::UnexpectedToken { .. }))));
    }

    #[test]
    fn scope_errors_carry_the_line() {
        let (_, result) = run("a.ok()\na.fail()");

        let Err(error) = result else {
            panic!("expected failure");
        };
        assert!(matches!(error, Error::Runtime { line: 2, .. }));
    }
}
