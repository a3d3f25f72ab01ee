//! Sandboxed call-expression evaluator for the developer console.
//!
//! The language is deliberately tiny: string and number literals, calls to
//! host-registered functions, and `;` between statements.
//!
//! ```
//! use lumen_tools::{ScriptHost, Value};
//!
//! let mut host = ScriptHost::new();
//! host.register_fn("hello", |args| {
//!     let name = args.first().map(ToString::to_string).unwrap_or_default();
//!     Ok(Value::Str(format!("Hello {name}!")))
//! });
//! host.eval(r#"puts(hello("Bob"))"#).unwrap();
//! assert_eq!(host.take_output(), vec!["Hello Bob!".to_string()]);
//! ```

use std::collections::BTreeMap;

/// Longest accepted source text, in bytes.
const MAX_SOURCE_LEN: usize = 4096;
/// Deepest accepted call nesting.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("parse error at byte {pos}: {message}")]
    Parse { pos: usize, message: String },
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("{function}: {message}")]
    Host { function: String, message: String },
    #[error("script exceeds {0} bytes")]
    TooLong(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Str(String),
    Num(f64),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unit => Ok(()),
            Self::Str(s) => f.write_str(s),
            Self::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}

type HostFn = Box<dyn Fn(&[Value]) -> Result<Value, ScriptError>>;

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Str(String),
    Num(f64),
    Call { name: String, args: Vec<Expr> },
}

/// Holds registered host functions and the output written by `puts`.
#[derive(Default)]
pub struct ScriptHost {
    functions: BTreeMap<String, HostFn>,
    output: Vec<String>,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a host function.
    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&[Value]) -> Result<Value, ScriptError> + 'static,
    ) {
        self.functions.insert(name.into(), Box::new(f));
    }

    /// Registered names, plus the `puts` builtin.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.push("puts");
        names
    }

    /// Evaluate every statement; returns the last statement's value.
    pub fn eval(&mut self, source: &str) -> Result<Value, ScriptError> {
        if source.len() > MAX_SOURCE_LEN {
            return Err(ScriptError::TooLong(MAX_SOURCE_LEN));
        }
        let program = Parser::new(source).program()?;
        let mut last = Value::Unit;
        for expr in &program {
            last = self.eval_expr(expr)?;
        }
        Ok(last)
    }

    /// Lines written by `puts` since the last call.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, ScriptError> {
        match expr {
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Call { name, args } => {
                let args = args
                    .iter()
                    .map(|a| self.eval_expr(a))
                    .collect::<Result<Vec<_>, _>>()?;
                if name == "puts" {
                    let line = args
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ");
                    self.output.push(line);
                    return Ok(Value::Unit);
                }
                let f = self
                    .functions
                    .get(name)
                    .ok_or_else(|| ScriptError::UnknownFunction(name.clone()))?;
                f(&args)
            }
        }
    }
}

impl std::fmt::Debug for ScriptHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptHost")
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("pending_output", &self.output.len())
            .finish()
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::Parse {
            pos: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ScriptError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}', found end of input"))),
        }
    }

    fn program(&mut self) -> Result<Vec<Expr>, ScriptError> {
        let mut statements = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(';') => {
                    self.bump();
                }
                Some(_) => {
                    statements.push(self.expr(0)?);
                    self.skip_ws();
                    match self.peek() {
                        None => break,
                        Some(';') => {
                            self.bump();
                        }
                        Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
                    }
                }
            }
        }
        Ok(statements)
    }

    fn expr(&mut self, depth: usize) -> Result<Expr, ScriptError> {
        if depth > MAX_DEPTH {
            return Err(self.error("calls nested too deeply"));
        }
        self.skip_ws();
        match self.peek() {
            Some('"') => self.string(),
            Some(c) if c.is_ascii_digit() || c == '-' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.call(depth),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn string(&mut self) -> Result<Expr, ScriptError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(Expr::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('"' | '\\')) => out.push(c),
                    Some(c) => return Err(self.error(format!("unknown escape '\\{c}'"))),
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<Expr, ScriptError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.bump();
        }
        let text = &self.src[start..self.pos];
        text.parse::<f64>()
            .map(Expr::Num)
            .map_err(|_| self.error(format!("invalid number '{text}'")))
    }

    fn call(&mut self, depth: usize) -> Result<Expr, ScriptError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        let name = self.src[start..self.pos].to_string();
        self.expect('(')?;
        let mut args = Vec::new();
        self.skip_ws();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Expr::Call { name, args });
        }
        loop {
            args.push(self.expr(depth + 1)?);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(')') => break,
                Some(c) => return Err(self.error(format!("expected ',' or ')', found '{c}'"))),
                None => return Err(self.error("unterminated call")),
            }
        }
        Ok(Expr::Call { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> ScriptHost {
        let mut host = ScriptHost::new();
        host.register_fn("helloWorld", |args| match args {
            [Value::Str(name)] => Ok(Value::Str(format!("Hello {name}!"))),
            _ => Err(ScriptError::Host {
                function: "helloWorld".into(),
                message: "expected one string".into(),
            }),
        });
        host.register_fn("add", |args| {
            let mut sum = 0.0;
            for a in args {
                match a {
                    Value::Num(n) => sum += n,
                    other => {
                        return Err(ScriptError::Host {
                            function: "add".into(),
                            message: format!("not a number: {other:?}"),
                        });
                    }
                }
            }
            Ok(Value::Num(sum))
        });
        host
    }

    #[test]
    fn nested_call_and_puts() {
        let mut host = host();
        let v = host.eval(r#"puts(helloWorld("Bob"))"#).unwrap();
        assert_eq!(v, Value::Unit);
        assert_eq!(host.take_output(), vec!["Hello Bob!".to_string()]);
        assert!(host.take_output().is_empty());
    }

    #[test]
    fn statements_return_last_value() {
        let mut host = host();
        let v = host.eval("add(1, 2); add(add(1, 2), -0.5);").unwrap();
        assert_eq!(v, Value::Num(2.5));
    }

    #[test]
    fn number_display_drops_integral_fraction() {
        assert_eq!(Value::Num(3.0).to_string(), "3");
        assert_eq!(Value::Num(2.5).to_string(), "2.5");
        assert_eq!(Value::Unit.to_string(), "");
    }

    #[test]
    fn string_escapes() {
        let mut host = host();
        let v = host.eval(r#"helloWorld("a\"b")"#).unwrap();
        assert_eq!(v, Value::Str("Hello a\"b!".into()));
    }

    #[test]
    fn unknown_function() {
        let mut host = host();
        assert_eq!(
            host.eval("system(\"rm\")"),
            Err(ScriptError::UnknownFunction("system".into()))
        );
    }

    #[test]
    fn host_errors_propagate() {
        let mut host = host();
        assert!(matches!(
            host.eval("add(\"x\")"),
            Err(ScriptError::Host { .. })
        ));
    }

    #[test]
    fn parse_errors_report_position() {
        let mut host = host();
        assert!(matches!(host.eval("add(1 2)"), Err(ScriptError::Parse { .. })));
        assert!(matches!(host.eval("\"open"), Err(ScriptError::Parse { .. })));
        assert!(matches!(host.eval("add(1) add(2)"), Err(ScriptError::Parse { .. })));
    }

    #[test]
    fn nesting_is_bounded() {
        let mut host = host();
        let src = format!("{}1{}", "add(".repeat(64), ")".repeat(64));
        assert!(matches!(host.eval(&src), Err(ScriptError::Parse { .. })));
    }

    #[test]
    fn oversized_source_rejected() {
        let mut host = host();
        let src = " ".repeat(MAX_SOURCE_LEN + 1);
        assert_eq!(host.eval(&src), Err(ScriptError::TooLong(MAX_SOURCE_LEN)));
    }

    #[test]
    fn empty_program_is_unit() {
        let mut host = host();
        assert_eq!(host.eval("  ; ;"), Ok(Value::Unit));
    }

    #[test]
    fn function_names_include_builtin() {
        let names = host().function_names().join(",");
        assert_eq!(names, "add,helloWorld,puts");
    }
}
