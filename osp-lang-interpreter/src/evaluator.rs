use gc::Gc;
use log::trace;

use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvaluationError, Function, HashPairs, Object};
use osp_lang_core::ast;
use osp_lang_core::ast::{Expression, InfixOperationKind, PrefixOperationKind};

#[derive(Debug, PartialEq)]
pub enum Signal {
    Return(Gc<Object>),
    Error(EvaluationError),
}

impl From<EvaluationError> for Signal {
    fn from(error: EvaluationError) -> Self {
        Signal::Error(error)
    }
}

impl Signal {
    fn into_object(self) -> Gc<Object> {
        match self {
            Signal::Return(value) => value,
            Signal::Error(error) => Object::error(error),
        }
    }
}

type Evaluation = Result<Gc<Object>, Signal>;

const STACK_RED_ZONE: usize = 128 * 1024;
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a ast::Program),
    Statement(&'a ast::Statement),
    Block(&'a ast::BlockStatement),
    Expression(&'a Expression),
}

impl<'a> From<&'a ast::Program> for Node<'a> {
    fn from(program: &'a ast::Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a ast::Statement> for Node<'a> {
    fn from(statement: &'a ast::Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'a> From<&'a ast::BlockStatement> for Node<'a> {
    fn from(block: &'a ast::BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expression: &'a Expression) -> Self {
        Node::Expression(expression)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Nested function calls allowed before evaluation fails with
    /// [`EvaluationError::CallDepthExceeded`].
    pub max_call_depth: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
        }
    }
}

#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
    depth: usize,
}

pub fn eval_program(program: &ast::Program, environment: &Environment) -> Gc<Object> {
    Evaluator::default().eval_program(program, environment)
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Evaluates a single node. A `return` outside of any function yields its
    /// value; an error yields an [`Object::Error`].
    pub fn eval<'a>(&mut self, node: impl Into<Node<'a>>, environment: &Environment) -> Gc<Object> {
        self.depth = 0;
        let result = match node.into() {
            Node::Program(program) => return self.eval_program(program, environment),
            Node::Statement(statement) => self.eval_statement(statement, environment),
            Node::Block(block) => self.eval_block_statement(block, environment),
            Node::Expression(expression) => self.eval_expression(expression, environment),
        };
        result.unwrap_or_else(Signal::into_object)
    }

    pub fn eval_program(&mut self, program: &ast::Program, environment: &Environment) -> Gc<Object> {
        self.depth = 0;
        let mut output = Object::null();
        for statement in &program.statements {
            match self.eval_statement(statement, environment) {
                Ok(object) => output = object,
                Err(signal) => return signal.into_object(),
            }
        }
        output
    }

    fn eval_statement(&mut self, statement: &ast::Statement, environment: &Environment) -> Evaluation {
        match statement {
            ast::Statement::Expression(expression) => self.eval_expression(expression, environment),
            ast::Statement::Return(statement) => {
                let value = self.eval_expression(&statement.value, environment)?;
                Err(Signal::Return(value))
            }
            ast::Statement::Let(statement) => {
                let value = self.eval_expression(&statement.value, environment)?;
                Ok(environment.set(&statement.identifier.name, value))
            }
        }
    }

    fn eval_block_statement(
        &mut self,
        block: &ast::BlockStatement,
        environment: &Environment,
    ) -> Evaluation {
        let mut result = Object::null();
        for statement in &block.statements {
            result = self.eval_statement(statement, environment)?;
        }
        Ok(result)
    }

    fn eval_expression(&mut self, expression: &Expression, environment: &Environment) -> Evaluation {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || {
            self.eval_expression_inner(expression, environment)
        })
    }

    fn eval_expression_inner(
        &mut self,
        expression: &Expression,
        environment: &Environment,
    ) -> Evaluation {
        match expression {
            Expression::IntegerLiteral(value) => Ok(Object::integer(*value)),
            Expression::BooleanLiteral(value) => Ok(Object::boolean(*value)),
            Expression::StringLiteral(value) => Ok(Object::string(value.clone())),
            Expression::HashLiteral(literal) => {
                let mut pairs = HashPairs::new();
                for (key, value) in literal {
                    let key = self.eval_expression(key, environment)?;
                    key.hash_key()?;
                    let value = self.eval_expression(value, environment)?;
                    pairs.insert(key, value)?;
                }
                Ok(Object::hash(pairs))
            }
            Expression::Identifier(identifier) => environment
                .get(&identifier.name)
                .or_else(|| builtins::lookup(&identifier.name).map(Object::builtin))
                .ok_or_else(|| {
                    EvaluationError::IdentifierNotFound(identifier.name.clone()).into()
                }),
            Expression::PrefixOperation(kind, right) => {
                let right = self.eval_expression(right, environment)?;
                Ok(eval_prefix_operation(*kind, &right)?)
            }
            Expression::InfixOperation(kind, left, right) => {
                let left = self.eval_expression(left, environment)?;
                let right = self.eval_expression(right, environment)?;
                Ok(eval_infix_operation(*kind, &left, &right)?)
            }
            Expression::IfExpression {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.eval_expression(condition, environment)?;
                if condition.is_truthy() {
                    self.eval_block_statement(consequence, environment)
                } else if let Some(alternative) = alternative {
                    self.eval_block_statement(alternative, environment)
                } else {
                    Ok(Object::null())
                }
            }
            Expression::FunctionLiteral { parameters, body } => Ok(Object::function(
                parameters.clone(),
                body.clone(),
                environment.clone(),
            )),
            Expression::CallExpression {
                function,
                arguments,
            } => {
                let function = self.eval_expression(function, environment)?;
                if !matches!(*function, Object::Function(_) | Object::Builtin(_)) {
                    return Err(EvaluationError::NotAFunction(function.object_type()).into());
                }
                let arguments = self.eval_expressions(arguments, environment)?;
                self.apply_function(&function, &arguments)
            }
            Expression::IndexExpression { left, index } => {
                let left = self.eval_expression(left, environment)?;
                let index = self.eval_expression(index, environment)?;
                match &*left {
                    Object::Hash(pairs) => Ok(pairs.get(&index)?.cloned().unwrap_or_else(Object::null)),
                    other => Err(EvaluationError::IndexNotSupported(other.object_type()).into()),
                }
            }
        }
    }

    fn eval_expressions(
        &mut self,
        expressions: &[Expression],
        environment: &Environment,
    ) -> Result<Vec<Gc<Object>>, Signal> {
        let mut result = Vec::with_capacity(expressions.len());
        for expression in expressions {
            result.push(self.eval_expression(expression, environment)?);
        }
        Ok(result)
    }

    fn apply_function(&mut self, function: &Object, arguments: &[Gc<Object>]) -> Evaluation {
        match function {
            Object::Function(function) => self.call_function(function, arguments),
            Object::Builtin(builtin) => {
                trace!("calling builtin `{}` with {} arguments", builtin.name, arguments.len());
                Ok((builtin.func)(arguments)?)
            }
            other => Err(EvaluationError::NotAFunction(other.object_type()).into()),
        }
    }

    fn call_function(&mut self, function: &Function, arguments: &[Gc<Object>]) -> Evaluation {
        if function.parameters.len() != arguments.len() {
            return Err(EvaluationError::WrongArgumentCount {
                expected: function.parameters.len(),
                actual: arguments.len(),
            }
            .into());
        }
        if self.depth >= self.config.max_call_depth {
            return Err(EvaluationError::CallDepthExceeded(self.config.max_call_depth).into());
        }

        let new_environment = Environment::new_enclosed(&function.env);
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            new_environment.set(&parameter.name, argument.clone());
        }

        self.depth += 1;
        trace!("entering function call at depth {}", self.depth);
        let result = self.eval_block_statement(&function.body, &new_environment);
        self.depth -= 1;

        match result {
            Err(Signal::Return(value)) => Ok(value),
            other => other,
        }
    }
}

fn eval_prefix_operation(
    kind: PrefixOperationKind,
    right: &Object,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, right) {
        (PrefixOperationKind::Bang, _) => Ok(Object::boolean(!right.is_truthy())),
        (PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (PrefixOperationKind::Minus, _) => Err(EvaluationError::UnknownPrefixOperator {
            operator: kind,
            right: right.object_type(),
        }),
    }
}

fn eval_infix_operation(
    kind: InfixOperationKind,
    left: &Object,
    right: &Object,
) -> Result<Gc<Object>, EvaluationError> {
    match (left, right) {
        (Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (Object::Boolean(l), Object::Boolean(r)) => match kind {
            InfixOperationKind::Equal => Ok(Object::boolean(l == r)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(l != r)),
            _ => Err(unknown_infix_operator(kind, left, right)),
        },
        (Object::String(l), Object::String(r)) => match kind {
            InfixOperationKind::Plus => Ok(Object::string(format!("{}{}", l, r))),
            InfixOperationKind::Equal => Ok(Object::boolean(l == r)),
            InfixOperationKind::NotEqual => Ok(Object::boolean(l != r)),
            _ => Err(unknown_infix_operator(kind, left, right)),
        },
        _ if left.object_type() != right.object_type() => Err(EvaluationError::TypeMismatch {
            left: left.object_type(),
            operator: kind,
            right: right.object_type(),
        }),
        _ => Err(unknown_infix_operator(kind, left, right)),
    }
}

fn eval_integer_infix_operation(
    kind: InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    use InfixOperationKind::*;
    match kind {
        Plus => Ok(Object::integer(left.wrapping_add(right))),
        Minus => Ok(Object::integer(left.wrapping_sub(right))),
        Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        Divide if right == 0 => Err(EvaluationError::DivisionByZero),
        Divide => Ok(Object::integer(left.wrapping_div(right))),
        LessThan => Ok(Object::boolean(left < right)),
        GreaterThan => Ok(Object::boolean(left > right)),
        Equal => Ok(Object::boolean(left == right)),
        NotEqual => Ok(Object::boolean(left != right)),
    }
}

fn unknown_infix_operator(kind: InfixOperationKind, left: &Object, right: &Object) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.object_type(),
        operator: kind,
        right: right.object_type(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osp_lang_core::lexer::Tokenizer;
    use osp_lang_core::parser::Parser;

    fn run(input: &str) -> Gc<Object> {
        let program = Parser::new(Tokenizer::new(input)).parse_program().unwrap();
        eval_program(&program, &Environment::new())
    }

    fn test_evaluation(inputs: Vec<(&str, Gc<Object>)>) {
        for (input, output) in inputs {
            assert_eq!(run(input), output, "input: {}", input);
        }
    }

    fn test_errors(inputs: Vec<(&str, &str)>) {
        for (input, message) in inputs {
            let result = run(input);
            match &*result {
                Object::Error(error) => assert_eq!(error.to_string(), message, "input: {}", input),
                other => panic!("expected error for {}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_literal() {
        let inputs = vec![
            ("5;", Object::integer(5)),
            ("true;", Object::boolean(true)),
            ("false;", Object::boolean(false)),
            ("\"hello\";", Object::string("hello".to_owned())),
            ("", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_integer_expressions() {
        let inputs = vec![
            ("--5;", Object::integer(5)),
            ("-10;", Object::integer(-10)),
            ("5 + 5 + 5 + 5 - 10", Object::integer(10)),
            ("2 * 2 * 2 * 2 * 2", Object::integer(32)),
            ("-50 + 100 + -50", Object::integer(0)),
            ("20 + 2 * -10", Object::integer(0)),
            ("50 / 2 * 2 + 10", Object::integer(60)),
            ("3 * (3 * 3) + 10", Object::integer(37)),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", Object::integer(50)),
            ("7 / 2", Object::integer(3)),
            ("9223372036854775807 + 1", Object::integer(i64::MIN)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_boolean_expressions() {
        let inputs = vec![
            ("1 < 2", Object::boolean(true)),
            ("1 > 2", Object::boolean(false)),
            ("1 == 1", Object::boolean(true)),
            ("1 != 1", Object::boolean(false)),
            ("true == true", Object::boolean(true)),
            ("true != false", Object::boolean(true)),
            ("(1 < 2) == true", Object::boolean(true)),
            ("(1 > 2) == true", Object::boolean(false)),
            ("\"a\" == \"a\"", Object::boolean(true)),
            ("\"a\" != \"b\"", Object::boolean(true)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_bang_operator() {
        let inputs = vec![
            ("!true", Object::boolean(false)),
            ("!false", Object::boolean(true)),
            ("!5", Object::boolean(false)),
            ("!0", Object::boolean(false)),
            ("!!true", Object::boolean(true)),
            ("!!5", Object::boolean(true)),
            ("!\"\"", Object::boolean(false)),
            ("!if (false) { 1 }", Object::boolean(true)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_string_concatenation() {
        test_evaluation(vec![(
            "\"Hello\" + \" \" + \"World!\"",
            Object::string("Hello World!".to_owned()),
        )]);
    }

    #[test]
    fn test_if_else_expressions() {
        let inputs = vec![
            ("if (true) { 10 }", Object::integer(10)),
            ("if (false) { 10 }", Object::null()),
            ("if (1) { 10 }", Object::integer(10)),
            ("if (0) { 10 }", Object::integer(10)),
            ("if (\"\") { 10 }", Object::integer(10)),
            ("if (1 < 2) { 10 }", Object::integer(10)),
            ("if (1 > 2) { 10 }", Object::null()),
            ("if (1 > 2) { 10 } else { 20 }", Object::integer(20)),
            ("if (1 < 2) { 10 } else { 20 }", Object::integer(10)),
            ("if (true) {}", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_return_statements() {
        let inputs = vec![
            ("return 10;", Object::integer(10)),
            ("return 10; 9;", Object::integer(10)),
            ("return 2 * 5; 9;", Object::integer(10)),
            ("9; return 2 * 5; 9;", Object::integer(10)),
            (
                "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                Object::integer(10),
            ),
            (
                "fn() { if (true) { return 10; } return 1; }()",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { return x; x + 10; }; f(10);",
                Object::integer(10),
            ),
            (
                "let f = fn(x) { let result = x + 10; return result; return 10; }; f(10);",
                Object::integer(20),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_return_stops_at_function_boundary() {
        let input = "let inner = fn() { return 1; }; let outer = fn() { inner(); 2 }; outer();";
        test_evaluation(vec![(input, Object::integer(2))]);
    }

    #[test]
    fn test_unreachable_statements_are_not_evaluated() {
        let input = "let f = fn() { return 1; missing; }; f();";
        test_evaluation(vec![(input, Object::integer(1))]);
    }

    #[test]
    fn test_error_handling() {
        let inputs = vec![
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("-\"a\"", "unknown operator: -STRING"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("true < false;", "unknown operator: BOOLEAN < BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            ("if (10 > 1) { true + false; }", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            ("\"Hello\" - \"World\"", "unknown operator: STRING - STRING"),
            ("\"a\" * 2", "type mismatch: STRING * INTEGER"),
            (
                "{\"name\": \"osp\"}[fn(x) { x }];",
                "unusable as hash key: FUNCTION",
            ),
            ("{fn(x) { x }: 1}", "unusable as hash key: FUNCTION"),
            ("{fn() { 1 }: missing}", "unusable as hash key: FUNCTION"),
            ("{\"a\": 1, {}: missing}", "unusable as hash key: HASH"),
            ("1 / 0", "division by zero"),
            ("5(1)", "not a function: INTEGER"),
            ("5[1]", "index operator not supported: INTEGER"),
            ("let f = fn() { 1 }; f()[0]", "index operator not supported: INTEGER"),
            ("len(1)", "argument to `len` not supported, got INTEGER"),
            ("len(\"a\", \"b\")", "wrong number of arguments. got=2, want=1"),
        ];

        test_errors(inputs);
    }

    #[test]
    fn test_errors_do_not_leak_between_statements() {
        let program = Parser::new(Tokenizer::new("5 + true; 5 + true;"))
            .parse_program()
            .unwrap();
        let env = Environment::new();
        let mut evaluator = Evaluator::default();
        let first = evaluator.eval(&program.statements[0], &env);
        let second = evaluator.eval(&program.statements[1], &env);

        assert_eq!(first, second);
        assert_eq!(first.to_string(), "ERROR: type mismatch: INTEGER + BOOLEAN");
    }

    #[test]
    fn test_argument_errors_abort_the_call() {
        let input = "let f = fn(a, b) { a }; f(missing, undefined_too)";
        test_errors(vec![(input, "identifier not found: missing")]);
    }

    #[test]
    fn test_let_statements() {
        let inputs = vec![
            ("let a = 5; a;", Object::integer(5)),
            ("let a = 5 * 5; a;", Object::integer(25)),
            ("let a = 5; let b = a; b;", Object::integer(5)),
            (
                "let a = 5; let b = a; let c = a + b + 5; c;",
                Object::integer(15),
            ),
            ("let a = 5;", Object::integer(5)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_function_object() {
        let result = run("fn(x) { x + 2; };");
        let Object::Function(function) = &*result else {
            panic!("expected function, got {:?}", result);
        };
        assert_eq!(function.parameters.len(), 1);
        assert_eq!(function.parameters[0].name.as_ref(), "x");
        assert_eq!(function.body.to_string(), "{ (x + 2); }");
        assert_eq!(result.to_string(), "fn(x) { (x + 2); }");
    }

    #[test]
    fn test_function_application() {
        let inputs = vec![
            (
                "let identity = fn(x) { x; }; identity(5);",
                Object::integer(5),
            ),
            (
                "let identity = fn(x) { return x; }; identity(5);",
                Object::integer(5),
            ),
            (
                "let double = fn(x) { x * 2; }; double(5);",
                Object::integer(10),
            ),
            (
                "let add = fn(x, y) { x + y; }; add(5, 5);",
                Object::integer(10),
            ),
            (
                "let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));",
                Object::integer(20),
            ),
            ("fn(x) { x; }(5)", Object::integer(5)),
            ("fn() { }()", Object::null()),
            (
                "
                let factorial = fn(n) {
                    if (n < 2) { 1 }
                    else { factorial(n - 1) * n }
                };
                factorial(5)",
                Object::integer(120),
            ),
            (
                "
                let fib = fn(n) {
                    if (n < 2) { return n; }
                    fib(n - 1) + fib(n - 2)
                };
                fib(15)",
                Object::integer(610),
            ),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_wrong_argument_count() {
        let inputs = vec![
            (
                "let f = fn(x) { x }; f()",
                "wrong number of arguments: want=1, got=0",
            ),
            (
                "let f = fn(x) { x }; f(1, 2)",
                "wrong number of arguments: want=1, got=2",
            ),
        ];

        test_errors(inputs);
    }

    #[test]
    fn test_closures() {
        let inputs = vec![
            (
                "let newAdder = fn(x) { fn(y) { x + y } }; let addTwo = newAdder(2); addTwo(3);",
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let x = 5;
                let fb = fn() {
                    fn() { x }
                };
                fb
            };
            let temp = fa();
            let temp_ = temp();
            temp_()"#,
                Object::integer(5),
            ),
            (
                r#"
            let fa = fn() {
                let is_even = fn(x) {
                    if (x == 0) { true } else { is_odd(x - 1) }
                };
                let is_odd = fn(x) {
                    if (x == 0) { false } else { is_even(x - 1) }
                };
                is_even
            };
            let temp = fa();
            temp(3);"#,
                Object::boolean(false),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_closures_capture_the_live_environment() {
        let inputs = vec![
            // both `let`s write the global scope the closure refers to
            ("let x = 1; let f = fn() { x }; let x = 2; f();", Object::integer(2)),
            // a binding made inside a call lives in a scope of its own
            (
                "let x = 1; let f = fn() { x }; let g = fn() { let x = 3; f() }; g();",
                Object::integer(1),
            ),
            (
                "let x = 1; let set = fn() { let x = 5; x }; set(); x",
                Object::integer(1),
            ),
        ];

        test_evaluation(inputs)
    }

    #[test]
    fn test_builtins() {
        let inputs = vec![
            ("len(\"\")", Object::integer(0)),
            ("len(\"four\")", Object::integer(4)),
            ("len(\"hello world\")", Object::integer(11)),
            ("len({1: 2, 3: 4})", Object::integer(2)),
            ("puts(\"hello\", 1)", Object::null()),
            ("let len = fn(x) { 42 }; len(\"a\")", Object::integer(42)),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_hash_literals() {
        let input = r#"
        let two = "two";
        {
            "one": 10 - 9,
            two: 1 + 1,
            "thr" + "ee": 6 / 2,
            4: 4,
            true: 5,
            false: 6
        }"#;
        let result = run(input);
        let Object::Hash(pairs) = &*result else {
            panic!("expected hash, got {:?}", result);
        };
        let expected = vec![
            (Object::String("one".to_owned()), 1),
            (Object::String("two".to_owned()), 2),
            (Object::String("three".to_owned()), 3),
            (Object::Integer(4), 4),
            (Object::Boolean(true), 5),
            (Object::Boolean(false), 6),
        ];
        assert_eq!(pairs.len(), expected.len());
        for (key, value) in expected {
            assert_eq!(pairs.get(&key), Ok(Some(&Object::integer(value))));
        }
        assert_eq!(
            result.to_string(),
            "{one: 1, two: 2, three: 3, 4: 4, true: 5, false: 6}"
        );
    }

    #[test]
    fn test_hash_literal_duplicate_keys() {
        test_evaluation(vec![
            ("{\"a\": 1, \"a\": 2}[\"a\"]", Object::integer(2)),
            ("len({\"a\": 1, \"a\": 2})", Object::integer(1)),
        ]);
    }

    #[test]
    fn test_hash_index_expressions() {
        let inputs = vec![
            ("{\"a\": 1}[\"a\"]", Object::integer(1)),
            ("{\"a\": 1}[\"b\"]", Object::null()),
            ("let key = \"foo\"; {\"foo\": 5}[key]", Object::integer(5)),
            ("{}[\"foo\"]", Object::null()),
            ("{5: 5}[5]", Object::integer(5)),
            ("{true: 5}[true]", Object::integer(5)),
            ("{false: 5}[false]", Object::integer(5)),
            ("{1: 5}[true]", Object::null()),
        ];

        test_evaluation(inputs);
    }

    #[test]
    fn test_call_depth_limit() {
        let program = Parser::new(Tokenizer::new("let f = fn(n) { f(n + 1) }; f(0);"))
            .parse_program()
            .unwrap();
        let mut evaluator = Evaluator::new(EvaluatorConfig { max_call_depth: 50 });
        let env = Environment::new();

        let result = evaluator.eval_program(&program, &env);
        assert_eq!(
            result,
            Object::error(EvaluationError::CallDepthExceeded(50))
        );

        // the counter is reset, so the same evaluator is usable again
        let input = "let g = fn(n) { if (n == 0) { 0 } else { g(n - 1) } }; g(40)";
        let program = Parser::new(Tokenizer::new(input)).parse_program().unwrap();
        assert_eq!(evaluator.eval_program(&program, &env), Object::integer(0));
    }

    #[test]
    fn test_default_call_depth_limit() {
        let input = "let f = fn(n) { if (n < 0) { 0 } else { f(n + 1) } }; f(0)";
        test_errors(vec![(input, "maximum call depth of 1000 exceeded")]);

        let input = "let count = fn(n) { if (n == 0) { 0 } else { 1 + count(n - 1) } }; count(900)";
        test_evaluation(vec![(input, Object::integer(900))]);
    }

    #[test]
    fn test_eval_single_nodes() {
        let env = Environment::new();
        env.set("x", Object::integer(4));
        let mut evaluator = Evaluator::default();

        let expression = Expression::InfixOperation(
            InfixOperationKind::Multiply,
            Box::new(Expression::Identifier(ast::Identifier { name: "x".into() })),
            Box::new(Expression::IntegerLiteral(2)),
        );
        assert_eq!(evaluator.eval(&expression, &env), Object::integer(8));

        let block = ast::BlockStatement {
            statements: vec![ast::Statement::Return(ast::ReturnStatement {
                value: Expression::IntegerLiteral(1),
            })],
        };
        assert_eq!(evaluator.eval(&block, &env), Object::integer(1));
    }

    #[test]
    fn test_printing_is_stable() {
        let input = "let make = fn(a) { {\"a\": a, 2: fn(x) { x }, true: a * 2} }; make(\"q\") ; make(3)";
        let first = run(input).to_string();
        let second = run(input).to_string();
        assert_eq!(first, second);
        assert_eq!(first, "{a: 3, 2: fn(x) { x; }, true: 6}");
    }
}
