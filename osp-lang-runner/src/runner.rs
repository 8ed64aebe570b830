use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use gc::Gc;
use log::info;
use osp_lang_core::lexer;
use osp_lang_core::parser;
use osp_lang_interpreter::environment::Environment;
use osp_lang_interpreter::evaluator::{Evaluator, EvaluatorConfig};
use osp_lang_interpreter::object::Object;

/// Parses and evaluates `source` as a single program in a fresh environment.
pub fn execute(
    source: &str,
    config: EvaluatorConfig,
) -> Result<Gc<Object>, Vec<parser::ParseError>> {
    let tokenizer = lexer::Tokenizer::new(source);
    let program = parser::Parser::new(tokenizer).parse_program()?;
    let env = Environment::new();
    Ok(Evaluator::new(config).eval_program(&program, &env))
}

pub fn execute_file(path: &Path, config: EvaluatorConfig) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    info!("running {}", path.display());

    match execute(&source, config) {
        Ok(result) => {
            println!("{}", result);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute() {
        let tests = vec![
            ("let a = 5; a * 2", "10"),
            ("let f = fn(x) { x }; f", "fn(x) { x; }"),
            ("{\"a\": 1}[\"b\"]", "null"),
            ("len(1)", "ERROR: argument to `len` not supported, got INTEGER"),
        ];
        for (input, expected) in tests {
            let result = execute(input, EvaluatorConfig::default()).unwrap();
            assert_eq!(result.to_string(), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_execute_reports_every_parse_error() {
        let errors = execute("let = 1; let x 2; x", EvaluatorConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_execute_respects_call_depth() {
        let config = EvaluatorConfig { max_call_depth: 10 };
        let result = execute("let f = fn() { f() }; f()", config).unwrap();
        assert_eq!(result.to_string(), "ERROR: maximum call depth of 10 exceeded");

        let input = "let f = fn(n) { f(n + 1) }; f(0)";
        let result = execute(input, EvaluatorConfig::default()).unwrap();
        assert_eq!(result.to_string(), "ERROR: maximum call depth of 1000 exceeded");
    }
}
