use gc::Gc;
use osp_lang_core::ast::Program;
use osp_lang_interpreter::environment::Environment;
use osp_lang_interpreter::evaluator::{Evaluator, EvaluatorConfig};
use osp_lang_interpreter::object::Object;

/// Evaluates successive REPL inputs against one environment, so bindings
/// from earlier lines stay visible.
pub struct ReplEvaluator {
    evaluator: Evaluator,
    environment: Environment,
}

impl ReplEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            evaluator: Evaluator::new(config),
            environment: Environment::new(),
        }
    }

    pub fn evaluate(&mut self, program: Program) -> Gc<Object> {
        self.evaluator.eval_program(&program, &self.environment)
    }
}
