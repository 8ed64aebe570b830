mod evaluator;
mod printer;
mod reader;

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use osp_lang_interpreter::evaluator::EvaluatorConfig;
use rustyline::DefaultEditor;

use evaluator::ReplEvaluator;
use printer::Printer;
use reader::{ReadOutput, Reader};

struct Repl<W: Write> {
    reader: Reader,
    evaluator: ReplEvaluator,
    printer: Printer<W>,
}

impl<W: Write> Repl<W> {
    fn run(mut self) -> anyhow::Result<()> {
        loop {
            match self.reader.read().context("could not read input")? {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Value(program) => {
                    let result = self.evaluator.evaluate(program);
                    self.printer.print(result)?;
                }
            }
        }
        Ok(())
    }
}

fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "there".to_owned())
}

pub fn start(config: EvaluatorConfig) -> anyhow::Result<ExitCode> {
    let rl = DefaultEditor::new().context("could not start the line editor")?;

    println!("Hello {}! This is OSPLang", user_name());
    Repl {
        reader: Reader::new(rl),
        evaluator: ReplEvaluator::new(config),
        printer: Printer::new(std::io::stdout()),
    }
    .run()?;

    Ok(ExitCode::SUCCESS)
}
