use log::warn;
use osp_lang_core::ast::Program;
use osp_lang_core::lexer;
use osp_lang_core::parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    Exit,
    Clear,
    Value(Program),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new(rl: DefaultEditor) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> Result<ReadOutput, ReadlineError> {
        let line = match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                return Ok(ReadOutput::Clear);
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                return Ok(ReadOutput::Exit);
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };

        if line.trim().is_empty() {
            return Ok(ReadOutput::Clear);
        }
        if let Err(err) = self.rl.add_history_entry(line.as_str()) {
            warn!("could not record history entry: {}", err);
        }

        Ok(parse_line(&line))
    }
}

fn parse_line(line: &str) -> ReadOutput {
    let tokenizer = lexer::Tokenizer::new(line);
    match parser::Parser::new(tokenizer).parse_program() {
        Ok(program) => ReadOutput::Value(program),
        Err(errors) => {
            println!("parser errors:");
            for error in errors {
                println!("\t{}", error);
            }
            ReadOutput::Clear
        }
    }
}
