use std::fmt::Display;
use std::io::Write;

pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Writes the Inspect text of `object` on its own line.
    pub fn print(&mut self, object: impl Display) -> std::io::Result<()> {
        writeln!(self.out, "{}", object)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osp_lang_interpreter::object::{EvaluationError, Object};

    #[test]
    fn test_print() {
        let mut printer = Printer::new(Vec::new());
        printer.print(Object::integer(5)).unwrap();
        printer.print(Object::string("hi".to_owned())).unwrap();
        printer
            .print(Object::error(EvaluationError::DivisionByZero))
            .unwrap();

        let output = String::from_utf8(printer.out).unwrap();
        assert_eq!(output, "5\nhi\nERROR: division by zero\n");
    }
}
