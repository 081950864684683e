pub mod kind;

use dervish_error::Error as CoreError;
use std::ops::Range;

/// Errors that can occur while running a command.
#[derive(Debug)]
pub enum Error {
    /// Errors in an expression argument, or raised while evaluating or differentiating it.
    Expression(Vec<CoreError>),

    /// The command is malformed or cannot be carried out.
    Command(CoreError),
}

impl Error {
    /// Creates a command error at the given span of the input line.
    pub fn command(span: Range<usize>, kind: impl dervish_error::ErrorKind + 'static) -> Self {
        Self::Command(CoreError::new(vec![span], kind))
    }

    /// Returns the individual errors.
    pub fn errors(&self) -> &[CoreError] {
        match self {
            Self::Expression(errs) => errs,
            Self::Command(err) => std::slice::from_ref(err),
        }
    }

    /// Report the errors in this [`Error`] to stderr.
    ///
    /// Spans refer to the lowercased input, which is what commands are run on.
    pub fn report_to_stderr(&self, input: &str) {
        let input = input.to_lowercase();
        for err in self.errors() {
            if err.report_to_stderr("input", &input).is_err() {
                eprintln!("{}", err);
            }
        }
    }
}
