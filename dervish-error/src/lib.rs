//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages, and the [`Error`] type that pairs a kind with the regions of input it refers to.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt::{self, Debug, Display}, io::{self, Write}, ops::Range};

#[cfg(test)]
extern crate self as dervish_error;

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while parsing, building, evaluating or
/// differentiating an expression.
///
/// Implementations are usually generated with `#[derive(ErrorKind)]` from the `dervish-attrs`
/// crate.
pub trait ErrorKind: Debug + Display + Send + Sync {
    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;

    /// Returns `self` as [`Any`], so that the concrete kind can be recovered.
    fn as_any(&self) -> &dyn Any;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Returns true if the kind of this error is `T`.
    pub fn is<T: ErrorKind + 'static>(&self) -> bool {
        self.kind.as_any().is::<T>()
    }

    /// Returns the kind of this error as `T`, if it is one.
    pub fn downcast_ref<T: ErrorKind + 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error against the given source text.
    pub fn write_report(&self, src_id: &str, src: &str, w: impl Write) -> io::Result<()> {
        self.build_report(src_id).write((src_id, Source::from(src)), w)
    }

    /// Prints the report for this error to stderr.
    pub fn report_to_stderr(&self, src_id: &str, src: &str) -> io::Result<()> {
        self.build_report(src_id).eprint((src_id, Source::from(src)))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.kind, f)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use dervish_attrs::ErrorKind;
    use super::*;

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        message = format!("cannot use `{}` here", name),
        labels = ["this name", ""],
        help = "try another name",
    )]
    struct BadName {
        name: String,
    }

    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(message = "nothing to see", labels = ["here"])]
    struct Nothing;

    fn render(error: &Error, src: &str) -> String {
        let mut buf = Vec::new();
        error.write_report("input", src, &mut buf).unwrap();
        String::from_utf8(strip_ansi_escapes::strip(buf)).unwrap()
    }

    #[test]
    fn downcast_kind() {
        let error = Error::new(vec![0..1], BadName { name: "x".to_string() });
        assert!(error.is::<BadName>());
        assert!(!error.is::<Nothing>());
        assert_eq!(error.downcast_ref::<BadName>().unwrap().name, "x");
    }

    #[test]
    fn display_uses_message() {
        let error = Error::new(vec![0..1], BadName { name: "sin".to_string() });
        assert_eq!(error.to_string(), "cannot use `sin` here");
        assert_eq!(Error::new(vec![0..1], Nothing).to_string(), "nothing to see");
    }

    #[test]
    fn report_contains_message_and_help() {
        let src = "sin + 2";
        let error = Error::new(vec![0..3, 4..5], BadName { name: "sin".to_string() });
        let report = render(&error, src);
        assert!(report.contains("cannot use `sin` here"));
        assert!(report.contains("this name"));
        assert!(report.contains("try another name"));
    }

    #[test]
    fn report_without_spans() {
        let report = render(&Error::new(vec![], Nothing), "1");
        assert!(report.contains("nothing to see"));
    }
}
