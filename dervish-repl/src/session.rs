//! The command interpreter behind the prompt.
//!
//! A line is lowercased and split on whitespace. The first word selects the command and every
//! expression argument is a single word.

use crate::error::{kind, Error};
use dervish_compute::{
    error::Error as CoreError,
    parse,
    symbolic::{Bindings, Expr, VariableVerifier},
};
use log::debug;
use std::{collections::HashSet, ops::Range};

/// The variable holding the result of the most recent `eval`, `sub` or `diff` command.
pub const LAST: &str = "$";

/// Words that cannot be declared as variables.
const RESERVED: [&str; 17] = [
    "use", "forget", "eval", "sub", "diff", "help", "exit", "set", "clear", "show",
    "log", "ln", "sin", "cos", "tan", "e", "pi",
];

/// Printed by the `help` command.
pub const HELP: &str = "\
Expressions are written without spaces, e.g. 2*x^2+sin(x). Supported operators are
+ - * / ^, functions sin cos tan ln log and log<b> (logarithm in base b), and the
constants e and pi. The result of the last eval, sub or diff command is stored in $.

Commands:
    use <variables>              declare variable names
    forget <variables> | all     undeclare variables and drop their values
    set <variable> <expression>  give a variable a value; an eval, sub or diff command
                                 may be written in place of the expression
    clear <variables> | all      drop the values of variables but keep them declared
    eval <expression>            simplify an expression
    sub <expression> [variables] simplify an expression, substituting the values of the
                                 given variables, or all of them
    diff <expression> <variable> differentiate an expression
    show [variables]             list declared variables and their values
    help                         show this text
    exit                         quit";

/// The result of running a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Text to print, which may be empty.
    Print(String),

    /// The session should end.
    Exit,
}

/// A word of the command line, with its position in the line.
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    text: &'a str,
    start: usize,
}

impl Word<'_> {
    fn span(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }
}

/// Splits the line into words, keeping track of where each word starts.
fn split_words(line: &str) -> Vec<Word> {
    line.split_whitespace()
        .map(|text| Word {
            text,
            start: text.as_ptr() as usize - line.as_ptr() as usize,
        })
        .collect()
}

/// Returns the span from the start of the first word to the end of the last.
fn span_of(words: &[Word]) -> Range<usize> {
    match (words.first(), words.last()) {
        (Some(first), Some(last)) => first.start..last.span().end,
        _ => 0..0,
    }
}

/// Gives errors raised while evaluating an argument the span of that argument.
fn at(span: Range<usize>) -> impl Fn(CoreError) -> Error {
    move |mut err| {
        if err.spans.is_empty() {
            err.spans.push(span.clone());
        }
        Error::Expression(vec![err])
    }
}

/// The declared variables and their values.
#[derive(Debug, Clone)]
pub struct Session {
    /// Declared variable names, in the order they were declared. Always contains [`LAST`].
    declared: Vec<String>,

    /// Values of variables.
    bindings: Bindings,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            declared: vec![LAST.to_string()],
            bindings: Bindings::new(),
        }
    }
}

impl Session {
    /// Creates a session with no variables other than [`LAST`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one line of input. Spans in returned errors refer to the lowercased line.
    pub fn execute(&mut self, line: &str) -> Result<Response, Error> {
        let line = line.to_lowercase();
        let words = split_words(&line);
        match words.first().map(|word| word.text) {
            None => Ok(Response::Print(String::new())),
            Some("exit") => Ok(Response::Exit),
            Some(_) => {
                let output = self.run(&words)?;
                Ok(Response::Print(output.trim().to_string()))
            },
        }
    }

    /// Runs the command made of the given words. `words` is not empty.
    fn run(&mut self, words: &[Word]) -> Result<String, Error> {
        let command = words[0];
        debug!("running command `{}` with {} arguments", command.text, words.len() - 1);
        match command.text {
            "use" => self.declare(command, &words[1..]).map(|_| String::new()),
            "forget" => self.forget(command, &words[1..]).map(|_| String::new()),
            "set" => self.set(command, &words[1..]).map(|_| String::new()),
            "clear" => self.clear(command, &words[1..]).map(|_| String::new()),
            "eval" => self.eval(command, &words[1..]).map(|expr| expr.to_string()),
            "sub" => self.sub(command, &words[1..]).map(|expr| expr.to_string()),
            "diff" => self.diff(command, &words[1..]).map(|expr| expr.to_string()),
            "show" => Ok(self.show(&words[1..])),
            "help" => Ok(HELP.to_string()),
            _ => Ok("Unknown command.".to_string()),
        }
    }

    /// Returns the set of declared variable names.
    fn variables(&self) -> HashSet<String> {
        self.declared.iter().cloned().collect()
    }

    /// Parses an expression argument. Spans of the errors are moved to the argument's position
    /// in the line.
    fn parse_arg(&self, word: Word) -> Result<Expr, Error> {
        parse(word.text, &self.variables()).map_err(|errs| {
            Error::Expression(errs.into_iter().map(|mut err| {
                for span in &mut err.spans {
                    *span = span.start + word.start..span.end + word.start;
                }
                err
            }).collect())
        })
    }

    /// Substitutes the value of [`LAST`] into the expression, if it has one.
    fn substitute_last(&self, expr: Expr, word: Word) -> Result<Expr, Error> {
        match self.bindings.get(LAST) {
            Some(last) => {
                let bindings = Bindings::from([(LAST.to_string(), last.clone())]);
                expr.evaluate(Some(&bindings)).map_err(at(word.span()))
            },
            None => Ok(expr),
        }
    }

    /// Stores the value as the last result, unless that would make [`LAST`] part of a cycle of
    /// definitions, as it would after `set x $` followed by `eval x`.
    fn remember(&mut self, value: &Expr) {
        if VariableVerifier::new(&self.bindings).would_cycle(LAST, value) {
            debug!("not storing `{}` as the last result, since it would refer to itself", value);
            return;
        }
        self.bindings.insert(LAST.to_string(), value.clone());
    }

    /// Puts back the last result from before a chained command ran, returning the one the
    /// chained command stored.
    fn restore_last(&mut self, previous: Option<Expr>) -> Option<Expr> {
        match previous {
            Some(value) => self.bindings.insert(LAST.to_string(), value),
            None => self.bindings.remove(LAST),
        }
    }

    /// `use <variables>`
    fn declare(&mut self, command: Word, names: &[Word]) -> Result<(), Error> {
        if names.is_empty() {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "use <variables>",
            }));
        }

        let (valid, invalid): (Vec<_>, Vec<_>) = names.iter().partition(|name| {
            name.text.chars().all(char::is_alphabetic) && !RESERVED.contains(&name.text)
        });
        for name in valid {
            if !self.declared.iter().any(|declared| declared.as_str() == name.text) {
                self.declared.push(name.text.to_string());
            }
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::Command(CoreError::new(
                invalid.iter().map(|name| name.span()).collect(),
                kind::InvalidNames {
                    names: invalid.iter().map(|name| name.text.to_string()).collect(),
                },
            )))
        }
    }

    /// `forget <variables> | all`
    fn forget(&mut self, command: Word, names: &[Word]) -> Result<(), Error> {
        let Some(first) = names.first() else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "forget <variables> | all",
            }));
        };

        if first.text == "all" {
            self.declared.retain(|name| name.as_str() == LAST);
            self.bindings.clear();
            return Ok(());
        }

        for name in names.iter().filter(|name| name.text != LAST) {
            self.declared.retain(|declared| declared.as_str() != name.text);
            self.bindings.remove(name.text);
        }
        Ok(())
    }

    /// `set <variable> <expression>`, or `set <variable> <command>` to use the output of a
    /// command as the value.
    fn set(&mut self, command: Word, args: &[Word]) -> Result<(), Error> {
        let [name, definition, ..] = args else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "set <variable> <expression>",
            }));
        };
        if !self.declared.iter().any(|declared| declared.as_str() == name.text) {
            return Err(Error::command(name.span(), kind::UnknownVariable {
                name: name.text.to_string(),
            }));
        }

        // the last result stored by a chained command only counts if the definition is accepted
        let (value, chained_last) = if args.len() > 2 {
            let chained = &args[1..];
            if !matches!(chained[0].text, "eval" | "sub" | "diff") {
                return Err(Error::command(chained[0].span(), kind::NoValue));
            }
            let previous = self.bindings.get(LAST).cloned();
            let output = self.run(chained);
            let chained_last = self.restore_last(previous);
            let value = parse(&output?, &self.variables()).map_err(|mut errs| {
                for err in &mut errs {
                    err.spans = vec![span_of(chained)];
                }
                Error::Expression(errs)
            })?;
            (value, chained_last)
        } else {
            (self.parse_arg(*definition)?, None)
        };

        let verifier = VariableVerifier::new(&self.bindings);
        if verifier.would_cycle(name.text, &value) {
            return Err(Error::Command(CoreError::new(
                vec![name.span(), span_of(&args[1..])],
                kind::CyclicDefinition { name: name.text.to_string() },
            )));
        }

        debug!("{} = {}", name.text, value);
        self.bindings.insert(name.text.to_string(), value);
        if let Some(last) = chained_last {
            self.remember(&last);
        }
        Ok(())
    }

    /// `clear <variables> | all`
    fn clear(&mut self, command: Word, names: &[Word]) -> Result<(), Error> {
        let Some(first) = names.first() else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "clear <variables> | all",
            }));
        };

        if first.text == "all" {
            self.bindings.retain(|name, _| name.as_str() == LAST);
            return Ok(());
        }

        if let Some(last) = names.iter().find(|name| name.text == LAST) {
            return Err(Error::command(last.span(), kind::ClearLast));
        }
        for name in names {
            self.bindings.remove(name.text);
        }
        Ok(())
    }

    /// `eval <expression>`
    fn eval(&mut self, command: Word, args: &[Word]) -> Result<Expr, Error> {
        let Some(&source) = args.first() else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "eval <expression>",
            }));
        };

        let expr = self.parse_arg(source)?;
        let expr = self.substitute_last(expr, source)?;
        self.remember(&expr);
        Ok(expr)
    }

    /// `sub <expression> [variables | all]`
    fn sub(&mut self, command: Word, args: &[Word]) -> Result<Expr, Error> {
        let Some((&source, names)) = args.split_first() else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "sub <expression> [variables | all]",
            }));
        };

        let expr = self.parse_arg(source)?;
        let expr = match names.first() {
            None => expr.evaluate(Some(&self.bindings)),
            Some(first) if first.text == "all" => expr.evaluate(Some(&self.bindings)),
            Some(_) => {
                let mut subset = Bindings::new();
                for name in names {
                    let Some(value) = self.bindings.get(name.text) else {
                        return Err(Error::command(name.span(), kind::UnboundVariable {
                            name: name.text.to_string(),
                        }));
                    };
                    subset.insert(name.text.to_string(), value.clone());
                }
                expr.evaluate(Some(&subset))
            },
        }
        .map_err(at(source.span()))?;

        self.remember(&expr);
        Ok(expr)
    }

    /// `diff <expression> <variable>`
    fn diff(&mut self, command: Word, args: &[Word]) -> Result<Expr, Error> {
        let [source, with, ..] = args else {
            return Err(Error::command(command.span(), kind::MissingArgument {
                usage: "diff <expression> <variable>",
            }));
        };

        let expr = self.parse_arg(*source)?;
        let expr = self.substitute_last(expr, *source)?;
        let derivative = expr.differentiate(with.text).map_err(at(source.span()))?;
        self.remember(&derivative);
        Ok(derivative)
    }

    /// `show [variables | all]`
    ///
    /// Variables without values are listed first, then variables with values.
    fn show(&self, names: &[Word]) -> String {
        let all = names.first().map_or(true, |first| first.text == "all");
        let shown = self.declared
            .iter()
            .filter(|declared| all || names.iter().any(|name| name.text == declared.as_str()));

        let (bound, unbound): (Vec<_>, Vec<_>) = shown
            .partition(|name| self.bindings.contains_key(name.as_str()));
        unbound
            .into_iter()
            .map(|name| name.to_string())
            .chain(bound.into_iter().map(|name| format!("{} = {}", name, self.bindings[name])))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use dervish_compute::error::kind as compute_kind;
    use pretty_assertions::assert_eq;
    use super::*;

    /// Runs each line in a new session, returning the output of the last one.
    fn run(lines: &[&str]) -> Result<String, Error> {
        let mut session = Session::new();
        let mut output = String::new();
        for line in lines {
            output = match session.execute(line)? {
                Response::Print(text) => text,
                Response::Exit => String::new(),
            };
        }
        Ok(output)
    }

    fn output(lines: &[&str]) -> String {
        run(lines).unwrap()
    }

    #[test]
    fn eval_and_last() {
        assert_eq!(output(&["eval 2^3"]), "8");
        assert_eq!(output(&["eval 2^3", "eval $*2"]), "16");
        assert_eq!(output(&["EVAL 15/10"]), "1.5");
        assert_eq!(output(&["use x", "eval x*1+0"]), "x");
    }

    #[test]
    fn diff_command() {
        assert_eq!(output(&["use x", "diff x^2 x"]), "x*2");
        assert_eq!(output(&["use x", "diff 45*x+87 x"]), "45");
        assert_eq!(output(&["use x", "eval x^3", "diff $ x"]), "x^2*3");
    }

    #[test]
    fn sub_command() {
        let lines = ["use x y", "set x 2", "set y x+1"];
        assert_eq!(output(&[&lines[..], &["sub x*y"]].concat()), "6");
        assert_eq!(output(&[&lines[..], &["sub x*y all"]].concat()), "6");
        assert_eq!(output(&[&lines[..], &["sub x*y y"]].concat()), "x*(x+1)");
        assert_eq!(output(&[&lines[..], &["sub x*y", "eval $+1"]].concat()), "7");
    }

    #[test]
    fn sub_unbound_variable() {
        let err = run(&["use x y", "sub x*y y"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::UnboundVariable>());
        assert_eq!(err.errors()[0].spans, vec![8..9]);
    }

    #[test]
    fn set_chained_command() {
        assert_eq!(output(&["use x y", "set y diff x^2 x", "show y"]), "y = x*2");
        let err = run(&["use x y", "set y show y"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::NoValue>());
    }

    #[test]
    fn rejected_set_keeps_last_result() {
        assert_eq!(
            output(&["use x y", "eval 5", "set x eval x+1", "show $"]),
            "$ = 5",
        );
        let err = run(&["use x", "eval 5", "set x eval x+1"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::CyclicDefinition>());

        // an accepted chained command stores its result as usual
        assert_eq!(output(&["use x y", "eval 5", "set y diff x^2 x", "show $"]), "$ = x*2");
    }

    #[test]
    fn last_result_never_forms_a_cycle() {
        let lines = ["use x", "set x $", "eval x"];
        assert_eq!(output(&lines), "x");
        assert_eq!(output(&[&lines[..], &["show"]].concat()), "$\nx = $");
        assert_eq!(output(&[&lines[..], &["sub x"]].concat()), "$");

        let lines = ["use x y", "eval 3", "set x $+y", "eval x"];
        assert_eq!(output(&lines), "x");
        assert_eq!(output(&[&lines[..], &["sub x"]].concat()), "3+y");
    }

    #[test]
    fn set_requires_declaration() {
        let err = run(&["set x 2"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::UnknownVariable>());
    }

    #[test]
    fn set_rejects_cycles() {
        let err = run(&["use x y", "set x y", "set y x"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::CyclicDefinition>());

        let err = run(&["use x", "set x x+1"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::CyclicDefinition>());
    }

    #[test]
    fn use_rejects_invalid_names() {
        let mut session = Session::new();
        let err = session.execute("use x sin y2 z").unwrap_err();
        assert_eq!(err.errors().len(), 1);
        assert_eq!(
            err.errors()[0].downcast_ref::<kind::InvalidNames>(),
            Some(&kind::InvalidNames { names: vec!["sin".to_string(), "y2".to_string()] }),
        );
        assert_eq!(err.errors()[0].spans, vec![6..9, 10..12]);

        // the valid names are still declared
        assert_eq!(session.execute("show").unwrap(), Response::Print("$\nx\nz".to_string()));
    }

    #[test]
    fn show_lists_unbound_first() {
        assert_eq!(
            output(&["use a b c", "set b 2", "eval 5", "show"]),
            "a\nc\n$ = 5\nb = 2",
        );
        assert_eq!(output(&["use a b c", "set b 2", "show b c"]), "c\nb = 2");
    }

    #[test]
    fn forget_and_clear() {
        assert_eq!(output(&["use x y", "set x 2", "forget x", "show"]), "$\ny");
        assert_eq!(output(&["use x y", "eval 1", "forget all", "show"]), "$");
        assert_eq!(output(&["use x", "set x 2", "eval 1", "clear all", "show"]), "x\n$ = 1");
        assert_eq!(output(&["use x", "set x 2", "clear x", "show x"]), "x");

        let err = run(&["clear $"]).unwrap_err();
        assert!(err.errors()[0].is::<kind::ClearLast>());
    }

    #[test]
    fn expression_errors_point_into_the_line() {
        let err = run(&["eval 5/0"]).unwrap_err();
        assert!(err.errors()[0].is::<compute_kind::DivisionByZero>());
        assert_eq!(err.errors()[0].spans, vec![5..8]);

        let err = run(&["use x", "eval x+#"]).unwrap_err();
        assert_eq!(err.errors()[0].spans, vec![7..8]);
    }

    #[test]
    fn missing_arguments() {
        for line in ["use", "forget", "set x", "clear", "eval", "sub", "diff x^2"] {
            let err = run(&[line]).unwrap_err();
            assert!(err.errors()[0].is::<kind::MissingArgument>(), "{}", line);
        }
    }

    #[test]
    fn other_commands() {
        assert_eq!(output(&["frobnicate"]), "Unknown command.");
        assert_eq!(output(&["   "]), "");
        assert_eq!(output(&["help"]), HELP);
        assert_eq!(Session::new().execute("exit").unwrap(), Response::Exit);
    }
}
