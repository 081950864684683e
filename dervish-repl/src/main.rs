mod error;
mod session;

use env_logger::Env;
use log::info;
use rustyline::{error::ReadlineError, DefaultEditor};
use session::{Response, Session};
use std::{fs::File, io::{self, BufRead, BufReader, IsTerminal}};

/// Runs a single line in the session, printing its output or errors. Returns false if the
/// session should end.
fn run_line(input: &str, session: &mut Session) -> bool {
    match session.execute(input) {
        Ok(Response::Print(output)) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            true
        },
        Ok(Response::Exit) => false,
        Err(err) => {
            err.report_to_stderr(input);
            true
        },
    }
}

/// Runs every line from the reader as a command, stopping early at `exit`.
fn run_lines(reader: impl BufRead, session: &mut Session) -> io::Result<()> {
    for line in reader.lines() {
        if !run_line(&line?, session) {
            break;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args();
    args.next();
    let mut session = Session::new();

    if let Some(filename) = args.next() {
        // run commands from a file
        info!("reading commands from {}", filename);
        let result = File::open(&filename)
            .and_then(|file| run_lines(BufReader::new(file), &mut session));
        if let Err(err) = result {
            eprintln!("{}: {}", filename, err);
            std::process::exit(1);
        }
    } else if !io::stdin().is_terminal() {
        // read commands from stdin
        if let Err(err) = run_lines(io::stdin().lock(), &mut session) {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<bool, ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(true);
            }

            rl.add_history_entry(&input)?;
            Ok(run_line(&input, session))
        }

        loop {
            match process_line(&mut rl, &mut session) {
                Ok(true) => (),
                Ok(false) => break,
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
    }
}
