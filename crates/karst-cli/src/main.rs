use std::{
    io::{self, BufRead},
    process::ExitCode,
};

use karst::Interpreter;

/// Reads one query from standard input, evaluates it, and prints the result.
///
/// Errors are printed to standard output in place of a result; the exit code
/// is 0 in both cases.
fn main() -> ExitCode {
    let mut query = String::new();
    if io::stdin().lock().read_line(&mut query).is_err() {
        return ExitCode::FAILURE;
    }

    let mut interpreter = Interpreter::new();
    match interpreter.run(query.trim_end_matches(['\r', '\n'])) {
        Ok(result) => println!("{result}"),
        Err(err) => println!("{err}"),
    }
    ExitCode::SUCCESS
}
