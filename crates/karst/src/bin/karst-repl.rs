use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
};

use karst::Interpreter;

fn main() -> ExitCode {
    let mut interpreter = Interpreter::new();
    let stdin = io::stdin();

    loop {
        let Some(line) = read_line(&stdin, "> ") else {
            println!();
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query == ":quit" {
            break;
        }

        match interpreter.run(query) {
            Ok(result) => {
                if !result.is_empty() {
                    println!("{result}");
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    ExitCode::SUCCESS
}

/// Reads one line from stdin after printing a prompt.
///
/// Returns `None` on EOF (Ctrl+D).
fn read_line(stdin: &io::Stdin, prompt: &str) -> Option<String> {
    print!("{prompt}");
    if io::stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    let read = stdin.lock().read_line(&mut input).ok()?;
    if read == 0 {
        return None;
    }
    Some(input.trim_end_matches(['\r', '\n']).to_owned())
}
