//! Reads `k <int>` / `q <int> <int>` commands from stdin and prints each query's answer.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use osavl_tree::command::Interpreter;

fn main() -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut interpreter = Interpreter::new();
    let mut answers = String::new();

    for (number, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("osavl: failed to read input: {err}");
                return ExitCode::FAILURE;
            }
        };

        answers.clear();
        let result = interpreter.execute(&line, &mut answers);
        // Answers produced before a malformed command are still printed.
        if let Err(err) = stdout.write_all(answers.as_bytes()) {
            eprintln!("osavl: failed to write output: {err}");
            return ExitCode::FAILURE;
        }
        if let Err(err) = result {
            eprintln!("osavl: line {}: {err}", number + 1);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
