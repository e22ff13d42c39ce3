use std::env;
use std::process::ExitCode;

use xw_template::{ParserOptions, Parser};

/// Parses a file given on the command line and prints the rewritten
/// document to stdout, mirroring the simplest possible use of the library.
fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: xw-template <file.xw>");
        return ExitCode::FAILURE;
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("{path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let options = ParserOptions::<()>::new(true);
    let mut parser = Parser::new(options);
    let output = parser.parse(&bytes, &mut ());
    print!("{output}");

    ExitCode::SUCCESS
}
