//! A dead simple program: `simple [-v|--verbose] FILE`, driven by hand.
#![forbid(unsafe_code)]
use std::path::Path;

use argscan::{Next, Token, Tokenizer};

#[derive(Debug)]
struct Cli<'a> {
    verbose: bool,
    file: &'a Path,
}

fn parse(args: &[String]) -> argscan::Result<Cli<'_>> {
    let mut verbose = false;
    let mut file = None;
    let mut t = Tokenizer::new(args);
    loop {
        match t.next() {
            Next::Token(Token::Short('v') | Token::Long("verbose")) => verbose = true,
            Next::Token(Token::Value(v)) if file.is_none() => {
                file = Some(argscan::values::parse_path(v)?);
            }
            Next::Token(_) => return Err(t.unexpected()),
            Next::EndOfInput => break,
            Next::Error(err) => return Err(err),
        }
    }
    let Some(file) = file else {
        return Err(argscan::Error::missing_value("FILE"));
    };
    Ok(Cli { verbose, file })
}

fn main() {
    let args = argscan::args_from_env().unwrap_or_else(|err| err.exit());
    let cli = parse(&args).unwrap_or_else(|err| err.exit());
    std::hint::black_box(&cli);
}

#[test]
fn simple() {
    let args = ["me", "-v", "in.txt"].map(String::from);
    let cli = parse(&args).unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.file, Path::new("in.txt"));

    let args = ["me", "in.txt", "out.txt"].map(String::from);
    assert_eq!(parse(&args).unwrap_err().to_string(), "unexpected argument 'out.txt'");

    let args = ["me", "--verbose"].map(String::from);
    assert_eq!(parse(&args).unwrap_err().to_string(), "missing value after argument 'FILE'");
}
