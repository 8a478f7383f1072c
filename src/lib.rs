//! *A command line argument tokenizer without an up-front option schema.*
//!
//! [`Tokenizer`] walks a borrowed argument list and yields [`Token`]s:
//! short options (`-c`, clusters like `-abc`), long options (`--name`,
//! `--name=value`) and positional values. The caller decides what each token
//! means and pulls option values with [`Tokenizer::value`] or
//! [`Tokenizer::values`].
//!
//! ```
//! use argscan::{Next, Token, Tokenizer};
//!
//! let args = ["prog", "-vn", "3", "--name=x", "file"];
//! let mut tok = Tokenizer::new(&args);
//! let (mut verbose, mut number, mut name, mut files) = (false, 0u32, None, Vec::new());
//! loop {
//!     match tok.next() {
//!         Next::Token(Token::Short('v')) => verbose = true,
//!         Next::Token(Token::Short('n')) => number = tok.value_int(10)?,
//!         Next::Token(Token::Long("name")) => name = Some(tok.value()?),
//!         Next::Token(Token::Value(v)) => files.push(v),
//!         Next::Token(_) => return Err(tok.unexpected()),
//!         Next::EndOfInput => break,
//!         Next::Error(err) => return Err(err),
//!     }
//! }
//! assert!(verbose);
//! assert_eq!(number, 3);
//! assert_eq!(name, Some("x"));
//! assert_eq!(files, ["file"]);
//! # Ok::<_, argscan::Error>(())
//! ```
//!
//! For table-driven matching, see [`dispatch()`] and [`derive(Options)`](macro@Options).
#![forbid(unsafe_code)]

mod dispatch;
mod error;
mod tokenizer;
pub mod values;

pub use crate::dispatch::{
    Arity, Matched, OptionDesc, OptionSet, Values, dispatch, dispatch_set,
};
pub use crate::error::{Error, ErrorKind};
pub use crate::tokenizer::{DashDash, Next, Token, Tokenizer};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Not public API. Only for proc-macro internal use.
#[doc(hidden)]
pub mod __private {
    pub use std::option::Option::{None, Some};

    pub use crate::dispatch::{Arity, OptionDesc, OptionSet};
}

/// Collect the process arguments as UTF-8 strings, program name included.
///
/// The result is meant to be kept alive for the whole parse and lent to
/// [`Tokenizer::new`].
pub fn args_from_env() -> Result<Vec<String>> {
    std::env::args_os()
        .map(|arg| {
            arg.into_string().map_err(|arg| {
                ErrorKind::InvalidUtf8.with_input(arg.to_string_lossy().into_owned())
            })
        })
        .collect()
}

/// Derive macro generating an [`OptionSet`] table for a fieldless enum.
///
/// Each variant becomes one [`OptionDesc`] whose `id` is the variant itself,
/// in declaration order.
///
/// # Variant attributes
///
/// - `#[opt(short)]` or `#[opt(short = 'c')]`
///
///   Match `-c`. Without an explicit character, the first character of the
///   kebab-case variant name is used.
///
/// - `#[opt(long)]` or `#[opt(long = "name")]`
///
///   Match `--name`. Without an explicit name, the kebab-case variant name
///   is used.
///
/// - `#[opt(value)]`
///
///   The option takes exactly one value ([`Arity::One`]).
///
/// - `#[opt(values)]`
///
///   The option takes a run of values ([`Arity::Many`]).
///
/// - `#[doc = "..."]` or `/// ...`
///
///   The first paragraph becomes the help text.
///
/// A variant with neither `short` nor `long` is positional and matches every
/// value argument. At most one positional variant is allowed.
///
/// # Errors
///
/// Generic enums, non-unit variants, unknown keys, duplicated short or long
/// names, and `value`/`values` on a positional variant are compile errors.
#[cfg(feature = "derive")]
pub use argscan_derive::Options;
