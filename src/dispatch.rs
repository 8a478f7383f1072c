//! Matching tokens against a caller-declared table of options.
use std::fmt;

use crate::Result;
use crate::error::ErrorKind;
use crate::tokenizer::{Next, Token, Tokenizer};

/// How many values an option consumes after it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// None. A value attached with `=` is rejected.
    #[default]
    Flag,
    /// Exactly one, via [`Tokenizer::value`].
    One,
    /// A run of values, via [`Tokenizer::values`].
    Many,
}

/// One entry of an option table.
///
/// A descriptor without `short` and `long` is positional: it matches any
/// [`Token::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDesc<T> {
    pub id: T,
    pub short: Option<char>,
    pub long: Option<&'static str>,
    pub arity: Arity,
    pub help: Option<&'static str>,
}

impl<T: Copy> OptionDesc<T> {
    pub const fn new(id: T) -> Self {
        Self { id, short: None, long: None, arity: Arity::Flag, help: None }
    }

    pub const fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub const fn long(mut self, long: &'static str) -> Self {
        self.long = Some(long);
        self
    }

    pub const fn takes_value(mut self) -> Self {
        self.arity = Arity::One;
        self
    }

    pub const fn takes_values(mut self) -> Self {
        self.arity = Arity::Many;
        self
    }

    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

impl<T> OptionDesc<T> {
    pub const fn is_positional(&self) -> bool {
        self.short.is_none() && self.long.is_none()
    }

    pub fn matches(&self, token: Token<'_>) -> bool {
        match token {
            Token::Short(c) => self.short == Some(c),
            Token::Long(name) => self.long == Some(name),
            Token::Value(_) => self.is_positional(),
        }
    }
}

/// `-s, --long <VALUE>  help`
impl<T> fmt::Display for OptionDesc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.short, self.long) {
            (Some(s), Some(l)) => write!(f, "-{s}, --{l}")?,
            (Some(s), None) => write!(f, "-{s}")?,
            (None, Some(l)) => write!(f, "    --{l}")?,
            (None, None) => f.write_str("<ARG>")?,
        }
        if !self.is_positional() {
            match self.arity {
                Arity::Flag => {}
                Arity::One => f.write_str(" <VALUE>")?,
                Arity::Many => f.write_str(" <VALUE>...")?,
            }
        }
        if let Some(help) = self.help {
            write!(f, "  {help}")?;
        }
        Ok(())
    }
}

/// A closed set of options, usually from `#[derive(Options)]`.
pub trait OptionSet: Sized + 'static {
    const OPTIONS: &'static [OptionDesc<Self>];
}

/// Values extracted for a matched option, according to its [`Arity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values<'a> {
    None,
    /// The value of an [`Arity::One`] option, or a positional argument itself.
    One(&'a str),
    Many(Vec<&'a str>),
}

impl<'a> Values<'a> {
    pub fn as_slice(&self) -> &[&'a str] {
        match self {
            Values::None => &[],
            Values::One(v) => std::slice::from_ref(v),
            Values::Many(vs) => vs,
        }
    }
}

/// A token matched by a descriptor, handed to the dispatch handler.
#[derive(Debug)]
pub struct Matched<'a, 'd, T> {
    pub desc: &'d OptionDesc<T>,
    pub token: Token<'a>,
    pub values: Values<'a>,
}

impl<T: Copy> Matched<'_, '_, T> {
    pub fn id(&self) -> T {
        self.desc.id
    }
}

/// Drive `tokenizer` to the end, calling `handler` once per matched token.
///
/// The first matching descriptor in `table` wins. A token nothing matches
/// stops the loop with an "unexpected argument" error. Errors returned by
/// `handler` without an offending argument get the option's argument attached.
pub fn dispatch<'a, 'd, S, T>(
    tokenizer: &mut Tokenizer<'a, S>,
    table: &'d [OptionDesc<T>],
    mut handler: impl FnMut(Matched<'a, 'd, T>) -> Result<()>,
) -> Result<()>
where
    S: AsRef<str>,
{
    loop {
        let token = match tokenizer.next() {
            Next::Token(token) => token,
            Next::EndOfInput => return Ok(()),
            Next::Error(err) => return Err(err),
        };
        let Some(desc) = table.iter().find(|desc| desc.matches(token)) else {
            log::trace!("no option matches `{token}`");
            return Err(tokenizer.unexpected());
        };
        log::trace!("`{token}` matches `{desc}`");

        let arg = tokenizer.last_arg().unwrap_or_default();
        let values = match (token, desc.arity) {
            (Token::Value(v), _) => Values::One(v),
            (_, Arity::Flag) if tokenizer.has_attached_value() => {
                log::trace!("flag `{token}` got an attached value");
                return Err(ErrorKind::UnexpectedValue.with_input(arg));
            }
            (_, Arity::Flag) => Values::None,
            (_, Arity::One) => Values::One(tokenizer.value()?),
            (_, Arity::Many) => Values::Many(tokenizer.values()?),
        };
        handler(Matched { desc, token, values }).map_err(|err| err.with_arg_if_missing(arg))?;
    }
}

/// [`dispatch`] over the table of an [`OptionSet`].
pub fn dispatch_set<'a, S, O>(
    tokenizer: &mut Tokenizer<'a, S>,
    handler: impl FnMut(Matched<'a, 'static, O>) -> Result<()>,
) -> Result<()>
where
    S: AsRef<str>,
    O: OptionSet,
{
    dispatch(tokenizer, O::OPTIONS, handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Opt {
        Verbose,
        Number,
        Include,
        File,
    }

    const TABLE: &[OptionDesc<Opt>] = &[
        OptionDesc::new(Opt::Verbose).short('v').long("verbose").help("Print more."),
        OptionDesc::new(Opt::Number).short('n').long("number").takes_value(),
        OptionDesc::new(Opt::Include).short('I').takes_values(),
        OptionDesc::new(Opt::File),
    ];

    fn run<'a>(args: &'a [&'a str]) -> Result<Vec<(Opt, Values<'a>)>> {
        let mut out = Vec::new();
        dispatch(&mut Tokenizer::new(args), TABLE, |m| {
            out.push((m.id(), m.values));
            Ok(())
        })?;
        Ok(out)
    }

    #[test]
    fn matches_table() {
        let got = run(&["prog", "-vn3", "a", "--number=4", "-I", "x", "y", "--verbose"]).unwrap();
        assert_eq!(
            got,
            [
                (Opt::Verbose, Values::None),
                (Opt::Number, Values::One("3")),
                (Opt::File, Values::One("a")),
                (Opt::Number, Values::One("4")),
                (Opt::Include, Values::Many(vec!["x", "y"])),
                (Opt::Verbose, Values::None),
            ]
        );
    }

    #[test]
    fn first_match_wins() {
        const DUP: &[OptionDesc<u8>] =
            &[OptionDesc::new(1).short('a'), OptionDesc::new(2).short('a').long("a")];
        let mut ids = Vec::new();
        dispatch(&mut Tokenizer::new(&["prog", "-a", "--a"]), DUP, |m| {
            ids.push(m.id());
            Ok(())
        })
        .unwrap();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn rejections() {
        let err = run(&["prog", "-x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
        assert_eq!(err.input(), Some("-x"));

        let err = run(&["prog", "--verbose=yes"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedValue);
        assert_eq!(err.input(), Some("--verbose=yes"));

        let err = run(&["prog", "--number"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingValue);

        let err = run(&["prog", "-v--x"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedArgument);
    }

    #[test]
    fn handler_error_context() {
        let mut t = Tokenizer::new(&["prog", "-n", "oops"]);
        let err = dispatch(&mut t, TABLE, |m| {
            if let Values::One(v) = m.values {
                v.parse::<u32>()
                    .map_err(|e| Error::from(ErrorKind::InvalidValue).with_source(e.into()))?;
            }
            Ok(())
        })
        .unwrap_err();
        assert_eq!(err.input(), Some("-n"));
    }

    #[test]
    fn display() {
        let rendered = TABLE.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        assert_eq!(
            rendered,
            ["-v, --verbose  Print more.", "-n, --number <VALUE>", "-I <VALUE>...", "<ARG>"]
        );
    }
}
