use std::fmt;

use crate::Result;
use crate::error::{Error, ErrorKind};

/// One classified command line argument, borrowing from the argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token<'a> {
    /// `-c`, or one letter of a `-abc` cluster.
    Short(char),
    /// `--name` or the name part of `--name=value`.
    Long(&'a str),
    /// A positional argument, including a bare `-`.
    Value(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Short(c) => write!(f, "-{c}"),
            Token::Long(name) => write!(f, "--{name}"),
            Token::Value(v) => f.write_str(v),
        }
    }
}

/// The outcome of [`Tokenizer::next`].
#[derive(Debug)]
#[must_use]
pub enum Next<'a> {
    Token(Token<'a>),
    /// No more tokens. Returned again on every later call.
    EndOfInput,
    /// Malformed input. The tokenizer is latched and keeps returning this.
    Error(Error),
}

impl<'a> Next<'a> {
    /// Convert into the usual `Result<Option<_>>` shape, for `?` in loops.
    pub fn into_result(self) -> Result<Option<Token<'a>>> {
        match self {
            Next::Token(tok) => Ok(Some(tok)),
            Next::EndOfInput => Ok(None),
            Next::Error(err) => Err(err),
        }
    }
}

/// What happens to the arguments following a bare `--`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DashDash {
    /// Stop producing tokens. The skipped arguments stay reachable via
    /// [`Tokenizer::trailing`].
    #[default]
    Stop,
    /// Keep going, but surface every later argument as [`Token::Value`]
    /// even if it starts with `-`.
    Values,
}

/// A pull-style cursor over a borrowed argument list.
///
/// The first element is the program name and is skipped. The list is never
/// copied; every [`Token`] and value borrows from it.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a, S = &'a str> {
    args: &'a [S],
    /// The argument under the cursor, `args.len()` when exhausted.
    idx: usize,
    /// Byte offset into `args[idx]`. Zero means the argument is not yet classified.
    ///
    /// It only equals the argument length right after an empty `=` value.
    offset: usize,
    /// The last option was split at `=` and its value is not yet consumed.
    after_eq: bool,
    /// The argument most recently classified or consumed.
    last: Option<usize>,
    policy: DashDash,
    /// Index of the first argument after a consumed `--`.
    dash_dash: Option<usize>,
    /// Index of the malformed argument, once latched.
    latched: Option<usize>,
}

impl<'a, S: AsRef<str>> Tokenizer<'a, S> {
    pub fn new(args: &'a [S]) -> Self {
        Self {
            args,
            idx: args.len().min(1),
            offset: 0,
            after_eq: false,
            last: None,
            policy: DashDash::Stop,
            dash_dash: None,
            latched: None,
        }
    }

    /// Choose how arguments after `--` are treated. Defaults to [`DashDash::Stop`].
    #[must_use]
    pub fn dash_dash(mut self, policy: DashDash) -> Self {
        self.policy = policy;
        self
    }

    /// `(argument index, byte offset)` of the cursor.
    pub fn position(&self) -> (usize, usize) {
        (self.idx, self.offset)
    }

    /// The argument currently or most recently under the cursor.
    pub fn last_arg(&self) -> Option<&'a str> {
        self.last.map(|i| self.arg(i))
    }

    /// Whether the option just returned has a value attached with `=`.
    pub fn has_attached_value(&self) -> bool {
        self.after_eq
    }

    /// Arguments following a consumed `--`, empty if there was none.
    pub fn trailing(&self) -> &'a [S] {
        match self.dash_dash {
            Some(i) => &self.args[i..],
            None => &[],
        }
    }

    fn arg(&self, i: usize) -> &'a str {
        let args: &'a [S] = self.args;
        args[i].as_ref()
    }

    fn advance(&mut self) {
        self.idx += 1;
        self.offset = 0;
        self.after_eq = false;
    }

    #[cold]
    fn malformed(&self, idx: usize) -> Error {
        ErrorKind::MalformedArgument.with_input(self.arg(idx))
    }

    /// Advance by exactly one token.
    #[allow(clippy::should_implement_trait, reason = "not an iterator, see `Next`")]
    pub fn next(&mut self) -> Next<'a> {
        if let Some(idx) = self.latched {
            return Next::Error(self.malformed(idx));
        }
        if self.idx >= self.args.len() {
            return Next::EndOfInput;
        }
        let arg = self.arg(self.idx);

        if self.offset != 0 {
            // An empty `=` value the caller chose not to read.
            if self.offset == arg.len() {
                self.advance();
                return self.next();
            }
            return self.next_in_cluster(arg);
        }

        self.last = Some(self.idx);
        if self.dash_dash.is_some() {
            self.advance();
            return Next::Token(Token::Value(arg));
        }

        if let Some(rest) = arg.strip_prefix("--") {
            if rest.is_empty() {
                self.advance();
                self.dash_dash = Some(self.idx);
                return match self.policy {
                    DashDash::Stop => {
                        self.idx = self.args.len();
                        Next::EndOfInput
                    }
                    DashDash::Values => self.next(),
                };
            }
            let name = match rest.split_once('=') {
                Some((name, _)) => {
                    self.offset = 2 + name.len() + 1;
                    self.after_eq = true;
                    name
                }
                None => {
                    self.advance();
                    rest
                }
            };
            return Next::Token(Token::Long(name));
        }

        let Some(rest) = arg.strip_prefix('-') else {
            self.advance();
            return Next::Token(Token::Value(arg));
        };
        let Some(ch) = rest.chars().next() else {
            // Bare `-`, conventionally stdin.
            self.advance();
            return Next::Token(Token::Value(arg));
        };
        let end = 1 + ch.len_utf8();
        if end == arg.len() {
            self.advance();
        } else if arg[end..].starts_with('=') {
            self.offset = end + 1;
            self.after_eq = true;
        } else {
            self.offset = end;
        }
        Next::Token(Token::Short(ch))
    }

    fn next_in_cluster(&mut self, arg: &'a str) -> Next<'a> {
        let rest = &arg[self.offset..];
        if rest.starts_with("--") {
            self.latched = Some(self.idx);
            return Next::Error(self.malformed(self.idx));
        }
        let Some(ch) = rest.chars().next() else {
            self.advance();
            return self.next();
        };
        self.after_eq = false;
        self.offset += ch.len_utf8();
        if self.offset == arg.len() {
            self.advance();
        }
        Next::Token(Token::Short(ch))
    }

    /// Take the rest of the current argument as one value, whatever it looks like.
    pub fn value(&mut self) -> Result<&'a str> {
        if self.idx >= self.args.len() {
            return Err(self.missing_value());
        }
        let v = &self.arg(self.idx)[self.offset..];
        self.last = Some(self.idx);
        self.advance();
        Ok(v)
    }

    /// Take a run of values.
    ///
    /// If the cursor is inside an argument, only its remainder is taken.
    /// Otherwise the current argument is taken unconditionally, followed by
    /// every argument up to the next one starting with `-`.
    pub fn values(&mut self) -> Result<Vec<&'a str>> {
        if self.offset != 0 {
            return self.value().map(|v| vec![v]);
        }
        let mut out = vec![self.value()?];
        while let Some(arg) = self.args.get(self.idx).map(AsRef::as_ref) {
            if arg.starts_with('-') && self.dash_dash.is_none() {
                break;
            }
            out.push(arg);
            self.last = Some(self.idx);
            self.advance();
        }
        Ok(out)
    }

    /// "missing value after argument X", anchored at [`Self::last_arg`].
    #[cold]
    pub fn missing_value(&self) -> Error {
        Error::missing_value(self.last_arg().unwrap_or_default())
    }

    /// "unexpected argument X", anchored at [`Self::last_arg`].
    #[cold]
    pub fn unexpected(&self) -> Error {
        Error::unexpected_argument(self.last_arg().unwrap_or_default())
    }

    /// "error parsing argument X: cause", anchored at [`Self::last_arg`].
    #[cold]
    pub fn parse_error(&self, cause: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        Error::parse_failed(self.last_arg().unwrap_or_default(), cause)
    }
}
