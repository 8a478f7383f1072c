use std::fmt;

pub(crate) type DynStdError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error raised while scanning arguments or handling their values.
///
/// The library never prints it. Binaries decide what to do, typically by
/// calling [`Error::exit`].
pub struct Error(Box<Inner>);

struct Inner {
    kind: ErrorKind,
    /// The offending raw argument, as written on the command line.
    input: Option<String>,
    source: Option<DynStdError>,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An option wants a value but the argument list is exhausted.
    MissingValue,
    /// No known option or positional slot accepts this argument.
    UnexpectedArgument,
    /// A flag got a value attached with `=`.
    UnexpectedValue,
    /// A flag-looking sequence appeared inside a short option cluster.
    ///
    /// The input is the whole argument holding the cluster, e.g. `-a--b`.
    MalformedArgument,
    /// A value failed to convert into the requested type.
    InvalidValue,
    /// A single-use option appeared more than once.
    DuplicatedArgument,
    /// A process argument is not valid UTF-8.
    InvalidUtf8,
}

impl ErrorKind {
    pub(crate) fn with_input(self, input: impl Into<String>) -> Error {
        Error::from(self).with_input(input)
    }
}

impl From<ErrorKind> for Error {
    #[cold]
    fn from(kind: ErrorKind) -> Self {
        Self(Box::new(Inner { kind, input: None, source: None }))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.0.kind)
            .field("input", &self.0.input)
            .field("source", &self.0.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg = self.0.input.as_deref().unwrap_or("");
        match self.0.kind {
            ErrorKind::MissingValue => write!(f, "missing value after argument '{arg}'"),
            ErrorKind::UnexpectedArgument => write!(f, "unexpected argument '{arg}'"),
            ErrorKind::UnexpectedValue => write!(f, "unexpected value for argument '{arg}'"),
            ErrorKind::MalformedArgument => write!(f, "malformed argument '{arg}'"),
            ErrorKind::InvalidValue => {
                write!(f, "error parsing argument '{arg}'")?;
                if let Some(src) = &self.0.source {
                    write!(f, ": {src}")?;
                }
                Ok(())
            }
            ErrorKind::DuplicatedArgument => write!(f, "duplicated argument '{arg}'"),
            ErrorKind::InvalidUtf8 => write!(f, "invalid UTF-8 in argument '{arg}'"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&**self.0.source.as_ref()?)
    }
}

impl Error {
    /// "missing value after argument `arg`".
    pub fn missing_value(arg: impl Into<String>) -> Self {
        ErrorKind::MissingValue.with_input(arg)
    }

    /// "unexpected argument `arg`".
    pub fn unexpected_argument(arg: impl Into<String>) -> Self {
        ErrorKind::UnexpectedArgument.with_input(arg)
    }

    /// "error parsing argument `arg`: `cause`".
    pub fn parse_failed(
        arg: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ErrorKind::InvalidValue.with_input(arg).with_source(cause.into())
    }

    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }

    /// The raw argument this error is about, if known.
    pub fn input(&self) -> Option<&str> {
        self.0.input.as_deref()
    }

    pub(crate) fn with_input(mut self, input: impl Into<String>) -> Self {
        self.0.input = Some(input.into());
        self
    }

    pub(crate) fn with_source(mut self, source: DynStdError) -> Self {
        self.0.source = Some(source);
        self
    }

    /// Attach `arg` as the offending argument unless one is already set.
    ///
    /// Value conversions only see the value itself; the dispatch loop uses
    /// this to point the message at the option instead.
    #[must_use]
    pub fn with_arg_if_missing(self, arg: &str) -> Self {
        if self.0.input.is_some() { self } else { self.with_input(arg) }
    }

    /// Print this error to stderr and exit the process with status 2.
    pub fn exit(&self) -> ! {
        eprintln!("error: {self}");
        std::process::exit(2)
    }
}
