//! Value conversions and storage places for matched options.
use std::path::Path;
use std::str::FromStr;

use ref_cast::RefCast;

use crate::Result;
use crate::dispatch::Values;
use crate::error::{DynStdError, Error, ErrorKind};
use crate::tokenizer::Tokenizer;

mod sealed {
    pub trait Sealed {}
}

/// Primitive integers parsable by [`parse_int`].
pub trait Int: Sized + sealed::Sealed {
    #[doc(hidden)]
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
}

macro_rules! impl_int {
    ($($ty:ty),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Int for $ty {
                fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
                    <$ty>::from_str_radix(s, radix)
                }
            }
        )*
    };
}

impl_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Parse an integer in base `radix`.
///
/// `radix` must be `0` or in `2..=36`. With `0`, the base is detected from a
/// `0x`, `0o` or `0b` prefix after the optional sign, defaulting to 10.
pub fn parse_int<T: Int>(s: &str, radix: u32) -> Result<T> {
    assert!(radix == 0 || (2..=36).contains(&radix), "invalid radix {radix}");
    let ret = if radix != 0 {
        T::from_str_radix(s, radix)
    } else {
        let (sign, unsigned) = match s.as_bytes().first() {
            Some(b'-' | b'+') => s.split_at(1),
            _ => ("", s),
        };
        let (radix, digits) = match unsigned.get(..2) {
            Some("0x" | "0X") => (16, &unsigned[2..]),
            Some("0o" | "0O") => (8, &unsigned[2..]),
            Some("0b" | "0B") => (2, &unsigned[2..]),
            _ => (10, unsigned),
        };
        if digits.is_empty() {
            return Err(Error::parse_failed(s, "cannot parse integer from empty string"));
        }
        // `from_str_radix` accepts its own sign, which must not follow ours or the prefix.
        if digits.starts_with(['+', '-']) {
            return Err(Error::parse_failed(s, "invalid digit found in string"));
        }
        if sign == "-" {
            T::from_str_radix(&format!("-{digits}"), radix)
        } else {
            T::from_str_radix(digits, radix)
        }
    };
    ret.map_err(|err| Error::parse_failed(s, err))
}

/// Borrow a value as a filesystem path. Empty paths are rejected.
pub fn parse_path(s: &str) -> Result<&Path> {
    if s.is_empty() {
        return Err(Error::parse_failed(s, "empty path"));
    }
    Ok(Path::new(s))
}

/// Parse a value via [`FromStr`].
pub fn parse<T>(s: &str) -> Result<T>
where
    T: FromStr<Err: Into<DynStdError>>,
{
    s.parse::<T>().map_err(|err| ErrorKind::InvalidValue.with_input(s).with_source(err.into()))
}

impl<'a, S: AsRef<str>> Tokenizer<'a, S> {
    /// [`Self::value`] followed by [`parse_int`], reporting at [`Self::last_arg`].
    pub fn value_int<T: Int>(&mut self, radix: u32) -> Result<T> {
        let v = self.value()?;
        parse_int(v, radix).map_err(|err| self.reanchor(err))
    }

    /// [`Self::value`] followed by [`parse_path`], reporting at [`Self::last_arg`].
    pub fn value_path(&mut self) -> Result<&'a Path> {
        let v = self.value()?;
        parse_path(v).map_err(|err| self.reanchor(err))
    }

    /// [`Self::value`] followed by [`parse`], reporting at [`Self::last_arg`].
    pub fn value_parsed<T>(&mut self) -> Result<T>
    where
        T: FromStr<Err: Into<DynStdError>>,
    {
        let v = self.value()?;
        parse(v).map_err(|err| self.reanchor(err))
    }

    fn reanchor(&self, err: Error) -> Error {
        match self.last_arg() {
            Some(arg) => err.with_input(arg),
            None => err,
        }
    }
}

/// A caller-owned slot accepting the values of a matched option.
pub trait ValuePlace {
    fn feed(&mut self, values: &Values<'_>) -> Result<()>;
}

/// Set to `true` on the first occurrence. A repeated flag is an error.
pub fn place_for_flag(place: &mut Option<bool>) -> &mut dyn ValuePlace {
    #[derive(RefCast)]
    #[repr(transparent)]
    struct Place(Option<bool>);

    impl ValuePlace for Place {
        fn feed(&mut self, _: &Values<'_>) -> Result<()> {
            if self.0.is_some() {
                return Err(ErrorKind::DuplicatedArgument.into());
            }
            self.0 = Some(true);
            Ok(())
        }
    }

    Place::ref_cast_mut(place)
}

/// Count occurrences, saturating at `u8::MAX`.
pub fn place_for_counter(place: &mut u8) -> &mut dyn ValuePlace {
    #[derive(RefCast)]
    #[repr(transparent)]
    struct Place(u8);

    impl ValuePlace for Place {
        fn feed(&mut self, _: &Values<'_>) -> Result<()> {
            self.0 = self.0.saturating_add(1);
            Ok(())
        }
    }

    Place::ref_cast_mut(place)
}

/// Parse exactly one value into an empty slot. A second occurrence is an error.
pub fn place_for_value<T>(place: &mut Option<T>) -> &mut dyn ValuePlace
where
    T: FromStr<Err: Into<DynStdError>>,
{
    #[derive(RefCast)]
    #[repr(transparent)]
    struct Place<T>(Option<T>);

    impl<T> ValuePlace for Place<T>
    where
        T: FromStr<Err: Into<DynStdError>>,
    {
        fn feed(&mut self, values: &Values<'_>) -> Result<()> {
            if self.0.is_some() {
                return Err(ErrorKind::DuplicatedArgument.into());
            }
            let v = match values.as_slice() {
                [v] => v,
                [] => return Err(ErrorKind::MissingValue.into()),
                [_, extra, ..] => return Err(ErrorKind::UnexpectedArgument.with_input(*extra)),
            };
            self.0 = Some(parse(v)?);
            Ok(())
        }
    }

    Place::<T>::ref_cast_mut(place)
}

/// Parse and append every value. Occurrences accumulate.
pub fn place_for_vec<T>(place: &mut Vec<T>) -> &mut dyn ValuePlace
where
    T: FromStr<Err: Into<DynStdError>>,
{
    #[derive(RefCast)]
    #[repr(transparent)]
    struct Place<T>(Vec<T>);

    impl<T> ValuePlace for Place<T>
    where
        T: FromStr<Err: Into<DynStdError>>,
    {
        fn feed(&mut self, values: &Values<'_>) -> Result<()> {
            let values = values.as_slice();
            self.0.reserve(values.len());
            for v in values {
                self.0.push(parse(v)?);
            }
            Ok(())
        }
    }

    Place::<T>::ref_cast_mut(place)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn int_radix() {
        assert_eq!(parse_int::<u8>("ff", 16).unwrap(), 255);
        assert_eq!(parse_int::<i32>("-101", 2).unwrap(), -5);
        assert_eq!(parse_int::<u16>("0x1F", 0).unwrap(), 31);
        assert_eq!(parse_int::<i64>("-0o17", 0).unwrap(), -15);
        assert_eq!(parse_int::<i8>("+0b11", 0).unwrap(), 3);
        assert_eq!(parse_int::<usize>("42", 0).unwrap(), 42);

        let err = parse_int::<u8>("256", 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert_eq!(err.input(), Some("256"));
        assert!(parse_int::<u32>("-1", 0).is_err());
        assert!(parse_int::<u32>("0x", 0).is_err());
        for s in ["+-5", "-+5", "0x-5", "0x+5", "-0b-1", "+", "-"] {
            let err = parse_int::<i32>(s, 0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "{s}");
            assert_eq!(err.input(), Some(s));
        }
    }

    #[test]
    #[should_panic = "invalid radix"]
    fn int_bad_radix() {
        let _ = parse_int::<u8>("1", 1);
    }

    #[test]
    fn path() {
        assert_eq!(parse_path("a/b").unwrap(), Path::new("a/b"));
        assert_eq!(parse_path("").unwrap_err().kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn tokenizer_shortcuts() {
        let mut t = Tokenizer::new(&["prog", "-n=0x10", "-p", "out", "-n", "x"]);
        assert!(t.next().into_result().unwrap().is_some());
        assert_eq!(t.value_int::<u32>(0).unwrap(), 16);
        assert!(t.next().into_result().unwrap().is_some());
        assert_eq!(t.value_path().unwrap(), Path::new("out"));
        assert!(t.next().into_result().unwrap().is_some());
        let err = t.value_parsed::<u32>().unwrap_err();
        assert_eq!(err.input(), Some("x"));
        assert!(err.to_string().starts_with("error parsing argument 'x': "));
    }

    #[test]
    fn places() {
        let mut flag = None;
        place_for_flag(&mut flag).feed(&Values::None).unwrap();
        assert_eq!(flag, Some(true));
        let err = place_for_flag(&mut flag).feed(&Values::None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatedArgument);

        let mut cnt = 254u8;
        for _ in 0..3 {
            place_for_counter(&mut cnt).feed(&Values::None).unwrap();
        }
        assert_eq!(cnt, 255);

        let mut path = None::<PathBuf>;
        place_for_value(&mut path).feed(&Values::One("a.txt")).unwrap();
        assert_eq!(path.as_deref(), Some(Path::new("a.txt")));
        let err = place_for_value(&mut path).feed(&Values::One("b.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicatedArgument);

        let mut num = None::<u32>;
        let err = place_for_value(&mut num).feed(&Values::Many(vec!["1", "2"])).unwrap_err();
        assert_eq!(err.input(), Some("2"));

        let mut nums = Vec::<i32>::new();
        place_for_vec(&mut nums).feed(&Values::Many(vec!["1", "-2"])).unwrap();
        place_for_vec(&mut nums).feed(&Values::One("3")).unwrap();
        assert_eq!(nums, [1, -2, 3]);
        assert!(place_for_vec(&mut nums).feed(&Values::One("x")).is_err());
    }
}
