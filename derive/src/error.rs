//! Diagnostics collection, so one expansion reports every problem at once.
use std::fmt::Display;

use proc_macro2::Span;

macro_rules! emit_error {
    ($errs:expr, $src:expr, $($tt:tt)+) => {
        $errs.push(syn::spanned::Spanned::span(&$src), format!($($tt)+))
    };
}

#[derive(Default)]
pub struct Errors(Option<syn::Error>);

impl Errors {
    pub fn push(&mut self, span: Span, msg: impl Display) {
        self.push_syn(syn::Error::new(span, msg));
    }

    pub fn push_syn(&mut self, err: syn::Error) {
        match &mut self.0 {
            Some(prev) => prev.combine(err),
            None => self.0 = Some(err),
        }
    }

    /// Record the error of `ret`, if any, and continue with `None`.
    pub fn try_syn<T>(&mut self, ret: syn::Result<T>) -> Option<T> {
        ret.map_err(|err| self.push_syn(err)).ok()
    }

    pub fn finish(self) -> syn::Result<()> {
        self.0.map_or(Ok(()), Err)
    }
}

// Hard error without fallback. `OptionSet` requires `'static` tables of `Self`.
pub fn check_no_generics(generics: &syn::Generics) -> syn::Result<()> {
    if generics.params.is_empty()
        && generics.where_clause.as_ref().is_none_or(|w| w.predicates.is_empty())
    {
        Ok(())
    } else {
        Err(syn::Error::new(Span::call_site(), "generics are not supported"))
    }
}
