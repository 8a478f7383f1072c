use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::meta::ParseNestedMeta;
use syn::parse::{Parse, ParseStream};
use syn::spanned::Spanned;
use syn::{Attribute, LitChar, LitStr, Token};

use crate::error::Errors;

pub fn wrap_anon_item(tts: impl ToTokens) -> TokenStream {
    quote! {
        const _: () = {
            use ::argscan::__private as __rt;
            #tts
        };
    }
}

trait OptionExt<T> {
    fn set_once(&mut self, errs: &mut Errors, span: Span, v: T);
}
impl<T> OptionExt<T> for Option<T> {
    fn set_once(&mut self, errs: &mut Errors, span: Span, v: T) {
        if self.is_none() {
            *self = Some(v);
        } else {
            errs.push(span, "duplicated attribute");
        }
    }
}

/// `key` or `key = VALUE`.
pub enum Override<T> {
    Inherit,
    Explicit(T),
}

impl<T: Parse> Parse for Override<T> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            Self::Explicit(input.parse()?)
        } else {
            Self::Inherit
        })
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum ArityMeta {
    Flag,
    One,
    Many,
}

/// Variant `#[opt]` and doc-comments for `derive(Options)`.
pub struct OptMeta {
    pub short: Option<Override<LitChar>>,
    pub long: Option<Override<LitStr>>,
    /// The span of `value`/`values`, if present.
    pub arity: (ArityMeta, Option<Span>),
    pub help: Option<String>,
}

impl OptMeta {
    pub fn parse_attrs(attrs: &[Attribute], errs: &mut Errors) -> Self {
        let mut this = Self { short: None, long: None, arity: (ArityMeta::Flag, None), help: None };
        let mut doc = String::new();
        for attr in attrs {
            if attr.path().is_ident("doc") {
                collect_doc_line(&mut doc, attr, errs);
            } else if attr.path().is_ident("opt") {
                let ret = attr.parse_nested_meta(|meta| this.parse_update(&meta, errs));
                errs.try_syn(ret);
            }
        }
        let doc = doc.trim_ascii_end();
        if !doc.is_empty() {
            this.help = Some(doc.to_owned());
        }
        this
    }

    fn parse_update(&mut self, meta: &ParseNestedMeta<'_>, errs: &mut Errors) -> syn::Result<()> {
        let path = &meta.path;
        let span = path.span();
        if path.is_ident("short") {
            self.short.set_once(errs, span, meta.input.parse()?);
        } else if path.is_ident("long") {
            self.long.set_once(errs, span, meta.input.parse()?);
        } else if path.is_ident("value") || path.is_ident("values") {
            let arity = if path.is_ident("value") { ArityMeta::One } else { ArityMeta::Many };
            if self.arity.1.is_some() {
                errs.push(span, "duplicated attribute");
            }
            self.arity = (arity, Some(span));
        } else {
            emit_error!(errs, path, "unknown attribute");
        }
        Ok(())
    }
}

/// Only the first paragraph of doc-comments is kept, joined by spaces.
fn collect_doc_line(out: &mut String, attr: &Attribute, errs: &mut Errors) {
    let syn::Meta::NameValue(m) = &attr.meta else { return };
    let syn::Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(s), .. }) = &m.value else {
        emit_error!(errs, m.value, "only literal doc comment is supported yet");
        return;
    };
    let s = s.value();
    let s = s.trim_ascii();
    if s.is_empty() {
        // Paragraph break. Later lines are ignored by marking the end.
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
    } else if !out.ends_with('\n') {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(s);
    }
}
