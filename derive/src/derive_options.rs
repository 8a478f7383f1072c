use std::collections::HashMap;

use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Ident};

use crate::common::{ArityMeta, OptMeta, Override, wrap_anon_item};
use crate::error::{Errors, check_no_generics};

pub(crate) fn expand(input: &DeriveInput) -> TokenStream {
    if let Err(err) = check_no_generics(&input.generics) {
        return err.to_compile_error();
    }

    let mut tts = match expand_impl(input) {
        Ok(tts) => return wrap_anon_item(tts),
        Err(err) => err.to_compile_error(),
    };

    // An empty table keeps uses of the type from piling up more errors.
    tts.extend(wrap_anon_item(OptionsImpl { ident: &input.ident, options: Vec::new() }));
    tts
}

fn expand_impl(def: &DeriveInput) -> syn::Result<OptionsImpl<'_>> {
    let syn::Data::Enum(enum_def) = &def.data else {
        return Err(syn::Error::new(Span::call_site(), "derive(Options) can only be used on enums"));
    };

    let mut errs = Errors::default();
    let mut options = Vec::with_capacity(enum_def.variants.len());
    let mut shorts = HashMap::<char, Span>::new();
    let mut longs = HashMap::<String, Span>::new();
    let mut positional = None::<&Ident>;

    for variant in &enum_def.variants {
        let ident = &variant.ident;
        if !matches!(variant.fields, syn::Fields::Unit) {
            errs.push(ident.span(), "only unit variant is supported");
            continue;
        }
        let meta = OptMeta::parse_attrs(&variant.attrs, &mut errs);
        let kebab = heck::AsKebabCase(ident.unraw().to_string()).to_string();

        let short = meta.short.map(|short| match short {
            Override::Explicit(c) => (c.value(), c.span()),
            Override::Inherit => (kebab.chars().next().unwrap(), ident.span()),
        });
        if let Some((c, span)) = short {
            if c == '-' || c.is_whitespace() || c.is_control() {
                errs.push(span, format!("invalid short option character {c:?}"));
            } else if let Some(prev) = shorts.insert(c, span) {
                errs.push(span, format!("duplicated short option `-{c}`"));
                errs.push(prev, "first defined here");
            }
        }

        let long = meta.long.map(|long| match long {
            Override::Explicit(s) => (s.value(), s.span()),
            Override::Inherit => (kebab.clone(), ident.span()),
        });
        if let Some((name, span)) = &long {
            if name.is_empty() || name.starts_with('-') || name.contains('=') {
                errs.push(*span, format!("invalid long option name {name:?}"));
            } else if let Some(prev) = longs.insert(name.clone(), *span) {
                errs.push(*span, format!("duplicated long option `--{name}`"));
                errs.push(prev, "first defined here");
            }
        }

        let (arity, arity_span) = meta.arity;
        if short.is_none() && long.is_none() {
            if let Some(span) = arity_span {
                errs.push(span, "positional variant cannot take `value` or `values`");
            }
            if let Some(prev) = positional.replace(ident) {
                errs.push(ident.span(), "at most one positional variant is allowed");
                errs.push(prev.span(), "first positional variant here");
            }
        }

        options.push(Opt {
            ident,
            short: short.map(|(c, _)| c),
            long: long.map(|(s, _)| s),
            arity,
            help: meta.help,
        });
    }

    errs.finish()?;
    Ok(OptionsImpl { ident: &def.ident, options })
}

struct OptionsImpl<'i> {
    ident: &'i Ident,
    options: Vec<Opt<'i>>,
}

struct Opt<'i> {
    ident: &'i Ident,
    short: Option<char>,
    long: Option<String>,
    arity: ArityMeta,
    help: Option<String>,
}

fn quote_option<T: ToTokens>(v: Option<T>) -> TokenStream {
    match v {
        Some(v) => quote! { __rt::Some(#v) },
        None => quote! { __rt::None },
    }
}

impl ToTokens for Opt<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ident = self.ident;
        let short = quote_option(self.short);
        let long = quote_option(self.long.as_deref());
        let help = quote_option(self.help.as_deref());
        let arity = match self.arity {
            ArityMeta::Flag => quote! { __rt::Arity::Flag },
            ArityMeta::One => quote! { __rt::Arity::One },
            ArityMeta::Many => quote! { __rt::Arity::Many },
        };
        tokens.extend(quote! {
            __rt::OptionDesc {
                id: Self::#ident,
                short: #short,
                long: #long,
                arity: #arity,
                help: #help,
            }
        });
    }
}

impl ToTokens for OptionsImpl<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let name = self.ident;
        let options = &self.options;
        tokens.extend(quote! {
            #[automatically_derived]
            impl __rt::OptionSet for #name {
                const OPTIONS: &'static [__rt::OptionDesc<Self>] = &[#(#options),*];
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn errors(input: DeriveInput) -> Vec<String> {
        match expand_impl(&input) {
            Ok(_) => Vec::new(),
            Err(err) => err.into_iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn names_and_help() {
        let input: DeriveInput = parse_quote! {
            enum Opt {
                /// Ignore case.
                ///
                /// Dropped.
                #[opt(short, long)]
                IgnoreCase,
                #[opt(short = 'N', long = "num", value)]
                Number,
                #[opt(long, values)]
                r#Type,
                Path,
            }
        };
        let imp = expand_impl(&input).unwrap();
        let got = imp
            .options
            .iter()
            .map(|o| (o.short, o.long.as_deref(), o.arity, o.help.as_deref()))
            .collect::<Vec<_>>();
        assert!(
            got == [
                (Some('i'), Some("ignore-case"), ArityMeta::Flag, Some("Ignore case.")),
                (Some('N'), Some("num"), ArityMeta::One, None),
                (None, Some("type"), ArityMeta::Many, None),
                (None, None, ArityMeta::Flag, None),
            ]
        );
    }

    #[test]
    fn unsupported_data() {
        let input: DeriveInput = parse_quote! { struct Unit; };
        assert_eq!(errors(input), ["derive(Options) can only be used on enums"]);

        let input: DeriveInput = parse_quote! {
            enum Opt {
                #[opt(long)]
                Tuple(u8),
                #[opt(long)]
                Named { a: u8 },
            }
        };
        assert_eq!(errors(input), ["only unit variant is supported"; 2]);

        let input: DeriveInput = parse_quote! { enum Opt<T> { A } };
        let err = check_no_generics(&input.generics).unwrap_err();
        assert_eq!(err.to_string(), "generics are not supported");
    }

    #[test]
    fn invalid_names() {
        let input: DeriveInput = parse_quote! {
            enum Opt {
                #[opt(long = "")]
                LongEmpty,
                #[opt(long = "-foo")]
                LongDash,
                #[opt(long = "a=b")]
                LongEq,
                #[opt(short = '-')]
                ShortDash,
                #[opt(short = ' ')]
                ShortSpace,
                #[opt(short = '\0')]
                ShortControl,
            }
        };
        assert_eq!(
            errors(input),
            [
                r#"invalid long option name """#,
                r#"invalid long option name "-foo""#,
                r#"invalid long option name "a=b""#,
                "invalid short option character '-'",
                "invalid short option character ' '",
                r"invalid short option character '\0'",
            ]
        );
    }

    #[test]
    fn duplicates() {
        let input: DeriveInput = parse_quote! {
            enum Opt {
                #[opt(short, long)]
                Verbose,
                #[opt(short, long = "verbose")]
                Version,
                #[opt(short = 'x', short = 'y', long)]
                Twice,
                #[opt(long, value, values)]
                Arity,
                #[opt(lnog)]
                Typo,
            }
        };
        assert_eq!(
            errors(input),
            [
                "duplicated short option `-v`",
                "first defined here",
                "duplicated long option `--verbose`",
                "first defined here",
                "duplicated attribute",
                "duplicated attribute",
                "unknown attribute",
            ]
        );
    }

    #[test]
    fn positional() {
        let input: DeriveInput = parse_quote! {
            enum Opt {
                #[opt(short)]
                Quiet,
                #[opt(value)]
                File,
                Rest,
            }
        };
        assert_eq!(
            errors(input),
            [
                "positional variant cannot take `value` or `values`",
                "at most one positional variant is allowed",
                "first positional variant here",
            ]
        );
    }
}
