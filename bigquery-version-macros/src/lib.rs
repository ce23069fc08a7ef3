extern crate proc_macro;

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    parse_macro_input, Ident, Item, LitInt, LitStr, Token,
};

// These must agree with the constants of the same name in bigquery-version.
const MAX_MINOR_VERSIONS: u32 = 100;
const MAX_PATCH_VERSIONS: u32 = 100;

/// One numeric version component along with the span it came from, so that
/// range errors point at the offending literal.
#[derive(Clone, Copy)]
struct Component {
    value: u32,
    span: Span,
}

fn parse_component(input: ParseStream, name: &str) -> syn::Result<Component> {
    let id = input.parse::<Ident>()?;
    if id != name {
        return Err(syn::Error::new(id.span(), format!("expected `{name}`")));
    }
    input.parse::<Token![:]>()?;
    let lit = input.parse::<LitInt>()?;
    Ok(Component {
        value: lit.base10_parse()?,
        span: lit.span(),
    })
}

// Cargo exports the package version of the crate being compiled to rustc, and
// from there to every proc macro it expands.
fn cargo_var(var: &str) -> syn::Result<String> {
    std::env::var(var).map_err(|_| {
        syn::Error::new(
            Span::call_site(),
            format!("{var} is not set, pass the version explicitly or build with cargo"),
        )
    })
}

fn cargo_component(var: &str) -> syn::Result<Component> {
    let raw = cargo_var(var)?;
    let value = raw.parse::<u32>().map_err(|e| {
        syn::Error::new(Span::call_site(), format!("{var}={raw:?} is not a u32: {e}"))
    })?;
    Ok(Component {
        value,
        span: Span::call_site(),
    })
}

fn check_minor(minor: Component) -> syn::Result<()> {
    if minor.value >= MAX_MINOR_VERSIONS {
        return Err(syn::Error::new(
            minor.span,
            format!(
                "version minor {} must be < {MAX_MINOR_VERSIONS}, \
                 the encoded version would collide with another release",
                minor.value
            ),
        ));
    }
    Ok(())
}

fn check_patch(patch: Component) -> syn::Result<()> {
    if patch.value >= MAX_PATCH_VERSIONS {
        return Err(syn::Error::new(
            patch.span,
            format!(
                "version patch {} must be < {MAX_PATCH_VERSIONS}, \
                 the encoded version would collide with another release",
                patch.value
            ),
        ));
    }
    Ok(())
}

fn encode(major: Component, minor: Component, patch: Component) -> syn::Result<u32> {
    major
        .value
        .checked_mul(MAX_MINOR_VERSIONS)
        .and_then(|v| v.checked_add(minor.value))
        .and_then(|v| v.checked_mul(MAX_PATCH_VERSIONS))
        .and_then(|v| v.checked_add(patch.value))
        .ok_or_else(|| {
            syn::Error::new(
                major.span,
                format!("version major {} does not fit the u32 encoding", major.value),
            )
        })
}

/// Pre-release labels are dot-separated identifiers of ASCII letters and
/// digits, and numeric identifiers carry no leading zero. Hyphens are
/// rejected even though semver allows them, the string form stays
/// unambiguous to simple parsers that split on `-`.
fn check_pre_release(pre: &str, span: Span) -> syn::Result<()> {
    if pre.is_empty() {
        return Ok(());
    }
    let ok = pre
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()));
    if !ok {
        return Err(syn::Error::new(
            span,
            format!("pre-release label {pre:?} must be dot-separated [0-9A-Za-z] identifiers"),
        ));
    }
    let leading_zero = pre.split('.').find(|part| {
        part.len() > 1 && part.starts_with('0') && part.bytes().all(|b| b.is_ascii_digit())
    });
    if let Some(part) = leading_zero {
        return Err(syn::Error::new(
            span,
            format!("pre-release identifier {part:?} in {pre:?} is numeric with a leading zero"),
        ));
    }
    Ok(())
}

struct MetaInput {
    major: Component,
    minor: Component,
    patch: Component,
    pre_release: String,
    pre_release_span: Span,
}

impl MetaInput {
    fn from_cargo_env() -> syn::Result<Self> {
        Ok(MetaInput {
            major: cargo_component("CARGO_PKG_VERSION_MAJOR")?,
            minor: cargo_component("CARGO_PKG_VERSION_MINOR")?,
            patch: cargo_component("CARGO_PKG_VERSION_PATCH")?,
            pre_release: cargo_var("CARGO_PKG_VERSION_PRE")?,
            pre_release_span: Span::call_site(),
        })
    }
}

impl Parse for MetaInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return MetaInput::from_cargo_env();
        }
        let major = parse_component(input, "major")?;
        input.parse::<Token![,]>()?;
        let minor = parse_component(input, "minor")?;
        input.parse::<Token![,]>()?;
        let patch = parse_component(input, "patch")?;
        input.parse::<Token![,]>()?;
        let (pre_release, pre_release_span) = {
            let id = input.parse::<Ident>()?;
            if id != "pre_release" {
                return Err(syn::Error::new(id.span(), "expected `pre_release`"));
            }
            input.parse::<Token![:]>()?;
            let lit = input.parse::<LitStr>()?;
            (lit.value(), lit.span())
        };
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        Ok(MetaInput {
            major,
            minor,
            patch,
            pre_release,
            pre_release_span,
        })
    }
}

struct MetaConstsOutput {
    input: MetaInput,
    encoded: u32,
}

impl MetaConstsOutput {
    fn new(input: MetaInput) -> syn::Result<Self> {
        check_minor(input.minor)?;
        check_patch(input.patch)?;
        check_pre_release(&input.pre_release, input.pre_release_span)?;
        let encoded = encode(input.major, input.minor, input.patch)?;
        Ok(MetaConstsOutput { input, encoded })
    }

    fn version_core(&self) -> String {
        let i = &self.input;
        let mut s = format!("{}.{}.{}", i.major.value, i.minor.value, i.patch.value);
        if !i.pre_release.is_empty() {
            s.push('-');
            s.push_str(&i.pre_release);
        }
        s
    }
}

impl ToTokens for MetaConstsOutput {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let major = self.input.major.value;
        let minor = self.input.minor.value;
        let patch = self.input.patch.value;
        let pre_release = &self.input.pre_release;
        let encoded = self.encoded;
        let core = self.version_core();
        let namespace = format!("v{major}_{minor}");

        tokens.extend(quote! {
            pub const VERSION_MAJOR: u32 = #major;
            pub const VERSION_MINOR: u32 = #minor;
            pub const VERSION_PATCH: u32 = #patch;
            pub const VERSION_PRE_RELEASE: &str = #pre_release;
            pub const VERSION: u32 = #encoded;
            pub const VERSION_CORE: &str = #core;
            pub const NAMESPACE: &str = #namespace;
        });
    }
}

/// Bakes the library version into constants.
///
/// With no arguments the version of the package being compiled is used.
/// Explicit values are accepted as
/// `generate_version_consts!(major: 2, minor: 37, patch: 0, pre_release: "")`.
///
/// A minor or patch component of 100 or more is a build error, as is a major
/// component whose encoding overflows `u32`.
#[proc_macro]
pub fn generate_version_consts(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let meta_input = parse_macro_input!(input as MetaInput);
    match MetaConstsOutput::new(meta_input) {
        Ok(output) => quote! { #output }.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct NamespaceInput {
    major: Component,
    minor: Component,
    items: Vec<Item>,
}

fn starts_with_header(input: ParseStream) -> bool {
    input
        .fork()
        .parse::<Ident>()
        .map(|id| id == "major")
        .unwrap_or(false)
}

impl Parse for NamespaceInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let (major, minor) = if starts_with_header(input) {
            let major = parse_component(input, "major")?;
            input.parse::<Token![,]>()?;
            let minor = parse_component(input, "minor")?;
            input.parse::<Token![;]>()?;
            (major, minor)
        } else {
            (
                cargo_component("CARGO_PKG_VERSION_MAJOR")?,
                cargo_component("CARGO_PKG_VERSION_MINOR")?,
            )
        };
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse::<Item>()?);
        }
        Ok(NamespaceInput {
            major,
            minor,
            items,
        })
    }
}

/// Declares `items` inside a module named `v{MAJOR}_{MINOR}` and re-exports
/// them from the enclosing module.
///
/// Callers normally spell the short path; the qualified path exists for code
/// that must pin a specific release. The patch component never appears in the
/// module name, patch releases of one minor version are interchangeable.
///
/// The version defaults to the package being compiled, an explicit
/// `major: M, minor: m;` header overrides it.
#[proc_macro]
pub fn inline_namespace(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let NamespaceInput {
        major,
        minor,
        items,
    } = parse_macro_input!(input as NamespaceInput);
    if let Err(e) = check_minor(minor) {
        return e.to_compile_error().into();
    }
    let ns = format_ident!("v{}_{}", major.value, minor.value);
    let doc = format!(
        "Items of release {}.{}.x. Prefer the unqualified paths of the enclosing module.",
        major.value, minor.value
    );
    quote! {
        #[doc = #doc]
        pub mod #ns {
            #[allow(unused_imports)]
            use super::*;

            #(#items)*
        }

        #[doc(inline)]
        pub use self::#ns::*;
    }
    .into()
}
