mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait (and [`std::fmt::Display`]) for the given struct.
///
/// The information of the error is customized using the `error` attribute:
///
/// ```ignore
/// use dervish_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("unrecognized token `{}`", token),
///     labels = ["this character"],
///     help = "remove it or declare it as a variable",
/// )]
/// pub struct UnrecognizedToken {
///     pub token: String,
/// }
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                 |
/// | --------- | --------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the error. Also used for `Display`.     |
/// | `labels`  | An iterable of label texts, one per span of the error, in order.            |
/// | `help`    | Optional help text describing what the user can do to fix the error.        |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the fields of the struct in scope. Tuple structs are not supported.
///
/// The generated code refers to the `ariadne` and `dervish_error` crates, which must be
/// dependencies of the crate using the derive.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    quote! { #target }.into()
}
