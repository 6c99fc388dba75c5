extern crate proc_macro;

mod ast;
mod attr;
mod derive;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

///
/// Derives an implementation of [`EbmlMarshal`][marshal] and [`Field`][field] for a struct with named fields.
///
/// Every field becomes one EBML element, bound in declared order.  The element name defaults to the field's own identifier and can be changed with the `#[ebml(...)]` attribute:
///   * __#[ebml("ElementName")]__ - binds the field to the named element. e.g. `#[ebml("EBMLDocType")]`
///   * __#[ebml("ElementName", omitempty)]__ - additionally skips the element while encoding if the field holds its zero value
///   * __#[ebml(omitempty)]__ - keeps the default element name and skips zero values
///   * __#[ebml("Cluster", unknown_size)]__ - writes the master element with the reserved "unknown" size
///   * __#[ebml(skip)]__ - the field is not bound to any element and is never touched
///
/// ```ignore
/// #[derive(EbmlMarshal, Default)]
/// struct Header {
///     #[ebml("EBMLDocType")]
///     doc_type: String,
///     #[ebml("EBMLDocTypeVersion", omitempty)]
///     doc_type_version: u64,
/// }
/// ```
///
/// Field types must implement [`Field`][field].  Nested structs deriving `EbmlMarshal` are bound to master elements.
///
/// [marshal]: https://docs.rs/ebml-marshal/latest/ebml_marshal/trait.EbmlMarshal.html
/// [field]: https://docs.rs/ebml-marshal/latest/ebml_marshal/trait.Field.html

#[proc_macro_derive(EbmlMarshal, attributes(ebml))]
pub fn derive_ebml_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    derive::impl_ebml_marshal(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
