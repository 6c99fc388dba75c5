use proc_macro2::TokenStream;
use syn::{DeriveInput, Result};
use quote::quote;

use super::ast::Struct;

pub fn impl_ebml_marshal(ast: &DeriveInput) -> Result<TokenStream> {
    let input = Struct::from_syn(ast)?;
    let ty = input.ident;

    let field_specs = input.fields.iter().map(|field| {
        let name = field.member.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name);
        let element = &field.attributes.element;
        let omit_empty = field.attributes.omit_empty;
        let unknown_size = field.attributes.unknown_size;
        let field_ty = field.ty;

        quote! {
            ::ebml_marshal::FieldSpec {
                field: #name,
                element: #element,
                omit_empty: #omit_empty,
                unknown_size: #unknown_size,
                repeated: <#field_ty as ::ebml_marshal::Field>::REPEATED,
            }
        }
    });

    let is_empty_arms = input.fields.iter().enumerate().map(|(index, field)| {
        let member = field.member;
        quote! {
            #index => ::ebml_marshal::Field::is_empty(&self.#member),
        }
    });

    let encode_arms = input.fields.iter().enumerate().map(|(index, field)| {
        let member = field.member;
        quote! {
            #index => ::ebml_marshal::Field::encode(&self.#member, binding, encoder, out),
        }
    });

    let decode_arms = input.fields.iter().enumerate().map(|(index, field)| {
        let member = field.member;
        quote! {
            #index => ::ebml_marshal::Field::decode(&mut self.#member, binding, header, decoder),
        }
    });

    Ok(quote! {
        impl ::ebml_marshal::EbmlMarshal for #ty {
            fn fields() -> &'static [::ebml_marshal::FieldSpec] {
                const FIELDS: &[::ebml_marshal::FieldSpec] = &[#(#field_specs),*];
                FIELDS
            }

            fn field_is_empty(&self, index: usize) -> bool {
                match index {
                    #(#is_empty_arms)*
                    _ => true,
                }
            }

            #[allow(unused_variables)]
            fn encode_field(
                &self,
                index: usize,
                binding: &::ebml_marshal::FieldBinding<'_>,
                encoder: &::ebml_marshal::Encoder<'_>,
                out: &mut ::std::vec::Vec<u8>,
            ) -> ::std::result::Result<(), ::ebml_marshal::error::EncodeError> {
                match index {
                    #(#encode_arms)*
                    _ => ::std::result::Result::Ok(()),
                }
            }

            #[allow(unused_variables)]
            fn decode_field(
                &mut self,
                index: usize,
                binding: &::ebml_marshal::FieldBinding<'_>,
                header: &::ebml_marshal::ElementHeader,
                decoder: &mut ::ebml_marshal::Decoder<'_, '_>,
            ) -> ::std::result::Result<(), ::ebml_marshal::error::DecodeError> {
                match index {
                    #(#decode_arms)*
                    _ => decoder.skip_element(header),
                }
            }
        }

        impl ::ebml_marshal::Field for #ty {
            fn is_empty(&self) -> bool {
                ::ebml_marshal::EbmlMarshal::is_zero(self)
            }

            fn encode(
                &self,
                binding: &::ebml_marshal::FieldBinding<'_>,
                encoder: &::ebml_marshal::Encoder<'_>,
                out: &mut ::std::vec::Vec<u8>,
            ) -> ::std::result::Result<(), ::ebml_marshal::error::EncodeError> {
                encoder.write_master(binding, self, out)
            }

            fn decode(
                &mut self,
                binding: &::ebml_marshal::FieldBinding<'_>,
                header: &::ebml_marshal::ElementHeader,
                decoder: &mut ::ebml_marshal::Decoder<'_, '_>,
            ) -> ::std::result::Result<(), ::ebml_marshal::error::DecodeError> {
                decoder.read_master(binding, header, self)
            }
        }
    })
}
