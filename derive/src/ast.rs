use syn::{Data, DeriveInput, Error, Fields, Ident, Result, Type};

use crate::attr::{self, Attributes};

pub struct Struct<'a> {
    pub ident: &'a Ident,
    pub fields: Vec<Field<'a>>,
}

pub struct Field<'a> {
    pub member: &'a Ident,
    pub ty: &'a Type,
    pub attributes: Attributes,
}

impl<'a> Struct<'a> {
    pub fn from_syn(node: &'a DeriveInput) -> Result<Self> {
        let data = match &node.data {
            Data::Struct(data) => data,
            _ => { return Err(Error::new_spanned(node, "#[derive(EbmlMarshal)] only works on structs")) }
        };

        if !node.generics.params.is_empty() {
            return Err(Error::new_spanned(&node.generics, "#[derive(EbmlMarshal)] does not support generic structs"));
        }

        let named = match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok(Struct { ident: &node.ident, fields: Vec::new() });
            },
            Fields::Unnamed(_) => { return Err(Error::new_spanned(node, "#[derive(EbmlMarshal)] requires named fields")) }
        };

        let mut fields = Vec::new();
        for node in named {
            let member = node.ident.as_ref().ok_or_else(|| Error::new_spanned(node, "expected a named field"))?;
            let attributes = attr::parse_field_attributes(node, member)?;
            if attributes.skip {
                continue;
            }
            fields.push(Field {
                member,
                ty: &node.ty,
                attributes,
            });
        }

        let mut seen: Vec<&Field> = Vec::new();
        for field in &fields {
            if let Some(first) = seen.iter().find(|f| f.attributes.element == field.attributes.element) {
                let mut err = Error::new_spanned(field.member, format!("element \"{}\" is bound twice", field.attributes.element));
                err.combine(Error::new_spanned(first.member, format!("\"{}\" already bound here", field.attributes.element)));
                return Err(err);
            }
            seen.push(field);
        }

        Ok(Struct {
            ident: &node.ident,
            fields,
        })
    }
}
