use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Error, Ident, LitStr, Result, Token};

pub struct Attributes {
    pub element: String,
    pub omit_empty: bool,
    pub unknown_size: bool,
    pub skip: bool,
}

enum AttrArg {
    Name(LitStr),
    Flag(Ident),
}

impl Parse for AttrArg {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.peek(LitStr) {
            Ok(AttrArg::Name(input.parse()?))
        } else {
            Ok(AttrArg::Flag(input.parse()?))
        }
    }
}

///
/// Reads every `#[ebml(...)]` attribute on a field.  Without an element name the field identifier is used, raw identifier prefix removed.
///
pub fn parse_field_attributes(field: &syn::Field, member: &Ident) -> Result<Attributes> {
    let mut element: Option<LitStr> = None;
    let mut omit_empty = false;
    let mut unknown_size = false;
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path.is_ident("ebml") {
            continue;
        }

        let args = attr.parse_args_with(Punctuated::<AttrArg, Token![,]>::parse_terminated)?;
        for arg in args {
            match arg {
                AttrArg::Name(name) => {
                    if element.is_some() {
                        return Err(Error::new_spanned(name, "duplicate element name"));
                    }
                    if name.value().is_empty() {
                        return Err(Error::new_spanned(name, "element name cannot be empty"));
                    }
                    element = Some(name);
                },
                AttrArg::Flag(flag) => {
                    let target = if flag == "omitempty" {
                        &mut omit_empty
                    } else if flag == "unknown_size" {
                        &mut unknown_size
                    } else if flag == "skip" {
                        &mut skip
                    } else {
                        return Err(Error::new_spanned(&flag, format!("unknown modifier `{}`, expected `omitempty`, `unknown_size` or `skip`", flag)));
                    };
                    if *target {
                        return Err(Error::new_spanned(&flag, format!("duplicate `{}`", flag)));
                    }
                    *target = true;
                },
            }
        }
    }

    let element = match element {
        Some(name) => name.value(),
        None => {
            let name = member.to_string();
            name.strip_prefix("r#").map(str::to_owned).unwrap_or(name)
        },
    };

    Ok(Attributes {
        element,
        omit_empty,
        unknown_size,
        skip,
    })
}
