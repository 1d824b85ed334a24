use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let kind = match extract_kind(&input) {
        Ok(kind) => kind,
        Err(err) => return err.to_compile_error().into(),
    };

    let number_field = match extract_marked_field(&input, "number", "document_number") {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let date_field = match extract_marked_field(&input, "date_issued", "date_issued") {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl folio::Document for #name {
            const KIND: folio::DocumentKind = folio::DocumentKind::#kind;

            fn number(&self) -> Option<&str> {
                self.#number_field.as_deref()
            }

            fn set_number(&mut self, number: String) {
                self.#number_field = Some(number);
            }

            fn date_issued(&self) -> Option<&str> {
                self.#date_field.as_deref()
            }

            fn set_date_issued(&mut self, date: String) {
                self.#date_field = Some(date);
            }
        }
    };

    TokenStream::from(expanded)
}

/// Resolve `#[document(kind = "...")]` to a `DocumentKind` variant.
fn extract_kind(input: &DeriveInput) -> syn::Result<Ident> {
    let mut kind = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("document") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("kind") {
                let value: LitStr = meta.value()?.parse()?;
                kind = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported document attribute, expected `kind`"))
            }
        })?;
    }

    // Default: snake_case struct name, so `Invoice` maps to "invoice".
    let (value, span) = match kind {
        Some(lit) => (lit.value(), lit.span()),
        None => (to_snake_case(&input.ident.to_string()), input.ident.span()),
    };

    match value.as_str() {
        "invoice" => Ok(Ident::new("Invoice", Span::call_site())),
        "receipt" => Ok(Ident::new("Receipt", Span::call_site())),
        other => Err(syn::Error::new(
            span,
            format!(
                "Document derive: unknown kind `{}`, expected \"invoice\" or \"receipt\"",
                other
            ),
        )),
    }
}

/// Find the field tagged `#[document(<marker>)]`, falling back to a field
/// with the default name.
fn extract_marked_field(input: &DeriveInput, marker: &str, default: &str) -> syn::Result<Ident> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Document derive only supports structs",
        ));
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Document derive requires named fields",
        ));
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("document") {
                continue;
            }

            let mut is_marked = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(marker) {
                    is_marked = true;
                }
                Ok(())
            })?;

            if is_marked {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    for field in &fields.named {
        if let Some(ident) = &field.ident {
            if ident == default {
                return Ok(ident.clone());
            }
        }
    }

    Err(syn::Error::new_spanned(
        &input.ident,
        format!(
            "Document derive: no field marked with #[document({})] and no field named `{}`",
            marker, default
        ),
    ))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
