//! Struct declarations
//!
//! Builds the row struct and the conversion object as token streams.

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::codegen::fields::FieldSpec;

/// Which derives and attributes the declarations carry
#[derive(Debug, Clone, Copy, Default)]
pub struct Annotations {
    /// `serde` derives plus `#[serde(rename)]`
    pub json: bool,
    /// `sqlx::FromRow` plus `#[sqlx(rename)]`
    pub db: bool,
}

impl Annotations {
    fn derives(&self) -> Vec<TokenStream> {
        let mut derives = vec![quote!(Debug), quote!(Clone), quote!(PartialEq)];
        if self.json {
            derives.push(quote!(serde::Serialize));
            derives.push(quote!(serde::Deserialize));
        }
        if self.db {
            derives.push(quote!(sqlx::FromRow));
        }
        derives
    }
}

/// The row struct for a table
pub fn row_struct(
    struct_ident: &Ident,
    table_name: &str,
    fields: &[FieldSpec<'_>],
    annotations: Annotations,
) -> TokenStream {
    let doc = format!(" Row of the `{}` table.", table_name);
    let derives = annotations.derives();

    let fields = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.ty;
        let column = &field.column.name;

        let doc = field.column.comment.as_ref().map(|comment| {
            let comment = format!(" {}", comment);
            quote!(#[doc = #comment])
        });
        let sqlx_attr = annotations.db.then(|| quote!(#[sqlx(rename = #column)]));
        let serde_attr = annotations.json.then(|| quote!(#[serde(rename = #column)]));

        quote! {
            #doc
            #sqlx_attr
            #serde_attr
            pub #ident: #ty
        }
    });

    quote! {
        #[doc = #doc]
        #[derive(#(#derives),*)]
        pub struct #struct_ident {
            #(#fields),*
        }
    }
}

/// The conversion object: same fields, nullable ones as plain `Option`
pub fn object_struct(
    object_ident: &Ident,
    struct_ident: &Ident,
    fields: &[FieldSpec<'_>],
    annotations: Annotations,
) -> TokenStream {
    let doc = format!(" Plain object converted to and from [`{}`].", struct_ident);
    // objects never come from a row directly
    let derives = Annotations {
        db: false,
        ..annotations
    }
    .derives();

    let fields = fields.iter().map(|field| {
        let ident = &field.ident;
        let ty = &field.object_ty;
        let column = &field.column.name;
        let serde_attr = annotations.json.then(|| quote!(#[serde(rename = #column)]));

        quote! {
            #serde_attr
            pub #ident: #ty
        }
    });

    quote! {
        #[doc = #doc]
        #[derive(#(#derives),*)]
        pub struct #object_ident {
            #(#fields),*
        }
    }
}
