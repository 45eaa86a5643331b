use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Data, DeriveInput, Fields, LitStr, Visibility, parse_macro_input};

/// Derive macro for reflectable records.
///
/// Implements `structcast::Record` and `structcast::Reflect` for a struct
/// with named fields:
///
/// - `field_defs()`: one `FieldDef` per field, in declaration order.
/// - `field(i)` / `field_mut(i)`: indexed access in the same order.
/// - `assign_from(src)`: whole-record copy when `src` has the same type.
///
/// The struct must implement `Clone`, and every field type must implement
/// `structcast::Reflect`.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Default, Reflect)]
/// pub struct Settings {
///     #[reflect(rename = "listen")]
///     pub addr: String,
///
///     #[reflect(flatten)]
///     pub limits: Option<Limits>,
///
///     cache: Vec<String>, // private: not addressable by name
/// }
/// ```
///
/// Field attributes:
/// - `rename = "name"`: external name; `"-"` falls through to the other rules.
/// - `flatten` (alias `inherit`): hoist the sub-record's names into this one.
///
/// Fields declared with any visibility (`pub`, `pub(crate)`, `pub(super)`) are
/// addressable by their identifier. Private fields are reachable only through
/// an explicit rename or `flatten`.
///
/// A `#[serde(rename = "...")]` is used as the external name when no
/// `#[reflect(rename)]` is present.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Reflect only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect only supports structs",
            ))
        }
    };

    let mut def_tokens = Vec::new();
    let mut field_arms = Vec::new();
    let mut field_mut_arms = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let field_name_str = field_name.to_string();
        let exported = !matches!(field.vis, Visibility::Inherited);

        // Parse #[reflect(...)], falling back to #[serde(rename = "...")].
        let mut alias: Option<String> = None;
        let mut serde_alias: Option<String> = None;
        let mut flatten = false;

        for attr in &field.attrs {
            if attr.path().is_ident("reflect") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        let value: LitStr = meta.value()?.parse()?;
                        alias = Some(value.value());
                    } else if meta.path.is_ident("flatten") || meta.path.is_ident("inherit") {
                        flatten = true;
                    } else {
                        return Err(meta.error(
                            "unknown reflect attribute (expected `rename` or `flatten`)",
                        ));
                    }
                    Ok(())
                })?;
            } else if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        serde_alias = serde_rename(&meta)?;
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            }
        }

        let alias_expr = match alias.or(serde_alias) {
            Some(alias) => quote! { Some(#alias) },
            None => quote! { None },
        };

        def_tokens.push(quote! {
            structcast::FieldDef {
                ident: #field_name_str,
                alias: #alias_expr,
                flatten: #flatten,
                exported: #exported,
            }
        });
        field_arms.push(quote! {
            #index => Some(&self.#field_name as &dyn structcast::Reflect),
        });
        field_mut_arms.push(quote! {
            #index => Some(&mut self.#field_name as &mut dyn structcast::Reflect),
        });
    }

    let expanded = quote! {
        impl #impl_generics structcast::Record for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #name_str
            }

            fn field_defs(&self) -> &'static [structcast::FieldDef] {
                const FIELDS: &[structcast::FieldDef] = &[
                    #(#def_tokens),*
                ];
                FIELDS
            }

            fn field(&self, index: usize) -> Option<&dyn structcast::Reflect> {
                match index {
                    #(#field_arms)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, index: usize) -> Option<&mut dyn structcast::Reflect> {
                match index {
                    #(#field_mut_arms)*
                    _ => None,
                }
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn assign_from(&mut self, src: &dyn structcast::Record) -> bool {
                match src.as_any().downcast_ref::<Self>() {
                    Some(src) => {
                        *self = ::core::clone::Clone::clone(src);
                        true
                    }
                    None => false,
                }
            }
        }

        impl #impl_generics structcast::Reflect for #name #ty_generics #where_clause {
            fn view(&self) -> structcast::View<'_> {
                structcast::View::Record(self)
            }

            fn slot(&mut self) -> structcast::Slot<'_> {
                structcast::Slot::Record(self)
            }
        }
    };

    Ok(TokenStream::from(expanded))
}

/// `rename = "x"` or `rename(deserialize = "x", ...)`; the deserialize name
/// wins because conversion fills the record like deserialization does.
fn serde_rename(meta: &ParseNestedMeta) -> Result<Option<String>, syn::Error> {
    if meta.input.peek(syn::Token![=]) {
        let value: LitStr = meta.value()?.parse()?;
        return Ok(Some(value.value()));
    }
    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("deserialize") {
            let value: LitStr = inner.value()?.parse()?;
            name = Some(value.value());
            Ok(())
        } else {
            skip_meta(&inner)
        }
    })?;
    Ok(name)
}

/// Consume a serde attribute this derive does not interpret.
fn skip_meta(meta: &ParseNestedMeta) -> Result<(), syn::Error> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}
