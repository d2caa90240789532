use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Type, parse_macro_input, spanned::Spanned};

/// Derives `entitymeta::Entity` from a struct's named fields.
///
/// Struct attribute: `#[entity(table = "...")]`.
/// Field attribute: `#[column(name = "...", primary, identity, db_type = "...",
/// handler = path::To::Handler, skip)]`.
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_entity(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_entity(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            input.generics,
            "Entity does not support generic structs",
        ));
    }

    let entity_options = parse_entity_options(&input.attrs)?;

    let data_struct = match input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity can only be derived for structs",
            ));
        }
    };

    let named_fields = match data_struct.fields {
        Fields::Named(fields) => fields,
        _ => {
            return Err(syn::Error::new(
                struct_name.span(),
                "Entity requires named fields",
            ));
        }
    };

    let mut properties = Vec::<TokenStream2>::new();
    for field in named_fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "Entity requires named fields"))?;
        let options = parse_column_options(&field.attrs)?;
        if options.skip {
            continue;
        }

        let property_name = ident.to_string().trim_start_matches("r#").to_string();
        let declared_type = declared_type_name(&field.ty);

        let column_call = options
            .column_name
            .map(|column| quote!(.column(#column)));
        let db_type_call = options.db_type.map(|variant| {
            let variant = syn::Ident::new(variant, proc_macro2::Span::call_site());
            quote!(.db_type(::entitymeta::DataType::#variant))
        });
        let primary_call = options.primary.then(|| quote!(.primary()));
        let identity_call = options.identity.then(|| quote!(.identity()));
        let handler_call = options.handler.map(|handler| quote!(.handler::<#handler>()));

        properties.push(quote! {
            ::entitymeta::PropertyDescriptor::new(#property_name, #declared_type)
                #column_call
                #db_type_call
                #primary_call
                #identity_call
                #handler_call
        });
    }

    let table_call = entity_options
        .table_name
        .map(|table| quote!(.table(#table)));

    Ok(quote! {
        impl ::entitymeta::Entity for #struct_name {
            fn definition() -> ::entitymeta::EntityDefinition {
                ::entitymeta::EntityDefinition::new()
                    #table_call
                    #(.property(#properties))*
            }
        }
    })
}

struct EntityOptions {
    table_name: Option<String>,
}

#[derive(Default)]
struct ColumnOptions {
    skip: bool,
    primary: bool,
    identity: bool,
    column_name: Option<String>,
    db_type: Option<&'static str>,
    handler: Option<syn::Path>,
}

/// `Option < i64 >` as tokens becomes `Option<i64>`.
fn declared_type_name(ty: &Type) -> String {
    quote!(#ty)
        .to_string()
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .collect()
}

fn db_type_variant(name: &str) -> Option<&'static str> {
    let variant = match name.to_ascii_lowercase().as_str() {
        "integer" | "int" | "bigint" | "smallint" => "Integer",
        "float" | "real" | "double" | "numeric" | "decimal" => "Float",
        "text" | "varchar" | "string" | "char" => "Text",
        "boolean" | "bool" => "Boolean",
        "timestamp" | "datetime" | "date" => "Timestamp",
        "uuid" => "Uuid",
        "json" | "jsonb" => "Json",
        "blob" | "bytes" | "bytea" | "binary" => "Blob",
        _ => return None,
    };
    Some(variant)
}

fn parse_column_options(attrs: &[syn::Attribute]) -> syn::Result<ColumnOptions> {
    let mut options = ColumnOptions::default();
    let mut seen = false;

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }

        if seen {
            return Err(syn::Error::new(
                attr.span(),
                "Duplicate #[column(...)] attribute on field",
            ));
        }
        seen = true;

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                return Ok(());
            }

            if meta.path.is_ident("primary") {
                options.primary = true;
                return Ok(());
            }

            if meta.path.is_ident("identity") {
                options.identity = true;
                return Ok(());
            }

            if meta.path.is_ident("name") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.column_name = Some(lit.value());
                return Ok(());
            }

            if meta.path.is_ident("db_type") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.db_type = Some(db_type_variant(&lit.value()).ok_or_else(|| {
                    syn::Error::new(lit.span(), format!("Unknown db_type '{}'", lit.value()))
                })?);
                return Ok(());
            }

            if meta.path.is_ident("handler") {
                let value = meta.value()?;
                options.handler = Some(value.parse()?);
                return Ok(());
            }

            Err(meta.error(
                "Unsupported #[column(...)] option. Supported: name = \"...\", primary, identity, db_type = \"...\", handler = Type, skip",
            ))
        })?;

        if options.skip && (options.primary || options.identity || options.column_name.is_some()) {
            return Err(syn::Error::new(
                attr.span(),
                "#[column(skip)] cannot be combined with other column options",
            ));
        }
    }

    Ok(options)
}

fn parse_entity_options(attrs: &[syn::Attribute]) -> syn::Result<EntityOptions> {
    let mut options = EntityOptions { table_name: None };

    for attr in attrs {
        if !attr.path().is_ident("entity") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let value = meta.value()?;
                let lit: LitStr = value.parse()?;
                options.table_name = Some(lit.value());
                return Ok(());
            }

            Err(meta.error("Unsupported entity attribute. Supported: table = \"...\""))
        })?;
    }

    Ok(options)
}
