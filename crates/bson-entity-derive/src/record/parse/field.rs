// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level tag parsing.
//!
//! A field carries at most one `#[bson(...)]` attribute holding its raw tag
//! and, optionally, a zero check:
//!
//! ```text
//! #[bson("name,omitempty")]
//! #[bson("_id", zero = "ObjectId::is_nil")]
//! #[bson(zero = "Ipv4Addr::is_unspecified")]
//! ```
//!
//! The tag is parsed here with the same parser the resolver uses so that a
//! malformed tag fails the build. Fields tagged `-` or `skip` are dropped
//! from the schema altogether, which also frees their types from any trait
//! requirement.
//!
//! # Embedding
//!
//! ```text
//! #[bson(",inline")] address: Address               EmbedKind::Value(Address)
//! #[bson(",inline")] billing: Option<Box<Address>>  EmbedKind::Linked(Address)
//! #[bson(",inline")] shipping: Option<Address>      error
//! ```

use bson_entity_core::{TAG_NAMESPACE, tag::parse_tag};
use quote::ToTokens;
use syn::{
    Field, GenericArgument, Ident, LitStr, Path, PathArguments, Token, Type,
    ext::IdentExt,
    parse::{Parse, ParseStream}
};

use super::RenameRule;

/// How an inline field embeds another record.
#[derive(Debug, Clone)]
pub enum EmbedKind {
    /// Field of the record type itself.
    Value(Type),

    /// `Option<Box<T>>` field; carries `T`.
    Linked(Type)
}

/// Mapped field of a record.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier.
    pub ident: Ident,

    /// Declared type.
    pub ty: Type,

    /// Field name without a raw-identifier prefix.
    pub name: String,

    /// Key used when the tag names none.
    pub default_key: String,

    /// Raw tag, empty when the field has no `#[bson]` attribute.
    pub tag: String,

    /// Set for `inline` fields.
    pub embed: Option<EmbedKind>,

    /// Custom zero check from `zero = "path"`.
    pub zero: Option<Path>
}

/// Contents of a field-level `#[bson(...)]` attribute.
#[derive(Default)]
struct FieldAttr {
    tag:  Option<LitStr>,
    zero: Option<Path>
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut attr = Self::default();

        if input.peek(LitStr) {
            attr.tag = Some(input.parse()?);
            if input.is_empty() {
                return Ok(attr);
            }
            input.parse::<Token![,]>()?;
        }

        let key: Ident = input.parse().map_err(|err| {
            syn::Error::new(
                err.span(),
                "expected a tag string, e.g. #[bson(\"name,omitempty\")]"
            )
        })?;
        if key != "zero" {
            let message = match attr.tag {
                Some(_) => format!("unknown field option `{key}`, expected `zero`"),
                None => "expected a tag string, e.g. #[bson(\"name,omitempty\")]".to_string()
            };
            return Err(syn::Error::new(key.span(), message));
        }
        input.parse::<Token![=]>()?;
        let path: LitStr = input.parse()?;
        attr.zero = Some(path.parse()?);

        if !input.is_empty() {
            return Err(input.error("unexpected tokens after the zero check"));
        }
        Ok(attr)
    }
}

impl FieldDef {
    /// Parse a field, `None` when its tag skips it.
    ///
    /// # Errors
    ///
    /// - Field has no identifier
    /// - More than one `#[bson]` attribute, or one that is not a string
    /// - `zero` option that is not a path
    /// - Malformed tag
    /// - `inline` on an `Option` that does not wrap a `Box`
    pub fn from_field(field: &Field, rename: Option<RenameRule>) -> darling::Result<Option<Self>> {
        let ident = field.ident.clone().ok_or_else(|| {
            darling::Error::custom("Record fields must be named").with_span(field)
        })?;
        let name = ident.unraw().to_string();
        let default_key = rename.map_or_else(|| name.clone(), |rule| rule.apply(&name));

        let FieldAttr {
            tag,
            zero
        } = field_attr(field)?;
        let settings = match &tag {
            Some(lit) => parse_tag(&default_key, &lit.value())
                .map_err(|err| darling::Error::custom(err).with_span(lit))?,
            None => parse_tag(&default_key, "").map_err(darling::Error::custom)?
        };
        if settings.skip {
            return Ok(None);
        }

        let embed = if settings.inline {
            Some(embed_kind(&ident, &field.ty)?)
        } else {
            None
        };

        Ok(Some(Self {
            ident,
            ty: field.ty.clone(),
            name,
            default_key,
            tag: tag.map(|lit| lit.value()).unwrap_or_default(),
            embed,
            zero
        }))
    }

    /// Declared type as written, with token spacing tidied.
    pub fn type_label(&self) -> String {
        type_label(&self.ty)
    }
}

/// The field's `#[bson(...)]` attribute, empty when it has none.
fn field_attr(field: &Field) -> darling::Result<FieldAttr> {
    let mut found: Option<FieldAttr> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident(TAG_NAMESPACE) {
            continue;
        }
        if found.is_some() {
            return Err(darling::Error::custom("duplicate #[bson] attribute on field")
                .with_span(attr.path()));
        }
        found = Some(attr.parse_args::<FieldAttr>()?);
    }

    Ok(found.unwrap_or_default())
}

fn embed_kind(ident: &Ident, ty: &Type) -> darling::Result<EmbedKind> {
    match single_generic(ty, "Option") {
        None => Ok(EmbedKind::Value(ty.clone())),
        Some(inner) => single_generic(inner, "Box")
            .map(|record| EmbedKind::Linked(record.clone()))
            .ok_or_else(|| {
                darling::Error::custom("inline optional records must be `Option<Box<T>>`")
                    .with_span(ident)
            })
    }
}

/// `T` when `ty` is `wrapper<T>`.
fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) if args.args.len() == 1 => Some(inner),
        _ => None
    }
}

/// Render a type the way it is usually written (`Option<Box<T>>`).
pub fn type_label(ty: &Type) -> String {
    let raw = ty.to_token_stream().to_string();
    let mut label = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == ' ' {
            let prev = label.chars().last();
            let next = chars.peek().copied();
            let glued_prev = prev.is_some_and(|c| "<(&[:".contains(c));
            let glued_next = next.is_some_and(|c| "<>(),:;]".contains(c));
            if glued_prev || glued_next {
                continue;
            }
        }
        label.push(ch);
    }

    label
}
