//! Attribute parsing for the Record derive macro.
//!
//! This module provides the parser for the `#[gather(...)]` field attributes
//! used by the `Record` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// How a field is exposed to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    /// Converted with `AsValue`.
    #[default]
    Value,
    /// A nested record: `#[gather(nested)]`
    Nested,
    /// An embedded parent whose attributes are inherited: `#[gather(parent)]`
    Parent,
    /// An enum implementing `GatherEnum`: `#[gather(enumeration)]`
    Enumeration,
}

impl FieldKind {
    fn keyword(self) -> &'static str {
        match self {
            FieldKind::Value => "value",
            FieldKind::Nested => "nested",
            FieldKind::Parent => "parent",
            FieldKind::Enumeration => "enumeration",
        }
    }
}

/// Field-level attributes from `#[gather(...)]`.
#[derive(Debug, Clone)]
pub struct GatherAttr {
    /// How the field is exposed.
    pub kind: FieldKind,
    /// Skip this field entirely.
    pub skip: bool,
    /// Custom attribute name for queries (default: field name).
    pub rename: Option<String>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for GatherAttr {
    fn default() -> Self {
        GatherAttr {
            kind: FieldKind::Value,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl GatherAttr {
    fn set_kind(&mut self, kind: FieldKind, span: Span) -> Result<()> {
        if self.kind != FieldKind::Value && self.kind != kind {
            return Err(Error::new(
                span,
                format!(
                    "conflicting field kinds: '{}' and '{}'",
                    self.kind.keyword(),
                    kind.keyword()
                ),
            ));
        }
        self.kind = kind;
        self.span = span;
        Ok(())
    }
}

impl Parse for GatherAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = GatherAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // Flags: gather(skip), gather(nested), ...
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("nested") {
                        attr.set_kind(FieldKind::Nested, p.span())?;
                    } else if p.is_ident("parent") {
                        attr.set_kind(FieldKind::Parent, p.span())?;
                    } else if p.is_ident("enumeration") {
                        attr.set_kind(FieldKind::Enumeration, p.span())?;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "unknown gather flag. Expected: skip, nested, parent, or enumeration",
                        ));
                    }
                }

                // rename = "customName"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        if let syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) = &nv.value
                        {
                            if s.value().is_empty() || s.value().contains('.') {
                                return Err(Error::new(
                                    s.span(),
                                    "rename must be a non-empty name without dots",
                                ));
                            }
                            attr.rename = Some(s.value());
                        } else {
                            return Err(Error::new(
                                nv.value.span(),
                                "rename must be a string literal",
                            ));
                        }
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown gather attribute. Expected: skip, nested, parent, enumeration, or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.kind == FieldKind::Parent && attr.rename.is_some() {
            return Err(Error::new(
                attr.span,
                "a parent field is flattened and cannot be renamed",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[gather(...)]` attributes from a field's attributes.
pub fn parse_gather_attrs(attrs: &[Attribute]) -> Result<GatherAttr> {
    for attr in attrs {
        if attr.path().is_ident("gather") {
            return attr.parse_args::<GatherAttr>();
        }
    }
    Ok(GatherAttr::default())
}
