use proc_macro2::{Span, TokenStream};
use proc_macro_error2::emit_error;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, ExprPath, Field, Ident, LitStr, Token};

/// Output key marking a field as hidden.
const HIDDEN_KEY: &str = "-";

/// serde's `rename_all` conventions.
#[derive(Clone, Copy, Debug)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Option<Self> {
        Some(match lit.value().as_str() {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return None,
        })
    }

    /// Rename a field the way serde does: words are split on `_` only, so
    /// leading, doubled and mixed-case segments survive unchanged.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => pascal_case(field),
            Self::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Container-level settings.
#[derive(Default)]
pub struct ContainerAttrs {
    pub rename_all: Option<RenameRule>,
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> Self {
        let mut scoped_rule = None;
        let mut serde_rule = None;

        for attr in attrs {
            if attr.path().is_ident("scoped") {
                let result = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        scoped_rule = Some(parse_rename_rule(&meta.value()?.parse()?)?);
                        return Ok(());
                    }
                    Err(meta.error("unsupported container attribute; expected `rename_all`"))
                });
                if let Err(e) = result {
                    emit_error!(e.span(), "{}", e);
                }
            } else if attr.path().is_ident("serde") {
                let result = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        if meta.input.peek(Token![=]) {
                            serde_rule = Some(parse_rename_rule(&meta.value()?.parse()?)?);
                        } else {
                            meta.parse_nested_meta(|inner| {
                                if inner.path.is_ident("serialize") {
                                    serde_rule =
                                        Some(parse_rename_rule(&inner.value()?.parse()?)?);
                                    Ok(())
                                } else {
                                    skip_meta_value(&inner)
                                }
                            })?;
                        }
                        return Ok(());
                    }
                    skip_meta_value(&meta)
                });
                if let Err(e) = result {
                    emit_error!(e.span(), "{}", e);
                }
            }
        }

        Self {
            rename_all: scoped_rule.or(serde_rule),
        }
    }
}

fn parse_rename_rule(lit: &LitStr) -> syn::Result<RenameRule> {
    RenameRule::parse(lit).ok_or_else(|| {
        syn::Error::new(
            lit.span(),
            format!("unknown rename_all rule '{}'", lit.value()),
        )
    })
}

/// Consume the value of a nested meta item this macro does not interpret.
fn skip_meta_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: TokenStream = content.parse()?;
    }
    Ok(())
}

/// Resolved metadata of one field.
pub struct ScopedField {
    pub ident: Ident,
    pub ty: syn::Type,
    /// `None` when the field is hidden.
    pub key: Option<String>,
    pub omit_empty: bool,
    pub scopes: Vec<String>,
    /// Function called as `path(&value, serializer)`, from serde's
    /// `serialize_with` or `with`.
    pub serialize_with: Option<ExprPath>,
}

#[derive(Default)]
struct RawFieldAttrs {
    rename: Option<String>,
    skip: bool,
    omit_empty: bool,
    scopes: Vec<LitStr>,
    serialize_with: Option<ExprPath>,
}

impl ScopedField {
    pub fn parse(field: &Field, container: &ContainerAttrs) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(Span::call_site(), "expected a named field"))?;

        let mut scoped = RawFieldAttrs::default();
        let mut serde = RawFieldAttrs::default();
        for attr in &field.attrs {
            if attr.path().is_ident("scoped") {
                parse_scoped_attr(attr, &mut scoped)?;
            } else if attr.path().is_ident("serde") {
                parse_serde_attr(attr, &mut serde)?;
            }
        }

        let scopes = dedup_scopes(&scoped.scopes)?;

        let key = if scoped.skip {
            None
        } else if let Some(rename) = scoped.rename {
            Some(rename)
        } else if serde.skip {
            None
        } else if let Some(rename) = serde.rename {
            Some(rename)
        } else {
            let name = ident.unraw().to_string();
            Some(match container.rename_all {
                Some(rule) => rule.apply(&name),
                None => name,
            })
        };

        Ok(Self {
            ident,
            ty: field.ty.clone(),
            key: key.filter(|k| !k.is_empty() && k != HIDDEN_KEY),
            omit_empty: scoped.omit_empty,
            scopes,
            serialize_with: serde.serialize_with,
        })
    }
}

fn parse_scoped_attr(attr: &Attribute, out: &mut RawFieldAttrs) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            out.rename = Some(lit.value());
            return Ok(());
        }
        if meta.path.is_ident("skip") {
            out.skip = true;
            return Ok(());
        }
        if meta.path.is_ident("omit_empty") {
            out.omit_empty = true;
            return Ok(());
        }
        if meta.path.is_ident("scopes") {
            if meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                out.scopes.extend(
                    lit.value()
                        .split(',')
                        .map(|s| LitStr::new(s.trim(), lit.span())),
                );
            } else {
                let content;
                syn::parenthesized!(content in meta.input);
                let list = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
                out.scopes.extend(list);
            }
            return Ok(());
        }
        Err(meta.error(
            "unsupported scoped attribute; expected `rename`, `skip`, `omit_empty` or `scopes`",
        ))
    })
}

fn parse_serde_attr(attr: &Attribute, out: &mut RawFieldAttrs) -> syn::Result<()> {
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            if meta.input.peek(Token![=]) {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit.value());
            } else {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("serialize") {
                        let lit: LitStr = inner.value()?.parse()?;
                        out.rename = Some(lit.value());
                        Ok(())
                    } else {
                        skip_meta_value(&inner)
                    }
                })?;
            }
            return Ok(());
        }
        if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
            out.skip = true;
            return Ok(());
        }
        if meta.path.is_ident("serialize_with") {
            let lit: LitStr = meta.value()?.parse()?;
            out.serialize_with = Some(lit.parse()?);
            return Ok(());
        }
        if meta.path.is_ident("with") {
            let lit: LitStr = meta.value()?.parse()?;
            let mut path: ExprPath = lit.parse()?;
            path.path.segments.push(Ident::new("serialize", lit.span()).into());
            out.serialize_with = Some(path);
            return Ok(());
        }
        if meta.path.is_ident("flatten") || meta.path.is_ident("getter") {
            return Err(meta.error(
                "#[derive(Scoped)] does not support #[serde(flatten)] or #[serde(getter)]",
            ));
        }
        skip_meta_value(&meta)
    })
}

fn dedup_scopes(scopes: &[LitStr]) -> syn::Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(scopes.len());
    for lit in scopes {
        let scope = lit.value();
        if scope.is_empty() {
            return Err(syn::Error::new(lit.span(), "scope names must not be empty"));
        }
        if out.contains(&scope) {
            return Err(syn::Error::new(
                lit.span(),
                format!("scope '{scope}' is listed more than once"),
            ));
        }
        out.push(scope);
    }
    Ok(out)
}
