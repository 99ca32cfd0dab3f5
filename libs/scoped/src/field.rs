//! Static per-field metadata consumed by the projector.

/// Output key that marks a field as never serialized.
pub const HIDDEN_KEY: &str = "-";

/// Descriptor of one record field.
///
/// Descriptor tables are normally generated by `#[derive(Scoped)]`, but the
/// builder is `const` so hand-written [`ScopedRecord`](crate::ScopedRecord)
/// impls can declare them in a `const` item as well:
///
/// ```
/// use scoped::FieldSpec;
///
/// const FIELDS: &[FieldSpec] = &[
///     FieldSpec::new("id", "id"),
///     FieldSpec::new("email", "email").omit_empty().scopes(&["user", "admin"]),
///     FieldSpec::hidden("password_hash"),
/// ];
/// assert!(FIELDS[1].is_visible_to("admin"));
/// assert!(FIELDS[2].output_key().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    name: &'static str,
    key: Option<&'static str>,
    omit_empty: bool,
    scopes: &'static [&'static str],
}

impl FieldSpec {
    /// A field serialized under `key`, visible to every scope.
    #[must_use]
    pub const fn new(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            key: Some(key),
            omit_empty: false,
            scopes: &[],
        }
    }

    /// A field that is never serialized.
    #[must_use]
    pub const fn hidden(name: &'static str) -> Self {
        Self {
            name,
            key: None,
            omit_empty: false,
            scopes: &[],
        }
    }

    /// Drop the field whenever its value is empty.
    #[must_use]
    pub const fn omit_empty(self) -> Self {
        Self {
            omit_empty: true,
            ..self
        }
    }

    /// Restrict the field to the listed scopes. An empty list lifts the restriction.
    #[must_use]
    pub const fn scopes(self, scopes: &'static [&'static str]) -> Self {
        Self { scopes, ..self }
    }

    /// Rust identifier of the field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Key the field is serialized under, or `None` if it is hidden.
    #[must_use]
    pub fn output_key(&self) -> Option<&'static str> {
        self.key.filter(|key| !key.is_empty() && *key != HIDDEN_KEY)
    }

    #[must_use]
    pub const fn is_omit_empty(&self) -> bool {
        self.omit_empty
    }

    /// Visibility set in declaration order; empty means unrestricted.
    #[must_use]
    pub const fn visibility(&self) -> &'static [&'static str] {
        self.scopes
    }

    /// Exact, case-sensitive membership test. Unrestricted fields are visible to every scope.
    #[must_use]
    pub fn is_visible_to(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.contains(&scope)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn hidden_sentinel_and_empty_key_hide_the_field() {
        assert_eq!(FieldSpec::new("a", HIDDEN_KEY).output_key(), None);
        assert_eq!(FieldSpec::new("a", "").output_key(), None);
        assert_eq!(FieldSpec::hidden("a").output_key(), None);
        assert_eq!(FieldSpec::new("a", "alias").output_key(), Some("alias"));
    }

    #[test]
    fn unrestricted_field_is_visible_to_any_scope() {
        let spec = FieldSpec::new("id", "id");
        assert!(spec.is_visible_to("admin"));
        assert!(spec.is_visible_to(""));
        assert!(spec.is_visible_to("anything"));
    }

    #[test]
    fn restricted_field_matches_exactly() {
        let spec = FieldSpec::new("both", "both").scopes(&["user", "admin"]);
        assert!(spec.is_visible_to("user"));
        assert!(spec.is_visible_to("admin"));
        assert!(!spec.is_visible_to("Admin"));
        assert!(!spec.is_visible_to("admin "));
        assert!(!spec.is_visible_to("guest"));
        assert_eq!(spec.visibility(), &["user", "admin"]);
    }

    #[test]
    fn builder_is_usable_in_const_context() {
        const SPEC: FieldSpec = FieldSpec::new("user_only", "user_only")
            .omit_empty()
            .scopes(&["user"]);
        assert!(SPEC.is_omit_empty());
        assert_eq!(SPEC.name(), "user_only");
    }
}
