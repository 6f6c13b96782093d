//! Ordered flat projection of request structures.
//!
//! The 3-D Secure model posts the request as an HTML form and signs an
//! ordered subset of its values, so the flat view of a request must be
//! deterministic. Each request type declares its form fields in order through
//! [`FormProjection`]; nested records are walked depth-first in declaration
//! order. Fields that only exist in the JSON body are simply not declared.
//!
//! # Presence rules
//!
//! Every declared field carries a [`Presence`] rule:
//!
//! - [`Presence::OmitIfEmpty`]: the field is emitted only when it renders to a
//!   non-empty string
//! - [`Presence::Always`]: the field is emitted even when unset, as an empty
//!   value
//!
//! # Examples
//!
//! ```
//! use akbank_pos::form::{FormEncoding, FormProjection, Presence};
//!
//! struct Greeting {
//!     name: Option<String>,
//!     title: Option<String>,
//! }
//!
//! impl FormProjection for Greeting {
//!     fn project(&self, form: &mut FormEncoding) {
//!         form.field("name", Presence::Always, self.name.as_deref())
//!             .field("title", Presence::OmitIfEmpty, self.title.as_deref());
//!     }
//! }
//!
//! let form = FormEncoding::project(&Greeting { name: None, title: None });
//! assert_eq!(form.get("name"), Some(""));
//! assert_eq!(form.get("title"), None);
//! ```

use std::fmt::Display;

/// Inclusion rule of a single form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Emit only when the value renders to a non-empty string.
    OmitIfEmpty,
    /// Emit even when unset or empty.
    Always,
}

/// Declares the ordered form fields of a request type.
///
/// Implementations list their fields in the order the gateway documents them
/// and call [`FormEncoding::nested`] for embedded records.
pub trait FormProjection {
    /// Appends this value's fields to `form` in declaration order.
    fn project(&self, form: &mut FormEncoding);
}

/// Ordered sequence of form field names and string values.
///
/// Duplicate names are kept in insertion order; lookups return the first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormEncoding {
    fields: Vec<(String, String)>,
}

impl FormEncoding {
    /// Creates an empty encoding.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Projects a value into a new encoding.
    #[must_use]
    pub fn project<T: FormProjection + ?Sized>(value: &T) -> Self {
        let mut form = Self::new();
        value.project(&mut form);
        form
    }

    /// Builds an encoding from already flattened pairs, e.g. a gateway callback.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { fields: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// Appends a field according to its presence rule.
    ///
    /// The value is rendered with [`Display`], so monetary fields passed as
    /// [`Amount`](crate::amount::Amount) come out with two decimals.
    pub fn field<V: Display>(
        &mut self,
        name: &str,
        presence: Presence,
        value: Option<V>,
    ) -> &mut Self {
        let rendered = value.map(|v| v.to_string()).unwrap_or_default();
        if presence == Presence::Always || !rendered.is_empty() {
            self.fields.push((name.to_owned(), rendered));
        }
        self
    }

    /// Projects an embedded record.
    ///
    /// An absent record is projected from its default value, so its
    /// [`Presence::Always`] fields still appear.
    pub fn nested<T: FormProjection + Default>(&mut self, value: Option<&T>) -> &mut Self {
        match value {
            Some(inner) => inner.project(self),
            None => T::default().project(self),
        }
        self
    }

    /// Appends a field unconditionally.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Returns the first value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// Returns the first value stored under `name`, or `""` when absent.
    #[must_use]
    pub fn value_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Returns `true` if a field named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == name)
    }

    /// Iterates over the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the fields as `application/x-www-form-urlencoded`.
    #[must_use]
    pub fn to_urlencoded(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new()).extend_pairs(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a FormEncoding {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;

    #[derive(Default)]
    struct Inner {
        code: Option<String>,
        total: Option<Amount>,
    }

    impl FormProjection for Inner {
        fn project(&self, form: &mut FormEncoding) {
            form.field("code", Presence::Always, self.code.as_deref())
                .field("total", Presence::OmitIfEmpty, self.total);
        }
    }

    struct Outer {
        first: Option<String>,
        inner: Option<Inner>,
        last: Option<u16>,
    }

    impl FormProjection for Outer {
        fn project(&self, form: &mut FormEncoding) {
            form.field("first", Presence::OmitIfEmpty, self.first.as_deref())
                .nested(self.inner.as_ref())
                .field("last", Presence::OmitIfEmpty, self.last);
        }
    }

    #[test]
    fn test_declaration_order_is_depth_first() {
        let outer = Outer {
            first: Some("a".to_owned()),
            inner: Some(Inner { code: Some("b".to_owned()), total: Some("3".parse().unwrap()) }),
            last: Some(7),
        };

        let form = FormEncoding::project(&outer);
        let names: Vec<&str> = form.names().collect();
        assert_eq!(names, vec!["first", "code", "total", "last"]);
        assert_eq!(form.get("total"), Some("3.00"));
        assert_eq!(form.get("last"), Some("7"));
    }

    #[test]
    fn test_omit_if_empty_skips_unset_and_empty_values() {
        let outer = Outer { first: Some(String::new()), inner: None, last: None };
        let form = FormEncoding::project(&outer);
        assert!(!form.contains("first"));
        assert!(!form.contains("last"));
        assert!(!form.contains("total"));
    }

    #[test]
    fn test_always_fields_of_absent_records_are_emitted_empty() {
        let outer = Outer { first: None, inner: None, last: None };
        let form = FormEncoding::project(&outer);
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("code"), Some(""));
    }

    #[test]
    fn test_value_or_empty() {
        let form = FormEncoding::from_pairs([("a", "1")]);
        assert_eq!(form.value_or_empty("a"), "1");
        assert_eq!(form.value_or_empty("missing"), "");
    }

    #[test]
    fn test_duplicate_names_return_first() {
        let mut form = FormEncoding::new();
        form.push("k", "first").push("k", "second");
        assert_eq!(form.get("k"), Some("first"));
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_to_urlencoded_escapes_values() {
        let form = FormEncoding::from_pairs([
            ("okUrl", "https://shop.example/ok?a=1&b=2"),
            ("lang", "TR"),
        ]);
        assert_eq!(
            form.to_urlencoded(),
            "okUrl=https%3A%2F%2Fshop.example%2Fok%3Fa%3D1%26b%3D2&lang=TR"
        );
    }

    #[test]
    fn test_into_iterator_by_reference() {
        let form = FormEncoding::from_pairs([("a", "1"), ("b", "2")]);
        let collected: Vec<(&str, &str)> = (&form).into_iter().collect();
        assert_eq!(collected, vec![("a", "1"), ("b", "2")]);
    }
}
