//! Sort key extraction.
//!
//! A [`KeyExtractor`] maps an item to something orderable. The sorters are
//! generic over the extractor, so the genre splitter used by the CLI is just
//! one strategy; [`KeyFn`] adapts any closure.

use crate::record::Record;
use crate::sort::SortError;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Field inspected by [`GenreKey`] unless overridden.
pub const DEFAULT_GENRE_FIELD: &str = "genres";

/// Separator between tags inside the genre field.
pub const DEFAULT_DELIMITER: &str = ", ";

/// Ordered sequence of tags derived from a record.
///
/// Ordering is lexicographic over the tags (byte order within a tag); a
/// proper prefix sorts before the longer sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(Vec<String>);

impl SortKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// The sentinel key `[""]` used for records with no usable tags.
    pub fn sentinel() -> Self {
        Self(vec![String::new()])
    }

    /// Split `value` on `delimiter`. Empty segments are kept as-is.
    pub fn split(value: &str, delimiter: &str) -> Self {
        Self(value.split(delimiter).map(str::to_string).collect())
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.0.len() == 1 && self.0[0].is_empty()
    }

    #[inline]
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for SortKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(DEFAULT_DELIMITER))
    }
}

/// Strategy mapping an item to its sortable key.
///
/// Implementations must be pure: the same item always yields the same key.
pub trait KeyExtractor<T> {
    type Key: PartialOrd + fmt::Debug;

    fn extract(&self, item: &T) -> Result<Self::Key, SortError>;
}

/// Splits a delimited genre string into a [`SortKey`].
///
/// Absent or falsy values (`null`, `""`, `false`, `0`, `[]`, `{}`) map to the
/// sentinel `[""]`. Any other non-string value is a
/// [`SortError::KeyExtraction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreKey {
    field: String,
    delimiter: String,
}

impl Default for GenreKey {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreKey {
    pub fn new() -> Self {
        Self {
            field: DEFAULT_GENRE_FIELD.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }

    /// Read tags from a different field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    /// Split on a different delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
}

impl KeyExtractor<Record> for GenreKey {
    type Key = SortKey;

    fn extract(&self, record: &Record) -> Result<SortKey, SortError> {
        let value = match record.get(&self.field) {
            None => return Ok(SortKey::sentinel()),
            Some(value) if is_falsy(value) => return Ok(SortKey::sentinel()),
            Some(value) => value,
        };

        match value {
            Value::String(s) => Ok(SortKey::split(s, &self.delimiter)),
            other => Err(SortError::KeyExtraction {
                field: self.field.clone(),
                found: json_type_name(other).to_string(),
            }),
        }
    }
}

/// Adapts an infallible closure into a [`KeyExtractor`].
///
/// ```
/// use tunesort::key::KeyFn;
/// use tunesort::sort::merge_sort;
///
/// let sorted = merge_sort(&[3, 1, 2], &KeyFn::new(|n: &i32| -n)).unwrap();
/// assert_eq!(sorted, vec![3, 2, 1]);
/// ```
pub struct KeyFn<F, K> {
    f: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> KeyFn<F, K> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _key: PhantomData,
        }
    }
}

impl<T, K, F> KeyExtractor<T> for KeyFn<F, K>
where
    F: Fn(&T) -> K,
    K: PartialOrd + fmt::Debug,
{
    type Key = K;

    #[inline]
    fn extract(&self, item: &T) -> Result<K, SortError> {
        Ok((self.f)(item))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn genres(value: Value) -> Record {
        Record::new().with("genres", value)
    }

    #[test]
    fn test_split_on_comma_space() {
        let key = GenreKey::new().extract(&genres(json!("Rock, Pop"))).unwrap();
        assert_eq!(key.parts(), &["Rock".to_string(), "Pop".to_string()]);
    }

    #[test]
    fn test_split_keeps_inner_empty_segment() {
        let key = GenreKey::new()
            .extract(&genres(json!("Rock, , Pop")))
            .unwrap();
        assert_eq!(key, SortKey::from_iter(["Rock", "", "Pop"]));
    }

    #[test]
    fn test_comma_without_space_is_one_tag() {
        let key = GenreKey::new().extract(&genres(json!("Rock,Pop"))).unwrap();
        assert_eq!(key, SortKey::from_iter(["Rock,Pop"]));
    }

    #[test]
    fn test_missing_and_falsy_map_to_sentinel() {
        let extractor = GenreKey::new();
        assert!(extractor.extract(&Record::new()).unwrap().is_sentinel());

        for value in [json!(null), json!(""), json!(false), json!(0), json!([]), json!({})] {
            let key = extractor.extract(&genres(value.clone())).unwrap();
            assert!(key.is_sentinel(), "{} should map to sentinel", value);
        }
    }

    #[test]
    fn test_truthy_non_string_is_extraction_error() {
        let extractor = GenreKey::new();
        for (value, found) in [
            (json!(true), "boolean"),
            (json!(7), "number"),
            (json!(["Rock"]), "array"),
            (json!({"a": 1}), "object"),
        ] {
            let err = extractor.extract(&genres(value)).unwrap_err();
            assert_eq!(
                err,
                SortError::KeyExtraction {
                    field: "genres".to_string(),
                    found: found.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_custom_field_and_delimiter() {
        let extractor = GenreKey::new().with_field("tags").with_delimiter("|");
        let record = Record::new().with("tags", "Jazz|Blues");
        let key = extractor.extract(&record).unwrap();
        assert_eq!(key, SortKey::from_iter(["Jazz", "Blues"]));
    }

    #[test]
    fn test_sort_key_order() {
        let sentinel = SortKey::sentinel();
        let rock = SortKey::from_iter(["Rock"]);
        let rock_pop = SortKey::from_iter(["Rock", "Pop"]);
        let pop = SortKey::from_iter(["Pop"]);

        assert!(sentinel < pop);
        assert!(pop < rock);
        assert!(rock < rock_pop); // prefix first
        assert_eq!(rock_pop.to_string(), "Rock, Pop");
    }
}
