//! Dotted field paths into nested entry data.
//!
//! A path such as `authors.0.name` addresses the `name` field of the first
//! item of the `authors` list. Numeric segments index arrays; every other
//! segment names an object key.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dotted path addressing one value inside an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path, addressing the whole entry.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a dotted path. Empty segments are dropped.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let joined = path
            .split('.')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        Self(joined)
    }

    /// Append one segment.
    #[must_use]
    pub fn join(&self, segment: impl fmt::Display) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{segment}", self.0))
        }
    }

    /// Whether this path addresses the whole entry.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    /// The last segment, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Borrow the dotted string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// Look up the value at `path`.
#[must_use]
pub fn get<'a>(data: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments().try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Write `value` at `path`, creating intermediate objects as needed.
///
/// An existing value at the path is overwritten. A missing or scalar parent
/// becomes an array under a numeric segment and an object otherwise; array
/// indices past the end are padded with `null`.
pub fn set(data: &mut Value, path: &FieldPath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        *data = value;
        return;
    };

    let mut current = data;
    for segment in parents {
        current = child_mut(current, segment);
    }
    *child_mut(current, last) = value;
}

fn child_mut<'a>(parent: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = segment.parse::<usize>().ok();
    let fits = parent.is_object() || (index.is_some() && parent.is_array());
    if !fits {
        *parent = if index.is_some() {
            Value::Array(Vec::new())
        } else {
            Value::Object(Map::new())
        };
    }
    match (parent, index) {
        (Value::Array(items), Some(index)) => {
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        (Value::Object(map), _) => map.entry(segment.to_string()).or_insert(Value::Null),
        // An array indexed by a number or an object; nothing else remains.
        (other, _) => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_drops_empty_segments() {
        let path = FieldPath::parse(".authors..0.name");
        assert_eq!(path.as_str(), "authors.0.name");
        assert_eq!(path.name(), Some("name"));
    }

    #[test]
    fn test_join_from_root() {
        let path = FieldPath::root().join("title");
        assert_eq!(path.as_str(), "title");
        assert_eq!(path.join(2).as_str(), "title.2");
    }

    #[test]
    fn test_get_nested() {
        let data = json!({"authors": [{"name": "Ada"}, {"name": "Grace"}]});
        let value = get(&data, &FieldPath::parse("authors.1.name"));
        assert_eq!(value, Some(&json!("Grace")));
        assert!(get(&data, &FieldPath::parse("authors.5.name")).is_none());
        assert!(get(&data, &FieldPath::parse("authors.x")).is_none());
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut data = json!({});
        set(&mut data, &FieldPath::parse("settings.posts.front_limit"), json!(5));
        assert_eq!(data, json!({"settings": {"posts": {"front_limit": 5}}}));
    }

    #[test]
    fn test_set_overwrites_last_write_wins() {
        let mut data = json!({"title": "first"});
        let path = FieldPath::parse("title");
        set(&mut data, &path, json!("second"));
        set(&mut data, &path, json!("third"));
        assert_eq!(data, json!({"title": "third"}));
    }

    #[test]
    fn test_set_pads_arrays() {
        let mut data = json!({"tags": ["a"]});
        set(&mut data, &FieldPath::parse("tags.2"), json!("c"));
        assert_eq!(data, json!({"tags": ["a", null, "c"]}));
    }

    #[test]
    fn test_set_numeric_segment_under_missing_parent_creates_array() {
        let mut data = json!({});
        set(&mut data, &FieldPath::parse("links.0.href"), json!("https://x"));
        assert_eq!(data, json!({"links": [{"href": "https://x"}]}));

        let mut data = json!({"links": null});
        set(&mut data, &FieldPath::parse("links.1"), json!("b"));
        assert_eq!(data, json!({"links": [null, "b"]}));
    }

    #[test]
    fn test_set_numeric_key_into_existing_object() {
        let mut data = json!({"ratings": {"5": "great"}});
        set(&mut data, &FieldPath::parse("ratings.1"), json!("poor"));
        assert_eq!(data, json!({"ratings": {"5": "great", "1": "poor"}}));
    }

    #[test]
    fn test_set_root_replaces_everything() {
        let mut data = json!({"title": "x"});
        set(&mut data, &FieldPath::root(), json!({"body": "y"}));
        assert_eq!(data, json!({"body": "y"}));
    }
}
