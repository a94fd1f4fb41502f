use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::DatasetError;

/// Set of region ids the user has visited.
///
/// Membership is an exact, case- and form-sensitive string match against the
/// region id (`"日本"`, `"中国-北京"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitedPlaces {
    ids: BTreeSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VisitedListJson {
    Plain(Vec<String>),
    Wrapped {
        #[serde(alias = "visitedPlaces")]
        places: Vec<String>,
    },
}

impl VisitedPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Accepts `["a", "b"]` or `{"places": [...]}` / `{"visitedPlaces": [...]}`.
    pub fn from_json_str(payload: &str) -> Result<Self, DatasetError> {
        let parsed: VisitedListJson = serde_json::from_str(payload)
            .map_err(|e| DatasetError::InvalidVisitedList(e.to_string()))?;
        let list = match parsed {
            VisitedListJson::Plain(list) => list,
            VisitedListJson::Wrapped { places } => places,
        };
        Ok(list.into_iter().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedPlaces {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VisitedPlaces;

    #[test]
    fn membership_is_exact() {
        let visited: VisitedPlaces = ["中国-北京", "Japan"].into_iter().collect();
        assert!(visited.contains("中国-北京"));
        assert!(!visited.contains("北京"));
        assert!(!visited.contains("japan"));
    }

    #[test]
    fn parses_plain_and_wrapped_lists() {
        let a = VisitedPlaces::from_json_str(r#"["日本", "中国-上海"]"#).expect("plain");
        let b = VisitedPlaces::from_json_str(r#"{"visitedPlaces": ["日本", "中国-上海"]}"#)
            .expect("wrapped");
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn rejects_non_string_entries() {
        assert!(VisitedPlaces::from_json_str("[1, 2]").is_err());
    }
}
