/// Style dictionary parsing
///
/// The style dictionary arrives as JSON text. A dictionary that cannot be
/// decoded never blocks generation; it degrades to an empty mapping and the
/// widget is emitted unstyled.

use serde_json::{Map, Value};

/// Ordered mapping from style-variable name to CSS body.
///
/// Entries keep the order in which they appeared in the source JSON, so the
/// generated declarations are reproducible for identical input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMapping {
    entries: Vec<(String, String)>,
}

impl StyleMapping {
    /// Decode a JSON object of strings. Anything else yields an empty mapping.
    pub fn parse(raw: &str) -> Self {
        match decode(raw) {
            Ok(mapping) => mapping,
            Err(reason) => {
                tracing::warn!("Could not parse style variables, continuing unstyled: {}", reason);
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, body)| (name.as_str(), body.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// First declared name that never appears as a whole identifier in `markup`.
    pub fn first_unreferenced(&self, markup: &str) -> Option<&str> {
        self.names().find(|name| !references_identifier(markup, name))
    }

    #[cfg(test)]
    fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body.as_str())
    }
}

impl FromIterator<(String, String)> for StyleMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut mapping = StyleMapping::default();
        for (name, body) in iter {
            match mapping.entries.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = body,
                None => mapping.entries.push((name, body)),
            }
        }
        mapping
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn references_identifier(source: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    source.match_indices(name).any(|(start, _)| {
        let before = source[..start].chars().next_back();
        let after = source[start + name.len()..].chars().next();
        !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
    })
}

fn decode(raw: &str) -> Result<StyleMapping, String> {
    let object: Map<String, Value> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    object
        .into_iter()
        .map(|(name, value)| {
            let Value::String(body) = value else {
                return Err(format!("value for '{}' is not a string", name));
            };
            if name.contains('-') {
                tracing::warn!("Style variable '{}' contains a hyphen and is not a valid identifier", name);
            }
            Ok((name, body))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_source_order() {
        let mapping = StyleMapping::parse(
            r#"{"zetaStyle": "color: red;", "alphaStyle": "color: blue;", "midStyle": ""}"#,
        );
        let names: Vec<_> = mapping.names().collect();
        assert_eq!(names, vec!["zetaStyle", "alphaStyle", "midStyle"]);
        assert_eq!(mapping.get("alphaStyle"), Some("color: blue;"));
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        for raw in ["", "not json", "[1, 2]", "\"text\"", r#"{"a": 1}"#, r#"{"a": "x", "b": null}"#, "{"] {
            assert!(StyleMapping::parse(raw).is_empty(), "expected empty mapping for {:?}", raw);
        }
    }

    #[test]
    fn test_empty_object() {
        assert!(StyleMapping::parse("{}").is_empty());
    }

    #[test]
    fn test_hyphenated_names_are_kept() {
        let mapping = StyleMapping::parse(r#"{"title-style": "color: red;"}"#);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("title-style"), Some("color: red;"));
    }

    #[test]
    fn test_first_unreferenced_matches_whole_identifiers() {
        let mapping = StyleMapping::parse(r#"{"titleStyle": "a", "bodyStyle": "b"}"#);
        let markup = "<div className={titleStyle}><p className={bodyStyleX}>{data}</p></div>";
        assert_eq!(mapping.first_unreferenced(markup), Some("bodyStyle"));

        let markup = "<div className={titleStyle}><p className={bodyStyle}>{data}</p></div>";
        assert_eq!(mapping.first_unreferenced(markup), None);
    }

    #[test]
    fn test_from_iter_replaces_duplicates_in_place() {
        let mapping: StyleMapping = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "3".to_string()),
        ]
        .into_iter()
        .collect();
        let entries: Vec<_> = mapping.iter().collect();
        assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
    }
}
