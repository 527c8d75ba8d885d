//! Dot/array-index path expressions
//!
//! Paths such as `spec.versions[0].schema.openAPIV3Schema` address a node in a
//! parsed YAML/JSON document. Keys are separated by dots; `[n]` selects an
//! array element and may follow any key.

use serde_json::Value;

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    source: String,
    segments: Vec<Segment>,
}

impl PathExpr {
    pub fn parse(expr: &str) -> Result<Self> {
        let invalid = |reason: String| CoreError::InvalidPath {
            expr: expr.to_string(),
            reason,
        };

        if expr.trim().is_empty() {
            return Err(invalid("empty expression".to_string()));
        }

        let mut segments = Vec::new();
        for part in expr.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };

            if key.is_empty() && rest.is_empty() {
                return Err(invalid("empty key".to_string()));
            }
            if key.contains(']') {
                return Err(invalid(format!("unmatched ']' in '{}'", key)));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            } else if segments.is_empty() {
                return Err(invalid("expression cannot start with an index".to_string()));
            }

            while !rest.is_empty() {
                let inner = rest
                    .strip_prefix('[')
                    .ok_or_else(|| invalid(format!("unexpected '{}'", rest)))?;
                let close = inner
                    .find(']')
                    .ok_or_else(|| invalid("unclosed '['".to_string()))?;
                let index = inner[..close]
                    .parse::<usize>()
                    .map_err(|_| invalid(format!("bad index '{}'", &inner[..close])))?;
                segments.push(Segment::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self {
            source: expr.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Walk `doc` along this path.
    ///
    /// With `case_sensitive == false`, a key that has no exact match falls back
    /// to the first key equal ignoring ASCII case.
    pub fn resolve<'a>(&self, doc: &'a Value, case_sensitive: bool) -> Option<&'a Value> {
        self.segments.iter().try_fold(doc, |node, seg| match seg {
            Segment::Key(key) => {
                let obj = node.as_object()?;
                obj.get(key).or_else(|| {
                    if case_sensitive {
                        None
                    } else {
                        obj.iter()
                            .find(|(k, _)| k.eq_ignore_ascii_case(key))
                            .map(|(_, v)| v)
                    }
                })
            }
            Segment::Index(i) => node.as_array()?.get(*i),
        })
    }
}

impl std::fmt::Display for PathExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for PathExpr {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_segments() {
        let path = PathExpr::parse("spec.versions[0].name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("spec".to_string()),
                Segment::Key("versions".to_string()),
                Segment::Index(0),
                Segment::Key("name".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_nested_index() {
        let path = PathExpr::parse("matrix[1][2]").unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.segments()[2], Segment::Index(2));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "spec..name", "spec.versions[", "spec.versions[x]", "[0]", "a[0]b"] {
            assert!(PathExpr::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_parse_rejects_stray_bracket() {
        for bad in ["a]", "spec.ver]sions", "]"] {
            let err = PathExpr::parse(bad).unwrap_err();
            assert!(matches!(err, CoreError::InvalidPath { .. }), "{:?}", err);
        }
        assert!(PathExpr::parse("a[0]").is_ok());
    }

    #[test]
    fn test_resolve() {
        let doc = json!({
            "spec": {
                "group": "nsm.nginx.com",
                "versions": [{"name": "v1alpha1"}, {"name": "v1alpha2"}]
            }
        });

        let path = PathExpr::parse("spec.versions[1].name").unwrap();
        assert_eq!(path.resolve(&doc, true), Some(&json!("v1alpha2")));

        let path = PathExpr::parse("spec.versions[5].name").unwrap();
        assert_eq!(path.resolve(&doc, true), None);

        let path = PathExpr::parse("spec.group.name").unwrap();
        assert_eq!(path.resolve(&doc, true), None);
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let doc = json!({"Spec": {"Group": "g", "group": "exact"}});

        let path = PathExpr::parse("spec.group").unwrap();
        assert_eq!(path.resolve(&doc, true), None);
        assert_eq!(path.resolve(&doc, false), Some(&json!("exact")));

        let path = PathExpr::parse("SPEC.GROUP").unwrap();
        assert_eq!(path.resolve(&doc, false), Some(&json!("g")));
    }
}
