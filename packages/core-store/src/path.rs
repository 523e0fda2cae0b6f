//! Slash-separated paths that resource identifiers are parsed from.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A segment is neither an identifier nor a run of digits.
    #[error("invalid path component '{component}' at position {position}: {message}")]
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
}

/// A validated path such as `products/12`.
///
/// Each component is either a Unicode identifier (UAX#31, with a leading
/// underscore allowed when something follows it) or a string of ASCII
/// digits. Which positions hold which is up to
/// [`ResourceId`](crate::ResourceId).
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    pub components: Vec<String>,
}

impl Path {
    /// Parse a path string.
    ///
    /// Empty segments are dropped, so leading, trailing and doubled slashes
    /// all normalize away.
    ///
    /// ```rust
    /// use stockfs_core_store::Path;
    ///
    /// let path = Path::parse("/products/12/").unwrap();
    /// assert_eq!(path.to_string(), "products/12");
    /// assert!(Path::parse("products/twelve!").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::try_from_components(
            s.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Build a path from already split components.
    pub fn try_from_components(components: Vec<String>) -> Result<Self, PathError> {
        for (position, component) in components.iter().enumerate() {
            if let Some(message) = component_problem(component) {
                return Err(PathError::InvalidComponent {
                    component: component.clone(),
                    position,
                    message,
                });
            }
        }
        Ok(Path { components })
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }
}

/// Why `component` cannot appear in a path, if it cannot.
fn component_problem(component: &str) -> Option<String> {
    if component.is_empty() {
        return Some("empty component".to_string());
    }
    if component.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut chars = component.chars();
    let first = chars.next()?;
    let starts_well = if first == '_' {
        chars.clone().next().is_some_and(unicode_ident::is_xid_continue)
    } else {
        unicode_ident::is_xid_start(first)
    };
    if !starts_well {
        return Some("must start with a letter, or an underscore and a letter or digit".to_string());
    }

    chars
        .find(|&c| !unicode_ident::is_xid_continue(c))
        .map(|c| format!("invalid character '{}' in identifier", c))
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.components.join("/"))
    }
}

/// Parse a path literal, panicking if it is invalid.
///
/// ```rust
/// use stockfs_core_store::path;
///
/// assert_eq!(path!("products/3").len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slashes_normalize() {
        for raw in ["products/7", "/products/7", "products/7/", "products//7"] {
            assert_eq!(Path::parse(raw).unwrap(), path!("products/7"), "{}", raw);
        }
        assert!(Path::parse("").unwrap().is_empty());
        assert!(Path::parse("///").unwrap().is_empty());
    }

    #[test]
    fn identifiers_and_numbers_are_components() {
        assert_eq!(path!("products/0").components, vec!["products", "0"]);
        assert_eq!(path!("produits/名前").len(), 2);
        assert!(Path::parse("_products").is_ok());
        assert!(Path::parse("_1").is_ok());
    }

    #[test]
    fn other_components_are_rejected() {
        for raw in ["products/bar baz", "products/-1", "products/.hidden", "products/12abc", "_"] {
            assert!(Path::parse(raw).is_err(), "{}", raw);
        }
    }

    #[test]
    fn errors_name_the_component_and_position() {
        let err = Path::parse("products/we-ird").unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidComponent {
                component: "we-ird".to_string(),
                position: 1,
                message: "invalid character '-' in identifier".to_string(),
            }
        );
        assert!(err.to_string().contains("position 1"));

        let err = Path::try_from_components(vec![String::new()]).unwrap_err();
        assert!(err.to_string().contains("empty component"));
    }
}
