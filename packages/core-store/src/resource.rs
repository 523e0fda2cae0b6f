//! Resource identifiers: `<collection>` and `<collection>/<id>`.

use std::fmt;
use std::str::FromStr;

use crate::product::RowId;
use crate::{Error, Path};

/// Address of a collection or of a single row within it.
///
/// Identifiers are written exactly like paths:
///
/// ```rust
/// use stockfs_core_store::{ResourceId, RowId};
///
/// let all: ResourceId = "products".parse().unwrap();
/// let one: ResourceId = "products/3".parse().unwrap();
///
/// assert!(all.is_collection());
/// assert_eq!(one.id(), Some(RowId(3)));
/// assert!(all.contains(&one));
/// ```
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceId {
    /// Every row of a collection.
    Collection(String),
    /// One row of a collection.
    Item(String, RowId),
}

impl ResourceId {
    /// Identifier for a whole collection.
    pub fn collection(name: impl Into<String>) -> Self {
        ResourceId::Collection(name.into())
    }

    /// Identifier for one row of a collection.
    pub fn item(name: impl Into<String>, id: RowId) -> Self {
        ResourceId::Item(name.into(), id)
    }

    /// Parse an identifier string.
    pub fn parse(s: &str) -> Result<Self, Error> {
        Self::from_path(&Path::parse(s)?)
    }

    /// Interpret a validated path as a resource identifier.
    ///
    /// The first component names the collection and must be an identifier;
    /// an optional second component must be a numeric row id.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        match path.components.as_slice() {
            [] => Err(Error::InvalidPath {
                message: "empty resource identifier".to_string(),
            }),
            [name, ..] if name.chars().all(|c| c.is_ascii_digit()) => Err(Error::InvalidPath {
                message: format!("collection name expected, got '{}'", name),
            }),
            [name] => Ok(ResourceId::Collection(name.clone())),
            [name, id] => {
                let id: u64 = id.parse().map_err(|_| Error::InvalidPath {
                    message: format!("row id expected, got '{}'", id),
                })?;
                Ok(ResourceId::Item(name.clone(), RowId(id)))
            }
            _ => Err(Error::InvalidPath {
                message: format!("'{}' addresses below a row; columns are not resources", path),
            }),
        }
    }

    /// Convert back into a path.
    pub fn to_path(&self) -> Path {
        let components = match self {
            ResourceId::Collection(name) => vec![name.clone()],
            ResourceId::Item(name, id) => vec![name.clone(), id.to_string()],
        };
        Path { components }
    }

    /// Name of the collection this identifier belongs to.
    pub fn collection_name(&self) -> &str {
        match self {
            ResourceId::Collection(name) | ResourceId::Item(name, _) => name,
        }
    }

    /// Row id for item identifiers.
    pub fn id(&self) -> Option<RowId> {
        match self {
            ResourceId::Collection(_) => None,
            ResourceId::Item(_, id) => Some(*id),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ResourceId::Collection(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, ResourceId::Item(..))
    }

    /// The collection identifier owning this one (itself for collections).
    pub fn owning_collection(&self) -> ResourceId {
        ResourceId::Collection(self.collection_name().to_string())
    }

    /// Whether `other` is equal to, or a row of, this identifier.
    pub fn contains(&self, other: &ResourceId) -> bool {
        match self {
            ResourceId::Collection(name) => other.collection_name() == name,
            ResourceId::Item(..) => self == other,
        }
    }

    /// Classification of this identifier.
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceId::Collection(_) => ResourceKind::List,
            ResourceId::Item(..) => ResourceKind::Item,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Collection(name) => write!(f, "{}", name),
            ResourceId::Item(name, id) => write!(f, "{}/{}", name, id),
        }
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::parse(s)
    }
}

/// MIME-equivalent classification of an identifier.
///
/// Callers branch on this to decide which affordances make sense: deleting
/// is only meaningful for `Item`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    /// A list of product records.
    List,
    /// A single product record.
    Item,
}

impl ResourceKind {
    /// MIME-equivalent type string for a collection.
    pub fn mime_type(&self, collection: &str) -> String {
        match self {
            ResourceKind::List => format!("vnd.stockfs.dir/{}", collection),
            ResourceKind::Item => format!("vnd.stockfs.item/{}", collection),
        }
    }
}
