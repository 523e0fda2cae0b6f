//! Product rows and their typed column values.
//!
//! The persisted layout of the `products` table is:
//!
//! | column     | type                 |
//! |------------|----------------------|
//! | `_id`      | integer, store-owned |
//! | `name`     | text                 |
//! | `price`    | non-negative integer |
//! | `quantity` | non-negative integer |
//! | `imageUri` | text, never null     |

use std::fmt;

use crate::{ContentValues, Error, Result, Value};

/// Column names of the `products` table.
pub mod columns {
    pub const ID: &str = "_id";
    pub const NAME: &str = "name";
    pub const PRICE: &str = "price";
    pub const QUANTITY: &str = "quantity";
    pub const IMAGE_URI: &str = "imageUri";
}

/// Name of the product collection and its table.
pub const PRODUCTS: &str = "products";

/// Image reference stored when no image was chosen.
///
/// This is a fixed sentinel written into the row, not a path recomputed on
/// read.
pub const DEFAULT_IMAGE_REF: &str = "res://stockfs/drawable/default_product";

/// Largest price or quantity a row can hold.
///
/// Counts travel as [`Value::Integer`] and JSON integers, so they stay within
/// `i64`.
pub const MAX_COUNT: u64 = i64::MAX as u64;

/// Store-assigned row identifier.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowId(pub u64);

impl RowId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the `products` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: RowId,
    pub name: String,
    pub price: u64,
    pub quantity: u64,
    pub image_ref: String,
}

impl Product {
    /// Build a new row from insert values.
    ///
    /// Missing `price` and `quantity` default to 0 and a missing `name` to
    /// the empty string. A missing image reference is rejected: substituting
    /// the default image is the resolver's job, not the store's.
    pub fn from_values(id: RowId, values: ProductValues) -> Result<Self> {
        values.check_counts()?;
        let image_ref = values.image_ref.ok_or_else(|| {
            Error::invalid_argument(columns::IMAGE_URI, "image reference is required on insert")
        })?;

        Ok(Product {
            id,
            name: values.name.unwrap_or_default(),
            price: values.price.unwrap_or(0),
            quantity: values.quantity.unwrap_or(0),
            image_ref,
        })
    }

    /// Merge the provided columns into this row, leaving the rest untouched.
    pub fn apply(&mut self, values: &ProductValues) {
        if let Some(name) = &values.name {
            self.name = name.clone();
        }
        if let Some(price) = values.price {
            self.price = price;
        }
        if let Some(quantity) = values.quantity {
            self.quantity = quantity;
        }
        if let Some(image_ref) = &values.image_ref {
            self.image_ref = image_ref.clone();
        }
    }

    /// Every writable column of this row as a values object.
    pub fn to_values(&self) -> ProductValues {
        ProductValues {
            name: Some(self.name.clone()),
            price: Some(self.price),
            quantity: Some(self.quantity),
            image_ref: Some(self.image_ref.clone()),
        }
    }
}

/// A partial set of typed product columns.
///
/// `None` means "not provided": inserts fall back to defaults and updates
/// leave the stored column as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductValues {
    pub name: Option<String>,
    pub price: Option<u64>,
    pub quantity: Option<u64>,
    pub image_ref: Option<String>,
}

impl ProductValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn price(mut self, price: u64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    #[must_use]
    pub fn image_ref(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// True when no column is provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.image_ref.is_none()
    }

    /// Reject a price or quantity above [`MAX_COUNT`].
    pub fn check_counts(&self) -> Result<()> {
        for (column, count) in [(columns::PRICE, self.price), (columns::QUANTITY, self.quantity)] {
            if let Some(count) = count.filter(|&c| c > MAX_COUNT) {
                return Err(Error::invalid_argument(
                    column,
                    format!("{} is larger than {}", count, MAX_COUNT),
                ));
            }
        }
        Ok(())
    }

    /// The provided columns as an untyped payload.
    pub fn to_content_values(&self) -> ContentValues {
        let mut values = ContentValues::new();
        if let Some(name) = &self.name {
            values.put(columns::NAME, name.as_str());
        }
        if let Some(price) = self.price {
            values.put(columns::PRICE, price);
        }
        if let Some(quantity) = self.quantity {
            values.put(columns::QUANTITY, quantity);
        }
        if let Some(image_ref) = &self.image_ref {
            values.put(columns::IMAGE_URI, image_ref.as_str());
        }
        values
    }
}

impl TryFrom<&ContentValues> for ProductValues {
    type Error = Error;

    /// Validate an untyped payload column by column.
    ///
    /// Null cells count as "not provided". Counts accept non-negative
    /// integers or decimal text; anything else, and any unknown or
    /// store-owned column, is an `InvalidArgument`.
    fn try_from(content: &ContentValues) -> Result<Self> {
        let mut values = ProductValues::new();

        for (column, value) in content.iter() {
            if value.is_null() {
                continue;
            }
            match column.as_str() {
                columns::NAME => values.name = Some(text_column(column, value)?),
                columns::PRICE => values.price = Some(count_column(column, value)?),
                columns::QUANTITY => values.quantity = Some(count_column(column, value)?),
                columns::IMAGE_URI => values.image_ref = Some(text_column(column, value)?),
                columns::ID => {
                    return Err(Error::invalid_argument(
                        column.as_str(),
                        "row ids are assigned by the store",
                    ))
                }
                _ => return Err(Error::invalid_argument(column.as_str(), "unknown column")),
            }
        }

        Ok(values)
    }
}

impl TryFrom<ContentValues> for ProductValues {
    type Error = Error;

    fn try_from(content: ContentValues) -> Result<Self> {
        ProductValues::try_from(&content)
    }
}

/// Parse the text of a count field (price or quantity).
///
/// Surrounding whitespace is ignored; empty text means "not provided".
/// Values above [`MAX_COUNT`] are rejected.
pub fn parse_count(column: &str, text: &str) -> Result<Option<u64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse::<u64>() {
        Ok(count) if count <= MAX_COUNT => Ok(Some(count)),
        Ok(_) => Err(Error::invalid_argument(
            column,
            format!("'{}' is larger than {}", text, MAX_COUNT),
        )),
        Err(_) => Err(Error::invalid_argument(
            column,
            format!("expected a non-negative integer, got '{}'", text),
        )),
    }
}

fn text_column(column: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(Error::invalid_argument(
            column,
            format!("expected text, got {}", other.type_name()),
        )),
    }
}

fn count_column(column: &str, value: &Value) -> Result<u64> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| {
            Error::invalid_argument(column, format!("must not be negative, got {}", i))
        }),
        Value::String(s) => parse_count(column, s)?
            .ok_or_else(|| Error::invalid_argument(column, "expected a number, got empty text")),
        other => Err(Error::invalid_argument(
            column,
            format!("expected a non-negative integer, got {}", other.type_name()),
        )),
    }
}
