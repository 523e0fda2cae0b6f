use std::collections::BTreeSet;
use std::{fs, io, path};

use serde::{Deserialize, Serialize};

use stockfs_core_store::{
    Error as StoreError, Product, ProductValues, RecordStore, RowId, Rows, Table, MAX_COUNT,
};

/// File holding the `products` table, relative to the store root.
pub const TABLE_FILE: &str = "products.json";

#[derive(thiserror::Error, Debug)]
pub enum LocalStoreError {
    #[error("An error occurred trying to read the root path {path}: {error}")]
    RootPathInvalid {
        path: path::PathBuf,
        error: io::Error,
    },
    #[error("I/O error on {path}: {error}")]
    Io {
        path: path::PathBuf,
        error: io::Error,
    },
    #[error("table file {path} is inconsistent: {message}")]
    Corrupt { path: path::PathBuf, message: String },
    #[error("{0}")]
    StoreError(#[from] StoreError),
    #[error("{0}")]
    SerializationError(#[from] serde_json::error::Error),
}

impl From<LocalStoreError> for StoreError {
    fn from(error: LocalStoreError) -> Self {
        match error {
            LocalStoreError::StoreError(store_error) => store_error,
            other => StoreError::Failed {
                message: format!("{}", other),
            },
        }
    }
}

/// On-disk layout of the table file.
#[derive(Serialize, Deserialize)]
struct TableFile {
    next_id: u64,
    rows: Vec<RowRecord>,
}

#[derive(Serialize, Deserialize)]
struct RowRecord {
    #[serde(rename = "_id")]
    id: u64,
    name: String,
    price: u64,
    quantity: u64,
    #[serde(rename = "imageUri")]
    image_ref: String,
}

impl From<&Product> for RowRecord {
    fn from(row: &Product) -> Self {
        RowRecord {
            id: row.id.get(),
            name: row.name.clone(),
            price: row.price,
            quantity: row.quantity,
            image_ref: row.image_ref.clone(),
        }
    }
}

impl From<RowRecord> for Product {
    fn from(record: RowRecord) -> Self {
        Product {
            id: RowId(record.id),
            name: record.name,
            price: record.price,
            quantity: record.quantity,
            image_ref: record.image_ref,
        }
    }
}

/// A store that keeps the `products` table in a JSON file under a root
/// directory.
///
/// Every write is staged on a copy of the table, written to a temporary
/// file and renamed over [`TABLE_FILE`]. The in-memory table only changes
/// once the rename succeeded, so a failed write leaves nothing behind.
#[derive(Debug)]
pub struct LocalDiskStore {
    root: path::PathBuf,
    table: Table,
}

impl LocalDiskStore {
    /// Open (or start) the table under `root`, which must be a writable
    /// directory.
    pub fn new(root: path::PathBuf) -> Result<LocalDiskStore, LocalStoreError> {
        let attr = fs::metadata(&root).map_err(|error| LocalStoreError::RootPathInvalid {
            path: root.clone(),
            error,
        })?;

        if !attr.is_dir() {
            return Err(LocalStoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root path must be a directory."),
            });
        }

        if attr.permissions().readonly() {
            return Err(LocalStoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root directory must be writable"),
            });
        }

        let root = root
            .canonicalize()
            .map_err(|error| LocalStoreError::RootPathInvalid {
                path: root.clone(),
                error,
            })?;
        let table = Self::load(&root.join(TABLE_FILE))?;
        tracing::debug!(root = %root.display(), rows = table.len(), "opened local store");

        Ok(LocalDiskStore { root, table })
    }

    pub fn root(&self) -> &path::Path {
        &self.root
    }

    pub fn table_path(&self) -> path::PathBuf {
        self.root.join(TABLE_FILE)
    }

    fn load(file_path: &path::Path) -> Result<Table, LocalStoreError> {
        if !file_path.exists() {
            return Ok(Table::new());
        }

        tracing::debug!("Reading {}...", file_path.display());
        let file = fs::File::open(file_path).map_err(|error| LocalStoreError::Io {
            path: file_path.to_path_buf(),
            error,
        })?;
        let contents: TableFile = serde_json::from_reader(io::BufReader::new(file))?;

        let mut seen = BTreeSet::new();
        for record in &contents.rows {
            if !seen.insert(record.id) {
                return Err(LocalStoreError::Corrupt {
                    path: file_path.to_path_buf(),
                    message: format!("row id {} appears more than once", record.id),
                });
            }
            if record.price > MAX_COUNT || record.quantity > MAX_COUNT {
                return Err(LocalStoreError::Corrupt {
                    path: file_path.to_path_buf(),
                    message: format!("row {} has a count larger than {}", record.id, MAX_COUNT),
                });
            }
        }

        Ok(Table::from_parts(
            contents.rows.into_iter().map(Product::from),
            contents.next_id,
        ))
    }

    fn persist(&self, table: &Table) -> Result<(), LocalStoreError> {
        use io::Write;

        let file_path = self.table_path();
        let temp_path = self.root.join(format!("{}.tmp", TABLE_FILE));
        tracing::debug!("Writing {}...", file_path.display());

        let contents = TableFile {
            next_id: table.next_id(),
            rows: table.snapshot().iter().map(RowRecord::from).collect(),
        };
        let s = serde_json::to_string_pretty(&contents)?;

        let io_error = |path: &path::Path| {
            let path = path.to_path_buf();
            move |error| LocalStoreError::Io { path, error }
        };

        let mut f = fs::File::create(&temp_path).map_err(io_error(&temp_path))?;
        f.write_all(s.as_bytes()).map_err(io_error(&temp_path))?;
        f.sync_all().map_err(io_error(&temp_path))?;
        fs::rename(&temp_path, &file_path).map_err(io_error(&file_path))?;
        Ok(())
    }

    /// Apply `op` to a copy of the table and commit it once persisted.
    ///
    /// `op` reports whether it changed anything; unchanged tables are not
    /// written.
    fn write_with<T>(
        &mut self,
        op: impl FnOnce(&mut Table) -> Result<(T, bool), StoreError>,
    ) -> Result<T, StoreError> {
        let mut staged = self.table.clone();
        let (out, changed) = op(&mut staged)?;
        if changed {
            self.persist(&staged)?;
            self.table = staged;
        }
        Ok(out)
    }
}

impl RecordStore for LocalDiskStore {
    fn insert(&mut self, values: ProductValues) -> Result<RowId, StoreError> {
        self.write_with(|table| Ok((table.insert(values)?, true)))
    }

    fn query_all(&self) -> Result<Rows, StoreError> {
        Ok(self.table.snapshot())
    }

    fn query_one(&self, id: RowId) -> Result<Option<Product>, StoreError> {
        Ok(self.table.get(id).cloned())
    }

    fn update(&mut self, id: RowId, values: &ProductValues) -> Result<usize, StoreError> {
        self.write_with(|table| {
            let affected = table.update(id, values);
            Ok((affected, affected > 0))
        })
    }

    fn delete(&mut self, id: RowId) -> Result<usize, StoreError> {
        self.write_with(|table| {
            let affected = table.delete(id);
            Ok((affected, affected > 0))
        })
    }

    fn clear(&mut self) -> Result<usize, StoreError> {
        self.write_with(|table| {
            let removed = table.clear();
            Ok((removed, removed > 0))
        })
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.write_with(|table| {
            table.reset();
            Ok(((), true))
        })
    }
}
