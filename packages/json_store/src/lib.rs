pub mod json_utils;
pub mod local_disk;

pub use stockfs_core_store::{Path, PathError};

pub use local_disk::{LocalDiskStore, LocalStoreError, TABLE_FILE};
