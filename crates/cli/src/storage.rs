//! File-backed cart persistence.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temporary sibling
//! and are renamed into place so a crash never leaves a half-written cart.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use delivery_core::cart::{CartStorage, StorageError};

/// [`CartStorage`] over a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Store keys under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Backend(format!("invalid storage key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delivery_core::cart::{CART_STORAGE_KEY, CartProduct, CartStore};
    use delivery_core::{Price, ProductId};

    use super::*;

    fn pizza() -> CartProduct {
        CartProduct {
            product_id: ProductId::generate(),
            name: "Pizza Margherita".to_string(),
            unit_price: Price::from_cents(4290).unwrap(),
            image: None,
        }
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert!(storage.load(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.save(CART_STORAGE_KEY, "[]").unwrap();

        assert!(dir.path().join("nested/delivery_cart.json").exists());
        assert_eq!(storage.load(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.save("../escape", "x"),
            Err(StorageError::Backend(_))
        ));
    }

    #[test]
    fn test_cart_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let product = pizza();

        {
            let mut cart = CartStore::open(FileStorage::new(dir.path()));
            cart.add_item(product.clone(), 2);
        }

        let cart = CartStore::open(FileStorage::new(dir.path()));
        assert_eq!(cart.quantity_of(product.product_id), 2);
        assert_eq!(cart.subtotal(), Price::from_cents(8580).unwrap());
    }

    #[test]
    fn test_corrupt_file_opens_as_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("delivery_cart.json"), "{not json").unwrap();

        let cart = CartStore::open(FileStorage::new(dir.path()));
        assert!(cart.is_empty());
        assert!(!cart.is_loading());
    }
}
