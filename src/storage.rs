//! File storage backends.
//!
//! Uploaded file bytes are persisted through [`StorageBackend`]; the child
//! row stores the returned name. [`LocalStorage`] writes to the local file
//! system; other backends can be supplied by the host application.

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

/// Errors from storage backends
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("File not found: {0}")]
	NotFound(String),
	#[error("Path traversal detected in filename")]
	PathTraversal,
	#[error("Configuration error: {0}")]
	ConfigError(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage backend trait for persisting uploaded files
#[async_trait]
pub trait StorageBackend: Send + Sync {
	/// Save a file, returning the final stored name
	async fn save(&self, name: &str, content: &[u8]) -> Result<String>;

	/// Read a stored file's content
	async fn open(&self, name: &str) -> Result<Vec<u8>>;

	/// Delete a stored file
	async fn delete(&self, name: &str) -> Result<()>;

	/// Whether a stored file exists
	async fn exists(&self, name: &str) -> Result<bool>;
}

/// Validate that a filename cannot escape the storage directory.
///
/// Checks both the raw and URL-decoded forms to prevent bypasses via
/// percent-encoded traversal sequences like `%2e%2e%2f`.
pub fn validate_safe_filename(filename: &str) -> Result<()> {
	if filename.is_empty() {
		return Err(StorageError::PathTraversal);
	}
	let decoded = percent_decode_str(filename).decode_utf8_lossy();
	for candidate in [filename, decoded.as_ref()] {
		if candidate.contains('\0')
			|| candidate.contains("..")
			|| candidate.contains('/')
			|| candidate.contains('\\')
		{
			return Err(StorageError::PathTraversal);
		}
		if candidate.len() >= 2
			&& candidate.as_bytes()[0].is_ascii_alphabetic()
			&& candidate.as_bytes()[1] == b':'
		{
			return Err(StorageError::PathTraversal);
		}
	}
	Ok(())
}

/// Generate a unique stored name from an original filename.
///
/// Only the extension survives; the name itself is a random UUID v4 so
/// stored names are neither guessable nor collide.
pub fn generate_unique_filename(original_filename: &str) -> String {
	let unique_id = Uuid::new_v4();
	let basename = Path::new(original_filename)
		.file_name()
		.and_then(|n| n.to_str())
		.unwrap_or(original_filename);
	let extension = Path::new(basename)
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("");

	if extension.is_empty() {
		unique_id.to_string()
	} else {
		format!("{}.{}", unique_id, extension.to_lowercase())
	}
}

/// Local file system storage backend
#[derive(Debug, Clone)]
pub struct LocalStorage {
	base_path: PathBuf,
}

impl LocalStorage {
	/// Create a new local storage backend rooted at `base_path`.
	///
	/// # Errors
	///
	/// Returns [`StorageError::ConfigError`] if the base path does not exist
	/// or is not a directory.
	pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
		let base_path = base_path.into();

		if !base_path.exists() {
			return Err(StorageError::ConfigError(format!(
				"Base path does not exist: {}",
				base_path.display(),
			)));
		}
		if !base_path.is_dir() {
			return Err(StorageError::ConfigError(format!(
				"Base path is not a directory: {}",
				base_path.display(),
			)));
		}

		Ok(Self { base_path })
	}

	fn get_path(&self, name: &str) -> PathBuf {
		self.base_path.join(name)
	}
}

#[async_trait]
impl StorageBackend for LocalStorage {
	async fn save(&self, name: &str, content: &[u8]) -> Result<String> {
		validate_safe_filename(name)?;
		let path = self.get_path(name);
		fs::write(&path, content).await?;
		Ok(name.to_string())
	}

	async fn open(&self, name: &str) -> Result<Vec<u8>> {
		validate_safe_filename(name)?;
		let path = self.get_path(name);
		if !path.exists() {
			return Err(StorageError::NotFound(name.to_string()));
		}
		let content = fs::read(&path).await?;
		Ok(content)
	}

	async fn delete(&self, name: &str) -> Result<()> {
		validate_safe_filename(name)?;
		let path = self.get_path(name);
		if !path.exists() {
			return Err(StorageError::NotFound(name.to_string()));
		}
		fs::remove_file(&path).await?;
		Ok(())
	}

	async fn exists(&self, name: &str) -> Result<bool> {
		validate_safe_filename(name)?;
		let path = self.get_path(name);
		Ok(path.exists() && path.is_file())
	}
}
