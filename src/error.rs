use crate::response::Response;
use thiserror::Error;

/// Errors that can occur while handling a drag-and-drop upload
#[derive(Debug, Error)]
pub enum DragAndDropError {
	/// The parent object named by the URL pk does not exist
	#[error("Object not found: {model}#{pk}")]
	ObjectNotFound { model: String, pk: i64 },

	/// The caller lacks the required permission
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// The request body could not be parsed as multipart/form-data
	#[error("Malformed multipart body: {0}")]
	MalformedBody(String),

	/// Upload form validation failed; holds the combined field messages
	#[error("Validation failed: {0}")]
	Validation(String),

	/// The configured relation or field does not exist on the model
	#[error("Configuration error: {0}")]
	ConfigError(String),

	/// Storage backend failure while persisting the uploaded file
	#[error("Storage error: {0}")]
	Storage(#[from] crate::storage::StorageError),

	/// Database error from sqlx
	#[error("Database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// Result type for drag-and-drop operations
pub type Result<T> = std::result::Result<T, DragAndDropError>;

impl From<DragAndDropError> for Response {
	fn from(error: DragAndDropError) -> Self {
		match error {
			DragAndDropError::ObjectNotFound { .. } => Response::not_found(),
			DragAndDropError::PermissionDenied(_) => Response::forbidden(),
			DragAndDropError::MalformedBody(msg) => Response::bad_request().with_text(msg),
			DragAndDropError::Validation(msg) => Response::bad_request().with_text(msg),
			DragAndDropError::ConfigError(msg)
			| DragAndDropError::Storage(crate::storage::StorageError::ConfigError(msg)) => {
				Response::internal_server_error().with_text(msg)
			}
			DragAndDropError::Storage(e) => {
				Response::internal_server_error().with_text(e.to_string())
			}
			DragAndDropError::Database(e) => {
				Response::internal_server_error().with_text(format!("Database error: {}", e))
			}
		}
	}
}
