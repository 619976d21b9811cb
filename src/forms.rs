//! Dynamic single-field upload forms.
//!
//! The endpoint builds its validation form fresh per request: one field,
//! named after the configured related-model field and typed as an image or
//! a generic file validator depending on that field's kind.

use crate::meta::FieldKind;
use crate::multipart::{MultipartData, UploadedFile};
use thiserror::Error;

/// A single field validation error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
	#[error("This field is required.")]
	Required,
	#[error("{0}")]
	Validation(String),
}

/// Result type for field validation
pub type FieldResult = std::result::Result<(), FieldError>;

/// Validation behavior for an upload form field
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;

	/// Validate the submitted file for this field
	fn clean(&self, value: Option<&UploadedFile>) -> FieldResult;
}

/// Accept-list for uploads, in the uploader widget's `acceptedFiles` syntax:
/// comma-separated MIME types (`application/pdf`), wildcard MIME prefixes
/// (`image/*`) or extensions (`.pdf`).
#[derive(Debug, Clone)]
pub struct AcceptList {
	entries: Vec<String>,
	source: String,
}

impl AcceptList {
	pub fn parse(accepted: &str) -> Self {
		Self {
			entries: accepted
				.split(',')
				.map(|entry| entry.trim().to_lowercase())
				.filter(|entry| !entry.is_empty())
				.collect(),
			source: accepted.to_string(),
		}
	}

	/// Whether the file matches any accept entry.
	///
	/// MIME entries match against the declared part Content-Type, falling
	/// back to a type guessed from the filename extension.
	pub fn matches(&self, file: &UploadedFile) -> bool {
		let extension = file.extension();
		let mime = file
			.content_type
			.as_ref()
			.map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_lowercase())
			.or_else(|| extension.as_deref().and_then(guess_mime_type));

		self.entries.iter().any(|entry| {
			if let Some(ext) = entry.strip_prefix('.') {
				extension.as_deref() == Some(ext)
			} else if let Some(prefix) = entry.strip_suffix("/*") {
				mime.as_deref()
					.is_some_and(|m| m.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/')))
			} else {
				mime.as_deref() == Some(entry)
			}
		})
	}
}

/// Guess a MIME type from a lowercased filename extension
fn guess_mime_type(extension: &str) -> Option<String> {
	let mime = match extension {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"bmp" => "image/bmp",
		"pdf" => "application/pdf",
		"txt" => "text/plain",
		"zip" => "application/zip",
		_ => return None,
	};
	Some(mime.to_string())
}

/// FileField accepting any content type unless an accept-list is configured
pub struct FileField {
	pub name: String,
	pub required: bool,
	pub allow_empty_file: bool,
	pub accepted: Option<AcceptList>,
}

impl FileField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: true,
			allow_empty_file: false,
			accepted: None,
		}
	}

	/// Restrict accepted uploads to the given accept-list
	pub fn with_accepted(mut self, accepted: &str) -> Self {
		self.accepted = Some(AcceptList::parse(accepted));
		self
	}
}

impl FormField for FileField {
	fn name(&self) -> &str {
		&self.name
	}

	fn clean(&self, value: Option<&UploadedFile>) -> FieldResult {
		match value {
			None if self.required => Err(FieldError::Required),
			None => Ok(()),
			Some(file) => {
				if file.filename.is_empty() && self.required {
					return Err(FieldError::Required);
				}
				if !self.allow_empty_file && file.size() == 0 {
					return Err(FieldError::Validation(
						"The submitted file is empty.".to_string(),
					));
				}
				if let Some(accepted) = &self.accepted
					&& !accepted.matches(file)
				{
					return Err(FieldError::Validation(format!(
						"File type is not allowed. Accepted types: {}.",
						accepted.source,
					)));
				}
				Ok(())
			}
		}
	}
}

/// ImageField with image-specific validation on top of [`FileField`] checks
pub struct ImageField {
	pub name: String,
	pub required: bool,
	pub allow_empty_file: bool,
}

impl ImageField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: true,
			allow_empty_file: false,
		}
	}

	fn is_valid_image_extension(extension: &str) -> bool {
		// SVG is intentionally excluded: it can carry scripts that execute
		// when served as image/svg+xml
		let valid_extensions = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];
		valid_extensions.contains(&extension)
	}

	/// Check that the file's magic bytes are consistent with its extension
	fn validate_magic_bytes(extension: &str, bytes: &[u8]) -> bool {
		match extension {
			"jpg" | "jpeg" => bytes.len() >= 3 && bytes[..3] == [0xFF, 0xD8, 0xFF],
			"png" => {
				bytes.len() >= 8 && bytes[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
			}
			"gif" => bytes.len() >= 4 && bytes[..4] == [0x47, 0x49, 0x46, 0x38],
			"webp" => {
				bytes.len() >= 12
					&& bytes[..4] == [0x52, 0x49, 0x46, 0x46]
					&& bytes[8..12] == [0x57, 0x45, 0x42, 0x50]
			}
			"bmp" => bytes.len() >= 2 && bytes[..2] == [0x42, 0x4D],
			_ => false,
		}
	}
}

impl FormField for ImageField {
	fn name(&self) -> &str {
		&self.name
	}

	fn clean(&self, value: Option<&UploadedFile>) -> FieldResult {
		match value {
			None if self.required => Err(FieldError::Required),
			None => Ok(()),
			Some(file) => {
				if file.filename.is_empty() && self.required {
					return Err(FieldError::Required);
				}
				if !self.allow_empty_file && file.size() == 0 {
					return Err(FieldError::Validation(
						"The submitted file is empty.".to_string(),
					));
				}

				let Some(extension) = file.extension() else {
					return Err(FieldError::Validation(
						"Upload a valid image. The file you uploaded was either not an image or a corrupted image.".to_string(),
					));
				};
				if !Self::is_valid_image_extension(&extension) {
					return Err(FieldError::Validation(
						"Upload a valid image. The file you uploaded was either not an image or a corrupted image.".to_string(),
					));
				}
				if !Self::validate_magic_bytes(&extension, &file.data) {
					return Err(FieldError::Validation(
						"Upload a valid image. The file content does not match the file extension.".to_string(),
					));
				}

				Ok(())
			}
		}
	}
}

/// Build the validator for the configured field: an image validator for
/// image fields, a generic file validator otherwise.
///
/// `accepted` is the resolved accept-list; it constrains generic file
/// fields, while image fields carry their own image checks.
pub fn build_upload_field(
	name: &str,
	kind: FieldKind,
	accepted: Option<&str>,
) -> Box<dyn FormField> {
	match kind {
		FieldKind::Image => Box::new(ImageField::new(name)),
		_ => {
			let mut field = FileField::new(name);
			if let Some(accepted) = accepted {
				field = field.with_accepted(accepted);
			}
			Box::new(field)
		}
	}
}

/// Single-field form validating one uploaded file per request
pub struct UploadForm {
	field: Box<dyn FormField>,
	errors: Vec<(String, Vec<String>)>,
}

impl UploadForm {
	/// Construct the form for a field name, kind and resolved accept-list
	pub fn for_field(name: &str, kind: FieldKind, accepted: Option<&str>) -> Self {
		Self {
			field: build_upload_field(name, kind, accepted),
			errors: Vec::new(),
		}
	}

	/// Validate the submitted multipart data; records field errors and
	/// returns whether the form is valid.
	pub fn is_valid(&mut self, data: &MultipartData) -> bool {
		self.errors.clear();
		let value = data.file(self.field.name());
		if let Err(error) = self.field.clean(value) {
			self.errors
				.push((self.field.name().to_string(), vec![error.to_string()]));
		}
		self.errors.is_empty()
	}

	/// Field errors recorded by the last [`UploadForm::is_valid`] call
	pub fn errors(&self) -> &[(String, Vec<String>)] {
		&self.errors
	}

	/// All error messages across all fields, space-joined in reported order
	pub fn combined_error_message(&self) -> String {
		self.errors
			.iter()
			.flat_map(|(_, messages)| messages.iter())
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(" ")
	}
}
