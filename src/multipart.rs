//! `multipart/form-data` body parsing (RFC 7578).
//!
//! The upload endpoint receives one file per request from the uploader
//! widget; this module extracts the named parts from the raw body.

use crate::error::{DragAndDropError, Result};
use bytes::Bytes;
use std::collections::HashMap;

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
	/// Form field name the file was posted under
	pub field_name: String,
	/// Original client-side filename
	pub filename: String,
	/// Declared part Content-Type, if any
	pub content_type: Option<String>,
	/// Raw file content
	pub data: Bytes,
}

impl UploadedFile {
	/// File size in bytes
	pub fn size(&self) -> usize {
		self.data.len()
	}

	/// Lowercased filename extension, if any
	///
	/// # Examples
	///
	/// ```
	/// use dragndrop_related::UploadedFile;
	/// use bytes::Bytes;
	///
	/// let file = UploadedFile {
	///     field_name: "image".to_string(),
	///     filename: "Photo.JPG".to_string(),
	///     content_type: None,
	///     data: Bytes::new(),
	/// };
	/// assert_eq!(file.extension().as_deref(), Some("jpg"));
	/// ```
	pub fn extension(&self) -> Option<String> {
		let (stem, ext) = self.filename.rsplit_once('.')?;
		if stem.is_empty() || ext.is_empty() {
			return None;
		}
		Some(ext.to_lowercase())
	}
}

/// Parsed multipart form data: plain fields and uploaded files by field name
#[derive(Debug, Default)]
pub struct MultipartData {
	pub fields: HashMap<String, String>,
	pub files: HashMap<String, UploadedFile>,
}

impl MultipartData {
	/// Get an uploaded file by its form field name
	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.files.get(name)
	}
}

/// Parse a `multipart/form-data` body.
///
/// `content_type` is the request's Content-Type header value, which must
/// carry the boundary parameter.
///
/// # Errors
///
/// Returns [`DragAndDropError::MalformedBody`] when the content type is not
/// multipart, the boundary is missing, or a part lacks the mandatory
/// `Content-Disposition` name.
pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<MultipartData> {
	let content_type = content_type
		.ok_or_else(|| DragAndDropError::MalformedBody("Missing Content-Type".to_string()))?;
	if !content_type
		.to_lowercase()
		.starts_with("multipart/form-data")
	{
		return Err(DragAndDropError::MalformedBody(format!(
			"Expected multipart/form-data, got {}",
			content_type,
		)));
	}

	let boundary = extract_boundary(content_type)
		.ok_or_else(|| DragAndDropError::MalformedBody("Missing boundary".to_string()))?;
	let delimiter = format!("--{}", boundary).into_bytes();

	let mut data = MultipartData::default();
	for raw_part in split_parts(body, &delimiter) {
		let (headers, content) = split_headers(raw_part).ok_or_else(|| {
			DragAndDropError::MalformedBody("Part without header terminator".to_string())
		})?;
		let disposition = header_value(&headers, "content-disposition").ok_or_else(|| {
			DragAndDropError::MalformedBody("Part without Content-Disposition".to_string())
		})?;
		let name = disposition_param(&disposition, "name").ok_or_else(|| {
			DragAndDropError::MalformedBody("Content-Disposition without name".to_string())
		})?;

		match disposition_param(&disposition, "filename") {
			Some(filename) => {
				let file = UploadedFile {
					field_name: name.clone(),
					filename,
					content_type: header_value(&headers, "content-type"),
					data: Bytes::copy_from_slice(content),
				};
				data.files.insert(name, file);
			}
			None => {
				let value = String::from_utf8_lossy(content).into_owned();
				data.fields.insert(name, value);
			}
		}
	}

	Ok(data)
}

/// Extract the boundary parameter from a Content-Type header value
fn extract_boundary(content_type: &str) -> Option<String> {
	for param in content_type.split(';').skip(1) {
		let (key, value) = param.trim().split_once('=')?;
		if key.trim().eq_ignore_ascii_case("boundary") {
			return Some(value.trim().trim_matches('"').to_string());
		}
	}
	None
}

/// Split the raw body into part slices between boundary delimiters.
///
/// The closing delimiter (`--boundary--`) terminates iteration; the CRLF
/// framing around each part is stripped.
fn split_parts<'a>(body: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
	let mut parts = Vec::new();
	let mut offset = match find(body, delimiter, 0) {
		Some(index) => index + delimiter.len(),
		None => return parts,
	};

	loop {
		// After a delimiter: "--" marks the close, CRLF starts a part
		if body[offset..].starts_with(b"--") {
			break;
		}
		let start = match body[offset..].iter().position(|&b| b == b'\n') {
			Some(index) => offset + index + 1,
			None => break,
		};
		let Some(end) = find(body, delimiter, start) else {
			break;
		};
		let mut part = &body[start..end];
		if part.ends_with(b"\r\n") {
			part = &part[..part.len() - 2];
		} else if part.ends_with(b"\n") {
			part = &part[..part.len() - 1];
		}
		parts.push(part);
		offset = end + delimiter.len();
	}

	parts
}

/// Split a part into its header block and content
fn split_headers(part: &[u8]) -> Option<(String, &[u8])> {
	let terminator = find(part, b"\r\n\r\n", 0).map(|i| (i, 4)).or_else(|| {
		find(part, b"\n\n", 0).map(|i| (i, 2))
	})?;
	let headers = String::from_utf8_lossy(&part[..terminator.0]).into_owned();
	Some((headers, &part[terminator.0 + terminator.1..]))
}

/// Get a header value (case-insensitive name) from a part's header block
fn header_value(headers: &str, name: &str) -> Option<String> {
	headers.lines().find_map(|line| {
		let (key, value) = line.split_once(':')?;
		if key.trim().eq_ignore_ascii_case(name) {
			Some(value.trim().to_string())
		} else {
			None
		}
	})
}

/// Get a parameter (e.g. `name`, `filename`) from a Content-Disposition value
fn disposition_param(disposition: &str, param: &str) -> Option<String> {
	for piece in disposition.split(';').skip(1) {
		let (key, value) = piece.trim().split_once('=')?;
		if key.trim().eq_ignore_ascii_case(param) {
			return Some(value.trim().trim_matches('"').to_string());
		}
	}
	None
}

/// Find the first occurrence of `needle` in `haystack` at or after `from`
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
	if needle.is_empty() || haystack.len() < from + needle.len() {
		return None;
	}
	haystack[from..]
		.windows(needle.len())
		.position(|window| window == needle)
		.map(|index| index + from)
}

/// Build a multipart body with a single file part (primarily for tests)
pub fn encode_file(boundary: &str, field_name: &str, filename: &str, content: &[u8]) -> Vec<u8> {
	let mut body = Vec::new();
	body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
	body.extend_from_slice(
		format!(
			"Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\r\n",
			field_name, filename,
		)
		.as_bytes(),
	);
	body.extend_from_slice(content);
	body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
	body
}
