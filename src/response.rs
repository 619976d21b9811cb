use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};

/// HTTP Response representation
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use dragndrop_related::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// Create a Response with HTTP 400 Bad Request status
	pub fn bad_request() -> Self {
		Self::new(StatusCode::BAD_REQUEST)
	}

	/// Create a Response with HTTP 403 Forbidden status
	pub fn forbidden() -> Self {
		Self::new(StatusCode::FORBIDDEN)
	}

	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// Create a Response with HTTP 405 Method Not Allowed status
	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// Create a Response with HTTP 500 Internal Server Error status
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}

	/// Create a 302 redirect to the given location
	///
	/// # Examples
	///
	/// ```
	/// use dragndrop_related::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::redirect("/admin/gallery/album/7/change/");
	/// assert_eq!(response.status, StatusCode::FOUND);
	/// assert_eq!(
	///     response.headers.get(http::header::LOCATION).unwrap(),
	///     "/admin/gallery/album/7/change/",
	/// );
	/// ```
	pub fn redirect(location: impl AsRef<str>) -> Self {
		let mut response = Self::new(StatusCode::FOUND);
		if let Ok(value) = location.as_ref().parse() {
			response.headers.insert(header::LOCATION, value);
		}
		response
	}

	/// Set a plain-text body
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.body = Bytes::from(text.into());
		if let Ok(value) = "text/plain; charset=utf-8".parse() {
			self.headers.insert(header::CONTENT_TYPE, value);
		}
		self
	}

	/// The `Location` header value, if present
	pub fn location(&self) -> Option<&str> {
		self.headers
			.get(header::LOCATION)
			.and_then(|v| v.to_str().ok())
	}

	/// The body decoded as UTF-8 text
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}
