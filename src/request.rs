use bytes::Bytes;
use http::{HeaderMap, Method, header};
use std::collections::{HashMap, HashSet};

/// Authentication state attached to a request by the host's auth middleware.
///
/// Downstream handlers check permissions through [`AuthState::has_perm`];
/// admin users implicitly hold every permission.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthState {
	/// The authenticated user's ID as a string.
	pub user_id: String,

	/// Whether the user is authenticated.
	pub is_authenticated: bool,

	/// Whether the user has admin/superuser privileges.
	pub is_admin: bool,

	/// Permission strings held by the user, e.g. `"gallery.change_album"`.
	pub permissions: HashSet<String>,
}

impl AuthState {
	/// Creates a new authenticated state.
	pub fn authenticated(user_id: impl Into<String>, is_admin: bool) -> Self {
		Self {
			user_id: user_id.into(),
			is_authenticated: true,
			is_admin,
			permissions: HashSet::new(),
		}
	}

	/// Grant a permission string to this state
	pub fn with_permission(mut self, perm: impl Into<String>) -> Self {
		self.permissions.insert(perm.into());
		self
	}

	/// Whether the user holds the given permission.
	///
	/// # Examples
	///
	/// ```
	/// use dragndrop_related::AuthState;
	///
	/// let auth = AuthState::authenticated("1", false)
	///     .with_permission("gallery.change_album");
	/// assert!(auth.has_perm("gallery.change_album"));
	/// assert!(!auth.has_perm("library.change_collection"));
	/// ```
	pub fn has_perm(&self, perm: &str) -> bool {
		self.is_authenticated && (self.is_admin || self.permissions.contains(perm))
	}
}

/// HTTP Request representation
///
/// Carries the pieces of the inbound request the upload endpoint consumes:
/// method, matched path parameters, headers, raw body and auth state.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub path: String,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters captured from the matched route pattern, e.g. `pk`
	pub path_params: HashMap<String, String>,
	pub auth: Option<AuthState>,
}

impl Request {
	/// Create a new request with the given method and path
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			headers: HeaderMap::new(),
			body: Bytes::new(),
			path_params: HashMap::new(),
			auth: None,
		}
	}

	/// Set the request body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Set a header value (invalid values are ignored)
	pub fn with_header(mut self, name: header::HeaderName, value: impl AsRef<str>) -> Self {
		if let Ok(value) = value.as_ref().parse() {
			self.headers.insert(name, value);
		}
		self
	}

	/// Set a captured path parameter
	pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(name.into(), value.into());
		self
	}

	/// Attach authentication state
	pub fn with_auth(mut self, auth: AuthState) -> Self {
		self.auth = Some(auth);
		self
	}

	/// Get a captured path parameter by name
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// The `Content-Type` header value, if present and valid UTF-8
	pub fn content_type(&self) -> Option<&str> {
		self.headers
			.get(header::CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
	}

	/// Whether the request's auth state holds the given permission
	pub fn has_perm(&self, perm: &str) -> bool {
		self.auth.as_ref().is_some_and(|auth| auth.has_perm(perm))
	}
}
