use crate::request::Request;
use crate::response::Response;
use async_trait::async_trait;
use std::sync::Arc;

/// Request handler trait implemented by views
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Response;
}

/// Route definition
///
/// Combines a path pattern with a handler and an optional reversal name,
/// similar to Django's URLPattern.
#[derive(Clone)]
pub struct Route {
	pub path: String,
	pub handler: Arc<dyn Handler>,
	pub name: Option<String>,
}

impl Route {
	/// Create a new route
	pub fn new(path: impl Into<String>, handler: Arc<dyn Handler>) -> Self {
		Self {
			path: path.into(),
			handler,
			name: None,
		}
	}

	/// Set the name of the route
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path)
			.field("name", &self.name)
			.finish()
	}
}
