//! Declarative configuration for the drag-and-drop admin integration.

use crate::error::{DragAndDropError, Result};
use crate::meta::{FieldKind, ModelMeta, RelatedDescriptor};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Render context passed to the admin page templates
pub type Context = Map<String, Value>;

/// Where the client-side uploader (Dropzone) assets are loaded from.
///
/// Read once at application startup and threaded explicitly into the
/// configuration; never consulted as ambient global state afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetSource {
	/// Serve the bundled copy from the application's static files
	#[default]
	Bundled,
	/// Load from the public CDN
	Cdn,
}

impl AssetSource {
	/// Resolve from the `DRAGNDROP_USE_CDN` environment variable.
	///
	/// Any of `1`, `true`, `yes` (case-insensitive) selects [`AssetSource::Cdn`];
	/// everything else, including an unset variable, selects
	/// [`AssetSource::Bundled`].
	pub fn from_env() -> Self {
		match std::env::var("DRAGNDROP_USE_CDN") {
			Ok(value) if matches!(value.to_lowercase().as_str(), "1" | "true" | "yes") => Self::Cdn,
			_ => Self::Bundled,
		}
	}
}

/// Per-admin configuration for the drag-and-drop upload integration
///
/// The defaults match an image-gallery setup: a reverse relation named
/// `images` whose related model stores the upload in a field named `image`.
#[derive(Debug, Clone)]
pub struct DragAndDropConfig {
	/// Name of the reverse relation on the parent model to which uploads
	/// are added
	pub related_manager_field_name: String,
	/// Name of the field on the *related* model where uploads are saved
	pub related_model_field_name: String,
	/// Name of the ordering field on the related model; `None` disables
	/// order assignment
	pub related_model_order_field_name: Option<String>,
	/// Explicit `acceptedFiles` value for the uploader widget; `None` picks
	/// a default from the related field's kind
	pub accepted_files: Option<String>,
	/// Path to the custom admin `change_form` template
	pub change_form_template: String,
	/// Template the custom `change_form` template should inherit from
	pub change_form_template_parent: String,
	/// Where the uploader widget assets are loaded from
	pub asset_source: AssetSource,
}

impl Default for DragAndDropConfig {
	fn default() -> Self {
		Self {
			related_manager_field_name: "images".to_string(),
			related_model_field_name: "image".to_string(),
			related_model_order_field_name: None,
			accepted_files: None,
			change_form_template: "admin/dragndrop_related/change_form.html".to_string(),
			change_form_template_parent: "admin/change_form.html".to_string(),
			asset_source: AssetSource::default(),
		}
	}
}

impl DragAndDropConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Configuration variant for singleton admin pages: identical except the
	/// parent template is the singleton change form.
	pub fn singleton() -> Self {
		Self {
			change_form_template_parent: "admin/solo/change_form.html".to_string(),
			..Self::default()
		}
	}

	pub fn with_related_manager_field_name(mut self, name: impl Into<String>) -> Self {
		self.related_manager_field_name = name.into();
		self
	}

	pub fn with_related_model_field_name(mut self, name: impl Into<String>) -> Self {
		self.related_model_field_name = name.into();
		self
	}

	pub fn with_related_model_order_field_name(mut self, name: impl Into<String>) -> Self {
		self.related_model_order_field_name = Some(name.into());
		self
	}

	pub fn with_accepted_files(mut self, accepted: impl Into<String>) -> Self {
		self.accepted_files = Some(accepted.into());
		self
	}

	pub fn with_asset_source(mut self, source: AssetSource) -> Self {
		self.asset_source = source;
		self
	}
}

/// Resolved information about the related model and the configured fields
///
/// Pure function of the configuration plus the related model's metadata;
/// passed both into the page render context and into the upload endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedModelInfo {
	#[serde(skip)]
	pub related_model: ModelMeta,
	#[serde(skip)]
	pub fk_column: String,
	pub related_model_name: String,
	pub related_model_name_plural: String,
	pub related_manager_field_name: String,
	pub related_model_field_name: String,
	pub related_model_order_field_name: Option<String>,
	pub change_form_template_parent: String,
	pub dropzone_accepted_files: Option<String>,
	pub dropzone_use_cdn: bool,
	/// Whether the configured related field is an image field
	#[serde(skip)]
	pub field_is_image: bool,
}

impl RelatedModelInfo {
	/// Resolve the configuration against a relation's metadata.
	///
	/// `accepted_files` resolution order: explicit configuration override,
	/// else `image/*` when the related field is an image field, else
	/// unrestricted.
	///
	/// # Errors
	///
	/// Returns [`DragAndDropError::ConfigError`] if the configured field does
	/// not exist on the related model, or names a non-file field.
	pub fn resolve(config: &DragAndDropConfig, related: &RelatedDescriptor) -> Result<Self> {
		let field = related
			.model
			.get_field(&config.related_model_field_name)
			.ok_or_else(|| {
				DragAndDropError::ConfigError(format!(
					"Field '{}' does not exist on {}",
					config.related_model_field_name,
					related.model.label(),
				))
			})?;

		let field_is_image = match field.kind {
			FieldKind::Image => true,
			FieldKind::File => false,
			_ => {
				return Err(DragAndDropError::ConfigError(format!(
					"Field '{}' on {} is not a file field",
					field.name,
					related.model.label(),
				)));
			}
		};

		let dropzone_accepted_files = match &config.accepted_files {
			Some(accepted) => Some(accepted.clone()),
			None if field_is_image => Some("image/*".to_string()),
			None => None,
		};

		Ok(Self {
			related_model: related.model.clone(),
			fk_column: related.fk_column.clone(),
			related_model_name: related.model.verbose_name.clone(),
			related_model_name_plural: related.model.verbose_name_plural.clone(),
			related_manager_field_name: config.related_manager_field_name.clone(),
			related_model_field_name: config.related_model_field_name.clone(),
			related_model_order_field_name: config.related_model_order_field_name.clone(),
			change_form_template_parent: config.change_form_template_parent.clone(),
			dropzone_accepted_files,
			dropzone_use_cdn: config.asset_source == AssetSource::Cdn,
			field_is_image,
		})
	}

	/// Kind of the configured related field (image or plain file)
	pub fn field_kind(&self) -> FieldKind {
		if self.field_is_image {
			FieldKind::Image
		} else {
			FieldKind::File
		}
	}

	/// Column on the related table for the configured file field
	pub fn file_column(&self) -> &str {
		self.related_model
			.get_field(&self.related_model_field_name)
			.map(|f| f.column.as_str())
			.unwrap_or(&self.related_model_field_name)
	}

	/// Merge this info into a render context.
	///
	/// Adds `related_model` (dotted label) plus every serialized field.
	pub fn extend_context(&self, context: &mut Context) {
		context.insert(
			"related_model".to_string(),
			json!(self.related_model.label()),
		);
		if let Ok(Value::Object(map)) = serde_json::to_value(self) {
			for (key, value) in map {
				context.insert(key, value);
			}
		}
	}
}
