//! Admin integration for drag-and-drop related uploads.
//!
//! Composed explicitly rather than mixed in: an admin declares its
//! configuration once, then the host admin framework calls the three hooks
//! at its documented extension points — context augmentation for the add
//! and change pages, and route registration ahead of the base admin routes.

use crate::config::{Context, DragAndDropConfig, RelatedModelInfo};
use crate::error::Result;
use crate::meta::{ModelMeta, RelatedDescriptor};
use crate::routing::Route;
use crate::storage::StorageBackend;
use crate::views::DragAndDropView;
use sqlx::AnyPool;
use std::sync::Arc;

/// Drag-and-drop upload integration for one admin-registered parent model
///
/// # Examples
///
/// ```
/// use dragndrop_related::{
///     DragAndDropAdmin, DragAndDropConfig, FieldKind, FieldMeta, ModelMeta,
///     RelatedDescriptor,
/// };
///
/// let album = ModelMeta::new("gallery", "album");
/// let image = ModelMeta::new("gallery", "image")
///     .with_field(FieldMeta::new("image", FieldKind::Image))
///     .with_field(FieldMeta::new("album", FieldKind::ForeignKey));
/// let relation = RelatedDescriptor::new("images", image, "album_id");
///
/// let admin = DragAndDropAdmin::new(album, relation, DragAndDropConfig::default()).unwrap();
/// assert_eq!(admin.route_name(), "gallery_album_drag_and_drop");
/// ```
pub struct DragAndDropAdmin {
	model: ModelMeta,
	info: RelatedModelInfo,
	config: DragAndDropConfig,
}

impl DragAndDropAdmin {
	/// Create the integration for a parent model and its upload relation.
	///
	/// Resolution of the related-model info happens here, once, at admin
	/// registration time.
	///
	/// # Errors
	///
	/// Returns a configuration error if the configured field is missing
	/// from the related model or is not a file field.
	pub fn new(
		model: ModelMeta,
		relation: RelatedDescriptor,
		config: DragAndDropConfig,
	) -> Result<Self> {
		let info = RelatedModelInfo::resolve(&config, &relation)?;
		Ok(Self {
			model,
			info,
			config,
		})
	}

	/// The parent model this admin integration is attached to
	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	/// Path to the custom admin change-form template
	pub fn change_form_template(&self) -> &str {
		&self.config.change_form_template
	}

	/// Resolved info about the related model and the configured fields
	pub fn related_model_info(&self) -> &RelatedModelInfo {
		&self.info
	}

	/// Name under which the upload route is registered
	pub fn route_name(&self) -> String {
		format!(
			"{}_{}_drag_and_drop",
			self.model.app_label, self.model.model_name,
		)
	}

	/// Hook: merge the related-model info into the add-page render context
	pub fn extend_add_context(&self, context: &mut Context) {
		self.info.extend_context(context);
	}

	/// Hook: merge the related-model info into the change-page render context
	pub fn extend_change_context(&self, context: &mut Context) {
		self.info.extend_context(context);
	}

	/// Hook: build the routes to register ahead of the base admin routes.
	///
	/// Returns a single route, pattern `{pk}/upload/`, named
	/// `{app}_{model}_drag_and_drop`, bound to a [`DragAndDropView`]
	/// configured for this admin's parent model.
	pub fn urls(&self, pool: AnyPool, storage: Arc<dyn StorageBackend>) -> Vec<Route> {
		let view = DragAndDropView::new(
			pool,
			storage,
			self.model.clone(),
			self.info.clone(),
		);
		vec![Route::new("{pk}/upload/", Arc::new(view)).with_name(self.route_name())]
	}
}
