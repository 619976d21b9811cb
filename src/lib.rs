//! # dragndrop-related
//!
//! Drag-and-drop multiple uploading of related images/files for admin
//! change pages, inspired by django-dragndrop-related.
//!
//! Any admin-registered model with a one-to-many relation to an attachment
//! model (an Album with many Images, a Collection with many Ebooks) can get
//! a drop-target on its change page: each dropped file is POSTed to a
//! per-object upload endpoint, validated with a dynamically built
//! single-field form, and appended as a new related row, with a
//! monotonically increasing order value when an ordering field is
//! configured.
//!
//! ## Components
//!
//! - [`DragAndDropAdmin`]: declarative configuration plus the hooks the
//!   host admin framework calls for add/change render-context
//!   augmentation and upload-route registration.
//! - [`DragAndDropView`]: the upload endpoint itself. `GET` redirects to
//!   the parent's change page; `POST` validates and persists one file.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dragndrop_related::prelude::*;
//!
//! let album = ModelMeta::new("gallery", "album");
//! let image = ModelMeta::new("gallery", "image")
//!     .with_field(FieldMeta::new("image", FieldKind::Image))
//!     .with_field(FieldMeta::new("album", FieldKind::ForeignKey))
//!     .with_field(FieldMeta::new("order", FieldKind::Integer));
//! let relation = RelatedDescriptor::new("images", image, "album_id");
//!
//! let config = DragAndDropConfig::default()
//!     .with_related_model_order_field_name("order")
//!     .with_asset_source(AssetSource::from_env());
//! let admin = DragAndDropAdmin::new(album, relation, config)?;
//!
//! // At admin registration time:
//! let routes = admin.urls(pool, storage);   // {pk}/upload/ ahead of base routes
//!
//! // When rendering the add/change pages:
//! admin.extend_change_context(&mut context);
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod forms;
pub mod meta;
pub mod multipart;
pub mod request;
pub mod response;
pub mod routing;
pub mod storage;
pub mod views;

pub use admin::DragAndDropAdmin;
pub use config::{AssetSource, Context, DragAndDropConfig, RelatedModelInfo};
pub use error::{DragAndDropError, Result};
pub use forms::{AcceptList, FieldError, FileField, FormField, ImageField, UploadForm};
pub use meta::{FieldKind, FieldMeta, ModelMeta, RelatedDescriptor};
pub use multipart::{MultipartData, UploadedFile};
pub use request::{AuthState, Request};
pub use response::Response;
pub use routing::{Handler, Route};
pub use storage::{LocalStorage, StorageBackend, StorageError};
pub use views::DragAndDropView;

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::admin::DragAndDropAdmin;
	pub use crate::config::{AssetSource, Context, DragAndDropConfig, RelatedModelInfo};
	pub use crate::error::{DragAndDropError, Result};
	pub use crate::meta::{FieldKind, FieldMeta, ModelMeta, RelatedDescriptor};
	pub use crate::request::{AuthState, Request};
	pub use crate::response::Response;
	pub use crate::routing::{Handler, Route};
	pub use crate::storage::{LocalStorage, StorageBackend};
	pub use crate::views::DragAndDropView;
}
