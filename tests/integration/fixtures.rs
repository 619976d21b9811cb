//! Shared fixtures: example schemas, database pools and storage.
//!
//! The gallery app is an Album with many Images (image field, ordering
//! enabled); the library app is a Collection with many Ebooks (plain file
//! field restricted to PDFs, no ordering).

use dragndrop_related::{
	DragAndDropConfig, DragAndDropView, FieldKind, FieldMeta, LocalStorage, ModelMeta,
	RelatedDescriptor, RelatedModelInfo, StorageBackend,
};
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use std::sync::Arc;
use tempfile::TempDir;

pub fn album_meta() -> ModelMeta {
	ModelMeta::new("gallery", "album").with_field(FieldMeta::new("title", FieldKind::Char))
}

pub fn image_relation() -> RelatedDescriptor {
	let image = ModelMeta::new("gallery", "image")
		.with_field(FieldMeta::new("image", FieldKind::Image))
		.with_field(FieldMeta::new("album", FieldKind::ForeignKey))
		.with_field(FieldMeta::new("order", FieldKind::Integer));
	RelatedDescriptor::new("images", image, "album_id")
}

pub fn collection_meta() -> ModelMeta {
	ModelMeta::new("library", "collection").with_field(FieldMeta::new("title", FieldKind::Char))
}

pub fn ebook_relation() -> RelatedDescriptor {
	let ebook = ModelMeta::new("library", "ebook")
		.with_field(FieldMeta::new("file", FieldKind::File))
		.with_field(FieldMeta::new("collection", FieldKind::ForeignKey));
	RelatedDescriptor::new("ebooks", ebook, "collection_id")
}

/// Gallery admin configuration: ordered image uploads
pub fn gallery_config() -> DragAndDropConfig {
	DragAndDropConfig::default().with_related_model_order_field_name("order")
}

/// Library admin configuration: unordered pdf uploads into `file`
pub fn library_config() -> DragAndDropConfig {
	DragAndDropConfig::new()
		.with_related_manager_field_name("ebooks")
		.with_related_model_field_name("file")
		.with_accepted_files("application/pdf")
}

static DRIVERS: std::sync::Once = std::sync::Once::new();

/// Fresh in-memory database with both example schemas
pub async fn database() -> AnyPool {
	DRIVERS.call_once(sqlx::any::install_default_drivers);
	let pool = AnyPoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.expect("Failed to open in-memory database");

	let statements = [
		"CREATE TABLE gallery_album (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			title TEXT NOT NULL
		)",
		"CREATE TABLE gallery_image (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			image TEXT NOT NULL,
			album_id INTEGER NOT NULL REFERENCES gallery_album (id),
			\"order\" INTEGER
		)",
		"CREATE TABLE library_collection (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			title TEXT NOT NULL
		)",
		"CREATE TABLE library_ebook (
			id INTEGER PRIMARY KEY AUTOINCREMENT,
			file TEXT NOT NULL,
			collection_id INTEGER NOT NULL REFERENCES library_collection (id)
		)",
	];
	for sql in statements {
		sqlx::query(sql)
			.execute(&pool)
			.await
			.expect("Failed to create schema");
	}

	pool
}

/// Temporary local storage backend; keep the `TempDir` alive for the test
pub fn storage() -> (TempDir, Arc<dyn StorageBackend>) {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let backend = LocalStorage::new(dir.path()).expect("Failed to create storage");
	(dir, Arc::new(backend))
}

/// Insert an Album row and return its pk
pub async fn create_album(pool: &AnyPool, title: &str) -> i64 {
	sqlx::query("INSERT INTO gallery_album (title) VALUES (?)")
		.bind(title)
		.execute(pool)
		.await
		.expect("Failed to insert album");
	sqlx::query_scalar("SELECT MAX(id) FROM gallery_album")
		.fetch_one(pool)
		.await
		.expect("Failed to read album pk")
}

/// Insert an Image row with an explicit order value
pub async fn create_image(pool: &AnyPool, album_id: i64, order: i64) {
	sqlx::query("INSERT INTO gallery_image (image, album_id, \"order\") VALUES (?, ?, ?)")
		.bind(format!("existing-{order}.png"))
		.bind(album_id)
		.bind(order)
		.execute(pool)
		.await
		.expect("Failed to insert image");
}

/// Insert a Collection row and return its pk
pub async fn create_collection(pool: &AnyPool, title: &str) -> i64 {
	sqlx::query("INSERT INTO library_collection (title) VALUES (?)")
		.bind(title)
		.execute(pool)
		.await
		.expect("Failed to insert collection");
	sqlx::query_scalar("SELECT MAX(id) FROM library_collection")
		.fetch_one(pool)
		.await
		.expect("Failed to read collection pk")
}

/// Upload view for the gallery admin
pub fn gallery_view(pool: AnyPool, storage: Arc<dyn StorageBackend>) -> DragAndDropView {
	let info = RelatedModelInfo::resolve(&gallery_config(), &image_relation())
		.expect("Failed to resolve gallery info");
	DragAndDropView::new(pool, storage, album_meta(), info)
}

/// Upload view for the library admin
pub fn library_view(pool: AnyPool, storage: Arc<dyn StorageBackend>) -> DragAndDropView {
	let info = RelatedModelInfo::resolve(&library_config(), &ebook_relation())
		.expect("Failed to resolve library info");
	DragAndDropView::new(pool, storage, collection_meta(), info)
}

/// A valid minimal PNG payload (header bytes only)
pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub mod requests {
	use dragndrop_related::{AuthState, Request};
	use http::{Method, header};

	pub const BOUNDARY: &str = "----dragndrop-test";

	/// Build a multipart POST carrying one file, with the given auth state
	pub fn upload(
		path: &str,
		pk: i64,
		field_name: &str,
		filename: &str,
		content: &[u8],
		auth: Option<AuthState>,
	) -> Request {
		let body = dragndrop_related::multipart::encode_file(BOUNDARY, field_name, filename, content);
		let mut request = Request::new(Method::POST, path)
			.with_header(
				header::CONTENT_TYPE,
				format!("multipart/form-data; boundary={BOUNDARY}"),
			)
			.with_body(body)
			.with_path_param("pk", pk.to_string());
		if let Some(auth) = auth {
			request = request.with_auth(auth);
		}
		request
	}

	/// Auth state holding change permission on the gallery Album
	pub fn album_editor() -> AuthState {
		AuthState::authenticated("1", false).with_permission("gallery.change_album")
	}

	/// Auth state holding change permission on the library Collection
	pub fn collection_editor() -> AuthState {
		AuthState::authenticated("2", false).with_permission("library.change_collection")
	}
}
