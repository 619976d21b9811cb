//! Admin-integration hook tests: context contract and route registration.

use crate::fixtures::{self, PNG_BYTES, requests};
use dragndrop_related::{Context, DragAndDropAdmin, Handler};
use http::StatusCode;
use rstest::rstest;
use serde_json::{Value, json};

fn gallery_admin() -> DragAndDropAdmin {
	DragAndDropAdmin::new(
		fixtures::album_meta(),
		fixtures::image_relation(),
		fixtures::gallery_config(),
	)
	.unwrap()
}

fn library_admin() -> DragAndDropAdmin {
	DragAndDropAdmin::new(
		fixtures::collection_meta(),
		fixtures::ebook_relation(),
		fixtures::library_config(),
	)
	.unwrap()
}

#[rstest]
fn test_change_context_carries_full_template_contract() {
	// Arrange
	let admin = gallery_admin();
	let mut context = Context::new();

	// Act
	admin.extend_change_context(&mut context);

	// Assert
	assert_eq!(context["related_model"], json!("gallery.image"));
	assert_eq!(context["related_model_name"], json!("image"));
	assert_eq!(context["related_model_name_plural"], json!("images"));
	assert_eq!(context["related_manager_field_name"], json!("images"));
	assert_eq!(context["related_model_field_name"], json!("image"));
	assert_eq!(context["related_model_order_field_name"], json!("order"));
	assert_eq!(
		context["change_form_template_parent"],
		json!("admin/change_form.html"),
	);
	assert_eq!(context["dropzone_accepted_files"], json!("image/*"));
	assert_eq!(context["dropzone_use_cdn"], json!(false));
}

#[rstest]
fn test_library_context_uses_explicit_accept_and_no_order() {
	// Arrange
	let admin = library_admin();
	let mut context = Context::new();

	// Act
	admin.extend_add_context(&mut context);

	// Assert
	assert_eq!(context["related_model"], json!("library.ebook"));
	assert_eq!(context["dropzone_accepted_files"], json!("application/pdf"));
	assert_eq!(context["related_model_order_field_name"], Value::Null);
}

#[rstest]
fn test_route_names_are_derived_from_app_and_model() {
	assert_eq!(
		gallery_admin().route_name(),
		"gallery_album_drag_and_drop",
	);
	assert_eq!(
		library_admin().route_name(),
		"library_collection_drag_and_drop",
	);
}

#[rstest]
#[tokio::test]
async fn test_urls_registers_one_named_upload_route() {
	// Arrange
	let pool = fixtures::database().await;
	let (_dir, storage) = fixtures::storage();
	let admin = gallery_admin();

	// Act
	let routes = admin.urls(pool, storage);

	// Assert
	assert_eq!(routes.len(), 1);
	assert_eq!(routes[0].path, "{pk}/upload/");
	assert_eq!(
		routes[0].name.as_deref(),
		Some("gallery_album_drag_and_drop"),
	);
}

#[rstest]
#[tokio::test]
async fn test_registered_route_handles_an_upload_end_to_end() {
	// Arrange
	let pool = fixtures::database().await;
	let (_dir, storage) = fixtures::storage();
	let album_id = fixtures::create_album(&pool, "Holiday").await;
	let admin = gallery_admin();
	let routes = admin.urls(pool.clone(), storage);
	let request = requests::upload(
		"/admin/gallery/album/1/upload/",
		album_id,
		"image",
		"photo.png",
		PNG_BYTES,
		Some(requests::album_editor()),
	);

	// Act
	let response = routes[0].handler.handle(request).await;

	// Assert
	assert_eq!(response.status, StatusCode::OK);
	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_image WHERE album_id = ?")
		.bind(album_id)
		.fetch_one(&pool)
		.await
		.unwrap();
	assert_eq!(count, 1);
}
