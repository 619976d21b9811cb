//! The drag-and-drop upload endpoint.
//!
//! One view instance serves one registered admin: it is bound at route
//! registration time to the parent model's metadata and the resolved
//! related-model info, and scoped per request to a single parent row by
//! the `pk` path parameter.

use crate::config::RelatedModelInfo;
use crate::error::{DragAndDropError, Result};
use crate::forms::UploadForm;
use crate::meta::ModelMeta;
use crate::multipart;
use crate::request::Request;
use crate::response::Response;
use crate::routing::Handler;
use crate::storage::{StorageBackend, generate_unique_filename};
use async_trait::async_trait;
use http::Method;
use sqlx::AnyPool;
use std::sync::Arc;
use tracing::{debug, info};

/// Generic view handling uploads posted by the drag-and-drop widget.
///
/// `GET` redirects to the parent's admin change page, so the endpoint URL
/// is safe to visit directly in a browser. `POST` validates the single
/// uploaded file and appends it as a new related row.
pub struct DragAndDropView {
	pool: AnyPool,
	storage: Arc<dyn StorageBackend>,
	parent: ModelMeta,
	info: RelatedModelInfo,
	admin_prefix: String,
}

impl DragAndDropView {
	pub fn new(
		pool: AnyPool,
		storage: Arc<dyn StorageBackend>,
		parent: ModelMeta,
		info: RelatedModelInfo,
	) -> Self {
		Self {
			pool,
			storage,
			parent,
			info,
			admin_prefix: "/admin".to_string(),
		}
	}

	/// Override the admin URL prefix used for the GET redirect
	pub fn with_admin_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.admin_prefix = prefix.into();
		self
	}

	/// Resolve the parent pk from the matched route parameters
	fn object_pk(&self, request: &Request) -> Result<i64> {
		request
			.path_param("pk")
			.and_then(|pk| pk.parse::<i64>().ok())
			.ok_or_else(|| DragAndDropError::ObjectNotFound {
				model: self.parent.label(),
				pk: -1,
			})
	}

	/// Look up the parent row, failing with `ObjectNotFound` if absent
	async fn get_object(&self, pk: i64) -> Result<i64> {
		let sql = format!(
			"SELECT \"{pk_col}\" FROM \"{table}\" WHERE \"{pk_col}\" = ?",
			pk_col = self.parent.pk_column,
			table = self.parent.table_name,
		);
		sqlx::query_scalar::<_, i64>(&sql)
			.bind(pk)
			.fetch_optional(&self.pool)
			.await?
			.ok_or_else(|| DragAndDropError::ObjectNotFound {
				model: self.parent.label(),
				pk,
			})
	}

	/// Handle GET: redirect to the parent's admin change page
	async fn get(&self, request: &Request) -> Result<Response> {
		let pk = self.object_pk(request)?;
		let pk = self.get_object(pk).await?;
		let location = self.parent.admin_change_url(&self.admin_prefix, pk);
		debug!(model = %self.parent.label(), pk, %location, "redirecting upload GET to change page");
		Ok(Response::redirect(location))
	}

	/// Handle POST: validate the uploaded file and create the related row.
	///
	/// The order computation and the insert run inside one database
	/// transaction. No explicit row locking is taken beyond that boundary,
	/// so the uniqueness of order values under concurrent uploads to the
	/// same parent depends on the database's isolation behavior for the
	/// MAX-then-insert pattern.
	async fn post(&self, request: &Request) -> Result<Response> {
		let permission = self.parent.permission("change");
		if !request.has_perm(&permission) {
			return Err(DragAndDropError::PermissionDenied(permission));
		}

		let pk = self.object_pk(request)?;
		let pk = self.get_object(pk).await?;

		let data = multipart::parse(request.content_type(), &request.body)?;
		let mut form = UploadForm::for_field(
			&self.info.related_model_field_name,
			self.info.field_kind(),
			self.info.dropzone_accepted_files.as_deref(),
		);
		if !form.is_valid(&data) {
			return Err(DragAndDropError::Validation(form.combined_error_message()));
		}

		// is_valid guarantees the file part is present for a required field
		let file = data
			.file(&self.info.related_model_field_name)
			.ok_or_else(|| DragAndDropError::Validation("This field is required.".to_string()))?;

		let related = &self.info.related_model;
		let mut tx = self.pool.begin().await?;

		let order = match &self.info.related_model_order_field_name {
			Some(order_field) => {
				let order_column = related
					.get_field(order_field)
					.map(|f| f.column.clone())
					.unwrap_or_else(|| order_field.clone());
				let sql = format!(
					"SELECT MAX(\"{order_column}\") FROM \"{table}\" WHERE \"{fk}\" = ?",
					table = related.table_name,
					fk = self.info.fk_column,
				);
				let max: Option<i64> = sqlx::query_scalar(&sql)
					.bind(pk)
					.fetch_one(&mut *tx)
					.await?;
				Some((max.unwrap_or(0) + 1, order_column))
			}
			None => None,
		};

		let stored_name = generate_unique_filename(&file.filename);
		let stored_name = self.storage.save(&stored_name, &file.data).await?;

		let sql = match &order {
			Some((_, order_column)) => format!(
				"INSERT INTO \"{table}\" (\"{file_col}\", \"{fk}\", \"{order_column}\") VALUES (?, ?, ?)",
				table = related.table_name,
				file_col = self.info.file_column(),
				fk = self.info.fk_column,
			),
			None => format!(
				"INSERT INTO \"{table}\" (\"{file_col}\", \"{fk}\") VALUES (?, ?)",
				table = related.table_name,
				file_col = self.info.file_column(),
				fk = self.info.fk_column,
			),
		};
		let mut query = sqlx::query(&sql).bind(stored_name.as_str()).bind(pk);
		if let Some((order_value, _)) = &order {
			query = query.bind(*order_value);
		}
		query.execute(&mut *tx).await?;

		tx.commit().await?;

		info!(
			model = %related.label(),
			parent = %self.parent.label(),
			pk,
			stored_name = %stored_name,
			order = order.as_ref().map(|(value, _)| *value),
			"created related upload",
		);
		Ok(Response::ok().with_text("Thanks, your file was processed"))
	}
}

#[async_trait]
impl Handler for DragAndDropView {
	async fn handle(&self, request: Request) -> Response {
		let result = match request.method {
			Method::GET => self.get(&request).await,
			Method::POST => self.post(&request).await,
			_ => return Response::method_not_allowed(),
		};
		result.unwrap_or_else(Response::from)
	}
}
