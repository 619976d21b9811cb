//! Runtime model metadata.
//!
//! The host application's models are described to this crate as plain data:
//! table and column names, display names and field kinds. This is the
//! information an ORM would expose through model introspection, flattened
//! into structs so the upload endpoint and the admin hooks can resolve
//! relations, permissions and URLs without a dependency on any one ORM.

/// Kind of a model field, as far as upload validation cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	Char,
	Integer,
	File,
	Image,
	ForeignKey,
}

/// A single field on a model
#[derive(Debug, Clone)]
pub struct FieldMeta {
	pub name: String,
	pub column: String,
	pub kind: FieldKind,
}

impl FieldMeta {
	pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
		let name = name.into();
		let column = match kind {
			FieldKind::ForeignKey => format!("{}_id", name),
			_ => name.clone(),
		};
		Self { name, column, kind }
	}

	/// Override the database column name
	pub fn with_column(mut self, column: impl Into<String>) -> Self {
		self.column = column.into();
		self
	}
}

/// Metadata for one model: identity, display names and fields
#[derive(Debug, Clone)]
pub struct ModelMeta {
	/// Application label, e.g. `"gallery"`
	pub app_label: String,
	/// Lowercase model name, e.g. `"album"`
	pub model_name: String,
	/// Database table name
	pub table_name: String,
	/// Primary key column name
	pub pk_column: String,
	/// Human-readable singular name, e.g. `"image"`
	pub verbose_name: String,
	/// Human-readable plural name, e.g. `"images"`
	pub verbose_name_plural: String,
	pub fields: Vec<FieldMeta>,
}

impl ModelMeta {
	/// Create model metadata with derived defaults: table `{app}_{model}`,
	/// pk column `id`, verbose names from the model name.
	///
	/// # Examples
	///
	/// ```
	/// use dragndrop_related::ModelMeta;
	///
	/// let meta = ModelMeta::new("gallery", "album");
	/// assert_eq!(meta.table_name, "gallery_album");
	/// assert_eq!(meta.pk_column, "id");
	/// assert_eq!(meta.verbose_name_plural, "albums");
	/// ```
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		let app_label = app_label.into();
		let model_name = model_name.into();
		let table_name = format!("{}_{}", app_label, model_name);
		let verbose_name = model_name.clone();
		let verbose_name_plural = format!("{}s", model_name);
		Self {
			app_label,
			model_name,
			table_name,
			pk_column: "id".to_string(),
			verbose_name,
			verbose_name_plural,
			fields: Vec::new(),
		}
	}

	/// Override the database table name
	pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
		self.table_name = table_name.into();
		self
	}

	/// Override the verbose names
	pub fn with_verbose_names(
		mut self,
		singular: impl Into<String>,
		plural: impl Into<String>,
	) -> Self {
		self.verbose_name = singular.into();
		self.verbose_name_plural = plural.into();
		self
	}

	/// Add a field
	pub fn with_field(mut self, field: FieldMeta) -> Self {
		self.fields.push(field);
		self
	}

	/// Look up a field by name
	pub fn get_field(&self, name: &str) -> Option<&FieldMeta> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Dotted label, e.g. `"gallery.album"`
	pub fn label(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name)
	}

	/// Permission string for an admin action, e.g. `"gallery.change_album"`
	pub fn permission(&self, action: &str) -> String {
		format!("{}.{}_{}", self.app_label, action, self.model_name)
	}

	/// Admin change-page URL for an instance of this model
	pub fn admin_change_url(&self, admin_prefix: &str, pk: i64) -> String {
		format!(
			"{}/{}/{}/{}/change/",
			admin_prefix.trim_end_matches('/'),
			self.app_label,
			self.model_name,
			pk,
		)
	}
}

/// One-to-many relation from a parent model to its attachment model
///
/// Mirrors what a reverse related manager knows: the accessor name on the
/// parent, the related model's metadata and the foreign key column on the
/// related table pointing back at the parent.
#[derive(Debug, Clone)]
pub struct RelatedDescriptor {
	/// Reverse accessor name on the parent, e.g. `"images"`
	pub accessor: String,
	/// The related (child) model
	pub model: ModelMeta,
	/// Foreign key column on the related table, e.g. `"album_id"`
	pub fk_column: String,
}

impl RelatedDescriptor {
	pub fn new(
		accessor: impl Into<String>,
		model: ModelMeta,
		fk_column: impl Into<String>,
	) -> Self {
		Self {
			accessor: accessor.into(),
			model,
			fk_column: fk_column.into(),
		}
	}
}
