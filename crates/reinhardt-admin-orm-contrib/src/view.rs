//! Model view backed by an ORM repository

use crate::fields::{FieldOverrides, model_admin_fields};
use crate::utils::{add_id2fk_fields, identity, order_by_to_native, remove_nones};
use async_trait::async_trait;
use reinhardt_admin_orm_models::{Model, Query, Repository};
use reinhardt_admin_orm_site::{AdminSettings, ModelView, RequestState};
use reinhardt_admin_orm_types::{AdminField, AdminResult, Pk, Record, Where};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type PermissionFn = Arc<dyn Fn(&RequestState) -> bool + Send + Sync>;

/// Optional permission checks for an [`OrmModelView`]
///
/// Unset checks allow the request.
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_contrib::ViewPermissions;
/// use reinhardt_admin_orm_site::RequestState;
///
/// let permissions = ViewPermissions::new()
///     .can_delete(|state: &RequestState| state.has_role("admin"));
///
/// assert!(permissions.check_is_accessible(&RequestState::new()));
/// assert!(!permissions.check_can_delete(&RequestState::new()));
/// ```
#[derive(Clone, Default)]
pub struct ViewPermissions {
	is_accessible: Option<PermissionFn>,
	can_view_details: Option<PermissionFn>,
	can_create: Option<PermissionFn>,
	can_edit: Option<PermissionFn>,
	can_delete: Option<PermissionFn>,
}

impl fmt::Debug for ViewPermissions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewPermissions")
			.field("is_accessible", &self.is_accessible.is_some())
			.field("can_view_details", &self.can_view_details.is_some())
			.field("can_create", &self.can_create.is_some())
			.field("can_edit", &self.can_edit.is_some())
			.field("can_delete", &self.can_delete.is_some())
			.finish()
	}
}

macro_rules! permission_hook {
	($set:ident, $check:ident, $field:ident) => {
		pub fn $set(mut self, check: impl Fn(&RequestState) -> bool + Send + Sync + 'static) -> Self {
			self.$field = Some(Arc::new(check));
			self
		}

		pub fn $check(&self, state: &RequestState) -> bool {
			self.$field.as_ref().is_none_or(|check| check(state))
		}
	};
}

impl ViewPermissions {
	pub fn new() -> Self {
		Self::default()
	}

	permission_hook!(is_accessible, check_is_accessible, is_accessible);
	permission_hook!(can_view_details, check_can_view_details, can_view_details);
	permission_hook!(can_create, check_can_create, can_create);
	permission_hook!(can_edit, check_can_edit, can_edit);
	permission_hook!(can_delete, check_can_delete, can_delete);
}

/// Admin view over an ORM model
///
/// Fields are derived from the model metadata when the view is built, so a
/// model with an unmapped field type cannot be registered. Writes are
/// sanitized before reaching the repository: null values are dropped and
/// foreign-key fields are renamed to their `<name>_id` columns. Reads map
/// those columns back to field names.
pub struct OrmModelView<M, R> {
	repository: Arc<R>,
	identity: String,
	name: String,
	label: String,
	icon: Option<String>,
	fields: Vec<AdminField>,
	fk_fields: Vec<String>,
	page_size: Option<usize>,
	searchable_fields: Vec<String>,
	sortable_fields: Vec<String>,
	permissions: ViewPermissions,
	_model: PhantomData<fn() -> M>,
}

impl<M: Model, R: Repository> OrmModelView<M, R> {
	/// Build a view with fields derived as declared.
	///
	/// # Errors
	///
	/// Fails when a model field cannot be mapped to an admin field.
	pub fn new(repository: Arc<R>) -> AdminResult<Self> {
		Self::with_overrides(repository, &FieldOverrides::default())
	}

	/// Build a view prefixed with the site's `app_name`.
	pub fn for_site(repository: Arc<R>, settings: &AdminSettings) -> AdminResult<Self> {
		Self::with_overrides(repository, &FieldOverrides::for_site(settings))
	}

	/// Build a view, adjusting derived fields with `overrides`.
	///
	/// The view identity uses the same app prefix as relation identities.
	pub fn with_overrides(repository: Arc<R>, overrides: &FieldOverrides) -> AdminResult<Self> {
		let meta = M::meta();
		let fields = model_admin_fields(meta, overrides)?;
		let name = meta.short_name().to_string();
		tracing::debug!(
			model = %meta.name,
			fields = fields.len(),
			"Built ORM model view"
		);
		Ok(Self {
			repository,
			identity: identity(&meta.name, overrides.app_name.as_deref()),
			label: format!("{}s", name),
			name,
			icon: None,
			fields,
			fk_fields: meta.fk_fields().into_iter().map(str::to_string).collect(),
			page_size: None,
			searchable_fields: Vec::new(),
			sortable_fields: Vec::new(),
			permissions: ViewPermissions::default(),
			_model: PhantomData,
		})
	}

	pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
		self.identity = identity.into();
		self
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
		self.icon = Some(icon.into());
		self
	}

	pub fn with_page_size(mut self, page_size: usize) -> Self {
		self.page_size = Some(page_size);
		self
	}

	pub fn with_searchable_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.searchable_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_sortable_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.sortable_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_permissions(mut self, permissions: ViewPermissions) -> Self {
		self.permissions = permissions;
		self
	}

	pub fn repository(&self) -> &Arc<R> {
		&self.repository
	}

	fn fk_refs(&self) -> Vec<&str> {
		self.fk_fields.iter().map(String::as_str).collect()
	}

	/// Payload as stored: nulls dropped, foreign keys renamed.
	fn sanitize(&self, data: Record) -> Record {
		add_id2fk_fields(remove_nones(data), &self.fk_refs())
	}

	/// Stored row as shown: `<fk>_id` columns renamed back to field names.
	fn present(&self, mut row: Record) -> Record {
		for fk in &self.fk_fields {
			if let Some(value) = row.remove(&format!("{}_id", fk)) {
				row.insert(fk.clone(), value);
			}
		}
		row
	}

	/// Native query for `where_`, or `None` when no row can match.
	///
	/// A search term on a view without searchable fields matches nothing.
	fn query(&self, where_: Option<&Where>) -> Option<Query> {
		match where_ {
			Some(Where::Search(term)) if term.trim().is_empty() => Some(Query::new()),
			Some(Where::Search(_)) if self.searchable_fields.is_empty() => None,
			Some(Where::Search(term)) => {
				Some(Query::new().search(self.searchable_fields.iter(), term.as_str()))
			}
			Some(Where::Filter(filter)) => Some(
				add_id2fk_fields(filter.clone(), &self.fk_refs())
					.into_iter()
					.fold(Query::new(), |query, (field, value)| query.filter(field, value)),
			),
			None => Some(Query::new()),
		}
	}

	/// Native ordering with foreign keys pointed at their columns.
	fn native_ordering(&self, order_by: &[String]) -> AdminResult<Vec<String>> {
		Ok(order_by_to_native(order_by)?
			.into_iter()
			.map(|token| {
				let (sign, field) = match token.strip_prefix('-') {
					Some(field) => ("-", field),
					None => ("", token.as_str()),
				};
				if self.fk_fields.iter().any(|fk| fk == field) {
					format!("{}{}_id", sign, field)
				} else {
					token
				}
			})
			.collect())
	}
}

#[async_trait]
impl<M: Model, R: Repository + 'static> ModelView for OrmModelView<M, R> {
	fn identity(&self) -> &str {
		&self.identity
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> &str {
		&self.label
	}

	fn icon(&self) -> Option<&str> {
		self.icon.as_deref()
	}

	fn pk_attr(&self) -> &str {
		M::primary_key_field()
	}

	fn fields(&self) -> &[AdminField] {
		&self.fields
	}

	fn page_size(&self) -> Option<usize> {
		self.page_size
	}

	fn searchable_fields(&self) -> Vec<&str> {
		self.searchable_fields.iter().map(String::as_str).collect()
	}

	fn sortable_fields(&self) -> Vec<&str> {
		self.sortable_fields.iter().map(String::as_str).collect()
	}

	fn is_accessible(&self, state: &RequestState) -> bool {
		self.permissions.check_is_accessible(state)
	}

	fn can_view_details(&self, state: &RequestState) -> bool {
		self.permissions.check_can_view_details(state)
	}

	fn can_create(&self, state: &RequestState) -> bool {
		self.permissions.check_can_create(state)
	}

	fn can_edit(&self, state: &RequestState) -> bool {
		self.permissions.check_can_edit(state)
	}

	fn can_delete(&self, state: &RequestState) -> bool {
		self.permissions.check_can_delete(state)
	}

	async fn count(&self, _state: &RequestState, where_: Option<&Where>) -> AdminResult<u64> {
		match self.query(where_) {
			Some(query) => Ok(self.repository.count(&query).await?),
			None => Ok(0),
		}
	}

	async fn find_all(
		&self,
		_state: &RequestState,
		skip: usize,
		limit: usize,
		where_: Option<&Where>,
		order_by: &[String],
	) -> AdminResult<Vec<Record>> {
		let ordering = self.native_ordering(order_by)?;
		let Some(query) = self.query(where_) else {
			return Ok(Vec::new());
		};
		let query = query.order_by(ordering).offset(skip).limit(limit);
		let rows = self.repository.filter(&query).await?;
		Ok(rows.into_iter().map(|row| self.present(row)).collect())
	}

	async fn find_by_pk(&self, _state: &RequestState, pk: Pk) -> AdminResult<Option<Record>> {
		Ok(self.repository.get(pk).await?.map(|row| self.present(row)))
	}

	async fn find_by_pks(&self, _state: &RequestState, pks: &[Pk]) -> AdminResult<Vec<Record>> {
		let rows = self.repository.get_many(pks).await?;
		Ok(rows.into_iter().map(|row| self.present(row)).collect())
	}

	async fn create(&self, state: &RequestState, data: Record) -> AdminResult<Record> {
		let row = self.repository.create(self.sanitize(data)).await?;
		tracing::info!(
			view = %self.identity,
			user = state.user.as_deref().unwrap_or("-"),
			"Inserted row"
		);
		Ok(self.present(row))
	}

	async fn edit(&self, state: &RequestState, pk: Pk, data: Record) -> AdminResult<Record> {
		let row = self.repository.update(pk, self.sanitize(data)).await?;
		tracing::info!(
			view = %self.identity,
			pk,
			user = state.user.as_deref().unwrap_or("-"),
			"Updated row"
		);
		Ok(self.present(row))
	}

	async fn delete(&self, _state: &RequestState, pks: &[Pk]) -> AdminResult<u64> {
		Ok(self.repository.delete_many(pks).await?)
	}
}
