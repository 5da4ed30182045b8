//! Admin site and request routing
//!
//! Routes, relative to the configured base URL:
//!
//! | Route                          | Methods   | Handler                     |
//! |--------------------------------|-----------|-----------------------------|
//! | `/`                            | GET       | dashboard                   |
//! | `<login_path>`                 | GET, POST | login form                  |
//! | `<logout_path>`                | GET, POST | logout                      |
//! | `/api/<identity>`              | GET       | JSON list                   |
//! | `/api/<identity>/action`       | POST      | batch action                |
//! | `/<identity>/list`             | GET       | list page                   |
//! | `/<identity>/detail/<pk>`      | GET       | detail page                 |
//! | `/<identity>/create`           | GET, POST | create form                 |
//! | `/<identity>/edit/<pk>`        | GET, POST | edit form                   |
//! | custom view path               | GET       | custom page                 |
//!
//! When an auth provider is installed every route except login and logout
//! requires `AuthProvider::is_authenticated` to succeed; other requests are
//! redirected to the login page with the original URL in `next`.

use crate::actions::{self, ActionResult};
use crate::auth::{AuthProvider, LoginError, RequestState};
use crate::request::AdminRequest;
use crate::response::AdminResponse;
use crate::settings::AdminSettings;
use crate::templates::{AdminTemplates, NavItem};
use crate::views::{CustomView, ModelView, PermissionAction};
use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use reinhardt_admin_orm_types::{
	AdminError, AdminField, AdminFieldKind, AdminResult, Pk, Record, Where,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tera::Context;

#[derive(Clone)]
enum RegisteredView {
	Model(Arc<dyn ModelView>),
	Custom(Arc<dyn CustomView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Route {
	Index,
	Api(String),
	Action(String),
	List(String),
	Detail(String, String),
	Create(String),
	Edit(String, String),
	Custom(String),
}

#[derive(Debug, Serialize)]
struct Column {
	name: String,
	label: String,
}

#[derive(Debug, Serialize)]
struct Row {
	url: Option<String>,
	cells: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DetailEntry {
	label: String,
	value: String,
}

#[derive(Debug, Serialize)]
struct Choice {
	value: String,
	label: String,
	selected: bool,
}

#[derive(Debug, Serialize)]
struct FormField {
	name: String,
	label: String,
	input_type: &'static str,
	value: String,
	error: Option<String>,
	required: bool,
	maxlength: Option<u32>,
	help_text: Option<String>,
	choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct ViewSummary<'a> {
	identity: &'a str,
	name: &'a str,
	label: &'a str,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormMode {
	Create,
	Edit,
}

/// Admin site
///
/// # Examples
///
/// ```
/// use reinhardt_admin_orm_site::{AdminSettings, AdminSite};
///
/// let site = AdminSite::new(AdminSettings::default().with_title("Blog")).unwrap();
/// assert_eq!(site.url_path_for("login").as_deref(), Some("/admin/login"));
/// ```
pub struct AdminSite {
	settings: AdminSettings,
	templates: AdminTemplates,
	auth_provider: Option<Arc<dyn AuthProvider>>,
	views: Vec<RegisteredView>,
}

impl AdminSite {
	/// Create a site from validated settings.
	///
	/// # Errors
	///
	/// [`AdminError::Config`] for invalid settings, [`AdminError::Template`]
	/// when templates fail to load.
	pub fn new(settings: AdminSettings) -> AdminResult<Self> {
		settings
			.validate()
			.map_err(|e| AdminError::Config(e.to_string()))?;
		let templates = match &settings.templates_dir {
			Some(dir) => AdminTemplates::with_dir(dir)?,
			None => AdminTemplates::new()?,
		};
		Ok(Self {
			settings,
			templates,
			auth_provider: None,
			views: Vec::new(),
		})
	}

	pub fn settings(&self) -> &AdminSettings {
		&self.settings
	}

	/// Protect the site with an auth provider.
	pub fn with_auth_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
		self.auth_provider = Some(provider);
		self
	}

	/// Register a model view.
	///
	/// # Errors
	///
	/// [`AdminError::Config`] if the identity is already taken.
	pub fn add_view(&mut self, view: Arc<dyn ModelView>) -> AdminResult<()> {
		if self.find_model_view(view.identity()).is_some() {
			return Err(AdminError::Config(format!(
				"Model view '{}' is already registered",
				view.identity()
			)));
		}
		tracing::debug!(identity = view.identity(), "Registered model view");
		self.views.push(RegisteredView::Model(view));
		Ok(())
	}

	/// Register a custom page.
	///
	/// # Errors
	///
	/// [`AdminError::Config`] if the path is already taken.
	pub fn add_custom_view(&mut self, view: Arc<dyn CustomView>) -> AdminResult<()> {
		let path = normalize_path(view.path());
		if self.find_custom_view(&path).is_some() {
			return Err(AdminError::Config(format!(
				"Custom view path '{}' is already registered",
				view.path()
			)));
		}
		tracing::debug!(path = %path, name = view.name(), "Registered custom view");
		self.views.push(RegisteredView::Custom(view));
		Ok(())
	}

	/// Register a template usable by custom views.
	pub fn add_template(&mut self, name: &str, source: &str) -> AdminResult<()> {
		self.templates.add_template(name, source)
	}

	/// Identities of registered model views, in registration order.
	pub fn model_identities(&self) -> Vec<&str> {
		self.views
			.iter()
			.filter_map(|view| match view {
				RegisteredView::Model(view) => Some(view.identity()),
				RegisteredView::Custom(_) => None,
			})
			.collect()
	}

	/// Path of a named site route: `index`, `login` or `logout`.
	pub fn url_path_for(&self, name: &str) -> Option<String> {
		let prefix = self.settings.prefix();
		match name {
			"index" => Some(format!("{}/", prefix)),
			"login" => Some(format!("{}{}", prefix, self.login_path())),
			"logout" => Some(format!("{}{}", prefix, self.logout_path())),
			_ => None,
		}
	}

	fn login_path(&self) -> &str {
		self.auth_provider
			.as_ref()
			.and_then(|provider| provider.login_path())
			.unwrap_or(&self.settings.login_path)
	}

	fn logout_path(&self) -> &str {
		self.auth_provider
			.as_ref()
			.and_then(|provider| provider.logout_path())
			.unwrap_or(&self.settings.logout_path)
	}

	fn find_model_view(&self, identity: &str) -> Option<Arc<dyn ModelView>> {
		self.views.iter().find_map(|view| match view {
			RegisteredView::Model(view) if view.identity() == identity => Some(Arc::clone(view)),
			_ => None,
		})
	}

	fn find_custom_view(&self, path: &str) -> Option<Arc<dyn CustomView>> {
		self.views.iter().find_map(|view| match view {
			RegisteredView::Custom(view) if normalize_path(view.path()) == path => {
				Some(Arc::clone(view))
			}
			_ => None,
		})
	}

	fn model_view(&self, identity: &str) -> AdminResult<Arc<dyn ModelView>> {
		self.find_model_view(identity)
			.ok_or_else(|| AdminError::ModelNotRegistered(identity.to_string()))
	}

	/// Handle one HTTP request.
	pub async fn handle(&self, request: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
		let mut request = AdminRequest::from_http(request);
		request.state.session_cookie = self.settings.session_cookie.clone();
		let response = match self.dispatch(&mut request).await {
			Ok(response) => response,
			Err(err) => self.error_response(&request, err),
		};
		tracing::debug!(
			method = %request.method,
			path = %request.path,
			status = response.status().as_u16(),
			"Admin request handled"
		);
		response.into_http()
	}

	async fn dispatch(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let prefix = self.settings.prefix();
		let relative = match request.path.strip_prefix(prefix) {
			Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.to_string(),
			_ => return Err(AdminError::NotFound(request.path.clone())),
		};

		if relative == self.login_path() {
			return self.handle_login(request).await;
		}
		if relative == self.logout_path() {
			return self.handle_logout(request).await;
		}

		if let Some(provider) = &self.auth_provider
			&& !provider.is_authenticated(&mut request.state).await
		{
			return Ok(self.login_redirect(request));
		}

		let route = self.resolve(&relative)?;
		let method = request.method.clone();
		match (route, method) {
			(Route::Index, Method::GET) => self.render_index(request),
			(Route::Api(identity), Method::GET) => self.handle_api(request, &identity).await,
			(Route::Action(identity), Method::POST) => {
				self.handle_action(request, &identity).await
			}
			(Route::List(identity), Method::GET) => self.render_list(request, &identity).await,
			(Route::Detail(identity, pk), Method::GET) => {
				self.render_detail(request, &identity, &pk).await
			}
			(Route::Create(identity), Method::GET) => {
				let view = self.model_view(&identity)?;
				require(&*view, &request.state, PermissionAction::Add)?;
				self.render_form(request, &*view, FormMode::Create, None, &BTreeMap::new(), StatusCode::OK)
			}
			(Route::Create(identity), Method::POST) => self.handle_create(request, &identity).await,
			(Route::Edit(identity, pk), Method::GET) => {
				let view = self.model_view(&identity)?;
				require(&*view, &request.state, PermissionAction::Change)?;
				let pk = parse_pk(&pk)?;
				let record = find_record(&*view, &request.state, pk).await?;
				let values = record_form_values(view.fields(), &record);
				self.render_form(
					request,
					&*view,
					FormMode::Edit,
					Some((pk, values)),
					&BTreeMap::new(),
					StatusCode::OK,
				)
			}
			(Route::Edit(identity, pk), Method::POST) => {
				self.handle_edit(request, &identity, &pk).await
			}
			(Route::Custom(path), Method::GET) => self.render_custom(request, &path).await,
			_ => Ok(AdminResponse::text(
				StatusCode::METHOD_NOT_ALLOWED,
				"Method Not Allowed",
			)),
		}
	}

	fn resolve(&self, relative: &str) -> AdminResult<Route> {
		let path = normalize_path(relative);
		if path == "/" {
			return Ok(Route::Index);
		}
		if self.find_custom_view(&path).is_some() {
			return Ok(Route::Custom(path));
		}
		let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
		let route = match segments.as_slice() {
			["api", identity] => Route::Api(identity.to_string()),
			["api", identity, "action"] => Route::Action(identity.to_string()),
			[identity, "list"] => Route::List(identity.to_string()),
			[identity, "detail", pk] => Route::Detail(identity.to_string(), pk.to_string()),
			[identity, "create"] => Route::Create(identity.to_string()),
			[identity, "edit", pk] => Route::Edit(identity.to_string(), pk.to_string()),
			_ => return Err(AdminError::NotFound(relative.to_string())),
		};
		Ok(route)
	}

	fn index_url(&self, request: &AdminRequest) -> String {
		format!("{}{}/", request.origin, self.settings.prefix())
	}

	fn list_url(&self, identity: &str) -> String {
		format!("{}/{}/list", self.settings.prefix(), identity)
	}

	fn login_redirect(&self, request: &AdminRequest) -> AdminResponse {
		let next = serde_urlencoded::to_string([("next", request.url.as_str())]).unwrap_or_default();
		let location = format!(
			"{}{}{}?{}",
			request.origin,
			self.settings.prefix(),
			self.login_path(),
			next
		);
		tracing::debug!(path = %request.path, "Redirecting unauthenticated request to login");
		AdminResponse::redirect(&location)
	}

	/// Where to go after login: `next` when it stays on this site, the
	/// dashboard otherwise.
	fn login_target(&self, request: &AdminRequest) -> String {
		let site_root = format!("{}{}/", request.origin, self.settings.prefix());
		match request.query_param("next") {
			Some(next) if next.starts_with(&site_root) => next.to_string(),
			_ => site_root,
		}
	}

	fn auth_provider(&self, request: &AdminRequest) -> AdminResult<&Arc<dyn AuthProvider>> {
		self.auth_provider
			.as_ref()
			.ok_or_else(|| AdminError::NotFound(request.path.clone()))
	}

	async fn handle_login(&self, request: &AdminRequest) -> AdminResult<AdminResponse> {
		let provider = self.auth_provider(request)?;
		match request.method {
			Method::GET => self.render_login(request, StatusCode::OK, None, &BTreeMap::new()),
			Method::POST => {
				let username = request.form_value("username").unwrap_or_default();
				let password = request.form_value("password").unwrap_or_default();
				let remember_me = request.form_value("remember_me") == Some("on");
				let response = AdminResponse::redirect(&self.login_target(request));

				match provider
					.login(username, password, remember_me, &request.state, response)
					.await
				{
					Ok(response) => {
						tracing::info!(username = %username, "Admin login succeeded");
						Ok(response)
					}
					Err(LoginError::FormValidation(errors)) => {
						tracing::debug!(username = %username, "Admin login form rejected");
						self.render_login(request, StatusCode::UNPROCESSABLE_ENTITY, None, &errors)
					}
					Err(LoginError::LoginFailed(message)) => {
						tracing::info!(username = %username, "Admin login failed");
						self.render_login(request, StatusCode::BAD_REQUEST, Some(&message), &BTreeMap::new())
					}
				}
			}
			_ => Ok(AdminResponse::text(
				StatusCode::METHOD_NOT_ALLOWED,
				"Method Not Allowed",
			)),
		}
	}

	fn render_login(
		&self,
		request: &AdminRequest,
		status: StatusCode,
		error: Option<&str>,
		form_errors: &BTreeMap<String, String>,
	) -> AdminResult<AdminResponse> {
		let mut login_url = format!("{}{}", self.settings.prefix(), self.login_path());
		if !request.query.is_empty()
			&& let Ok(query) = serde_urlencoded::to_string(&request.query)
		{
			login_url = format!("{}?{}", login_url, query);
		}

		let mut context = Context::new();
		context.insert("title", &self.settings.title);
		context.insert("login_url", &login_url);
		context.insert("error", &error);
		context.insert("form_errors", form_errors);
		context.insert("username", request.form_value("username").unwrap_or_default());
		let html = self.templates.render("login.html", &context)?;
		Ok(AdminResponse::html(status, html))
	}

	async fn handle_logout(&self, request: &mut AdminRequest) -> AdminResult<AdminResponse> {
		let provider = self.auth_provider(request)?.clone();
		provider.is_authenticated(&mut request.state).await;
		let response = AdminResponse::redirect(&self.index_url(request));
		let response = provider.logout(&request.state, response).await;
		tracing::info!(
			username = request.state.user.as_deref().unwrap_or("-"),
			"Admin logout"
		);
		Ok(response)
	}

	fn base_context(&self, request: &AdminRequest) -> Context {
		let prefix = self.settings.prefix();
		let nav: Vec<NavItem> = self
			.views
			.iter()
			.filter_map(|view| match view {
				RegisteredView::Model(view) if view.is_accessible(&request.state) => {
					let section = format!("{}/{}/", prefix, view.identity());
					Some(NavItem {
						label: view.label().to_string(),
						url: format!("{}list", section),
						icon: view.icon().map(str::to_string),
						active: request.path.starts_with(&section),
					})
				}
				RegisteredView::Custom(view) if view.is_accessible(&request.state) => {
					let url = format!("{}{}", prefix, normalize_path(view.path()));
					Some(NavItem {
						label: view.label().to_string(),
						active: request.path == url,
						url,
						icon: view.icon().map(str::to_string),
					})
				}
				_ => None,
			})
			.collect();

		let user = self
			.auth_provider
			.as_ref()
			.and_then(|provider| provider.admin_user(&request.state));
		let logout_url = self
			.auth_provider
			.as_ref()
			.map(|_| format!("{}{}", prefix, self.logout_path()));

		let mut context = Context::new();
		context.insert("title", &self.settings.title);
		context.insert("index_url", &format!("{}/", prefix));
		context.insert("logout_url", &logout_url);
		context.insert("user", &user);
		context.insert("nav", &nav);
		context
	}

	fn render_index(&self, request: &AdminRequest) -> AdminResult<AdminResponse> {
		let html = self
			.templates
			.render("index.html", &self.base_context(request))?;
		Ok(AdminResponse::html(StatusCode::OK, html))
	}

	async fn render_custom(&self, request: &AdminRequest, path: &str) -> AdminResult<AdminResponse> {
		let view = self
			.find_custom_view(path)
			.ok_or_else(|| AdminError::NotFound(path.to_string()))?;
		if !view.is_accessible(&request.state) {
			return Err(AdminError::PermissionDenied(view.name().to_string()));
		}
		let mut context = self.base_context(request);
		context.extend(view.render(&request.state).await?);
		let html = self.templates.render(view.template_name(), &context)?;
		Ok(AdminResponse::html(StatusCode::OK, html))
	}

	async fn render_list(&self, request: &AdminRequest, identity: &str) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		require(&*view, &request.state, PermissionAction::View)?;

		let page_size = view.page_size().unwrap_or(self.settings.page_size).max(1);
		let page = request
			.query_param("page")
			.and_then(|p| p.parse::<usize>().ok())
			.filter(|p| *p >= 1)
			.unwrap_or(1);
		let search = request.query_param("search").unwrap_or_default().trim().to_string();
		let where_ = (!search.is_empty() && !view.searchable_fields().is_empty())
			.then(|| Where::Search(search.clone()));
		let order_by = checked_order_by(&*view, &request.query_params("order_by"))?;

		let total = view.count(&request.state, where_.as_ref()).await?;
		let total_pages = usize::try_from(total)
			.unwrap_or(usize::MAX)
			.div_ceil(page_size)
			.max(1);
		// Pages past the end show the last page.
		let page = page.min(total_pages);
		let records = view
			.find_all(
				&request.state,
				(page - 1).saturating_mul(page_size),
				page_size,
				where_.as_ref(),
				&order_by,
			)
			.await?;

		let columns: Vec<&AdminField> = view
			.fields()
			.iter()
			.filter(|field| !field.exclude_from_list)
			.collect();
		let can_view_details = view.has_permission(&request.state, PermissionAction::Detail);
		let rows: Vec<Row> = records
			.iter()
			.map(|record| Row {
				url: can_view_details
					.then(|| record_pk(&*view, record))
					.flatten()
					.map(|pk| format!("{}/{}/detail/{}", self.settings.prefix(), identity, pk)),
				cells: columns
					.iter()
					.map(|field| display_value(record.get(&field.name)))
					.collect(),
			})
			.collect();

		let list_url = self.list_url(identity);
		let page_url = |p: usize| {
			let mut params = vec![("page", p.to_string())];
			if !search.is_empty() {
				params.push(("search", search.clone()));
			}
			for directive in &order_by {
				params.push(("order_by", directive.clone()));
			}
			format!(
				"{}?{}",
				list_url,
				serde_urlencoded::to_string(&params).unwrap_or_default()
			)
		};

		let mut context = self.base_context(request);
		context.insert("view", &summary(&*view));
		context.insert(
			"columns",
			&columns
				.iter()
				.map(|field| Column {
					name: field.name.clone(),
					label: field.label.clone(),
				})
				.collect::<Vec<_>>(),
		);
		context.insert("rows", &rows);
		context.insert("total", &total);
		context.insert("page", &page);
		context.insert("total_pages", &total_pages);
		context.insert("prev_url", &(page > 1).then(|| page_url(page - 1)));
		context.insert("next_url", &(page < total_pages).then(|| page_url(page + 1)));
		context.insert("search", &search);
		context.insert("searchable", &!view.searchable_fields().is_empty());
		context.insert("list_url", &list_url);
		context.insert(
			"can_create",
			&view.has_permission(&request.state, PermissionAction::Add),
		);
		context.insert(
			"create_url",
			&format!("{}/{}/create", self.settings.prefix(), identity),
		);
		context.insert("actions", &actions::available_actions(&*view, &request.state));

		let html = self.templates.render("list.html", &context)?;
		Ok(AdminResponse::html(StatusCode::OK, html))
	}

	async fn render_detail(
		&self,
		request: &AdminRequest,
		identity: &str,
		pk: &str,
	) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		require(&*view, &request.state, PermissionAction::View)?;
		require(&*view, &request.state, PermissionAction::Detail)?;
		let pk = parse_pk(pk)?;
		let record = find_record(&*view, &request.state, pk).await?;

		let entries: Vec<DetailEntry> = view
			.fields()
			.iter()
			.filter(|field| !field.exclude_from_detail)
			.map(|field| DetailEntry {
				label: field.label.clone(),
				value: display_value(record.get(&field.name)),
			})
			.collect();
		let edit_url = view
			.has_permission(&request.state, PermissionAction::Change)
			.then(|| format!("{}/{}/edit/{}", self.settings.prefix(), identity, pk));

		let mut context = self.base_context(request);
		context.insert("view", &summary(&*view));
		context.insert("pk", &pk);
		context.insert("entries", &entries);
		context.insert("list_url", &self.list_url(identity));
		context.insert("edit_url", &edit_url);

		let html = self.templates.render("detail.html", &context)?;
		Ok(AdminResponse::html(StatusCode::OK, html))
	}

	fn render_form(
		&self,
		request: &AdminRequest,
		view: &dyn ModelView,
		mode: FormMode,
		edit: Option<(Pk, BTreeMap<String, String>)>,
		errors: &BTreeMap<String, String>,
		status: StatusCode,
	) -> AdminResult<AdminResponse> {
		let prefix = self.settings.prefix();
		let (heading, action_url, values) = match (mode, edit) {
			(FormMode::Edit, Some((pk, values))) => (
				format!("Edit {} #{}", view.name(), pk),
				format!("{}/{}/edit/{}", prefix, view.identity(), pk),
				values,
			),
			(_, edit) => (
				format!("New {}", view.name()),
				format!("{}/{}/create", prefix, view.identity()),
				edit.map(|(_, values)| values).unwrap_or_default(),
			),
		};

		let fields: Vec<FormField> = form_fields(view.fields(), mode)
			.map(|field| {
				let value = values.get(&field.name).cloned().unwrap_or_default();
				FormField {
					name: field.name.clone(),
					label: field.label.clone(),
					input_type: field.kind.input_type(),
					choices: choices(&field.kind, &value),
					value,
					error: errors.get(&field.name).cloned(),
					required: field.required,
					maxlength: match field.kind {
						AdminFieldKind::String { maxlength } => maxlength,
						_ => None,
					},
					help_text: field.help_text.clone(),
				}
			})
			.collect();

		let mut context = self.base_context(request);
		context.insert("view", &summary(view));
		context.insert("heading", &heading);
		context.insert("action_url", &action_url);
		context.insert("fields", &fields);
		context.insert("errors", &!errors.is_empty());
		context.insert("list_url", &self.list_url(view.identity()));

		let html = self.templates.render("form.html", &context)?;
		Ok(AdminResponse::html(status, html))
	}

	async fn handle_create(&self, request: &AdminRequest, identity: &str) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		require(&*view, &request.state, PermissionAction::Add)?;

		let submitted = submitted_values(request, view.fields(), FormMode::Create);
		let result = match parse_form(request, view.fields(), FormMode::Create) {
			Ok(data) => view.create(&request.state, data).await,
			Err(errors) => Err(AdminError::Validation(errors)),
		};
		match result {
			Ok(record) => {
				tracing::info!(
					view = identity,
					pk = ?record.get(view.pk_attr()),
					user = request.state.user.as_deref().unwrap_or("-"),
					"Created record"
				);
				Ok(AdminResponse::redirect(&format!(
					"{}{}",
					request.origin,
					self.list_url(identity)
				)))
			}
			Err(AdminError::Validation(errors)) => self.render_form(
				request,
				&*view,
				FormMode::Create,
				Some((0, submitted)),
				&errors,
				StatusCode::UNPROCESSABLE_ENTITY,
			),
			Err(err) => Err(err),
		}
	}

	async fn handle_edit(
		&self,
		request: &AdminRequest,
		identity: &str,
		pk: &str,
	) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		require(&*view, &request.state, PermissionAction::Change)?;
		let pk = parse_pk(pk)?;
		let record = find_record(&*view, &request.state, pk).await?;

		let mut values = record_form_values(view.fields(), &record);
		values.extend(submitted_values(request, view.fields(), FormMode::Edit));
		let result = match parse_form(request, view.fields(), FormMode::Edit) {
			Ok(data) => view.edit(&request.state, pk, data).await,
			Err(errors) => Err(AdminError::Validation(errors)),
		};
		match result {
			Ok(_) => {
				tracing::info!(
					view = identity,
					pk,
					user = request.state.user.as_deref().unwrap_or("-"),
					"Updated record"
				);
				Ok(AdminResponse::redirect(&format!(
					"{}{}",
					request.origin,
					self.list_url(identity)
				)))
			}
			Err(AdminError::Validation(errors)) => self.render_form(
				request,
				&*view,
				FormMode::Edit,
				Some((pk, values)),
				&errors,
				StatusCode::UNPROCESSABLE_ENTITY,
			),
			Err(err) => Err(err),
		}
	}

	async fn handle_api(&self, request: &AdminRequest, identity: &str) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		require(&*view, &request.state, PermissionAction::View)?;

		let pks = request.query_params("pks");
		if !pks.is_empty() {
			let pks = parse_pks(&pks)?;
			let items = view.find_by_pks(&request.state, &pks).await?;
			let total = items.len();
			return Ok(AdminResponse::json(
				StatusCode::OK,
				&json!({ "items": items, "total": total }),
			));
		}

		let page_size = view.page_size().unwrap_or(self.settings.page_size);
		let skip = parse_usize(request.query_param("skip"), "skip")?.unwrap_or(0);
		let limit = parse_usize(request.query_param("limit"), "limit")?.unwrap_or(page_size);
		let where_ = request
			.query_param("where")
			.map(parse_where)
			.filter(|w| !w.is_empty());
		let order_by = checked_order_by(&*view, &request.query_params("order_by"))?;

		let total = view.count(&request.state, where_.as_ref()).await?;
		let items = view
			.find_all(&request.state, skip, limit, where_.as_ref(), &order_by)
			.await?;
		Ok(AdminResponse::json(
			StatusCode::OK,
			&json!({ "items": items, "total": total }),
		))
	}

	async fn handle_action(&self, request: &AdminRequest, identity: &str) -> AdminResult<AdminResponse> {
		let view = self.model_view(identity)?;
		let name = request
			.query_param("name")
			.or_else(|| request.form_value("name"))
			.unwrap_or_default();
		let mut raw_pks = request.query_params("pks");
		raw_pks.extend(request.form_values("pks"));
		let pks = parse_pks(&raw_pks).map_err(|_| AdminError::ActionFailed("Invalid primary key".to_string()))?;

		match actions::execute_action(&*view, &request.state, name, &pks).await {
			Ok(ActionResult::Success { message, .. }) => {
				Ok(AdminResponse::json(StatusCode::OK, &json!({ "msg": message })))
			}
			Err(AdminError::ActionFailed(message)) => {
				tracing::debug!(view = identity, action = name, reason = %message, "Action refused");
				Ok(AdminResponse::json(
					StatusCode::BAD_REQUEST,
					&json!({ "msg": message }),
				))
			}
			Err(err) => Err(err),
		}
	}

	fn error_response(&self, request: &AdminRequest, err: AdminError) -> AdminResponse {
		let status =
			StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		if status.is_server_error() {
			tracing::error!(path = %request.path, error = %err, "Admin request failed");
		} else {
			tracing::debug!(path = %request.path, error = %err, "Admin request rejected");
		}

		let message = err.public_message();
		let api_prefix = format!("{}/api/", self.settings.prefix());
		if request.path.starts_with(&api_prefix) {
			AdminResponse::json(status, &json!({ "msg": message }))
		} else {
			AdminResponse::html(
				status,
				format!(
					"<!DOCTYPE html><html><body><h1>{}</h1><p>{}</p></body></html>",
					status,
					tera::escape_html(&message)
				),
			)
		}
	}
}

fn require(view: &dyn ModelView, state: &RequestState, action: PermissionAction) -> AdminResult<()> {
	if view.has_permission(state, action) {
		Ok(())
	} else {
		Err(AdminError::PermissionDenied(format!(
			"{} on {}",
			action.as_str(),
			view.identity()
		)))
	}
}

fn summary(view: &dyn ModelView) -> ViewSummary<'_> {
	ViewSummary {
		identity: view.identity(),
		name: view.name(),
		label: view.label(),
	}
}

async fn find_record(view: &dyn ModelView, state: &RequestState, pk: Pk) -> AdminResult<Record> {
	view.find_by_pk(state, pk)
		.await?
		.ok_or_else(|| AdminError::NotFound(format!("{} {}", view.identity(), pk)))
}

fn normalize_path(path: &str) -> String {
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() {
		"/".to_string()
	} else if trimmed.starts_with('/') {
		trimmed.to_string()
	} else {
		format!("/{}", trimmed)
	}
}

fn parse_pk(raw: &str) -> AdminResult<Pk> {
	raw.parse::<Pk>()
		.map_err(|_| AdminError::NotFound(raw.to_string()))
}

fn parse_pks(raw: &[&str]) -> AdminResult<Vec<Pk>> {
	raw.iter()
		.map(|pk| {
			pk.trim()
				.parse::<Pk>()
				.map_err(|_| AdminError::field("pks", format!("'{}' is not a valid primary key.", pk)))
		})
		.collect()
}

fn parse_usize(raw: Option<&str>, name: &str) -> AdminResult<Option<usize>> {
	raw.map(|value| {
		value
			.trim()
			.parse::<usize>()
			.map_err(|_| AdminError::field(name, "Enter a whole number."))
	})
	.transpose()
}

/// A JSON object is a structured filter; anything else is a search term.
fn parse_where(raw: &str) -> Where {
	match serde_json::from_str::<Value>(raw) {
		Ok(Value::Object(filter)) => Where::Filter(filter),
		_ => Where::Search(raw.trim().to_string()),
	}
}

/// Keep `"<field> <dir>"` directives whose field is sortable.
///
/// A view with no sortable fields declared allows every field.
fn checked_order_by(view: &dyn ModelView, directives: &[&str]) -> AdminResult<Vec<String>> {
	let sortable = view.sortable_fields();
	directives
		.iter()
		.map(|directive| directive.trim())
		.filter(|directive| !directive.is_empty())
		.map(|directive| {
			let field = directive.split_whitespace().next().unwrap_or_default();
			let allowed = if sortable.is_empty() {
				view.fields().iter().any(|f| f.name == field)
			} else {
				sortable.contains(&field)
			};
			if allowed {
				Ok(directive.to_string())
			} else {
				Err(AdminError::InvalidOrderBy(directive.to_string()))
			}
		})
		.collect()
}

fn record_pk(view: &dyn ModelView, record: &Record) -> Option<String> {
	match record.get(view.pk_attr())? {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

fn display_value(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(s)) => s.clone(),
		Some(Value::Array(items)) => items
			.iter()
			.map(|item| display_value(Some(item)))
			.collect::<Vec<_>>()
			.join(", "),
		Some(other) => other.to_string(),
	}
}

fn form_fields(fields: &[AdminField], mode: FormMode) -> impl Iterator<Item = &AdminField> {
	fields.iter().filter(move |field| {
		!field.read_only
			&& match mode {
				FormMode::Create => !field.exclude_from_create,
				FormMode::Edit => !field.exclude_from_edit,
			}
	})
}

/// Raw form input for a field.
///
/// Checkboxes post a hidden `off` before the box itself, so the last value
/// wins. Multi-valued relations are joined with commas.
fn raw_form_value(request: &AdminRequest, field: &AdminField) -> Option<String> {
	let values = request.form_values(&field.name);
	match field.kind {
		AdminFieldKind::Boolean => values.last().map(|v| v.to_string()),
		AdminFieldKind::HasMany { .. } if !values.is_empty() => Some(values.join(",")),
		_ => values.first().map(|v| v.to_string()),
	}
}

fn submitted_values(
	request: &AdminRequest,
	fields: &[AdminField],
	mode: FormMode,
) -> BTreeMap<String, String> {
	form_fields(fields, mode)
		.filter_map(|field| {
			raw_form_value(request, field).map(|value| (field.name.clone(), value))
		})
		.collect()
}

/// Parse submitted form data.
///
/// Create forms parse every editable field. Edit forms only parse fields
/// present in the submission, leaving the others unchanged.
fn parse_form(
	request: &AdminRequest,
	fields: &[AdminField],
	mode: FormMode,
) -> Result<Record, BTreeMap<String, String>> {
	let mut data = Record::new();
	let mut errors = BTreeMap::new();
	for field in form_fields(fields, mode) {
		if mode == FormMode::Edit && !request.has_form_field(&field.name) {
			continue;
		}
		match field.parse_form_value(raw_form_value(request, field).as_deref()) {
			Ok(value) => {
				data.insert(field.name.clone(), value);
			}
			Err(message) => {
				errors.insert(field.name.clone(), message);
			}
		}
	}
	if errors.is_empty() { Ok(data) } else { Err(errors) }
}

fn record_form_values(fields: &[AdminField], record: &Record) -> BTreeMap<String, String> {
	fields
		.iter()
		.filter_map(|field| {
			record.get(&field.name).map(|value| {
				let text = match value {
					Value::Array(items) => items
						.iter()
						.map(|item| display_value(Some(item)))
						.collect::<Vec<_>>()
						.join(","),
					other => display_value(Some(other)),
				};
				(field.name.clone(), text)
			})
		})
		.collect()
}

fn choices(kind: &AdminFieldKind, selected: &str) -> Vec<Choice> {
	match kind {
		AdminFieldKind::Enum { choices } => choices
			.iter()
			.map(|(value, label)| Choice {
				selected: value == selected,
				value: value.clone(),
				label: label.clone(),
			})
			.collect(),
		AdminFieldKind::IntEnum { choices } => choices
			.iter()
			.map(|(value, label)| {
				let value = value.to_string();
				Choice {
					selected: value == selected,
					value,
					label: label.clone(),
				}
			})
			.collect(),
		_ => Vec::new(),
	}
}
