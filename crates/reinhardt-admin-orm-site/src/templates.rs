//! Template rendering for admin pages
//!
//! Built-in templates are compiled into the crate. Templates loaded from a
//! directory or added at runtime take precedence over built-ins with the
//! same name, so a project can restyle any page.

use reinhardt_admin_orm_types::{AdminError, AdminResult};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tera::{Context, Tera};

const BUILTIN_TEMPLATES: [(&str, &str); 6] = [
	("base.html", include_str!("../templates/base.html")),
	("login.html", include_str!("../templates/login.html")),
	("index.html", include_str!("../templates/index.html")),
	("list.html", include_str!("../templates/list.html")),
	("detail.html", include_str!("../templates/detail.html")),
	("form.html", include_str!("../templates/form.html")),
];

/// Navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
	pub label: String,
	pub url: String,
	pub icon: Option<String>,
	pub active: bool,
}

/// Tera environment holding built-in and project templates
pub struct AdminTemplates {
	tera: Tera,
}

impl AdminTemplates {
	/// Built-in templates only.
	///
	/// # Errors
	///
	/// Returns [`AdminError::Template`] if a built-in template fails to parse.
	pub fn new() -> AdminResult<Self> {
		let mut tera = Tera::default();
		tera.add_raw_templates(BUILTIN_TEMPLATES)
			.map_err(|e| AdminError::Template(format!("Failed to load built-in templates: {}", e)))?;
		Ok(Self { tera })
	}

	/// Built-in templates overlaid with every `*.html` file under `dir`.
	///
	/// Templates are named by their path relative to `dir`.
	pub fn with_dir(dir: &Path) -> AdminResult<Self> {
		let mut templates = Self::new()?;
		let mut files = Vec::new();
		collect_html_files(dir, dir, &mut files).map_err(|e| {
			AdminError::Template(format!("Failed to read templates from {}: {}", dir.display(), e))
		})?;
		let count = files.len();
		templates
			.tera
			.add_template_files(files)
			.map_err(|e| AdminError::Template(e.to_string()))?;
		tracing::debug!(dir = %dir.display(), count, "Loaded admin templates");
		Ok(templates)
	}

	/// Register a template from source, replacing any with the same name.
	pub fn add_template(&mut self, name: &str, source: &str) -> AdminResult<()> {
		self.tera
			.add_raw_template(name, source)
			.map_err(|e| AdminError::Template(format!("Failed to add template '{}': {}", name, e)))
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}

	/// Render a template.
	///
	/// # Errors
	///
	/// Returns [`AdminError::Template`] when the template is missing or
	/// rendering fails.
	pub fn render(&self, name: &str, context: &Context) -> AdminResult<String> {
		self.tera
			.render(name, context)
			.map_err(|e| AdminError::Template(format!("Failed to render '{}': {}", name, e)))
	}
}

fn collect_html_files(
	root: &Path,
	dir: &Path,
	files: &mut Vec<(PathBuf, Option<String>)>,
) -> std::io::Result<()> {
	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_dir() {
			collect_html_files(root, &path, files)?;
		} else if path.extension().is_some_and(|ext| ext == "html") {
			let name = path
				.strip_prefix(root)
				.unwrap_or(&path)
				.to_string_lossy()
				.replace('\\', "/");
			files.push((path, Some(name)));
		}
	}
	Ok(())
}
