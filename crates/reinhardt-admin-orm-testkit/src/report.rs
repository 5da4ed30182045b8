//! Admin-only report page

use async_trait::async_trait;
use reinhardt_admin_orm_site::{CustomView, RequestState, TemplateContext};
use reinhardt_admin_orm_types::AdminResult;

/// Template registered as `report.html`
pub const REPORT_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block content %}
<h1 class="page-title">Report</h1>
<p class="report-owner">Prepared for {{ report_owner }}</p>
{% endblock content %}"#;

/// Custom page at `/report`, visible to the `admin` role only
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportView;

#[async_trait]
impl CustomView for ReportView {
	fn path(&self) -> &str {
		"/report"
	}

	fn name(&self) -> &str {
		"report"
	}

	fn label(&self) -> &str {
		"Report"
	}

	fn icon(&self) -> Option<&str> {
		Some("fa fa-report")
	}

	fn template_name(&self) -> &str {
		"report.html"
	}

	fn is_accessible(&self, state: &RequestState) -> bool {
		state.has_role("admin")
	}

	async fn render(&self, state: &RequestState) -> AdminResult<TemplateContext> {
		let mut context = TemplateContext::new();
		context.insert("report_owner", state.user.as_deref().unwrap_or("anonymous"));
		Ok(context)
	}
}
