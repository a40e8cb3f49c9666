use anyhow::{Context, Result};
use serde::Serialize;
use tinytemplate::{format_unescaped, TinyTemplate};
use uuid::Uuid;

use crate::request::endpoint::JobEndpoints;

/// Rendering context for the submission summary
#[derive(Serialize)]
struct SummaryContext {
    id: String,
    results_page: String,
    status_page: String,
    params: String,
    status: String,
    annotation: String,
    gene_analysis: String,
}

/// Render where to follow the job and download its results once it finishes
pub fn render_summary(id: &Uuid, endpoints: &JobEndpoints) -> Result<String> {
    /// included summary template
    static SUMMARY: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/summary.txt"));
    let mut tt = TinyTemplate::new();
    // URLs must be printed as-is, not HTML escaped
    tt.set_default_formatter(&format_unescaped);
    tt.add_template("summary", SUMMARY).context("Summary template")?;

    let context = SummaryContext {
        id: id.to_string(),
        results_page: endpoints.base.to_string(),
        status_page: endpoints.status_page.to_string(),
        params: endpoints.params(),
        status: endpoints.status(),
        annotation: endpoints.annotation_results(),
        gene_analysis: endpoints.gene_analysis_results(),
    };

    tt.render("summary", &context).context("Rendering summary")
}
