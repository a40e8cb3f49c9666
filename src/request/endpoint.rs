use anyhow::{Context, Result};
use url::Url;
use uuid::Uuid;

/// Per-job URLs on the GWAS target service, all scoped by the job ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEndpoints {
    /// Service root, also the general results page
    pub base: Url,
    pub upload: Url,
    pub submit: Url,
    pub input_data: Url,
    pub output_data: Url,
    /// Web page showing the status of this job
    pub status_page: Url,
}

impl JobEndpoints {
    pub fn new(endpoint: &Url, id: &Uuid) -> Result<JobEndpoints> {
        // https://host/ and https://host must derive the same endpoints
        let base = endpoint.as_str().trim_end_matches('/');
        Ok(JobEndpoints {
            base: parse(base)?,
            upload: parse(&format!("{base}/api/upload/{id}"))?,
            submit: parse(&format!("{base}/api/submit/{id}"))?,
            input_data: parse(&format!("{base}/api/data/input/{id}"))?,
            output_data: parse(&format!("{base}/api/data/output/{id}"))?,
            status_page: parse(&format!("{base}/analysis/{id}"))?,
        })
    }

    pub fn annotation_results(&self) -> String {
        format!("{}/annotation.genes.annot", self.output_data)
    }

    pub fn gene_analysis_results(&self) -> String {
        format!("{}/gene_analysis.genes.out", self.output_data)
    }

    /// Status document the service updates while the job runs
    pub fn status(&self) -> String {
        format!("{}/status.json", self.output_data)
    }

    /// Job parameters as stored by the service
    pub fn params(&self) -> String {
        format!("{}/params.json", self.input_data)
    }
}

fn parse(url: &str) -> Result<Url> {
    Url::parse(url).with_context(|| format!("Invalid endpoint URL {url}"))
}
