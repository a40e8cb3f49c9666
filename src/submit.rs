//! Upload local input files and submit a job to the GWAS target service

/// HTTP requests to the service, behind a trait so the workflow can run without a network
pub mod transport;
/// Human readable summary of a submitted job
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info};
use uuid::Uuid;

use crate::params::JobParameters;
use crate::request::endpoint::JobEndpoints;
use crate::request::job::JobParams;
use crate::request::schema::JobSchema;
use crate::submit::transport::Transport;

/// A validated job that is ready to send, or has been sent
#[derive(Debug)]
pub struct Submission {
    pub id: Uuid,
    pub endpoints: JobEndpoints,
    pub job: JobParams,
    /// File parameters present on the local filesystem, in upload order
    pub uploads: Vec<PathBuf>,
}

/// Derive endpoints, build and validate the payload, and work out which files need uploading
///
/// Doesn't touch the network, so a dry run stops here.
pub fn prepare(params: &JobParameters, id: Uuid) -> Result<Submission> {
    let endpoints = JobEndpoints::new(&params.endpoint, &id)?;
    debug!("Generated job ID: {id}");
    debug!("Upload endpoint: {}", endpoints.upload);
    debug!("Submit endpoint: {}", endpoints.submit);
    debug!("Input data endpoint: {}", endpoints.input_data);
    debug!("Output data endpoint: {}", endpoints.output_data);
    debug!("CLI parameters: {params:?}");

    let job = JobParams::new(params, id)?;
    JobSchema::load()?.validate(&job)?;

    let mut uploads = Vec::new();
    for path in params.files() {
        if path.exists() {
            uploads.push(path.clone());
        } else {
            info!("{} not found locally, assuming it is hosted by the service", path.display());
        }
    }

    Ok(Submission { id, endpoints, job, uploads })
}

/// Submit a job under a freshly generated job ID
pub async fn submit<T: Transport>(transport: &T, params: &JobParameters) -> Result<Submission> {
    submit_as(transport, params, Uuid::new_v4()).await
}

/// Upload every local file then POST the job description
///
/// Any failure aborts the remaining steps. Nothing is retried, the whole submission has to be
/// run again.
pub async fn submit_as<T: Transport>(transport: &T, params: &JobParameters, id: Uuid) -> Result<Submission> {
    let submission = prepare(params, id)?;

    for path in &submission.uploads {
        transport.upload(&submission.endpoints.upload, path).await?;
    }

    info!("Submitting job: {id}");
    debug!("Job parameters: {:?}", submission.job);
    transport.submit(&submission.endpoints.submit, &submission.job).await?;
    info!("Job submitted successfully!");

    Ok(submission)
}
