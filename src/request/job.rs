use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::params::JobParameters;
use crate::reference::{MagmaType, SnpPopulation};

/// Genotype data always comes from the service's reference panels
static GENOTYPE_DATA_SOURCE: &str = "referenceData";
/// One sample size applies to every SNP
static SAMPLE_SIZE_TYPE: &str = "constant";

/// Job description POSTed to the submit endpoint
///
/// Files are referred to by name only: the service resolves them against uploaded files or its own
/// hosted assets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobParams {
    pub id: Uuid,
    pub magma_type: MagmaType,
    pub snp_population: SnpPopulation,
    pub reference_data_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bed_file_filter: Option<String>,
    pub gene_location_file: String,
    pub genotype_data_source: &'static str,
    #[serde(rename = "snpPValuesFile")]
    pub snp_pvalues_file: String,
    pub sample_size_type: &'static str,
    pub sample_size: u64,
    pub send_notification: bool,
    pub job_name: Option<String>,
    pub email: Option<String>,
}

impl JobParams {
    pub fn new(params: &JobParameters, id: Uuid) -> Result<JobParams> {
        let bed_file_filter = match &params.bed_filter_file {
            Some(path) => Some(strip_path(path)?),
            None => None,
        };

        Ok(JobParams {
            id,
            magma_type: params.magma_type,
            snp_population: params.snp_population,
            reference_data_files: params.snp_population.reference_data_files(),
            bed_file_filter,
            gene_location_file: strip_path(&params.gene_location_file)?,
            genotype_data_source: GENOTYPE_DATA_SOURCE,
            snp_pvalues_file: strip_path(&params.snp_pvalues_file)?,
            sample_size_type: SAMPLE_SIZE_TYPE,
            sample_size: params.sample_size,
            send_notification: params.email.is_some(),
            job_name: params.job_name.clone(),
            email: params.email.clone(),
        })
    }
}

/// Strip directories from a path, leaving the file name the service knows the file by
pub fn strip_path(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("File path {} has no file name", path.display()))
}
