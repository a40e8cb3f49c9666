use std::path::PathBuf;

use clap::Args;
use url::Url;

use crate::reference::{MagmaType, SnpPopulation};

/// Production deployment of the GWAS target service
pub static DEFAULT_ENDPOINT: &str = "https://analysistools.cancer.gov/gwas-target";

/// Everything needed to describe one MAGMA gene analysis job
///
/// File parameters are local paths. A path that doesn't exist locally is treated as the name of a
/// file already hosted by the service (e.g. the default gene location file) and is not uploaded.
#[derive(Args, Debug, Clone)]
pub struct JobParameters {
    /// GWAS target API endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,
    /// MAGMA type
    #[arg(long, value_enum, default_value_t = MagmaType::Default)]
    pub magma_type: MagmaType,
    /// SNP population (GRCh37)
    #[arg(long, value_enum, default_value_t = SnpPopulation::Eur)]
    pub snp_population: SnpPopulation,
    /// Gene location file
    #[arg(long, default_value = "NCBI37.3.gene.loc")]
    pub gene_location_file: PathBuf,
    /// SNP p-values file
    #[arg(long)]
    pub snp_pvalues_file: PathBuf,
    /// Sample size
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub sample_size: u64,
    /// Tissue-specific BED filter file
    #[arg(long)]
    pub bed_filter_file: Option<PathBuf>,
    /// Email address for notifications
    #[arg(long, requires = "job_name")]
    pub email: Option<String>,
    /// Job name (required if email is set)
    #[arg(long)]
    pub job_name: Option<String>,
}

impl JobParameters {
    /// File parameters in upload order: gene location, SNP p-values, then the optional BED filter
    pub fn files(&self) -> Vec<&PathBuf> {
        let mut files = vec![&self.gene_location_file, &self.snp_pvalues_file];
        files.extend(self.bed_filter_file.as_ref());
        files
    }
}
