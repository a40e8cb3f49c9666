//! Build the job description sent to the GWAS target service

/// Job-scoped endpoint URLs derived from the service root
pub mod endpoint;
/// The JSON job payload
pub mod job;
/// Validate the payload against the bundled JSON schema
pub mod schema;
