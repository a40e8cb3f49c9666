use anyhow::{anyhow, bail, Context, Result};
use jsonschema::JSONSchema;
use log::{info, warn};
use serde_json::Value;

use crate::request::job::JobParams;

/// Compiled JSON schema describing the job payload accepted by the submit endpoint
pub struct JobSchema {
    compiled: JSONSchema,
}

impl JobSchema {
    pub fn load() -> Result<JobSchema> {
        /// included job schema
        static SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/schema/job.json"));
        let schema: Value = serde_json::from_str(SCHEMA).context("Parsing bundled job schema")?;
        let compiled = JSONSchema::options()
            .compile(&schema)
            .map_err(|err| anyhow!("Invalid bundled job schema: {err}"))?;
        Ok(JobSchema { compiled })
    }

    /// Serialise the job and check it against the schema, reporting every violation
    pub fn validate(&self, job: &JobParams) -> Result<Value> {
        info!("Validating job parameters against JSON schema");
        let json = serde_json::to_value(job).context("Serialising job parameters")?;
        self.validate_value(&json)?;
        Ok(json)
    }

    fn validate_value(&self, json: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(json) {
            let messages: Vec<String> = errors.map(|err| err.to_string()).collect();
            warn!("Job parameters fail validation");
            bail!("Invalid job parameters:\n{}", messages.join("\n"));
        }
        Ok(())
    }
}
