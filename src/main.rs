use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use uuid::Uuid;

use crate::params::JobParameters;
use crate::submit::report::render_summary;
use crate::submit::transport::HttpTransport;
use crate::submit::Submission;

mod params;
mod reference;
mod request;
mod submit;

/// Submit a MAGMA gene analysis job to the GWAS target service
///
/// Local input files are uploaded first. File parameters that don't exist locally are passed by
/// name, for files the service already hosts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    params: JobParameters,
    /// Enable debug logging
    #[arg(long)]
    debug: bool,
    /// Validate and print the job without uploading or submitting anything
    #[arg(long)]
    dry_run: bool,
    /// Seconds an HTTP request may wait for data before it is abandoned
    #[arg(long, default_value_t = 300, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if args.dry_run {
        dry_run(&args.params)?;
        return Ok(());
    }

    let transport = HttpTransport::new(Duration::from_secs(args.timeout))?;
    let submission = submit::submit(&transport, &args.params).await?;
    info!("Job {} submitted", submission.id);
    print!("{}", render_summary(&submission.id, &submission.endpoints)?);

    Ok(())
}

/// Everything a submission does short of opening a connection
fn dry_run(params: &JobParameters) -> Result<Submission> {
    info!("--dry-run set, nothing will be uploaded or submitted");
    let submission = submit::prepare(params, Uuid::new_v4())?;
    for path in &submission.uploads {
        info!("Would upload {} to {}", path.display(), submission.endpoints.upload);
    }
    info!("Would submit job to {}", submission.endpoints.submit);
    println!("{}", serde_json::to_string_pretty(&submission.job)?);
    Ok(submission)
}
