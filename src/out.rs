//! `out`: publish local files to the repository

use std::time::Instant;

use tracing::{error, info};

use crate::error::ResourceError;
use crate::repository::{Repository, UploadSpec};
use crate::resource::{Metadata, OutRequest, OutResponse, Version};

/// Upload the files selected by the request and report upload statistics.
///
/// Any failed file makes the whole step fail, even when others succeeded.
pub async fn out<R>(
    repository: &R,
    source_dir: &str,
    request: &OutRequest,
) -> Result<OutResponse, ResourceError>
where
    R: Repository + ?Sized,
{
    request.source.validate()?;
    request.params.validate()?;

    let spec = UploadSpec::new(source_dir, &request.source, &request.params)?;

    info!("Uploading file(s) to target '{}'...", spec.target);
    let started = Instant::now();
    let summary = repository.upload(&spec).await?;
    let elapsed = started.elapsed();

    if summary.failed > 0 {
        error!(
            "{} file(s) uploaded, {} file(s) failed",
            summary.uploaded, summary.failed
        );
        return Err(ResourceError::UploadFailed {
            uploaded: summary.uploaded,
            failed: summary.failed,
        });
    }
    info!("Finished uploading file(s) to target '{}'.", spec.target);

    let version = summary
        .uploaded_paths
        .first()
        .cloned()
        .unwrap_or_else(|| spec.target.clone());

    Ok(OutResponse {
        version: Version::new(version),
        metadata: vec![
            Metadata::new("total_uploaded", summary.uploaded.to_string()),
            Metadata::new("upload_time", format!("{:?}", elapsed)),
        ],
    })
}
