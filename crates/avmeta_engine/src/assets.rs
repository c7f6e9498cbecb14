use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::session::Session;
use crate::types::{FailureKind, ScrapeError};

/// Payloads under this size are anti-scraping placeholder images.
pub const MIN_BINARY_BYTES: u64 = 1024;

/// Downloads a binary asset (cover, fanart) to `dest` with integrity checks.
///
/// Rejects placeholder-sized payloads, verifies the on-disk size after
/// writing, and optionally re-encodes to JPEG, removing the original only
/// once the conversion succeeded.
pub async fn fetch_binary(
    session: &Session,
    url: &str,
    dest: &Path,
    convert_to_jpeg: bool,
) -> Result<(), ScrapeError> {
    let page = session.get(url).await?;
    let length = page.body.len() as u64;
    if length < MIN_BINARY_BYTES {
        return Err(ScrapeError::new(
            FailureKind::Incomplete,
            format!("{url}: {length} bytes is below the {MIN_BINARY_BYTES} byte minimum"),
        ));
    }

    write_verified(dest, &page.body)?;
    debug!("saved {length} bytes to {}", dest.display());

    if convert_to_jpeg {
        convert_jpeg(dest)?;
    }

    Ok(())
}

/// Writes `data` to `dest` and verifies the on-disk size against it.
pub fn write_verified(dest: &Path, data: &[u8]) -> Result<(), ScrapeError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| write_failed(dest, err))?;
    }
    fs::write(dest, data).map_err(|err| write_failed(dest, err))?;
    verify_on_disk(dest, data.len() as u64)
}

/// Compares the on-disk size to the downloaded length, deleting the partial
/// file on mismatch. Catches truncated writes on full disks and flaky mounts.
pub fn verify_on_disk(dest: &Path, expected: u64) -> Result<(), ScrapeError> {
    let actual = fs::metadata(dest).map(|meta| meta.len()).unwrap_or(0);
    if actual != expected {
        let _ = fs::remove_file(dest);
        return Err(ScrapeError::new(
            FailureKind::WriteFailed,
            format!(
                "{}: wrote {actual} of {expected} bytes, partial file removed",
                dest.display()
            ),
        ));
    }
    Ok(())
}

/// Re-encodes the asset at `path` as `<stem>.jpg` and removes the original.
fn convert_jpeg(path: &Path) -> Result<(), ScrapeError> {
    let converted = path.with_extension("jpg");
    if converted == path {
        return Ok(());
    }

    let decoded = image::open(path).map_err(|err| {
        ScrapeError::new(
            FailureKind::ParseFailure,
            format!("{}: {err}", path.display()),
        )
    })?;
    // JPEG has no alpha channel.
    decoded
        .to_rgb8()
        .save_with_format(&converted, image::ImageFormat::Jpeg)
        .map_err(|err| write_failed(&converted, err))?;

    fs::remove_file(path).map_err(|err| write_failed(path, err))?;
    info!("converted {} to {}", path.display(), converted.display());
    Ok(())
}

fn write_failed(path: &Path, err: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::new(
        FailureKind::WriteFailed,
        format!("{}: {err}", path.display()),
    )
}
