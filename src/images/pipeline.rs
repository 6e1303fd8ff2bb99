//! Per-image processing pipeline: format sniff, size check, optional square
//! processing, staging to a local temp file, upload to the image store.
//!
//! Rejections (format, size) happen before any network traffic and carry a
//! per-file message naming the offending file. The staged file is a scoped
//! resource: it is removed on every exit path when the `NamedTempFile`
//! drops.

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

use crate::adapters::{ImageStore, StoredImage};
use crate::config::{AVATAR_MAX_BYTES, AVATAR_SIZE};

pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// One file taken off a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Format or size rejection; `message` is user-facing and names the file.
    #[error("{message}")]
    Rejected { filename: String, message: String },

    /// Staging or upload failure. Generic to the caller; detail is logged.
    #[error("image processing failed")]
    Failed,
}

/// Per-call-site policy: byte cap, and for avatars the square target side.
#[derive(Debug, Clone, Copy)]
pub struct ImagePolicy {
    pub max_bytes: usize,
    pub square: Option<u32>,
}

impl ImagePolicy {
    pub fn avatar() -> Self {
        Self {
            max_bytes: AVATAR_MAX_BYTES,
            square: Some(AVATAR_SIZE),
        }
    }

    pub fn event_image(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            square: None,
        }
    }
}

/// Decodes the header and confirms the format is one of the allowed set.
pub fn check_format(file: &UploadedFile) -> Result<ImageFormat, PipelineError> {
    match image::guess_format(&file.bytes) {
        Ok(format) if ALLOWED_FORMATS.contains(&format) => Ok(format),
        _ => Err(PipelineError::Rejected {
            filename: file.filename.clone(),
            message: format!(
                "'{}' is not a supported image (JPEG, PNG, GIF or WEBP).",
                file.filename
            ),
        }),
    }
}

pub fn check_size(file: &UploadedFile, max_bytes: usize) -> Result<(), PipelineError> {
    if file.bytes.len() > max_bytes {
        return Err(PipelineError::Rejected {
            filename: file.filename.clone(),
            message: format!(
                "'{}' exceeds the {} MB size limit.",
                file.filename,
                max_bytes / (1024 * 1024)
            ),
        });
    }
    Ok(())
}

/// Format check first, then size, for one file.
pub fn validate(file: &UploadedFile, policy: &ImagePolicy) -> Result<ImageFormat, PipelineError> {
    let format = check_format(file)?;
    check_size(file, policy.max_bytes)?;
    Ok(format)
}

/// Center-crops to 1:1 on the shorter side, resizes to `side`, and re-encodes
/// in the detected format.
pub fn square_thumbnail(
    file: &UploadedFile,
    format: ImageFormat,
    side: u32,
) -> Result<Vec<u8>, PipelineError> {
    let img = image::load_from_memory_with_format(&file.bytes, format).map_err(|_| {
        PipelineError::Rejected {
            filename: file.filename.clone(),
            message: format!("'{}' could not be decoded.", file.filename),
        }
    })?;

    let (width, height) = (img.width(), img.height());
    let crop_side = width.min(height);
    let left = (width - crop_side) / 2;
    let top = (height - crop_side) / 2;

    let resized = img
        .crop_imm(left, top, crop_side, crop_side)
        .resize_exact(side, side, FilterType::Lanczos3);

    // The JPEG encoder only takes RGB; everything else re-encodes from RGBA.
    let out = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(resized.to_rgb8()),
        _ => DynamicImage::ImageRgba8(resized.to_rgba8()),
    };

    let mut buf = Cursor::new(Vec::new());
    out.write_to(&mut buf, format).map_err(|e| {
        tracing::error!(error = %e, filename = %file.filename, "image re-encode failed");
        PipelineError::Failed
    })?;
    Ok(buf.into_inner())
}

fn stage(payload: &[u8]) -> Result<NamedTempFile, PipelineError> {
    let mut staged = NamedTempFile::new().map_err(|e| {
        tracing::error!(error = %e, "failed to create staged image file");
        PipelineError::Failed
    })?;
    staged.write_all(payload).and_then(|_| staged.flush()).map_err(|e| {
        tracing::error!(error = %e, "failed to write staged image file");
        PipelineError::Failed
    })?;
    Ok(staged)
}

/// Runs one file through the whole pipeline and returns the stored image.
/// No network call is made before the checks pass.
pub async fn process_and_store(
    store: &ImageStore,
    policy: &ImagePolicy,
    file: &UploadedFile,
) -> Result<StoredImage, PipelineError> {
    let format = validate(file, policy)?;

    let payload = match policy.square {
        Some(side) => square_thumbnail(file, format, side)?,
        None => file.bytes.to_vec(),
    };

    // Staged so the store reads from a file handle; removed when `staged`
    // drops, whatever happens on the upload path.
    let staged = stage(&payload)?;
    let stored = store
        .upload_file(staged.path(), &file.filename)
        .await
        .map_err(|_| PipelineError::Failed)?;

    Ok(stored)
}
