// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Reference image loading.
//!
//! Dropped or picked files are sniffed and encoded as inline `data:` URIs on
//! background threads, one thread per file. Each finished file is handed back
//! to the UI independently, in whatever order they complete. Thumbnails are
//! decoded from those URIs for display.

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// File extensions offered by the file picker.
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

/// Where an incoming image comes from.
pub enum ImageSource {
    Path(PathBuf),
    /// In-memory bytes (drag-and-drop on platforms without file paths)
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl ImageSource {
    fn label(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Cheap pre-check so large non-image files are never read.
    fn may_be_image(&self) -> bool {
        match self {
            ImageSource::Path(path) => image::ImageFormat::from_path(path).is_ok(),
            ImageSource::Bytes { .. } => true,
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            ImageSource::Path(path) => {
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
            }
            ImageSource::Bytes { bytes, .. } => Ok(bytes.to_vec()),
        }
    }
}

/// MIME type of encoded image bytes, or `None` for anything that is not a
/// recognised image.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|format| format.to_mime_type())
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Encode image bytes as a data URI; `None` when the bytes are not an image.
pub fn image_to_data_uri(bytes: &[u8]) -> Option<String> {
    sniff_mime(bytes).map(|mime| encode_data_uri(mime, bytes))
}

/// Extract the payload of a base64 data URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URI has no payload"))?;
    if !meta.ends_with(";base64") {
        bail!("data URI is not base64 encoded");
    }
    STANDARD
        .decode(payload.trim())
        .context("invalid base64 payload")
}

/// Decode a data URI into a texture-ready image no larger than `max_size`.
pub fn decode_thumbnail(uri: &str, max_size: u32) -> Result<egui::ColorImage> {
    let bytes = decode_data_uri(uri)?;
    let img = image::load_from_memory(&bytes).context("failed to decode image")?;
    let rgba = img.thumbnail(max_size, max_size).to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Background image encoder.
pub struct ImageLoader {
    sender: Sender<Option<String>>,
    receiver: Receiver<Option<String>>,
    pending: usize,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Start encoding one file. Non-image files are dropped silently.
    pub fn load(&mut self, source: ImageSource, ctx: &egui::Context) {
        if !source.may_be_image() {
            log::debug!("Ignoring non-image file {}", source.label());
            return;
        }

        let sender = self.sender.clone();
        let ctx = ctx.clone();
        self.pending += 1;

        std::thread::spawn(move || {
            let label = source.label();
            let data_uri = match source.read() {
                Ok(bytes) => {
                    let uri = image_to_data_uri(&bytes);
                    match &uri {
                        Some(_) => log::info!("Loaded image {} ({} bytes)", label, bytes.len()),
                        None => log::debug!("Ignoring non-image file {}", label),
                    }
                    uri
                }
                Err(e) => {
                    log::error!("Failed to load image: {:#}", e);
                    None
                }
            };
            let _ = sender.send(data_uri);
            ctx.request_repaint();
        });
    }

    /// Data URIs of every file finished since the last poll.
    pub fn poll(&mut self) -> Vec<String> {
        let mut loaded = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            loaded.extend(result);
        }
        loaded
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_sniff_mime() {
        assert_eq!(sniff_mime(&png_bytes(2, 2)), Some("image/png"));
        assert_eq!(sniff_mime(b"just some text"), None);
    }

    #[test]
    fn test_data_uri_roundtrip() {
        let bytes = png_bytes(3, 1);
        let uri = image_to_data_uri(&bytes).unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_non_image_bytes_are_rejected() {
        assert!(image_to_data_uri(b"%PDF-1.7").is_none());
    }

    #[test]
    fn test_decode_data_uri_errors() {
        assert!(decode_data_uri("image/png;base64,AAAA").is_err());
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn test_decode_thumbnail_limits_size() {
        let uri = image_to_data_uri(&png_bytes(64, 32)).unwrap();
        let thumb = decode_thumbnail(&uri, 16).unwrap();
        assert_eq!(thumb.size, [16, 8]);
    }

    #[test]
    fn test_may_be_image_checks_extension() {
        assert!(ImageSource::Path(PathBuf::from("shot.PNG")).may_be_image());
        assert!(!ImageSource::Path(PathBuf::from("clip.mov")).may_be_image());
    }
}
