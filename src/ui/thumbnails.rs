// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Texture cache for reference image thumbnails.
//!
//! Images are decoded on background threads. The UI thread only uploads
//! finished pixels as textures when it polls.

use crate::io::media::decode_thumbnail;
use crate::models::project::{Id, Image, Tab};
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Largest edge of a decoded thumbnail texture, in pixels.
const THUMBNAIL_DECODE_SIZE: u32 = 256;

/// Result of decoding one image on a worker thread.
type DecodedThumbnail = (Id, Result<egui::ColorImage, String>);

pub struct ThumbnailCache {
    textures: HashMap<Id, egui::TextureHandle>,
    /// Images being decoded
    pending: HashSet<Id>,
    /// Images that failed to decode; not retried
    failed: HashSet<Id>,
    sender: Sender<DecodedThumbnail>,
    receiver: Receiver<DecodedThumbnail>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self {
            textures: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            sender,
            receiver,
        }
    }
}

impl ThumbnailCache {
    /// Texture for an image, or `None` while it is still decoding.
    ///
    /// The first request for an image starts its decode in the background.
    pub fn get(&mut self, ctx: &egui::Context, image: &Image) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.textures.get(&image.id) {
            return Some(texture.clone());
        }
        if self.failed.contains(&image.id) || self.pending.contains(&image.id) {
            return None;
        }

        self.pending.insert(image.id.clone());
        let sender = self.sender.clone();
        let ctx = ctx.clone();
        let id = image.id.clone();
        let data_uri = Arc::clone(&image.data_uri);

        std::thread::spawn(move || {
            let result =
                decode_thumbnail(&data_uri, THUMBNAIL_DECODE_SIZE).map_err(|e| format!("{:#}", e));
            let _ = sender.send((id, result));
            ctx.request_repaint();
        });
        None
    }

    /// Upload thumbnails decoded since the last poll.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok((id, result)) = self.receiver.try_recv() {
            // Image removed while decoding
            if !self.pending.remove(&id) {
                continue;
            }
            match result {
                Ok(color_image) => {
                    let texture = ctx.load_texture(
                        format!("thumb-{}", id),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    );
                    self.textures.insert(id, texture);
                }
                Err(e) => {
                    log::warn!("Failed to decode image {}: {}", id, e);
                    self.failed.insert(id);
                }
            }
        }
    }

    pub fn is_pending(&self, id: &Id) -> bool {
        self.pending.contains(id)
    }

    pub fn is_decoding(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop textures of images no longer present in any tab.
    pub fn retain_live(&mut self, tabs: &[Tab]) {
        let live: HashSet<&Id> = tabs
            .iter()
            .flat_map(|tab| tab.images.iter().map(|image| &image.id))
            .collect();
        self.textures.retain(|id, _| live.contains(id));
        self.pending.retain(|id| live.contains(id));
        self.failed.retain(|id| live.contains(id));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::media::image_to_data_uri;
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn png_uri(width: u32, height: u32) -> String {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        image_to_data_uri(&out.into_inner()).unwrap()
    }

    /// Poll until every pending decode has finished.
    fn settle(cache: &mut ThumbnailCache, ctx: &egui::Context) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while cache.is_decoding() && Instant::now() < deadline {
            cache.poll(ctx);
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!cache.is_decoding(), "thumbnail decode did not finish");
    }

    #[test]
    fn test_get_does_not_decode_on_calling_thread() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::default();
        let image = Image::new(png_uri(2000, 1500).into(), 1);

        let started = Instant::now();
        assert!(cache.get(&ctx, &image).is_none());
        assert!(started.elapsed() < Duration::from_millis(50));
        assert!(cache.is_pending(&image.id));

        // Still pending until polled
        assert!(cache.get(&ctx, &image).is_none());

        settle(&mut cache, &ctx);
        let texture = cache.get(&ctx, &image).unwrap();
        assert_eq!(texture.size(), [256, 192]);
    }

    #[test]
    fn test_failed_decode_is_not_retried() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::default();
        let image = Image::new("data:image/png;base64,AAAA".into(), 1);

        assert!(cache.get(&ctx, &image).is_none());
        settle(&mut cache, &ctx);
        assert!(cache.get(&ctx, &image).is_none());
        assert!(!cache.is_decoding());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_textures_pruned_with_images() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::default();
        let mut tab = Tab::new("SH010");
        tab.images.push(Image::new(png_uri(4, 4).into(), 1));
        tab.images.push(Image::new(png_uri(4, 4).into(), 2));

        cache.get(&ctx, &tab.images[0]);
        cache.get(&ctx, &tab.images[1]);
        settle(&mut cache, &ctx);
        assert_eq!(cache.len(), 2);

        tab.images.remove(0);
        cache.retain_live(std::slice::from_ref(&tab));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_result_for_removed_image_is_dropped() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::default();
        let image = Image::new(png_uri(4, 4).into(), 1);

        cache.get(&ctx, &image);
        cache.retain_live(&[]);
        assert!(!cache.is_decoding());

        std::thread::sleep(Duration::from_millis(200));
        cache.poll(&ctx);
        assert_eq!(cache.len(), 0);
    }
}
