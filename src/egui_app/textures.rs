//! GPU textures for rendered segments, refreshed when a pass redraws them.

use std::collections::HashMap;
use std::sync::Arc;

use eframe::egui::{self, TextureHandle, TextureOptions};

use crate::waveform::RenderedSegment;

struct SegmentTexture {
    generation: u64,
    base: TextureHandle,
    progress: TextureHandle,
}

/// Texture pair per segment index.
pub(crate) struct SegmentTextures {
    name: &'static str,
    entries: HashMap<usize, SegmentTexture>,
}

impl SegmentTextures {
    /// `name` prefixes the texture debug names.
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Upload new or redrawn segments and drop textures for segments that no
    /// longer exist.
    pub(crate) fn sync<'a>(
        &mut self,
        ctx: &egui::Context,
        segments: impl Iterator<Item = &'a RenderedSegment>,
    ) {
        let mut live = Vec::new();
        for segment in segments {
            let index = segment.segment.index;
            live.push(index);
            if self
                .entries
                .get(&index)
                .is_some_and(|entry| entry.generation == segment.generation)
            {
                continue;
            }
            let base = ctx.load_texture(
                format!("{}_{index}", self.name),
                egui::ImageData::Color(Arc::clone(&segment.base)),
                TextureOptions::LINEAR,
            );
            let progress = ctx.load_texture(
                format!("{}_{index}_progress", self.name),
                egui::ImageData::Color(Arc::clone(&segment.progress)),
                TextureOptions::LINEAR,
            );
            self.entries.insert(
                index,
                SegmentTexture {
                    generation: segment.generation,
                    base,
                    progress,
                },
            );
        }
        self.entries.retain(|index, _| live.contains(index));
    }

    /// Base and progress texture ids for segment `index`.
    pub(crate) fn ids(&self, index: usize) -> Option<(egui::TextureId, egui::TextureId)> {
        self.entries
            .get(&index)
            .map(|entry| (entry.base.id(), entry.progress.id()))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
