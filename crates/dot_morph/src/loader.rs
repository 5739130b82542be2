//! Turning source images into [`ImageState`]s.
//!
//! Each image is loaded through an [`ImageSource`], drawn into a centred draw area on the
//! surface, read back, sampled with a [`DotSampler`] and cleared again. Images that fail to
//! load are skipped with a warning instead of aborting startup.
use tracing::{info, warn};

use crate::config::MorphConfig;
use crate::error::{Error, Result};
use crate::events::{EventSink, MorphEvent, MorphEventKind};
use crate::sampler::{fit_draw_area, DotSampler};
use crate::surface::{DecodedImage, RenderSurface};
use crate::system::ImageState;

/// Source of decoded images, keyed by path.
///
/// Implementations are expected to give up on images that never arrive and report
/// [`Error::ImageUnavailable`] rather than block indefinitely.
pub trait ImageSource {
    fn load(&mut self, path: &str) -> Result<DecodedImage>;
}

/// Image list: each entry is loaded from `root` joined with the source name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInput {
    pub root: String,
    pub sources: Vec<String>,
}

impl ImageInput {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Full paths in source order.
    pub fn paths(&self) -> impl Iterator<Item = String> + '_ {
        self.sources.iter().map(|s| format!("{}{}", self.root, s))
    }
}

/// Sample every image of `input` into an image state, in input order.
pub fn sample_image_states(
    surface: &mut dyn RenderSurface,
    source: &mut dyn ImageSource,
    input: &ImageInput,
    config: &MorphConfig,
) -> Result<Vec<ImageState>> {
    sample_image_states_with_events(surface, source, input, config, &mut ())
}

/// Like [`sample_image_states`], reporting progress to `sink`.
///
/// Fails only when the surface is unusable or the configuration is invalid.
pub fn sample_image_states_with_events(
    surface: &mut dyn RenderSurface,
    source: &mut dyn ImageSource,
    input: &ImageInput,
    config: &MorphConfig,
    sink: &mut dyn EventSink,
) -> Result<Vec<ImageState>> {
    config.validate()?;
    let canvas = surface.size();
    if canvas.0 == 0 || canvas.1 == 0 {
        return Err(Error::SurfaceUnavailable(format!(
            "surface size {}x{} is empty",
            canvas.0, canvas.1
        )));
    }

    let sampler = DotSampler::new(config.dot_gap).with_alignment(config.grid_alignment);
    let mut states = Vec::with_capacity(input.sources.len());

    for path in input.paths() {
        let image = match source.load(&path) {
            Ok(image) => image,
            Err(e) => {
                warn!("Skipping image '{}': {}.", path, e);
                if sink.wants(MorphEventKind::ImageSkipped) {
                    sink.send(MorphEvent::ImageSkipped {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                continue;
            }
        };

        let area = fit_draw_area((image.width, image.height), canvas, config.fit_mode);
        surface.draw_image(&image, area);
        let pixels = surface.read_pixels(area);
        surface.clear(area);
        let dots = sampler.sample_in(&pixels, area)?;

        info!(
            "Image '{}': {} dots in {}x{} at ({}, {}).",
            path,
            dots.len(),
            area.width,
            area.height,
            area.x,
            area.y
        );
        if sink.wants(MorphEventKind::ImageSampled) {
            sink.send(MorphEvent::ImageSampled {
                index: states.len(),
                path: path.clone(),
                dots: dots.len(),
                area,
            });
        }

        states.push(ImageState::new(path, dots, area));
    }

    if states.is_empty() && !input.sources.is_empty() {
        warn!("None of the {} images could be loaded.", input.sources.len());
    }

    Ok(states)
}
