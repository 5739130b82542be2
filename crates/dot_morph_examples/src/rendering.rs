use std::path::Path;

use anyhow::Context;
use dot_morph::prelude::*;
use image::RgbaImage;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Image source decoding PNG files from disk.
///
/// Paths registered with [`PngImageSource::with_procedural`] are served from memory instead,
/// which lets the examples run without any assets.
#[derive(Default)]
pub struct PngImageSource {
    procedural: Vec<(String, DecodedImage)>,
}

impl PngImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_procedural(mut self, path: impl Into<String>, image: DecodedImage) -> Self {
        self.procedural.push((path.into(), image));
        self
    }
}

impl ImageSource for PngImageSource {
    fn load(&mut self, path: &str) -> dot_morph::error::Result<DecodedImage> {
        if let Some((_, image)) = self.procedural.iter().find(|(p, _)| p == path) {
            return Ok(image.clone());
        }
        let img = image::open(path)
            .map_err(|e| Error::image_unavailable(path, e.to_string()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(DecodedImage::new(width, height, img.into_raw()))
    }
}

/// Flatten `canvas` onto `background` and write it as a PNG.
pub fn save_canvas_png(
    canvas: &PixelCanvas,
    background: Rgba,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let img = RgbaImage::from_raw(
        canvas.width(),
        canvas.height(),
        canvas.flatten_onto(background),
    )
    .context("canvas buffer does not match its size")?;
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Read a [`MorphConfig`] from a RON file and validate it.
pub fn load_config_ron(path: impl AsRef<Path>) -> anyhow::Result<MorphConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: MorphConfig =
        ron::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Procedural demo shapes, used when no image paths are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoShape {
    Disc,
    Ring,
    Square,
}

impl DemoShape {
    pub const ALL: [DemoShape; 3] = [DemoShape::Disc, DemoShape::Ring, DemoShape::Square];

    pub fn name(self) -> &'static str {
        match self {
            DemoShape::Disc => "disc",
            DemoShape::Ring => "ring",
            DemoShape::Square => "square",
        }
    }

    /// Render the shape as an opaque white mask on a transparent `size`x`size` image.
    pub fn render(self, size: u32) -> DecodedImage {
        let mut rgba = vec![0u8; 4 * size as usize * size as usize];
        let half = size as f32 * 0.5;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - half;
                let dy = y as f32 + 0.5 - half;
                let r = (dx * dx + dy * dy).sqrt();
                let inside = match self {
                    DemoShape::Disc => r <= half * 0.9,
                    DemoShape::Ring => r <= half * 0.9 && r >= half * 0.55,
                    DemoShape::Square => dx.abs() <= half * 0.7 && dy.abs() <= half * 0.7,
                };
                if inside {
                    let i = 4 * (y as usize * size as usize + x as usize);
                    rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                }
            }
        }
        DecodedImage::new(size, size, rgba)
    }
}

/// Build an image input and source from command-line paths, or from the demo shapes when
/// `paths` is empty.
pub fn image_input_from_args(paths: &[String]) -> (ImageInput, PngImageSource) {
    if !paths.is_empty() {
        let input = ImageInput::new("").with_sources(paths.iter().cloned());
        return (input, PngImageSource::new());
    }
    let mut source = PngImageSource::new();
    let mut input = ImageInput::new("demo/");
    for shape in DemoShape::ALL {
        let name = format!("{}.png", shape.name());
        source = source.with_procedural(format!("demo/{name}"), shape.render(240));
        input = input.with_source(name);
    }
    (input, source)
}
