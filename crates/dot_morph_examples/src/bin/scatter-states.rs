use dot_morph::prelude::*;
use dot_morph_examples::{init_tracing, save_canvas_png};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Draws the chained random scatter states, one colour per state, into a single PNG.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let size = (800u32, 800u32);
    let config = MorphConfig::default().with_random_states(4, 3);
    let generator = ScatterGenerator::from_config(&config);

    let mut rng = StdRng::seed_from_u64(42);
    let canvas_extent = Vec2::new(size.0 as f32, size.1 as f32);
    let states = generator.generate(300, canvas_extent, &mut rng);

    let palette: [Rgba; 4] = [
        [255, 99, 132, 255],
        [54, 162, 235, 255],
        [255, 206, 86, 255],
        [75, 192, 192, 255],
    ];

    // Scatter states reach well past the canvas; shrink them around the centre.
    let center = canvas_extent * 0.5;
    let mut canvas = PixelCanvas::new(size.0, size.1);
    for (i, state) in states.iter().enumerate() {
        let color = palette[i % palette.len()];
        for p in state.points() {
            canvas.fill_circle((*p - center) * 0.1 + center, 2.5, color);
        }
    }

    save_canvas_png(&canvas, [16, 16, 24, 255], "scatter-states.png")?;
    Ok(())
}
