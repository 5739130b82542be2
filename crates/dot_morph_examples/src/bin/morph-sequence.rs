use dot_morph::prelude::*;
use dot_morph_examples::{image_input_from_args, init_tracing, load_config_ron, save_canvas_png};
use rand::rngs::StdRng;
use rand::SeedableRng;

const CANVAS: (u32, u32) = (960, 540);
const FRAME_MS: f64 = 1000.0 / 60.0;
const DURATION_MS: f64 = 16_000.0;
const SAVE_EVERY: usize = 45;

/// Usage: morph-sequence [config.ron] [image.png ...]
fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config = if args.first().is_some_and(|a| a.ends_with(".ron")) {
        let path = args.remove(0);
        load_config_ron(&path)?
    } else {
        MorphConfig::default()
    };
    let (input, mut source) = image_input_from_args(&args);

    let mut canvas = PixelCanvas::new(CANVAS.0, CANVAS.1);
    let mut sink = LogSink::new();
    let states =
        sample_image_states_with_events(&mut canvas, &mut source, &input, &config, &mut sink)?;
    let background = config.canvas_background_color;

    let mut rng = StdRng::seed_from_u64(7);
    let system = ParticleSystem::new(config, CANVAS, states, &mut rng)?;
    let mut driver = Driver::new(
        system,
        DriverOptions {
            random_walk_between_images: true,
        },
    );

    let center = glam::Vec2::new(CANVAS.0 as f32, CANVAS.1 as f32) * 0.5;
    let mut frame = 0usize;
    let mut t = 0.0;
    while t < DURATION_MS {
        // Pointer circles the canvas centre.
        let angle = (t / 2000.0) as f32;
        let pointer = center + glam::Vec2::new(angle.cos(), angle.sin()) * 180.0;
        driver.set_pointer(pointer);

        driver.frame(&mut canvas, t, &mut sink);
        if frame % SAVE_EVERY == 0 {
            save_canvas_png(
                &canvas,
                background,
                format!("morph-sequence-{:04}.png", frame / SAVE_EVERY),
            )?;
        }

        frame += 1;
        t += FRAME_MS;
    }

    driver.stop(&mut sink);
    Ok(())
}
