use dot_morph::prelude::*;
use dot_morph_examples::{image_input_from_args, init_tracing, save_canvas_png};

/// Usage: dottify-preview [image.png ...]
///
/// Writes one PNG per image with its sampled dots drawn at full radius.
fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (input, mut source) = image_input_from_args(&args);

    let config = MorphConfig::default()
        .with_fit_mode(FitMode::Contain { max: 480 })
        .with_grid_alignment(GridAlignment::Centered);

    let mut canvas = PixelCanvas::new(640, 640);
    let mut sink = LogSink::new();
    let states =
        sample_image_states_with_events(&mut canvas, &mut source, &input, &config, &mut sink)?;

    for (i, state) in states.iter().enumerate() {
        canvas.clear_all();
        let origin = state.area.origin();
        for p in state.dots.points() {
            canvas.fill_circle(
                origin + *p,
                config.max_particle_radius,
                config.dot_fill_color,
            );
        }
        save_canvas_png(
            &canvas,
            config.canvas_background_color,
            format!("dottify-preview-{i}.png"),
        )?;
    }

    Ok(())
}
