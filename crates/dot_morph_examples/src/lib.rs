#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    image_input_from_args, init_tracing, load_config_ron, save_canvas_png, DemoShape,
    PngImageSource,
};
