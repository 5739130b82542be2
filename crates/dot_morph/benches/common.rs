#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub const SEED: u64 = 0xD07_5EED;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn pixel_throughput(width: u32, height: u32) -> Throughput {
    elements_throughput(width as usize * height as usize)
}

/// RGBA buffer with an opaque disc centred on a transparent background.
pub fn disc_rgba(size: u32) -> Vec<u8> {
    let mut rgba = vec![0u8; 4 * size as usize * size as usize];
    let c = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            if dx * dx + dy * dy <= c * c {
                let i = 4 * (y as usize * size as usize + x as usize);
                rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    rgba
}
