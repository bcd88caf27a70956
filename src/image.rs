//! The image sink (§6, out of core scope): a fixed `W×H` grid of 8-bit RGB
//! triples, `(i=0, j=0)` at the top-left. Built on `image::RgbImage`, which
//! is the idiomatic Rust way to own and save a raster rather than hand-
//! rolling an encoder.

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

pub struct Image {
    buf: RgbImage,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.buf.width()
    }

    pub fn height(&self) -> u32 {
        self.buf.height()
    }

    /// `i` is the row from the top, `j` the column from the left.
    pub fn set_pixel(&mut self, i: u32, j: u32, rgb: [u8; 3]) {
        self.buf.put_pixel(j, i, Rgb(rgb));
    }

    pub fn get_pixel(&self, i: u32, j: u32) -> [u8; 3] {
        self.buf.get_pixel(j, i).0
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.buf
            .save(path)
            .with_context(|| format!("writing image to {}", path.display()))
    }
}
