//! Canvas Store
//!
//! The fixed-size grid of palette indices. It has no locking of its own:
//! [`crate::service::CanvasService`] holds it behind the shared lock.

/// Indexed-color pixel grid, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster filled with `background`
    #[must_use]
    pub fn new(width: u32, height: u32, background: u8) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![background; len],
        }
    }

    /// Width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major palette indices
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        let in_bounds =
            (0..i64::from(self.width)).contains(&x) && (0..i64::from(self.height)).contains(&y);
        in_bounds.then(|| y as usize * self.width as usize + x as usize)
    }

    /// Palette index at (x, y), `None` when out of range
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Set (x, y) to `index`.
    ///
    /// Out-of-range coordinates are ignored and reported as `false`.
    pub fn set_pixel(&mut self, x: i64, y: i64, index: u8) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.pixels[i] = index;
                true
            }
            None => false,
        }
    }

    /// Count of pixels not equal to `background`
    #[must_use]
    pub fn painted(&self, background: u8) -> usize {
        self.pixels.iter().filter(|&&p| p != background).count()
    }
}
