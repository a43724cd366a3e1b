use crate::core::error::IndexError;

/// Read access to a decoded pixel grid.
///
/// `pixel_at` is only called with `x < width()` and `y < height()`.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Channel count reported as bit depth (channels x 8).
    fn channels(&self) -> u8;
    fn pixel_at(&self, x: u32, y: u32) -> [u8; 3];
}

/// Row-major packed RGB pixel data
#[derive(Clone, Debug)]
pub struct DecodedImage {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl DecodedImage {
    pub fn new(buffer: Vec<u8>, width: u32, height: u32) -> Result<Self, IndexError> {
        if width == 0 || height == 0 {
            return Err(IndexError::InvalidImage(format!(
                "dimensions must be positive, got {width}x{height}"
            )));
        }

        let expected = width as usize * height as usize * 3;
        if buffer.len() < expected {
            return Err(IndexError::InvalidImage(format!(
                "pixel buffer holds {} bytes, {width}x{height} RGB needs {expected}",
                buffer.len()
            )));
        }

        Ok(Self { buffer, width, height, channels: 3 })
    }

    /// Build from a per-pixel function, mostly useful for synthetic images.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, IndexError>
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut buffer = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                buffer.extend_from_slice(&f(x, y));
            }
        }
        Self::new(buffer, width, height)
    }
}

impl PixelSource for DecodedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    #[inline(always)]
    fn pixel_at(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * 3;
        [self.buffer[offset], self.buffer[offset + 1], self.buffer[offset + 2]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_at_reads_row_major() {
        let img = DecodedImage::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12], 2, 2).unwrap();
        assert_eq!(img.pixel_at(0, 0), [1, 2, 3]);
        assert_eq!(img.pixel_at(1, 0), [4, 5, 6]);
        assert_eq!(img.pixel_at(0, 1), [7, 8, 9]);
        assert_eq!(img.pixel_at(1, 1), [10, 11, 12]);
        assert_eq!(img.channels(), 3);
    }

    #[test]
    fn test_rejects_zero_dimension() {
        assert!(matches!(
            DecodedImage::new(Vec::new(), 0, 4),
            Err(IndexError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_rejects_short_buffer() {
        assert!(matches!(
            DecodedImage::new(vec![0; 11], 2, 2),
            Err(IndexError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_from_fn_matches_callback() {
        let img = DecodedImage::from_fn(3, 2, |x, y| [x as u8, y as u8, 7]).unwrap();
        assert_eq!(img.pixel_at(2, 1), [2, 1, 7]);
    }
}
