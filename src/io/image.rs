use image::{ImageBuffer, Rgba};
use log::info;
use std::path::Path;

/// Unpacks one 0xRRGGBBAA pixel.
fn unpack(packed: u32) -> Rgba<u8> {
    Rgba([
        (packed >> 24) as u8,
        (packed >> 16) as u8,
        (packed >> 8) as u8,
        packed as u8,
    ])
}

/// Saves a packed RGBA color buffer to an image file; the format follows the extension.
pub fn save_color_buffer(buffer: &[u32], width: usize, height: usize, path: &str) -> Result<(), String> {
    if buffer.len() != width * height {
        return Err(format!(
            "Color buffer holds {} pixels, expected {}x{}",
            buffer.len(),
            width,
            height
        ));
    }

    let mut img_buf = ImageBuffer::new(width as u32, height as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let idx = (y as usize) * width + (x as usize);
        *pixel = unpack(buffer[idx]);
    }

    img_buf
        .save(Path::new(path))
        .map_err(|e| format!("Failed to save image to '{}': {}", path, e))?;
    info!("Saved {}x{} image to '{}'", width, height, path);
    Ok(())
}

/// Output path for `frame`: `{frame}` in the pattern is replaced by the
/// zero-padded frame number.
pub fn frame_path(pattern: &str, frame: usize) -> String {
    pattern.replace("{frame}", &format!("{:04}", frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpack_reads_rrggbbaa() {
        assert_eq!(unpack(0x11223344), Rgba([0x11, 0x22, 0x33, 0x44]));
    }

    #[test]
    fn frame_pattern_is_numbered() {
        assert_eq!(frame_path("out_{frame}.png", 7), "out_0007.png");
        assert_eq!(frame_path("out.png", 7), "out.png");
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        assert!(save_color_buffer(&[0; 3], 2, 2, "never_written.png").is_err());
    }
}
