use anicheck_geometry::Size;
use anyhow::Result;
use rgb::ComponentBytes;

/// Decodes a PNG into tightly packed RGBA8 pixels.
pub fn decode_png(png: &[u8]) -> Result<(Vec<u8>, Size<u32>)> {
    let image = lodepng::decode32(png)?;
    let size = Size::new(image.width as u32, image.height as u32);
    let image = image.buffer.as_bytes().to_owned();

    Ok((image, size))
}

#[cfg(test)]
mod tests {
    use rgb::RGBA8;

    use super::*;

    #[test]
    fn test_decode_png() {
        let pixels = [RGBA8::new(255, 0, 0, 255), RGBA8::new(0, 255, 0, 255)];
        let png = lodepng::encode32(&pixels, 2, 1).unwrap();

        let (decoded, size) = decode_png(&png).unwrap();
        assert_eq!(size, Size::new(2, 1));
        assert_eq!(decoded, pixels.as_bytes());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_png(b"definitely not a png").is_err());
    }
}
