use crate::data::error::ResumeError;
use crate::data::thumbnail::Thumbnail;
use anyhow::{Context, Result};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

/// Encodes a raw RGBA buffer (as produced by the PDF engine) into a PNG thumbnail.
pub fn encode_png_thumbnail(width: u32, height: u32, rgba: Vec<u8>) -> Result<Thumbnail, ResumeError> {
    let img = RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        ResumeError::RenderFailure(format!("bitmap doesn't match its size {width}x{height}"))
    })?;

    let mut png = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| ResumeError::RenderFailure(format!("couldn't encode thumbnail: {err}")))?;

    Ok(Thumbnail::new(width, height, Bytes::from(png)))
}

/// Opens a URL or a local file with the system's default handler (a new browser
/// tab for web addresses).
pub fn open_in_new_tab(target: &str) -> Result<()> {
    info!("Opening {target}");
    open::that_detached(target).with_context(|| format!("Couldn't open '{target}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_encode_png_thumbnail() {
        let thumbnail = encode_png_thumbnail(2, 3, vec![255; 2 * 3 * 4]).unwrap();

        assert_eq!((thumbnail.width, thumbnail.height), (2, 3));
        assert!(thumbnail.png().starts_with(b"\x89PNG"));

        let decoded = image::load_from_memory_with_format(thumbnail.png(), ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 3));
    }

    #[test]
    fn should_reject_short_bitmap() {
        assert!(matches!(
            encode_png_thumbnail(10, 10, vec![0; 12]),
            Err(ResumeError::RenderFailure(_))
        ));
    }
}
