//! Texture loading: raster images through the `image` crate, DDS containers
//! through the built-in block decoder.

pub mod block;
pub mod dds;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::{ColorType, DynamicImage};

use crate::error::{AssetError, AssetResult};
use crate::io::BinaryReader;

pub use block::BlockCodec;
pub use dds::{DDS_MAGIC, decode_compressed};

/// Extensions handed to the raster decoder, compared case-insensitively.
pub const RASTER_EXTENSIONS: [&str; 7] = ["bmp", "gif", "jpg", "jpeg", "png", "tiff", "tif"];

/// Pixel format a texture was decoded from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextureSource {
    Compressed(BlockCodec),
    Raster(ColorType),
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    source: TextureSource,
}

impl Texture {
    pub(crate) fn new(width: u32, height: u32, pixels: Vec<u8>, source: TextureSource) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            pixels,
            source,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn source(&self) -> TextureSource {
        self.source
    }

    /// RGBA of the texel at column `x`, row `y` (row 0 is the top), or
    /// `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(self.pixels.get(offset..offset + 4)?);
        Some(rgba)
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

pub fn is_raster_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RASTER_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Loads a texture, picking the decoder from the extension first and the
/// file signature second.
pub fn load_texture(path: impl AsRef<Path>) -> AssetResult<Texture> {
    let path = path.as_ref();

    let texture = if is_raster_path(path) {
        let image = image::open(path)?;
        from_dynamic_image(image)?
    } else {
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let mut reader = BinaryReader::new(BufReader::new(file));
        let magic = match reader.read_fourcc() {
            Ok(magic) => magic,
            Err(AssetError::UnexpectedEndOfData { .. }) => {
                return Err(AssetError::UnknownImageFormat(path.to_path_buf()));
            }
            Err(error) => return Err(error),
        };
        if &magic != DDS_MAGIC {
            return Err(AssetError::UnknownImageFormat(path.to_path_buf()));
        }
        dds::decode_dds(&mut reader, Some(file_len.saturating_sub(DDS_MAGIC.len() as u64)))?
    };

    log::info!(
        "Loaded texture {} ({}x{}, {:?})",
        path.display(),
        texture.width,
        texture.height,
        texture.source
    );
    Ok(texture)
}

/// Normalizes a decoded raster image to RGBA8. Palette images arrive already
/// expanded by the decoder; floating point layouts are rejected.
pub fn from_dynamic_image(image: DynamicImage) -> AssetResult<Texture> {
    let color = image.color();
    match color {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => {}
        other => return Err(AssetError::UnsupportedPixelFormat(format!("{:?}", other))),
    }

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(Texture::new(width, height, rgba.into_raw(), TextureSource::Raster(color)))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use image::{ColorType, DynamicImage, GrayImage, Luma, Rgb32FImage};

    use super::{TextureSource, from_dynamic_image, is_raster_path, load_texture};
    use crate::error::AssetError;
    use crate::loaders::texture::BlockCodec;
    use crate::loaders::texture::dds::tests::dds_bytes;

    #[test]
    fn raster_extensions_are_case_insensitive() {
        assert!(is_raster_path(Path::new("brick.PNG")));
        assert!(is_raster_path(Path::new("dir/brick.jpeg")));
        assert!(!is_raster_path(Path::new("brick.dds")));
        assert!(!is_raster_path(Path::new("brick")));
    }

    #[test]
    fn gray_images_expand_to_rgba() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 1, Luma([90])));
        let texture = from_dynamic_image(image).unwrap();

        assert_eq!(texture.pixels(), &[90, 90, 90, 255, 90, 90, 90, 255]);
        assert_eq!(texture.source(), TextureSource::Raster(ColorType::L8));
    }

    #[test]
    fn float_images_are_rejected() {
        let image = DynamicImage::ImageRgb32F(Rgb32FImage::new(1, 1));
        assert!(matches!(
            from_dynamic_image(image),
            Err(AssetError::UnsupportedPixelFormat(_))
        ));
    }

    #[test]
    fn dispatches_png_and_dds_by_extension_and_signature() {
        let dir = tempfile::tempdir().unwrap();

        let png_path = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]))
            .save(&png_path)
            .unwrap();
        let png = load_texture(&png_path).unwrap();
        assert_eq!((png.width(), png.height()), (3, 2));
        assert_eq!(png.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(png.pixel(3, 1), None);
        assert_eq!(png.pixel(0, 2), None);

        let mut block = 0xF800u16.to_le_bytes().to_vec();
        block.extend_from_slice(&0x001Fu16.to_le_bytes());
        block.extend_from_slice(&0u32.to_le_bytes());
        let dds_path = dir.path().join("tile.tex");
        fs::write(&dds_path, dds_bytes(4, 4, b"DXT1", &block)).unwrap();
        let dds = load_texture(&dds_path).unwrap();
        assert_eq!(dds.source(), TextureSource::Compressed(BlockCodec::Dxt1));
        assert_eq!(dds.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn truncated_dds_file_is_rejected_from_its_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.dds");
        fs::write(&path, dds_bytes(65535, 65535, b"DXT5", &[0u8; 32])).unwrap();
        assert!(matches!(
            load_texture(&path),
            Err(AssetError::UnexpectedEndOfData { .. })
        ));
    }

    #[test]
    fn unknown_signature_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.bin");
        fs::write(&path, b"RIFF0000").unwrap();
        assert!(matches!(
            load_texture(&path),
            Err(AssetError::UnknownImageFormat(_))
        ));

        let short = dir.path().join("short.bin");
        fs::write(&short, b"DD").unwrap();
        assert!(matches!(
            load_texture(&short),
            Err(AssetError::UnknownImageFormat(_))
        ));
    }
}
