//! DDS container parsing and whole-image block decompression.

use std::io::{Cursor, Read};

use crate::error::{AssetError, AssetResult};
use crate::io::{BinaryReader, Endian};

use super::block::{BLOCK_DIM, BlockCodec, decode_block};
use super::{Texture, TextureSource};

pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

/// Header flag bits (`DDSD_*`).
pub mod header_flags {
    pub const CAPS: u32 = 0x1;
    pub const HEIGHT: u32 = 0x2;
    pub const WIDTH: u32 = 0x4;
    pub const PITCH: u32 = 0x8;
    pub const PIXEL_FORMAT: u32 = 0x1000;
    pub const MIPMAP_COUNT: u32 = 0x20000;
    pub const LINEAR_SIZE: u32 = 0x80000;
    pub const DEPTH: u32 = 0x800000;
}

/// Pixel format flag bits (`DDPF_*`).
pub mod pixel_format_flags {
    pub const ALPHA_PIXELS: u32 = 0x1;
    pub const ALPHA: u32 = 0x2;
    pub const FOURCC: u32 = 0x4;
    pub const RGB: u32 = 0x40;
    pub const YUV: u32 = 0x200;
    pub const LUMINANCE: u32 = 0x20000;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DdsPixelFormat {
    pub size: u32,
    pub flags: u32,
    pub fourcc: [u8; 4],
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

impl DdsPixelFormat {
    fn read<R: Read>(reader: &mut BinaryReader<R>) -> AssetResult<Self> {
        Ok(Self {
            size: reader.read_u32(Endian::Little)?,
            flags: reader.read_u32(Endian::Little)?,
            fourcc: reader.read_fourcc()?,
            rgb_bit_count: reader.read_u32(Endian::Little)?,
            r_bit_mask: reader.read_u32(Endian::Little)?,
            g_bit_mask: reader.read_u32(Endian::Little)?,
            b_bit_mask: reader.read_u32(Endian::Little)?,
            a_bit_mask: reader.read_u32(Endian::Little)?,
        })
    }

    pub fn fourcc_str(&self) -> String {
        String::from_utf8_lossy(&self.fourcc).into_owned()
    }
}

/// The 124-byte header that follows the magic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DdsHeader {
    pub size: u32,
    pub flags: u32,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub reserved1: [u32; 11],
    pub pixel_format: DdsPixelFormat,
    pub caps: u32,
    pub caps2: u32,
    pub caps3: u32,
    pub caps4: u32,
    pub reserved2: u32,
}

impl DdsHeader {
    pub const SIZE: u32 = 124;

    pub fn read<R: Read>(reader: &mut BinaryReader<R>) -> AssetResult<Self> {
        let size = reader.read_u32(Endian::Little)?;
        let flags = reader.read_u32(Endian::Little)?;
        let height = reader.read_u32(Endian::Little)?;
        let width = reader.read_u32(Endian::Little)?;
        let pitch_or_linear_size = reader.read_u32(Endian::Little)?;
        let depth = reader.read_u32(Endian::Little)?;
        let mip_map_count = reader.read_u32(Endian::Little)?;
        let mut reserved1 = [0u32; 11];
        for word in reserved1.iter_mut() {
            *word = reader.read_u32(Endian::Little)?;
        }
        let pixel_format = DdsPixelFormat::read(reader)?;

        Ok(Self {
            size,
            flags,
            height,
            width,
            pitch_or_linear_size,
            depth,
            mip_map_count,
            reserved1,
            pixel_format,
            caps: reader.read_u32(Endian::Little)?,
            caps2: reader.read_u32(Endian::Little)?,
            caps3: reader.read_u32(Endian::Little)?,
            caps4: reader.read_u32(Endian::Little)?,
            reserved2: reader.read_u32(Endian::Little)?,
        })
    }

    pub fn codec(&self) -> AssetResult<BlockCodec> {
        BlockCodec::from_fourcc(&self.pixel_format.fourcc)
            .ok_or_else(|| AssetError::UnsupportedCodec(self.pixel_format.fourcc_str()))
    }
}

/// Decodes a DDS stream positioned just after the magic signature. Only the
/// top mip level is read. `remaining` is the number of bytes left in the
/// stream, header included, when the caller knows it.
pub fn decode_dds<R: Read>(
    reader: &mut BinaryReader<R>,
    remaining: Option<u64>,
) -> AssetResult<Texture> {
    let header = DdsHeader::read(reader)?;
    if header.size != DdsHeader::SIZE {
        log::debug!(
            "DDS header declares size {} (expected {})",
            header.size,
            DdsHeader::SIZE
        );
    }

    let codec = header.codec()?;
    log::debug!(
        "DDS {}x{} {} with {} mip level(s)",
        header.width,
        header.height,
        codec.fourcc(),
        header.mip_map_count.max(1)
    );

    let payload_len = remaining.map(|len| len.saturating_sub(u64::from(DdsHeader::SIZE)));
    decompress(reader, codec, header.width, header.height, payload_len)
}

/// Decodes a bare block payload with no container around it.
pub fn decode_compressed(
    fourcc: &str,
    width: u32,
    height: u32,
    data: &[u8],
) -> AssetResult<Texture> {
    let codec = BlockCodec::from_fourcc(fourcc.as_bytes())
        .ok_or_else(|| AssetError::UnsupportedCodec(fourcc.to_string()))?;
    let mut reader = BinaryReader::new(Cursor::new(data));
    decompress(&mut reader, codec, width, height, Some(data.len() as u64))
}

/// Bytes of block data needed for the top mip level.
fn payload_size(codec: BlockCodec, width: u32, height: u32) -> Option<u64> {
    let blocks_x = u64::from(width.div_ceil(BLOCK_DIM as u32));
    let blocks_y = u64::from(height.div_ceil(BLOCK_DIM as u32));
    blocks_x
        .checked_mul(blocks_y)?
        .checked_mul(codec.block_size() as u64)
}

fn decompress<R: Read>(
    reader: &mut BinaryReader<R>,
    codec: BlockCodec,
    width: u32,
    height: u32,
    payload_len: Option<u64>,
) -> AssetResult<Texture> {
    let too_large = || AssetError::InvalidDimensions { width, height };
    let (w, h) = (width as usize, height as usize);
    let pixel_len = w
        .checked_mul(h)
        .and_then(|texels| texels.checked_mul(4))
        .ok_or_else(too_large)?;

    // Reject truncated payloads before allocating the output.
    if let Some(available) = payload_len {
        let required = payload_size(codec, width, height).ok_or_else(too_large)?;
        if available < required {
            return Err(AssetError::UnexpectedEndOfData {
                needed: usize::try_from(required - available).unwrap_or(usize::MAX),
            });
        }
    }

    let mut pixels = vec![0u8; pixel_len];

    for block_y in (0..h).step_by(BLOCK_DIM) {
        for block_x in (0..w).step_by(BLOCK_DIM) {
            let block = decode_block(reader, codec)?;

            // Clip blocks hanging over the right and bottom edges.
            let rows = BLOCK_DIM.min(h - block_y);
            let cols = BLOCK_DIM.min(w - block_x);
            for py in 0..rows {
                let src = py * BLOCK_DIM * 4;
                let dst = ((block_y + py) * w + block_x) * 4;
                pixels[dst..dst + cols * 4].copy_from_slice(&block[src..src + cols * 4]);
            }
        }
    }

    Ok(Texture::new(width, height, pixels, TextureSource::Compressed(codec)))
}
