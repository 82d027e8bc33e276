//! Decoding of single 4x4 DXT blocks into RGBA8 texels.

use std::io::Read;

use crate::error::AssetResult;
use crate::io::{BinaryReader, Endian};

/// Texels per block edge.
pub const BLOCK_DIM: usize = 4;
/// RGBA8 bytes produced by one decoded block.
pub const BLOCK_RGBA_LEN: usize = BLOCK_DIM * BLOCK_DIM * 4;

pub type DecodedBlock = [u8; BLOCK_RGBA_LEN];

/// Block compression variants selected by the container's FourCC.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BlockCodec {
    /// Opaque color or 1-bit alpha, 8 bytes per block.
    Dxt1,
    /// Explicit 4-bit alpha plane followed by a color block, 16 bytes.
    Dxt3,
    /// Interpolated 3-bit alpha plane followed by a color block, 16 bytes.
    Dxt5,
}

impl BlockCodec {
    pub fn from_fourcc(code: &[u8]) -> Option<Self> {
        match code {
            b"DXT1" => Some(BlockCodec::Dxt1),
            b"DXT3" => Some(BlockCodec::Dxt3),
            b"DXT5" => Some(BlockCodec::Dxt5),
            _ => None,
        }
    }

    pub fn fourcc(self) -> &'static str {
        match self {
            BlockCodec::Dxt1 => "DXT1",
            BlockCodec::Dxt3 => "DXT3",
            BlockCodec::Dxt5 => "DXT5",
        }
    }

    pub fn block_size(self) -> usize {
        match self {
            BlockCodec::Dxt1 => 8,
            BlockCodec::Dxt3 | BlockCodec::Dxt5 => 16,
        }
    }
}

/// Expands a packed 5:6:5 color to 8 bits per channel by replicating the
/// high bits into the vacated low bits.
pub fn unpack_rgb565(packed: u16) -> [u8; 3] {
    let r = ((packed & 0xF800) >> 11) as u8;
    let g = ((packed & 0x07E0) >> 5) as u8;
    let b = (packed & 0x001F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}

/// Reads and decodes the next block. For codecs with an alpha plane the alpha
/// block comes first in the stream.
pub fn decode_block<R: Read>(
    reader: &mut BinaryReader<R>,
    codec: BlockCodec,
) -> AssetResult<DecodedBlock> {
    let alpha = match codec {
        BlockCodec::Dxt1 => None,
        BlockCodec::Dxt3 => Some(decode_explicit_alpha(reader)?),
        BlockCodec::Dxt5 => Some(decode_interpolated_alpha(reader)?),
    };

    let mut texels = decode_color(reader, codec == BlockCodec::Dxt1)?;
    if let Some(alpha) = alpha {
        for (texel, value) in texels.chunks_exact_mut(4).zip(alpha) {
            texel[3] = value;
        }
    }
    Ok(texels)
}

fn decode_color<R: Read>(
    reader: &mut BinaryReader<R>,
    allow_punch_through: bool,
) -> AssetResult<DecodedBlock> {
    let color0 = reader.read_u16(Endian::Little)?;
    let color1 = reader.read_u16(Endian::Little)?;
    let selectors = reader.read_u32(Endian::Little)?;

    let c0 = unpack_rgb565(color0);
    let c1 = unpack_rgb565(color1);
    let punch_through = allow_punch_through && color0 <= color1;

    let palette: [[u8; 4]; 4] = if punch_through {
        [
            [c0[0], c0[1], c0[2], 0xFF],
            [c1[0], c1[1], c1[2], 0xFF],
            [
                mix(c0[0], c1[0], 1, 1),
                mix(c0[1], c1[1], 1, 1),
                mix(c0[2], c1[2], 1, 1),
                0xFF,
            ],
            [0, 0, 0, 0],
        ]
    } else {
        [
            [c0[0], c0[1], c0[2], 0xFF],
            [c1[0], c1[1], c1[2], 0xFF],
            [
                mix(c0[0], c1[0], 2, 1),
                mix(c0[1], c1[1], 2, 1),
                mix(c0[2], c1[2], 2, 1),
                0xFF,
            ],
            [
                mix(c0[0], c1[0], 1, 2),
                mix(c0[1], c1[1], 1, 2),
                mix(c0[2], c1[2], 1, 2),
                0xFF,
            ],
        ]
    };

    let mut texels = [0u8; BLOCK_RGBA_LEN];
    for (i, texel) in texels.chunks_exact_mut(4).enumerate() {
        let code = ((selectors >> (i * 2)) & 0x3) as usize;
        texel.copy_from_slice(&palette[code]);
    }
    Ok(texels)
}

/// Weighted average `(wa*a + wb*b) / (wa + wb)` with integer truncation.
fn mix(a: u8, b: u8, wa: u32, wb: u32) -> u8 {
    ((wa * a as u32 + wb * b as u32) / (wa + wb)) as u8
}

fn decode_explicit_alpha<R: Read>(reader: &mut BinaryReader<R>) -> AssetResult<[u8; 16]> {
    let mut bits = reader.read_u64(Endian::Little)?;
    let mut alpha = [0u8; 16];
    for value in alpha.iter_mut() {
        let nibble = (bits & 0xF) as u8;
        *value = (nibble << 4) | nibble;
        bits >>= 4;
    }
    Ok(alpha)
}

fn decode_interpolated_alpha<R: Read>(reader: &mut BinaryReader<R>) -> AssetResult<[u8; 16]> {
    // Two endpoint bytes followed by 48 bits of 3-bit selectors.
    let packed = reader.read_u64(Endian::Little)?;
    let alpha0 = (packed & 0xFF) as u8;
    let alpha1 = ((packed >> 8) & 0xFF) as u8;
    let selectors = packed >> 16;

    let table = alpha_table(alpha0, alpha1);
    let mut alpha = [0u8; 16];
    for (i, value) in alpha.iter_mut().enumerate() {
        let code = ((selectors >> (i * 3)) & 0x7) as usize;
        *value = table[code];
    }
    Ok(alpha)
}

fn alpha_table(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let (a0, a1) = (alpha0 as u32, alpha1 as u32);
    if alpha0 > alpha1 {
        [
            alpha0,
            alpha1,
            ((6 * a0 + a1) / 7) as u8,
            ((5 * a0 + 2 * a1) / 7) as u8,
            ((4 * a0 + 3 * a1) / 7) as u8,
            ((3 * a0 + 4 * a1) / 7) as u8,
            ((2 * a0 + 5 * a1) / 7) as u8,
            ((a0 + 6 * a1) / 7) as u8,
        ]
    } else {
        [
            alpha0,
            alpha1,
            ((4 * a0 + a1) / 5) as u8,
            ((3 * a0 + 2 * a1) / 5) as u8,
            ((2 * a0 + 3 * a1) / 5) as u8,
            ((a0 + 4 * a1) / 5) as u8,
            0x00,
            0xFF,
        ]
    }
}
