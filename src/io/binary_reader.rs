use std::io::{self, Read};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{AssetError, AssetResult};

/// Byte order of a single read. Container headers and codec bitfields mix
/// both, so it is chosen per call instead of per reader.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endian {
    Little,
    Big,
}

/// Cursor over a byte source reading fixed-width primitives.
pub struct BinaryReader<R> {
    inner: R,
    position: u64,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn read_u8(&mut self) -> AssetResult<u8> {
        let value = self.inner.read_u8().map_err(|e| eof_as_truncation(e, 1))?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self, endian: Endian) -> AssetResult<u16> {
        let value = match endian {
            Endian::Little => self.inner.read_u16::<LittleEndian>(),
            Endian::Big => self.inner.read_u16::<BigEndian>(),
        }
        .map_err(|e| eof_as_truncation(e, 2))?;
        self.position += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self, endian: Endian) -> AssetResult<u32> {
        let value = match endian {
            Endian::Little => self.inner.read_u32::<LittleEndian>(),
            Endian::Big => self.inner.read_u32::<BigEndian>(),
        }
        .map_err(|e| eof_as_truncation(e, 4))?;
        self.position += 4;
        Ok(value)
    }

    pub fn read_u64(&mut self, endian: Endian) -> AssetResult<u64> {
        let value = match endian {
            Endian::Little => self.inner.read_u64::<LittleEndian>(),
            Endian::Big => self.inner.read_u64::<BigEndian>(),
        }
        .map_err(|e| eof_as_truncation(e, 8))?;
        self.position += 8;
        Ok(value)
    }

    pub fn read_bytes(&mut self, count: usize) -> AssetResult<Vec<u8>> {
        let mut buffer = vec![0u8; count];
        self.inner
            .read_exact(&mut buffer)
            .map_err(|e| eof_as_truncation(e, count))?;
        self.position += count as u64;
        Ok(buffer)
    }

    /// Reads a four-character code such as `DDS ` or `DXT5`.
    pub fn read_fourcc(&mut self) -> AssetResult<[u8; 4]> {
        let mut code = [0u8; 4];
        self.inner
            .read_exact(&mut code)
            .map_err(|e| eof_as_truncation(e, 4))?;
        self.position += 4;
        Ok(code)
    }
}

fn eof_as_truncation(error: io::Error, needed: usize) -> AssetError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        AssetError::UnexpectedEndOfData { needed }
    } else {
        AssetError::Io(error)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{BinaryReader, Endian};
    use crate::error::AssetError;

    #[test]
    fn reads_mixed_endian_fields_in_sequence() {
        let bytes = [0x01, 0x02, 0x01, 0x02, 0xAA, 0xBB, 0xCC, 0xDD];
        let mut reader = BinaryReader::new(Cursor::new(bytes));

        assert_eq!(reader.read_u16(Endian::Little).unwrap(), 0x0201);
        assert_eq!(reader.read_u16(Endian::Big).unwrap(), 0x0102);
        assert_eq!(reader.read_u32(Endian::Little).unwrap(), 0xDDCC_BBAA);
        assert_eq!(reader.position(), 8);
    }

    #[test]
    fn read_u64_little_endian() {
        let bytes = 0x0123_4567_89AB_CDEFu64.to_le_bytes();
        let mut reader = BinaryReader::new(Cursor::new(bytes));
        assert_eq!(
            reader.read_u64(Endian::Little).unwrap(),
            0x0123_4567_89AB_CDEF
        );
    }

    #[test]
    fn truncated_input_reports_unexpected_end() {
        let mut reader = BinaryReader::new(Cursor::new([0x01, 0x02, 0x03]));
        match reader.read_u32(Endian::Little) {
            Err(AssetError::UnexpectedEndOfData { needed }) => assert_eq!(needed, 4),
            other => panic!("expected UnexpectedEndOfData, got {:?}", other),
        }
    }

    #[test]
    fn read_bytes_and_fourcc() {
        let mut reader = BinaryReader::new(Cursor::new(b"DDS \x07\x08".to_vec()));
        assert_eq!(&reader.read_fourcc().unwrap(), b"DDS ");
        assert_eq!(reader.read_bytes(2).unwrap(), vec![7, 8]);
        assert!(matches!(
            reader.read_bytes(1),
            Err(AssetError::UnexpectedEndOfData { needed: 1 })
        ));
    }
}
