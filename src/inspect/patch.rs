//! BPS patch decoding and application.
//!
//! Layout: `BPS1`, varint source size, varint target size, varint metadata
//! size, metadata bytes, actions, then three little-endian CRC32s (source,
//! target, patch). The patch CRC covers every byte before it.

use std::fmt;

/// File magic.
pub const MAGIC: &[u8; 4] = b"BPS1";

/// Three trailing CRC32s.
const FOOTER_LEN: usize = 12;

/// Largest target image a patch may produce.
pub const MAX_TARGET_SIZE: u64 = 64 * 1024 * 1024;

/// Why a patch could not be read or applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    BadMagic,
    Truncated,
    VarintOverflow,
    PatchChecksum { expected: u32, actual: u32 },
    SourceChecksum { expected: u32, actual: u32 },
    TargetChecksum { expected: u32, actual: u32 },
    SourceSize { expected: u64, actual: u64 },
    OutOfBounds,
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::BadMagic => write!(f, "not a BPS patch"),
            PatchError::Truncated => write!(f, "patch is truncated"),
            PatchError::VarintOverflow => write!(f, "patch contains an oversized number"),
            PatchError::PatchChecksum { expected, actual } => write!(f, "patch checksum mismatch (expected {expected:08X}, got {actual:08X})"),
            PatchError::SourceChecksum { expected, actual } => write!(f, "base ROM checksum mismatch (expected {expected:08X}, got {actual:08X})"),
            PatchError::TargetChecksum { expected, actual } => write!(f, "patched ROM checksum mismatch (expected {expected:08X}, got {actual:08X})"),
            PatchError::SourceSize { expected, actual } => write!(f, "base ROM size mismatch (expected {expected}, got {actual})"),
            PatchError::OutOfBounds => write!(f, "patch reads or writes outside the ROM"),
        }
    }
}

impl std::error::Error for PatchError {}

/// Header and footer of a BPS patch. Actions are kept unparsed until [`Patch::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch<'a> {
    pub source_size: u64,
    pub target_size: u64,
    pub metadata: &'a [u8],
    pub source_crc: u32,
    pub target_crc: u32,
    pub patch_crc: u32,
    actions: &'a [u8],
}

/// Cursor over patch bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn byte(&mut self) -> Result<u8, PatchError> {
        let b = *self.data.get(self.pos).ok_or(PatchError::Truncated)?;
        self.pos += 1;
        Ok(b)
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], PatchError> {
        let end = self.pos.checked_add(len).ok_or(PatchError::Truncated)?;
        let slice = self.data.get(self.pos..end).ok_or(PatchError::Truncated)?;
        self.pos = end;
        Ok(slice)
    }

    /// BPS varint: 7 bits per byte, high bit terminates, each continuation adds an implicit offset.
    fn varint(&mut self) -> Result<u64, PatchError> {
        let mut value: u64 = 0;
        let mut shift: u64 = 1;

        loop {
            let x = self.byte()?;
            value = u64::from(x & 0x7f).checked_mul(shift).and_then(|v| value.checked_add(v)).ok_or(PatchError::VarintOverflow)?;

            if x & 0x80 != 0 {
                return Ok(value);
            }

            shift = shift.checked_shl(7).filter(|s| *s != 0 && *s <= 1 << 56).ok_or(PatchError::VarintOverflow)?;
            value = value.checked_add(shift).ok_or(PatchError::VarintOverflow)?;
        }
    }
}

fn read_u32_le(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn to_usize(value: u64) -> Result<usize, PatchError> {
    usize::try_from(value).map_err(|_| PatchError::OutOfBounds)
}

/// Apply a signed relative offset encoded as `(magnitude << 1) | sign`.
fn relative(base: usize, encoded: u64) -> Result<usize, PatchError> {
    let magnitude = to_usize(encoded >> 1)?;

    if encoded & 1 == 1 {
        base.checked_sub(magnitude).ok_or(PatchError::OutOfBounds)
    } else {
        base.checked_add(magnitude).ok_or(PatchError::OutOfBounds)
    }
}

/// Cheap check used to classify uploads.
pub fn is_patch(data: &[u8]) -> bool {
    data.starts_with(MAGIC)
}

impl<'a> Patch<'a> {
    /// Parse the header and verify the patch's own checksum.
    pub fn parse(data: &'a [u8]) -> Result<Self, PatchError> {
        if !is_patch(data) {
            return Err(PatchError::BadMagic);
        }

        if data.len() < MAGIC.len() + FOOTER_LEN {
            return Err(PatchError::Truncated);
        }

        let body_end = data.len() - FOOTER_LEN;
        let footer = &data[body_end..];

        let source_crc = read_u32_le(&footer[0..4]);
        let target_crc = read_u32_le(&footer[4..8]);
        let patch_crc = read_u32_le(&footer[8..12]);

        let actual = crc32fast::hash(&data[..data.len() - 4]);
        if actual != patch_crc {
            return Err(PatchError::PatchChecksum { expected: patch_crc, actual });
        }

        let mut reader = Reader::new(&data[MAGIC.len()..body_end]);
        let source_size = reader.varint()?;
        let target_size = reader.varint()?;
        let metadata_size = to_usize(reader.varint()?)?;
        let metadata = reader.bytes(metadata_size)?;
        let actions = &reader.data[reader.pos..];

        Ok(Self {
            source_size,
            target_size,
            metadata,
            source_crc,
            target_crc,
            patch_crc,
            actions,
        })
    }

    /// Patch metadata as text, if it is valid UTF-8 and not blank.
    pub fn metadata_text(&self) -> Option<&'a str> {
        std::str::from_utf8(self.metadata).ok().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Check that `source` is the image this patch was built against.
    pub fn check_source(&self, source: &[u8]) -> Result<(), PatchError> {
        if source.len() as u64 != self.source_size {
            return Err(PatchError::SourceSize {
                expected: self.source_size,
                actual: source.len() as u64,
            });
        }

        let actual = crc32fast::hash(source);
        if actual != self.source_crc {
            return Err(PatchError::SourceChecksum { expected: self.source_crc, actual });
        }

        Ok(())
    }

    /// Produce the target image from `source`, verifying both checksums.
    pub fn apply(&self, source: &[u8]) -> Result<Vec<u8>, PatchError> {
        self.check_source(source)?;

        if self.target_size > MAX_TARGET_SIZE {
            return Err(PatchError::OutOfBounds);
        }

        let target_size = to_usize(self.target_size)?;
        let mut target: Vec<u8> = Vec::with_capacity(target_size);
        let mut reader = Reader::new(self.actions);
        let mut source_offset: usize = 0;
        let mut target_offset: usize = 0;

        while !reader.is_empty() {
            let data = reader.varint()?;
            let length = to_usize((data >> 2) + 1)?;

            if target.len() + length > target_size {
                return Err(PatchError::OutOfBounds);
            }

            match data & 3 {
                // SourceRead
                0 => {
                    let start = target.len();
                    let chunk = source.get(start..start + length).ok_or(PatchError::OutOfBounds)?;
                    target.extend_from_slice(chunk);
                }
                // TargetRead
                1 => {
                    let chunk = reader.bytes(length)?;
                    target.extend_from_slice(chunk);
                }
                // SourceCopy
                2 => {
                    source_offset = relative(source_offset, reader.varint()?)?;
                    let chunk = source.get(source_offset..source_offset + length).ok_or(PatchError::OutOfBounds)?;
                    target.extend_from_slice(chunk);
                    source_offset += length;
                }
                // TargetCopy, byte at a time since the ranges may overlap.
                _ => {
                    target_offset = relative(target_offset, reader.varint()?)?;
                    for _ in 0..length {
                        let b = *target.get(target_offset).ok_or(PatchError::OutOfBounds)?;
                        target.push(b);
                        target_offset += 1;
                    }
                }
            }
        }

        if target.len() != target_size {
            return Err(PatchError::Truncated);
        }

        let actual = crc32fast::hash(&target);
        if actual != self.target_crc {
            return Err(PatchError::TargetChecksum { expected: self.target_crc, actual });
        }

        Ok(target)
    }
}
