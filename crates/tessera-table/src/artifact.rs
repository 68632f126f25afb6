//! Binary table artifact (32-byte header + postcard body).
//!
//! Layout:
//! - 0-15: identity and sizes (magic, version, checksum, total_size)
//! - 16-23: counts (symbols, states, productions, tokens as u16)
//! - 24-31: reserved
//! - 32..: postcard-encoded [`TableData`]

use crate::error::TableError;
use crate::table::{ParseTable, TableData};

/// Magic bytes: b"TSRA".
pub const MAGIC: [u8; 4] = *b"TSRA";

/// Format version.
pub const VERSION: u32 = 2;

pub const HEADER_SIZE: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    /// Total artifact size in bytes.
    pub total_size: u32,
    pub symbol_count: u16,
    pub state_count: u16,
    pub production_count: u16,
    pub token_count: u16,
    pub _reserved: [u8; 8],
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            symbol_count: 0,
            state_count: 0,
            production_count: 0,
            token_count: 0,
            _reserved: [0; 8],
        }
    }
}

impl Header {
    /// Decode the header. Returns `None` if fewer than [`HEADER_SIZE`] bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let bytes: &[u8; HEADER_SIZE] = bytes.get(..HEADER_SIZE)?.try_into().ok()?;
        let u32_at = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);

        let mut reserved = [0u8; 8];
        reserved.copy_from_slice(&bytes[24..32]);

        Some(Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(4),
            checksum: u32_at(8),
            total_size: u32_at(12),
            symbol_count: u16_at(16),
            state_count: u16_at(18),
            production_count: u16_at(20),
            token_count: u16_at(22),
            _reserved: reserved,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..18].copy_from_slice(&self.symbol_count.to_le_bytes());
        bytes[18..20].copy_from_slice(&self.state_count.to_le_bytes());
        bytes[20..22].copy_from_slice(&self.production_count.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.token_count.to_le_bytes());
        bytes[24..32].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}

impl ParseTable {
    /// Serialize to the binary artifact format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let data = self.data();
        let body = postcard::to_allocvec(data)?;

        let header = Header {
            checksum: crc32fast::hash(&body),
            total_size: (HEADER_SIZE + body.len()) as u32,
            symbol_count: data.symbols.len() as u16,
            state_count: data.state_count,
            production_count: data.productions.len() as u16,
            token_count: data.tokens.len() as u16,
            ..Header::default()
        };

        let mut output = Vec::with_capacity(HEADER_SIZE + body.len());
        output.extend_from_slice(&header.to_bytes());
        output.extend_from_slice(&body);
        Ok(output)
    }

    /// Load and validate a binary artifact.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        let header = Header::from_bytes(bytes).ok_or(TableError::FileTooSmall)?;
        if !header.validate_magic() {
            return Err(TableError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(TableError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != bytes.len() {
            return Err(TableError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            });
        }

        let body = &bytes[HEADER_SIZE..];
        let actual = crc32fast::hash(body);
        if actual != header.checksum {
            return Err(TableError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let data: TableData = postcard::from_bytes(body)?;
        ParseTable::new(data)
    }
}
