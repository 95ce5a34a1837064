//! Local file header and data descriptor records.
//!
//! Only the records met while walking an archive front to back are parsed.
//! Anything belonging to the central directory marks the end of the entries.

use std::io::{self, BufRead, Read};

const LOCAL_FILE_HEADER: u32 = 0x0403_4b50;
const DATA_DESCRIPTOR: u32 = 0x0807_4b50;
const CENTRAL_DIRECTORY_HEADER: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50;
const ZIP64_END_OF_CENTRAL_DIRECTORY: u32 = 0x0606_4b50;
const DIGITAL_SIGNATURE: u32 = 0x0505_4b50;
const ARCHIVE_EXTRA_DATA: u32 = 0x0806_4b50;

const FLAG_ENCRYPTED: u16 = 1;
const FLAG_DATA_DESCRIPTOR: u16 = 1 << 3;

const ZIP64_EXTRA_FIELD: u16 = 0x0001;
const ZIP64_SIZE_MARKER: u64 = 0xFFFF_FFFF;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATED: u16 = 8;

/// Payload encoding of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Stored,
    Deflated,
}

/// Fields of a local file header needed to read its payload.
#[derive(Debug, Clone)]
pub(crate) struct LocalHeader {
    pub name: String,
    pub method: Method,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    /// CRC and sizes follow the payload instead of living in the header.
    pub has_descriptor: bool,
    /// A zip64 extra field was present, widening descriptor sizes to 8 bytes.
    pub zip64: bool,
}

/// CRC and sizes written after a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DataDescriptor {
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
}

/// Next record at the reader's position.
#[derive(Debug)]
pub(crate) enum Record {
    Entry(LocalHeader),
    End,
}

/// Read the record at the current position.
///
/// EOF and any central-directory record end the entry sequence.
pub(crate) fn read_record<R: BufRead>(reader: &mut R) -> io::Result<Record> {
    if reader.fill_buf()?.is_empty() {
        return Ok(Record::End);
    }

    match read_u32(reader)? {
        LOCAL_FILE_HEADER => read_local_header(reader).map(Record::Entry),
        CENTRAL_DIRECTORY_HEADER
        | END_OF_CENTRAL_DIRECTORY
        | ZIP64_END_OF_CENTRAL_DIRECTORY
        | DIGITAL_SIGNATURE
        | ARCHIVE_EXTRA_DATA => Ok(Record::End),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid record signature {:#010x}", other),
        )),
    }
}

fn read_local_header<R: Read>(reader: &mut R) -> io::Result<LocalHeader> {
    let mut fixed = [0u8; 26];
    reader.read_exact(&mut fixed)?;

    let flags = u16_at(&fixed, 2);
    let method = u16_at(&fixed, 4);
    let crc32 = u32_at(&fixed, 10);
    let mut compressed_size = u64::from(u32_at(&fixed, 14));
    let mut uncompressed_size = u64::from(u32_at(&fixed, 18));
    let name_len = usize::from(u16_at(&fixed, 22));
    let extra_len = usize::from(u16_at(&fixed, 24));

    let mut raw_name = vec![0u8; name_len];
    reader.read_exact(&mut raw_name)?;
    let name = match String::from_utf8(raw_name) {
        Ok(name) => name,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };

    let mut extra = vec![0u8; extra_len];
    reader.read_exact(&mut extra)?;
    let zip64 = apply_zip64_sizes(&extra, &mut uncompressed_size, &mut compressed_size);

    if flags & FLAG_ENCRYPTED != 0 {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("entry '{}' is encrypted", name),
        ));
    }

    let method = match method {
        METHOD_STORED => Method::Stored,
        METHOD_DEFLATED => Method::Deflated,
        other => {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("entry '{}' uses unsupported compression method {}", name, other),
            ))
        }
    };

    let has_descriptor = flags & FLAG_DATA_DESCRIPTOR != 0;

    // A stored payload has no end marker, so its length must be known up front.
    if method == Method::Stored && has_descriptor && compressed_size == 0 && !name.ends_with('/') {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("stored entry '{}' defers its size to a data descriptor", name),
        ));
    }

    Ok(LocalHeader {
        name,
        method,
        crc32,
        compressed_size,
        uncompressed_size,
        has_descriptor,
        zip64,
    })
}

/// Replace saturated header sizes with their zip64 values.
///
/// Returns whether a zip64 field was present.
fn apply_zip64_sizes(mut extra: &[u8], uncompressed: &mut u64, compressed: &mut u64) -> bool {
    while extra.len() >= 4 {
        let id = u16_at(extra, 0);
        let len = usize::from(u16_at(extra, 2));
        let Some(data) = extra.get(4..4 + len) else {
            break;
        };

        if id == ZIP64_EXTRA_FIELD {
            let mut fields = data.chunks_exact(8).map(u64_at);
            if *uncompressed == ZIP64_SIZE_MARKER {
                if let Some(size) = fields.next() {
                    *uncompressed = size;
                }
            }
            if *compressed == ZIP64_SIZE_MARKER {
                if let Some(size) = fields.next() {
                    *compressed = size;
                }
            }
            return true;
        }

        extra = &extra[4 + len..];
    }
    false
}

/// Read the descriptor following a payload; its signature is optional.
pub(crate) fn read_descriptor<R: Read>(reader: &mut R, zip64: bool) -> io::Result<DataDescriptor> {
    let mut crc32 = read_u32(reader)?;
    if crc32 == DATA_DESCRIPTOR {
        crc32 = read_u32(reader)?;
    }

    let (compressed_size, uncompressed_size) = if zip64 {
        (read_u64(reader)?, read_u64(reader)?)
    } else {
        (u64::from(read_u32(reader)?), u64::from(read_u32(reader)?))
    };

    Ok(DataDescriptor {
        crc32,
        compressed_size,
        uncompressed_size,
    })
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn u16_at(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

fn u64_at(buf: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[..8]);
    u64::from_le_bytes(bytes)
}
