//! Archive fixtures for unit tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::location::ArchiveLocation;

/// One entry to write into a fixture archive.
pub struct Entry<'a> {
    pub name: &'a str,
    pub data: Option<&'a [u8]>,
    pub stored: bool,
}

impl<'a> Entry<'a> {
    pub fn file(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data: Some(data),
            stored: false,
        }
    }

    /// A file written without compression.
    pub fn stored(name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            data: Some(data),
            stored: true,
        }
    }

    pub fn dir(name: &'a str) -> Self {
        Self {
            name,
            data: None,
            stored: true,
        }
    }
}

/// Write `entries` in order to `dir/file_name` and return its location.
///
/// Sizes and CRCs are recorded in each local header.
pub fn write_archive(dir: &Path, file_name: &str, entries: &[Entry<'_>]) -> ArchiveLocation {
    let path = dir.join(file_name);
    let mut zip = ZipWriter::new(File::create(&path).unwrap());

    for entry in entries {
        let method = if entry.stored {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);
        match entry.data {
            Some(data) => {
                zip.start_file(entry.name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            None => zip.add_directory(entry.name, options).unwrap(),
        }
    }

    zip.finish().unwrap();
    ArchiveLocation::from_file_path(&path).unwrap()
}

/// Write `entries` in the layout of the JDK `jar` tool and return the location.
///
/// Files are deflated with general purpose flag bit 3 set: the local header
/// carries zero CRC and sizes, and a signed data descriptor follows each
/// payload. Directories are stored with their (empty) sizes in the header.
pub fn write_descriptor_archive(
    dir: &Path,
    file_name: &str,
    entries: &[Entry<'_>],
) -> ArchiveLocation {
    let path = dir.join(file_name);
    std::fs::write(&path, descriptor_archive_bytes(entries)).unwrap();
    ArchiveLocation::from_file_path(&path).unwrap()
}

/// Bytes of a `jar`-tool style archive; see [`write_descriptor_archive`].
pub fn descriptor_archive_bytes(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut central = Vec::new();

    for entry in entries {
        let offset = out.len() as u32;
        let (flags, method, crc, payload, size): (u16, u16, u32, Vec<u8>, u32) = match entry.data {
            Some(data) => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data).unwrap();
                let mut crc = Crc::new();
                crc.update(data);
                (0x0808, 8, crc.sum(), encoder.finish().unwrap(), data.len() as u32)
            }
            None => (0x0800, 0, 0, Vec::new(), 0),
        };
        let deferred = flags & 0x0008 != 0;
        let name = entry.name.as_bytes();

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&method.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        if deferred {
            out.extend_from_slice(&[0u8; 12]);
        } else {
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
        }
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(&payload);
        if deferred {
            out.extend_from_slice(&0x0807_4b50u32.to_le_bytes());
            out.extend_from_slice(&crc.to_le_bytes());
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&size.to_le_bytes());
        }

        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&flags.to_le_bytes());
        central.extend_from_slice(&method.to_le_bytes());
        central.extend_from_slice(&[0u8; 4]);
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        central.extend_from_slice(&size.to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&[0u8; 12]);
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name);
    }

    let central_offset = out.len() as u32;
    let count = entries.len() as u16;
    out.extend_from_slice(&central);
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}
