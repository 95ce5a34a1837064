//! Forward-only archive entry stream.
//!
//! Archives are read sequentially through their local file headers; the
//! central directory is never consulted, so an archive is never loaded or
//! seeked as a whole. Memory use is bounded by the read buffer and the
//! inflater window.
//!
//! Entries whose sizes are deferred to a data descriptor (the layout the JDK
//! `jar` tool writes) are read by inflating to the end of the deflate stream
//! and then consuming the descriptor. Every payload is checked against its
//! CRC and declared size once it has been read or skipped.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};

use flate2::{Crc, Decompress, FlushDecompress, Status};
use tracing::trace;

use super::header::{self, LocalHeader, Method, Record};
use crate::error::{ScanError, ScanResult};
use crate::location::ArchiveLocation;

type Source = BufReader<Box<dyn Read + Send>>;

/// A lazy, non-restartable sequence of entries from one archive.
///
/// Entries are handed out one at a time through [`EntryStream::next_entry`].
/// The returned [`ArchiveEntry`] borrows the stream, so it must be dropped
/// before the next entry can be requested. Whatever payload the caller did
/// not read is skipped when the stream advances, and failures while skipping
/// are reported by that `next_entry` call.
pub struct EntryStream {
    location: ArchiveLocation,
    reader: Source,
    current: Option<Payload>,
    entries_read: usize,
    finished: bool,
}

impl EntryStream {
    /// Open a normalized location for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] tagged with the location if it cannot be opened.
    pub fn open(location: ArchiveLocation) -> ScanResult<Self> {
        match location.open() {
            Ok(raw) => Ok(Self::from_reader(location, raw)),
            Err(source) => Err(ScanError::Io { location, source }),
        }
    }

    /// Stream entries from an already opened byte source.
    pub fn from_reader(location: ArchiveLocation, raw: Box<dyn Read + Send>) -> Self {
        Self {
            location,
            reader: BufReader::new(raw),
            current: None,
            entries_read: 0,
            finished: false,
        }
    }

    /// Location this stream was opened from.
    pub fn location(&self) -> &ArchiveLocation {
        &self.location
    }

    /// Number of entries yielded so far.
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }

    /// Advance to the next entry in archive order.
    ///
    /// Returns `Ok(None)` once the local headers are exhausted. After an
    /// error the stream is exhausted as well.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] tagged with the location when the stream is
    /// truncated or corrupt, when the previous payload fails its CRC or size
    /// check, or when an entry uses an encoding that cannot be streamed.
    pub fn next_entry(&mut self) -> ScanResult<Option<ArchiveEntry<'_>>> {
        if self.finished {
            return Ok(None);
        }

        match self.advance() {
            Ok(Some(header)) => {
                self.entries_read += 1;
                trace!(
                    location = %self.location,
                    entry = %header.name,
                    descriptor = header.has_descriptor,
                    "Read entry header"
                );
                let payload = self.current.insert(Payload::new(header));
                Ok(Some(ArchiveEntry {
                    reader: &mut self.reader,
                    payload,
                }))
            }
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(source) => {
                self.finished = true;
                Err(ScanError::Io {
                    location: self.location.clone(),
                    source,
                })
            }
        }
    }

    fn advance(&mut self) -> io::Result<Option<LocalHeader>> {
        if let Some(payload) = self.current.take() {
            payload.finish(&mut self.reader)?;
        }

        match header::read_record(&mut self.reader)? {
            Record::Entry(header) => Ok(Some(header)),
            Record::End => Ok(None),
        }
    }
}

impl fmt::Debug for EntryStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryStream")
            .field("location", &self.location)
            .field("entries_read", &self.entries_read)
            .finish()
    }
}

/// The current entry of an [`EntryStream`].
///
/// Reading from the entry yields its decompressed payload.
pub struct ArchiveEntry<'a> {
    reader: &'a mut Source,
    payload: &'a mut Payload,
}

impl ArchiveEntry<'_> {
    /// Archive-relative path of the entry.
    pub fn name(&self) -> &str {
        &self.payload.header.name
    }

    /// Whether the entry is a directory marker.
    pub fn is_dir(&self) -> bool {
        self.payload.header.name.ends_with('/')
    }

    /// Uncompressed payload size declared in the local header.
    ///
    /// Zero when the size is deferred to a data descriptor.
    pub fn size(&self) -> u64 {
        self.payload.header.uncompressed_size
    }
}

impl Read for ArchiveEntry<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.payload.read(self.reader, buf)
    }
}

impl fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("name", &self.name())
            .field("is_dir", &self.is_dir())
            .finish()
    }
}

/// Read state of the current entry's payload.
struct Payload {
    header: LocalHeader,
    inflater: Option<Decompress>,
    /// Compressed bytes left, when the header declares them.
    remaining: Option<u64>,
    crc: Crc,
    produced: u64,
    done: bool,
}

impl Payload {
    fn new(header: LocalHeader) -> Self {
        let (inflater, remaining) = match header.method {
            Method::Stored => (None, Some(header.compressed_size)),
            Method::Deflated if header.has_descriptor => (Some(Decompress::new(false)), None),
            Method::Deflated => (Some(Decompress::new(false)), Some(header.compressed_size)),
        };

        Self {
            header,
            inflater,
            remaining,
            crc: Crc::new(),
            produced: 0,
            done: false,
        }
    }

    fn read(&mut self, reader: &mut Source, buf: &mut [u8]) -> io::Result<usize> {
        if self.done || buf.is_empty() {
            return Ok(0);
        }

        let n = if self.inflater.is_some() {
            self.read_deflated(reader, buf)?
        } else {
            self.read_stored(reader, buf)?
        };

        self.crc.update(&buf[..n]);
        self.produced += n as u64;
        Ok(n)
    }

    fn read_stored(&mut self, reader: &mut Source, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.remaining.unwrap_or(0);
        let want = remaining.min(buf.len() as u64) as usize;
        if want == 0 {
            self.done = true;
            return Ok(0);
        }

        let n = reader.read(&mut buf[..want])?;
        if n == 0 {
            return Err(truncated(&self.header));
        }
        self.remaining = Some(remaining - n as u64);
        Ok(n)
    }

    fn read_deflated(&mut self, reader: &mut Source, buf: &mut [u8]) -> io::Result<usize> {
        let Some(inflater) = self.inflater.as_mut() else {
            return Ok(0);
        };

        loop {
            let available = reader.fill_buf()?;
            let limit = match self.remaining {
                Some(remaining) => remaining.min(available.len() as u64) as usize,
                None => available.len(),
            };
            let input = &available[..limit];
            let at_eof = input.is_empty();

            let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
            let status = inflater
                .decompress(input, buf, FlushDecompress::None)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let consumed = (inflater.total_in() - in_before) as usize;
            let written = (inflater.total_out() - out_before) as usize;

            reader.consume(consumed);
            if let Some(remaining) = self.remaining.as_mut() {
                *remaining -= consumed as u64;
            }

            if status == Status::StreamEnd {
                self.done = true;
                return Ok(written);
            }
            if written > 0 {
                return Ok(written);
            }
            if at_eof {
                return Err(truncated(&self.header));
            }
            if consumed == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("entry '{}' has a stalled deflate stream", self.header.name),
                ));
            }
        }
    }

    /// Skip the unread payload, consume any descriptor, and verify the entry.
    fn finish(mut self, reader: &mut Source) -> io::Result<()> {
        let mut scratch = [0u8; 8 * 1024];
        while self.read(reader, &mut scratch)? > 0 {}

        if let Some(leftover) = self.remaining.filter(|&n| n > 0) {
            let skipped = io::copy(&mut reader.by_ref().take(leftover), &mut io::sink())?;
            if skipped < leftover {
                return Err(truncated(&self.header));
            }
        }

        let (expected_crc, expected_size) = if self.header.has_descriptor {
            let descriptor = header::read_descriptor(reader, self.header.zip64)?;
            let consumed = self
                .inflater
                .as_ref()
                .map_or(self.header.compressed_size, |inflater| inflater.total_in());
            if descriptor.compressed_size != consumed {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "entry '{}' spans {} compressed bytes, descriptor says {}",
                        self.header.name, consumed, descriptor.compressed_size
                    ),
                ));
            }
            (descriptor.crc32, descriptor.uncompressed_size)
        } else {
            (self.header.crc32, self.header.uncompressed_size)
        };

        if self.produced != expected_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "entry '{}' has {} bytes, expected {}",
                    self.header.name, self.produced, expected_size
                ),
            ));
        }
        if self.crc.sum() != expected_crc {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("entry '{}' failed its CRC check", self.header.name),
            ));
        }
        Ok(())
    }
}

fn truncated(header: &LocalHeader) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("archive ends inside entry '{}'", header.name),
    )
}
