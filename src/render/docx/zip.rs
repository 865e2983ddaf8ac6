//! Minimal ZIP container: deflated entries, fixed timestamps, no extra
//! fields. Enough for an Office Open XML package and for reading one back.

use crate::error::{Error, Result};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::{Compression, Crc};
use std::io::{Read, Write};

const LOCAL_HEADER: u32 = 0x0403_4b50;
const CENTRAL_HEADER: u32 = 0x0201_4b50;
const END_OF_CENTRAL: u32 = 0x0605_4b50;

const VERSION: u16 = 20;
const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

// 1980-01-01 00:00, the DOS epoch.
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = (1 << 5) | 1;

struct CentralRecord {
    name: String,
    crc: u32,
    compressed: u32,
    uncompressed: u32,
    offset: u32,
}

/// Writes a ZIP archive into memory.
#[derive(Default)]
pub struct ZipWriter {
    buf: Vec<u8>,
    records: Vec<CentralRecord>,
}

impl ZipWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a deflated file entry.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let mut crc = Crc::new();
        crc.update(data);

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        let record = CentralRecord {
            name: name.to_string(),
            crc: crc.sum(),
            compressed: size_u32(compressed.len())?,
            uncompressed: size_u32(data.len())?,
            offset: size_u32(self.buf.len())?,
        };

        put_u32(&mut self.buf, LOCAL_HEADER);
        put_u16(&mut self.buf, VERSION);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, METHOD_DEFLATE);
        put_u16(&mut self.buf, DOS_TIME);
        put_u16(&mut self.buf, DOS_DATE);
        put_u32(&mut self.buf, record.crc);
        put_u32(&mut self.buf, record.compressed);
        put_u32(&mut self.buf, record.uncompressed);
        put_u16(&mut self.buf, name_len(name)?);
        put_u16(&mut self.buf, 0);
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(&compressed);

        self.records.push(record);
        Ok(())
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let directory_offset = size_u32(self.buf.len())?;
        for record in &self.records {
            put_u32(&mut self.buf, CENTRAL_HEADER);
            put_u16(&mut self.buf, VERSION);
            put_u16(&mut self.buf, VERSION);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, METHOD_DEFLATE);
            put_u16(&mut self.buf, DOS_TIME);
            put_u16(&mut self.buf, DOS_DATE);
            put_u32(&mut self.buf, record.crc);
            put_u32(&mut self.buf, record.compressed);
            put_u32(&mut self.buf, record.uncompressed);
            put_u16(&mut self.buf, name_len(&record.name)?);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u16(&mut self.buf, 0);
            put_u32(&mut self.buf, 0);
            put_u32(&mut self.buf, record.offset);
            self.buf.extend_from_slice(record.name.as_bytes());
        }
        let directory_size = size_u32(self.buf.len())? - directory_offset;
        let count = u16::try_from(self.records.len())
            .map_err(|_| Error::Render("too many archive entries".into()))?;

        put_u32(&mut self.buf, END_OF_CENTRAL);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, 0);
        put_u16(&mut self.buf, count);
        put_u16(&mut self.buf, count);
        put_u32(&mut self.buf, directory_size);
        put_u32(&mut self.buf, directory_offset);
        put_u16(&mut self.buf, 0);
        Ok(self.buf)
    }
}

/// Read every file entry of an archive by walking its local headers.
pub fn read_archive(data: &[u8]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while pos + 30 <= data.len() && read_u32(data, pos) == LOCAL_HEADER {
        let flags = read_u16(data, pos + 6);
        let method = read_u16(data, pos + 8);
        let compressed = read_u32(data, pos + 18) as usize;
        let name_len = read_u16(data, pos + 26) as usize;
        let extra_len = read_u16(data, pos + 28) as usize;

        if flags & 0x0008 != 0 {
            return Err(invalid("entries with data descriptors are not supported"));
        }
        let name_start = pos + 30;
        let data_start = name_start + name_len + extra_len;
        let data_end = data_start + compressed;
        if data_end > data.len() {
            return Err(invalid("truncated entry"));
        }

        let name = String::from_utf8_lossy(&data[name_start..name_start + name_len]).into_owned();
        let raw = &data[data_start..data_end];
        let contents = match method {
            METHOD_STORED => raw.to_vec(),
            METHOD_DEFLATE => {
                let mut out = Vec::new();
                DeflateDecoder::new(raw).read_to_end(&mut out)?;
                out
            }
            other => return Err(invalid(&format!("unsupported compression method {}", other))),
        };
        entries.push((name, contents));
        pos = data_end;
    }

    if entries.is_empty() {
        return Err(invalid("no entries"));
    }
    Ok(entries)
}

fn invalid(msg: &str) -> Error {
    Error::Render(format!("Invalid archive: {}", msg))
}

fn size_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Render("archive exceeds 4 GiB".into()))
}

fn name_len(name: &str) -> Result<u16> {
    u16::try_from(name.len()).map_err(|_| Error::Render(format!("entry name too long: {}", name)))
}

fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn read_u16(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut zip = ZipWriter::new();
        zip.add_file("a.txt", b"hello hello hello").unwrap();
        zip.add_file("dir/b.xml", b"<x/>").unwrap();
        let bytes = zip.finish().unwrap();

        assert!(bytes.starts_with(b"PK\x03\x04"));
        let entries = read_archive(&bytes).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a.txt");
        assert_eq!(entries[0].1, b"hello hello hello");
        assert_eq!(entries[1].1, b"<x/>");
    }

    #[test]
    fn test_end_record_counts_entries() {
        let mut zip = ZipWriter::new();
        zip.add_file("one", b"1").unwrap();
        let bytes = zip.finish().unwrap();
        let end = bytes.len() - 22;
        assert_eq!(read_u32(&bytes, end), END_OF_CENTRAL);
        assert_eq!(read_u16(&bytes, end + 10), 1);
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut zip = ZipWriter::new();
            zip.add_file("f", b"same").unwrap();
            zip.finish().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(read_archive(b"not a zip").is_err());
    }
}
