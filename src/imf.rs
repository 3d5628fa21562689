//! IMF register logs: sequences of OPL register writes with tick delays.

#[cfg(test)]
#[path = "./imf_test.rs"]
mod imf_test;

use std::fs;
use std::path::Path;

use crate::chip::Chip;
use crate::error::Error;

/// Tick rate of most IMF logs.
pub const IMF_CLOCK_RATE: u32 = 560;
/// Tick rate of the Wolfenstein 3D music.
pub const IMF_CLOCK_RATE_W3D: u32 = 700;

const RECORD_LEN: usize = 4;

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum ImfFormat {
    /// Type 0: the whole buffer is records.
    Raw,
    /// Type 1: a little endian u16 byte length precedes the records.
    Chunk,
}

/// One register write, followed by `delay` ticks of waiting.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct ImfRecord {
    pub register: u8,
    pub value: u8,
    pub delay: u16,
}

struct DataReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl DataReader<'_> {
    fn new(data: &[u8]) -> DataReader<'_> {
        DataReader { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn read_u8(&mut self) -> Option<u8> {
        let u = *self.data.get(self.offset)?;
        self.offset += 1;
        Some(u)
    }

    fn read_u16(&mut self) -> Option<u16> {
        let bytes = self.data.get(self.offset..(self.offset + 2))?;
        self.offset += 2;
        Some(u16::from_le_bytes([bytes[0], bytes[1]]))
    }
}

pub fn parse(data: &[u8], format: ImfFormat) -> Result<Vec<ImfRecord>, Error> {
    let mut reader = DataReader::new(data);
    let len = match format {
        ImfFormat::Raw => data.len(),
        ImfFormat::Chunk => {
            let declared = reader.read_u16().ok_or(Error::TruncatedRecord { offset: 0 })? as usize;
            if declared > reader.remaining() {
                return Err(Error::LengthMismatch {
                    declared,
                    available: reader.remaining(),
                });
            }
            reader.offset + declared
        }
    };

    let mut records = Vec::with_capacity((len - reader.offset) / RECORD_LEN);
    while reader.offset < len {
        let offset = reader.offset;
        if len - offset < RECORD_LEN {
            return Err(Error::TruncatedRecord { offset });
        }
        let register = reader.read_u8().ok_or(Error::TruncatedRecord { offset })?;
        let value = reader.read_u8().ok_or(Error::TruncatedRecord { offset })?;
        let delay = reader.read_u16().ok_or(Error::TruncatedRecord { offset })?;
        records.push(ImfRecord {
            register,
            value,
            delay,
        });
    }
    log::debug!("parsed {} IMF records", records.len());
    Ok(records)
}

/// Reads and parses an IMF file.
pub fn load(path: &Path, format: ImfFormat) -> Result<Vec<ImfRecord>, Error> {
    let data = fs::read(path)?;
    parse(&data, format)
}

/// Replays IMF records into a chip, one tick at a time.
pub struct ImfPlayer {
    records: Vec<ImfRecord>,
    ptr: usize,
    wait_until: u32,
    time_count: u32,
}

impl ImfPlayer {
    pub fn new(records: Vec<ImfRecord>) -> ImfPlayer {
        ImfPlayer {
            records,
            ptr: 0,
            wait_until: 0,
            time_count: 0,
        }
    }

    /// Applies all writes due at the current tick and advances time by one
    /// tick. Returns `false` once every record has been written.
    pub fn tick(&mut self, chip: &mut Chip) -> bool {
        while self.ptr < self.records.len() && self.wait_until <= self.time_count {
            let record = self.records[self.ptr];
            chip.write_reg(record.register as u16, record.value);
            self.wait_until = self.time_count + record.delay as u32;
            self.ptr += 1;
        }
        self.time_count += 1;
        !self.finished()
    }

    pub fn finished(&self) -> bool {
        self.ptr >= self.records.len()
    }

    /// Ticks elapsed since the start.
    pub fn time(&self) -> u32 {
        self.time_count
    }

    /// Index of the next record to write.
    pub fn position(&self) -> usize {
        self.ptr
    }

    pub fn records(&self) -> &[ImfRecord] {
        &self.records
    }

    pub fn rewind(&mut self) {
        self.ptr = 0;
        self.wait_until = 0;
        self.time_count = 0;
    }
}
