use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::record::UserRecord;
use crate::store::{RecordStore, StoreResult, checked, ensure_parent};

/// Gzip-compressed bincode snapshot of the record collection (`.bin.gz`)
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write records as a gzip-compressed bincode stream.
pub fn write_snapshot<W: Write>(records: &[UserRecord], out: W) -> StoreResult<()> {
    let encoder = GzEncoder::new(out, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, records)?;

    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?;
    Ok(())
}

/// Read records written by [`write_snapshot`].
pub fn read_snapshot<R: std::io::Read>(input: R) -> StoreResult<Vec<UserRecord>> {
    let decoder = GzDecoder::new(input);
    let mut reader = BufReader::new(decoder);

    let records: Vec<UserRecord> = deserialize_from(&mut reader)?;
    Ok(records)
}

impl RecordStore for SnapshotStore {
    fn load(&self) -> StoreResult<Option<Vec<UserRecord>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        checked(read_snapshot(file)?)
    }

    fn save(&self, records: &[UserRecord]) -> StoreResult<()> {
        ensure_parent(&self.path)?;
        let file = File::create(&self.path)?;
        write_snapshot(records, file)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
