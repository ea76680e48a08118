// Copyright 2024 mempool-core developers.
// This file is part of mempool-core.

// mempool-core is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// mempool-core is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with mempool-core.  If not, see <http://www.gnu.org/licenses/>.

//! Optional line-delimited journal of raw local-queued transaction bytes.
//!
//! The mempool itself is in-memory and not persisted across restarts; this
//! journal is the one deliberate exception, so a node does not have to
//! ask a user to re-submit their own locally-originated queued
//! transactions after a restart. Each line is the hex encoding of one raw
//! transaction; `replay` feeds them back through a caller-supplied
//! `local=true` insertion closure in file order.

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;

/// An append-only local-transaction journal.
pub struct Journal {
    path: PathBuf,
    writer: Mutex<Option<File>>,
    disabled: bool,
}

impl Journal {
    /// Opens (creating if necessary) the journal file at `path`. When
    /// `disabled`, every operation is a silent no-op, matching
    /// `CoordinatorConfig::journal_disabled`.
    pub fn open(path: impl Into<PathBuf>, disabled: bool) -> io::Result<Self> {
        let path = path.into();
        let writer = if disabled {
            None
        } else {
            Some(OpenOptions::new().create(true).append(true).open(&path)?)
        };
        Ok(Journal { path, writer: Mutex::new(writer), disabled })
    }

    /// Appends one raw transaction to the journal.
    pub fn append(&self, raw_tx: &[u8]) -> io::Result<()> {
        if self.disabled {
            return Ok(());
        }
        let mut guard = self.writer.lock();
        let file = guard.get_or_insert_with(|| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .expect("journal file must be openable after a successful Journal::open")
        });
        writeln!(file, "{}", hex_encode(raw_tx))?;
        file.flush()
    }

    /// Replays every journaled transaction, in file order, through
    /// `insert_local`. Malformed lines are logged at `warn` and skipped;
    /// replay is best-effort and never fails the caller's startup.
    pub fn replay(&self, path: impl AsRef<Path>, mut insert_local: impl FnMut(Vec<u8>)) -> io::Result<usize> {
        if self.disabled {
            return Ok(0);
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err),
        };
        let mut replayed = 0;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            match hex_decode(&line) {
                Ok(bytes) => {
                    insert_local(bytes);
                    replayed += 1;
                }
                Err(()) => log::warn!(target: "mempool", "journal: skipping malformed line"),
            }
        }
        Ok(replayed)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, ()> {
    if s.len() % 2 != 0 {
        return Err(());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_append_and_replay() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mempool-core-journal-test-{:?}", std::thread::current().id()));
        let _ = std::fs::remove_file(&path);

        let journal = Journal::open(&path, false).unwrap();
        journal.append(&[0xde, 0xad, 0xbe, 0xef]).unwrap();
        journal.append(&[0x01]).unwrap();

        let mut replayed = Vec::new();
        let count = journal.replay(&path, |bytes| replayed.push(bytes)).unwrap();

        assert_eq!(count, 2);
        assert_eq!(replayed, vec![vec![0xde, 0xad, 0xbe, 0xef], vec![0x01]]);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn disabled_journal_is_a_no_op() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("mempool-core-journal-disabled-test-{:?}", std::thread::current().id()));
        let _ = std::fs::remove_file(&path);

        let journal = Journal::open(&path, true).unwrap();
        journal.append(&[1, 2, 3]).unwrap();
        assert!(!path.exists());
    }
}
