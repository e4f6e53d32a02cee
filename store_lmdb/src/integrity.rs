//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the daemon starts
//! serving requests.

use std::path::Path;
use std::sync::Arc;

use heed::Env;

use agora_types::ProposalId;

use crate::environment::{META_DB, PROPOSALS_DB};
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that we expect to exist in a valid Agora environment.
const EXPECTED_DATABASES: &[&str] = &[PROPOSALS_DB, META_DB];

/// Check LMDB database integrity on startup.
///
/// Opens each expected database and counts entries. Proposal keys must
/// decode as ids. Read failures are recorded in the report rather than
/// causing a hard error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                let iter = match db.iter(&rtxn) {
                    Ok(iter) => iter,
                    Err(e) => {
                        report
                            .errors
                            .push(format!("failed to read database '{}': {}", db_name, e));
                        continue;
                    }
                };
                for entry in iter {
                    match entry {
                        Ok((key, _)) => {
                            report.total_entries += 1;
                            if db_name == PROPOSALS_DB && ProposalId::from_key(key).is_err() {
                                report.errors.push(format!(
                                    "malformed proposal key of {} bytes",
                                    key.len()
                                ));
                            }
                        }
                        Err(e) => {
                            report
                                .errors
                                .push(format!("failed to read database '{}': {}", db_name, e));
                            break;
                        }
                    }
                }
            }
            Ok(None) => {
                // Database doesn't exist yet; acceptable for a fresh data dir
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{}': {}", db_name, e));
            }
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a fresh (nonexistent) directory. Returns an error
/// if the directory exists but `data.mdb` is missing, which suggests
/// corruption or misconfiguration.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
