//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::proposal::LmdbProposalStore;
use crate::LmdbError;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

pub(crate) const PROPOSALS_DB: &str = "proposals";
pub(crate) const META_DB: &str = "meta";

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    ///
    /// Creates the directory if needed, opens every database, and stamps or
    /// checks the schema version.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path
        // and never concurrently by another `Env` in the same process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let proposals_db: Database<Bytes, Bytes> =
            env.create_database(&mut wtxn, Some(PROPOSALS_DB))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some(META_DB))?;

        let stored = match meta_db.get(&wtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                u32::from_le_bytes(arr)
            }
            None => 0,
        };
        if stored > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::SchemaTooNew {
                found: stored,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        if stored < CURRENT_SCHEMA_VERSION {
            meta_db.put(
                &mut wtxn,
                SCHEMA_VERSION_KEY,
                &CURRENT_SCHEMA_VERSION.to_le_bytes(),
            )?;
            tracing::info!(
                from = stored,
                to = CURRENT_SCHEMA_VERSION,
                "stamped database schema version"
            );
        }
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            proposals_db,
            meta_db,
        })
    }

    /// The underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// A proposal store sharing this environment.
    pub fn proposal_store(&self) -> LmdbProposalStore {
        LmdbProposalStore {
            env: Arc::clone(&self.env),
            proposals_db: self.proposals_db,
        }
    }

    /// Stored schema version (0 for a database that was never stamped).
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization("schema_version has unexpected byte length".into())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_environment_is_stamped() {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("open env");
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn reopen_keeps_schema_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let _env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("open env");
        }
        let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("reopen env");
        assert_eq!(env.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().expect("temp dir");
        {
            let env = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024).expect("open env");
            let mut wtxn = env.env().write_txn().unwrap();
            env.meta_db
                .put(&mut wtxn, SCHEMA_VERSION_KEY, &99u32.to_le_bytes())
                .unwrap();
            wtxn.commit().unwrap();
        }
        let result = LmdbEnvironment::open(dir.path(), 4, 16 * 1024 * 1024);
        assert!(matches!(
            result,
            Err(LmdbError::SchemaTooNew { found: 99, .. })
        ));
    }
}
