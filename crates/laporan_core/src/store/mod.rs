//! Persisted stores over snapshot storage.
//!
//! # Responsibility
//! - Own the in-memory state of the three record collections.
//! - Hydrate from the injected adapter once, write through on every mutation.
//!
//! # Invariants
//! - A mutation either fully applies (state + snapshot) or leaves the store
//!   unchanged; new state is persisted before it is committed in memory.
//! - Mutations addressing a missing identifier surface `NotFound` instead of
//!   silently no-opping; the persisted state is untouched either way.

use crate::model::ketua_tim::KetuaTimId;
use crate::model::laporan::{DetailId, LaporanId};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod identitas_store;
pub mod ketua_tim_store;
pub mod laporan_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by store hydration or mutation.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying snapshot adapter failed.
    Storage(StorageError),
    /// A persisted snapshot exists but cannot be decoded.
    Corrupt {
        snapshot: &'static str,
        message: String,
    },
    KetuaTimNotFound(KetuaTimId),
    LaporanNotFound(LaporanId),
    DetailNotFound {
        laporan_id: LaporanId,
        detail_id: DetailId,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Corrupt { snapshot, message } => {
                write!(f, "corrupt snapshot `{snapshot}`: {message}")
            }
            Self::KetuaTimNotFound(id) => write!(f, "ketua tim not found: {id}"),
            Self::LaporanNotFound(id) => write!(f, "laporan not found: {id}"),
            Self::DetailNotFound {
                laporan_id,
                detail_id,
            } => write!(f, "detail {detail_id} not found in laporan {laporan_id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Wall-clock stamp used for `modified_at`, in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

pub(crate) fn decode_snapshot<T: serde::de::DeserializeOwned>(
    snapshot: &'static str,
    body: &str,
) -> StoreResult<T> {
    serde_json::from_str(body).map_err(|err| StoreError::Corrupt {
        snapshot,
        message: err.to_string(),
    })
}

pub(crate) fn encode_snapshot<T: serde::Serialize>(
    snapshot: &'static str,
    value: &T,
) -> StoreResult<String> {
    serde_json::to_string(value).map_err(|err| StoreError::Corrupt {
        snapshot,
        message: err.to_string(),
    })
}
