// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Record store: in-memory collections with an optional JSON snapshot.

pub mod snapshot;
pub mod store;

pub use snapshot::{Snapshot, SnapshotFile};
pub use store::{RecordFilter, StudyDb};

/// Field limits enforced by the store.
pub mod limits {
    /// Maximum length of a study category or name, in characters.
    pub const MAX_LABEL_LEN: usize = 100;
}
