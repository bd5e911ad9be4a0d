//! # Command store
//!
//! The latest-value cell holding the most recent operator snapshot. A producer (script, stdin, or
//! a network bridge) publishes snapshots from its own thread while the control loop reads the
//! latest one at the start of each cycle. Only the most recent snapshot is kept, there is no
//! queue.
//!
//! Every published snapshot is stamped with a sequence number so the consumer can tell a newly
//! published snapshot from one it has already seen.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::sync::{Arc, Mutex, MutexGuard};

// Internal
use comms_if::tc::TeleopCmd;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A snapshot together with its publication sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StampedCmd {
    /// Sequence number, starting at 1 and incremented on every publication
    pub seq: u64,

    pub tc: TeleopCmd,
}

/// Shared store of the latest snapshot.
#[derive(Clone, Default)]
pub struct CmdStore {
    latest: Arc<Mutex<Option<StampedCmd>>>,
}

/// The publishing end of a [`CmdStore`], handed to producer threads.
#[derive(Clone)]
pub struct CmdPublisher {
    latest: Arc<Mutex<Option<StampedCmd>>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CmdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a publisher for this store.
    pub fn publisher(&self) -> CmdPublisher {
        CmdPublisher {
            latest: self.latest.clone(),
        }
    }

    /// Get a copy of the latest snapshot, or `None` if nothing has been published yet.
    pub fn read(&self) -> Option<StampedCmd> {
        *lock(&self.latest)
    }
}

impl CmdPublisher {
    /// Replace the latest snapshot, returning the sequence number it was given.
    pub fn publish(&self, tc: TeleopCmd) -> u64 {
        let mut latest = lock(&self.latest);

        let seq = latest.map(|s| s.seq + 1).unwrap_or(1);
        *latest = Some(StampedCmd { seq, tc });

        seq
    }
}

/// Lock the cell. A producer panicking mid-publish cannot leave a torn snapshot since the
/// assignment is a single copy, so a poisoned lock is recovered.
fn lock(m: &Mutex<Option<StampedCmd>>) -> MutexGuard<'_, Option<StampedCmd>> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
