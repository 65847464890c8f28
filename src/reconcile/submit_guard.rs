//! In-flight tracking for overtime submissions.
//!
//! Each actor may have one submission outstanding per (user, date). Two
//! different actors editing the same record are not blocked here; the
//! reconciler lets the later write win.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

/// (actor, user, date)
type Key = (String, String, NaiveDate);

/// Tracks which (actor, user, date) triples have a submission outstanding.
#[derive(Debug, Clone, Default)]
pub struct SubmissionTracker {
    in_flight: Arc<Mutex<HashSet<Key>>>,
}

impl SubmissionTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `actor_id`'s submission for `user_id` on `date` as started.
    ///
    /// Fails with [`EngineError::SubmissionInProgress`] if the same actor
    /// already has one outstanding. The slot is released when the returned
    /// permit drops.
    pub fn begin(
        &self,
        actor_id: &str,
        user_id: &str,
        date: NaiveDate,
    ) -> EngineResult<SubmissionPermit> {
        let key = (actor_id.to_string(), user_id.to_string(), date);
        if !self.lock().insert(key.clone()) {
            return Err(EngineError::SubmissionInProgress {
                user_id: user_id.to_string(),
                date,
            });
        }
        Ok(SubmissionPermit {
            in_flight: Arc::clone(&self.in_flight),
            key,
        })
    }

    /// Returns true if `actor_id` has a submission for the pair outstanding.
    pub fn is_in_flight(&self, actor_id: &str, user_id: &str, date: NaiveDate) -> bool {
        self.lock()
            .contains(&(actor_id.to_string(), user_id.to_string(), date))
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<Key>> {
        lock_ignoring_poison(&self.in_flight)
    }
}

fn lock_ignoring_poison(set: &Mutex<HashSet<Key>>) -> MutexGuard<'_, HashSet<Key>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Held for the duration of one submission.
#[derive(Debug)]
pub struct SubmissionPermit {
    in_flight: Arc<Mutex<HashSet<Key>>>,
    key: Key,
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        lock_ignoring_poison(&self.in_flight).remove(&self.key);
    }
}
