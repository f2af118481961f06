// SPDX-License-Identifier: MPL-2.0
//! Bounded background decoding for gallery browsing.
//!
//! Decoding a full-resolution photo takes long enough to stall paging, so
//! gallery images are decoded off-thread as the user approaches them. The
//! pool enforces two limits:
//!
//! - at most [`MAX_CONCURRENT_DECODES`] decodes run at the same time;
//!   further requests wait on the internal semaphore
//! - requests are keyed by gallery index, and [`DecodePool::focus`]
//!   cancels work outside a window of [`DECODE_WINDOW_RADIUS`] indices
//!   around the viewed item, evicting any cached result with it
//!
//! Cancellation is best-effort: a decode that already entered the blocking
//! section runs to completion but its result is discarded, and its permit
//! is held until the blocking work actually finishes.

use crate::error::Result;
use crate::media::ImageData;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Maximum number of decode tasks allowed to run simultaneously.
pub const MAX_CONCURRENT_DECODES: usize = 5;

/// Requests further than this many indices from the viewed item are
/// cancelled when the focus moves.
pub const DECODE_WINDOW_RADIUS: usize = 10;

/// Number of decoded images kept in the result cache.
const RESULT_CACHE_CAPACITY: usize = 32;

/// Decode function injected into the pool.
///
/// Production uses [`crate::media::load_image`]; tests substitute
/// instrumented loaders.
pub type Loader = Arc<dyn Fn(PathBuf) -> Result<ImageData> + Send + Sync>;

/// Counters describing pool activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeStats {
    pub started: u64,
    pub completed: u64,
    pub failed: u64,
    pub cancelled: u64,
    /// Highest number of decodes observed running at once.
    pub peak_in_flight: usize,
}

struct Shared {
    limiter: Arc<Semaphore>,
    tasks: Mutex<HashMap<usize, JoinHandle<()>>>,
    results: Mutex<LruCache<usize, ImageData>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    started: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    cancelled: AtomicUsize,
}

impl Shared {
    fn enter_decode(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave_decode(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Background decode pool keyed by gallery index.
pub struct DecodePool {
    shared: Arc<Shared>,
    loader: Loader,
}

impl DecodePool {
    /// Creates a pool decoding through [`crate::media::load_image`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader(Arc::new(|path: PathBuf| crate::media::load_image(&path)))
    }

    /// Creates a pool with an injected decode function.
    #[must_use]
    pub fn with_loader(loader: Loader) -> Self {
        let capacity =
            NonZeroUsize::new(RESULT_CACHE_CAPACITY).expect("cache capacity must be non-zero");

        Self {
            shared: Arc::new(Shared {
                limiter: Arc::new(Semaphore::new(MAX_CONCURRENT_DECODES)),
                tasks: Mutex::new(HashMap::new()),
                results: Mutex::new(LruCache::new(capacity)),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
                started: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                failed: AtomicUsize::new(0),
                cancelled: AtomicUsize::new(0),
            }),
            loader,
        }
    }

    /// Requests a background decode for the given gallery index.
    ///
    /// Returns `false` without spawning when the index is already cached
    /// or already in flight. Must be called from within a Tokio runtime.
    pub fn request(&self, index: usize, path: PathBuf) -> bool {
        if self.shared.results.lock().unwrap().contains(&index) {
            return false;
        }

        let mut tasks = self.shared.tasks.lock().unwrap();
        tasks.retain(|_, handle| !handle.is_finished());
        if tasks.contains_key(&index) {
            return false;
        }

        self.shared.started.fetch_add(1, Ordering::SeqCst);

        let shared = Arc::clone(&self.shared);
        let loader = Arc::clone(&self.loader);
        let handle = tokio::spawn(async move {
            let Ok(permit) = Arc::clone(&shared.limiter).acquire_owned().await else {
                return;
            };

            // The permit and the in-flight counter travel into the
            // blocking section: aborting this task must not free a slot
            // while the decode itself is still running.
            let blocking_shared = Arc::clone(&shared);
            let result = tokio::task::spawn_blocking(move || {
                blocking_shared.enter_decode();
                let result = loader(path);
                blocking_shared.leave_decode();
                drop(permit);
                result
            })
            .await;

            match result {
                Ok(Ok(image)) => {
                    shared.results.lock().unwrap().put(index, image);
                    shared.completed.fetch_add(1, Ordering::SeqCst);
                }
                Ok(Err(error)) => {
                    shared.failed.fetch_add(1, Ordering::SeqCst);
                    eprintln!("gallery decode failed for index {index}: {error}");
                }
                Err(join_error) => {
                    shared.failed.fetch_add(1, Ordering::SeqCst);
                    eprintln!("gallery decode task failed for index {index}: {join_error}");
                }
            }

            shared.tasks.lock().unwrap().remove(&index);
        });

        tasks.insert(index, handle);
        true
    }

    /// Moves the viewing window to `center`.
    ///
    /// In-flight decodes outside the window are aborted and any cached
    /// result for an out-of-window index is evicted alongside them.
    pub fn focus(&self, center: usize) {
        let in_window = |index: usize| index.abs_diff(center) <= DECODE_WINDOW_RADIUS;

        let mut tasks = self.shared.tasks.lock().unwrap();
        let outside: Vec<usize> = tasks
            .keys()
            .copied()
            .filter(|index| !in_window(*index))
            .collect();
        for index in outside {
            if let Some(handle) = tasks.remove(&index) {
                handle.abort();
                self.shared.cancelled.fetch_add(1, Ordering::SeqCst);
            }
        }
        drop(tasks);

        let mut results = self.shared.results.lock().unwrap();
        let evict: Vec<usize> = results
            .iter()
            .map(|(index, _)| *index)
            .filter(|index| !in_window(*index))
            .collect();
        for index in evict {
            results.pop(&index);
        }
    }

    /// Returns the decoded image for an index, if cached.
    ///
    /// Updates LRU order on access.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ImageData> {
        self.shared.results.lock().unwrap().get(&index).cloned()
    }

    /// Checks whether an index is cached without touching LRU order.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.shared.results.lock().unwrap().contains(&index)
    }

    /// Returns true while any decode task is queued or running.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        let mut tasks = self.shared.tasks.lock().unwrap();
        tasks.retain(|_, handle| !handle.is_finished());
        !tasks.is_empty()
    }

    /// Returns the current pool counters.
    #[must_use]
    pub fn stats(&self) -> DecodeStats {
        DecodeStats {
            started: self.shared.started.load(Ordering::SeqCst) as u64,
            completed: self.shared.completed.load(Ordering::SeqCst) as u64,
            failed: self.shared.failed.load(Ordering::SeqCst) as u64,
            cancelled: self.shared.cancelled.load(Ordering::SeqCst) as u64,
            peak_in_flight: self.shared.peak_in_flight.load(Ordering::SeqCst),
        }
    }

    /// Drops every cached result and aborts all in-flight work.
    pub fn clear(&self) {
        let mut tasks = self.shared.tasks.lock().unwrap();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
        drop(tasks);
        self.shared.results.lock().unwrap().clear();
    }
}

impl Default for DecodePool {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DecodePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodePool")
            .field("pending", &self.shared.tasks.lock().unwrap().len())
            .field("cached", &self.shared.results.lock().unwrap().len())
            .field("stats", &self.stats())
            .finish()
    }
}
