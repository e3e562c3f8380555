use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-user limits on workflow starts: at most `parallelism` pipelines in
/// flight and at most `rate` starts inside a sliding `period` window.
pub struct FlowControl {
    parallelism: usize,
    rate: u32,
    period: Duration,
    users: DashMap<String, UserFlow>,
}

struct UserFlow {
    active: Arc<AtomicUsize>,
    starts: VecDeque<Instant>,
}

/// Held for the lifetime of a pipeline; dropping it releases the
/// concurrency slot.
pub struct FlowPermit {
    active: Arc<AtomicUsize>,
}

impl Drop for FlowPermit {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FlowControl {
    pub fn new(parallelism: usize, rate: u32, period: Duration) -> Self {
        Self {
            parallelism,
            rate,
            period,
            users: DashMap::new(),
        }
    }

    /// `None` when the user is over either limit.
    pub fn try_start(&self, user_id: &str) -> Option<FlowPermit> {
        let now = Instant::now();

        // drop users with nothing in flight and no starts left in the
        // window, so the map does not grow with every anonymous visitor
        self.users.retain(|_, flow| {
            Self::prune_window(&mut flow.starts, now, self.period);
            flow.active.load(Ordering::SeqCst) > 0 || !flow.starts.is_empty()
        });

        let mut entry = self
            .users
            .entry(user_id.to_string())
            .or_insert_with(|| UserFlow {
                active: Arc::new(AtomicUsize::new(0)),
                starts: VecDeque::new(),
            });

        Self::prune_window(&mut entry.starts, now, self.period);

        if entry.active.load(Ordering::SeqCst) >= self.parallelism {
            return None;
        }
        if entry.starts.len() as u32 >= self.rate {
            return None;
        }

        entry.starts.push_back(now);
        entry.active.fetch_add(1, Ordering::SeqCst);
        Some(FlowPermit {
            active: Arc::clone(&entry.active),
        })
    }

    fn prune_window(starts: &mut VecDeque<Instant>, now: Instant, period: Duration) {
        while starts
            .front()
            .is_some_and(|t| now.duration_since(*t) >= period)
        {
            starts.pop_front();
        }
    }
}
