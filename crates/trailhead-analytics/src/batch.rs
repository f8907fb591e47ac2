// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event batching, timed flushes and re-queue on failure.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};
use trailhead_analytics_core::QueuedEvent;

use crate::beacon::Beacon;
use crate::error::{AnalyticsError, Result};

/// Configuration for the event batch queue.
#[derive(Debug, Clone)]
pub struct BatchConfig {
	/// Queue length that triggers an immediate flush.
	pub max_batch_size: usize,
	/// Delay between the first queued event and the timed flush.
	pub flush_interval: Duration,
	/// Maximum number of events retained; the oldest are dropped beyond it.
	pub max_queue_size: usize,
}

impl Default for BatchConfig {
	fn default() -> Self {
		Self {
			max_batch_size: 10,
			flush_interval: Duration::from_millis(5000),
			max_queue_size: 1000,
		}
	}
}

/// Delivers one batch to the server.
#[async_trait::async_trait]
pub trait BatchSender: Send + Sync {
	async fn send_batch(&self, events: &[QueuedEvent]) -> Result<()>;
}

struct ArmedTimer {
	generation: u64,
	handle: AbortHandle,
}

#[derive(Default)]
struct State {
	queue: VecDeque<QueuedEvent>,
	timer: Option<ArmedTimer>,
	next_generation: u64,
}

impl State {
	fn clear_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			timer.handle.abort();
		}
	}

	fn take_snapshot(&mut self) -> Vec<QueuedEvent> {
		self.clear_timer();
		self.queue.drain(..).collect()
	}
}

/// Buffers events and flushes them in batches.
///
/// A flush happens when the queue reaches `max_batch_size`, when the one-shot
/// timer armed by the first queued event fires, or on an explicit
/// [`flush`](Self::flush). Every flush takes the whole queue as one snapshot
/// and cancels the timer. If delivery fails the snapshot goes back to the
/// front of the queue, ahead of anything queued meanwhile.
///
/// Queue and timer share one lock that is never held across an await.
pub struct BatchProcessor {
	config: BatchConfig,
	sender: Arc<dyn BatchSender>,
	beacon: Arc<dyn Beacon>,
	state: Mutex<State>,
	shutdown: AtomicBool,
}

impl BatchProcessor {
	pub fn new(config: BatchConfig, sender: Arc<dyn BatchSender>, beacon: Arc<dyn Beacon>) -> Self {
		debug!(
			max_batch_size = config.max_batch_size,
			flush_interval_ms = config.flush_interval.as_millis() as u64,
			max_queue_size = config.max_queue_size,
			"Created analytics batch processor"
		);
		Self {
			config,
			sender,
			beacon,
			state: Mutex::new(State::default()),
			shutdown: AtomicBool::new(false),
		}
	}

	pub fn config(&self) -> &BatchConfig {
		&self.config
	}

	/// Queues an event, scheduling or triggering a flush as needed.
	///
	/// Failures of a size-triggered flush are logged and re-queued, never
	/// returned here.
	pub fn enqueue(self: &Arc<Self>, event: QueuedEvent) -> Result<()> {
		if self.is_shutdown() {
			return Err(AnalyticsError::ClientShutdown);
		}
		let runtime = Handle::try_current().map_err(|_| AnalyticsError::RuntimeUnavailable)?;

		let snapshot = {
			let mut state = self.state.lock();
			state.queue.push_back(event);
			self.enforce_capacity(&mut state.queue);

			if state.queue.len() >= self.config.max_batch_size {
				Some(state.take_snapshot())
			} else {
				if state.timer.is_none() {
					self.arm_timer(&mut state, &runtime);
				}
				None
			}
		};

		if let Some(snapshot) = snapshot {
			debug!(count = snapshot.len(), "Batch size reached, flushing");
			let this = Arc::clone(self);
			runtime.spawn(async move {
				if let Err(e) = this.deliver(snapshot).await {
					error!(error = %e, "Failed to flush analytics batch");
				}
			});
		}

		Ok(())
	}

	/// Sends everything queued as one batch.
	///
	/// An empty queue is a no-op. On failure the events are back in the queue
	/// and the error is returned.
	pub async fn flush(self: &Arc<Self>) -> Result<()> {
		let snapshot = self.state.lock().take_snapshot();
		if snapshot.is_empty() {
			return Ok(());
		}
		self.deliver(snapshot).await
	}

	/// Stops accepting events and hands whatever is queued to the beacon.
	///
	/// Only the first call does anything.
	pub fn destroy(&self) {
		if self.shutdown.swap(true, Ordering::SeqCst) {
			return;
		}

		let events = self.state.lock().take_snapshot();
		if events.is_empty() {
			info!("Analytics batch processor stopped");
			return;
		}

		let count = events.len();
		if self.beacon.send(&events) {
			info!(count, "Analytics batch processor stopped, pending events sent by beacon");
		} else {
			warn!(count, "Analytics batch processor stopped, pending events lost");
		}
	}

	pub fn is_shutdown(&self) -> bool {
		self.shutdown.load(Ordering::SeqCst)
	}

	/// Returns the number of events currently queued.
	pub fn queue_len(&self) -> usize {
		self.state.lock().queue.len()
	}

	/// Returns true if a timed flush is scheduled.
	pub fn timer_armed(&self) -> bool {
		self.state.lock().timer.is_some()
	}

	async fn deliver(self: &Arc<Self>, snapshot: Vec<QueuedEvent>) -> Result<()> {
		debug!(count = snapshot.len(), "Flushing event batch");
		let result = self.sender.send_batch(&snapshot).await;
		if result.is_err() {
			self.requeue(snapshot);
		}
		result
	}

	fn requeue(self: &Arc<Self>, snapshot: Vec<QueuedEvent>) {
		let mut state = self.state.lock();
		let count = snapshot.len();
		for event in snapshot.into_iter().rev() {
			state.queue.push_front(event);
		}
		self.enforce_capacity(&mut state.queue);
		warn!(count, queued = state.queue.len(), "Batch delivery failed, events re-queued");

		if !state.queue.is_empty() && state.timer.is_none() && !self.is_shutdown() {
			if let Ok(runtime) = Handle::try_current() {
				self.arm_timer(&mut state, &runtime);
			}
		}
	}

	fn enforce_capacity(&self, queue: &mut VecDeque<QueuedEvent>) {
		while queue.len() > self.config.max_queue_size {
			if let Some(dropped) = queue.pop_front() {
				warn!(
					event_type = %dropped.event_type,
					"Dropped event due to queue overflow"
				);
			}
		}
	}

	fn arm_timer(self: &Arc<Self>, state: &mut State, runtime: &Handle) {
		let generation = state.next_generation;
		state.next_generation += 1;

		let processor: Weak<Self> = Arc::downgrade(self);
		let delay = self.config.flush_interval;
		let task = runtime.spawn(async move {
			tokio::time::sleep(delay).await;
			if let Some(processor) = processor.upgrade() {
				processor.on_timer(generation).await;
			}
		});

		state.timer = Some(ArmedTimer {
			generation,
			handle: task.abort_handle(),
		});
	}

	async fn on_timer(self: &Arc<Self>, generation: u64) {
		let snapshot = {
			let mut state = self.state.lock();
			match &state.timer {
				Some(timer) if timer.generation == generation => {}
				_ => return,
			}
			// Released without aborting: this task is the timer.
			state.timer = None;
			state.queue.drain(..).collect::<Vec<_>>()
		};

		if snapshot.is_empty() {
			return;
		}
		debug!(count = snapshot.len(), "Flush interval elapsed");
		if let Err(e) = self.deliver(snapshot).await {
			error!(error = %e, "Failed to flush analytics batch");
		}
	}
}
