//! Core domain: cancelable one-shot timed tasks tied to a round's lifetime.

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

/// Uniform delay in `[min, max]` seconds; collapses to `min` for an empty
/// or non-finite range, and to 0 when `min` itself is unusable.
pub fn draw_duration<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if !min.is_finite() {
        return 0.0;
    }
    if !max.is_finite() || max <= min {
        return min.max(0.0);
    }
    rng.random_range(min..=max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    timer: Timer,
    payload: T,
}

/// Pending delayed payloads. A task that is cancelled (individually or with
/// `cancel_all`) before its delay elapses is never returned from `tick`.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: Vec<ScheduledTask<T>>,
    next_handle: u64,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            next_handle: 0,
        }
    }
}

impl<T> TaskQueue<T> {
    pub fn schedule(&mut self, delay_secs: f32, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(ScheduledTask {
            handle,
            timer: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
            payload,
        });
        handle
    }

    /// Returns the payload if the task was still pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let index = self.tasks.iter().position(|t| t.handle == handle)?;
        Some(self.tasks.remove(index).payload)
    }

    /// Drop every pending task, returning their payloads for cleanup.
    pub fn cancel_all(&mut self) -> Vec<T> {
        self.tasks.drain(..).map(|t| t.payload).collect()
    }

    /// Advance all timers and return the payloads whose delay elapsed, in
    /// scheduling order.
    pub fn tick(&mut self, delta: Duration) -> Vec<T> {
        for task in &mut self.tasks {
            task.timer.tick(delta);
        }

        let mut fired = Vec::new();
        let mut index = 0;
        while index < self.tasks.len() {
            if self.tasks[index].timer.remaining_secs() == 0.0 {
                fired.push(self.tasks.remove(index).payload);
            } else {
                index += 1;
            }
        }
        fired
    }

    /// Progress of a pending task in `[0, 1]`, or `None` once it fired or
    /// was cancelled.
    pub fn fraction(&self, handle: TaskHandle) -> Option<f32> {
        self.tasks
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.timer.fraction())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
