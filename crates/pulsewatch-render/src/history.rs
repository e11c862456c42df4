//! Fixed-capacity, FIFO-evicting sample history.

use std::collections::VecDeque;

use pulse_core::ConfigError;

/// One chart sample.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    /// Local time of day, `HH:MM:SS`.
    pub label: String,
    pub cpu: f64,
    pub memory: f64,
    pub load: f64,
}

/// Ordered, oldest first. Never holds more than `capacity` points.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl RollingHistory {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a sample, evicting the oldest one first when full.
    pub fn push(&mut self, point: HistoryPoint) {
        if self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&HistoryPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }
}
