//! Per-pointer position and velocity bookkeeping.
//!
//! Each handler owns a [`PointerTracker`]. The tracker is pure bookkeeping:
//! it never makes policy decisions, it only answers questions about the
//! pointers it has been told about.
//!
//! Platform pointer ids may be recycled between physical touches, so the
//! tracker assigns its own stable mapped [`TouchId`] per touch through a
//! [`TouchIdMap`], a bounded insertion-ordered cache whose eviction policy
//! (oldest inserted first) is an explicit, testable property.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use horizon_gesture_core::diagnostics::targets;
use horizon_gesture_core::{Point, PointerId, TouchId};

/// Capacity of the pointer-id → touch-id cache.
///
/// More simultaneous unreleased pointers than this forces eviction of the
/// oldest mapping; ten is far beyond what touch hardware reports.
pub const TOUCH_ID_CAPACITY: usize = 10;

/// Last known data for a single tracked pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPointer {
    /// Current position in window coordinates.
    pub last: Point,
    /// Position at pointer-down.
    pub start: Point,
    /// Velocity in window units per second.
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Timestamp of the most recent update, in nanoseconds.
    pub timestamp_nanos: u64,
}

/// Bounded map from raw platform pointer ids to stable mapped touch ids.
///
/// Ids are assigned on first sight (the lowest integer not currently in
/// use) and reused for the lifetime of the physical touch. When the map is
/// at capacity, the oldest-inserted mapping is evicted.
#[derive(Debug)]
pub struct TouchIdMap {
    capacity: usize,
    /// (pointer id, mapped id), oldest insertion first.
    entries: VecDeque<(PointerId, TouchId)>,
}

impl TouchIdMap {
    /// Create a map with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    /// The mapped id for a pointer, if one is assigned.
    pub fn get(&self, pointer_id: PointerId) -> Option<TouchId> {
        self.entries
            .iter()
            .find(|(pid, _)| *pid == pointer_id)
            .map(|(_, tid)| *tid)
    }

    /// Assign (or return the existing) mapped id for a pointer.
    pub fn assign(&mut self, pointer_id: PointerId) -> TouchId {
        if let Some(existing) = self.get(pointer_id) {
            return existing;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        let id = self.lowest_free_id();
        self.entries.push_back((pointer_id, id));
        id
    }

    /// Release a pointer's mapping, freeing its touch id for reuse.
    pub fn release(&mut self, pointer_id: PointerId) {
        self.entries.retain(|(pid, _)| *pid != pointer_id);
    }

    /// Drop every mapping.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no mappings are live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lowest_free_id(&self) -> TouchId {
        let mut candidate = 0;
        while self.entries.iter().any(|(_, tid)| *tid == candidate) {
            candidate += 1;
        }
        candidate
    }
}

impl Default for TouchIdMap {
    fn default() -> Self {
        Self::new(TOUCH_ID_CAPACITY)
    }
}

/// Tracks the pointers currently delivering events to one handler.
#[derive(Debug, Default)]
pub struct PointerTracker {
    /// Tracked pointers, ordered by pointer id for deterministic iteration.
    pointers: BTreeMap<PointerId, TrackedPointer>,
    ids: TouchIdMap,
    /// The pointer most recently added or moved.
    last_updated: Option<PointerId>,
}

impl PointerTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a pointer at its down position.
    ///
    /// Re-adding a pointer that is already tracked is a no-op apart from
    /// refreshing the last-updated marker.
    pub fn add(&mut self, pointer_id: PointerId, position: Point, timestamp_nanos: u64) {
        self.last_updated = Some(pointer_id);
        if self.pointers.contains_key(&pointer_id) {
            return;
        }
        self.ids.assign(pointer_id);
        self.pointers.insert(
            pointer_id,
            TrackedPointer {
                last: position,
                start: position,
                velocity_x: 0.0,
                velocity_y: 0.0,
                timestamp_nanos,
            },
        );
    }

    /// Update a tracked pointer's position, deriving velocity from the time
    /// delta since the previous update.
    ///
    /// Updates for pointers this tracker never saw are ignored; correct
    /// upstream routing makes that unreachable.
    pub fn track_move(&mut self, pointer_id: PointerId, position: Point, timestamp_nanos: u64) {
        let Some(entry) = self.pointers.get_mut(&pointer_id) else {
            tracing::warn!(
                target: targets::TRACKER,
                pointer_id,
                "move for untracked pointer ignored"
            );
            return;
        };
        let dt_nanos = timestamp_nanos.saturating_sub(entry.timestamp_nanos);
        if dt_nanos > 0 {
            let dt_secs = dt_nanos as f32 / 1_000_000_000.0;
            entry.velocity_x = (position.x - entry.last.x) / dt_secs;
            entry.velocity_y = (position.y - entry.last.y) / dt_secs;
        }
        entry.last = position;
        entry.timestamp_nanos = timestamp_nanos;
        self.last_updated = Some(pointer_id);
    }

    /// Stop tracking a pointer, releasing its mapped touch id.
    pub fn remove(&mut self, pointer_id: PointerId) {
        self.pointers.remove(&pointer_id);
        self.ids.release(pointer_id);
        if self.last_updated == Some(pointer_id) {
            self.last_updated = self.pointers.keys().next_back().copied();
        }
    }

    /// Drop all tracked pointers and mappings.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.ids.clear();
        self.last_updated = None;
    }

    /// Number of tracked pointers.
    pub fn count(&self) -> usize {
        self.pointers.len()
    }

    /// Whether no pointers are tracked.
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// Whether a pointer is currently tracked.
    pub fn has(&self, pointer_id: PointerId) -> bool {
        self.pointers.contains_key(&pointer_id)
    }

    /// Ids of the tracked pointers, ascending.
    pub fn tracked_ids(&self) -> Vec<PointerId> {
        self.pointers.keys().copied().collect()
    }

    /// Iterate tracked pointers in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PointerId, &TrackedPointer)> {
        self.pointers.iter().map(|(id, entry)| (*id, entry))
    }

    /// The stable mapped touch id for a pointer.
    pub fn mapped_touch_id(&self, pointer_id: PointerId) -> Option<TouchId> {
        let id = self.ids.get(pointer_id);
        if id.is_none() {
            tracing::warn!(
                target: targets::TRACKER,
                pointer_id,
                "no mapped touch id for pointer"
            );
        }
        id
    }

    /// Position of the most recently updated pointer.
    pub fn last_position(&self) -> Option<Point> {
        self.last_updated
            .and_then(|id| self.pointers.get(&id))
            .map(|entry| entry.last)
    }

    /// Current position of a specific pointer.
    pub fn position_of(&self, pointer_id: PointerId) -> Option<Point> {
        self.pointers.get(&pointer_id).map(|entry| entry.last)
    }

    /// Down position of a specific pointer.
    pub fn start_position_of(&self, pointer_id: PointerId) -> Option<Point> {
        self.pointers.get(&pointer_id).map(|entry| entry.start)
    }

    /// Velocity of a specific pointer in window units per second.
    pub fn velocity_of(&self, pointer_id: PointerId) -> Option<(f32, f32)> {
        self.pointers
            .get(&pointer_id)
            .map(|entry| (entry.velocity_x, entry.velocity_y))
    }

    /// Centroid of the current pointer positions, or the origin when no
    /// pointer is tracked.
    pub fn average_position(&self) -> Point {
        if self.pointers.is_empty() {
            return Point::ZERO;
        }
        let mut sum = Point::ZERO;
        for entry in self.pointers.values() {
            sum.x += entry.last.x;
            sum.y += entry.last.y;
        }
        let n = self.pointers.len() as f32;
        Point::new(sum.x / n, sum.y / n)
    }

    /// Centroid of the down positions of the current pointers.
    pub fn average_start_position(&self) -> Point {
        if self.pointers.is_empty() {
            return Point::ZERO;
        }
        let mut sum = Point::ZERO;
        for entry in self.pointers.values() {
            sum.x += entry.start.x;
            sum.y += entry.start.y;
        }
        let n = self.pointers.len() as f32;
        Point::new(sum.x / n, sum.y / n)
    }

    /// Whether the two trackers currently track at least one common pointer.
    pub fn shares_common_pointers(&self, other: &PointerTracker) -> bool {
        self.pointers
            .keys()
            .any(|id| other.pointers.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn test_add_move_remove() {
        let mut tracker = PointerTracker::new();
        tracker.add(7, Point::new(10.0, 20.0), 0);
        assert_eq!(tracker.count(), 1);
        assert!(tracker.has(7));

        tracker.track_move(7, Point::new(30.0, 20.0), 100 * MS);
        assert_eq!(tracker.position_of(7), Some(Point::new(30.0, 20.0)));
        assert_eq!(tracker.start_position_of(7), Some(Point::new(10.0, 20.0)));

        tracker.remove(7);
        assert!(tracker.is_empty());
        assert_eq!(tracker.last_position(), None);
    }

    #[test]
    fn test_velocity_from_time_delta() {
        let mut tracker = PointerTracker::new();
        tracker.add(1, Point::new(0.0, 0.0), 0);
        // 100 units in 100ms = 1000 units/s.
        tracker.track_move(1, Point::new(100.0, 0.0), 100 * MS);
        let (vx, vy) = tracker.velocity_of(1).unwrap();
        assert!((vx - 1000.0).abs() < 1.0);
        assert!(vy.abs() < f32::EPSILON);
    }

    #[test]
    fn test_mapped_ids_stable_and_reused() {
        let mut tracker = PointerTracker::new();
        tracker.add(100, Point::ZERO, 0);
        tracker.add(200, Point::ZERO, 0);
        assert_eq!(tracker.mapped_touch_id(100), Some(0));
        assert_eq!(tracker.mapped_touch_id(200), Some(1));

        // The mapped id survives moves for the lifetime of the touch.
        tracker.track_move(100, Point::new(5.0, 5.0), MS);
        assert_eq!(tracker.mapped_touch_id(100), Some(0));

        // Releasing frees the lowest id for the next touch.
        tracker.remove(100);
        tracker.add(300, Point::ZERO, 2 * MS);
        assert_eq!(tracker.mapped_touch_id(300), Some(0));
    }

    #[test]
    fn test_untracked_queries_are_neutral() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.mapped_touch_id(9), None);
        assert_eq!(tracker.average_position(), Point::ZERO);
        // A move for an unknown pointer is dropped, not tracked.
        tracker.track_move(9, Point::new(1.0, 1.0), MS);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_average_position() {
        let mut tracker = PointerTracker::new();
        tracker.add(1, Point::new(0.0, 0.0), 0);
        tracker.add(2, Point::new(10.0, 20.0), 0);
        assert_eq!(tracker.average_position(), Point::new(5.0, 10.0));
    }

    #[test]
    fn test_shares_common_pointers() {
        let mut a = PointerTracker::new();
        let mut b = PointerTracker::new();
        a.add(1, Point::ZERO, 0);
        b.add(2, Point::ZERO, 0);
        assert!(!a.shares_common_pointers(&b));
        b.add(1, Point::ZERO, 0);
        assert!(a.shares_common_pointers(&b));
    }

    #[test]
    fn test_touch_id_map_evicts_oldest_inserted() {
        let mut map = TouchIdMap::new(2);
        map.assign(10);
        map.assign(20);
        assert_eq!(map.len(), 2);

        // Third assignment evicts the oldest mapping (pointer 10).
        let id = map.assign(30);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(10), None);
        assert_eq!(map.get(20), Some(1));
        assert_eq!(id, 0); // slot 0 was freed by the eviction
    }

    #[test]
    fn test_touch_id_map_assign_is_idempotent() {
        let mut map = TouchIdMap::default();
        let first = map.assign(5);
        let second = map.assign(5);
        assert_eq!(first, second);
        assert_eq!(map.len(), 1);
    }
}
