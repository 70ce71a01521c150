use std::collections::VecDeque;

use climasync_api::models::{DaySlot, DetectionRecord};

pub const DEFAULT_DETECTION_CAPACITY: usize = 50;

/// Three day-slots of detection records: today, yesterday and the day before.
#[derive(Debug, Clone)]
pub struct DetectionWindow {
    slots: [VecDeque<DetectionRecord>; 3],
    capacity: usize,
}

impl DetectionWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Default::default(),
            capacity: capacity.max(1),
        }
    }

    /// Appends to today's slot and returns the record evicted to make room.
    pub fn add_today(&mut self, record: DetectionRecord) -> Option<DetectionRecord> {
        let today = &mut self.slots[DaySlot::Today.index()];
        today.push_back(record);

        if today.len() > self.capacity {
            today.pop_front()
        } else {
            None
        }
    }

    pub fn list(&self, slot: DaySlot) -> Vec<DetectionRecord> {
        self.slots[slot.index()].iter().cloned().collect()
    }

    pub fn remove_by_id(&mut self, id: u64) -> bool {
        for slot in self.slots.iter_mut() {
            if let Some(position) = slot.iter().position(|record| record.id == id) {
                slot.remove(position);
                return true;
            }
        }

        false
    }

    /// Shifts every slot one day older. The day-before slot is dropped.
    pub fn rotate(&mut self) {
        self.slots.rotate_right(1);
        self.slots[DaySlot::Today.index()].clear();
    }

    pub fn counts(&self) -> [usize; 3] {
        [
            self.slots[0].len(),
            self.slots[1].len(),
            self.slots[2].len(),
        ]
    }
}

impl Default for DetectionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use climasync_api::models::DetectionStatus;
    use time::macros::datetime;

    use super::*;

    fn record(id: u64) -> DetectionRecord {
        DetectionRecord {
            id,
            captured_at: datetime!(2026-08-10 10:00 UTC),
            image: None,
            description: format!("frame {id}"),
            confidence: 0.5,
            status: DetectionStatus::Detected,
        }
    }

    fn fill(window: &mut DetectionWindow, ids: std::ops::Range<u64>) {
        for id in ids {
            window.add_today(record(id));
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut window = DetectionWindow::default();
        fill(&mut window, 1..51);

        let evicted = window.add_today(record(51));

        let today = window.list(DaySlot::Today);
        assert_eq!(evicted.map(|r| r.id), Some(1));
        assert_eq!(today.len(), 50);
        assert_eq!(today.first().map(|r| r.id), Some(2));
        assert_eq!(today.last().map(|r| r.id), Some(51));
    }

    #[test]
    fn test_rotation_shifts_slots() {
        let mut window = DetectionWindow::default();
        fill(&mut window, 100..102);
        window.rotate();
        fill(&mut window, 200..203);
        window.rotate();
        fill(&mut window, 300..305);
        assert_eq!(window.counts(), [5, 3, 2]);

        window.rotate();

        assert_eq!(window.counts(), [0, 5, 3]);
        assert_eq!(window.list(DaySlot::Yesterday)[0].id, 300);
        assert_eq!(window.list(DaySlot::DayBefore)[0].id, 200);
        assert!(!window.remove_by_id(100));
    }

    #[test]
    fn test_remove_searches_every_slot() {
        let mut window = DetectionWindow::default();
        fill(&mut window, 1..4);
        window.rotate();
        window.rotate();
        fill(&mut window, 10..12);

        assert!(window.remove_by_id(2));
        assert!(!window.remove_by_id(2));
        assert!(window.remove_by_id(11));

        assert_eq!(
            window.list(DaySlot::DayBefore).iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(window.counts(), [1, 0, 2]);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut window = DetectionWindow::new(3);
        fill(&mut window, 7..12);

        let ids: Vec<_> = window.list(DaySlot::Today).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9, 10, 11]);
    }
}
