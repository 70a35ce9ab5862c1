use super::{Region, RegionId};

/// Ids of regions containing `time`, in collection order.
pub fn active_at(regions: &[Region], time: f64) -> Vec<RegionId> {
    regions
        .iter()
        .filter(|region| region.contains(time))
        .map(|region| region.id().clone())
        .collect()
}

/// Set differences between two consecutive time updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveChanges {
    /// Regions that stopped containing the playhead.
    pub left: Vec<RegionId>,
    /// Regions that started containing the playhead.
    pub entered: Vec<RegionId>,
}

impl ActiveChanges {
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.entered.is_empty()
    }
}

/// Remembers which regions contained the playhead on the previous update.
#[derive(Clone, Debug, Default)]
pub struct ActiveTracker {
    active: Vec<RegionId>,
}

impl ActiveTracker {
    pub fn active(&self) -> &[RegionId] {
        &self.active
    }

    pub fn update(&mut self, regions: &[Region], time: f64) -> ActiveChanges {
        let next = active_at(regions, time);
        let left = self
            .active
            .iter()
            .filter(|id| !next.contains(id))
            .cloned()
            .collect();
        let entered = next
            .iter()
            .filter(|id| !self.active.contains(id))
            .cloned()
            .collect();
        self.active = next;
        ActiveChanges { left, entered }
    }

    /// Drop `id` without reporting a transition.
    pub fn forget(&mut self, id: &RegionId) {
        self.active.retain(|active| active != id);
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::RegionParams;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn region(id: &str, start: f64, end: f64) -> Region {
        Region::from_params(RegionId::new(id), &RegionParams::new(start, end), 10.0)
    }

    #[test]
    fn enters_and_leaves_on_time_updates() {
        let regions = vec![region("a", 2.0, 5.0)];
        let mut tracker = ActiveTracker::default();
        let changes = tracker.update(&regions, 3.0);
        assert_eq!(changes.entered, vec![RegionId::new("a")]);
        assert!(changes.left.is_empty());
        assert!(tracker.update(&regions, 4.0).is_empty());
        let changes = tracker.update(&regions, 6.0);
        assert_eq!(changes.left, vec![RegionId::new("a")]);
        assert!(changes.entered.is_empty());
    }

    #[test]
    fn marker_is_active_only_at_its_instant() {
        let regions = vec![region("m", 4.0, 4.0)];
        let mut tracker = ActiveTracker::default();
        assert!(tracker.update(&regions, 3.99).is_empty());
        assert_eq!(tracker.update(&regions, 4.0).entered.len(), 1);
        assert_eq!(tracker.update(&regions, 4.01).left.len(), 1);
    }

    #[test]
    fn transitions_match_set_differences() {
        let mut rng = StdRng::seed_from_u64(3);
        let regions: Vec<Region> = (0..12)
            .map(|i| {
                let start = rng.random_range(0.0..9.0);
                region(&format!("r{i}"), start, start + rng.random_range(0.0..3.0))
            })
            .collect();
        let mut tracker = ActiveTracker::default();
        let mut previous: Vec<RegionId> = Vec::new();
        for _ in 0..300 {
            let time = rng.random_range(-1.0..11.0);
            let changes = tracker.update(&regions, time);
            let expected: Vec<RegionId> = regions
                .iter()
                .filter(|r| r.start() <= time && time <= r.end())
                .map(|r| r.id().clone())
                .collect();
            assert_eq!(tracker.active(), expected.as_slice());
            for id in &changes.left {
                assert!(previous.contains(id) && !expected.contains(id));
            }
            for id in &changes.entered {
                assert!(!previous.contains(id) && expected.contains(id));
            }
            let left_count = previous.iter().filter(|id| !expected.contains(id)).count();
            let entered_count = expected.iter().filter(|id| !previous.contains(id)).count();
            assert_eq!(changes.left.len(), left_count);
            assert_eq!(changes.entered.len(), entered_count);
            previous = expected;
        }
    }
}
