//! The immutable waiting contract of a gate.

use std::time::Duration;

use readygate_common::types::{ContainerName, Marker};

use crate::deadline::Deadline;

/// A container paired with the marker it must print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    container: ContainerName,
    marker: Marker,
}

impl Condition {
    /// Container to watch.
    #[must_use]
    pub const fn container(&self) -> &ContainerName {
        &self.container
    }

    /// Marker expected in the container's logs.
    #[must_use]
    pub const fn marker(&self) -> &Marker {
        &self.marker
    }
}

/// Ordered container → marker mapping plus one deadline shared by all
/// entries.
///
/// Built once and never mutated. The deadline bounds the sum of all waits:
/// time spent on earlier conditions is no longer available to later ones.
#[derive(Debug, Clone)]
pub struct ReadinessConditions {
    deadline: Deadline,
    conditions: Vec<Condition>,
}

impl ReadinessConditions {
    /// Copies `markers` into a new condition set.
    ///
    /// Entries keep the order they are given in. A repeated container name
    /// keeps its first position and takes the last marker given for it.
    pub fn new<I, C, M>(deadline: Deadline, markers: I) -> Self
    where
        I: IntoIterator<Item = (C, M)>,
        C: Into<ContainerName>,
        M: Into<Marker>,
    {
        let mut conditions: Vec<Condition> = Vec::new();
        for (container, marker) in markers {
            let container = container.into();
            let marker = marker.into();
            if let Some(existing) = conditions.iter_mut().find(|c| c.container == container) {
                existing.marker = marker;
            } else {
                conditions.push(Condition { container, marker });
            }
        }
        Self {
            deadline,
            conditions,
        }
    }

    /// The shared deadline.
    #[must_use]
    pub const fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Time left before the shared deadline, clamped at zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.remaining()
    }

    /// Milliseconds left before the shared deadline; recomputed on every
    /// call, zero or negative once it has passed.
    #[must_use]
    pub fn remaining_millis(&self) -> i64 {
        self.deadline.remaining_millis()
    }

    /// Conditions in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    /// Marker required from `container`, if it is part of the set.
    #[must_use]
    pub fn get(&self, container: &str) -> Option<&Marker> {
        self.conditions
            .iter()
            .find(|c| c.container.as_str() == container)
            .map(|c| &c.marker)
    }

    /// Number of conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the set has no conditions; such a gate opens immediately.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<'a> IntoIterator for &'a ReadinessConditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn deadline() -> Deadline {
        Deadline::after(Duration::from_secs(60))
    }

    #[test]
    fn keeps_insertion_order() {
        let set = ReadinessConditions::new(
            deadline(),
            [("zookeeper", "binding"), ("kafka", "started"), ("api", "Ready")],
        );
        let order: Vec<&str> = set.iter().map(|c| c.container().as_str()).collect();
        assert_eq!(order, vec!["zookeeper", "kafka", "api"]);
    }

    #[test]
    fn repeated_name_keeps_position_and_last_marker() {
        let set = ReadinessConditions::new(
            deadline(),
            [("db", "first"), ("api", "Ready"), ("db", "second")],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap().container().as_str(), "db");
        assert_eq!(set.get("db").unwrap().as_str(), "second");
    }

    #[test]
    fn later_changes_to_caller_map_do_not_leak_in() {
        let mut markers = BTreeMap::new();
        let _ = markers.insert("localstack".to_string(), "Ready".to_string());
        let set = ReadinessConditions::new(deadline(), markers.clone());

        let _ = markers.insert("localstack".to_string(), "Changed".to_string());
        let _ = markers.insert("extra".to_string(), "Ready".to_string());

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("localstack").unwrap().as_str(), "Ready");
        assert!(set.get("extra").is_none());
    }

    #[test]
    fn empty_set_is_legal() {
        let set = ReadinessConditions::new(deadline(), Vec::<(String, String)>::new());
        assert!(set.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_is_shared_and_recomputed() {
        let set = ReadinessConditions::new(
            Deadline::after(Duration::from_secs(5)),
            [("a", "x"), ("b", "y")],
        );
        assert_eq!(set.remaining_millis(), 5_000);
        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(set.remaining_millis(), -2_000);
        assert_eq!(set.remaining(), Duration::ZERO);
    }
}
