use super::{ExecutionSource, ExecutionStatus, ExecutionTask, split_iteration};
use crate::graph::VinesGraph;
use ahash::AHashMap;
use std::cmp::Ordering;

struct Entry {
    record: ExecutionTask,
    iteration: Option<u32>,
    sequence: u64,
}

impl Entry {
    /// Timestamps only decide when both records carry one.
    fn recency(&self, other: &Entry) -> Ordering {
        let by_time = match (self.record.last_activity(), other.record.last_activity()) {
            (Some(mine), Some(theirs)) => mine.cmp(&theirs),
            _ => Ordering::Equal,
        };
        by_time
            .then(self.iteration.cmp(&other.iteration))
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Most recent status record per `(taskReferenceName, instanceId)`.
///
/// Advisory only: records for tasks that no longer exist are kept until
/// [`clear`](Self::clear) and simply match no node.
#[derive(Default)]
pub struct ExecutionOverlay {
    records: AHashMap<String, AHashMap<Option<String>, Entry>>,
    sequence: u64,
}

impl ExecutionOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a status update. Returns `true` if it became the current
    /// record for its key.
    pub fn ingest(&mut self, record: ExecutionTask) -> bool {
        self.sequence += 1;
        let (base, parsed_iteration) = split_iteration(&record.task_reference_name);
        let base = base.to_string();
        let entry = Entry {
            iteration: record.iteration.or(parsed_iteration),
            sequence: self.sequence,
            record,
        };

        let slots = self.records.entry(base).or_default();
        let key = entry.record.instance_id.clone();
        match slots.get(&key) {
            Some(current) if entry.recency(current) == Ordering::Less => false,
            _ => {
                slots.insert(key, entry);
                true
            }
        }
    }

    /// Pulls everything new from `source`. Returns how many records arrived.
    pub fn refresh(&mut self, source: &mut dyn ExecutionSource) -> usize {
        let records = source.poll();
        let count = records.len();
        for record in records {
            self.ingest(record);
        }
        if count > 0 {
            log::debug!("Execution overlay ingested {} status records", count);
        }
        count
    }

    /// The current record for a node. Without an instance id, the most recent
    /// record for the reference across all instances is returned.
    pub fn get(&self, reference: &str, instance_id: Option<&str>) -> Option<&ExecutionTask> {
        let slots = self.records.get(reference)?;
        match instance_id {
            Some(instance) => slots
                .get(&Some(instance.to_string()))
                .map(|entry| &entry.record),
            None => slots
                .get(&None)
                .or_else(|| slots.values().max_by(|a, b| a.recency(b)))
                .map(|entry| &entry.record),
        }
    }

    pub fn status(&self, reference: &str, instance_id: Option<&str>) -> ExecutionStatus {
        self.get(reference, instance_id)
            .map(|record| record.status)
            .unwrap_or_default()
    }

    /// Copies the current records onto the graph's nodes. Nodes without a
    /// record get `DEFAULT`.
    pub fn apply(&self, graph: &mut VinesGraph, instance_id: Option<&str>) {
        for node in graph.nodes_mut() {
            let record = self.get(&node.id, instance_id).cloned();
            node.execution_status = Some(
                record
                    .as_ref()
                    .map(|r| r.status)
                    .unwrap_or_default(),
            );
            node.execution_task = record;
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.values().map(|slots| slots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
