use super::VinesCore;
use ahash::AHashMap;
use std::collections::hash_map::Entry;

/// Open engines keyed by workflow id, one per open workflow version.
#[derive(Default)]
pub struct WorkflowRegistry {
    engines: AHashMap<String, VinesCore>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `core` under its workflow id, replacing any engine already
    /// open for that id.
    pub fn open(&mut self, core: VinesCore) -> &mut VinesCore {
        match self.engines.entry(core.workflow_id().to_string()) {
            Entry::Occupied(mut entry) => {
                log::info!("Replacing open engine for workflow '{}'", entry.key());
                entry.insert(core);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(core),
        }
    }

    pub fn get(&self, workflow_id: &str) -> Option<&VinesCore> {
        self.engines.get(workflow_id)
    }

    pub fn get_mut(&mut self, workflow_id: &str) -> Option<&mut VinesCore> {
        self.engines.get_mut(workflow_id)
    }

    /// Drops the engine for `workflow_id` and hands it back.
    pub fn close(&mut self, workflow_id: &str) -> Option<VinesCore> {
        let closed = self.engines.remove(workflow_id);
        if closed.is_some() {
            log::info!("Closed workflow '{}'", workflow_id);
        }
        closed
    }

    pub fn contains(&self, workflow_id: &str) -> bool {
        self.engines.contains_key(workflow_id)
    }

    /// Ids of all open workflows, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
