//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the
//! vines-core crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use vines_core::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let tasks_json = std::fs::read_to_string("path/to/tasks.json")?;
//! let core = VinesCore::builder("wf-1").with_tasks_json(&tasks_json)?.build()?;
//!
//! for node in core.nodes() {
//!     println!("{} {:?}", node.id, node.boundary());
//! }
//! # Ok(())
//! # }
//! ```

// Engine
pub use crate::workflow::{
    InsertOutcome, PersistenceSink, ValidationIssue, VinesCore, VinesCoreBuilder,
    WorkflowRegistry, WorkflowSnapshot,
};

// Task model
pub use crate::task::tree::Placement;
pub use crate::task::{BranchKey, DecisionCases, Task, TaskKind, TaskType};

// Tools and task creation
pub use crate::factory::{TaskFactory, create_task};
pub use crate::tool::{PropertyDef, PropertyType, ToolCatalog, ToolDefinition, ToolRegistry};
pub use crate::transform::{BuiltInBindings, BuiltInValue, auto_type_transform, replace_built_in_value};

// Graph
pub use crate::graph::{
    Boundary, LayoutConfig, NodeType, Position, RenderDirection, Size, VinesGraph, VinesNode,
    get_boundary,
};

// Execution
pub use crate::execution::{ExecutionOverlay, ExecutionSource, ExecutionStatus, ExecutionTask};

// Ids
pub use crate::id::{IdGenerator, IdSource, generate_id};

// Error types
pub use crate::error::{FactoryError, MutationError, WorkflowError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
