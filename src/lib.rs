//! # VinesCore - Workflow Graph Engine
//!
//! **VinesCore** turns a workflow's nested task list into a renderable node
//! graph. The task list is the only persisted state; the graph is a
//! disposable projection of it with computed positions and sizes, regenerated
//! after every edit.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Tools**: Load tool definitions into a [`ToolCatalog`](tool::ToolCatalog) (or implement [`ToolRegistry`](tool::ToolRegistry) over your own store).
//! 2.  **Create Tasks**: Use a [`TaskFactory`](factory::TaskFactory) to turn a tool into a task with coerced defaults, a unique reference name and placeholder branches.
//! 3.  **Open an Engine**: Build a [`VinesCore`](workflow::VinesCore) with `VinesCore::builder`. It validates the task list and lays out the graph.
//! 4.  **Edit and Render**: Insert, replace and remove tasks; read back nodes, boundaries and execution statuses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vines_core::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     // 1. Register the tools the workflow can use.
//!     let mut catalog = ToolCatalog::new();
//!     catalog.register(
//!         ToolDefinition::new("http", TaskType::Simple)
//!             .with_input(PropertyDef::new("url", PropertyType::String)),
//!     );
//!     catalog.register(ToolDefinition::new("loop", TaskType::DoWhile));
//!
//!     // 2. Create tasks. The loop comes back with a placeholder child.
//!     let mut factory = TaskFactory::builder(catalog.clone()).build();
//!     let fetch = factory.create("http", None)?;
//!     let repeat = factory.create("loop", None)?;
//!     let placeholder = repeat.branches()[0].1[0].task_reference_name.clone();
//!
//!     // 3. Open an engine over the task list.
//!     let mut core = VinesCore::builder("wf-1")
//!         .with_tasks(vec![repeat])
//!         .with_tools(Box::new(catalog))
//!         .build()?;
//!
//!     // 4. Replace the placeholder and inspect the layout.
//!     core.insert_node(&placeholder, vec![fetch], false);
//!     for node in core.nodes() {
//!         println!("{} at ({}, {})", node.id, node.position.x, node.position.y);
//!     }
//!     println!("Boundary: {:?}", core.boundary());
//!
//!     // Raw edits are validated before anything changes.
//!     let bad = core.update_raw_json("workflow_start", &json!({}).to_string(), false);
//!     assert!(bad.is_err());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod factory;
pub mod graph;
pub mod id;
pub mod prelude;
pub mod task;
pub mod tool;
pub mod transform;
pub mod workflow;
