use clap::{Parser, ValueEnum};
use std::fs;
use std::time::Instant;
use vines_core::prelude::*;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirectionCli {
    Vertical,
    Horizontal,
}

impl From<DirectionCli> for RenderDirection {
    fn from(value: DirectionCli) -> Self {
        match value {
            DirectionCli::Vertical => RenderDirection::Vertical,
            DirectionCli::Horizontal => RenderDirection::Horizontal,
        }
    }
}

/// Lays out a workflow task list and prints the resulting node graph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow task list JSON file
    tasks_path: String,

    /// Optional path to a tool catalog JSON file (array of tool definitions)
    #[arg(short, long)]
    tools: Option<String>,

    /// Optional path to an execution record JSON file (array of task records)
    #[arg(short, long)]
    status: Option<String>,

    /// Optional path to a layout config JSON file
    #[arg(short, long)]
    layout: Option<String>,

    /// Render direction, overriding the layout file
    #[arg(short, long, value_enum)]
    direction: Option<DirectionCli>,

    /// Print the node list as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let total_start = Instant::now();

    let load_start = Instant::now();
    let tasks_json = fs::read_to_string(&cli.tasks_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read task list '{}': {}",
            cli.tasks_path, e
        ))
    });

    let mut layout = match &cli.layout {
        Some(path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read layout '{}': {}", path, e))
            });
            LayoutConfig::from_json(&content)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse layout: {}", e)))
        }
        None => LayoutConfig::default(),
    };
    if let Some(direction) = cli.direction {
        layout = layout.with_direction(direction.into());
    }

    let mut builder = VinesCore::builder(workflow_id(&cli.tasks_path))
        .with_tasks_json(&tasks_json)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
        .with_layout(layout);

    if let Some(path) = &cli.tools {
        let content = fs::read_to_string(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to read tool catalog '{}': {}", path, e))
        });
        let catalog = ToolCatalog::from_json(&content)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse tool catalog: {}", e)));
        println!("Loaded {} tool definitions.", catalog.len());
        builder = builder.with_tools(Box::new(catalog));
    }

    let mut records: Vec<ExecutionTask> = match &cli.status {
        Some(path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read execution records '{}': {}", path, e))
            });
            serde_json::from_str(&content).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to parse execution records: {}", e))
            })
        }
        None => Vec::new(),
    };
    let load_duration = load_start.elapsed();

    let build_start = Instant::now();
    let mut core = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid workflow: {}", e)));
    let build_duration = build_start.elapsed();

    let ingested = core.refresh_execution(&mut records);

    if cli.json {
        let output = serde_json::to_string_pretty(core.nodes())
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize nodes: {}", e)));
        println!("{}", output);
        return;
    }

    println!("\n--- Nodes ({}) ---", core.nodes().len());
    for node in core.nodes() {
        let indent = "  ".repeat(node.depth);
        let status = node
            .execution_status
            .map(|s| format!(" [{:?}]", s))
            .unwrap_or_default();
        println!(
            "{}{} ({:?}) at ({:.0}, {:.0}) size {:.0}x{:.0}{}",
            indent,
            node.id,
            node.node_type,
            node.position.x,
            node.position.y,
            node.size.width,
            node.size.height,
            status
        );
    }

    let boundary = core.boundary();
    println!("\n--- Workflow Summary ---");
    println!("Top-level tasks:      {}", core.tasks().len());
    println!("Execution records:    {}", ingested);
    println!(
        "Boundary:             x {:.0}..{:.0}, y {:.0}..{:.0}",
        boundary.left, boundary.right, boundary.top, boundary.bottom
    );

    println!("\n--- Performance Summary ---");
    println!("File Loading:         {:?}", load_duration);
    println!("Graph Build:          {:?}", build_duration);
    println!("Total Time:           {:?}", total_start.elapsed());
}

/// Uses the file stem of the task list as the workflow id.
fn workflow_id(path: &str) -> String {
    std::path::Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
