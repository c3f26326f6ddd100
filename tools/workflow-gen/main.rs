use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;
use vines_core::id::{IdGenerator, reference_name};
use vines_core::task::{DecisionCases, SubWorkflowDefinition, SubWorkflowParam, Task, TaskKind};

/// A CLI tool to generate random nested workflow task lists
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of top-level tasks
    #[arg(long, default_value_t = 10)]
    tasks: usize,

    /// Maximum nesting depth of control constructs
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Maximum number of tasks per branch
    #[arg(long, default_value_t = 3)]
    branch_size: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

const SIMPLE_TOOLS: [&str; 5] = ["http_request", "llm_chat", "send_email", "transform", "delay"];

struct Generator {
    rng: StdRng,
    ids: IdGenerator,
    max_depth: usize,
    branch_size: usize,
    count: usize,
}

impl Generator {
    fn task(&mut self, depth: usize) -> Task {
        self.count += 1;
        let roll = if depth >= self.max_depth {
            0
        } else {
            self.rng.random_range(0..10)
        };
        match roll {
            6 => self.construct("loop", depth, |g, d| TaskKind::DoWhile {
                loop_condition: "if ($.loop['iteration'] < 3) { true; } else { false; }".into(),
                loop_over: g.branch(d),
            }),
            7 => self.construct("switch", depth, |g, d| {
                let cases: DecisionCases = (0..g.rng.random_range(1..=3))
                    .map(|i| (format!("case_{}", i), g.branch(d)))
                    .collect();
                TaskKind::Switch {
                    evaluator_type: "javascript".into(),
                    expression: "$.value".into(),
                    decision_cases: cases,
                }
            }),
            8 => self.construct("fork", depth, |g, d| TaskKind::ForkJoin {
                fork_tasks: (0..g.rng.random_range(2..=3)).map(|_| g.branch(d)).collect(),
            }),
            9 => self.construct("sub_workflow", depth, |g, d| TaskKind::SubWorkflow {
                sub_workflow_param: SubWorkflowParam {
                    name: "child".into(),
                    version: Some(1),
                    workflow_definition: Some(SubWorkflowDefinition { tasks: g.branch(d) }),
                },
            }),
            _ => {
                let name = SIMPLE_TOOLS[self.rng.random_range(0..SIMPLE_TOOLS.len())];
                Task::simple(name, reference_name(name, &mut self.ids))
            }
        }
    }

    fn construct(
        &mut self,
        name: &str,
        depth: usize,
        kind: impl FnOnce(&mut Self, usize) -> TaskKind,
    ) -> Task {
        let reference = reference_name(name, &mut self.ids);
        let kind = kind(self, depth + 1);
        Task::with_kind(name, reference, kind)
    }

    fn branch(&mut self, depth: usize) -> Vec<Task> {
        let size = self.rng.random_range(1..=self.branch_size.max(1));
        (0..size).map(|_| self.task(depth)).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());

    println!(
        "Generating workflow ({} top-level tasks, depth {}, seed {})...",
        cli.tasks, cli.depth, seed
    );

    let mut generator = Generator {
        rng: StdRng::seed_from_u64(seed),
        ids: IdGenerator::seeded(seed),
        max_depth: cli.depth,
        branch_size: cli.branch_size,
        count: 0,
    };
    let tasks: Vec<Task> = (0..cli.tasks).map(|_| generator.task(0)).collect();

    let json_output = serde_json::to_string_pretty(&tasks)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} tasks and saved them to '{}'",
        generator.count, cli.output
    );

    Ok(())
}
