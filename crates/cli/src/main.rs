//! prodflow CLI - content production workflow tracker.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use prodflow_board::{parse_column, BasicBoardService, BoardService, TaskSpec, COLUMN_ORDER};
use prodflow_core::{MemberId, Priority, ProjectStatus, Schedule, StageName, TaskStatus};
use prodflow_engine::{BasicWorkflowService, MilestoneSpec, ProjectSpec, WorkflowService};
use prodflow_query::{ProjectFilter, TaskFilter};
use prodflow_storage::JsonStore;

#[derive(Parser)]
#[command(name = "prodflow")]
#[command(about = "Content production workflow tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new content project
    Create {
        /// Project title
        title: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Category
        #[arg(long, default_value = "general")]
        category: String,
        /// Priority (low|medium|high|urgent)
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Estimated views
        #[arg(long, default_value = "0")]
        estimated_views: u64,
    },
    /// Show project details
    Show {
        /// Project ID
        id: String,
    },
    /// List projects
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
        /// Search term (title/description)
        #[arg(long)]
        search: Option<String>,
    },
    /// Set a stage's progress
    Progress {
        /// Project ID
        id: String,
        /// Stage name (e.g. scriptWriting, editing)
        stage: String,
        /// Progress value (0-100)
        value: i64,
    },
    /// Assert a new project status
    Status {
        /// Project ID
        id: String,
        /// Target status
        status: String,
    },
    /// Add a milestone to a project
    AddMilestone {
        /// Project ID
        id: String,
        /// Milestone title
        title: String,
        /// Stage name
        stage: String,
        /// Assignee member ID
        assignee: String,
    },
    /// Delete a project
    Delete {
        /// Project ID
        id: String,
    },
    /// Toggle a milestone's completion
    Milestone {
        /// Project ID
        id: String,
        /// Milestone ID
        milestone: String,
        /// Mark as not completed instead
        #[arg(long)]
        undo: bool,
    },
    /// Add a board task
    TaskAdd {
        /// Task title
        title: String,
        /// Assignee member ID
        assignee: String,
        /// Description
        #[arg(long, default_value = "")]
        description: String,
        /// Priority (low|medium|high|urgent)
        #[arg(long, default_value = "medium")]
        priority: String,
    },
    /// Move a board task to a column
    TaskMove {
        /// Task ID
        id: String,
        /// Target column (backlog|todo|in_progress|review|done)
        status: String,
    },
    /// Delete a board task
    TaskDelete {
        /// Task ID
        id: String,
    },
    /// List board tasks
    TaskList {
        /// Filter by column
        #[arg(long)]
        status: Option<String>,
    },
    /// Print the analytics report
    Analytics,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    // Open storage
    let storage_path = std::path::PathBuf::from(".prodflow");
    let workflow = BasicWorkflowService::new(JsonStore::new(&storage_path).await?);
    let board = BasicBoardService::new(JsonStore::new(&storage_path).await?);

    match cli.command {
        Commands::Create { title, description, category, priority, estimated_views } => {
            let project = workflow
                .create_project(ProjectSpec {
                    title,
                    description,
                    category,
                    priority: parse_priority(&priority)?,
                    schedule: Schedule::default(),
                    estimated_views,
                    milestones: Vec::new(),
                    team: Vec::new(),
                })
                .await?;
            println!("Created project: {} - {}", project.id, project.title);
        }
        Commands::Show { id } => {
            let project = workflow.get_project(id.parse()?).await?;
            println!("Project: {}", project.id);
            println!("  Title: {}", project.title);
            println!("  Category: {}", project.category);
            println!("  Status: {}", project.status);
            println!("  Priority: {}", project.priority);
            println!("  Overall progress: {}%", project.overall_progress);
            println!("  Version: {}", project.version);
            println!("  Stages:");
            for (name, stage) in project.stages.iter() {
                println!("    {:<16} {:>3}%  {:?}", name.as_str(), stage.progress, stage.status);
            }
            if !project.milestones.is_empty() {
                println!("  Milestones:");
                for m in &project.milestones {
                    let mark = if m.completed { "x" } else { " " };
                    println!("    [{}] {} ({}) - {}", mark, m.title, m.stage, m.id);
                }
            }
        }
        Commands::List { status, priority, search } => {
            let filter = ProjectFilter {
                status: status.as_deref().map(parse_project_status).transpose()?,
                priority: priority.as_deref().map(parse_priority).transpose()?,
                search,
            };
            let projects = workflow.list_projects(&filter).await?;
            println!("Projects ({})", projects.len());
            for project in projects {
                println!(
                    "  {} | {:<9} | {:<6} | {:>3}% - {}",
                    project.id, project.status, project.priority, project.overall_progress, project.title,
                );
            }
        }
        Commands::Progress { id, stage, value } => {
            let id = id.parse()?;
            let stage: StageName = stage.parse().map_err(prodflow_engine::EngineError::from)?;
            let current = workflow.get_project(id).await?;
            let updated = workflow
                .update_stage_progress(id, stage, value, current.version)
                .await?;
            println!(
                "{}: {} -> {}%, overall {}%",
                updated.title, stage, value, updated.overall_progress,
            );
        }
        Commands::Status { id, status } => {
            let id = id.parse()?;
            let status = parse_project_status(&status)?;
            let current = workflow.get_project(id).await?;
            let updated = workflow.set_project_status(id, status, current.version).await?;
            println!("{}: status {}", updated.title, updated.status);
        }
        Commands::AddMilestone { id, title, stage, assignee } => {
            let id = id.parse()?;
            let spec = MilestoneSpec {
                title,
                stage: stage.parse::<StageName>().map_err(prodflow_engine::EngineError::from)?,
                assignee: assignee.parse::<MemberId>().map_err(|_| anyhow::anyhow!("Invalid member ID"))?,
            };
            let current = workflow.get_project(id).await?;
            let updated = workflow.add_milestone(id, spec, current.version).await?;
            let added = updated.milestones.last().expect("milestone just added");
            println!("Added milestone: {} - {}", added.id, added.title);
        }
        Commands::Delete { id } => {
            let id: prodflow_core::ProjectId = id.parse()?;
            workflow.delete_project(id).await?;
            println!("Deleted project: {id}");
        }
        Commands::Milestone { id, milestone, undo } => {
            let id = id.parse()?;
            let milestone = milestone
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid milestone ID"))?;
            let current = workflow.get_project(id).await?;
            let updated = workflow
                .toggle_milestone(id, milestone, !undo, current.version)
                .await?;
            let m = updated
                .milestones
                .iter()
                .find(|m| m.id == milestone)
                .expect("milestone just toggled");
            println!("{}: completed = {}", m.title, m.completed);
        }
        Commands::TaskAdd { title, assignee, description, priority } => {
            let task = board
                .create_task(TaskSpec {
                    title,
                    description,
                    priority: parse_priority(&priority)?,
                    assignee: assignee.parse().map_err(|_| anyhow::anyhow!("Invalid member ID"))?,
                    reviewer: None,
                    tags: Vec::new(),
                    due_date: None,
                })
                .await?;
            println!("Added task: {} - {}", task.id, task.title);
        }
        Commands::TaskMove { id, status } => {
            let id = id.parse()?;
            let current = board.get_task(id).await?;
            let status = parse_column(current.status, &status)?;
            let updated = board.move_task(id, status, current.version).await?;
            println!("{}: moved to {}", updated.title, updated.status);
        }
        Commands::TaskDelete { id } => {
            let id = id.parse()?;
            board.delete_task(id).await?;
            println!("Deleted task: {id}");
        }
        Commands::TaskList { status } => {
            let filter = TaskFilter {
                status: status
                    .as_deref()
                    .map(|s| s.parse::<TaskStatus>())
                    .transpose()
                    .map_err(|e| anyhow::anyhow!("{e}"))?,
                ..Default::default()
            };
            let tasks = board.list_tasks(&filter).await?;
            println!("Tasks ({})", tasks.len());
            for column in COLUMN_ORDER {
                let in_column: Vec<_> = tasks.iter().filter(|t| t.status == column).collect();
                if in_column.is_empty() {
                    continue;
                }
                println!("  {}:", column);
                for task in in_column {
                    println!("    {} | {:<6} - {}", task.id, task.priority, task.title);
                }
            }
        }
        Commands::Analytics => {
            let report = workflow.analytics(chrono::Utc::now()).await?;
            println!("Status distribution:");
            for slice in &report.status_distribution {
                println!("  {:<9} {:>3} ({:>3}%)", slice.status, slice.count, slice.percentage);
            }
            println!("Upcoming deadlines:");
            for deadline in &report.upcoming_deadlines {
                println!("  {} - {}", deadline.due.format("%Y-%m-%d"), deadline.title);
            }
            println!("Average completion: {:.1} days", report.avg_completion_days);
            println!("Team productivity: {}", report.team_productivity);
        }
    }

    Ok(())
}

fn parse_priority(s: &str) -> Result<Priority> {
    match s {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        "urgent" => Ok(Priority::Urgent),
        other => Err(anyhow::anyhow!("unknown priority: {other}")),
    }
}

fn parse_project_status(s: &str) -> Result<ProjectStatus> {
    ProjectStatus::ALL
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| anyhow::anyhow!("unknown status: {s}"))
}
