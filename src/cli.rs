//! Terminal front-end: each invocation loads the saved project, applies one
//! command and writes the project back.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::WorkflowApp;
use crate::error::{Error, Result};
use crate::io::payload::{handle_drop, DropOutcome};
use crate::io::sequence::build_sequence;
use crate::io::storage::{FileStore, KeyValueStore};
use crate::io::xer::LinkMode;
use crate::model::node::{Node, Position};
use crate::settings::AppSettings;
use crate::view::force_graph::force_graph_data;
use crate::view::table::{render_table, table_rows, DEFAULT_COLUMNS};

#[derive(Parser, Debug)]
#[command(name = "rust-workflow-app", version, about = "Construction workflow task graph")]
pub struct Cli {
    /// Directory holding the project document. Defaults to the OS data dir.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Settings file. Defaults to settings.json in the OS config dir.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Add a single pending task
    Add {
        #[arg(default_value = "New Task")]
        label: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
    },
    /// Comment on a task
    Comment {
        id: String,
        text: String,
        /// Author; defaults to the configured comment author
        #[arg(long)]
        user: Option<String>,
    },
    /// Import activities from a Primavera P6 .xer file
    Import {
        file: PathBuf,
        /// chain (default from settings) or predecessors
        #[arg(long)]
        link: Option<LinkMode>,
    },
    /// Print the task table
    Table,
    /// Print the 3D layout data as JSON
    Layout,
    /// Add a chain of tasks from a prompt like "dig then pour then cure"
    Sequence {
        prompt: String,
        #[arg(long, default_value_t = 100.0)]
        x: f64,
        #[arg(long, default_value_t = 100.0)]
        y: f64,
    },
    /// Apply a drag-and-drop JSON payload
    Drop {
        payload: String,
        #[arg(long, default_value_t = 0.0)]
        x: f64,
        #[arg(long, default_value_t = 0.0)]
        y: f64,
    },
    /// Mark a task completed at 100%
    Complete { id: String },
    /// Remove a task and its links
    Remove { id: String },
    /// Rename the project
    Rename { name: String },
    /// Clear the project
    Reset,
}

/// Load settings and project from disk, then run the command.
pub fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    };
    let data_dir = cli.data_dir.unwrap_or_else(AppSettings::data_dir);
    tracing::debug!("using data dir {:?}", data_dir);

    let mut app = WorkflowApp::load(FileStore::new(data_dir), settings);
    let output = execute(&mut app, cli.command)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

/// Apply one command to `app` and return what should be printed.
pub fn execute<S: KeyValueStore>(app: &mut WorkflowApp<S>, command: Commands) -> Result<String> {
    match command {
        Commands::Add { label, x, y } => {
            let node = Node::new(label, Position::new(x, y));
            let id = node.id.clone();
            app.add_node(node);
            Ok(format!("Added {}", id))
        }
        Commands::Comment { id, text, user } => {
            require_node(app, &id)?;
            if app.add_comment(&id, &text, user.as_deref()) {
                Ok(format!("Commented on {}", id))
            } else {
                Err(Error::Other("Comment text is empty".to_string()))
            }
        }
        Commands::Import { file, link } => {
            let mode = link.unwrap_or(app.settings().import_link_mode);
            let summary = app.import_xer(&file, mode)?;
            Ok(format!("Imported {} activities ({} links)", summary.nodes, summary.edges))
        }
        Commands::Table => {
            let rows = table_rows(app.nodes(), app.selected_node_id());
            Ok(format!("{}\n{}", app.project_name(), render_table(&rows, &DEFAULT_COLUMNS)))
        }
        Commands::Layout => {
            let data = force_graph_data(app.nodes(), app.edges());
            Ok(serde_json::to_string_pretty(&data)?)
        }
        Commands::Sequence { prompt, x, y } => {
            let ids = build_sequence(app, &prompt, Position::new(x, y));
            Ok(format!("Added {} tasks", ids.len()))
        }
        Commands::Drop { payload, x, y } => match handle_drop(app, Some(&payload), Position::new(x, y)) {
            DropOutcome::Created { nodes, edges } => {
                Ok(format!("Added {} tasks ({} links)", nodes.len(), edges))
            }
            DropOutcome::Ignored => Err(Error::Other("Nothing to drop".to_string())),
        },
        Commands::Complete { id } => {
            require_node(app, &id)?;
            app.complete_task(&id);
            Ok(format!("Completed {}", id))
        }
        Commands::Remove { id } => {
            require_node(app, &id)?;
            app.remove_node(&id);
            Ok(format!("Removed {}", id))
        }
        Commands::Rename { name } => {
            app.set_project_name(name);
            Ok(format!("Project renamed to {}", app.project_name()))
        }
        Commands::Reset => {
            app.reset();
            Ok("New project created".to_string())
        }
    }
}

fn require_node<S: KeyValueStore>(app: &WorkflowApp<S>, id: &str) -> Result<()> {
    match app.node(id) {
        Some(_) => Ok(()),
        None => Err(Error::Other(format!("No task with id {}", id))),
    }
}
