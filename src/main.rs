use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use tasklist::store::{self, SharedStore};
use tasklist::{
    Config, NewTask, SeedLoader, StatusCounts, StoreEvent, Task, TaskPatch, TaskStatus, TaskStore, count_by_status,
    filter, filter_by_status,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "TaskList - in-memory task list manager with search and status counters")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/tasklist/tasklist.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL to import seed tasks from
    #[arg(long)]
    seed_url: Option<String>,

    /// JSONL file to import seed tasks from
    #[arg(long, conflicts_with = "seed_url")]
    seed_file: Option<PathBuf>,

    /// Maximum number of seed tasks to import
    #[arg(long)]
    seed_limit: Option<usize>,

    /// Start with an empty list
    #[arg(long)]
    no_seed: bool,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };

        if let Some(url) = &self.seed_url {
            config.seed_url = url.clone();
            config.seed_file = None;
        }
        if let Some(path) = &self.seed_file {
            config.seed_file = Some(path.clone());
        }
        if let Some(limit) = self.seed_limit {
            config.seed_limit = limit;
        }
        if self.no_seed {
            config.seed_enabled = false;
        }

        Ok(config)
    }
}

/// One line typed at the prompt
#[derive(Parser)]
#[command(name = "tasklist", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every task
    List,

    /// Show tasks whose title or description contains TERM
    Search { term: Vec<String> },

    /// Show tasks with the given status (To Do, In Progress, Done)
    Status {
        #[arg(required = true, num_args = 1..)]
        status: Vec<String>,
    },

    /// Show the task counters
    Counts,

    /// Add a task
    Add {
        #[arg(required = true)]
        title: Vec<String>,

        #[arg(short, long, num_args = 1..)]
        description: Option<Vec<String>>,

        /// To Do, In Progress or Done
        #[arg(short, long, num_args = 1..)]
        status: Option<Vec<String>>,
    },

    /// Change the title, description or status of a task
    Update {
        id: u64,

        #[arg(short, long, num_args = 1..)]
        title: Option<Vec<String>>,

        #[arg(short, long, num_args = 1..)]
        description: Option<Vec<String>>,

        /// To Do, In Progress or Done
        #[arg(short, long, num_args = 1..)]
        status: Option<Vec<String>>,
    },

    /// Delete a task
    Delete { id: u64 },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Status typed as one or more words, e.g. `In Progress` or `in-progress`
fn parse_status(words: &[String]) -> Result<TaskStatus> {
    words.join(" ").parse()
}

fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the table
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    let mut store = TaskStore::with_options(config.store_options());
    let events = store.subscribe();
    let shared = store.into_shared();

    // Seeding runs in the background; the shell is usable straight away
    if let Some(source) = config.seed_source() {
        SeedLoader::new(source).spawn(shared.clone());
    }

    println!("{}", "Task List Manager".bold());
    println!("Type `help` for commands.\n");

    run_shell(&shared, &events)
}

fn run_shell(shared: &SharedStore, events: &Receiver<StoreEvent>) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            print_events(events);
            continue;
        }

        match Line::try_parse_from(words) {
            Ok(Line { command: Command::Quit }) => break,
            Ok(Line { command }) => {
                if let Err(e) = execute(shared, command) {
                    println!("{}", e.to_string().red());
                }
            }
            Err(e) => {
                let _ = e.print();
            }
        }

        print_events(events);
    }

    Ok(())
}

fn execute(shared: &SharedStore, command: Command) -> Result<()> {
    let mut store = store::lock(shared)?;

    match command {
        Command::List => print_tasks(store.list().iter()),
        Command::Search { term } => print_tasks(filter(store.list(), &term.join(" "))),
        Command::Status { status } => print_tasks(filter_by_status(store.list(), parse_status(&status)?)),
        Command::Counts => print_counts(&count_by_status(store.list())),
        Command::Add {
            title,
            description,
            status,
        } => {
            let input = NewTask {
                title: title.join(" "),
                description: description.map(|words| words.join(" ")),
                status: status.as_deref().map(parse_status).transpose()?,
            };
            store.add(input)?;
        }
        Command::Update {
            id,
            title,
            description,
            status,
        } => {
            let patch = TaskPatch {
                title: title.map(|words| words.join(" ")),
                description: description.map(|words| words.join(" ")),
                status: status.as_deref().map(parse_status).transpose()?,
            };
            if !store.update(id, patch)? {
                println!("No task with id {}", id);
            }
        }
        Command::Delete { id } => {
            if !store.remove(id) {
                println!("No task with id {}", id);
            }
        }
        Command::Quit => {}
    }

    Ok(())
}

fn print_events(events: &Receiver<StoreEvent>) {
    for event in events.try_iter() {
        println!("{}", event.to_string().green());
    }
}

fn status_colored(status: TaskStatus, text: String) -> ColoredString {
    match status {
        TaskStatus::ToDo => text.red(),
        TaskStatus::InProgress => text.blue(),
        TaskStatus::Done => text.green(),
    }
}

fn print_counts(counts: &StatusCounts) {
    println!("{}", "Task Counters:".bold());
    for (status, count) in counts.iter() {
        println!("{}", status_colored(status, format!("{:<12} {}", format!("{}:", status), count)));
    }
}

fn print_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) {
    let tasks: Vec<&Task> = tasks.into_iter().collect();
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }

    let title_width = tasks.iter().map(|t| t.title.chars().count()).max().unwrap_or(0).max(5);
    let desc_width = tasks
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(0)
        .max(11);

    println!(
        "{}",
        format!(
            "{:>4}  {:<tw$}  {:<dw$}  {}",
            "ID",
            "Title",
            "Description",
            "Status",
            tw = title_width,
            dw = desc_width
        )
        .bold()
    );
    for task in tasks {
        println!(
            "{:>4}  {:<tw$}  {:<dw$}  {}",
            task.id,
            task.title,
            task.description,
            status_colored(task.status, task.status.to_string()),
            tw = title_width,
            dw = desc_width
        );
    }
}
