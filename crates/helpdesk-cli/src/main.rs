//! helpdesk - Small file-backed help-desk ticket tracker
//!
//! No SQL server, no daemon - just JSONL files in .helpdesk/

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "helpdesk")]
#[command(about = "File-backed help-desk ticket tracker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new helpdesk store
    Init {
        /// Record ID prefix
        #[arg(long, default_value = "hd")]
        prefix: String,
    },

    /// Create a new ticket
    Create {
        /// Ticket title
        title: String,

        /// Detailed description
        #[arg(short, long)]
        description: String,

        /// Who is opening the ticket
        #[arg(short = 'b', long = "by")]
        created_by: String,

        /// Category (it, facilities, general)
        #[arg(short, long, default_value = "general")]
        category: String,

        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: String,
    },

    /// List tickets
    List {
        /// Filter by status (open, in_progress, closed)
        #[arg(short, long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(short, long)]
        priority: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Substring match on title or description
        #[arg(long)]
        search: Option<String>,

        /// Oldest first instead of newest first
        #[arg(long)]
        oldest: bool,

        /// Show all including closed
        #[arg(short, long)]
        all: bool,
    },

    /// Show ticket details and comments
    Show {
        /// Ticket ID
        id: String,
    },

    /// Add a comment to a ticket
    Comment {
        /// Ticket ID
        id: String,

        /// Comment body
        message: String,

        /// Comment author
        #[arg(short, long)]
        author: String,
    },

    /// Change a ticket's status
    Status {
        /// Ticket ID
        id: String,

        /// New status (open, in_progress, closed)
        status: String,
    },

    /// Close a ticket (requires at least one comment)
    Close {
        /// Ticket ID
        id: String,
    },

    /// Reopen a ticket
    Reopen {
        /// Ticket ID
        id: String,
    },

    /// Delete a ticket and all of its comments
    Delete {
        /// Ticket ID
        id: String,
    },

    /// Insert demo tickets (no-op when tickets exist)
    Seed,

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Get a specific config value
    Get {
        /// Config key (e.g., "prefix", "display.colors")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { prefix } => commands::init(&prefix),
        Commands::Create {
            title,
            description,
            created_by,
            category,
            priority,
        } => commands::create(&title, &description, &created_by, &category, &priority, cli.json),
        Commands::List {
            status,
            priority,
            category,
            search,
            oldest,
            all,
        } => commands::list(status, priority, category, search, oldest, all, cli.json),
        Commands::Show { id } => commands::show(&id, cli.json),
        Commands::Comment {
            id,
            message,
            author,
        } => commands::comment(&id, &author, &message, cli.json),
        Commands::Status { id, status } => commands::status(&id, &status, cli.json),
        Commands::Close { id } => commands::status(&id, "closed", cli.json),
        Commands::Reopen { id } => commands::status(&id, "open", cli.json),
        Commands::Delete { id } => commands::delete(&id, cli.json),
        Commands::Seed => commands::seed(cli.json),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) => commands::config_show(cli.json),
            Some(ConfigCommands::Get { key }) => commands::config_get(&key, cli.json),
            Some(ConfigCommands::Set { key, value }) => commands::config_set(&key, &value),
            None => commands::config_show(cli.json),
        },
    }
}
