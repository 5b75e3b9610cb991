//! CLI command implementations

use anyhow::{Result, bail};
use colored::Colorize;
use helpdesk_core::{
    Category, NewTicket, Priority, SortOrder, Status, Store, TicketFilter, TicketService,
};
use tabled::{Table, Tabled};

pub fn init(prefix: &str) -> Result<()> {
    let store = Store::init(prefix)?;
    println!(
        "{} Initialized helpdesk in {}",
        "✓".green(),
        store.helpdesk_dir().display()
    );
    println!("  Record prefix: {}", prefix);
    Ok(())
}

pub fn create(
    title: &str,
    description: &str,
    created_by: &str,
    category: &str,
    priority: &str,
    json: bool,
) -> Result<()> {
    let mut service = TicketService::open()?;

    let new = NewTicket {
        title: title.to_string(),
        description: description.to_string(),
        created_by: created_by.to_string(),
        category: category.parse::<Category>()?,
        priority: priority.parse::<Priority>()?,
    };

    let ticket = service.create_ticket(new)?;

    if json {
        println!("{}", serde_json::to_string(&ticket)?);
    } else {
        println!("{} Created ticket: {}", "✓".green(), ticket.id);
        println!("  Title:    {}", ticket.title);
        println!("  Category: {}", ticket.category);
        println!("  Priority: {}", ticket.priority);
    }

    Ok(())
}

#[derive(Tabled)]
struct TicketRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "PRI")]
    priority: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "COMMENTS")]
    comments: usize,
    #[tabled(rename = "TITLE")]
    title: String,
}

pub fn list(
    status: Option<String>,
    priority: Option<String>,
    category: Option<String>,
    search: Option<String>,
    oldest: bool,
    all: bool,
    json: bool,
) -> Result<()> {
    let service = TicketService::open()?;
    let config = service.config()?;

    let filter = TicketFilter {
        status: status.as_deref().map(str::parse).transpose()?,
        priority: priority.as_deref().map(str::parse).transpose()?,
        category: category.as_deref().map(str::parse).transpose()?,
        search,
        sort: if oldest {
            SortOrder::Oldest
        } else {
            SortOrder::Newest
        },
    };

    let mut tickets = service.list_tickets(&filter);

    // Hide closed tickets unless asked for explicitly
    if !all && filter.status.is_none() && !config.show_closed {
        tickets.retain(|t| t.status != Status::Closed);
    }

    if json {
        println!("{}", serde_json::to_string(&tickets)?);
    } else if tickets.is_empty() {
        println!("No tickets found");
    } else {
        let max_title = config.display.max_title_length;
        let rows: Vec<TicketRow> = tickets
            .iter()
            .map(|t| TicketRow {
                id: t.id.clone(),
                status: t.status.to_string(),
                priority: t.priority.to_string(),
                category: t.category.to_string(),
                comments: t.comment_count,
                title: truncate(&t.title, max_title),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    Ok(())
}

pub fn show(id: &str, json: bool) -> Result<()> {
    let service = TicketService::open()?;
    let config = service.config()?;
    let details = service.get_ticket(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    let ticket = &details.ticket;
    let date_format = &config.display.date_format;

    println!("{} {}", ticket.id.cyan().bold(), ticket.title.bold());
    println!();
    println!("Status:   {}", status_colored(ticket.status));
    println!("Priority: {}", ticket.priority);
    println!("Category: {}", ticket.category);
    println!("Opened by: {}", ticket.created_by);
    println!("Created:  {}", ticket.created_at.format(date_format));
    println!("Updated:  {}", ticket.updated_at.format(date_format));
    println!();
    println!("{}", "Description:".bold());
    println!("{}", ticket.description);

    if !details.comments.is_empty() {
        println!();
        println!("{}", format!("Comments ({}):", details.comments.len()).bold());
        for comment in &details.comments {
            println!(
                "  [{}] {}: {}",
                comment.created_at.format(date_format),
                comment.author.cyan(),
                comment.message
            );
        }
    }

    Ok(())
}

pub fn comment(id: &str, author: &str, message: &str, json: bool) -> Result<()> {
    let mut service = TicketService::open()?;
    let comment = service.add_comment(id, author, message)?;

    if json {
        println!("{}", serde_json::to_string(&comment)?);
    } else {
        println!("{} Commented on {}", "✓".green(), id);
    }

    Ok(())
}

pub fn status(id: &str, status: &str, json: bool) -> Result<()> {
    let mut service = TicketService::open()?;
    let requested: Status = status.parse()?;
    let change = service.update_status(id, requested)?;

    if json {
        println!("{}", serde_json::to_string(&change)?);
    } else {
        println!(
            "{} {} {} -> {}",
            "✓".green(),
            change.message,
            id,
            status_colored(change.status)
        );
    }

    Ok(())
}

pub fn delete(id: &str, json: bool) -> Result<()> {
    let mut service = TicketService::open()?;
    service.delete_ticket(id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("{} Deleted ticket {} and its comments", "✓".green(), id);
    }

    Ok(())
}

pub fn seed(json: bool) -> Result<()> {
    let mut service = TicketService::open()?;
    let count = service.seed_demo_data()?;

    if json {
        println!("{}", serde_json::json!({ "seeded": count }));
    } else if count == 0 {
        println!("Store already has tickets; nothing seeded");
    } else {
        println!("{} Seeded {} demo tickets", "✓".green(), count);
    }

    Ok(())
}

pub fn config_show(json: bool) -> Result<()> {
    let store = Store::open()?;
    let config = store.config()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("prefix = {}", config.prefix);
        println!("show_closed = {}", config.show_closed);
        println!("api.port = {}", config.api.port);
        println!("display.colors = {}", config.display.colors);
        println!("display.date_format = {}", config.display.date_format);
        println!("display.max_title_length = {}", config.display.max_title_length);
    }

    Ok(())
}

pub fn config_get(key: &str, json: bool) -> Result<()> {
    let store = Store::open()?;
    let config = store.config()?;

    let value = match key {
        "prefix" => config.prefix.clone(),
        "show_closed" => config.show_closed.to_string(),
        "api.port" => config.api.port.to_string(),
        "display.colors" => config.display.colors.to_string(),
        "display.date_format" => config.display.date_format.clone(),
        "display.max_title_length" => config.display.max_title_length.to_string(),
        _ => bail!("Unknown config key: {}", key),
    };

    if json {
        println!("{}", serde_json::json!({ key: value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

pub fn config_set(key: &str, value: &str) -> Result<()> {
    let store = Store::open()?;
    let mut config = store.config()?;

    match key {
        "prefix" => config.prefix = value.to_string(),
        "show_closed" => config.show_closed = value.parse()?,
        "api.port" => config.api.port = value.parse()?,
        "display.colors" => config.display.colors = value.parse()?,
        "display.date_format" => config.display.date_format = value.to_string(),
        "display.max_title_length" => config.display.max_title_length = value.parse()?,
        _ => bail!("Unknown config key: {}", key),
    }

    config.save(&store.config_path())?;
    println!("{} Set {} = {}", "✓".green(), key, value);

    Ok(())
}

fn status_colored(status: Status) -> colored::ColoredString {
    match status {
        Status::Open => "open".white(),
        Status::InProgress => "in_progress".yellow(),
        Status::Closed => "closed".green(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
