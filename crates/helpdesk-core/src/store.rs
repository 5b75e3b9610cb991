//! JSONL store for tickets and comments
//!
//! No SQL server, no daemon - just files under .helpdesk/. Comments are kept
//! per ticket in insertion order, so a stable sort on `created_at` preserves
//! arrival order for equal timestamps.

use crate::config::Config;
use crate::ticket::{Comment, Ticket};
use crate::{Error, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const HELPDESK_DIR: &str = ".helpdesk";
const TICKETS_FILE: &str = "tickets.jsonl";
const COMMENTS_FILE: &str = "comments.jsonl";
const CONFIG_FILE: &str = "config.toml";

/// JSONL-based ticket store
pub struct Store {
    root: PathBuf,
    tickets: HashMap<String, Ticket>,
    comments: HashMap<String, Vec<Comment>>,
}

impl Store {
    /// Find and open the store for the current directory
    pub fn open() -> Result<Self> {
        let root = Self::find_root()?;
        Self::open_at(root)
    }

    /// Open the store rooted at `root` (directory containing .helpdesk)
    pub fn open_at(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.join(HELPDESK_DIR).exists() {
            return Err(Error::NotInitialized);
        }
        let mut store = Self {
            root,
            tickets: HashMap::new(),
            comments: HashMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Initialize a new store in the current directory
    pub fn init(prefix: &str) -> Result<Self> {
        let root = std::env::current_dir()?;
        Self::init_at(root, prefix)
    }

    /// Initialize a new store rooted at `root`
    pub fn init_at(root: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let root = root.into();
        let helpdesk_dir = root.join(HELPDESK_DIR);

        if helpdesk_dir.exists() {
            return Err(Error::AlreadyInitialized(
                helpdesk_dir.display().to_string(),
            ));
        }

        fs::create_dir_all(&helpdesk_dir)?;

        let config = Config {
            prefix: prefix.to_string(),
            ..Default::default()
        };
        config.save(&helpdesk_dir.join(CONFIG_FILE))?;

        fs::write(helpdesk_dir.join(TICKETS_FILE), "")?;
        fs::write(helpdesk_dir.join(COMMENTS_FILE), "")?;

        Ok(Self {
            root,
            tickets: HashMap::new(),
            comments: HashMap::new(),
        })
    }

    /// Find the repository root (directory containing .helpdesk)
    fn find_root() -> Result<PathBuf> {
        let mut current = std::env::current_dir()?;
        loop {
            if current.join(HELPDESK_DIR).exists() {
                return Ok(current);
            }
            if !current.pop() {
                return Err(Error::NotInitialized);
            }
        }
    }

    /// Path to the .helpdesk directory
    pub fn helpdesk_dir(&self) -> PathBuf {
        self.root.join(HELPDESK_DIR)
    }

    /// Path to tickets.jsonl
    pub fn tickets_path(&self) -> PathBuf {
        self.helpdesk_dir().join(TICKETS_FILE)
    }

    /// Path to comments.jsonl
    pub fn comments_path(&self) -> PathBuf {
        self.helpdesk_dir().join(COMMENTS_FILE)
    }

    /// Path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.helpdesk_dir().join(CONFIG_FILE)
    }

    /// Load the configured settings
    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path())
    }

    /// Get the configured ID prefix
    pub fn prefix(&self) -> Result<String> {
        Ok(self.config()?.prefix)
    }

    /// Load all records from JSONL
    fn load(&mut self) -> Result<()> {
        for line in read_lines(&self.tickets_path())? {
            let ticket: Ticket = serde_json::from_str(&line)?;
            self.tickets.insert(ticket.id.clone(), ticket);
        }

        // File order per ticket is insertion order
        for line in read_lines(&self.comments_path())? {
            let comment: Comment = serde_json::from_str(&line)?;
            self.comments
                .entry(comment.ticket_id.clone())
                .or_default()
                .push(comment);
        }

        Ok(())
    }

    /// Save all records to JSONL
    pub fn save(&self) -> Result<()> {
        write_lines(&self.tickets_path(), self.tickets.values())?;
        write_lines(
            &self.comments_path(),
            self.comments.values().flat_map(|list| list.iter()),
        )?;
        Ok(())
    }

    /// Get a ticket by ID
    pub fn ticket(&self, id: &str) -> Option<&Ticket> {
        self.tickets.get(id)
    }

    /// Insert a new ticket
    pub fn insert_ticket(&mut self, ticket: Ticket) -> Result<()> {
        if self.tickets.contains_key(&ticket.id) {
            return Err(Error::AlreadyExists(ticket.id));
        }
        self.tickets.insert(ticket.id.clone(), ticket);
        self.save()
    }

    /// Replace an existing ticket
    pub fn update_ticket(&mut self, ticket: Ticket) -> Result<()> {
        if !self.tickets.contains_key(&ticket.id) {
            return Err(Error::NotFound(ticket.id));
        }
        self.tickets.insert(ticket.id.clone(), ticket);
        self.save()
    }

    /// Delete a ticket and all of its comments
    pub fn delete_ticket(&mut self, id: &str) -> Result<()> {
        if self.tickets.remove(id).is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        self.comments.remove(id);
        self.save()
    }

    /// List all tickets
    pub fn tickets(&self) -> Vec<&Ticket> {
        self.tickets.values().collect()
    }

    /// Number of stored tickets
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    /// Append a comment to its ticket
    pub fn insert_comment(&mut self, comment: Comment) -> Result<()> {
        if !self.tickets.contains_key(&comment.ticket_id) {
            return Err(Error::NotFound(comment.ticket_id));
        }
        self.comments
            .entry(comment.ticket_id.clone())
            .or_default()
            .push(comment);
        self.save()
    }

    /// Comments for a ticket, ascending by creation time (stable for ties)
    pub fn comments(&self, ticket_id: &str) -> Vec<&Comment> {
        let mut comments: Vec<&Comment> = self
            .comments
            .get(ticket_id)
            .map(|list| list.iter().collect())
            .unwrap_or_default();
        comments.sort_by_key(|c| c.created_at);
        comments
    }

    /// Number of comments on a ticket
    pub fn comment_count(&self, ticket_id: &str) -> usize {
        self.comments.get(ticket_id).map_or(0, Vec::len)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        lines.push(line);
    }

    Ok(lines)
}

fn write_lines<'a, T, I>(path: &Path, records: I) -> Result<()>
where
    T: serde::Serialize + 'a,
    I: Iterator<Item = &'a T>,
{
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
