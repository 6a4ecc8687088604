//! Emergency contact CRUD commands.

use std::io::{BufRead, Write};

use clap::{Args, Subcommand};
use safeline::ContactRow;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::GlobalFlags;
use crate::formatter::{self, OutputFormat};

#[derive(Args, Debug)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub command: ContactsCommands,
}

#[derive(Subcommand, Debug)]
pub enum ContactsCommands {
    /// Add an emergency contact
    Add(AddArgs),

    /// List emergency contacts
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Remove an emergency contact
    Rm(RmArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Contact name
    pub name: String,

    /// Phone number (stored without the country prefix)
    pub mobile: String,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format: table or json
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Contact id (see `contacts list`)
    pub id: i64,

    /// Delete without the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Row presenter for list output.
#[derive(Debug, Serialize, Tabled)]
struct ContactPresenter {
    #[tabled(rename = "ID")]
    #[serde(rename = "Id")]
    id: i64,
    #[tabled(rename = "NAME")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "MOBILE")]
    #[serde(rename = "Mobile")]
    mobile: String,
}

impl From<&ContactRow> for ContactPresenter {
    fn from(row: &ContactRow) -> Self {
        Self {
            id: row.contact.id,
            name: row.contact.name.clone(),
            mobile: row.contact.mobile.clone(),
        }
    }
}

pub async fn execute(args: ContactsArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    match args.command {
        ContactsCommands::Add(args) => add(args, global).await,
        ContactsCommands::List(args) => list(args, global).await,
        ContactsCommands::Rm(args) => rm(args, global).await,
    }
}

async fn add(args: AddArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let mut screen = rt.contacts_screen();

    screen.add_contact(&args.name, &args.mobile)?;
    println!("Contact added successfully");
    Ok(())
}

async fn list(args: ListArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let screen = rt.contacts_screen();

    let presenters: Vec<ContactPresenter> = screen.rows().iter().map(Into::into).collect();

    match OutputFormat::from_str(&args.format)? {
        OutputFormat::Table => {
            if presenters.is_empty() {
                println!("No contacts added yet");
            } else {
                println!("{}", formatter::format_table(&presenters));
            }
        }
        OutputFormat::Json => println!("{}", formatter::format_json(&presenters)?),
    }

    Ok(())
}

async fn rm(args: RmArgs, global: &GlobalFlags) -> anyhow::Result<()> {
    let rt = global.create_runtime()?;
    let mut screen = rt.contacts_screen();

    if !screen.rows().iter().any(|row| row.contact.id == args.id) {
        return Err(
            safeline::SafelineError::NotFound(format!("no contact with id {}", args.id)).into(),
        );
    }

    let prompt = screen.delete_contact(args.id);
    if args.force || confirm_on_stdin()? {
        prompt.confirm()?;
        println!("Contact deleted successfully");
    } else {
        prompt.cancel();
        println!("Aborted");
    }

    Ok(())
}

fn confirm_on_stdin() -> anyhow::Result<bool> {
    print!("Are you sure you want to remove this contact? [y/N] ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
