use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::resolve_api_url,
    list_view::{display_name, DELETE_CONFIRMATION_PROMPT},
    AppController, FormField, HttpUsersApi, Intent, LocalUsersApi, UsersApi,
};
use shared::domain::UserId;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line administration for registered users")]
struct Args {
    /// Users API base url; falls back to USER_ADMIN_API_URL, then the local default.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Work against an in-memory sample collection.
    #[arg(long, global = true)]
    offline: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show registered users, optionally filtered by email or name.
    List {
        #[arg(long)]
        search: Option<String>,
        /// Print the filtered records as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
    },
    /// Change some fields of an existing user; omitted fields keep their value.
    Edit {
        id: i64,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<String>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let api: Box<dyn UsersApi> = if args.offline {
        Box::new(LocalUsersApi::with_sample_users())
    } else {
        let url = resolve_api_url(args.api_url);
        Box::new(HttpUsersApi::new(&url).context("failed to configure users api")?)
    };

    let mut controller = AppController::new();
    let startup = controller.start().into_iter().collect();
    controller.settle(api.as_ref(), startup).await;

    match args.command {
        Command::List { search, json } => {
            if let Some(term) = search {
                controller.dispatch(Intent::SearchChanged(term));
            }
            if json {
                let users = controller.filtered_users();
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else {
                print_table(&mut controller);
            }
        }
        Command::Create { email, name, age } => {
            fill_form(&mut controller, Some(email), Some(name), Some(age));
            submit(&mut controller, api.as_ref()).await?;
            if let Some(user) = controller.users().last() {
                println!("Created user #{} ({})", user.id.0, user.email);
            }
        }
        Command::Edit {
            id,
            email,
            name,
            age,
        } => {
            let user_id = UserId(id);
            controller.dispatch(Intent::EditRequested(user_id));
            if controller.edit_target().is_none() {
                bail!("user {id} not found");
            }
            fill_form(&mut controller, email, name, age);
            submit(&mut controller, api.as_ref()).await?;
            if let Some(user) = controller.users().iter().find(|u| u.id == user_id) {
                println!(
                    "Updated user #{}: {} / {} / {}",
                    id, user.email, user.name, user.age
                );
            }
        }
        Command::Delete { id, yes } => {
            let user_id = UserId(id);
            controller.list_mut().request_delete(user_id);
            let confirmed = yes || confirm(DELETE_CONFIRMATION_PROMPT)?;
            match controller.list_mut().confirm_delete(confirmed) {
                Some(intent) => {
                    controller.dispatch_and_settle(api.as_ref(), intent).await;
                    fail_on_notification(&controller)?;
                    println!("Deleted user #{id}");
                }
                None => println!("Delete cancelled"),
            }
        }
    }

    Ok(())
}

fn fill_form(
    controller: &mut AppController,
    email: Option<String>,
    name: Option<String>,
    age: Option<String>,
) {
    let values = [
        (FormField::Email, email),
        (FormField::Name, name),
        (FormField::Age, age),
    ];
    for (field, value) in values {
        if let Some(value) = value {
            controller.dispatch(Intent::FieldChanged { field, value });
        }
    }
}

async fn submit(controller: &mut AppController, api: &dyn UsersApi) -> Result<()> {
    let commands = controller.dispatch(Intent::SubmitRequested);
    if let Some(err) = controller.form().last_error() {
        bail!("{err}");
    }
    controller.settle(api, commands).await;
    fail_on_notification(controller)
}

fn fail_on_notification(controller: &AppController) -> Result<()> {
    match controller.notification() {
        Some(notification) => bail!("{}", notification.message),
        None => Ok(()),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "YES"))
}

fn print_table(controller: &mut AppController) {
    let total = controller.users().len();
    println!("Total users registered: {total}");

    let rows: Vec<(i64, String, String, u32)> = controller
        .filtered_users()
        .into_iter()
        .map(|user| (user.id.0, user.email.clone(), display_name(user).into_owned(), user.age))
        .collect();

    if let Some(empty) = controller.list().empty_state(total, rows.len()) {
        println!("{}", empty.message());
        return;
    }

    println!("{:>5}  {:<30}  {:<13}  {:>4}", "ID", "Email", "Name", "Age");
    for (id, email, name, age) in rows {
        println!("{id:>5}  {email:<30}  {name:<13}  {age:>4}");
    }
}
