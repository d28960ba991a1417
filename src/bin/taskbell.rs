//! Terminal front-end for the reminder desk.
//!
//! Usage: cargo run --bin taskbell

use anyhow::Result;
use dialoguer::{Confirm, Input, Select};
use dotenvy::dotenv;
use log::{error, info};
use std::sync::Arc;

use taskbell::console::{self, Command, DeleteTarget, HELP_TEXT};
use taskbell::core::Config;
use taskbell::features::reminders::{
    CommandSpeaker, ConsoleSurface, DeliverySettings, HttpAudioCue, ReminderDelivery,
};
use taskbell::features::tasks::TaskForm;
use taskbell::{ReminderDesk, SqliteStore};

const MERIDIEMS: [&str; 2] = ["AM", "PM"];
const REPEATS: [&str; 3] = ["none", "daily", "weekly"];
const PRIORITIES: [&str; 3] = ["low", "medium", "high"];

fn read_command() -> Result<String> {
    let line: String = Input::new()
        .with_prompt("taskbell")
        .allow_empty(true)
        .interact_text()?;
    Ok(line)
}

fn prompt_form() -> Result<TaskForm> {
    let title: String = Input::new()
        .with_prompt("Task")
        .allow_empty(true)
        .interact_text()?;
    let date: String = Input::new()
        .with_prompt("Date (YYYY-MM-DD)")
        .allow_empty(true)
        .interact_text()?;
    let hour: String = Input::new()
        .with_prompt("Hour (1-12)")
        .allow_empty(true)
        .interact_text()?;
    let minute: String = Input::new()
        .with_prompt("Minute (0-59)")
        .allow_empty(true)
        .interact_text()?;
    let meridiem = Select::new()
        .with_prompt("AM/PM")
        .items(&MERIDIEMS)
        .default(0)
        .interact()?;
    let repeat = Select::new()
        .with_prompt("Repeat")
        .items(&REPEATS)
        .default(0)
        .interact()?;
    let priority = Select::new()
        .with_prompt("Priority")
        .items(&PRIORITIES)
        .default(0)
        .interact()?;
    let tags: String = Input::new()
        .with_prompt("Tags (comma separated)")
        .allow_empty(true)
        .interact_text()?;
    let sound = Confirm::new()
        .with_prompt("Play sound?")
        .default(true)
        .interact()?;

    Ok(TaskForm {
        title,
        date,
        hour,
        minute,
        meridiem: MERIDIEMS[meridiem].to_string(),
        repeat: REPEATS[repeat].to_string(),
        priority: PRIORITIES[priority].to_string(),
        tags,
        sound,
    })
}

async fn handle(desk: &ReminderDesk, command: Command) -> Result<bool> {
    match command {
        Command::Add => {
            let form = tokio::task::spawn_blocking(prompt_form).await??;
            match desk.add_task(&form).await {
                Ok(task) => println!("✅ Added [{}] {}", task.short_id(), task.title),
                // Already alerted by the desk
                Err(e) if e.is_validation() => {}
                Err(e) => return Err(e.into()),
            }
        }
        Command::List => println!("{}", console::render_tasks(&desk.tasks().await?)),
        Command::Delete(arg) => {
            let tasks = desk.tasks().await?;
            let deleted = match console::resolve_target(&tasks, &arg) {
                DeleteTarget::Id(id) => desk.delete_task(id).await?.into_iter().count(),
                DeleteTarget::Title(title) => desk.delete_by_title(&title).await?.len(),
            };
            if deleted == 0 {
                println!("❌ No task matches '{arg}'.");
            } else {
                println!("🗑️ Moved {deleted} task(s) to history.");
            }
        }
        Command::History => println!("{}", console::render_history(&desk.history().await?)),
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => return Ok(false),
        Command::Unknown(line) => println!("Unknown command: {line}\n\n{HELP_TEXT}"),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting taskbell...");

    let store = Arc::new(SqliteStore::open(&config.store_path)?);
    let delivery = Arc::new(ReminderDelivery::new(
        Arc::new(ConsoleSurface::new(config.notification_permission)),
        Arc::new(CommandSpeaker::new(config.speech_command.clone())),
        Arc::new(HttpAudioCue::new(config.audio_player.clone())),
        DeliverySettings::from(&config),
    ));
    let desk = ReminderDesk::new(store, delivery).with_rearm_on_load(config.rearm_on_load);

    let tasks = desk.bootstrap().await?;
    println!("{}", console::render_tasks(&tasks));
    println!("\n{HELP_TEXT}\n");

    loop {
        let line = tokio::task::spawn_blocking(read_command).await??;
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match handle(&desk, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error!("Command failed: {e:#}"),
        }
    }

    info!(
        "Shutting down with {} pending reminder(s)",
        desk.scheduler().pending()
    );
    Ok(())
}
