use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tweeter_core::{NormalizedResult, Session};

/// Spinner shown while a call to the API is in flight
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

pub fn print_failure(result: &NormalizedResult) {
    eprintln!("{} {}", "Error:".red().bold(), result.message.red());
}

/// Print the profile held in the session
pub fn print_profile(session: &Session) {
    let Some(user) = session.profile() else {
        println!("{}", "Logged in, but no profile is stored.".yellow());
        return;
    };

    let field = |label: &str, value: Option<&str>| {
        println!("  {:<10} {}", format!("{}:", label).cyan(), value.unwrap_or("-"));
    };
    println!("{}", "Profile".bold());
    field("Username", user.username.as_deref());
    field("Name", user.display_name());
    field("Last name", user.last_name.as_deref());
    field("Email", user.email.as_deref());
    for (key, value) in &user.extra {
        if key == "firstName" {
            continue;
        }
        println!("  {:<10} {}", format!("{}:", key).cyan(), value);
    }
}
