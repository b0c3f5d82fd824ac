//! Output formatting helpers.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use marquee::{CatalogItem, NoticeLevel, Notices};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print an informational message.
pub fn info(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print one catalog row.
pub fn item_row(item: &CatalogItem) {
    let fields = &item.fields;
    let mut details = Vec::new();
    if let Some(year) = fields.year {
        details.push(year.to_string());
    }
    if let Some(director) = &fields.director {
        details.push(director.clone());
    }
    if let Some(duration) = &fields.duration {
        details.push(duration.clone());
    }

    let details = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };

    println!(
        "{:>8}  {:<7} {}{}",
        item.id.to_string().dimmed(),
        fields.category.as_str().cyan(),
        fields.title.bold(),
        details
    );
}

/// Print every catalog field of one item.
pub fn item_detail(item: &CatalogItem) {
    let fields = &item.fields;
    field("ID", &item.id.to_string());
    field("Title", &fields.title);
    field("Category", fields.category.as_str());
    let optional = [
        ("Director", fields.director.clone()),
        ("Budget", fields.budget.map(|b| b.to_string())),
        ("Location", fields.location.clone()),
        ("Duration", fields.duration.clone()),
        ("Year", fields.year.map(|y| y.to_string())),
        ("Poster", fields.poster.clone()),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            field(label, &value);
        }
    }
}

/// Print and dismiss every pending notice.
pub fn notices(notices: &Notices) {
    for notice in notices.drain() {
        match notice.level {
            NoticeLevel::Success => success(&notice.message),
            NoticeLevel::Error => error(&notice.message),
            NoticeLevel::Info => info(&notice.message),
        }
    }
}

/// Ask a yes/no question on the terminal. Anything but "y" is a no.
pub fn confirm(question: &str) -> bool {
    eprint!("{} [y/N] ", question);
    if io::stderr().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(_) => input.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}
