use crate::entry::{Entry, UsageRecommendation};
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::BOOK, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().warn.clone()));
}

pub fn info(label: &str, value: &str) {
    println!(
        "{} {}: {}",
        Icons::INFO.style(theme().info.clone()),
        label.style(theme().dim.clone()),
        value
    );
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn usage(value: UsageRecommendation) -> String {
    value.as_str().style(theme().usage(value)).to_string()
}

pub fn phase(name: &str) {
    println!();
    println!(
        "{} {}",
        Icons::GEAR.style(theme().info.clone()),
        name.style(theme().header.clone())
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

/// One entry with its attributes, as shown by `styledb show`
pub fn entry_card(entry: &Entry) {
    println!(
        "{} {} {}",
        Icons::FILE,
        entry.name.style(theme().header.clone()),
        muted(&entry.id.to_string())
    );
    summary_row("class:", &entry.class);
    summary_row("type: ", &entry.kind);
    summary_row("use:  ", &usage(entry.use_it));
    summary_row("desc: ", &entry.desc);
}

/// A referenced entry, one per line
pub fn entry_link(icon: &str, entry: &Entry) {
    println!(
        "    {} {} {} {}",
        icon,
        entry.name,
        muted(&entry.id.to_string()),
        usage(entry.use_it)
    );
}
