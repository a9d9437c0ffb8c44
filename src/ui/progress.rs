use indicatif::{HumanDuration, ProgressBar};
use owo_colors::OwoColorize;
use std::time::Duration;
use crate::loader::LoadSummary;
use crate::ui::{theme, Icons};

/// Spinner shown while a blocking step runs. Hidden when stdout is not a terminal.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        Self { pb }
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}

/// Closing lines of a load: elapsed time, then the two counts.
pub fn finish_with_summary(duration: Duration, summary: &LoadSummary) {
    println!();
    println!(
        "{} {}",
        Icons::CHECK.style(theme().success.clone()),
        format!("Complete in {}", HumanDuration(duration)).style(theme().success.clone())
    );
    print!("{}", summary);
}
