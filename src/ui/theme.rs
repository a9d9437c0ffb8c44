use owo_colors::Style;
use std::sync::OnceLock;
use crate::entry::UsageRecommendation;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub use_yes: Style,
    pub use_no: Style,
    pub use_avoid: Style,
    pub use_unknown: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            use_yes: Style::new().green(),
            use_no: Style::new().red(),
            use_avoid: Style::new().yellow(),
            use_unknown: Style::new().bright_black().italic(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
            use_yes: Style::new(),
            use_no: Style::new(),
            use_avoid: Style::new(),
            use_unknown: Style::new(),
        }
    }

    /// Style for a usage recommendation value
    pub fn usage(&self, usage: UsageRecommendation) -> Style {
        match usage {
            UsageRecommendation::Use => self.use_yes.clone(),
            UsageRecommendation::DoNotUse => self.use_no.clone(),
            UsageRecommendation::Avoid => self.use_avoid.clone(),
            UsageRecommendation::Unknown => self.use_unknown.clone(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
