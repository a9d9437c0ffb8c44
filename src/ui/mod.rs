pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    entry_card, entry_link, error, header, info, muted, phase, section, status, success,
    summary_row, usage, warn,
};
pub use progress::{finish_with_summary, Spinner};
pub use table::{link_table, stats_table, TableBuilder};
pub use theme::{theme, Theme};
