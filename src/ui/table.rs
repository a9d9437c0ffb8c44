use crate::loader::LoadSummary;
use crate::storage::DbStats;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: impl ToString) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Link statistics of a finished load
pub fn link_table(summary: &LoadSummary) -> String {
    let links = &summary.links;
    let mut builder = TableBuilder::new();
    builder.add_row("Referenced names", links.names);
    builder.add_row("Resolved", links.resolved);
    builder.add_row("Ambiguous (fan-out)", links.ambiguous);
    builder.add_row("Unresolved (dropped)", links.unresolved);
    builder.add_row("Reference rows", links.edges);
    builder.build()
}

/// Database contents per usage value
pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Entries", stats.entries);
    builder.add_row("References", stats.references);
    for (usage, count) in &stats.by_usage {
        builder.add_row(&format!("use_it = {}", usage), count);
    }
    builder.build()
}
