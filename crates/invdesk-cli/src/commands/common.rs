//! Helpers shared by the subcommands.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use console::Style;
use tracing::debug;

use invdesk_core::automation::{self, KeySink, KeystrokeAutomator};
use invdesk_core::models::config::InvdeskConfig;
use invdesk_core::models::invoice::Invoice;
use invdesk_core::view::{Displayable, ListModel, RowTag};
use invdesk_core::Controller;

/// Controller driving the automator selected in the configuration.
pub type DeskController = Controller<KeystrokeAutomator<Box<dyn KeySink>>>;

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invdesk")
        .join("config.json")
}

/// Config file in effect: the `--config` path or the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; the default one may not.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<InvdeskConfig> {
    if let Some(path) = explicit {
        return InvdeskConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path, e));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using config {}", path.display());
        Ok(InvdeskConfig::from_file(&path)?)
    } else {
        Ok(InvdeskConfig::default())
    }
}

pub fn build_controller(config: &InvdeskConfig) -> anyhow::Result<DeskController> {
    let automator = automation::from_config(&config.automation)?;
    Ok(Controller::new(config, automator))
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Terminal style for a row tag.
pub fn tag_style(tag: RowTag) -> Style {
    match tag {
        RowTag::Even => Style::new(),
        RowTag::Odd => Style::new().dim(),
        RowTag::Named("error") => Style::new().red(),
        RowTag::Named("missing_wo") => Style::new().yellow(),
        RowTag::Named("working") => Style::new().cyan(),
        RowTag::Named("done") => Style::new().green(),
        RowTag::Named("uploaded") => Style::new().blue(),
        RowTag::Named(_) => Style::new().magenta(),
    }
}

/// Visible rows as an aligned table, the selected row marked with `>`.
pub fn render_table(list: &ListModel<Invoice>) -> String {
    let headings = Invoice::headings();
    let rows = list.visible();

    let mut widths: Vec<usize> = headings.iter().map(|h| h.chars().count()).collect();
    for (_, _, row) in &rows {
        for (width, value) in widths.iter_mut().zip(row.values()) {
            *width = (*width).max(value.chars().count());
        }
    }

    let pad = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    let header: Vec<String> = headings.iter().map(|h| h.to_string()).collect();
    let mut out = format!("    {}\n", Style::new().bold().apply_to(pad(&header)));

    for (position, tag, row) in &rows {
        let marker = if list.selected_key() == Some(row.key()) {
            '>'
        } else {
            ' '
        };
        out.push_str(&format!(
            "{}{:>3} {}\n",
            marker,
            position,
            tag_style(*tag).apply_to(pad(row.values()))
        ));
    }
    out
}

/// Column index for a heading name (case-insensitive) or a number.
pub fn column_index(column: &str) -> anyhow::Result<usize> {
    let headings = Invoice::headings();
    if let Ok(index) = column.parse::<usize>() {
        if index < headings.len() {
            return Ok(index);
        }
    }
    headings
        .iter()
        .position(|h| h.eq_ignore_ascii_case(column.trim()))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown column {:?}, expected one of: {}",
                column,
                headings.join(", ")
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("amount").unwrap(), 5);
        assert_eq!(column_index("Work order").unwrap(), 6);
        assert_eq!(column_index("0").unwrap(), 0);
        assert!(column_index("42").is_err());
        assert!(column_index("vat").is_err());
    }

    #[test]
    fn test_render_table_marks_selection() {
        console::set_colors_enabled(false);
        let mut list = ListModel::new(3);
        list.set_content(vec![Invoice::unrecognized("/w/a.pdf"), Invoice::unrecognized("/w/b.pdf")]);
        list.select("b.pdf");

        let table = render_table(&list);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Work order"));
        assert!(lines[1].starts_with("   0 a.pdf"));
        assert!(lines[2].starts_with(">  1 b.pdf"));
    }
}
