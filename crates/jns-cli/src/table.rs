//! The `jns list` table: id, status symbol, job name.

use console::Style;

use jns_api::model::{Job, JobKind};

pub struct JobRow {
    pub id: u32,
    pub symbol: String,
    pub name: String,
}

impl JobRow {
    pub fn new(id: u32, job: &Job) -> Self {
        let name = if job.kind() == JobKind::Folder {
            Style::new().bold().apply_to(&job.name).to_string()
        } else {
            job.name.clone()
        };
        Self {
            id,
            symbol: status_symbol(job),
            name,
        }
    }
}

/// One character per job state, colored like the Jenkins ball; a `*`
/// suffix marks a running build.
fn status_symbol(job: &Job) -> String {
    if job.kind() == JobKind::Folder {
        return Style::new().bold().apply_to("\u{1F4C1}").to_string();
    }
    let color = job.color.as_deref().unwrap_or("");
    let running = color.ends_with("_anime");
    let base = color.split('_').next().unwrap_or("");
    let (glyph, style) = match base {
        "blue" => ("\u{2714}", Style::new().green()),
        "red" => ("\u{2718}", Style::new().red()),
        "yellow" => ("!", Style::new().yellow()),
        "aborted" => ("A", Style::new().yellow()),
        "disabled" => ("D", Style::new().yellow()),
        "notbuilt" => ("N", Style::new().yellow()),
        "grey" => ("?", Style::new().yellow()),
        _ => (" ", Style::new()),
    };
    let text = if running {
        format!("{glyph}*")
    } else {
        glyph.to_string()
    };
    style.apply_to(text).to_string()
}

/// Lay the rows out with 2-space gutters and a dashed frame.
pub fn job_table(rows: &[JobRow]) -> Vec<String> {
    let id_width = rows
        .iter()
        .map(|r| r.id.to_string().len())
        .chain(["ID".len()])
        .max()
        .unwrap_or(2);
    let symbol_width = rows
        .iter()
        .map(|r| visible_width(&r.symbol))
        .chain(["St".len()])
        .max()
        .unwrap_or(2);
    let name_width = rows
        .iter()
        .map(|r| visible_width(&r.name))
        .chain(["Name".len()])
        .max()
        .unwrap_or(4);

    let frame = format!("  {}", "-".repeat(id_width + symbol_width + name_width + 7));
    let mut lines = vec![frame.clone()];
    lines.push(format!(
        "  {:<id_width$}  {:<symbol_width$}  {:<name_width$} ",
        "ID", "St", "Name"
    ));
    for row in rows {
        lines.push(format!(
            "  {:<id_width$}  {}{}  {} ",
            row.id,
            row.symbol,
            " ".repeat(symbol_width.saturating_sub(visible_width(&row.symbol))),
            row.name
        ));
    }
    lines.push(frame);
    lines
}

/// Column width of a cell, ignoring ANSI styling.
fn visible_width(text: &str) -> usize {
    console::measure_text_width(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, color: Option<&str>, class_name: &str) -> Job {
        Job {
            name: name.to_string(),
            url: format!("http://j/job/{name}/"),
            color: color.map(str::to_string),
            class_name: Some(class_name.to_string()),
        }
    }

    #[test]
    fn successful_job_gets_a_green_check() {
        let row = JobRow::new(
            1,
            &job("deploy", Some("blue"), "org.jenkinsci.plugins.workflow.job.WorkflowJob"),
        );
        assert_eq!(console::strip_ansi_codes(&row.symbol), "\u{2714}");
    }

    #[test]
    fn running_job_gets_a_star_suffix() {
        let row = JobRow::new(
            1,
            &job("deploy", Some("red_anime"), "org.jenkinsci.plugins.workflow.job.WorkflowJob"),
        );
        assert_eq!(console::strip_ansi_codes(&row.symbol), "\u{2718}*");
    }

    #[test]
    fn table_frames_and_aligns_rows() {
        let rows = vec![
            JobRow::new(1, &job("a", Some("blue"), "hudson.model.FreeStyleProject")),
            JobRow::new(
                12,
                &job("longer-name", Some("red"), "hudson.model.FreeStyleProject"),
            ),
        ];
        let lines = job_table(&rows);
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.first(), lines.last());
        assert!(lines[1].contains("ID"));
        assert!(lines[1].contains("Name"));
        assert!(
            console::strip_ansi_codes(&lines[3]).contains("12"),
            "got {}",
            lines[3]
        );
    }
}
