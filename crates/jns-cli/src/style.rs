use console::Style;
use jns_api::model::Status;

pub fn error_prefix() -> String {
    Style::new().red().bold().apply_to("error:").to_string()
}

pub fn check_mark() -> String {
    Style::new().green().bold().apply_to("\u{2714}").to_string()
}

pub fn cross_mark() -> String {
    Style::new().red().bold().apply_to("\u{2718}").to_string()
}

pub fn label(s: &str) -> String {
    Style::new().cyan().apply_to(s).to_string()
}

pub fn heading(s: &str) -> String {
    Style::new().yellow().apply_to(s).to_string()
}

pub fn dim(s: &str) -> String {
    Style::new().dim().apply_to(s).to_string()
}

pub fn bold(s: &str) -> String {
    Style::new().bold().apply_to(s).to_string()
}

/// Status text in its conventional color: green for success, red for
/// failures, yellow for aborted or still running.
pub fn colored_status(status: Status) -> String {
    let style = match status {
        Status::Success => Style::new().green(),
        Status::Failed | Status::Failure => Style::new().red(),
        Status::Aborted | Status::InProgress => Style::new().yellow(),
        _ => Style::new(),
    };
    style.apply_to(status.as_str()).to_string()
}
