use dialoguer::{Confirm, FuzzySelect, Input, Password, Select};

use jns_api::model::{ParameterDefinition, WorkflowJob};

use crate::error::CliError;
use crate::theme::jns_theme;

pub fn input(prompt: &str, default: Option<&str>) -> Result<String, CliError> {
    let theme = jns_theme();
    let mut builder = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(default) = default {
        builder = builder.default(default.to_string());
    }
    builder
        .interact_text()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

pub fn password(prompt: &str) -> Result<String, CliError> {
    Password::with_theme(&jns_theme())
        .with_prompt(prompt)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

pub fn confirm(prompt: &str, default: bool) -> Result<bool, CliError> {
    Confirm::with_theme(&jns_theme())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Pick one item; fuzzy matching kicks in for longer lists.
pub fn select(prompt: &str, items: &[String]) -> Result<usize, CliError> {
    let theme = jns_theme();
    if items.len() > 5 {
        FuzzySelect::with_theme(&theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| CliError::Prompt(e.to_string()))
    } else {
        Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(|e| CliError::Prompt(e.to_string()))
    }
}

/// Ask for every parameter the job declares, honoring its type.
/// Returns `name=value` pairs ready for the trigger query string.
pub fn prompt_parameters(job: &WorkflowJob) -> Result<Vec<String>, CliError> {
    let mut filled = Vec::new();
    for definition in job.parameter_definitions() {
        let value = prompt_parameter(definition)?;
        filled.push(format!("{}={value}", definition.name));
    }
    Ok(filled)
}

fn prompt_parameter(definition: &ParameterDefinition) -> Result<String, CliError> {
    let default = definition.default_value();
    match definition.kind.as_str() {
        "BooleanParameterDefinition" => {
            let default = default.as_deref() == Some("true");
            Ok(confirm(&definition.name, default)?.to_string())
        }
        "ChoiceParameterDefinition" => {
            if definition.choices.is_empty() {
                return Err(CliError::usage(format!(
                    "choice parameter {} has no choices",
                    definition.name
                )));
            }
            let index = select(&definition.name, &definition.choices)?;
            Ok(definition.choices[index].clone())
        }
        "PasswordParameterDefinition" => password(&definition.name),
        // StringParameterDefinition, TextParameterDefinition, and
        // anything a plugin invents degrade to free text.
        _ => input(&definition.name, default.as_deref()),
    }
}
