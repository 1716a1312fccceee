use std::time::Duration;

use jns_config::{AiProvider, AiSettings};
use jns_runner::{AnsiTerminal, CommandParameters, CommandRunner, Spinner};

use crate::error::CliError;
use crate::prompts;

const TEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Prompt for the provider, endpoint, model, and key, then save them.
pub fn configure() -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let mut settings = jns_config::load(&dir)?;

    let providers: Vec<String> = AiProvider::SUPPORTED
        .iter()
        .map(|p| p.as_str().to_string())
        .collect();
    let provider = AiProvider::SUPPORTED[prompts::select("Select AI provider", &providers)?];

    let endpoint = prompts::input("Endpoint", Some(provider.default_endpoint()))?;
    let model = prompts::input("Model", None)?;
    let api_key = match provider {
        AiProvider::OpenAi => Some(prompts::password("API key")?),
        AiProvider::Ollama => None,
    };

    settings.ai = Some(AiSettings {
        provider,
        endpoint: endpoint.trim_end_matches('/').to_string(),
        model,
        api_key,
    });
    jns_config::save(&dir, &settings)?;
    println!("Settings are saved.");
    Ok(())
}

/// Send a canned prompt under a spinner to prove the provider answers.
pub fn test() -> Result<(), CliError> {
    let dir = jns_config::config_dir()?;
    let settings = jns_config::load(&dir)?;
    let ai_settings = settings.ai.as_ref().ok_or(jns_ai::AiError::NotConfigured)?;
    let llm = jns_ai::LlmClient::from_settings(ai_settings)?;

    let mut reply = None;
    let mut runner = CommandRunner::new(Box::new(AnsiTerminal::stdout()));
    runner.run(
        || {
            reply = Some(llm.generate("Who are you?")?);
            Ok(())
        },
        CommandParameters::new(
            Spinner::new("Testing AI connection")
                .complete_message("Connection test passed")
                .error_message("Connection test failed"),
            || Ok(()),
        )
        .timeout(TEST_TIMEOUT),
    )?;

    if let Some(reply) = reply {
        println!("AI response: {reply}");
    }
    Ok(())
}
