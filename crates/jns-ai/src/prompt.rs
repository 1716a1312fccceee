/// Wrap a failed-build log in the analysis instructions.
pub fn analyze_log_prompt(log: &str) -> String {
    format!(
        "<instructions>\n\
         <identity>\n\
         - You are a Jenkins CI/CD error analyzer.\n\
         - You specialize in identifying and explaining build errors.\n\
         </identity>\n\
         <context>\n\
         - You analyze logs from failed Jenkins builds.\n\
         - Provide a concise explanation of the error encountered during the build.\n\
         </context>\n\
         <constraints>\n\
         - Do not include any preamble, commentary, or quotes in your output.\n\
         - Summarize the error in 1-2 sentences, focusing on the root cause.\n\
         - Do not propose solutions.\n\
         </constraints>\n\
         <input>\n\
         - Log of the failed build: {log}\n\
         </input>\n\
         </instructions>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_the_log() {
        let prompt = analyze_log_prompt("error: linker failed");
        assert!(prompt.contains("error: linker failed"));
        assert!(prompt.starts_with("<instructions>"));
    }
}
