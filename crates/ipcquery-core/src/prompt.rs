//! Prompt construction for IPC section lookups.

/// Instruction preamble describing the expected reply shape.
pub const IPC_PROMPT_TEMPLATE: &str = r#"Provide a structured JSON response based on the Indian Penal Code, 1860.
The output should strictly follow this format:

{
  "art section": "[Section Name or Number]",
  "category": "[Category of Crime]",
  "Punishment": "[Punishment as per IPC]",
  "Applicable": "[Who the law applies to]",
  "Brief description": "[Short and unique explanation]"
}

Use concise and clear language. Ensure the details are accurate based on IPC provisions.
"#;

/// Placed between the preamble and the caller's query.
pub const QUERY_SEPARATOR: &str = "\nIPC Section: ";

/// Join `template`, [`QUERY_SEPARATOR`] and `query` into the prompt sent to the model.
///
/// An empty query is allowed and yields a prompt ending in the separator.
pub fn build_prompt(template: &str, query: &str) -> String {
    let mut prompt = String::with_capacity(template.len() + QUERY_SEPARATOR.len() + query.len());
    prompt.push_str(template);
    prompt.push_str(QUERY_SEPARATOR);
    prompt.push_str(query);
    prompt
}
