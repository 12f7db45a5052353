use clinkding::error::{Error, Result};
use console::Term;
use dialoguer::{Confirm, Input, Password};

fn prompt_error(err: dialoguer::Error) -> Error {
    Error::Validation(format!("prompt failed: {}", err))
}

/// Whether an interactive confirmation can be shown.
pub fn interactive() -> bool {
    Term::stdout().is_term() && Term::stderr().is_term()
}

/// Asks a yes/no question defaulting to "no".
pub fn confirm(question: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .interact()
        .map_err(prompt_error)
}

pub fn input(label: &str, initial: Option<&str>) -> Result<String> {
    let mut prompt = Input::<String>::new().with_prompt(label);
    if let Some(initial) = initial.filter(|v| !v.is_empty()) {
        prompt = prompt.default(initial.to_string());
    }
    prompt
        .interact_text()
        .map(|v| v.trim().to_string())
        .map_err(prompt_error)
}

pub fn secret(label: &str) -> Result<String> {
    Password::new()
        .with_prompt(label)
        .interact()
        .map(|v| v.trim().to_string())
        .map_err(prompt_error)
}

/// Prompt text for deleting `kind` `#id`, quoting `name` when there is one.
pub fn delete_question(kind: &str, id: u64, name: &str) -> String {
    if name.is_empty() {
        format!("Delete {} #{}?", kind, id)
    } else {
        format!("Delete {} #{} \"{}\"?", kind, id, name)
    }
}
