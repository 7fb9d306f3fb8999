//! Confirmation capability for destructive actions
//!
//! Controllers never open a dialog themselves; they ask an injected
//! [`Confirm`] implementation, which keeps deletion testable without a
//! terminal.

use crate::error::{AgentDeskError, Result};
use async_trait::async_trait;

/// Yes/no question asked before a destructive call
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirm: Send + Sync {
    /// Return `true` to proceed
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Answers yes without asking (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

#[async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!("Auto-confirmed: {}", prompt);
        true
    }
}

/// Asks on the terminal through rustyline; anything but yes declines
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        match tokio::task::spawn_blocking(move || ask(&prompt)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::warn!("Confirmation prompt failed, treating as no: {}", e);
                false
            }
            Err(e) => {
                tracing::warn!("Confirmation prompt task failed, treating as no: {}", e);
                false
            }
        }
    }
}

fn ask(prompt: &str) -> Result<bool> {
    let mut editor =
        rustyline::DefaultEditor::new().map_err(|e| AgentDeskError::Prompt(e.to_string()))?;
    let line = editor
        .readline(&format!("{} [y/N] ", prompt))
        .map_err(|e| AgentDeskError::Prompt(e.to_string()))?;
    Ok(is_affirmative(&line))
}

/// Whether a typed answer means yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yep"));
    }

    #[tokio::test]
    async fn test_assume_yes_always_confirms() {
        assert!(AssumeYes.confirm("Delete everything?").await);
    }

    #[tokio::test]
    async fn test_confirm_usable_as_trait_object() {
        let confirm: Box<dyn Confirm> = Box::new(AssumeYes);
        assert!(confirm.confirm("Clear memory?").await);
    }
}
