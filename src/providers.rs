//! Static catalog of the LLM providers the backend supports
//!
//! Hint text and locality defaults are looked up here from the provider
//! identifier alone; nothing in this module talks to the network.

use std::fmt;

/// Provider identifiers accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    LmStudio,
    Server,
    OpenAi,
    DeepSeek,
    HuggingFace,
    Together,
    Google,
    OpenRouter,
}

impl ProviderKind {
    /// Every supported provider, in display order
    pub const ALL: [ProviderKind; 9] = [
        Self::Ollama,
        Self::LmStudio,
        Self::Server,
        Self::OpenAi,
        Self::DeepSeek,
        Self::HuggingFace,
        Self::Together,
        Self::Google,
        Self::OpenRouter,
    ];

    /// Parse a provider identifier as sent over the wire
    ///
    /// # Examples
    ///
    /// ```
    /// use agentdesk::providers::ProviderKind;
    ///
    /// assert_eq!(ProviderKind::parse_str("lm-studio"), Some(ProviderKind::LmStudio));
    /// assert_eq!(ProviderKind::parse_str("Ollama"), Some(ProviderKind::Ollama));
    /// assert_eq!(ProviderKind::parse_str("mystery"), None);
    /// ```
    pub fn parse_str(s: &str) -> Option<Self> {
        let name = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::LmStudio => "lm-studio",
            Self::Server => "server",
            Self::OpenAi => "openai",
            Self::DeepSeek => "deepseek",
            Self::HuggingFace => "huggingface",
            Self::Together => "together",
            Self::Google => "google",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Whether the provider normally runs on the user's machine
    pub fn is_local_by_default(&self) -> bool {
        matches!(self, Self::Ollama | Self::LmStudio | Self::Server)
    }

    /// Setup hint shown next to the provider selection
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Ollama => {
                "Run `ollama serve` and use its address (default http://127.0.0.1:11434)."
            }
            Self::LmStudio => {
                "Start the LM Studio local server and use its address (default http://127.0.0.1:1234)."
            }
            Self::Server => "Point to a self-hosted inference server reachable from the backend.",
            Self::OpenAi => "Requires OPENAI_API_KEY on the backend; the address is ignored.",
            Self::DeepSeek => "Requires DEEPSEEK_API_KEY on the backend; the address is ignored.",
            Self::HuggingFace => "Requires HUGGINGFACE_API_KEY on the backend.",
            Self::Together => "Requires TOGETHER_API_KEY on the backend.",
            Self::Google => "Requires GOOGLE_API_KEY on the backend.",
            Self::OpenRouter => "Requires OPENROUTER_API_KEY on the backend.",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hint text for a provider identifier
///
/// Unknown identifiers get a generic hint instead of an error.
pub fn provider_hint(provider_name: &str) -> &'static str {
    ProviderKind::parse_str(provider_name)
        .map(|kind| kind.hint())
        .unwrap_or("Unknown provider; the backend may reject it when settings are applied.")
}
