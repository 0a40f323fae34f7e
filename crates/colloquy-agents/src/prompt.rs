//! Prompt template loading and rendering via `minijinja`.
//!
//! Two templates shape every turn: `system` carries the agent's identity,
//! preferences, inline knowledge, and standing behavioral constraints;
//! `request` carries the current situation, retrieved excerpts, and the
//! instruction for this round. Built-in templates are compiled into the
//! binary. Operators can override them from a directory without
//! recompiling.

use std::path::Path;

use colloquy_types::AgentConfig;
use minijinja::{Environment, context};

use crate::error::PromptError;
use crate::knowledge::Document;

/// Separator placed between retrieved excerpts.
pub const KNOWLEDGE_SEPARATOR: &str = "\n\n------\n\n";

const SYSTEM: &str = "system";
const REQUEST: &str = "request";

const BUILTIN_SYSTEM: &str = include_str!("../templates/system.j2");
const BUILTIN_REQUEST: &str = include_str!("../templates/request.j2");

/// Renders the system and request blocks of an agent's turn.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create an engine with the built-in templates.
    pub fn builtin() -> Result<Self, PromptError> {
        Self::from_sources(BUILTIN_SYSTEM.to_owned(), BUILTIN_REQUEST.to_owned())
    }

    /// Create an engine loading `system.j2` and `request.j2` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, PromptError> {
        let system = load_template(dir, "system.j2")?;
        let request = load_template(dir, "request.j2")?;
        Self::from_sources(system, request)
    }

    fn from_sources(system: String, request: String) -> Result<Self, PromptError> {
        let mut env = Environment::new();
        env.add_template_owned(SYSTEM, system)
            .map_err(|source| PromptError::Template {
                name: SYSTEM,
                source,
            })?;
        env.add_template_owned(REQUEST, request)
            .map_err(|source| PromptError::Template {
                name: REQUEST,
                source,
            })?;
        Ok(Self { env })
    }

    /// Render the standing instruction block for an agent.
    pub fn render_system(&self, config: &AgentConfig) -> Result<String, PromptError> {
        let rendered = self
            .env
            .get_template(SYSTEM)
            .and_then(|tpl| {
                tpl.render(context! {
                    name => config.name,
                    short_name => config.short_name,
                    role_description => config.role_description,
                    strategic_preferences => config.strategic_preferences,
                    knowledge => config.knowledge,
                })
            })
            .map_err(|source| PromptError::Template {
                name: SYSTEM,
                source,
            })?;
        Ok(rendered.trim().to_owned())
    }

    /// Render this round's request block.
    ///
    /// Retrieved documents are joined with [`KNOWLEDGE_SEPARATOR`]. With no
    /// documents the knowledge section is omitted entirely.
    pub fn render_request(
        &self,
        global_context: &str,
        retrieved: &[&Document],
    ) -> Result<String, PromptError> {
        let knowledge = retrieved
            .iter()
            .map(|document| document.render())
            .collect::<Vec<_>>()
            .join(KNOWLEDGE_SEPARATOR);

        let rendered = self
            .env
            .get_template(REQUEST)
            .and_then(|tpl| {
                tpl.render(context! {
                    global_context => global_context,
                    knowledge => knowledge,
                })
            })
            .map_err(|source| PromptError::Template {
                name: REQUEST,
                source,
            })?;
        Ok(rendered.trim().to_owned())
    }
}

/// Read a template file from disk.
fn load_template(dir: &Path, filename: &str) -> Result<String, PromptError> {
    let path = dir.join(filename);
    std::fs::read_to_string(&path).map_err(|source| PromptError::Io { path, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> AgentConfig {
        AgentConfig {
            short_name: String::from("CR"),
            role_description: String::from("You represent the Coastal Republic."),
            strategic_preferences: String::from("Keep the ports open."),
            knowledge: String::from("Fishing fleets are idle."),
            ..AgentConfig::named("Coastal Republic")
        }
    }

    #[test]
    fn system_block_embeds_identity_and_constraints() {
        let engine = PromptEngine::builtin().unwrap();
        let system = engine.render_system(&config()).unwrap();

        assert!(system.contains("Coastal Republic"));
        assert!(system.contains("(code: CR)"));
        assert!(system.contains("You represent the Coastal Republic."));
        assert!(system.contains("Keep the ports open."));
        assert!(system.contains("Fishing fleets are idle."));
        assert!(system.contains("Do not speak for other parties"));
    }

    #[test]
    fn request_block_without_knowledge_omits_section() {
        let engine = PromptEngine::builtin().unwrap();
        let request = engine.render_request("Scenario: border dispute", &[]).unwrap();

        assert!(request.contains("Scenario: border dispute"));
        assert!(!request.contains("Retrieved background excerpts"));
        assert!(request.contains("recommended action for this round"));
    }

    #[test]
    fn request_block_joins_excerpts_with_separator() {
        let engine = PromptEngine::builtin().unwrap();
        let first = Document::inline("Tariffs rose in spring.");
        let second = Document::from_file("memo.md", "Convoy routes shifted.");
        let request = engine
            .render_request("Scenario: trade war", &[&first, &second])
            .unwrap();

        assert!(request.contains("Retrieved background excerpts"));
        assert!(request.contains(
            "Tariffs rose in spring.\n\n------\n\n[file: memo.md]\nConvoy routes shifted."
        ));
    }

    #[test]
    fn templates_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system.j2"), "I am {{ name }}.").unwrap();
        std::fs::write(dir.path().join("request.j2"), "Now: {{ global_context }}").unwrap();

        let engine = PromptEngine::from_dir(dir.path()).unwrap();
        assert_eq!(engine.render_system(&config()).unwrap(), "I am Coastal Republic.");
        assert_eq!(engine.render_request("calm", &[]).unwrap(), "Now: calm");
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system.j2"), "only system").unwrap();
        assert!(matches!(
            PromptEngine::from_dir(dir.path()),
            Err(PromptError::Io { .. })
        ));
    }

    #[test]
    fn invalid_template_syntax_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("system.j2"), "{% if %}").unwrap();
        std::fs::write(dir.path().join("request.j2"), "ok").unwrap();
        assert!(matches!(
            PromptEngine::from_dir(dir.path()),
            Err(PromptError::Template { name: "system", .. })
        ));
    }
}
