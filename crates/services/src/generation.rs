//! Generation service contract.
//!
//! The service turns a prompt into an element-shaped payload. Elements are
//! only created after a successful response; a failure never leaves a
//! partial element behind.

use serde::{Deserialize, Serialize};

use layercut_project_model::Element;
use layercut_timeline_core::Editor;

/// An HTML/CSS component returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedComponent {
    pub name: String,
    pub html: String,
    pub css: String,
}

/// Generation failures, split so callers can explain rate limits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation rate limited{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Generation returned no result")]
    Empty,

    #[error("Generation failed: {message}")]
    Failed { message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|secs| format!("; retry after {secs}s"))
        .unwrap_or_default()
}

#[async_trait::async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate an HTML/CSS component from a prompt.
    async fn generate_component(
        &self,
        prompt: &str,
    ) -> Result<Option<GeneratedComponent>, GenerationError>;

    /// Generate an image, returned as a data URI.
    async fn generate_image(&self, prompt: &str) -> Result<Option<String>, GenerationError>;
}

/// Generate a component and place it on the timeline.
pub async fn generate_component_into(
    editor: &mut Editor,
    service: &dyn GenerationService,
    prompt: &str,
) -> Result<Element, GenerationError> {
    let component = service
        .generate_component(prompt)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Component generation failed");
            e
        })?
        .ok_or(GenerationError::Empty)?;

    editor
        .add_ai_component(component.name, component.html, component.css)
        .ok_or_else(|| GenerationError::Failed {
            message: "generated component could not be placed".to_string(),
        })
}

/// Generate an image and place it on the timeline.
pub async fn generate_image_into(
    editor: &mut Editor,
    service: &dyn GenerationService,
    prompt: &str,
) -> Result<Element, GenerationError> {
    let uri = service
        .generate_image(prompt)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Image generation failed");
            e
        })?
        .filter(|uri| !uri.is_empty())
        .ok_or(GenerationError::Empty)?;

    editor
        .add_image_source(image_name(prompt), uri)
        .ok_or_else(|| GenerationError::Failed {
            message: "generated image could not be placed".to_string(),
        })
}

fn image_name(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return "Generated Image".to_string();
    }
    let mut name: String = trimmed.chars().take(32).collect();
    if trimmed.chars().count() > 32 {
        name.push('…');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercut_common::EditorSettings;
    use layercut_project_model::ElementType;

    struct Scripted {
        component: Result<Option<GeneratedComponent>, GenerationError>,
        image: Result<Option<String>, GenerationError>,
    }

    #[async_trait::async_trait]
    impl GenerationService for Scripted {
        async fn generate_component(
            &self,
            _prompt: &str,
        ) -> Result<Option<GeneratedComponent>, GenerationError> {
            self.component.clone()
        }

        async fn generate_image(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
            self.image.clone()
        }
    }

    fn scripted_component(
        component: Result<Option<GeneratedComponent>, GenerationError>,
    ) -> Scripted {
        Scripted {
            component,
            image: Ok(None),
        }
    }

    #[tokio::test]
    async fn test_component_is_placed_on_success() {
        let mut editor = Editor::new(EditorSettings::default());
        let service = scripted_component(Ok(Some(GeneratedComponent {
            name: "Lower third".to_string(),
            html: "<div>Hi</div>".to_string(),
            css: "div { color: red }".to_string(),
        })));

        let element = generate_component_into(&mut editor, &service, "a lower third")
            .await
            .unwrap();

        assert_eq!(element.element_type, ElementType::AiGenerated);
        assert_eq!(element.name, "Lower third");
        assert_eq!(element.props.html.as_deref(), Some("<div>Hi</div>"));
        assert_eq!(editor.state().elements.len(), 1);
        assert!(editor.history().can_undo());
    }

    #[tokio::test]
    async fn test_rate_limit_creates_nothing() {
        let mut editor = Editor::new(EditorSettings::default());
        let service = scripted_component(Err(GenerationError::RateLimited {
            retry_after_secs: Some(30),
        }));

        let err = generate_component_into(&mut editor, &service, "x")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GenerationError::RateLimited {
                retry_after_secs: Some(30)
            }
        );
        assert_eq!(err.to_string(), "Generation rate limited; retry after 30s");
        assert!(editor.state().elements.is_empty());
        assert!(!editor.history().can_undo());
    }

    #[tokio::test]
    async fn test_empty_response_is_reported() {
        let mut editor = Editor::new(EditorSettings::default());
        let err = generate_component_into(&mut editor, &scripted_component(Ok(None)), "x")
            .await
            .unwrap_err();
        assert_eq!(err, GenerationError::Empty);
        assert!(editor.state().elements.is_empty());
    }

    #[tokio::test]
    async fn test_image_is_placed_with_source() {
        let mut editor = Editor::new(EditorSettings::default());
        let service = Scripted {
            component: Ok(None),
            image: Ok(Some("data:image/png;base64,AAAA".to_string())),
        };

        let element = generate_image_into(&mut editor, &service, "sunset over the sea")
            .await
            .unwrap();

        assert_eq!(element.element_type, ElementType::Image);
        assert_eq!(element.name, "sunset over the sea");
        assert_eq!(element.props.src.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[tokio::test]
    async fn test_image_failure_creates_nothing() {
        let mut editor = Editor::new(EditorSettings::default());
        let service = Scripted {
            component: Ok(None),
            image: Err(GenerationError::Failed {
                message: "network".to_string(),
            }),
        };
        assert!(generate_image_into(&mut editor, &service, "x").await.is_err());
        assert!(editor.state().elements.is_empty());
    }

    #[test]
    fn test_image_name_truncates_long_prompts() {
        assert_eq!(image_name("  "), "Generated Image");
        let long = "a".repeat(40);
        assert_eq!(image_name(&long).chars().count(), 33);
    }

    #[test]
    fn test_rate_limit_message_without_hint() {
        let err = GenerationError::RateLimited {
            retry_after_secs: None,
        };
        assert_eq!(err.to_string(), "Generation rate limited");
    }
}
