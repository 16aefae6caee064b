use anyhow::Context;
use serde::Serialize;

use super::context::ContextWindow;
use super::prompts::{
    render_template, APPLICATION, AUDIENCE, GUIDE_ACCESSIBILITY, GUIDE_FORMATTING,
    GUIDE_PRESERVE_VARIABLES, GUIDE_TONE, GUIDE_UI_CONSTRAINTS, GUIDE_USE_NEIGHBORS,
    INSTRUCTIONS, MESSAGE_TEMPLATE, USERS,
};

/// Context lines kept on each side when embedding a window into a request.
pub const MAX_CONTEXT_LINES: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    pub task: &'static str,
    pub target_language: String,
    pub text_to_translate: String,
    pub current_key: String,
    pub position: String,
    pub context: RequestContext,
    pub guidelines: Guidelines,
    pub instructions: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    pub application: &'static str,
    pub users: &'static str,
    pub audience: &'static str,
    pub preceding_keys: Vec<String>,
    pub following_keys: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Guidelines {
    pub terminology: TerminologyGuidelines,
    pub technical: TechnicalGuidelines,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TerminologyGuidelines {
    pub use_neighbors: &'static str,
    pub tone: &'static str,
    pub accessibility: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TechnicalGuidelines {
    pub preserve_variables: &'static str,
    pub formatting: &'static str,
    pub ui_constraints: &'static str,
}

impl Guidelines {
    fn fixed() -> Self {
        Self {
            terminology: TerminologyGuidelines {
                use_neighbors: GUIDE_USE_NEIGHBORS,
                tone: GUIDE_TONE,
                accessibility: GUIDE_ACCESSIBILITY,
            },
            technical: TechnicalGuidelines {
                preserve_variables: GUIDE_PRESERVE_VARIABLES,
                formatting: GUIDE_FORMATTING,
                ui_constraints: GUIDE_UI_CONSTRAINTS,
            },
        }
    }
}

impl TranslationRequest {
    pub fn build(text: &str, target_language: &str, window: &ContextWindow) -> Self {
        let skip = window.before.len().saturating_sub(MAX_CONTEXT_LINES);
        let preceding_keys = window.before[skip..].to_vec();
        let following_keys = window
            .after
            .iter()
            .take(MAX_CONTEXT_LINES)
            .cloned()
            .collect();

        Self {
            task: "translation",
            target_language: target_language.to_string(),
            text_to_translate: text.to_string(),
            current_key: window.current_key.clone(),
            position: window.position.clone(),
            context: RequestContext {
                application: APPLICATION,
                users: USERS,
                audience: AUDIENCE,
                preceding_keys,
                following_keys,
            },
            guidelines: Guidelines::fixed(),
            instructions: INSTRUCTIONS,
        }
    }

    pub fn to_message(&self) -> anyhow::Result<String> {
        let json = serde_json::to_string_pretty(self).context("serialize translation request")?;
        Ok(render_template(MESSAGE_TEMPLATE, &[("request_json", &json)]))
    }
}
