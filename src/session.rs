use crate::conversation::{Conversation, TurnMode};
use crate::core::error::SitegenError;
use crate::extract;
use crate::providers::LLMProvider;

/// The page currently on display together with the reply that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub code: String,
    pub explanation: String,
}

/// State owned by one user's interactive session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    conversation: Conversation,
    artifact: Option<Artifact>,
    pub show_explanation: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn has_generated(&self) -> bool {
        self.conversation.has_generated()
    }

    pub fn action_label(&self) -> &'static str {
        if self.has_generated() {
            "Ask AI to modify the generated website"
        } else {
            "Generate website"
        }
    }

    pub fn explanation_label(&self) -> &'static str {
        if self.show_explanation {
            "Hide code and explanations"
        } else {
            "Show code and explanations"
        }
    }

    pub fn toggle_explanation(&mut self) -> bool {
        self.show_explanation = !self.show_explanation;
        self.show_explanation
    }

    /// Runs one generate/modify interaction.
    ///
    /// The session only changes once the reply holds exactly one code block;
    /// on any error the previous conversation and artifact stay as they were.
    pub async fn generate(
        &mut self,
        provider: &dyn LLMProvider,
        request: &str,
        reset: bool,
    ) -> Result<&Artifact, SitegenError> {
        let mode = TurnMode::select(self.has_generated(), reset);
        let conversation = self
            .conversation
            .base_for(mode)
            .append_user_turn(mode, request);

        tracing::debug!(
            ?mode,
            previous_turns = self.conversation().len(),
            turns = conversation.len(),
            "generating website"
        );
        let output = provider.complete(conversation.messages()).await?;
        let block = extract::extract(&output)?;

        self.conversation = conversation.append_assistant_turn(&output);
        Ok(&*self.artifact.insert(Artifact {
            code: block.code,
            explanation: output,
        }))
    }
}
