use crate::commands::{ChatState, dispatcher::CommandDispatcher};
use crate::core::error::SitegenError;
use crate::display;
use crate::gallery::Gallery;
use crate::input;
use crate::providers::LLMProvider;
use crate::session::Session;
use is_terminal::IsTerminal;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

/// Terminal front-ends over the shared session logic.
pub struct Application {
    pub provider: Arc<dyn LLMProvider>,
    pub gallery: Option<Gallery>,
    pub command_dispatcher: CommandDispatcher,
}

impl Application {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        gallery: Option<Gallery>,
        command_dispatcher: CommandDispatcher,
    ) -> Self {
        Self {
            provider,
            gallery,
            command_dispatcher,
        }
    }

    pub async fn run_chat(&self) -> Result<(), SitegenError> {
        let mut state = ChatState::new(self.gallery.clone());

        println!(
            "Describe the website you want. Type '/help' for available commands. Press Ctrl+D or type /quit to exit."
        );

        let mut editor = input::create_editor(self.command_dispatcher.clone())?;

        loop {
            let label = if state.session.has_generated() && !state.reset_next {
                "modify"
            } else {
                "create"
            };

            let input = match input::read_input(&mut editor, label)? {
                Some(input) => input.trim().to_string(),
                None => break,
            };

            if input.is_empty() {
                continue;
            }

            if let Some(result) = self
                .command_dispatcher
                .dispatch_line(&input, &mut state)
                .await
            {
                match result {
                    Ok(Some(output)) => display::display_info(&output),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("command {} failed: {}", input, e);
                        display::display_error(&e.user_message());
                    }
                }

                if !state.should_continue {
                    break;
                }
                continue;
            }

            self.handle_request(&mut state, &input).await;
        }

        input::save_history(&mut editor)?;

        Ok(())
    }

    /// Runs one description or modification request. Failures leave the
    /// session untouched, including a pending `/reset`.
    async fn handle_request(&self, state: &mut ChatState, request: &str) {
        let reset = std::mem::take(&mut state.reset_next);
        let modifying = state.session.has_generated() && !reset;

        display::display_progress(if modifying {
            "Asking AI to modify the website..."
        } else {
            "Generating website..."
        });

        match state
            .session
            .generate(self.provider.as_ref(), request, reset)
            .await
        {
            Ok(artifact) => display::display_generated(artifact, modifying),
            Err(e) => {
                state.reset_next = reset;
                tracing::warn!("generation failed: {}", e);
                display::display_error(&e.user_message());
            }
        }
    }

    pub async fn run_generate(
        &self,
        description: Option<&str>,
        output: Option<&Path>,
    ) -> Result<(), SitegenError> {
        let context = if !io::stdin().is_terminal() {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| SitegenError::Input(format!("Failed to read from stdin: {}", e)))?;
            Some(buffer)
        } else {
            None
        };

        let request = compose_request(description, context.as_deref())?;

        let mut session = Session::new();
        let artifact = session
            .generate(self.provider.as_ref(), &request, false)
            .await?;

        match output {
            Some(path) => {
                std::fs::write(path, &artifact.code)?;
                eprintln!("Website saved to: {}", path.display());
            }
            None => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", artifact.code)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }
}

/// Piped input becomes the description, or context ahead of it when both are given.
fn compose_request(
    description: Option<&str>,
    context: Option<&str>,
) -> Result<String, SitegenError> {
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    let context = context.map(str::trim).filter(|c| !c.is_empty());

    match (description, context) {
        (Some(description), Some(context)) => Ok(format!("{}\n\n{}", context, description)),
        (Some(description), None) => Ok(description.to_string()),
        (None, Some(context)) => Ok(context.to_string()),
        (None, None) => Err(SitegenError::Input(
            "No description provided".to_string(),
        )),
    }
}
