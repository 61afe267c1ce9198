use super::{
    ChatState,
    handler::{
        CodeCommand, GalleryCommand, HelpCommand, PreviewCommand, QuitCommand, ResetCommand,
        SaveCommand, SubmitCommand, TryCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::SitegenError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, SitegenError> {
        self.registry.execute(command, args, state).await
    }

    /// Splits a `/name arg...` line and runs it. `None` for lines that are
    /// not commands.
    pub async fn dispatch_line(
        &self,
        line: &str,
        state: &mut ChatState,
    ) -> Option<Result<Option<String>, SitegenError>> {
        let rest = line.strip_prefix('/')?;
        let parts: Vec<&str> = rest.split_whitespace().collect();
        let (command, args) = parts.split_first()?;
        Some(self.execute(command, args, state).await)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        self.registry.get_command_names()
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("help", HelpCommand);
    registry.register("reset", ResetCommand);
    registry.register("code", CodeCommand);
    registry.register("save", SaveCommand);
    registry.register("preview", PreviewCommand);
    registry.register("submit", SubmitCommand);
    registry.register("gallery", GalleryCommand);
    registry.register("try", TryCommand);

    CommandDispatcher::new(Arc::new(registry))
}
