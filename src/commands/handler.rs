use super::ChatState;
use crate::core::error::SitegenError;
use crate::display;

use async_trait::async_trait;
use console::style;
use std::path::PathBuf;

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &[&str],
    ) -> Result<Option<String>, SitegenError>;
    fn help(&self) -> &'static str;
}

pub struct QuitCommand;
pub struct HelpCommand;
pub struct ResetCommand;
pub struct CodeCommand;
pub struct SaveCommand;
pub struct PreviewCommand;
pub struct SubmitCommand;
pub struct GalleryCommand;
pub struct TryCommand;

const GALLERY_DISABLED: &str = "Gallery is disabled";
const NOTHING_GENERATED: &str = "Generate a website before publishing it";

/// Writes `code` to a temp file and hands it to the default browser.
fn open_preview(code: &str) -> Result<PathBuf, SitegenError> {
    let path = std::env::temp_dir().join(format!("sitegen-preview-{}.html", uuid::Uuid::new_v4()));
    std::fs::write(&path, code)?;
    open::that(&path)?;
    tracing::debug!(path = %path.display(), "opened preview");
    Ok(path)
}

#[async_trait]
impl CommandHandler for QuitCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        state.should_continue = false;
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/quit - Exit the generator"
    }
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn execute(
        &self,
        _state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let title = style("Available Commands").bold().underlined();
        let help_text = vec![
            title.to_string(),
            style(QuitCommand.help()).to_string(),
            style(HelpCommand.help()).to_string(),
            style(ResetCommand.help()).to_string(),
            style(CodeCommand.help()).to_string(),
            style(SaveCommand.help()).to_string(),
            style(PreviewCommand.help()).to_string(),
            style(SubmitCommand.help()).to_string(),
            style(GalleryCommand.help()).to_string(),
            style(TryCommand.help()).to_string(),
        ]
        .join("\n");

        Ok(Some(help_text))
    }

    fn help(&self) -> &'static str {
        "/help - Show available commands"
    }
}

#[async_trait]
impl CommandHandler for ResetCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        state.reset_next = true;
        Ok(Some(
            "The next description starts a new website.".to_string(),
        ))
    }

    fn help(&self) -> &'static str {
        "/reset - Start over with the next description"
    }
}

#[async_trait]
impl CommandHandler for CodeCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        if state.session.artifact().is_none() {
            return Ok(Some("Nothing generated yet.".to_string()));
        }

        if !state.session.toggle_explanation() {
            return Ok(Some("Code and explanations hidden.".to_string()));
        }
        if let Some(artifact) = state.session.artifact() {
            display::display_markdown(&artifact.explanation);
        }
        Ok(None)
    }

    fn help(&self) -> &'static str {
        "/code - Show or hide the code and explanations"
    }
}

#[async_trait]
impl CommandHandler for SaveCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let Some(artifact) = state.session.artifact() else {
            return Ok(Some("Nothing generated yet.".to_string()));
        };

        let path = match args.first() {
            Some(name) => PathBuf::from(name),
            None => PathBuf::from(
                chrono::Local::now()
                    .format("%Y%m%d_%H%M%S.html")
                    .to_string(),
            ),
        };

        std::fs::write(&path, &artifact.code)?;
        Ok(Some(format!("Website saved to: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/save [filename] - Write the generated HTML to a file"
    }
}

#[async_trait]
impl CommandHandler for PreviewCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let Some(artifact) = state.session.artifact() else {
            return Ok(Some("Nothing generated yet.".to_string()));
        };

        let path = open_preview(&artifact.code)?;
        Ok(Some(format!("Preview opened from: {}", path.display())))
    }

    fn help(&self) -> &'static str {
        "/preview - Open the generated website in the browser"
    }
}

#[async_trait]
impl CommandHandler for SubmitCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let Some(gallery) = &state.gallery else {
            return Ok(Some(GALLERY_DISABLED.to_string()));
        };
        let Some(artifact) = state.session.artifact() else {
            return Ok(Some(NOTHING_GENERATED.to_string()));
        };

        gallery.submit(&args.join(" "), &artifact.code).await?;
        Ok(Some(
            "Your website has been submitted for review.".to_string(),
        ))
    }

    fn help(&self) -> &'static str {
        "/submit <name> - Publish the website to the gallery for review"
    }
}

#[async_trait]
impl CommandHandler for GalleryCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        _args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let Some(gallery) = &state.gallery else {
            return Ok(Some(GALLERY_DISABLED.to_string()));
        };

        let sites = gallery.list_accepted().await?;
        state.listed = sites.as_ref().clone();
        if state.listed.is_empty() {
            return Ok(Some("No websites in the gallery yet.".to_string()));
        }

        display::display_sites(&state.listed);
        Ok(Some("Use /try <n> to open one.".to_string()))
    }

    fn help(&self) -> &'static str {
        "/gallery - List previously generated websites"
    }
}

#[async_trait]
impl CommandHandler for TryCommand {
    async fn execute(
        &self,
        state: &mut ChatState,
        args: &[&str],
    ) -> Result<Option<String>, SitegenError> {
        let Some(gallery) = &state.gallery else {
            return Ok(Some(GALLERY_DISABLED.to_string()));
        };

        let index: usize = args
            .first()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| SitegenError::Input("Usage: /try <n>".to_string()))?;
        let site = index
            .checked_sub(1)
            .and_then(|i| state.listed.get(i))
            .ok_or_else(|| {
                SitegenError::Input(format!(
                    "No gallery entry {}; run /gallery to list them",
                    index
                ))
            })?;

        gallery.record_view(site.id).await?;
        open_preview(&site.code)?;
        Ok(Some(format!("Opened {}", site.name)))
    }

    fn help(&self) -> &'static str {
        "/try <n> - Open website n from the last /gallery listing"
    }
}
