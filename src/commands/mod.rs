pub mod dispatcher;
pub mod handler;
pub mod registry;

use crate::gallery::{Gallery, Site};
use crate::session::Session;
pub use dispatcher::create_command_registry;

/// Everything the terminal front-end keeps between lines.
pub struct ChatState {
    pub session: Session,
    pub gallery: Option<Gallery>,
    /// Listing shown by the last `/gallery`, which `/try` indexes into.
    pub listed: Vec<Site>,
    /// Set by `/reset`; consumed by the next generation request.
    pub reset_next: bool,
    pub should_continue: bool,
}

impl ChatState {
    pub fn new(gallery: Option<Gallery>) -> Self {
        Self {
            session: Session::new(),
            gallery,
            listed: Vec::new(),
            reset_next: false,
            should_continue: true,
        }
    }
}
