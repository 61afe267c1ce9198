use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str =
    "You are an assistant that helps the user create and improve a web page in HTML, CSS, and JavaScript.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Whether a user turn starts a fresh page or rebuilds the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    Create,
    Modify,
}

impl TurnMode {
    /// Create is forced until something has been generated; afterwards the
    /// caller's reset toggle decides.
    pub fn select(has_generated: bool, reset: bool) -> Self {
        if !has_generated || reset {
            TurnMode::Create
        } else {
            TurnMode::Modify
        }
    }

    fn prompt(&self, user_text: &str) -> String {
        match self {
            TurnMode::Create => format!(
                "Create an HTML web page with accompanying CSS and JavaScript in a single HTML-file based on the following description: {}",
                user_text
            ),
            TurnMode::Modify => format!(
                "Modify the previous website to accomodate the following:\n\n{}\n\n Note that you should recreate the HTML, CSS, and JavaScript code from scratch in its entirety. The new code should be self-contained in a single HTML-file.",
                user_text
            ),
        }
    }
}

/// Ordered chat history replayed verbatim to the completion endpoint.
///
/// Never empty: the first message is always the fixed system instruction.
/// Appending returns an extended copy so a failed interaction can simply drop
/// the candidate and keep the previous history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn start() -> Self {
        Self {
            messages: vec![Message::new(Role::System, SYSTEM_PROMPT)],
        }
    }

    /// History a request in `mode` builds on: create mode re-seeds from the
    /// system message and discards every earlier turn.
    pub fn base_for(&self, mode: TurnMode) -> Self {
        match mode {
            TurnMode::Create => Self::start(),
            TurnMode::Modify => self.clone(),
        }
    }

    pub fn append_user_turn(&self, mode: TurnMode, user_text: &str) -> Self {
        let mut next = self.clone();
        next.messages.push(Message::new(Role::User, mode.prompt(user_text)));
        next
    }

    pub fn append_assistant_turn(&self, text: &str) -> Self {
        let mut next = self.clone();
        next.messages.push(Message::new(Role::Assistant, text));
        next
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Anything beyond the system message means a generation went through.
    pub fn has_generated(&self) -> bool {
        self.messages.len() > 1
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_holds_only_the_system_message() {
        let convo = Conversation::start();
        assert_eq!(convo.len(), 1);
        assert_eq!(convo.messages()[0].role, Role::System);
        assert_eq!(convo.messages()[0].content, SYSTEM_PROMPT);
        assert!(!convo.has_generated());
    }

    #[test]
    fn modify_turn_extends_a_copy() {
        let convo = Conversation::start()
            .append_user_turn(TurnMode::Create, "a blog")
            .append_assistant_turn("```html\n<p>blog</p>\n```");
        let before = convo.clone();

        let next = convo.append_user_turn(TurnMode::Modify, "make it blue");

        assert_eq!(next.len(), convo.len() + 1);
        assert_eq!(next.messages().last().map(|m| m.role), Some(Role::User));
        assert!(next.messages()[..convo.len()] == *convo.messages());
        assert_eq!(convo, before);
    }

    #[test]
    fn modify_prompt_restates_single_file_rule() {
        let next = Conversation::start().append_user_turn(TurnMode::Modify, "add a footer");
        let content = &next.messages()[1].content;
        assert!(content.contains("add a footer"));
        assert!(content.contains("self-contained in a single HTML-file"));
    }

    #[test]
    fn create_turn_discards_history() {
        let convo = Conversation::start()
            .append_user_turn(TurnMode::Create, "a shop")
            .append_assistant_turn("reply");

        let fresh = convo
            .base_for(TurnMode::Create)
            .append_user_turn(TurnMode::Create, "a bakery");

        assert_eq!(fresh.len(), 2);
        assert_eq!(fresh.messages()[0].role, Role::System);
        assert!(fresh.messages()[1].content.ends_with("description: a bakery"));
    }

    #[test]
    fn modify_base_keeps_history() {
        let convo = Conversation::start()
            .append_user_turn(TurnMode::Create, "a shop")
            .append_assistant_turn("reply");
        assert_eq!(convo.base_for(TurnMode::Modify), convo);
    }

    #[test]
    fn create_is_forced_without_prior_generation() {
        assert_eq!(TurnMode::select(false, false), TurnMode::Create);
        assert_eq!(TurnMode::select(false, true), TurnMode::Create);
        assert_eq!(TurnMode::select(true, true), TurnMode::Create);
        assert_eq!(TurnMode::select(true, false), TurnMode::Modify);
    }

    #[test]
    fn serializes_as_role_content_pairs() {
        let json = serde_json::to_value(Conversation::start()).unwrap();
        assert_eq!(json[0]["role"], "system");
        assert_eq!(json[0]["content"], SYSTEM_PROMPT);
    }
}
