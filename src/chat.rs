//! Mock chat widget: modal open/close, the append-only transcript, and the
//! randomly delayed canned support replies.

use crate::scheduler::TimerAction;
use crate::{Action, EventKind, Site};

pub(crate) const REPLY_MIN_DELAY_MS: i64 = 1_000;
pub(crate) const REPLY_DELAY_SPREAD_MS: f64 = 2_000.0;

/// Responses the simulated support agent picks from, uniformly at random.
pub const CANNED_RESPONSES: [&str; 7] = [
    "Thank you for reaching out. A support agent will be with you shortly.",
    "I understand your concern. Let me connect you with a specialist.",
    "We're here to help. Can you provide more details about your situation?",
    "Your mental health is important to us. How can we best support you today?",
    "I'm here to listen and support you. What's been on your mind lately?",
    "That sounds challenging. Would you like to talk to one of our counselors?",
    "Thank you for sharing that with me. How are you feeling right now?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Support,
}

/// One transcript entry. Entries are only ever appended, never edited or
/// removed, for the life of the page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: ChatSender,
    pub text: String,
}

impl Site {
    pub(crate) fn register_chat_modal(&mut self) {
        for opener in ["chat-button", "start-chat-hero", "demo-chat"] {
            if let Some(button) = self.dom.by_id(opener) {
                self.add_listener(button, EventKind::Click, Action::OpenChat);
            }
        }
        if let Some(close) = self.dom.first_with_class("modal-close") {
            self.add_listener(close, EventKind::Click, Action::CloseChat);
        }
        if let Some(overlay) = self.dom.first_with_class("modal-overlay") {
            self.add_listener(overlay, EventKind::Click, Action::CloseChat);
        }
        if let Some(send) = self.dom.by_id("send-chat") {
            self.add_listener(send, EventKind::Click, Action::SendChat);
        }
    }

    /// Closed → Open: reveal the modal and move focus into the text field.
    /// Re-opening while already open changes nothing.
    pub(crate) fn open_chat(&mut self) {
        let Some(modal) = self.dom.by_id("chat-modal") else {
            return;
        };
        self.dom.remove_class(modal, "hidden");
        self.chat_open = true;
        if let Some(input) = self.dom.by_id("chat-input") {
            if self.dom.is_focusable(input) {
                self.active_element = Some(input);
            }
        }
    }

    /// Open → Closed. A close trigger while already closed is a no-op.
    pub(crate) fn close_chat(&mut self) {
        let Some(modal) = self.dom.by_id("chat-modal") else {
            return;
        };
        if self.dom.has_class(modal, "hidden") {
            return;
        }
        self.dom.add_class(modal, "hidden");
        self.chat_open = false;
    }

    /// Send the chat input's trimmed text as a User message and queue one
    /// support reply 1000..3000 ms out. Each send is independent; several
    /// replies can be in flight and land in whatever order their delays
    /// dictate. Nothing ever cancels a queued reply.
    pub(crate) fn send_chat_message(&mut self) {
        let Some(input) = self.dom.by_id("chat-input") else {
            return;
        };
        let text = self.dom.value(input).trim().to_string();
        if text.is_empty() {
            return;
        }
        self.append_chat_entry(ChatSender::User, &text);
        self.dom.set_value(input, "");

        let delay = REPLY_MIN_DELAY_MS + (self.next_random_f64() * REPLY_DELAY_SPREAD_MS) as i64;
        self.schedule_timeout(TimerAction::ChatReply, delay);
    }

    /// Reply timer body: the response is drawn when the timer fires, not
    /// when it is scheduled.
    pub(crate) fn deliver_support_reply(&mut self) {
        let draw = self.next_random_f64() * CANNED_RESPONSES.len() as f64;
        let index = (draw as usize).min(CANNED_RESPONSES.len() - 1);
        let response = CANNED_RESPONSES[index].to_string();
        self.append_chat_entry(ChatSender::Support, &response);
    }

    /// Append to the typed transcript and mirror the entry into the
    /// `.chat-messages` container. The transcript grows even while the
    /// modal is hidden.
    fn append_chat_entry(&mut self, sender: ChatSender, text: &str) {
        self.transcript.push(ChatMessage {
            sender,
            text: text.to_string(),
        });

        let Some(container) = self.dom.first_with_class("chat-messages") else {
            return;
        };
        let entry = self.dom.create_detached("div");
        self.dom.add_class(entry, "chat-message");
        let (class, label) = match sender {
            ChatSender::User => ("user", "You"),
            ChatSender::Support => ("support", "Support Team"),
        };
        self.dom.add_class(entry, class);
        self.dom.set_text(entry, &format!("{label}: {text}"));
        self.dom.append(container, entry);
        self.scroll_into_view(".chat-messages");
    }
}
