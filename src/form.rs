//! Contact-form controller: category/urgency coupling, the anonymous toggle,
//! per-field validation, and the simulated submission flow.

use std::sync::OnceLock;

use crate::dom::NodeId;
use crate::scheduler::TimerAction;
use crate::{Action, EventKind, Result, Site};

pub(crate) const SUBMISSION_DELAY_MS: i64 = 2_000;
pub(crate) const SUCCESS_NOTICE_MS: i64 = 5_000;

const MESSAGE_MIN_CHARS: usize = 10;
const MESSAGE_MAX_CHARS: usize = 1_000;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

const ERR_EMAIL: &str = "Please enter a valid email address";
const ERR_MESSAGE_EMPTY: &str = "Please enter your message";
const ERR_MESSAGE_SHORT: &str = "Message must be at least 10 characters long";
const ERR_MESSAGE_LONG: &str = "Message must be less than 1000 characters";
const ERR_CATEGORY: &str = "Please select a category";

const EMERGENCY_WARNING: &str = "Emergency Support Selected: If you're in immediate danger or \
     having thoughts of self-harm, please call our emergency hotline at 1800-891-4416 or \
     contact local emergency services immediately.";

const SUCCESS_NOTICE: &str = "Message Sent Successfully! We've received your message and will \
     respond within our stated timeframe. If this is an emergency, please call our hotline \
     immediately.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Category,
    Email,
    Message,
}

impl FieldId {
    fn element_id(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

/// Verdict for a single field, with the inline message shown on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValidationResult {
    pub field: FieldId,
    pub valid: bool,
    pub error: Option<String>,
}

impl FieldValidationResult {
    fn ok(field: FieldId) -> Self {
        Self {
            field,
            valid: true,
            error: None,
        }
    }

    fn err(field: FieldId, message: &str) -> Self {
        Self {
            field,
            valid: false,
            error: Some(message.to_string()),
        }
    }
}

/// Snapshot of the contact form's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub category: String,
    pub urgency: String,
    pub anonymous: bool,
    pub name: String,
    pub email: String,
    pub message: String,
}

fn email_regex() -> &'static fancy_regex::Regex {
    static EMAIL_RE: OnceLock<fancy_regex::Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        fancy_regex::Regex::new(EMAIL_PATTERN).expect("static email pattern is valid")
    })
}

/// Email rule on its own, ignoring the anonymous flag: non-empty after trim
/// and shaped `local@domain.tld` with no whitespace or extra `@`.
pub fn validate_email(text: &str) -> FieldValidationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() || !email_regex().is_match(trimmed).unwrap_or(false) {
        return FieldValidationResult::err(FieldId::Email, ERR_EMAIL);
    }
    FieldValidationResult::ok(FieldId::Email)
}

/// Message rule: required, 10..=1000 characters after trimming.
pub fn validate_message(text: &str) -> FieldValidationResult {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return FieldValidationResult::err(FieldId::Message, ERR_MESSAGE_EMPTY);
    }
    let chars = trimmed.chars().count();
    if chars < MESSAGE_MIN_CHARS {
        return FieldValidationResult::err(FieldId::Message, ERR_MESSAGE_SHORT);
    }
    if chars > MESSAGE_MAX_CHARS {
        return FieldValidationResult::err(FieldId::Message, ERR_MESSAGE_LONG);
    }
    FieldValidationResult::ok(FieldId::Message)
}

/// Category rule: any non-empty selection.
pub fn validate_category(value: &str) -> FieldValidationResult {
    if value.is_empty() {
        return FieldValidationResult::err(FieldId::Category, ERR_CATEGORY);
    }
    FieldValidationResult::ok(FieldId::Category)
}

impl Site {
    pub(crate) fn register_contact_form(&mut self) {
        let Some(form) = self.dom.by_id("contact-form") else {
            return;
        };
        if let Some(category) = self.dom.by_id("category") {
            self.add_listener(category, EventKind::Change, Action::CategoryChanged);
        }
        if let Some(anonymous) = self.dom.by_id("anonymous") {
            self.add_listener(anonymous, EventKind::Change, Action::AnonymousToggled);
        }
        self.add_listener(form, EventKind::Submit, Action::SubmitContactForm);
    }

    pub(crate) fn register_field_validation(&mut self) {
        if let Some(email) = self.dom.by_id("email") {
            self.add_listener(email, EventKind::Blur, Action::EmailBlur);
            self.add_listener(email, EventKind::Input, Action::EmailInput);
        }
        if let Some(message) = self.dom.by_id("message") {
            self.add_listener(message, EventKind::Blur, Action::MessageBlur);
            self.add_listener(message, EventKind::Input, Action::MessageInput);
        }
    }

    /// Category change handler. Selecting "emergency" locks urgency to
    /// "urgent" and inserts the warning banner; any other choice unlocks
    /// urgency and removes it. Repeat events never duplicate the banner.
    pub(crate) fn on_category_change(&mut self) -> Result<()> {
        let category = self.dom.select_one("#category")?;
        let urgency = self.dom.select_one("#urgency")?;
        if self.dom.value(category) == "emergency" {
            self.dom.set_value(urgency, "urgent");
            self.dom.set_disabled(urgency, true);
            self.show_emergency_warning()?;
        } else {
            self.dom.set_disabled(urgency, false);
            self.hide_emergency_warning();
        }
        self.validate_field(FieldId::Category)?;
        Ok(())
    }

    /// Anonymous toggle handler. Checked clears and disables name/email and
    /// drops their required flags; unchecked re-enables both and restores
    /// required on email only.
    pub(crate) fn on_anonymous_toggle(&mut self) -> Result<()> {
        let anonymous = self.dom.select_one("#anonymous")?;
        let name = self.dom.select_one("#name")?;
        let email = self.dom.select_one("#email")?;
        if self.dom.checked(anonymous) {
            self.dom.set_value(name, "");
            self.dom.set_value(email, "");
            self.dom.set_disabled(name, true);
            self.dom.set_disabled(email, true);
            self.dom.set_required(name, false);
            self.dom.set_required(email, false);
        } else {
            self.dom.set_disabled(name, false);
            self.dom.set_disabled(email, false);
            self.dom.set_required(email, true);
        }
        Ok(())
    }

    /// Run one field's rule against the live page state and annotate the
    /// field. A disabled email field (anonymous mode) always passes.
    pub fn validate_field(&mut self, field: FieldId) -> Result<FieldValidationResult> {
        let node = self.dom.select_one(&format!("#{}", field.element_id()))?;
        let result = match field {
            FieldId::Email => {
                if self.dom.disabled(node) {
                    FieldValidationResult::ok(FieldId::Email)
                } else {
                    validate_email(self.dom.value(node))
                }
            }
            FieldId::Message => validate_message(self.dom.value(node)),
            FieldId::Category => validate_category(self.dom.value(node)),
        };
        if result.valid {
            self.show_field_success(node);
        } else if let Some(message) = &result.error {
            let message = message.clone();
            self.show_field_error(node, &message);
        }
        Ok(result)
    }

    /// Full-form validation: clears every annotation, re-runs the three
    /// rules, annotates failures, and returns the conjunction. This is the
    /// sole gate for submission and agrees field-by-field with
    /// [`Site::validate_field`].
    pub fn validate_form(&mut self) -> Result<bool> {
        self.clear_all_annotations();

        let category = self.dom.select_one("#category")?;
        let email = self.dom.select_one("#email")?;
        let message = self.dom.select_one("#message")?;
        let anonymous = self.dom.select_one("#anonymous")?;

        let mut valid = true;

        let category_result = validate_category(self.dom.value(category));
        if let Some(text) = annotation_text(&category_result) {
            self.show_field_error(category, &text);
            valid = false;
        }

        if !self.dom.checked(anonymous) {
            let email_result = validate_email(self.dom.value(email));
            if let Some(text) = annotation_text(&email_result) {
                self.show_field_error(email, &text);
                valid = false;
            }
        }

        let message_result = validate_message(self.dom.value(message));
        if let Some(text) = annotation_text(&message_result) {
            self.show_field_error(message, &text);
            valid = false;
        }

        Ok(valid)
    }

    /// Form submit handler: validation gates the simulated send.
    pub(crate) fn on_contact_form_submit(&mut self) -> Result<()> {
        if !self.validate_form()? {
            return Ok(());
        }
        let button = self.dom.select_one("#submit-button")?;
        self.dom.add_class(button, "loading");
        self.dom.set_text(button, "Sending...");
        self.dom.set_disabled(button, true);
        self.schedule_timeout(TimerAction::FinishSubmission, SUBMISSION_DELAY_MS);
        Ok(())
    }

    /// Fires when the simulated submission latency elapses: show the success
    /// notice, reset the form, restore the button, drop the banner.
    pub(crate) fn finish_submission(&mut self) -> Result<()> {
        let form = self.dom.select_one("#contact-form")?;

        let notice = self.dom.create_detached("div");
        self.dom.add_class(notice, "success-message");
        self.dom.set_text(notice, SUCCESS_NOTICE);
        if let Some(parent) = self.dom.parent(form) {
            self.dom.insert_before(parent, notice, form);
        }
        self.schedule_timeout(TimerAction::DismissNotice(notice), SUCCESS_NOTICE_MS);
        self.scroll_into_view(".success-message");

        self.reset_form(form);
        self.update_character_count();

        let button = self.dom.select_one("#submit-button")?;
        self.dom.remove_class(button, "loading");
        self.dom.set_text(button, "Send Message");
        self.dom.set_disabled(button, false);

        self.hide_emergency_warning();
        Ok(())
    }

    fn reset_form(&mut self, form: NodeId) {
        for node in self.dom.descendants(form) {
            match self.dom.tag_name(node) {
                "input" => {
                    self.dom.set_value(node, "");
                    self.dom.set_checked(node, false);
                }
                "textarea" => self.dom.set_value(node, ""),
                "select" => {
                    let default = self.dom.element(node).default_value.clone();
                    self.dom.set_value(node, &default);
                }
                _ => {}
            }
        }
    }

    fn show_emergency_warning(&mut self) -> Result<()> {
        if self.dom.first_with_class("emergency-warning").is_some() {
            return Ok(());
        }
        let form = self.dom.select_one("#contact-form")?;
        let warning = self.dom.create_detached("div");
        self.dom.add_class(warning, "emergency-warning");
        self.dom.set_text(warning, EMERGENCY_WARNING);
        self.dom.insert_first(form, warning);
        Ok(())
    }

    pub(crate) fn hide_emergency_warning(&mut self) {
        if let Some(warning) = self.dom.first_with_class("emergency-warning") {
            self.dom.detach(warning);
        }
    }

    /// Drop the field's inline annotation and verdict classes, as typing
    /// into the field does.
    pub(crate) fn clear_field_annotation(&mut self, element_id: &str) -> Result<()> {
        let node = self.dom.select_one(&format!("#{element_id}"))?;
        self.clear_annotation_for(node);
        Ok(())
    }

    fn clear_annotation_for(&mut self, field: NodeId) {
        self.dom.remove_class(field, "error");
        self.dom.remove_class(field, "success");
        if let Some(group) = self.dom.parent(field) {
            if let Some(existing) = self.dom.descendant_with_class(group, "error-message") {
                self.dom.detach(existing);
            }
        }
    }

    fn clear_all_annotations(&mut self) {
        for node in self.dom.all_with_class("error-message") {
            self.dom.detach(node);
        }
        for field in self.dom.all_with_class("form-control") {
            self.dom.remove_class(field, "error");
            self.dom.remove_class(field, "success");
        }
    }

    fn show_field_error(&mut self, field: NodeId, message: &str) {
        self.clear_annotation_for(field);
        self.dom.add_class(field, "error");
        let annotation = self.dom.create_detached("div");
        self.dom.add_class(annotation, "error-message");
        self.dom.set_text(annotation, message);
        if let Some(group) = self.dom.parent(field) {
            self.dom.append(group, annotation);
        }
    }

    fn show_field_success(&mut self, field: NodeId) {
        self.clear_annotation_for(field);
        self.dom.add_class(field, "success");
    }

    pub(crate) fn install_character_counter(&mut self) {
        let Some(message) = self.dom.by_id("message") else {
            return;
        };
        let Some(group) = self.dom.parent(message) else {
            return;
        };
        let counter = self.dom.create_detached("div");
        self.dom.add_class(counter, "character-counter");
        self.dom.append(group, counter);
        self.update_character_count();
    }

    /// Live counter under the message field: `len/1000 characters`, with a
    /// tone class for below-minimum, near-limit, and in-range lengths.
    pub(crate) fn update_character_count(&mut self) {
        let Some(counter) = self.dom.first_with_class("character-counter") else {
            return;
        };
        let Some(message) = self.dom.by_id("message") else {
            return;
        };
        let chars = self.dom.value(message).chars().count();
        self.dom
            .set_text(counter, &format!("{chars}/{MESSAGE_MAX_CHARS} characters"));
        for tone in ["warn", "near-limit", "ok"] {
            self.dom.remove_class(counter, tone);
        }
        let tone = if chars < MESSAGE_MIN_CHARS {
            "warn"
        } else if chars > MESSAGE_MAX_CHARS * 9 / 10 {
            "near-limit"
        } else {
            "ok"
        };
        self.dom.add_class(counter, tone);
    }

    /// Typed snapshot of the form fields.
    pub fn form_state(&self) -> Result<FormState> {
        Ok(FormState {
            category: self.value_of("#category")?,
            urgency: self.value_of("#urgency")?,
            anonymous: self.is_checked("#anonymous")?,
            name: self.value_of("#name")?,
            email: self.value_of("#email")?,
            message: self.value_of("#message")?,
        })
    }
}

fn annotation_text(result: &FieldValidationResult) -> Option<String> {
    if result.valid {
        None
    } else {
        result.error.clone()
    }
}
