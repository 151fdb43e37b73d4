use std::error::Error as StdError;
use std::fmt;

mod chat;
mod dom;
mod form;
mod nav;
mod page;
mod scheduler;


pub use chat::{CANNED_RESPONSES, ChatMessage, ChatSender};
pub use form::{
    FieldId, FieldValidationResult, FormState, validate_category, validate_email, validate_message,
};
pub use scheduler::PendingTimer;

use dom::{Dom, NodeId};
use scheduler::{ScheduledTask, TimerAction};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    ElementNotFound(String),
    TypeMismatch {
        target: String,
        expected: String,
        actual: String,
    },
    UnknownOption {
        select: String,
        value: String,
    },
    Runtime(String),
    AssertionFailed {
        target: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementNotFound(target) => write!(f, "element not found: {target}"),
            Self::TypeMismatch {
                target,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {target}: expected {expected}, actual {actual}"
            ),
            Self::UnknownOption { select, value } => {
                write!(f, "select {select} has no option with value \"{value}\"")
            }
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
            Self::AssertionFailed {
                target,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {target}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

/// Keyboard keys the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventKind {
    Click,
    Input,
    Change,
    Blur,
    Submit,
}

/// Handler bound to a page control at initialization. Plain data, like the
/// timer actions, so dispatch stays a table lookup instead of a closure call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    NavLink,
    ToggleMobileMenu,
    FaqToggle,
    OpenChat,
    CloseChat,
    SendChat,
    CategoryChanged,
    AnonymousToggled,
    EmailBlur,
    MessageBlur,
    EmailInput,
    MessageInput,
    SubmitContactForm,
    ServiceButton,
    SurveyAlert,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Listener {
    pub(crate) target: NodeId,
    pub(crate) event: EventKind,
    pub(crate) action: Action,
}

/// The MindHaven page with every handler registered, a virtual clock, and a
/// seedable PRNG. All interaction goes through gesture methods; all simulated
/// latency goes through the timer queue.
pub struct Site {
    pub(crate) dom: Dom,
    listeners: Vec<Listener>,
    task_queue: Vec<ScheduledTask>,
    now_ms: i64,
    timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) chat_open: bool,
    pub(crate) transcript: Vec<ChatMessage>,
    scroll_y: i64,
    last_scroll_target: Option<String>,
    pub(crate) alerts: Vec<String>,
    rng_state: u64,
    trace: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
}

impl Site {
    /// Build the page and register every handler, the equivalent of the
    /// original script running at page-ready.
    pub fn new() -> Self {
        let mut site = Self {
            dom: page::build(),
            listeners: Vec::new(),
            task_queue: Vec::new(),
            now_ms: 0,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
            active_element: None,
            chat_open: false,
            transcript: Vec::new(),
            scroll_y: 0,
            last_scroll_target: None,
            alerts: Vec::new(),
            rng_state: 0x9E37_79B9_7F4A_7C15,
            trace: false,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
        };
        site.register_navigation();
        site.register_mobile_menu();
        site.register_faq();
        site.register_chat_modal();
        site.register_contact_form();
        site.register_field_validation();
        site.register_interactive_elements();
        site.install_character_counter();
        site
    }

    // ── Determinism & observability ─────────────────────────────────

    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng_state = if seed == 0 {
            0xA5A5_A5A5_A5A5_A5A5
        } else {
            seed
        };
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if !self.trace {
            return;
        }
        self.trace_logs.push(line);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }

    /// xorshift64*: deterministic stand-in for the browser's `Math.random`.
    pub(crate) fn next_random_f64(&mut self) -> f64 {
        let mut x = self.rng_state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.rng_state = if x == 0 { 0xA5A5_A5A5_A5A5_A5A5 } else { x };
        let out = x.wrapping_mul(0x2545_F491_4F6C_DD1D);
        let mantissa = out >> 11;
        (mantissa as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    // ── Gestures ────────────────────────────────────────────────────

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        self.click_node(target)
    }

    pub(crate) fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.trace_line(format!("[event] click target={}", self.dom.snippet(target)));

        self.dispatch(target, EventKind::Click)?;

        if is_checkbox(&self.dom, target) {
            let current = self.dom.checked(target);
            self.dom.set_checked(target, !current);
            self.dispatch(target, EventKind::Input)?;
            self.dispatch(target, EventKind::Change)?;
        }

        if self.dom.tag_name(target) == "button"
            && self.dom.attr(target, "type") == Some("submit")
        {
            if let Some(form) = self.enclosing_form(target) {
                self.dispatch(form, EventKind::Submit)?;
            }
        }

        self.document_click(target)
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).to_string();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }
        self.dom.set_value(target, text);
        self.dispatch(target, EventKind::Input)
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        if !is_checkbox(&self.dom, target) {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "input[type=checkbox]".into(),
                actual: self.dom.tag_name(target).to_string(),
            });
        }
        if self.dom.checked(target) != checked {
            self.dom.set_checked(target, checked);
            self.dispatch(target, EventKind::Input)?;
            self.dispatch(target, EventKind::Change)?;
        }
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).to_string();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }
        let has_option = self
            .dom
            .children(target)
            .iter()
            .any(|child| self.dom.attr(*child, "value") == Some(value));
        if !has_option {
            return Err(Error::UnknownOption {
                select: selector.to_string(),
                value: value.to_string(),
            });
        }
        if self.dom.value(target) != value {
            self.dom.set_value(target, value);
            self.dispatch(target, EventKind::Change)?;
        }
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.dom.is_focusable(target) {
            self.active_element = Some(target);
        }
        Ok(())
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        if self.active_element == Some(target) {
            self.active_element = None;
        }
        self.dispatch(target, EventKind::Blur)
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let tag = self.dom.tag_name(target).to_string();
        if tag != "form" {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "form".into(),
                actual: tag,
            });
        }
        self.dispatch(target, EventKind::Submit)
    }

    pub fn press_key(&mut self, key: Key) -> Result<()> {
        self.trace_line(format!("[event] keydown key={key:?}"));
        match key {
            Key::Enter => {
                let chat_input = self.dom.by_id("chat-input");
                if self.active_element.is_some() && self.active_element == chat_input {
                    self.send_chat_message();
                }
            }
            Key::Escape => {
                if self.chat_open {
                    self.close_chat();
                }
            }
        }
        Ok(())
    }

    /// Tab (or Shift+Tab) focus movement. While the chat modal is open the
    /// cycle is trapped inside it and wraps at either end.
    pub fn press_tab(&mut self, backward: bool) -> Result<()> {
        let scope = if self.chat_open {
            self.dom.select_one("#chat-modal")?
        } else {
            self.dom.root()
        };
        let focusables = self.dom.focusable_descendants(scope);
        if focusables.is_empty() {
            return Ok(());
        }
        let position = self
            .active_element
            .and_then(|active| focusables.iter().position(|node| *node == active));
        let next = match (position, backward) {
            (Some(idx), false) if idx + 1 < focusables.len() => focusables[idx + 1],
            (Some(idx), true) if idx > 0 => focusables[idx - 1],
            (_, false) => focusables[0],
            (_, true) => focusables[focusables.len() - 1],
        };
        self.active_element = Some(next);
        Ok(())
    }

    /// Alt+digit section shortcuts: 1..4 map to home/about/services/contact.
    pub fn press_alt_digit(&mut self, digit: char) -> Result<()> {
        let section = match digit {
            '1' => "home",
            '2' => "about",
            '3' => "services",
            '4' => "contact",
            _ => return Ok(()),
        };
        self.navigate_to_section(section)
    }

    pub fn scroll_to(&mut self, y: i64) {
        self.scroll_y = y.max(0);
    }

    // ── Clock & timers ──────────────────────────────────────────────

    pub fn now_ms(&self) -> i64 {
        self.now_ms
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut timers = self
            .task_queue
            .iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                order: task.order,
            })
            .collect::<Vec<_>>();
        timers.sort_by_key(|timer| (timer.due_at, timer.order));
        timers
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.now_ms;
        self.now_ms = self.now_ms.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(self.now_ms), false)?;
        self.trace_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={} ran_due={ran}",
            self.now_ms
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        if target_ms < self.now_ms {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={})",
                self.now_ms
            )));
        }
        self.now_ms = target_ms;
        let ran = self.run_timer_queue(Some(self.now_ms), false)?;
        self.trace_line(format!(
            "[timer] advance_to to={} ran_due={ran}",
            self.now_ms
        ));
        Ok(())
    }

    /// Run every queued timer, advancing the clock to each due time.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.now_ms;
        let ran = self.run_timer_queue(None, true)?;
        self.trace_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.now_ms
        ));
        Ok(())
    }

    /// Run the earliest queued timer, jumping the clock forward if needed.
    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(next_idx) = self.next_task_index(None) else {
            return Ok(false);
        };
        let task = self.task_queue.remove(next_idx);
        if task.due_at > self.now_ms {
            self.now_ms = task.due_at;
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    pub(crate) fn schedule_timeout(&mut self, action: TimerAction, delay_ms: i64) -> i64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        let order = self.next_task_order;
        self.next_task_order += 1;
        let due_at = self.now_ms.saturating_add(delay_ms.max(0));
        self.trace_line(format!(
            "[timer] schedule id={id} due_at={due_at} action={action:?}"
        ));
        self.task_queue.push(ScheduledTask {
            id,
            due_at,
            order,
            action,
        });
        id
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(next_idx) = self.next_task_index(due_limit) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "timer queue exceeded {} steps (now_ms={}, pending={})",
                    self.timer_step_limit,
                    self.now_ms,
                    self.task_queue.len()
                )));
            }
            let task = self.task_queue.remove(next_idx);
            if advance_clock && task.due_at > self.now_ms {
                self.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn next_task_index(&self, due_limit: Option<i64>) -> Option<usize> {
        self.task_queue
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(idx, _)| idx)
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_line(format!(
            "[timer] run id={} due_at={} now_ms={} action={:?}",
            task.id, task.due_at, self.now_ms, task.action
        ));
        match task.action {
            TimerAction::ChatReply => self.deliver_support_reply(),
            TimerAction::FinishSubmission => self.finish_submission()?,
            TimerAction::DismissNotice(node) => self.dom.detach(node),
            TimerAction::RevealEmergencySection => {
                if self.dom.first_with_class("emergency-section").is_some() {
                    self.scroll_into_view(".emergency-section");
                }
            }
        }
        Ok(())
    }

    // ── Event dispatch ──────────────────────────────────────────────

    pub(crate) fn add_listener(&mut self, target: NodeId, event: EventKind, action: Action) {
        self.listeners.push(Listener {
            target,
            event,
            action,
        });
    }

    fn dispatch(&mut self, target: NodeId, event: EventKind) -> Result<()> {
        let actions = self
            .listeners
            .iter()
            .filter(|listener| listener.target == target && listener.event == event)
            .map(|listener| listener.action)
            .collect::<Vec<_>>();
        for action in actions {
            self.run_action(target, action)?;
        }
        Ok(())
    }

    fn run_action(&mut self, target: NodeId, action: Action) -> Result<()> {
        match action {
            Action::NavLink => self.on_nav_link_click(target),
            Action::ToggleMobileMenu => self.toggle_mobile_menu(),
            Action::FaqToggle => self.on_faq_question_click(target),
            Action::OpenChat => self.open_chat(),
            Action::CloseChat => self.close_chat(),
            Action::SendChat => self.send_chat_message(),
            Action::CategoryChanged => self.on_category_change()?,
            Action::AnonymousToggled => self.on_anonymous_toggle()?,
            Action::EmailBlur => {
                self.validate_field(FieldId::Email)?;
            }
            Action::MessageBlur => {
                self.validate_field(FieldId::Message)?;
            }
            Action::EmailInput => self.clear_field_annotation("email")?,
            Action::MessageInput => {
                self.clear_field_annotation("message")?;
                self.update_character_count();
            }
            Action::SubmitContactForm => self.on_contact_form_submit()?,
            Action::ServiceButton => self.on_service_button_click(target)?,
            Action::SurveyAlert => self.alerts.push(
                "Mental health survey feature would be implemented here. This would include \
                 questions about mood, stress levels, sleep patterns, and other wellness \
                 indicators."
                    .to_string(),
            ),
        }
        Ok(())
    }

    /// Document-level click behavior: in-page anchors scroll their target
    /// into view, and clicks outside the mobile menu hide it.
    fn document_click(&mut self, target: NodeId) -> Result<()> {
        if let Some(href) = self.enclosing_anchor_href(target) {
            if let Some(id) = href.strip_prefix('#') {
                if self.dom.by_id(id).is_some() {
                    let descriptor = format!("#{id}");
                    self.scroll_into_view(&descriptor);
                }
            }
        }

        let menu_btn = self.dom.first_with_class("mobile-menu-btn");
        let mobile_nav = self.dom.first_with_class("mobile-nav");
        if let (Some(menu_btn), Some(mobile_nav)) = (menu_btn, mobile_nav) {
            let inside =
                self.dom.contains(menu_btn, target) || self.dom.contains(mobile_nav, target);
            if !inside {
                self.dom.add_class(mobile_nav, "hidden");
            }
        }
        Ok(())
    }

    fn enclosing_anchor_href(&self, target: NodeId) -> Option<String> {
        let mut current = Some(target);
        while let Some(node) = current {
            if self.dom.tag_name(node) == "a" {
                if let Some(href) = self.dom.attr(node, "href") {
                    if href.starts_with('#') {
                        return Some(href.to_string());
                    }
                }
            }
            current = self.dom.parent(node);
        }
        None
    }

    pub(crate) fn enclosing_form(&self, target: NodeId) -> Option<NodeId> {
        let mut current = Some(target);
        while let Some(node) = current {
            if self.dom.tag_name(node) == "form" {
                return Some(node);
            }
            current = self.dom.parent(node);
        }
        None
    }

    pub(crate) fn scroll_into_view(&mut self, descriptor: &str) {
        self.last_scroll_target = Some(descriptor.to_string());
        self.trace_line(format!("[scroll] into_view target={descriptor}"));
    }

    pub(crate) fn scroll_to_top(&mut self) {
        self.scroll_y = 0;
    }

    // ── Inspection ──────────────────────────────────────────────────

    pub fn text_of(&self, selector: &str) -> Result<String> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value_of(&self, selector: &str) -> Result<String> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.value(target).to_string())
    }

    pub fn has_class(&self, selector: &str, class: &str) -> Result<bool> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.has_class(target, class))
    }

    pub fn is_disabled(&self, selector: &str) -> Result<bool> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.disabled(target))
    }

    pub fn is_required(&self, selector: &str) -> Result<bool> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.required(target))
    }

    pub fn is_checked(&self, selector: &str) -> Result<bool> {
        let target = self.dom.select_one(selector)?;
        Ok(self.dom.checked(target))
    }

    pub fn count_with_class(&self, class: &str) -> usize {
        self.dom.all_with_class(class).len()
    }

    pub fn focused_id(&self) -> Option<String> {
        self.active_element
            .and_then(|node| self.dom.id_attr(node).map(str::to_string))
    }

    pub fn scroll_y(&self) -> i64 {
        self.scroll_y
    }

    pub fn last_scroll_target(&self) -> Option<&str> {
        self.last_scroll_target.as_deref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat_open
    }

    pub fn chat_transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    // ── Assertions ──────────────────────────────────────────────────

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() != expected.trim() {
            return Err(Error::AssertionFailed {
                target: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let actual = self.dom.value(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                target: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class: &str, expected: bool) -> Result<()> {
        let target = self.dom.select_one(selector)?;
        let actual = self.dom.has_class(target, class);
        if actual != expected {
            return Err(Error::AssertionFailed {
                target: selector.to_string(),
                expected: format!("class \"{class}\" present={expected}"),
                actual: format!("present={actual}"),
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }
}

impl Default for Site {
    fn default() -> Self {
        Self::new()
    }
}

fn is_checkbox(dom: &Dom, node: NodeId) -> bool {
    dom.tag_name(node) == "input" && dom.attr(node, "type") == Some("checkbox")
}
