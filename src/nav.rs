//! Section navigation, mobile menu, FAQ accordion, and the standalone
//! interactive buttons.

use crate::dom::NodeId;
use crate::scheduler::TimerAction;
use crate::{Action, EventKind, Result, Site};

pub(crate) const EMERGENCY_REVEAL_DELAY_MS: i64 = 500;

impl Site {
    pub(crate) fn register_navigation(&mut self) {
        for link in self.dom.all_with_class("nav-link") {
            self.add_listener(link, EventKind::Click, Action::NavLink);
        }
        for link in self.dom.all_with_class("mobile-nav-link") {
            self.add_listener(link, EventKind::Click, Action::NavLink);
        }
    }

    pub(crate) fn register_mobile_menu(&mut self) {
        if let Some(button) = self.dom.first_with_class("mobile-menu-btn") {
            self.add_listener(button, EventKind::Click, Action::ToggleMobileMenu);
        }
    }

    pub(crate) fn register_faq(&mut self) {
        for question in self.dom.all_with_class("faq-question") {
            self.add_listener(question, EventKind::Click, Action::FaqToggle);
        }
    }

    pub(crate) fn register_interactive_elements(&mut self) {
        if let Some(survey) = self.dom.by_id("take-survey") {
            self.add_listener(survey, EventKind::Click, Action::SurveyAlert);
        }
        for card in self.dom.all_with_class("service-card") {
            if let Some(button) = self.dom.descendant_with_class(card, "btn") {
                self.add_listener(button, EventKind::Click, Action::ServiceButton);
            }
        }
    }

    /// Nav-link click: the clicked link becomes the single active one, its
    /// section the single visible one; the mobile menu is re-hidden and the
    /// viewport jumps back to the top.
    pub(crate) fn on_nav_link_click(&mut self, link: NodeId) {
        let Some(section) = self.dom.attr(link, "data-section").map(str::to_string) else {
            return;
        };
        self.deactivate_nav_links();
        self.dom.add_class(link, "active");
        self.show_section(&section);
        if let Some(mobile_nav) = self.dom.first_with_class("mobile-nav") {
            self.dom.add_class(mobile_nav, "hidden");
        }
        self.scroll_to_top();
    }

    /// Programmatic navigation used by keyboard shortcuts and the
    /// "Get Help Now" button. Unknown ids only deactivate; nothing becomes
    /// visible in their place.
    pub fn navigate_to_section(&mut self, section: &str) -> Result<()> {
        self.deactivate_nav_links();
        let target_link = self
            .dom
            .all_with_class("nav-link")
            .into_iter()
            .find(|link| self.dom.attr(*link, "data-section") == Some(section));
        if let Some(link) = target_link {
            self.dom.add_class(link, "active");
        }
        self.show_section(section);
        self.scroll_to_top();
        Ok(())
    }

    fn deactivate_nav_links(&mut self) {
        for link in self.dom.all_with_class("nav-link") {
            self.dom.remove_class(link, "active");
        }
        for link in self.dom.all_with_class("mobile-nav-link") {
            self.dom.remove_class(link, "active");
        }
    }

    fn show_section(&mut self, section: &str) {
        for node in self.dom.all_with_class("section") {
            self.dom.remove_class(node, "active");
        }
        if let Some(target) = self.dom.by_id(section) {
            self.dom.add_class(target, "active");
        }
    }

    pub(crate) fn toggle_mobile_menu(&mut self) {
        if let Some(mobile_nav) = self.dom.first_with_class("mobile-nav") {
            self.dom.toggle_class(mobile_nav, "hidden");
        }
    }

    /// Exclusive accordion: every other item closes, the clicked one toggles.
    pub(crate) fn on_faq_question_click(&mut self, question: NodeId) {
        let Some(item) = self.dom.parent(question) else {
            return;
        };
        for other in self.dom.all_with_class("faq-item") {
            if other != item {
                self.dom.remove_class(other, "active");
            }
        }
        self.dom.toggle_class(item, "active");
    }

    /// Service-card buttons dispatch on their visible label, mirroring how
    /// the original site switched on button text.
    pub(crate) fn on_service_button_click(&mut self, button: NodeId) -> Result<()> {
        let label = self.dom.text_content(button).trim().to_string();
        match label.as_str() {
            "Start Chat" => self.open_chat(),
            "Get Help Now" => {
                self.navigate_to_section("contact")?;
                self.schedule_timeout(
                    TimerAction::RevealEmergencySection,
                    EMERGENCY_REVEAL_DELAY_MS,
                );
            }
            "Book Session" => self.alerts.push(
                "Counselor booking system would be implemented here. Users would be able to \
                 browse available therapists, check schedules, and book anonymous sessions."
                    .to_string(),
            ),
            "Try AI Assistant" => self.alerts.push(
                "AI Mental Health Assistant would be launched here. This would provide \
                 intelligent, empathetic responses and resource recommendations."
                    .to_string(),
            ),
            "Start Exercise" => self.alerts.push(
                "Guided breathing and meditation module would be launched here. This would \
                 include various breathing techniques and mindfulness exercises."
                    .to_string(),
            ),
            "Join Group" => self.alerts.push(
                "Group therapy registration would be implemented here. Users would be able to \
                 view available groups and join sessions anonymously."
                    .to_string(),
            ),
            _ => {}
        }
        Ok(())
    }
}
