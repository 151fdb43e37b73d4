//! Fixed MindHaven page tree. The original site ships this as static HTML;
//! here it is constructed programmatically so the runtime starts from the
//! same document every time.

use crate::dom::{Dom, NodeId};

pub(crate) const SERVICE_BUTTON_LABELS: [&str; 6] = [
    "Start Chat",
    "Book Session",
    "Try AI Assistant",
    "Start Exercise",
    "Get Help Now",
    "Join Group",
];

const NAV_LABELS: [(&str, &str); 4] = [
    ("home", "Home"),
    ("about", "About"),
    ("services", "Services"),
    ("contact", "Contact"),
];

const FAQ_ENTRIES: [(&str, &str); 3] = [
    (
        "Is the service really anonymous?",
        "Yes. You can use every feature without creating an account.",
    ),
    (
        "How fast does the support team respond?",
        "Chat replies arrive within minutes; form messages within 24 hours.",
    ),
    (
        "What should I do in an emergency?",
        "Call the hotline at 1800-891-4416 or local emergency services.",
    ),
];

pub(crate) fn build() -> Dom {
    let mut dom = Dom::new();
    let body = dom.root();

    build_header(&mut dom, body);
    build_home(&mut dom, body);
    build_about(&mut dom, body);
    build_services(&mut dom, body);
    build_contact(&mut dom, body);
    build_chat_modal(&mut dom, body);

    dom
}

fn build_header(dom: &mut Dom, body: NodeId) {
    let header = dom.create_element(body, "header");

    let nav = dom.create_element(header, "nav");
    for (section, label) in NAV_LABELS {
        let link = dom.create_element(nav, "button");
        dom.add_class(link, "nav-link");
        dom.set_attr(link, "data-section", section);
        dom.set_text(link, label);
        if section == "home" {
            dom.add_class(link, "active");
        }
    }

    let menu_btn = dom.create_element(header, "button");
    dom.add_class(menu_btn, "mobile-menu-btn");
    dom.set_text(menu_btn, "Menu");

    let mobile_nav = dom.create_element(header, "div");
    dom.add_class(mobile_nav, "mobile-nav");
    dom.add_class(mobile_nav, "hidden");
    for (section, label) in NAV_LABELS {
        let link = dom.create_element(mobile_nav, "button");
        dom.add_class(link, "mobile-nav-link");
        dom.set_attr(link, "data-section", section);
        dom.set_text(link, label);
    }

    let chat_button = dom.create_element(header, "button");
    dom.set_attr(chat_button, "id", "chat-button");
    dom.set_text(chat_button, "Chat");
}

fn build_home(dom: &mut Dom, body: NodeId) {
    let home = section(dom, body, "home");
    dom.add_class(home, "active");

    let hero_chat = dom.create_element(home, "button");
    dom.set_attr(hero_chat, "id", "start-chat-hero");
    dom.set_text(hero_chat, "Talk to someone now");

    let demo_chat = dom.create_element(home, "button");
    dom.set_attr(demo_chat, "id", "demo-chat");
    dom.set_text(demo_chat, "See how chat works");

    let survey = dom.create_element(home, "button");
    dom.set_attr(survey, "id", "take-survey");
    dom.set_text(survey, "Take the wellness survey");

    let emergency_link = dom.create_element(home, "a");
    dom.set_attr(emergency_link, "href", "#contact");
    dom.add_class(emergency_link, "emergency-link");
    dom.set_text(emergency_link, "Need help right away?");
}

fn build_about(dom: &mut Dom, body: NodeId) {
    let about = section(dom, body, "about");

    for (question, answer) in FAQ_ENTRIES {
        let item = dom.create_element(about, "div");
        dom.add_class(item, "faq-item");

        let q = dom.create_element(item, "button");
        dom.add_class(q, "faq-question");
        dom.set_text(q, question);

        let a = dom.create_element(item, "div");
        dom.add_class(a, "faq-answer");
        dom.set_text(a, answer);
    }
}

fn build_services(dom: &mut Dom, body: NodeId) {
    let services = section(dom, body, "services");

    for label in SERVICE_BUTTON_LABELS {
        let card = dom.create_element(services, "div");
        dom.add_class(card, "service-card");
        let button = dom.create_element(card, "button");
        dom.add_class(button, "btn");
        dom.set_text(button, label);
    }
}

fn build_contact(dom: &mut Dom, body: NodeId) {
    let contact = section(dom, body, "contact");

    let emergency = dom.create_element(contact, "div");
    dom.add_class(emergency, "emergency-section");
    dom.set_text(
        emergency,
        "In immediate danger? Call 1800-891-4416 or local emergency services.",
    );

    let form = dom.create_element(contact, "form");
    dom.set_attr(form, "id", "contact-form");

    let category = select_field(dom, form, "category");
    dom.set_required(category, true);
    for (value, label) in [
        ("", "Select a category"),
        ("general", "General question"),
        ("support", "Support request"),
        ("feedback", "Feedback"),
        ("emergency", "Emergency"),
    ] {
        option(dom, category, value, label);
    }

    let urgency = select_field(dom, form, "urgency");
    dom.set_value(urgency, "low");
    dom.element_mut(urgency).default_value = "low".to_string();
    for (value, label) in [
        ("low", "Low"),
        ("medium", "Medium"),
        ("high", "High"),
        ("urgent", "Urgent"),
    ] {
        option(dom, urgency, value, label);
    }

    let anonymous_group = dom.create_element(form, "div");
    dom.add_class(anonymous_group, "form-group");
    let anonymous = dom.create_element(anonymous_group, "input");
    dom.set_attr(anonymous, "id", "anonymous");
    dom.set_attr(anonymous, "type", "checkbox");

    input_field(dom, form, "name", "input", false);
    input_field(dom, form, "email", "input", true);
    input_field(dom, form, "message", "textarea", true);

    let submit = dom.create_element(form, "button");
    dom.set_attr(submit, "id", "submit-button");
    dom.set_attr(submit, "type", "submit");
    dom.set_text(submit, "Send Message");
}

fn build_chat_modal(dom: &mut Dom, body: NodeId) {
    let modal = dom.create_element(body, "div");
    dom.set_attr(modal, "id", "chat-modal");
    dom.add_class(modal, "modal");
    dom.add_class(modal, "hidden");

    let overlay = dom.create_element(modal, "div");
    dom.add_class(overlay, "modal-overlay");

    let content = dom.create_element(modal, "div");
    dom.add_class(content, "modal-content");

    let close = dom.create_element(content, "button");
    dom.add_class(close, "modal-close");
    dom.set_text(close, "\u{00d7}");

    let messages = dom.create_element(content, "div");
    dom.add_class(messages, "chat-messages");

    let input_row = dom.create_element(content, "div");
    dom.add_class(input_row, "chat-input-row");

    let input = dom.create_element(input_row, "input");
    dom.set_attr(input, "id", "chat-input");
    dom.set_attr(input, "type", "text");

    let send = dom.create_element(input_row, "button");
    dom.set_attr(send, "id", "send-chat");
    dom.set_text(send, "Send");
}

fn section(dom: &mut Dom, body: NodeId, id: &str) -> NodeId {
    let node = dom.create_element(body, "div");
    dom.set_attr(node, "id", id);
    dom.add_class(node, "section");
    node
}

fn select_field(dom: &mut Dom, form: NodeId, id: &str) -> NodeId {
    let group = dom.create_element(form, "div");
    dom.add_class(group, "form-group");
    let field = dom.create_element(group, "select");
    dom.set_attr(field, "id", id);
    dom.add_class(field, "form-control");
    field
}

fn option(dom: &mut Dom, select: NodeId, value: &str, label: &str) {
    let node = dom.create_element(select, "option");
    dom.set_attr(node, "value", value);
    dom.set_text(node, label);
}

fn input_field(dom: &mut Dom, form: NodeId, id: &str, tag: &str, required: bool) -> NodeId {
    let group = dom.create_element(form, "div");
    dom.add_class(group, "form-group");
    let field = dom.create_element(group, tag);
    dom.set_attr(field, "id", id);
    dom.add_class(field, "form-control");
    dom.set_required(field, required);
    field
}
