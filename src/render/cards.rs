//! Record cards
//!
//! Each function turns one API record into an HTML element. The `*_list`
//! helpers prepend every record to a container, so the last record of the
//! input ends up first, the same as inserting them one by one as they arrive.

use super::html::{Container, Element};
use super::time::format_time_12h;
use crate::api::{AuthUser, Caregiver, Medication};

pub fn render_medication(med: &Medication) -> Element {
    let mut details = Element::new("div")
        .class("med-details")
        .child(Element::new("span").class("med-dosage").text(&med.dosage))
        .child(Element::new("span").class("med-frequency").text(&med.frequency))
        .child(
            Element::new("span")
                .class("med-time")
                .text(format_time_12h(&med.time)),
        );

    if let Some(instructions) = med.instructions.as_deref().filter(|i| !i.is_empty()) {
        details = details.child(
            Element::new("p")
                .class("med-instructions")
                .text(instructions),
        );
    }

    let (badge_class, badge_text) = if med.active {
        ("badge-active", "Active")
    } else {
        ("badge-paused", "Paused")
    };

    Element::new("div")
        .class("med-card")
        .class_if(!med.active, "inactive")
        .attr("data-id", med.id.to_string())
        .child(
            Element::new("div")
                .class("med-header")
                .child(Element::new("h3").class("med-name").text(&med.name))
                .child(Element::new("span").class("badge").class(badge_class).text(badge_text)),
        )
        .child(details)
}

pub fn render_caregiver(caregiver: &Caregiver) -> Element {
    let mut contact = Element::new("div").class("caregiver-contact");
    if let Some(phone) = caregiver.phone.as_deref().filter(|p| !p.is_empty()) {
        contact = contact.child(
            Element::new("a")
                .class("caregiver-phone")
                .attr("href", format!("tel:{}", phone))
                .text(phone),
        );
    }
    if let Some(email) = caregiver.email.as_deref().filter(|e| !e.is_empty()) {
        contact = contact.child(
            Element::new("a")
                .class("caregiver-email")
                .attr("href", format!("mailto:{}", email))
                .text(email),
        );
    }

    let mut header = Element::new("div")
        .class("caregiver-header")
        .child(Element::new("h3").class("caregiver-name").text(&caregiver.name));
    if caregiver.is_primary {
        header = header.child(Element::new("span").class("badge").class("badge-primary").text("Primary"));
    }

    Element::new("div")
        .class("caregiver-card")
        .class_if(caregiver.is_primary, "primary")
        .attr("data-id", caregiver.id.to_string())
        .child(header)
        .child(
            Element::new("p")
                .class("caregiver-relation")
                .text(caregiver.relation.as_deref().unwrap_or("Caregiver")),
        )
        .child(contact)
}

/// Profile summary: display name, email and join date
pub fn render_profile(user: &AuthUser) -> Element {
    let mut card = Element::new("div")
        .class("profile-card")
        .child(Element::new("h2").class("profile-name").text(user.display_name()));

    if let Some(email) = user.email.as_deref() {
        card = card.child(Element::new("p").class("profile-email").text(email));
    }
    if let Some(joined) = user.joined() {
        card = card.child(
            Element::new("p")
                .class("profile-joined")
                .text(format!("Member since {}", joined)),
        );
    }

    card
}

pub fn render_medication_list(container: &mut Container, meds: &[Medication]) {
    for med in meds {
        container.prepend(render_medication(med));
    }
}

pub fn render_caregiver_list(container: &mut Container, caregivers: &[Caregiver]) {
    for caregiver in caregivers {
        container.prepend(render_caregiver(caregiver));
    }
}
