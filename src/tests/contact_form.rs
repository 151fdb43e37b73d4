use crate::*;

#[test]
fn emergency_category_locks_urgency_and_shows_banner_once() -> Result<()> {
    let mut site = Site::new();
    site.select_option("#category", "emergency")?;

    site.assert_value("#urgency", "urgent")?;
    assert!(site.is_disabled("#urgency")?);
    assert_eq!(site.count_with_class("emergency-warning"), 1);

    // Urgency edits are rejected while locked.
    site.select_option("#urgency", "low")?;
    site.assert_value("#urgency", "urgent")?;

    // Re-selecting emergency never duplicates the banner.
    site.select_option("#category", "emergency")?;
    assert_eq!(site.count_with_class("emergency-warning"), 1);

    let banner = site.text_of(".emergency-warning")?;
    assert!(banner.contains("1800-891-4416"));
    Ok(())
}

#[test]
fn leaving_emergency_unlocks_urgency_and_removes_banner() -> Result<()> {
    let mut site = Site::new();
    site.select_option("#category", "emergency")?;
    site.select_option("#category", "support")?;

    assert!(!site.is_disabled("#urgency")?);
    assert_eq!(site.count_with_class("emergency-warning"), 0);
    Ok(())
}

#[test]
fn category_change_annotates_the_field_inline() -> Result<()> {
    let mut site = Site::new();
    site.select_option("#category", "general")?;
    assert!(site.has_class("#category", "success")?);
    Ok(())
}

#[test]
fn anonymous_toggle_clears_and_disables_identity_fields() -> Result<()> {
    let mut site = Site::new();
    site.type_text("#name", "Ada")?;
    site.type_text("#email", "ada@example.org")?;

    site.set_checked("#anonymous", true)?;
    site.assert_value("#name", "")?;
    site.assert_value("#email", "")?;
    assert!(site.is_disabled("#name")?);
    assert!(site.is_disabled("#email")?);
    assert!(!site.is_required("#name")?);
    assert!(!site.is_required("#email")?);

    // Typing into the disabled fields is a silent no-op.
    site.type_text("#email", "ghost@example.org")?;
    site.assert_value("#email", "")?;

    site.set_checked("#anonymous", false)?;
    assert!(!site.is_disabled("#name")?);
    assert!(!site.is_disabled("#email")?);
    assert!(site.is_required("#email")?);
    assert!(!site.is_required("#name")?);
    Ok(())
}

#[test]
fn email_blur_shows_error_then_typing_clears_it() -> Result<()> {
    let mut site = Site::new();
    site.type_text("#email", "not-an-address")?;
    site.blur("#email")?;

    assert!(site.has_class("#email", "error")?);
    site.assert_text(".error-message", "Please enter a valid email address")?;

    site.type_text("#email", "not-an-address@exam")?;
    assert!(!site.has_class("#email", "error")?);
    assert_eq!(site.count_with_class("error-message"), 0);
    Ok(())
}

#[test]
fn repeated_blur_never_stacks_annotations() -> Result<()> {
    let mut site = Site::new();
    site.type_text("#email", "nope")?;
    site.blur("#email")?;
    site.blur("#email")?;
    site.blur("#email")?;
    assert_eq!(site.count_with_class("error-message"), 1);
    Ok(())
}

#[test]
fn valid_email_blur_marks_success() -> Result<()> {
    let mut site = Site::new();
    site.type_text("#email", "a@b.co")?;
    site.blur("#email")?;
    assert!(site.has_class("#email", "success")?);
    assert!(!site.has_class("#email", "error")?);
    assert_eq!(site.count_with_class("error-message"), 0);
    Ok(())
}

#[test]
fn message_blur_reports_too_short() -> Result<()> {
    let mut site = Site::new();
    site.type_text("#message", "too short")?;
    site.blur("#message")?;
    assert!(site.has_class("#message", "error")?);
    site.assert_text(
        ".error-message",
        "Message must be at least 10 characters long",
    )?;
    Ok(())
}

#[test]
fn character_counter_tracks_length_and_tone() -> Result<()> {
    let mut site = Site::new();
    site.assert_text(".character-counter", "0/1000 characters")?;
    assert!(site.has_class(".character-counter", "warn")?);

    site.type_text("#message", "short")?;
    site.assert_text(".character-counter", "5/1000 characters")?;
    assert!(site.has_class(".character-counter", "warn")?);

    site.type_text("#message", &"x".repeat(20))?;
    site.assert_text(".character-counter", "20/1000 characters")?;
    assert!(site.has_class(".character-counter", "ok")?);

    site.type_text("#message", &"x".repeat(950))?;
    site.assert_text(".character-counter", "950/1000 characters")?;
    assert!(site.has_class(".character-counter", "near-limit")?);
    Ok(())
}

#[test]
fn form_state_snapshot_reflects_fields() -> Result<()> {
    let mut site = Site::new();
    site.select_option("#category", "feedback")?;
    site.select_option("#urgency", "high")?;
    site.type_text("#name", "Sam")?;
    site.type_text("#email", "sam@example.org")?;
    site.type_text("#message", "the site has been a great help")?;

    let state = site.form_state()?;
    assert_eq!(
        state,
        FormState {
            category: "feedback".into(),
            urgency: "high".into(),
            anonymous: false,
            name: "Sam".into(),
            email: "sam@example.org".into(),
            message: "the site has been a great help".into(),
        }
    );
    Ok(())
}
