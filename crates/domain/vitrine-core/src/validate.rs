use std::collections::BTreeMap;

use crate::catalog::{ContactDraft, ProductDraft, ProjectDraft, ServiceDraft};
use crate::LocalizedText;

/// Field-keyed validation messages, compatible with the form machine's
/// per-field error map.
pub type FieldErrors = BTreeMap<String, String>;

pub const IMAGE_REQUIRED: &str = "at least one image is required";

fn require_bilingual(errors: &mut FieldErrors, field: &str, text: &LocalizedText) {
    if text.vi.trim().is_empty() {
        errors.insert(format!("{field}_vi"), format!("{field} (vi) is required"));
    }
    if text.en.trim().is_empty() {
        errors.insert(format!("{field}_en"), format!("{field} (en) is required"));
    }
}

fn require_images(errors: &mut FieldErrors, image_count: usize) {
    if image_count == 0 {
        errors.insert("images".to_string(), IMAGE_REQUIRED.to_string());
    }
}

fn finish(errors: FieldErrors) -> Result<(), FieldErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_product_draft(draft: &ProductDraft, image_count: usize) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_bilingual(&mut errors, "name", &draft.name);
    require_images(&mut errors, image_count);
    finish(errors)
}

pub fn validate_service_draft(draft: &ServiceDraft, image_count: usize) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_bilingual(&mut errors, "name", &draft.name);
    require_images(&mut errors, image_count);
    finish(errors)
}

pub fn validate_project_draft(draft: &ProjectDraft, image_count: usize) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_bilingual(&mut errors, "name", &draft.name);
    require_images(&mut errors, image_count);
    finish(errors)
}

pub fn validate_contact_draft(draft: &ContactDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_bilingual(&mut errors, "address", &draft.address);
    if draft.email.trim().is_empty() {
        errors.insert("email".into(), "email is required".into());
    } else if !looks_like_email(&draft.email) {
        errors.insert("email".into(), "email address is not valid".into());
    }
    if draft.phone.trim().is_empty() {
        errors.insert("phone".into(), "phone is required".into());
    }
    finish(errors)
}

/// Lightweight plausibility check; real deliverability is out of scope.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((user, host)) => {
            !user.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_draft_with_zero_images_is_rejected_with_specific_message() {
        let draft = ProductDraft {
            name: LocalizedText::new("Bàn thép", "Steel table"),
            ..Default::default()
        };
        let errors = validate_product_draft(&draft, 0).unwrap_err();
        assert_eq!(errors.get("images").map(String::as_str), Some(IMAGE_REQUIRED));
    }

    #[test]
    fn missing_translations_are_reported_per_language() {
        let draft = ProductDraft {
            name: LocalizedText::new("", "Steel table"),
            ..Default::default()
        };
        let errors = validate_product_draft(&draft, 1).unwrap_err();
        assert!(errors.contains_key("name_vi"));
        assert!(!errors.contains_key("name_en"));
    }

    #[test]
    fn email_plausibility() {
        assert!(looks_like_email("sales@acme.vn"));
        assert!(!looks_like_email("sales"));
        assert!(!looks_like_email("sales@acme"));
        assert!(!looks_like_email("sales@.vn"));
    }
}
