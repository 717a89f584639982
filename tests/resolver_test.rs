mod common;

use std::path::Path;

use apply_autofill::infrastructure::ControlKind;
use apply_autofill::services::{FieldResolver, SemanticField};
use common::{FakeElement, FakePage};

#[tokio::test]
async fn test_empty_value_never_touches_page() {
    let page = FakePage::new(vec![
        FakeElement::text("email").label("Email"),
        FakeElement::text("phone").label("Phone"),
    ]);
    let resolver = FieldResolver::new();

    assert!(!resolver.resolve(&page, SemanticField::Email, None).await);
    assert!(!resolver.resolve(&page, SemanticField::Phone, Some("   ")).await);
    assert!(!page.touched());
}

#[tokio::test]
async fn test_email_by_aria_label() {
    let page = FakePage::new(vec![FakeElement::text("e1").label("Email")]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Email, Some("a@b.com")).await);
    assert_eq!(page.value("e1"), "a@b.com");
}

#[tokio::test]
async fn test_email_label_skips_checkbox_decoy() {
    let page = FakePage::new(vec![
        FakeElement::new("optin", ControlKind::Checkbox).label("Send me job alerts by email"),
        FakeElement::text("email").label("Email"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Email, Some("a@b.com")).await);
    assert_eq!(page.value("optin"), "");
    assert!(!page.element("optin").checked);
    assert_eq!(page.value("email"), "a@b.com");
}

#[tokio::test]
async fn test_country_label_skips_radio_decoy() {
    let page = FakePage::new(vec![
        FakeElement::radio("differs", "Country of residence differs from tax residence"),
        FakeElement::select("country", &[("Germany", "DE"), ("United Kingdom", "GB")]).label("Country"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Country, Some("Germany")).await);
    assert_eq!(page.value("differs"), "");
    assert!(!page.element("differs").checked);
    assert_eq!(page.value("country"), "DE");
}

#[tokio::test]
async fn test_only_non_text_controls_means_not_filled() {
    let page = FakePage::new(vec![
        FakeElement::new("optin", ControlKind::Checkbox).label("Phone me about new roles"),
        FakeElement::file("upload").label("Phone screenshot"),
    ]);

    assert!(!FieldResolver::new().resolve(&page, SemanticField::Phone, Some("123")).await);
    assert!(!page.touched());
}

#[tokio::test]
async fn test_structural_pattern_wins_over_label() {
    let page = FakePage::new(vec![
        FakeElement::text("by-label").label("Phone number"),
        FakeElement::text("by-attr").attr("type", "tel"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Phone, Some("123")).await);
    assert_eq!(page.value("by-attr"), "123");
    assert_eq!(page.value("by-label"), "");
}

#[tokio::test]
async fn test_hidden_candidates_are_skipped() {
    let page = FakePage::new(vec![
        FakeElement::text("hidden").label("Email").hidden(),
        FakeElement::text("shown").label("Email address"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Email, Some("a@b.com")).await);
    assert_eq!(page.value("hidden"), "");
    assert_eq!(page.value("shown"), "a@b.com");
}

#[tokio::test]
async fn test_full_name_requires_exact_label() {
    let page = FakePage::new(vec![FakeElement::text("first").label("First name")]);

    assert!(!FieldResolver::new().resolve(&page, SemanticField::FullName, Some("Ada Lovelace")).await);
    assert!(!page.touched());
}

#[tokio::test]
async fn test_select_by_visible_label_then_value() {
    let page = FakePage::new(vec![
        FakeElement::select("country", &[("Germany", "DE"), ("United Kingdom", "GB")]).label("Country"),
        FakeElement::select("tax", &[("Germany", "DE"), ("United Kingdom", "GB")]).label("Tax residence"),
    ]);
    let resolver = FieldResolver::new();

    assert!(resolver.resolve(&page, SemanticField::Country, Some("United Kingdom")).await);
    assert_eq!(page.value("country"), "GB");

    assert!(resolver.resolve(&page, SemanticField::TaxResidence, Some("DE")).await);
    assert_eq!(page.value("tax"), "DE");
}

#[tokio::test]
async fn test_combobox_falls_back_to_typing() {
    let page = FakePage::new(vec![FakeElement::combobox("country").label("Country of residence")]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Country, Some("Portugal")).await);
    assert_eq!(page.value("country"), "Portugal");
}

#[tokio::test]
async fn test_radio_inside_labelled_group() {
    let page = FakePage::new(vec![
        // 另一个问题里的同名选项不应被选中
        FakeElement::group("other", "Do you need a visa?"),
        FakeElement::radio("other-female", "Female").within("other"),
        FakeElement::group("gender", "Gender"),
        FakeElement::radio("male", "Male").within("gender"),
        FakeElement::radio("female", "Female").within("gender"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Gender, Some("Female")).await);
    assert!(page.element("female").checked);
    assert!(!page.element("other-female").checked);
    assert!(!page.element("male").checked);
}

#[tokio::test]
async fn test_radio_global_fallback_without_group() {
    let page = FakePage::new(vec![
        FakeElement::radio("male", "Male"),
        FakeElement::radio("female", "Female"),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Gender, Some("Female")).await);
    assert!(page.element("female").checked);
}

#[tokio::test]
async fn test_file_input_by_label_even_when_hidden() {
    let page = FakePage::new(vec![
        FakeElement::file("cover").label("Cover letter"),
        FakeElement::file("resume").label("Resume/CV").hidden(),
    ]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Cv, Some("/tmp/cv.pdf")).await);
    assert_eq!(page.element("resume").files.as_deref(), Some(Path::new("/tmp/cv.pdf")));
    assert!(page.element("cover").files.is_none());
}

#[tokio::test]
async fn test_file_falls_back_to_first_file_input() {
    let page = FakePage::new(vec![FakeElement::file("upload"), FakeElement::file("second")]);

    assert!(FieldResolver::new().resolve(&page, SemanticField::Cv, Some("/tmp/cv.pdf")).await);
    assert!(page.element("upload").files.is_some());
    assert!(page.element("second").files.is_none());
}

#[tokio::test]
async fn test_nearby_text_for_generic_fields_only() {
    let page = FakePage::new(vec![
        FakeElement::text("q1").near("What are your salary expectations?"),
        FakeElement::text("q2").near("Your first name please"),
    ]);
    let resolver = FieldResolver::new();

    assert!(resolver.resolve(&page, SemanticField::Salary, Some("90000")).await);
    assert_eq!(page.value("q1"), "90000");

    assert!(!resolver.resolve(&page, SemanticField::FirstName, Some("Ada")).await);
    assert_eq!(page.value("q2"), "");
}

#[tokio::test]
async fn test_missing_field_returns_false() {
    let page = FakePage::new(vec![FakeElement::new("submit", ControlKind::Submit)]);

    assert!(!FieldResolver::new().resolve(&page, SemanticField::Linkedin, Some("https://linkedin.com/in/x")).await);
    assert!(!page.touched());
}
