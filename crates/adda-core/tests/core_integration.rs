#![allow(clippy::unwrap_used, clippy::expect_used)]

use adda_core::*;

// ---------------------------------------------------------------------------
// 1. Messages serialize in provider wire shape
// ---------------------------------------------------------------------------

#[test]
fn message_slice_serializes_as_wire_array() {
    let messages = vec![
        Message::system("Be brief."),
        Message::user("Hi"),
        Message::assistant("Hello."),
    ];
    let json = serde_json::to_value(&messages).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"role": "system", "content": "Be brief."},
            {"role": "user", "content": "Hi"},
            {"role": "assistant", "content": "Hello."},
        ])
    );
}

// ---------------------------------------------------------------------------
// 2. Personas declared in TOML
// ---------------------------------------------------------------------------

#[test]
fn persona_from_toml_uses_defaults() {
    let toml_str = r#"
        key = "munshi"
        name = "Munshi Ji"
        system_prompt = "You are an old accountant."

        [[seed_exchanges]]
        question = "Hisaab?"
        answer = "Sab barabar hai."
    "#;
    let persona: PersonaConfig = toml::from_str(toml_str).unwrap();

    assert_eq!(persona.key, "munshi");
    assert_eq!(persona.seed_exchanges.len(), 1);
    assert_eq!(persona.seed_exchanges[0].answer, "Sab barabar hai.");
    assert_eq!(persona.temperature, None);
    assert!(persona.fallback_template.contains("{error}"));
    assert_eq!(persona.presentation.input_placeholder, "Say something...");
    assert_eq!(persona.title(), "Munshi Ji");
    assert!(persona.validate().is_ok());
}

#[test]
fn persona_from_toml_with_presentation() {
    let toml_str = r#"
        key = "munshi"
        name = "Munshi Ji"
        system_prompt = "You are an old accountant."
        temperature = 0.3
        fallback_template = "Khata band hai. ({error})"

        [presentation]
        title = "📒 Munshi Ji"
        input_placeholder = "Kya likhna hai?"
    "#;
    let persona: PersonaConfig = toml::from_str(toml_str).unwrap();

    assert_eq!(persona.temperature, Some(0.3));
    assert_eq!(persona.title(), "📒 Munshi Ji");
    assert_eq!(persona.presentation.clear_label, "New conversation");
    assert_eq!(persona.fallback_reply("timeout"), "Khata band hai. (timeout)");
}

// ---------------------------------------------------------------------------
// 3. Registry
// ---------------------------------------------------------------------------

#[test]
fn registry_accepts_configured_persona_and_default() {
    let mut registry = PersonaRegistry::with_builtins();
    let custom: PersonaConfig = toml::from_str(
        r#"
        key = "munshi"
        name = "Munshi Ji"
        system_prompt = "You are an old accountant."
    "#,
    )
    .unwrap();
    registry.register(custom);
    registry.set_default("munshi").unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.resolve(None).name, "Munshi Ji");
    assert_eq!(registry.resolve(Some("chhapri_bhaiya")).name, "Chhapri Bhaiya");
}

#[test]
fn config_error_is_the_only_fatal_kind() {
    let err = PersonaRegistry::with_builtins()
        .set_default("ghost")
        .unwrap_err();
    assert!(err.is_fatal());
    assert!(err.to_string().contains("ghost"));
}
