use vertex_portal_api::handlers::contact_requests::{
    validate_contact, validate_message, validate_name, validate_phone, CreateContactRequest,
};

fn valid_request() -> CreateContactRequest {
    CreateContactRequest {
        name: "Maria Silva".to_string(),
        country: "Brasil".to_string(),
        country_code: "+55".to_string(),
        phone: "11 91234-5678".to_string(),
        message: "Gostaria de um orçamento para um site institucional.".to_string(),
    }
}

#[test]
fn a_well_formed_request_passes() {
    assert!(validate_contact(&valid_request()).is_ok());
}

#[test]
fn single_character_name_is_rejected() {
    assert!(validate_name("M").is_err());
}

#[test]
fn name_with_digits_is_rejected() {
    assert!(validate_name("Maria123").is_err());
}

#[test]
fn accented_names_are_accepted() {
    assert!(validate_name("João Araújo").is_ok());
}

#[test]
fn overlong_name_is_rejected() {
    assert!(validate_name(&"a".repeat(101)).is_err());
}

#[test]
fn name_limits_count_characters_not_bytes() {
    // 100 accented characters is 200 bytes but still within the cap.
    assert!(validate_name(&"é".repeat(100)).is_ok());
    assert!(validate_name(&"é".repeat(101)).is_err());
}

#[test]
fn phone_needs_at_least_eight_digits() {
    assert!(validate_phone("1234567").is_err());
    assert!(validate_phone("12345678").is_ok());
}

#[test]
fn phone_formatting_characters_do_not_count() {
    assert!(validate_phone("(11) 1234-567").is_err());
    assert!(validate_phone("(11) 91234-5678").is_ok());
}

#[test]
fn short_message_is_rejected() {
    assert!(validate_message("oi").is_err());
}

#[test]
fn overlong_message_is_rejected() {
    assert!(validate_message(&"a".repeat(1001)).is_err());
}

#[test]
fn message_limits_count_characters_not_bytes() {
    assert!(validate_message(&"ã".repeat(1000)).is_ok());
    assert!(validate_message(&"ã".repeat(1001)).is_err());

    // Ten accented characters clear the minimum even at twenty bytes.
    assert!(validate_message("áéíóúâêôãç").is_ok());
}

#[test]
fn spam_keywords_are_rejected() {
    assert!(validate_message("Win a big prize at our online casino today!").is_err());
    assert!(validate_message("Guaranteed crypto investment returns, act now").is_err());
}

#[test]
fn spam_check_is_case_insensitive() {
    assert!(validate_message("CASINO bonus waiting for you right now").is_err());
}

#[test]
fn missing_country_fails_the_full_check() {
    let mut req = valid_request();
    req.country = " ".to_string();
    assert!(validate_contact(&req).is_err());
}

#[test]
fn missing_country_code_fails_the_full_check() {
    let mut req = valid_request();
    req.country_code = String::new();
    assert!(validate_contact(&req).is_err());
}
