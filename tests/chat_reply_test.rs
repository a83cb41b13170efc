use pretty_assertions::assert_eq;
use serde_json::json;

use vertex_portal_api::services::chatbot::{extract_reply, FALLBACK_REPLY};

#[test]
fn output_field_wins() {
    let body = json!({"output": "from output", "text": "from text", "message": "from message"});
    assert_eq!(extract_reply(&body), "from output");
}

#[test]
fn text_field_is_second_choice() {
    let body = json!({"text": "from text", "message": "from message"});
    assert_eq!(extract_reply(&body), "from text");
}

#[test]
fn message_field_is_last_choice() {
    let body = json!({"message": "from message"});
    assert_eq!(extract_reply(&body), "from message");
}

#[test]
fn unknown_shape_is_returned_verbatim() {
    let body = json!({"something": 42});
    assert_eq!(extract_reply(&body), r#"{"something":42}"#);
}

#[test]
fn non_string_reply_fields_are_ignored() {
    let body = json!({"output": 1, "text": "actual reply"});
    assert_eq!(extract_reply(&body), "actual reply");
}

#[test]
fn fallback_reply_is_in_portuguese() {
    assert_eq!(
        FALLBACK_REPLY,
        "Desculpe, ocorreu um erro ao processar sua mensagem. Tente novamente mais tarde."
    );
}
