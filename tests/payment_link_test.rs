use pretty_assertions::assert_eq;

use vertex_portal_api::services::payment::{checkout_link, checkout_message, CheckoutKind};

#[test]
fn subscription_message_carries_id_and_monthly_amount() {
    let msg = checkout_message(CheckoutKind::Subscription, "abc-123", 350.0, None);
    assert_eq!(
        msg,
        "Olá, gostaria de contratar a assinatura mensal para o projeto (ID: abc-123). Valor: R$ 350.00/mês."
    );
}

#[test]
fn hourly_message_carries_base_rate() {
    let msg = checkout_message(CheckoutKind::Hourly, "abc-123", 120.5, None);
    assert_eq!(
        msg,
        "Olá, gostaria de comprar horas de desenvolvimento para o projeto (ID: abc-123). Valor base: R$ 120.50/hora."
    );
}

#[test]
fn product_message_prefers_display_name() {
    let msg = checkout_message(CheckoutKind::Product, "prod-9", 99.9, Some("CRM Vertex"));
    assert_eq!(
        msg,
        "Olá, tenho interesse no produto/serviço: CRM Vertex (ID: prod-9). Valor: R$ 99.90."
    );
}

#[test]
fn product_message_falls_back_to_id_without_name() {
    let msg = checkout_message(CheckoutKind::Product, "prod-9", 99.9, None);
    assert!(msg.contains("produto/serviço: prod-9 (ID: prod-9)"));
}

#[test]
fn link_targets_wa_me_with_number() {
    let url = checkout_link("5511999999999", "hello");
    assert_eq!(url, "https://wa.me/5511999999999?text=hello");
}

#[test]
fn link_percent_encodes_the_message() {
    let url = checkout_link("5511999999999", "Olá, tudo bem?");
    assert!(url.starts_with("https://wa.me/5511999999999?text="));
    // No raw spaces, question marks or accents may survive in the query.
    let query = url.split("text=").nth(1).unwrap();
    assert!(!query.contains(' '));
    assert!(!query.contains('?'));
    assert!(query.contains("%20"));
}
