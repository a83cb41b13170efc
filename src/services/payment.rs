//! Mocked checkout flow.
//!
//! There is no payment processor behind this yet: a checkout request is
//! turned into a pre-filled WhatsApp deep link so the conversation continues
//! on messaging. A real gateway integration would replace `checkout_link`
//! while keeping the handler contract.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutKind {
    Subscription,
    Hourly,
    Product,
}

/// Localized message pre-filled into the conversation for each checkout kind.
pub fn checkout_message(kind: CheckoutKind, id: &str, amount: f64, name: Option<&str>) -> String {
    match kind {
        CheckoutKind::Subscription => format!(
            "Olá, gostaria de contratar a assinatura mensal para o projeto (ID: {}). Valor: R$ {:.2}/mês.",
            id, amount
        ),
        CheckoutKind::Hourly => format!(
            "Olá, gostaria de comprar horas de desenvolvimento para o projeto (ID: {}). Valor base: R$ {:.2}/hora.",
            id, amount
        ),
        CheckoutKind::Product => format!(
            "Olá, tenho interesse no produto/serviço: {} (ID: {}). Valor: R$ {:.2}.",
            name.unwrap_or(id),
            id,
            amount
        ),
    }
}

/// Build the `https://wa.me/<number>?text=...` deep link for a message.
pub fn checkout_link(number: &str, message: &str) -> String {
    let encoded = utf8_percent_encode(message, NON_ALPHANUMERIC);
    format!("https://wa.me/{}?text={}", number, encoded)
}
