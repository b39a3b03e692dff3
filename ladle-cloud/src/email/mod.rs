use aws_sdk_sesv2::types::{Body, Content, Destination, EmailContent, Message};
use aws_sdk_sesv2::Client as SesClient;

pub async fn send_order_confirmed(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_number: i64,
    total_cents: i64,
    currency: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subject = Content::builder()
        .data(format!("Commande #{order_number} confirmée / Order confirmed"))
        .build()?;

    let total = format!("{}.{:02} {}", total_cents / 100, total_cents % 100, currency.to_uppercase());
    let body_text = format!(
        "Votre paiement a bien été reçu.\n\
         Commande n°{order_number}, total {total}.\n\
         Le restaurant prépare votre commande.\n\n\
         Your payment was received.\n\
         Order #{order_number}, total {total}.\n\
         The restaurant is preparing your order."
    );

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    tracing::info!(to = to, order_number, "Order confirmation sent");
    Ok(())
}

pub async fn send_order_refunded(
    ses: &SesClient,
    from: &str,
    to: &str,
    order_number: i64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let subject = Content::builder()
        .data(format!("Commande #{order_number} remboursée / Order refunded"))
        .build()?;

    let body_text = format!(
        "Votre commande n°{order_number} a été annulée et remboursée.\n\
         Le remboursement apparaîtra sous quelques jours.\n\n\
         Your order #{order_number} was cancelled and refunded.\n\
         The refund will appear within a few days."
    );

    let body = Body::builder()
        .text(Content::builder().data(body_text).build()?)
        .build();

    let message = Message::builder().subject(subject).body(body).build();

    ses.send_email()
        .from_email_address(from)
        .destination(Destination::builder().to_addresses(to).build())
        .content(EmailContent::builder().simple(message).build())
        .send()
        .await?;

    tracing::info!(to = to, order_number, "Refund notice sent");
    Ok(())
}
