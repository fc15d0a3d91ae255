use {
    crate::domain::{error::PaymentError, notify::ReceiptDetails},
    printpdf::{BuiltinFont, Mm, PdfDocument},
};

/// Render the single-page A4 receipt. Pure function over the details so the
/// admin download route and the mail attachment share one rendering.
pub fn render_receipt_pdf(details: &ReceiptDetails) -> Result<Vec<u8>, PaymentError> {
    let (doc, page, layer) =
        PdfDocument::new("Payment receipt", Mm(210.0), Mm(297.0), "receipt");
    let current = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| PaymentError::Notification(format!("receipt font: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| PaymentError::Notification(format!("receipt font: {e}")))?;

    current.use_text("Payment receipt", 18.0, Mm(70.0), Mm(270.0), &bold);

    let mut y = 250.0;
    let mut line = |text: String| {
        current.use_text(text, 12.0, Mm(25.0), Mm(y), &regular);
        y -= 8.0;
    };

    line(format!("Reference: {}", details.reference));
    line(format!("Amount: {} {}", details.amount, details.currency));
    line(format!("Status: {}", details.status));
    if let Some(email) = &details.customer_email {
        line(format!("Customer: {email}"));
    }
    line(format!(
        "Date: {}",
        details.issued_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    line("Thank you for your purchase.".to_string());

    doc.save_to_bytes()
        .map_err(|e| PaymentError::Notification(format!("receipt render: {e}")))
}
