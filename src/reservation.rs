//! Reservation intake.
//!
//! Reservations leave the store through a messaging deep link; this module
//! owns the strict contact validation and the summary text, while the link
//! itself stays with the caller.

use thiserror::Error;

use crate::{items::LineItem, money::format_cop, pricing::PricingResult};

/// Domains a reservation email may use.
const ACCEPTED_DOMAINS: [&str; 2] = ["gmail.com", "hotmail.com"];

/// Digits required in a reservation phone number.
const PHONE_DIGITS: usize = 10;

/// Validation failures for a reservation request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReservationError {
    /// A required field was empty.
    #[error("all fields are required")]
    MissingField,

    /// A name contained something other than letters.
    #[error("names may only contain letters")]
    InvalidName,

    /// The email was malformed or on an unaccepted domain.
    #[error("only gmail.com and hotmail.com addresses are accepted")]
    InvalidEmail,

    /// The phone number was not exactly 10 digits.
    #[error("phone numbers must be exactly {PHONE_DIGITS} digits")]
    InvalidPhone,
}

impl ReservationError {
    /// Storefront copy for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingField => "Por favor completa todos los campos",
            Self::InvalidName => "El nombre solo puede contener letras",
            Self::InvalidEmail => "Solo se aceptan correos de Gmail o Hotmail",
            Self::InvalidPhone => "El teléfono debe tener exactamente 10 dígitos",
        }
    }
}

/// A reservation form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequest {
    /// Shopper's first name.
    pub first_name: String,

    /// Shopper's last name.
    pub last_name: String,

    /// Contact phone, exactly 10 digits.
    pub phone: String,

    /// Contact email, `gmail.com` or `hotmail.com` only.
    pub email: String,

    /// How the shopper intends to pay on pickup.
    pub payment_method: String,
}

impl ReservationRequest {
    /// Checks the submission's fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReservationError`] encountered, checking fields
    /// in form order.
    pub fn validate(&self) -> Result<(), ReservationError> {
        let any_empty = [
            &self.first_name,
            &self.last_name,
            &self.phone,
            &self.email,
            &self.payment_method,
        ]
        .iter()
        .any(|field| field.trim().is_empty());

        if any_empty {
            return Err(ReservationError::MissingField);
        }

        if !is_letters_only(&self.first_name) || !is_letters_only(&self.last_name) {
            return Err(ReservationError::InvalidName);
        }

        if !is_accepted_email(&self.email) {
            return Err(ReservationError::InvalidEmail);
        }

        if !is_valid_phone(&self.phone) {
            return Err(ReservationError::InvalidPhone);
        }

        Ok(())
    }
}

fn is_letters_only(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_accepted_email(email: &str) -> bool {
    let mut parts = email.split('@');

    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));

    local_ok && ACCEPTED_DOMAINS.contains(&domain.to_ascii_lowercase().as_str())
}

fn is_valid_phone(phone: &str) -> bool {
    phone.chars().count() == PHONE_DIGITS && phone.chars().all(|c| c.is_ascii_digit())
}

/// Renders the per-line summary a reservation message carries: one line per
/// item, the discount when one applies, and the included gifts.
#[must_use]
pub fn summary_lines(items: &[LineItem], pricing: &PricingResult) -> Vec<String> {
    let mut lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "- {} x{} - {}",
                item.display_name(),
                item.quantity,
                format_cop(item.line_total())
            )
        })
        .collect();

    if pricing.discount_amount > 0 {
        lines.push(format!(
            "Descuento aplicado: {}",
            format_cop(pricing.discount_amount)
        ));
    }

    let gifts: Vec<&str> = items
        .iter()
        .filter(|item| item.is_gift)
        .map(|item| item.name.as_str())
        .collect();

    if !gifts.is_empty() {
        lines.push(format!("Regalo incluido: {}", gifts.join(", ")));
    }

    lines
}

/// Builds the full reservation message body.
#[must_use]
pub fn reservation_message(
    request: &ReservationRequest,
    items: &[LineItem],
    pricing: &PricingResult,
) -> String {
    let mut body = format!(
        "Hola, quiero reservar mi pedido:\n\nCliente: {} {}\nTeléfono: {}\nCorreo: {}\nMétodo de pago: {}\n\nProductos:\n",
        request.first_name, request.last_name, request.phone, request.email, request.payment_method,
    );

    for line in summary_lines(items, pricing) {
        body.push_str(&line);
        body.push('\n');
    }

    body.push_str(&format!("\nTotal: {}", format_cop(pricing.total)));

    body
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::pricing::compute_totals;

    fn request() -> ReservationRequest {
        ReservationRequest {
            first_name: "Ana".to_string(),
            last_name: "Restrepo".to_string(),
            phone: "3001234567".to_string(),
            email: "ana@gmail.com".to_string(),
            payment_method: "efectivo".to_string(),
        }
    }

    #[test]
    fn well_formed_requests_pass() -> TestResult {
        request().validate()?;

        Ok(())
    }

    #[test]
    fn empty_fields_are_rejected_first() {
        let mut bad = request();
        bad.phone = "  ".to_string();

        assert_eq!(bad.validate(), Err(ReservationError::MissingField));
    }

    #[test]
    fn names_with_digits_or_spaces_are_rejected() {
        for name in ["Ana3", "Ana Maria", "Ana-Sofia"] {
            let mut bad = request();
            bad.first_name = name.to_string();

            assert_eq!(
                bad.validate(),
                Err(ReservationError::InvalidName),
                "name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn only_gmail_and_hotmail_are_accepted() {
        let mut ok = request();
        ok.email = "ana.restrepo@HOTMAIL.com".to_string();
        assert_eq!(ok.validate(), Ok(()));

        for email in ["ana@yahoo.com", "ana@gmail", "ana@@gmail.com", "@gmail.com"] {
            let mut bad = request();
            bad.email = email.to_string();

            assert_eq!(
                bad.validate(),
                Err(ReservationError::InvalidEmail),
                "email {email:?} should be rejected"
            );
        }
    }

    #[test]
    fn phones_must_be_exactly_ten_digits() {
        for phone in ["300123456", "30012345678", "30012345ab"] {
            let mut bad = request();
            bad.phone = phone.to_string();

            assert_eq!(
                bad.validate(),
                Err(ReservationError::InvalidPhone),
                "phone {phone:?} should be rejected"
            );
        }
    }

    #[test]
    fn summary_includes_discount_and_gift_lines() -> TestResult {
        let mut sneakers = LineItem::new("tenis-1", "Tenis Nike Air", 200_000, None);
        sneakers.quantity = 3;
        let gift = LineItem::gift("regalo-1", "Gorra Adidas", 80_000, None);

        let items = [sneakers, gift];
        let pricing = compute_totals(&items)?;

        let lines = summary_lines(&items, &pricing);

        assert_eq!(
            lines,
            vec![
                "- Tenis Nike Air x3 - $600.000 COP".to_string(),
                "- Gorra Adidas (REGALO) x1 - $0 COP".to_string(),
                "Descuento aplicado: $60.000 COP".to_string(),
                "Regalo incluido: Gorra Adidas".to_string(),
            ]
        );

        Ok(())
    }

    #[test]
    fn message_carries_customer_and_total() -> TestResult {
        let items = [LineItem::new("jeans-1", "Jean Levi's 501", 85_000, None)];
        let pricing = compute_totals(&items)?;

        let message = reservation_message(&request(), &items, &pricing);

        assert!(message.contains("Cliente: Ana Restrepo"));
        assert!(message.contains("Método de pago: efectivo"));
        assert!(message.contains("Total: $85.000 COP"));

        Ok(())
    }
}
