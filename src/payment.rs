//! Payment requests and the payment simulator.
//!
//! Requests are typed per method and shape-validated before any simulated
//! authorization. The simulator is the only source of nondeterminism in the
//! checkout path, and its random source and failure rate are injectable.

use std::fmt;

use rand::{Rng, rngs::ThreadRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Minimum digits for a wallet (Nequi / Bancolombia) number.
const WALLET_MIN_DIGITS: usize = 10;

/// Minimum digits for a card number after stripping spaces.
const CARD_MIN_DIGITS: usize = 16;

/// Minimum digits for a CVV.
const CVV_MIN_DIGITS: usize = 3;

/// Shape-validation failures for a payment request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Wallet number is not at least 10 digits.
    #[error("wallet number must be at least {WALLET_MIN_DIGITS} digits")]
    WalletNumber,

    /// Card number is not at least 16 digits after stripping spaces.
    #[error("card number must be at least {CARD_MIN_DIGITS} digits")]
    CardNumber,

    /// Expiry is not in `MM/YY` form.
    #[error("card expiry must be in MM/YY form")]
    CardExpiry,

    /// CVV is not at least 3 digits.
    #[error("card cvv must be at least {CVV_MIN_DIGITS} digits")]
    CardCvv,

    /// Holder name is shorter than 2 characters after trimming.
    #[error("card holder name must be at least 2 characters")]
    CardHolder,
}

impl ValidationError {
    /// Storefront copy for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::WalletNumber => "Por favor ingresa un número válido (10 dígitos)",
            Self::CardNumber => "Número de tarjeta inválido",
            Self::CardExpiry => "Fecha de vencimiento inválida (MM/AA)",
            Self::CardCvv => "CVV inválido",
            Self::CardHolder => "Nombre en la tarjeta inválido",
        }
    }
}

/// A supported payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Nequi wallet.
    Nequi,

    /// Bancolombia account.
    Bancolombia,

    /// Credit or debit card.
    Card,
}

impl PaymentMethod {
    /// Lowercase wire key, used in transaction ids and records.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Nequi => "nequi",
            Self::Bancolombia => "bancolombia",
            Self::Card => "card",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A payment request, typed per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRequest {
    /// Pay from a Nequi wallet.
    Nequi {
        /// Wallet phone number.
        number: String,
    },

    /// Pay from a Bancolombia account.
    Bancolombia {
        /// Account number.
        number: String,
    },

    /// Pay by card.
    Card {
        /// Card number, spaces allowed.
        number: String,

        /// Expiry in `MM/YY` form.
        expiry: String,

        /// Security code. Never stored.
        cvv: String,

        /// Name on the card.
        holder: String,
    },
}

impl PaymentRequest {
    /// The method this request pays with.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::Nequi { .. } => PaymentMethod::Nequi,
            Self::Bancolombia { .. } => PaymentMethod::Bancolombia,
            Self::Card { .. } => PaymentMethod::Card,
        }
    }

    /// Checks the request's shape.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, checking fields in
    /// form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Nequi { number } | Self::Bancolombia { number } => validate_wallet_number(number),
            Self::Card {
                number,
                expiry,
                cvv,
                holder,
            } => {
                validate_card_number(number)?;
                validate_expiry(expiry)?;
                validate_cvv(cvv)?;
                validate_holder(holder)
            }
        }
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn validate_wallet_number(number: &str) -> Result<(), ValidationError> {
    if all_digits(number) && number.chars().count() >= WALLET_MIN_DIGITS {
        Ok(())
    } else {
        Err(ValidationError::WalletNumber)
    }
}

fn validate_card_number(number: &str) -> Result<(), ValidationError> {
    let stripped: String = number.chars().filter(|c| !c.is_whitespace()).collect();

    if all_digits(&stripped) && stripped.chars().count() >= CARD_MIN_DIGITS {
        Ok(())
    } else {
        Err(ValidationError::CardNumber)
    }
}

fn validate_expiry(expiry: &str) -> Result<(), ValidationError> {
    let bytes = expiry.as_bytes();

    let well_formed = bytes.len() == 5
        && bytes.get(2) == Some(&b'/')
        && [0usize, 1, 3, 4]
            .iter()
            .all(|&i| bytes.get(i).is_some_and(u8::is_ascii_digit));

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::CardExpiry)
    }
}

fn validate_cvv(cvv: &str) -> Result<(), ValidationError> {
    if all_digits(cvv) && cvv.chars().count() >= CVV_MIN_DIGITS {
        Ok(())
    } else {
        Err(ValidationError::CardCvv)
    }
}

fn validate_holder(holder: &str) -> Result<(), ValidationError> {
    if holder.trim().chars().count() >= 2 {
        Ok(())
    } else {
        Err(ValidationError::CardHolder)
    }
}

/// Simulated payment authorization.
///
/// Shape-invalid requests are declined deterministically; well-formed
/// requests succeed unless the random draw lands below the failure rate.
#[derive(Debug, Clone)]
pub struct PaymentSimulator<R: Rng = ThreadRng> {
    rng: R,
    failure_rate: f64,
}

impl Default for PaymentSimulator {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> PaymentSimulator<R> {
    /// Production decline probability for well-formed requests.
    pub const DEFAULT_FAILURE_RATE: f64 = 0.1;

    /// Creates a simulator with the default failure rate.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self::with_failure_rate(rng, Self::DEFAULT_FAILURE_RATE)
    }

    /// Creates a simulator with an explicit failure rate. `0.0` always
    /// approves well-formed requests; `1.0` always declines.
    #[must_use]
    pub fn with_failure_rate(rng: R, failure_rate: f64) -> Self {
        Self { rng, failure_rate }
    }

    /// Runs one authorization attempt.
    pub fn simulate(&mut self, request: &PaymentRequest) -> bool {
        if request.validate().is_err() {
            debug!(method = %request.method(), "declined: request failed shape validation");
            return false;
        }

        let draw = self.rng.gen_range(0.0..1.0);
        let approved = draw >= self.failure_rate;

        debug!(method = %request.method(), approved, "simulated authorization");

        approved
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use testresult::TestResult;

    use super::*;

    fn valid_card() -> PaymentRequest {
        PaymentRequest::Card {
            number: "4111 1111 1111 1111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            holder: "Ana María".to_string(),
        }
    }

    #[test]
    fn valid_wallet_numbers_pass() -> TestResult {
        PaymentRequest::Nequi {
            number: "3001234567".to_string(),
        }
        .validate()?;

        PaymentRequest::Bancolombia {
            number: "12345678901".to_string(),
        }
        .validate()?;

        Ok(())
    }

    #[test]
    fn short_wallet_numbers_fail() {
        let result = PaymentRequest::Nequi {
            number: "30012345".to_string(),
        }
        .validate();

        assert_eq!(result, Err(ValidationError::WalletNumber));
    }

    #[test]
    fn non_numeric_wallet_numbers_fail() {
        let result = PaymentRequest::Nequi {
            number: "30012345ab".to_string(),
        }
        .validate();

        assert_eq!(result, Err(ValidationError::WalletNumber));
    }

    #[test]
    fn card_numbers_may_contain_spaces() -> TestResult {
        valid_card().validate()?;

        Ok(())
    }

    #[test]
    fn short_card_numbers_fail() {
        let request = PaymentRequest::Card {
            number: "4111 1111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            holder: "Ana María".to_string(),
        };

        assert_eq!(request.validate(), Err(ValidationError::CardNumber));
    }

    #[test]
    fn malformed_expiries_fail() {
        for expiry in ["1227", "12-27", "1/27", "ab/cd", ""] {
            let request = PaymentRequest::Card {
                number: "4111111111111111".to_string(),
                expiry: expiry.to_string(),
                cvv: "123".to_string(),
                holder: "Ana María".to_string(),
            };

            assert_eq!(
                request.validate(),
                Err(ValidationError::CardExpiry),
                "expiry {expiry:?} should be rejected"
            );
        }
    }

    #[test]
    fn short_cvv_and_holder_fail() {
        let short_cvv = PaymentRequest::Card {
            number: "4111111111111111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "12".to_string(),
            holder: "Ana María".to_string(),
        };
        let short_holder = PaymentRequest::Card {
            number: "4111111111111111".to_string(),
            expiry: "12/27".to_string(),
            cvv: "123".to_string(),
            holder: " A ".to_string(),
        };

        assert_eq!(short_cvv.validate(), Err(ValidationError::CardCvv));
        assert_eq!(short_holder.validate(), Err(ValidationError::CardHolder));
    }

    #[test]
    fn shape_invalid_requests_are_always_declined() {
        let mut simulator =
            PaymentSimulator::with_failure_rate(StdRng::seed_from_u64(1), 0.0);

        let request = PaymentRequest::Nequi {
            number: "12345678".to_string(),
        };

        for _ in 0..20 {
            assert!(
                !simulator.simulate(&request),
                "8-digit wallet must never authorize"
            );
        }
    }

    #[test]
    fn zero_failure_rate_always_approves_valid_requests() {
        let mut simulator =
            PaymentSimulator::with_failure_rate(StdRng::seed_from_u64(2), 0.0);

        for _ in 0..20 {
            assert!(simulator.simulate(&valid_card()));
        }
    }

    #[test]
    fn full_failure_rate_always_declines_valid_requests() {
        let mut simulator =
            PaymentSimulator::with_failure_rate(StdRng::seed_from_u64(3), 1.0);

        for _ in 0..20 {
            assert!(!simulator.simulate(&valid_card()));
        }
    }
}
