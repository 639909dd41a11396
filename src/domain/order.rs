use crate::error::CheckoutError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A checkout total in major currency units (rupees).
///
/// Wraps `rust_decimal::Decimal` so that conversion to the provider's minor
/// unit (paise) is exact. Amounts are non-negative and carry at most two
/// decimal places.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value < Decimal::ZERO {
            return Err(CheckoutError::Validation(
                "Total must not be negative".to_string(),
            ));
        }
        if value.normalize().scale() > 2 {
            return Err(CheckoutError::Validation(
                "Total must have at most two decimal places".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts to minor units (total × 100).
    pub fn to_minor_units(&self) -> Result<i64, CheckoutError> {
        let minor = self
            .0
            .checked_mul(Decimal::from(Self::MINOR_UNITS_PER_MAJOR))
            .ok_or_else(|| {
                CheckoutError::Validation(format!("Total {} is out of range", self.0))
            })?;
        if !minor.fract().is_zero() {
            return Err(CheckoutError::Validation(format!(
                "Total {} cannot be expressed in minor units",
                self.0
            )));
        }
        minor.to_i64().ok_or_else(|| {
            CheckoutError::Validation(format!("Total {} is out of range", self.0))
        })
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| CheckoutError::Validation(format!("Invalid total '{s}': {e}")))?;
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CashOnDelivery,
    HostedPayment,
}

impl PaymentMethod {
    /// Maps the checkout form's radio value. Only `cod` selects cash on
    /// delivery; every other value goes through the hosted widget.
    pub fn from_form_value(value: &str) -> Self {
        if value == "cod" {
            PaymentMethod::CashOnDelivery
        } else {
            PaymentMethod::HostedPayment
        }
    }
}

/// Raw checkout form input, exactly as typed by the customer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub fname: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: String,
    pub payment_method: String,
}

/// A validated order, built once at submit time and passed by value through
/// the rest of the checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: Amount,
    pub payment_method: PaymentMethod,
}

impl OrderDraft {
    /// Validates the form. Every required field must be non-blank.
    pub fn from_form(form: OrderForm) -> Result<Self, CheckoutError> {
        let missing: Vec<&str> = [
            ("fname", &form.fname),
            ("email", &form.email),
            ("phone", &form.phone),
            ("address", &form.address),
            ("total", &form.total),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if !missing.is_empty() {
            return Err(CheckoutError::Validation(format!(
                "All fields are mandatory! Missing: {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            customer_name: form.fname.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
            address: form.address.trim().to_string(),
            total: form.total.parse()?,
            payment_method: PaymentMethod::from_form_value(&form.payment_method),
        })
    }

    /// Re-checks a draft that may have been constructed directly.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let blank = [
            &self.customer_name,
            &self.email,
            &self.phone,
            &self.address,
        ]
        .iter()
        .any(|value| value.trim().is_empty());
        if blank {
            return Err(CheckoutError::Validation(
                "All fields are mandatory!".to_string(),
            ));
        }
        Ok(())
    }
}
