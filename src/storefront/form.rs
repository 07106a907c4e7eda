use std::{fmt, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::validation::escape_html;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]+$").expect("valid phone regex"));

const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 20;
const ADDRESS_MIN: usize = 10;
const ADDRESS_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    Email,
    PhoneNumber,
    DeliveryAddress,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FormField::FullName => "full_name",
            FormField::Email => "email",
            FormField::PhoneNumber => "phone_number",
            FormField::DeliveryAddress => "delivery_address",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FormError {
    pub field: FormField,
    pub message: &'static str,
}

fn invalid(field: FormField, message: &'static str) -> FormError {
    FormError { field, message }
}

/// Customer details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub delivery_address: String,
}

/// Form values with HTML-significant characters escaped, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedForm {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub delivery_address: String,
}

impl CheckoutForm {
    /// Check fields in display order and report the first one that fails.
    pub fn validate(&self) -> Result<(), FormError> {
        let name = self.full_name.trim();
        if name.is_empty() {
            return Err(invalid(FormField::FullName, "Name is required"));
        }
        if name.chars().count() > NAME_MAX {
            return Err(invalid(
                FormField::FullName,
                "Name must be less than 100 characters",
            ));
        }

        if !EMAIL_RE.is_match(&self.email) {
            return Err(invalid(FormField::Email, "Invalid email address"));
        }
        if self.email.chars().count() > EMAIL_MAX {
            return Err(invalid(
                FormField::Email,
                "Email must be less than 255 characters",
            ));
        }

        if !PHONE_RE.is_match(&self.phone_number) {
            return Err(invalid(FormField::PhoneNumber, "Invalid phone number format"));
        }
        let phone_len = self.phone_number.chars().count();
        if phone_len < PHONE_MIN {
            return Err(invalid(
                FormField::PhoneNumber,
                "Phone number must be at least 10 characters",
            ));
        }
        if phone_len > PHONE_MAX {
            return Err(invalid(
                FormField::PhoneNumber,
                "Phone number must be less than 20 characters",
            ));
        }

        let address_len = self.delivery_address.trim().chars().count();
        if address_len < ADDRESS_MIN {
            return Err(invalid(
                FormField::DeliveryAddress,
                "Delivery address must be at least 10 characters",
            ));
        }
        if address_len > ADDRESS_MAX {
            return Err(invalid(
                FormField::DeliveryAddress,
                "Delivery address must be less than 500 characters",
            ));
        }

        Ok(())
    }

    pub fn sanitized(&self) -> SanitizedForm {
        SanitizedForm {
            full_name: escape_html(self.full_name.trim()),
            email: escape_html(self.email.trim()),
            phone_number: escape_html(self.phone_number.trim()),
            delivery_address: escape_html(self.delivery_address.trim()),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
