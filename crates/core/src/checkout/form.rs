//! Checkout form state and field validation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::{Email, Phone};

/// Minimum length of the customer name, in characters.
///
/// Measured on the trimmed value in Unicode scalar values, so surrounding
/// whitespace never counts, "Zé" is two characters rather than three bytes,
/// and an emoji is one character rather than two UTF-16 units.
pub const MIN_NAME_CHARS: usize = 3;
/// Minimum length of the delivery address, in characters.
///
/// Measured like [`MIN_NAME_CHARS`].
pub const MIN_ADDRESS_CHARS: usize = 5;

/// A field of the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutField {
    Name,
    Email,
    Phone,
    Address,
}

impl CheckoutField {
    /// All fields in display order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Address];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for CheckoutField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, thiserror::Error)]
#[error("unknown checkout field: {0}")]
pub struct UnknownField(String);

impl FromStr for CheckoutField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

/// Raw values typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Customer details extracted from a valid form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
}

impl CheckoutForm {
    #[must_use]
    pub fn get(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::Name => &self.name,
            CheckoutField::Email => &self.email,
            CheckoutField::Phone => &self.phone,
            CheckoutField::Address => &self.address,
        }
    }

    pub fn set(&mut self, field: CheckoutField, value: impl Into<String>) {
        let slot = match field {
            CheckoutField::Name => &mut self.name,
            CheckoutField::Email => &mut self.email,
            CheckoutField::Phone => &mut self.phone,
            CheckoutField::Address => &mut self.address,
        };
        *slot = value.into();
    }

    /// True when every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        CheckoutField::ALL
            .into_iter()
            .all(|field| self.get(field).is_empty())
    }

    /// Validate every field. Values are trimmed before checking.
    ///
    /// A name of `"  ab"` is therefore too short: padding does not make up
    /// the minimum. Lengths count `char`s, so characters outside the Basic
    /// Multilingual Plane count once.
    ///
    /// # Errors
    ///
    /// Returns the message of the first failing rule for each invalid field.
    pub fn validate(&self) -> Result<CustomerDetails, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_CHARS {
            errors.insert(CheckoutField::Name, "Name must be at least 3 characters");
        }

        let email = Email::parse(self.email.trim())
            .map_err(|_| errors.insert(CheckoutField::Email, "Invalid email"))
            .ok();

        let phone = Phone::parse(self.phone.trim())
            .map_err(|_| errors.insert(CheckoutField::Phone, "Phone must have 10 or 11 digits"))
            .ok();

        let address = self.address.trim();
        if address.chars().count() < MIN_ADDRESS_CHARS {
            errors.insert(CheckoutField::Address, "Address is required");
        }

        match (email, phone) {
            (Some(email), Some(phone)) if errors.is_empty() => Ok(CustomerDetails {
                name: name.to_owned(),
                email,
                phone,
                address: address.to_owned(),
            }),
            _ => Err(errors),
        }
    }
}

/// Field-level validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<CheckoutField, String>);

impl FieldErrors {
    /// Record `message` for `field` unless the field already has one.
    pub fn insert(&mut self, field: CheckoutField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Drop the message for `field`, if any.
    pub fn clear(&mut self, field: CheckoutField) {
        self.0.remove(&field);
    }

    #[must_use]
    pub fn get(&self, field: CheckoutField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: CheckoutField) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckoutField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&parts.join("; "))
    }
}
