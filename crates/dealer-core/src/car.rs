//! Vehicle records for the dealer inventory.
//!
//! A [`Car`] can only be obtained through validation: either [`Car::new`] or
//! deserializing a stored [`CarRecord`]. Every field is normalized on the way
//! in, so two cars with the same VIN always compare equal on `vin()`.

use std::fmt;

use chrono::{DateTime, Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

/// Image used when a car is stored without one.
pub const PLACEHOLDER_IMAGE: &str = "static/images/placeholder.jpg";

/// Oldest model year accepted.
pub const MIN_YEAR: i32 = 1900;

/// How many model years ahead of the calendar a car may be listed.
pub const MAX_YEARS_AHEAD: i32 = 2;

/// Exact length of a VIN.
pub const VIN_LENGTH: usize = 17;

/// A validated vehicle in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CarRecord")]
pub struct Car {
    make: String,
    model: String,
    year: i32,
    price: f64,
    vin: String,
    image_url: String,
}

/// The stored shape of a car, before validation.
///
/// Unknown keys are ignored and `image_url` may be absent; every other
/// field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub price: f64,
    pub vin: String,
    #[serde(default)]
    pub image_url: String,
}

impl Car {
    /// Validates and normalizes a new car.
    ///
    /// Make and model are trimmed and title-cased, the VIN is trimmed and
    /// upper-cased, and a blank image URL becomes [`PLACEHOLDER_IMAGE`].
    pub fn new(
        make: &str,
        model: &str,
        year: i32,
        price: f64,
        vin: &str,
        image_url: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            make: required("Make", make)?,
            model: required("Model", model)?,
            year: validate_year(i64::from(year))?,
            price: validate_price(price)?,
            vin: validate_vin(vin)?,
            image_url: normalize_image_url(image_url),
        })
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn vin(&self) -> &str {
        &self.vin
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Returns the stored shape of this car.
    pub fn to_record(&self) -> CarRecord {
        CarRecord {
            make: self.make.clone(),
            model: self.model.clone(),
            year: i64::from(self.year),
            price: self.price,
            vin: self.vin.clone(),
            image_url: self.image_url.clone(),
        }
    }

    /// Builds a copy of this car with `changes` applied.
    ///
    /// Every provided field is checked before anything is copied, so a
    /// failure leaves no partially-updated value behind.
    pub fn with_changes(&self, changes: &CarChanges) -> Result<Car, ValidationError> {
        let price = changes.price.map(validate_price).transpose()?;
        let year = changes
            .year
            .map(|y| validate_year(i64::from(y)))
            .transpose()?;

        let mut updated = self.clone();
        if let Some(price) = price {
            updated.price = price;
        }
        if let Some(year) = year {
            updated.year = year;
        }
        if let Some(url) = &changes.image_url {
            updated.image_url = normalize_image_url(url);
        }
        Ok(updated)
    }

    /// True if `query` (already lower-cased) occurs in the make, model or VIN.
    pub(crate) fn matches(&self, query: &str) -> bool {
        self.make.to_lowercase().contains(query)
            || self.model.to_lowercase().contains(query)
            || self.vin.to_lowercase().contains(query)
    }
}

impl TryFrom<CarRecord> for Car {
    type Error = ValidationError;

    fn try_from(record: CarRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            make: required("Make", &record.make)?,
            model: required("Model", &record.model)?,
            year: validate_year(record.year)?,
            price: validate_price(record.price)?,
            vin: validate_vin(&record.vin)?,
            image_url: normalize_image_url(&record.image_url),
        })
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VIN: {} | {} {} {} | Price: ${}",
            self.vin,
            self.year,
            self.make,
            self.model,
            format_price(self.price)
        )
    }
}

/// Optional updates for an existing car. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarChanges {
    pub price: Option<f64>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
}

impl CarChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.year.is_none() && self.image_url.is_none()
    }
}

/// A sold car: the vehicle as it was at the moment of sale plus the sale time.
///
/// Stored flat, i.e. the car's fields with an extra `sale_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(flatten)]
    car: Car,
    #[serde(deserialize_with = "deserialize_sale_date")]
    sale_date: NaiveDateTime,
}

impl SaleRecord {
    pub fn new(car: Car, sale_date: NaiveDateTime) -> Self {
        Self { car, sale_date }
    }

    pub fn car(&self) -> &Car {
        &self.car
    }

    pub fn vin(&self) -> &str {
        self.car.vin()
    }

    pub fn price(&self) -> f64 {
        self.car.price()
    }

    pub fn sale_date(&self) -> NaiveDateTime {
        self.sale_date
    }
}

impl fmt::Display for SaleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | Sold: {}",
            self.car,
            self.sale_date.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Parses a stored sale date.
///
/// Accepts ISO 8601 with either a `T` or a space between date and time, with
/// optional fractional seconds. RFC 3339 values carrying an offset are
/// converted to local time.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|date| date.with_timezone(&Local).naive_local())
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sale_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized sale_date '{}'", raw)))
}

/// Latest model year accepted today.
pub fn max_year() -> i32 {
    Local::now().year() + MAX_YEARS_AHEAD
}

pub fn validate_year(year: i64) -> Result<i32, ValidationError> {
    let max = max_year();
    if year < i64::from(MIN_YEAR) || year > i64::from(max) {
        return Err(ValidationError::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max,
        });
    }
    // In range, so it fits.
    Ok(year as i32)
}

pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::NonPositivePrice(price));
    }
    Ok(price)
}

/// Trims and upper-cases a VIN, then checks it is 17 letters or digits.
pub fn validate_vin(vin: &str) -> Result<String, ValidationError> {
    let vin = normalize_vin(vin);
    let len = vin.chars().count();
    if len != VIN_LENGTH {
        return Err(ValidationError::VinLength(len));
    }
    if !vin.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::VinCharacters(vin));
    }
    Ok(vin)
}

/// Canonical form used for VIN lookups.
pub fn normalize_vin(vin: &str) -> String {
    vin.trim().to_uppercase()
}

pub fn normalize_image_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        url.to_string()
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest.
///
/// `"cr-v"` becomes `"Cr-V"`, `"x5"` becomes `"X5"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Formats a price as `25,000.00`.
pub fn format_price(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(title_case(value))
}
