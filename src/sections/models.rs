//! Entity models returned by the API.
//!
//! Localizable text comes in pairs: the Arabic value in the plain field and
//! the English value in the `_en` field. Everything is `#[serde(default)]` so
//! a missing field never fails a whole section.

use serde::{Deserialize, Serialize};

use crate::i18n::{Locale, Localized, resolve, resolve_str};

/// Landing banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroContent {
    /// Headline (Arabic).
    pub title: String,
    /// Headline (English).
    pub title_en: Option<String>,
    /// Sub-headline (Arabic).
    pub subtitle: String,
    /// Sub-headline (English).
    pub subtitle_en: Option<String>,
}

impl Localized for HeroContent {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.title, self.title_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve_str(&self.subtitle, self.subtitle_en.as_deref(), locale)
    }
}

/// Category shared by services and AI services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    /// Identifier.
    pub id: u64,
    /// Name (Arabic).
    pub name: String,
    /// Name (English).
    pub name_en: Option<String>,
}

impl Localized for Category {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.name, self.name_en.as_deref(), locale)
    }
}

/// Offered service (also used for AI marketplace entries).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Identifier.
    pub id: u64,
    /// Name (Arabic).
    pub name: String,
    /// Name (English).
    pub name_en: Option<String>,
    /// Description (Arabic).
    pub description: Option<String>,
    /// Description (English).
    pub description_en: Option<String>,
    /// Starting price, if listed.
    pub price: Option<f64>,
    /// Category, when the endpoint embeds it.
    pub category: Option<Category>,
}

impl Localized for Service {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.name, self.name_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve(
            self.description.as_deref(),
            self.description_en.as_deref(),
            locale,
        )
    }
}

/// Subscription plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// Identifier.
    pub id: u64,
    /// Name (Arabic).
    pub name: String,
    /// Name (English).
    pub name_en: Option<String>,
    /// Description (Arabic).
    pub description: Option<String>,
    /// Description (English).
    pub description_en: Option<String>,
    /// Price per billing period.
    pub price: f64,
    /// ISO currency code.
    pub currency: String,
    /// Feature bullet points (Arabic).
    pub features: Vec<String>,
    /// Feature bullet points (English).
    pub features_en: Vec<String>,
}

impl Plan {
    /// Feature list for `locale`; falls back to the other list when empty.
    #[must_use]
    pub fn features(&self, locale: Locale) -> &[String] {
        let (first, second) = if locale == Locale::PRIMARY {
            (&self.features, &self.features_en)
        } else {
            (&self.features_en, &self.features)
        };
        if first.is_empty() { second } else { first }
    }
}

impl Localized for Plan {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.name, self.name_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve(
            self.description.as_deref(),
            self.description_en.as_deref(),
            locale,
        )
    }
}

/// Question and answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Faq {
    /// Identifier.
    pub id: u64,
    /// Question (Arabic).
    pub question: String,
    /// Question (English).
    pub question_en: Option<String>,
    /// Answer (Arabic).
    pub answer: String,
    /// Answer (English).
    pub answer_en: Option<String>,
}

impl Localized for Faq {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.question, self.question_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve_str(&self.answer, self.answer_en.as_deref(), locale)
    }
}

/// News article summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsArticle {
    /// Identifier.
    pub id: u64,
    /// Headline (Arabic).
    pub title: String,
    /// Headline (English).
    pub title_en: Option<String>,
    /// Teaser (Arabic).
    pub excerpt: Option<String>,
    /// Teaser (English).
    pub excerpt_en: Option<String>,
    /// Publication timestamp as sent by the server.
    pub published_at: Option<String>,
}

impl Localized for NewsArticle {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.title, self.title_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve(self.excerpt.as_deref(), self.excerpt_en.as_deref(), locale)
    }
}

/// Client testimonial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    /// Identifier.
    pub id: u64,
    /// Client name (not translated).
    pub client_name: String,
    /// Quote (Arabic).
    pub content: String,
    /// Quote (English).
    pub content_en: Option<String>,
    /// Star rating, 1-5.
    pub rating: Option<u8>,
}

impl Localized for Testimonial {
    fn title(&self, _locale: Locale) -> &str {
        &self.client_name
    }

    fn body(&self, locale: Locale) -> &str {
        resolve_str(&self.content, self.content_en.as_deref(), locale)
    }
}

/// Partner organisation; also used for payment methods and blog categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedEntry {
    /// Identifier.
    pub id: u64,
    /// Name (Arabic).
    pub name: String,
    /// Name (English).
    pub name_en: Option<String>,
    /// Optional link.
    pub url: Option<String>,
}

impl Localized for NamedEntry {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.name, self.name_en.as_deref(), locale)
    }

    fn body(&self, _locale: Locale) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// Contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    /// Street address (Arabic).
    pub address: String,
    /// Street address (English).
    pub address_en: Option<String>,
    /// Phone number.
    pub phone: String,
    /// E-mail address.
    pub email: String,
    /// Opening hours (Arabic).
    pub working_hours: Option<String>,
    /// Opening hours (English).
    pub working_hours_en: Option<String>,
}

impl Localized for ContactInfo {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.address, self.address_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve(
            self.working_hours.as_deref(),
            self.working_hours_en.as_deref(),
            locale,
        )
    }
}

/// Booking made by the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Booking {
    /// Identifier.
    pub id: u64,
    /// Booked service.
    pub service: Option<Service>,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Start time (`HH:MM`).
    pub time: String,
    /// `pending`, `confirmed`, `completed`, `cancelled`.
    pub status: String,
}

/// Subscription of the user to a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subscription {
    /// Identifier.
    pub id: u64,
    /// Subscribed plan.
    pub plan: Option<Plan>,
    /// `active`, `expired`, `cancelled`.
    pub status: String,
    /// Start date.
    pub starts_at: Option<String>,
    /// End date.
    pub ends_at: Option<String>,
}

/// Invoice issued to the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Invoice {
    /// Identifier.
    pub id: u64,
    /// Human-facing invoice number.
    pub number: String,
    /// Total amount.
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// `paid`, `unpaid`.
    pub status: String,
    /// Issue date.
    pub issued_at: Option<String>,
}

/// In-app notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    /// Identifier.
    pub id: u64,
    /// Title (Arabic).
    pub title: String,
    /// Title (English).
    pub title_en: Option<String>,
    /// Message (Arabic).
    pub body: String,
    /// Message (English).
    pub body_en: Option<String>,
    /// When it was read; `None` while unread.
    pub read_at: Option<String>,
}

impl Localized for Notification {
    fn title(&self, locale: Locale) -> &str {
        resolve_str(&self.title, self.title_en.as_deref(), locale)
    }

    fn body(&self, locale: Locale) -> &str {
        resolve_str(&self.body, self.body_en.as_deref(), locale)
    }
}

/// Published review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    /// Identifier.
    pub id: u64,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Free text, in whatever language the author wrote.
    pub comment: String,
    /// Display name of the author.
    pub author: Option<String>,
}

/// Signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Identifier.
    pub id: u64,
    /// Full name.
    pub name: String,
    /// E-mail address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    /// Upcoming bookings.
    pub bookings: u64,
    /// Active subscriptions.
    pub active_subscriptions: u64,
    /// Invoices awaiting payment.
    pub unpaid_invoices: u64,
    /// Unread notifications.
    pub unread_notifications: u64,
}

/// Free booking slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSlot {
    /// Start time (`HH:MM`).
    pub time: String,
    /// Whether it can still be booked.
    pub available: bool,
}

/// Body of `POST bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    /// Service to book.
    pub service_id: u64,
    /// Date (`YYYY-MM-DD`).
    pub date: String,
    /// Start time (`HH:MM`).
    pub time: String,
    /// Optional note for the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST reviews`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    /// Star rating, 1-5.
    pub rating: u8,
    /// Free text.
    pub comment: String,
}

/// Body of `POST contact`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    /// Sender name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Message text.
    pub message: String,
}
