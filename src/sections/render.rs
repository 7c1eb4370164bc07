//! Plain-text rendering of section payloads for the command-line client.

use serde::Deserialize;
use serde_json::Value;

use super::kind::SectionKind;
use super::models::{
    Booking, Category, ContactInfo, DashboardStats, Faq, HeroContent, Invoice, NamedEntry,
    NewsArticle, Notification, Plan, Profile, Review, Service, Subscription, Testimonial, TimeSlot,
};
use crate::fetch::{Page, Pagination, SectionState};
use crate::i18n::{Catalog, Locale, Localized};

/// Typed view of a section payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Landing banner.
    Hero(HeroContent),
    /// Services list.
    Services(Vec<Service>),
    /// Pricing plans.
    Plans(Vec<Plan>),
    /// Questions and answers.
    Faqs(Vec<Faq>),
    /// Paged news.
    News(Page<NewsArticle>),
    /// Testimonials.
    Testimonials(Vec<Testimonial>),
    /// Partners, payment methods, blog categories.
    Entries(Vec<NamedEntry>),
    /// Contact details.
    Contact(ContactInfo),
    /// Paged AI marketplace.
    AiServices(Page<Service>),
    /// AI service categories.
    Categories(Vec<Category>),
    /// Paged bookings.
    Bookings(Page<Booking>),
    /// Subscriptions.
    Subscriptions(Vec<Subscription>),
    /// Paged invoices.
    Invoices(Page<Invoice>),
    /// Paged notifications.
    Notifications(Page<Notification>),
    /// Paged reviews.
    Reviews(Page<Review>),
    /// Signed-in user.
    Profile(Profile),
    /// Dashboard counters.
    Stats(DashboardStats),
    /// Free booking slots.
    Slots(Vec<TimeSlot>),
}

impl Payload {
    /// What: Decode an untyped payload according to `kind`.
    ///
    /// # Errors
    /// - `serde_json::Error` when the payload does not match the section's model
    pub fn decode(kind: SectionKind, value: &Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            SectionKind::Hero => Self::Hero(HeroContent::deserialize(value)?),
            SectionKind::Services => Self::Services(Vec::deserialize(value)?),
            SectionKind::Pricing => Self::Plans(Vec::deserialize(value)?),
            SectionKind::Faq => Self::Faqs(Vec::deserialize(value)?),
            SectionKind::News => Self::News(Page::deserialize(value)?),
            SectionKind::Testimonials => Self::Testimonials(Vec::deserialize(value)?),
            SectionKind::Partners | SectionKind::PaymentMethods | SectionKind::BlogCategories => {
                Self::Entries(Vec::deserialize(value)?)
            }
            SectionKind::Contact => Self::Contact(ContactInfo::deserialize(value)?),
            SectionKind::AiServices => Self::AiServices(Page::deserialize(value)?),
            SectionKind::AiCategories => Self::Categories(Vec::deserialize(value)?),
            SectionKind::Bookings => Self::Bookings(Page::deserialize(value)?),
            SectionKind::Subscriptions => Self::Subscriptions(Vec::deserialize(value)?),
            SectionKind::Invoices => Self::Invoices(Page::deserialize(value)?),
            SectionKind::Notifications => Self::Notifications(Page::deserialize(value)?),
            SectionKind::Reviews => Self::Reviews(Page::deserialize(value)?),
            SectionKind::Profile => Self::Profile(Profile::deserialize(value)?),
            SectionKind::DashboardStats => Self::Stats(DashboardStats::deserialize(value)?),
            SectionKind::AvailableSlots => Self::Slots(Vec::deserialize(value)?),
        })
    }
}

fn bullet(title: &str, body: &str) -> String {
    if body.is_empty() {
        format!("• {title}")
    } else {
        format!("• {title}: {body}")
    }
}

fn localized_lines<L: Localized>(items: &[L], locale: Locale) -> Vec<String> {
    items
        .iter()
        .map(|item| bullet(item.title(locale), item.body(locale)))
        .collect()
}

fn status_label(catalog: &Catalog, locale: Locale, status: &str) -> String {
    let key = format!("status.{status}");
    let label = catalog.t(locale, &key);
    if label == key { status.to_string() } else { label }
}

fn payload_lines(payload: &Payload, locale: Locale, catalog: &Catalog) -> Vec<String> {
    match payload {
        Payload::Hero(hero) => vec![hero.title(locale).to_string(), hero.body(locale).to_string()],
        Payload::Services(items) => localized_lines(items, locale),
        Payload::Plans(plans) => plans
            .iter()
            .flat_map(|plan| {
                let mut lines = vec![format!(
                    "• {}: {:.2} {}",
                    plan.title(locale),
                    plan.price,
                    plan.currency
                )];
                lines.extend(plan.features(locale).iter().map(|f| format!("    - {f}")));
                lines
            })
            .collect(),
        Payload::Faqs(items) => localized_lines(items, locale),
        Payload::News(page) => localized_lines(&page.items, locale),
        Payload::Testimonials(items) => localized_lines(items, locale),
        Payload::Entries(items) => localized_lines(items, locale),
        Payload::Contact(info) => vec![
            info.title(locale).to_string(),
            format!("{} | {}", info.phone, info.email),
            info.body(locale).to_string(),
        ],
        Payload::AiServices(page) => localized_lines(&page.items, locale),
        Payload::Categories(items) => localized_lines(items, locale),
        Payload::Bookings(page) => page
            .items
            .iter()
            .map(|b| {
                let service = b.service.as_ref().map_or("", |s| s.title(locale));
                format!(
                    "• {} {} {service} [{}]",
                    b.date,
                    b.time,
                    status_label(catalog, locale, &b.status)
                )
            })
            .collect(),
        Payload::Subscriptions(items) => items
            .iter()
            .map(|s| {
                let plan = s.plan.as_ref().map_or("", |p| p.title(locale));
                format!("• {plan} [{}]", status_label(catalog, locale, &s.status))
            })
            .collect(),
        Payload::Invoices(page) => page
            .items
            .iter()
            .map(|i| {
                format!(
                    "• {} {:.2} {} [{}]",
                    i.number,
                    i.amount,
                    i.currency,
                    status_label(catalog, locale, &i.status)
                )
            })
            .collect(),
        Payload::Notifications(page) => page
            .items
            .iter()
            .map(|n| {
                let marker = if n.read_at.is_none() {
                    format!(" [{}]", catalog.t(locale, "status.unread"))
                } else {
                    String::new()
                };
                format!("{}{marker}", bullet(n.title(locale), n.body(locale)))
            })
            .collect(),
        Payload::Reviews(page) => page
            .items
            .iter()
            .map(|r| {
                let stars = "★".repeat(usize::from(r.rating.min(5)));
                format!("• {stars} {}", r.comment)
            })
            .collect(),
        Payload::Profile(p) => vec![p.name.clone(), p.email.clone()],
        Payload::Stats(s) => vec![format!(
            "{} | {} | {} | {}",
            s.bookings, s.active_subscriptions, s.unpaid_invoices, s.unread_notifications
        )],
        Payload::Slots(slots) => slots
            .iter()
            .filter(|s| s.available)
            .map(|s| format!("• {}", s.time))
            .collect(),
    }
}

fn pager_line(p: &Pagination, locale: Locale, catalog: &Catalog) -> String {
    let mut line = catalog.t_fmt(locale, "pager.page_of", &[&p.current_page, &p.last_page]);
    if let (Some(from), Some(to)) = (p.from, p.to) {
        line.push_str("  ");
        line.push_str(&catalog.t_fmt(locale, "pager.showing", &[&from, &to, &p.total]));
    }
    line
}

/// What: Render a section state as display lines in `locale`.
///
/// Inputs:
/// - `kind`: Section being rendered
/// - `state`: Snapshot from the section handle
/// - `locale`: Active locale (drives field resolution and labels)
/// - `catalog`: Message catalog
///
/// Output:
/// - Heading first, then content, error banner, and pager lines
///
/// Details:
/// - Undecodable payloads render the generic error instead of failing
#[must_use]
pub fn render_lines(
    kind: SectionKind,
    state: &SectionState<Value>,
    locale: Locale,
    catalog: &Catalog,
) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", catalog.t(locale, &kind.title_key()))];
    match state.data.as_ref().map(|v| Payload::decode(kind, v)) {
        Some(Ok(payload)) => {
            let body = payload_lines(&payload, locale, catalog);
            if body.is_empty() {
                lines.push(catalog.t(locale, "states.empty"));
            } else {
                lines.extend(body);
            }
        }
        Some(Err(e)) => {
            tracing::warn!(section = %kind, error = %e, "payload does not match section model");
            lines.push(catalog.t(locale, "errors.generic"));
        }
        None if state.loading => lines.push(catalog.t(locale, "states.loading")),
        None if state.error.is_none() => lines.push(catalog.t(locale, "states.empty")),
        None => {}
    }
    if let Some(error) = &state.error {
        lines.push(format!("! {error}"));
    }
    if let Some(p) = &state.pagination {
        lines.push(pager_line(p, locale, catalog));
    }
    lines
}
