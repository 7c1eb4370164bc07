use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::Settings;
use crate::fetch::{ErrorPolicy, SectionOptions};

/// Every data-bearing section of the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// Landing banner.
    Hero,
    /// Service catalogue.
    Services,
    /// Subscription plans.
    Pricing,
    /// Questions and answers.
    Faq,
    /// News articles (paginated).
    News,
    /// Client testimonials.
    Testimonials,
    /// Partner logos and links.
    Partners,
    /// Address, phone, and opening hours.
    Contact,
    /// AI services marketplace (paginated).
    AiServices,
    /// AI service categories.
    AiCategories,
    /// The user's bookings.
    Bookings,
    /// The user's subscriptions.
    Subscriptions,
    /// The user's invoices.
    Invoices,
    /// The user's notifications.
    Notifications,
    /// Published reviews.
    Reviews,
    /// The signed-in user.
    Profile,
    /// Dashboard counters.
    DashboardStats,
    /// Accepted payment methods.
    PaymentMethods,
    /// Free booking slots.
    AvailableSlots,
    /// Blog categories.
    BlogCategories,
}

impl SectionKind {
    /// All sections in display order.
    pub const ALL: [Self; 20] = [
        Self::Hero,
        Self::Services,
        Self::Pricing,
        Self::Faq,
        Self::News,
        Self::Testimonials,
        Self::Partners,
        Self::Contact,
        Self::AiServices,
        Self::AiCategories,
        Self::Bookings,
        Self::Subscriptions,
        Self::Invoices,
        Self::Notifications,
        Self::Reviews,
        Self::Profile,
        Self::DashboardStats,
        Self::PaymentMethods,
        Self::AvailableSlots,
        Self::BlogCategories,
    ];

    /// Stable identifier (`ai_services`), also the catalog key suffix.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::Pricing => "pricing",
            Self::Faq => "faq",
            Self::News => "news",
            Self::Testimonials => "testimonials",
            Self::Partners => "partners",
            Self::Contact => "contact",
            Self::AiServices => "ai_services",
            Self::AiCategories => "ai_categories",
            Self::Bookings => "bookings",
            Self::Subscriptions => "subscriptions",
            Self::Invoices => "invoices",
            Self::Notifications => "notifications",
            Self::Reviews => "reviews",
            Self::Profile => "profile",
            Self::DashboardStats => "dashboard_stats",
            Self::PaymentMethods => "payment_methods",
            Self::AvailableSlots => "available_slots",
            Self::BlogCategories => "blog_categories",
        }
    }

    /// Resource path relative to the API root.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Services => "services",
            Self::Pricing => "plans",
            Self::Faq => "faqs",
            Self::News => "news",
            Self::Testimonials => "testimonials",
            Self::Partners => "partners",
            Self::Contact => "contact-info",
            Self::AiServices => "ai-services",
            Self::AiCategories => "ai-services/categories",
            Self::Bookings => "bookings",
            Self::Subscriptions => "subscriptions",
            Self::Invoices => "invoices",
            Self::Notifications => "notifications",
            Self::Reviews => "reviews",
            Self::Profile => "profile",
            Self::DashboardStats => "dashboard/stats",
            Self::PaymentMethods => "payment-methods",
            Self::AvailableSlots => "bookings/available-slots",
            Self::BlogCategories => "blog/categories",
        }
    }

    /// Needs a signed-in user.
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(
            self,
            Self::Bookings
                | Self::Subscriptions
                | Self::Invoices
                | Self::Notifications
                | Self::Profile
                | Self::DashboardStats
                | Self::AvailableSlots
        )
    }

    /// Server returns a paginator.
    #[must_use]
    pub const fn paginated(self) -> bool {
        matches!(
            self,
            Self::News
                | Self::AiServices
                | Self::Bookings
                | Self::Invoices
                | Self::Notifications
                | Self::Reviews
        )
    }

    /// Offers a free-text search box.
    #[must_use]
    pub const fn searchable(self) -> bool {
        matches!(
            self,
            Self::Services | Self::Faq | Self::News | Self::AiServices
        )
    }

    /// Catalog key of the section heading.
    #[must_use]
    pub fn title_key(self) -> String {
        format!("sections.{}", self.id())
    }

    /// What: Fetch options for this section under `settings`.
    ///
    /// Details:
    /// - Signed-in sections clear their data on failure; public ones keep
    ///   stale data visible
    /// - Signed-in sections are never cached
    #[must_use]
    pub fn options(self, settings: &Settings) -> SectionOptions {
        SectionOptions {
            debounce: settings.search_debounce,
            timeout: settings.request_timeout,
            paginated: self.paginated(),
            error_policy: if self.requires_auth() {
                ErrorPolicy::Clear
            } else {
                ErrorPolicy::KeepStale
            },
            cache_ttl: (!self.requires_auth() && settings.response_cache_ttl > Duration::ZERO)
                .then_some(settings.response_cache_ttl),
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unknown section identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section '{}'", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.id() == wanted)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
