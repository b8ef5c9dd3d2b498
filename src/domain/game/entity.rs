use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::reminder::ReminderHandle;
use crate::domain::{DomainError, DomainResult};

/// Store-assigned identifier of a game record
pub type GameId = i64;

/// A video game tracked in the catalog
/// This is the only entity persisted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Assigned by the store on creation, never reused
    pub id: GameId,

    pub title: String,

    /// Current effective price (already discounted while a sale runs)
    pub price: f64,

    pub description: Option<String>,

    pub category: String,

    /// Cover image URI
    pub image: Option<String>,

    pub release_date: NaiveDate,

    pub rating: Rating,

    pub sold: bool,

    pub is_wishlist: bool,

    /// True until the user opens the detail view once
    pub is_new: bool,

    /// Present only while a sale has been applied
    pub sale: Option<SaleState>,

    /// Handles of reminders believed to be outstanding for this game
    pub reminders: ReminderHandles,

    pub notify_on_release: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGame {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
    pub image: Option<String>,
    pub release_date: NaiveDate,
    pub rating: Rating,
    pub notify_on_release: bool,
    pub is_wishlist: bool,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<Option<String>>,
    pub category: Option<String>,
    pub image: Option<Option<String>>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<Rating>,
    pub notify_on_release: Option<bool>,
    pub sold: Option<bool>,
    pub is_wishlist: Option<bool>,
}

/// User rating of a game
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    #[default]
    Medium,
    High,
}

/// A temporary price reduction.
///
/// The three values only exist together, so a half-applied sale
/// cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleState {
    /// Price before the discount was applied
    pub original_price: f64,
    pub discount_percent: u32,
    /// Last calendar day of the sale is the day before this date
    pub sale_end_date: NaiveDate,
}

/// Opaque scheduler handles tied to a game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderHandles {
    pub release: Option<ReminderHandle>,
    pub sale: Option<ReminderHandle>,
}

impl NewGame {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        release_date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            price,
            description: None,
            category: category.into(),
            image: None,
            release_date,
            rating: Rating::default(),
            notify_on_release: false,
            is_wishlist: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_release_reminder(mut self) -> Self {
        self.notify_on_release = true;
        self
    }

    pub fn on_wishlist(mut self) -> Self {
        self.is_wishlist = true;
        self
    }

    /// Trim text fields and drop blank optionals
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.category = self.category.trim().to_string();
        self.description = blank_to_none(self.description);
        self.image = blank_to_none(self.image);
        self
    }
}

impl GamePatch {
    pub fn is_empty(&self) -> bool {
        *self == GamePatch::default()
    }

    /// Whether the release reminder must be recomputed after this patch
    pub fn affects_release_reminder(&self) -> bool {
        self.title.is_some() || self.release_date.is_some() || self.notify_on_release.is_some()
    }

    /// Whether the sale reminder payload may change after this patch
    pub fn affects_sale_reminder(&self) -> bool {
        self.title.is_some() || self.price.is_some()
    }
}

impl Game {
    /// Merge a partial update
    /// This preserves the creation timestamp and updates the modification timestamp
    pub fn apply_patch(&mut self, patch: GamePatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(price) = patch.price {
            // While a sale is set the new price is the pre-sale price
            match self.sale.as_mut() {
                Some(sale) => {
                    sale.original_price = price;
                    self.price = sale.discounted_price();
                }
                None => self.price = price,
            }
        }
        if let Some(description) = patch.description {
            self.description = blank_to_none(description);
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(image) = patch.image {
            self.image = blank_to_none(image);
        }
        if let Some(release_date) = patch.release_date {
            self.release_date = release_date;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(notify) = patch.notify_on_release {
            self.notify_on_release = notify;
        }
        if let Some(sold) = patch.sold {
            self.sold = sold;
        }
        if let Some(is_wishlist) = patch.is_wishlist {
            self.is_wishlist = is_wishlist;
        }

        self.touch();
    }

    pub fn toggle_sold(&mut self) {
        self.sold = !self.sold;
        self.touch();
    }

    pub fn toggle_wishlist(&mut self) {
        self.is_wishlist = !self.is_wishlist;
        self.touch();
    }

    /// Returns false when the game had already been viewed
    pub fn mark_viewed(&mut self) -> bool {
        if !self.is_new {
            return false;
        }
        self.is_new = false;
        self.touch();
        true
    }

    /// Start (or replace) a sale.
    ///
    /// The original price of a running sale is kept so that stacking
    /// discounts never compounds.
    pub fn apply_sale(
        &mut self,
        discount_percent: u32,
        sale_end_date: NaiveDate,
        today: NaiveDate,
    ) -> DomainResult<()> {
        if sale_end_date <= today {
            return Err(DomainError::InvariantViolation(format!(
                "Sale end date {} must be after {}",
                sale_end_date, today
            )));
        }

        let original_price = self
            .sale
            .as_ref()
            .map(|s| s.original_price)
            .unwrap_or(self.price);
        let sale = SaleState::new(original_price, discount_percent, sale_end_date)?;

        self.price = sale.discounted_price();
        self.sale = Some(sale);
        self.touch();
        Ok(())
    }

    /// Restores the pre-sale price. Returns false if no sale was set.
    pub fn remove_sale(&mut self) -> bool {
        match self.sale.take() {
            Some(sale) => {
                self.price = sale.original_price;
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn is_on_sale(&self, now: NaiveDateTime) -> bool {
        self.sale
            .as_ref()
            .map_or(false, |sale| sale.is_active(now.date()))
    }

    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        self.release_date > now.date()
    }

    /// Whole days until release, rounded up; negative once released
    pub fn days_until_release(&self, now: NaiveDateTime) -> i64 {
        let release = self.release_date.and_time(chrono::NaiveTime::MIN);
        let seconds = (release - now).num_seconds() as f64;
        (seconds / 86_400.0).ceil() as i64
    }

    /// Price a buyer would pay right now
    pub fn final_price(&self, now: NaiveDateTime) -> f64 {
        if self.is_on_sale(now) {
            return self.price;
        }
        self.sale
            .as_ref()
            .map(|s| s.original_price)
            .unwrap_or(self.price)
    }

    /// Short badge shown on list cards, most important state first
    pub fn status_badge(&self, now: NaiveDateTime) -> Option<String> {
        if self.sold {
            return Some("Sold".to_string());
        }
        if self.is_new {
            return Some("NEW".to_string());
        }
        if let Some(sale) = self.sale.as_ref().filter(|_| self.is_on_sale(now)) {
            return Some(format!("-{}%", sale.discount_percent));
        }
        if self.is_upcoming(now) {
            return Some(format!("{}d", self.days_until_release(now)));
        }
        None
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl SaleState {
    pub fn new(
        original_price: f64,
        discount_percent: u32,
        sale_end_date: NaiveDate,
    ) -> DomainResult<Self> {
        if discount_percent > 100 {
            return Err(DomainError::InvalidDiscount(discount_percent));
        }
        if !original_price.is_finite() || original_price < 0.0 {
            return Err(DomainError::InvariantViolation(format!(
                "Original price {} must be a non-negative number",
                original_price
            )));
        }
        Ok(Self {
            original_price,
            discount_percent,
            sale_end_date,
        })
    }

    pub fn discounted_price(&self) -> f64 {
        let factor = f64::from(100 - self.discount_percent) / 100.0;
        round_cents(self.original_price * factor)
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.sale_end_date > today
    }

    /// Day the sale-ending reminder is about
    pub fn last_day(&self) -> NaiveDate {
        self.sale_end_date - Duration::days(1)
    }
}

impl ReminderHandles {
    pub fn is_empty(&self) -> bool {
        self.release.is_none() && self.sale.is_none()
    }

    /// All handles currently recorded
    pub fn iter(&self) -> impl Iterator<Item = &ReminderHandle> {
        self.release.iter().chain(self.sale.iter())
    }
}

impl Rating {
    /// Ordering weight used for rating sorts
    pub fn rank(self) -> u8 {
        match self {
            Rating::Low => 1,
            Rating::Medium => 2,
            Rating::High => 3,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Low => write!(f, "low"),
            Rating::Medium => write!(f, "medium"),
            Rating::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for Rating {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Rating::Low),
            "medium" => Ok(Rating::Medium),
            "high" => Ok(Rating::High),
            other => Err(DomainError::UnknownRating(other.to_string())),
        }
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
