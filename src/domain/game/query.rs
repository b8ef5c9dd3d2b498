use serde::{Deserialize, Serialize};

use super::entity::Game;

/// Predefined list filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameFilter {
    #[default]
    All,
    Wishlist,
    New,
    /// Sale populated and not yet expired
    Sale,
    /// Release date after today
    Upcoming,
    Sold,
}

/// List orderings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameSort {
    #[default]
    DateDesc,
    DateAsc,
    PriceDesc,
    PriceAsc,
    TitleAsc,
    RatingDesc,
    ReleaseAsc,
}

impl GameSort {
    /// SQL ORDER BY clause for this sort. `TitleAsc` only pre-orders ties;
    /// titles are compared after loading, see `sort_in_memory`.
    pub fn order_by(self) -> &'static str {
        match self {
            GameSort::DateDesc => "created_at DESC, id DESC",
            GameSort::DateAsc => "created_at ASC, id ASC",
            GameSort::PriceDesc => "price DESC, id DESC",
            GameSort::PriceAsc => "price ASC, id DESC",
            GameSort::TitleAsc => "id DESC",
            GameSort::RatingDesc => {
                "CASE rating WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END DESC, id DESC"
            }
            GameSort::ReleaseAsc => "release_date ASC, id DESC",
        }
    }

    /// Orderings SQLite cannot express for every script.
    /// The sort is stable, so ties keep the SQL order.
    pub fn sort_in_memory(self, games: &mut [Game]) {
        if self == GameSort::TitleAsc {
            // COLLATE NOCASE folds ASCII only
            games.sort_by_cached_key(|game| game.title.to_lowercase());
        }
    }
}

impl std::fmt::Display for GameFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GameFilter::All => "all",
            GameFilter::Wishlist => "wishlist",
            GameFilter::New => "new",
            GameFilter::Sale => "sale",
            GameFilter::Upcoming => "upcoming",
            GameFilter::Sold => "sold",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for GameFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(GameFilter::All),
            "wishlist" => Ok(GameFilter::Wishlist),
            "new" => Ok(GameFilter::New),
            "sale" => Ok(GameFilter::Sale),
            "upcoming" => Ok(GameFilter::Upcoming),
            "sold" => Ok(GameFilter::Sold),
            other => Err(format!("Unknown filter '{}'", other)),
        }
    }
}

impl std::str::FromStr for GameSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(GameSort::DateDesc),
            "date-asc" => Ok(GameSort::DateAsc),
            "price-desc" => Ok(GameSort::PriceDesc),
            "price-asc" => Ok(GameSort::PriceAsc),
            "title-asc" => Ok(GameSort::TitleAsc),
            "rating-desc" => Ok(GameSort::RatingDesc),
            "release-asc" => Ok(GameSort::ReleaseAsc),
            other => Err(format!("Unknown sort '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_names_round_trip_through_display() {
        for filter in [
            GameFilter::All,
            GameFilter::Wishlist,
            GameFilter::New,
            GameFilter::Sale,
            GameFilter::Upcoming,
            GameFilter::Sold,
        ] {
            assert_eq!(filter.to_string().parse::<GameFilter>(), Ok(filter));
        }
    }

    #[test]
    fn test_unknown_sort_is_rejected() {
        assert!("random".parse::<GameSort>().is_err());
        assert_eq!("price-asc".parse::<GameSort>(), Ok(GameSort::PriceAsc));
    }
}
