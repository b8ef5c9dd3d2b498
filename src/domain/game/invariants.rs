use super::entity::{Game, NewGame, SaleState};
use crate::domain::{DomainError, DomainResult};

/// Validates a game before it is first written
pub fn validate_new_game(game: &NewGame) -> DomainResult<()> {
    validate_required("title", &game.title)?;
    validate_required("category", &game.category)?;
    validate_price(game.price)?;
    Ok(())
}

/// Validates all Game invariants
/// These are the absolute rules that must hold for a stored Game
pub fn validate_game(game: &Game) -> DomainResult<()> {
    validate_required("title", &game.title)?;
    validate_required("category", &game.category)?;
    validate_price(game.price)?;
    if let Some(sale) = &game.sale {
        validate_sale(sale)?;
    }
    Ok(())
}

fn validate_required(field: &'static str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::InvariantViolation(format!(
            "Price {} must be a non-negative number",
            price
        )));
    }
    Ok(())
}

fn validate_sale(sale: &SaleState) -> DomainResult<()> {
    if sale.discount_percent > 100 {
        return Err(DomainError::InvalidDiscount(sale.discount_percent));
    }
    validate_price(sale.original_price)
}

/// Invariants that must hold true for the Game domain:
///
/// 1. Identity (id) is assigned by the store and never changes
/// 2. Title, category and release date are always present
/// 3. Price is finite and non-negative
/// 4. Sale values exist all together or not at all
/// 5. A sale is active only while its end date is in the future
/// 6. `is_new` only ever goes from true to false
/// 7. Created timestamp never changes

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::game::entity::tests::{date, sample_game};

    #[test]
    fn test_valid_new_game() {
        let game = NewGame::new("Celeste", "Platformer", 19.99, date(2018, 1, 25));
        assert!(validate_new_game(&game).is_ok());
    }

    #[test]
    fn test_blank_title_fails() {
        let game = NewGame::new("   ", "Platformer", 19.99, date(2018, 1, 25));
        assert_eq!(
            validate_new_game(&game),
            Err(DomainError::MissingField("title"))
        );
    }

    #[test]
    fn test_blank_category_fails() {
        let game = NewGame::new("Celeste", "", 19.99, date(2018, 1, 25));
        assert_eq!(
            validate_new_game(&game),
            Err(DomainError::MissingField("category"))
        );
    }

    #[test]
    fn test_negative_or_nan_price_fails() {
        let game = NewGame::new("Celeste", "Platformer", -1.0, date(2018, 1, 25));
        assert!(validate_new_game(&game).is_err());
        let game = NewGame::new("Celeste", "Platformer", f64::NAN, date(2018, 1, 25));
        assert!(validate_new_game(&game).is_err());
    }

    #[test]
    fn test_stored_game_with_bad_sale_fails() {
        let mut game = sample_game(1);
        game.sale = Some(SaleState {
            original_price: 10.0,
            discount_percent: 150,
            sale_end_date: date(2026, 1, 1),
        });
        assert_eq!(validate_game(&game), Err(DomainError::InvalidDiscount(150)));
    }
}
