// src/services/game_service_tests.rs

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use crate::domain::game::entity::tests::date;
    use crate::domain::game::{GameFilter, GamePatch, GameSort, Rating};
    use crate::domain::DomainError;
    use crate::error::AppError;
    use crate::services::test_support::{new_game, now, Harness};
    use crate::services::SetSaleRequest;

    fn harness() -> Harness {
        Harness::local().0
    }

    #[test]
    fn test_create_assigns_unique_ids_and_emits_event() {
        let h = harness();
        let a = h.games.create_game(new_game("Celeste", 19.99)).unwrap();
        let b = h.games.create_game(new_game("Celeste", 19.99)).unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.is_new);
        let log = h.event_bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "GameCreated");
    }

    #[test]
    fn test_create_rejects_missing_title_before_write() {
        let h = harness();
        let result = h.games.create_game(new_game("   ", 10.0));

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::MissingField("title")))
        ));
        assert_eq!(h.repo.count().unwrap(), 0);
        assert!(h.event_bus.get_event_log().is_empty());
    }

    #[test]
    fn test_update_merges_patch_and_keeps_id() {
        let h = harness();
        let game = h.games.create_game(new_game("Tunic", 29.99)).unwrap();

        let updated = h
            .games
            .update_game(
                game.id,
                GamePatch {
                    price: Some(24.99),
                    rating: Some(Rating::High),
                    description: Some(Some("A fox".to_string())),
                    ..GamePatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, game.id);
        assert_eq!(updated.title, "Tunic");
        assert_eq!(updated.price, 24.99);
        assert!(updated.updated_at >= game.updated_at);

        let stored = h.games.require_game(game.id).unwrap();
        assert_eq!(stored.rating, Rating::High);
        assert_eq!(stored.description.as_deref(), Some("A fox"));
    }

    #[test]
    fn test_update_validation_leaves_record_untouched() {
        let h = harness();
        let game = h.games.create_game(new_game("Tunic", 29.99)).unwrap();

        let result = h.games.update_game(
            game.id,
            GamePatch {
                price: Some(-1.0),
                ..GamePatch::default()
            },
        );

        assert!(matches!(result, Err(AppError::Domain(_))));
        assert_eq!(h.games.require_game(game.id).unwrap().price, 29.99);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let h = harness();
        assert!(matches!(
            h.games.update_game(9, GamePatch::default()),
            Err(AppError::NotFound(9))
        ));
        assert!(matches!(h.games.delete_game(9), Err(AppError::NotFound(9))));
        assert!(matches!(h.games.toggle_sold(9), Err(AppError::NotFound(9))));
        assert!(h.games.get_game(9).unwrap().is_none());
    }

    #[test]
    fn test_wishlist_toggled_twice_is_gone() {
        let h = harness();
        let game = h.games.create_game(new_game("Sable", 24.99)).unwrap();

        assert!(h.games.toggle_wishlist(game.id).unwrap().is_wishlist);
        assert_eq!(h.games.wishlist_games().unwrap().len(), 1);

        assert!(!h.games.toggle_wishlist(game.id).unwrap().is_wishlist);
        assert!(h.games.wishlist_games().unwrap().is_empty());
    }

    #[test]
    fn test_mark_viewed_only_writes_once() {
        let h = harness();
        let game = h.games.create_game(new_game("Inside", 19.99)).unwrap();

        assert!(!h.games.mark_viewed(game.id).unwrap().is_new);
        let events = h.event_bus.get_event_log().len();
        h.games.mark_viewed(game.id).unwrap();

        assert_eq!(h.event_bus.get_event_log().len(), events);
        assert!(h.games.new_games().unwrap().is_empty());
    }

    #[test]
    fn test_set_sale_discounts_and_remove_restores() {
        let h = harness();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();
        let end = now().date() + Duration::days(5);

        let on_sale = h
            .games
            .set_sale(
                SetSaleRequest {
                    game_id: game.id,
                    discount_percent: 20,
                    sale_end_date: end,
                },
                now(),
            )
            .unwrap();

        assert_eq!(on_sale.price, 40.0);
        assert_eq!(on_sale.sale.as_ref().unwrap().original_price, 50.0);
        assert_eq!(h.games.games_on_sale(now()).unwrap().len(), 1);
        assert!(h
            .games
            .games_on_sale(end.and_hms_opt(0, 0, 0).unwrap())
            .unwrap()
            .is_empty());

        let restored = h.games.remove_sale(game.id).unwrap();
        assert_eq!(restored.price, 50.0);
        assert!(restored.sale.is_none());
        assert!(h.games.games_on_sale(now()).unwrap().is_empty());
    }

    #[test]
    fn test_price_edit_during_sale_survives_remove_sale() {
        let h = harness();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();
        h.games
            .set_sale(
                SetSaleRequest {
                    game_id: game.id,
                    discount_percent: 20,
                    sale_end_date: now().date() + Duration::days(5),
                },
                now(),
            )
            .unwrap();

        let edited = h
            .games
            .update_game(
                game.id,
                GamePatch {
                    price: Some(30.0),
                    ..GamePatch::default()
                },
            )
            .unwrap();

        assert_eq!(edited.price, 24.0);
        let sale = edited.sale.as_ref().unwrap();
        assert_eq!(sale.original_price, 30.0);
        assert_eq!(sale.discount_percent, 20);
        assert_eq!(h.games.require_game(game.id).unwrap().price, 24.0);

        let restored = h.games.remove_sale(game.id).unwrap();
        assert_eq!(restored.price, 30.0);
    }

    #[test]
    fn test_set_sale_rejects_bad_input() {
        let h = harness();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();

        let too_big = h.games.set_sale(
            SetSaleRequest {
                game_id: game.id,
                discount_percent: 150,
                sale_end_date: date(2026, 4, 1),
            },
            now(),
        );
        assert!(matches!(
            too_big,
            Err(AppError::Domain(DomainError::InvalidDiscount(150)))
        ));

        let already_over = h.games.set_sale(
            SetSaleRequest {
                game_id: game.id,
                discount_percent: 10,
                sale_end_date: now().date(),
            },
            now(),
        );
        assert!(matches!(already_over, Err(AppError::Domain(_))));
        assert_eq!(h.games.require_game(game.id).unwrap().price, 50.0);
    }

    #[test]
    fn test_filters_and_upcoming() {
        let h = harness();
        h.games.create_game(new_game("Released", 10.0)).unwrap();
        let mut soon = new_game("Soon", 60.0);
        soon.release_date = date(2026, 3, 11);
        let soon = h.games.create_game(soon).unwrap();
        h.games.toggle_sold(soon.id).unwrap();

        let upcoming = h.games.upcoming_games(now()).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].title, "Soon");

        let sold = h.games.filter_games(GameFilter::Sold, now()).unwrap();
        assert_eq!(sold[0].id, soon.id);
        assert_eq!(h.games.filter_games(GameFilter::All, now()).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_all_then_list_is_empty() {
        let h = harness();
        h.games.create_game(new_game("One", 1.0)).unwrap();
        h.games.create_game(new_game("Two", 2.0)).unwrap();

        assert_eq!(h.games.delete_all_games().unwrap(), 2);
        assert!(h.games.list_games(GameSort::DateDesc).unwrap().is_empty());
        assert!(h.statistics.calculate(now()).unwrap().is_empty());
    }

    #[test]
    fn test_export_json_lists_records_oldest_first() {
        let h = harness();
        h.games.create_game(new_game("First", 1.0)).unwrap();
        h.games.create_game(new_game("Second", 2.0)).unwrap();

        let json = h.games.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let titles: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_statistics_over_catalog() {
        let h = harness();
        let a = h.games.create_game(new_game("A", 10.0)).unwrap();
        h.games.create_game(new_game("B", 30.0)).unwrap();
        h.games.toggle_sold(a.id).unwrap();

        let stats = h.statistics.calculate(now()).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.sold, 1);
        assert_eq!(stats.not_sold, 1);
        assert_eq!(stats.total_value, 40.0);
        assert_eq!(stats.average_price, 20.0);
        assert_eq!(stats.max_price, 30.0);
        assert_eq!(stats.min_price, 10.0);
    }
}
