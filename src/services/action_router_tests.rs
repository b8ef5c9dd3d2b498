// src/services/action_router_tests.rs

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::domain::game::entity::tests::date;
    use crate::domain::reminder::{ReminderPayload, ReminderResponse};
    use crate::integrations::NotificationBackend;
    use crate::services::test_support::{new_game, now, Harness};
    use crate::services::ActionOutcome;

    fn sale_payload(game_id: i64) -> Option<ReminderPayload> {
        Some(ReminderPayload::Sale {
            game_id,
            title: "Hades".to_string(),
            discount_percent: 20,
            price: 40.0,
        })
    }

    #[tokio::test]
    async fn test_view_actions_do_not_mutate() {
        let (h, _backend) = Harness::local();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();

        let outcome = h
            .router
            .dispatch(&ReminderResponse::new("view", sale_payload(game.id)), now())
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::ShowGame(Some(game.id)));

        let outcome = h
            .router
            .dispatch(&ReminderResponse::new("view-stats", None), now())
            .await
            .unwrap();
        assert_eq!(outcome, ActionOutcome::ShowStatistics);

        assert_eq!(h.games.require_game(game.id).unwrap(), game);
    }

    #[tokio::test]
    async fn test_delete_action_cancels_reminders_and_removes_record() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();
        h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();
        assert_eq!(backend.list_scheduled().await.unwrap().len(), 1);

        let outcome = h
            .router
            .dispatch(&ReminderResponse::new("delete", sale_payload(game.id)), now())
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Deleted(game.id));
        assert!(h.games.get_game(game.id).unwrap().is_none());
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_of_missing_game_is_swallowed() {
        let (h, _backend) = Harness::local();

        let outcome = h
            .router
            .dispatch(&ReminderResponse::new("delete", sale_payload(404)), now())
            .await
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Deleted(404));
    }

    #[tokio::test]
    async fn test_unknown_and_passive_actions_are_ignored() {
        let (h, _backend) = Harness::local();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();

        for identifier in ["remind-later", "dismiss", "share-with-friends"] {
            let outcome = h
                .router
                .dispatch(&ReminderResponse::new(identifier, sale_payload(game.id)), now())
                .await
                .unwrap();
            assert_eq!(outcome, ActionOutcome::Ignored);
        }
        assert!(h.games.get_game(game.id).unwrap().is_some());

        let handled = h
            .event_bus
            .get_event_log()
            .into_iter()
            .filter(|e| e.event_type == "ReminderActionHandled")
            .count();
        assert_eq!(handled, 2);
    }

    #[tokio::test]
    async fn test_run_drains_channel_until_closed() {
        let (h, _backend) = Harness::local();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();

        let (tx, rx) = mpsc::channel(4);
        tx.send(ReminderResponse::new("view-wishlist", None)).await.unwrap();
        tx.send(ReminderResponse::new("delete", sale_payload(game.id)))
            .await
            .unwrap();
        drop(tx);

        assert_eq!(h.router.run(rx).await, 2);
        assert!(h.games.get_game(game.id).unwrap().is_none());
    }
}
