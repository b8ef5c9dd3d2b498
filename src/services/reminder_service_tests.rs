// src/services/reminder_service_tests.rs

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use crate::domain::game::entity::tests::{at, date};
    use crate::domain::game::ReminderHandles;
    use crate::domain::reminder::{ReminderHandle, ReminderKind, ReminderPayload};
    use crate::error::AppError;
    use crate::integrations::notifications::MockNotificationBackend;
    use crate::integrations::NotificationBackend;
    use crate::services::test_support::{new_game, now, Harness};
    use crate::services::SetSaleRequest;

    #[tokio::test]
    async fn test_release_reminder_fires_on_the_eve() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = now().date() + Duration::days(10);
        let mut game = h.games.create_game(request).unwrap();

        let handle = h
            .reminders
            .sync_release_reminder(&mut game, now())
            .await
            .unwrap()
            .expect("release reminder scheduled");

        let scheduled = backend.list_scheduled().await.unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].handle, handle);
        assert_eq!(scheduled[0].trigger.fire_at, at(2026, 3, 10, 10));

        let stored = h.games.require_game(game.id).unwrap();
        assert_eq!(stored.reminders.release, Some(handle));
    }

    #[tokio::test]
    async fn test_unsaved_handle_is_cancelled_on_the_backend() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();
        h.repo.delete(game.id).unwrap();

        let result = h.reminders.sync_release_reminder(&mut game, now()).await;

        assert!(matches!(result, Err(AppError::NotFound(id)) if id == game.id));
        assert!(game.reminders.release.is_none());
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resync_replaces_previous_handle() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();

        let first = h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();
        let second = h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();

        assert_ne!(first, second);
        let scheduled = backend.list_scheduled().await.unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(Some(scheduled[0].handle.clone()), second);
    }

    #[tokio::test]
    async fn test_release_reminder_cleared_when_opted_out() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();
        h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();

        game.notify_on_release = false;
        let handle = h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();

        assert!(handle.is_none());
        assert!(backend.list_scheduled().await.unwrap().is_empty());
        assert!(h.games.require_game(game.id).unwrap().reminders.is_empty());
    }

    #[tokio::test]
    async fn test_sale_reminder_on_last_day() {
        let (h, backend) = Harness::local();
        let game = h.games.create_game(new_game("Hades", 50.0)).unwrap();
        let mut game = h
            .games
            .set_sale(
                SetSaleRequest {
                    game_id: game.id,
                    discount_percent: 20,
                    sale_end_date: now().date() + Duration::days(5),
                },
                now(),
            )
            .unwrap();

        h.reminders.sync_sale_reminder(&mut game, now()).await.unwrap();

        let scheduled = backend.list_scheduled().await.unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].trigger.fire_at, at(2026, 3, 5, 18));
        match &scheduled[0].payload {
            ReminderPayload::Sale {
                discount_percent,
                price,
                ..
            } => {
                assert_eq!(*discount_percent, 20);
                assert_eq!(*price, 40.0);
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert!(game.reminders.sale.is_some());
    }

    #[tokio::test]
    async fn test_refused_schedule_keeps_record_without_handle() {
        let mut backend = MockNotificationBackend::new();
        backend
            .expect_schedule()
            .returning(|_| Err(AppError::Scheduling("permission revoked".to_string())));
        let h = Harness::with_backend(Arc::new(backend));

        let mut request = new_game("Hades II", 29.99).with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();

        let handle = h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();

        assert!(handle.is_none());
        assert!(h.games.require_game(game.id).unwrap().reminders.is_empty());
        let failures = h
            .event_bus
            .get_event_log()
            .into_iter()
            .filter(|e| e.event_type == "ReminderSchedulingFailed")
            .count();
        assert_eq!(failures, 1);
    }

    #[tokio::test]
    async fn test_cancel_game_reminders_cancels_both_handles() {
        let mut backend = MockNotificationBackend::new();
        backend
            .expect_cancel()
            .withf(|h| h.as_str() == "rel-1" || h.as_str() == "sale-1")
            .times(2)
            .returning(|_| Ok(true));
        let h = Harness::with_backend(Arc::new(backend));

        let mut game = h.games.create_game(new_game("Tunic", 29.99)).unwrap();
        game.reminders = ReminderHandles {
            release: Some(ReminderHandle::new("rel-1")),
            sale: Some(ReminderHandle::new("sale-1")),
        };

        h.reminders.cancel_game_reminders(&game).await;
    }

    #[tokio::test]
    async fn test_cancel_of_fired_handle_is_silent() {
        let mut backend = MockNotificationBackend::new();
        backend.expect_cancel().times(1).returning(|_| Ok(false));
        let h = Harness::with_backend(Arc::new(backend));

        let mut game = h.games.create_game(new_game("Tunic", 29.99)).unwrap();
        game.reminders.release = Some(ReminderHandle::new("long-gone"));

        h.reminders.cancel_game_reminders(&game).await;
    }

    #[tokio::test]
    async fn test_refresh_periodic_replaces_instead_of_stacking() {
        let (h, backend) = Harness::local();
        let mut request = new_game("Sable", 24.99).on_wishlist().with_release_reminder();
        request.release_date = date(2026, 3, 20);
        let mut game = h.games.create_game(request).unwrap();
        h.reminders.sync_release_reminder(&mut game, now()).await.unwrap();

        assert_eq!(h.reminders.refresh_periodic(now()).await.unwrap(), 3);
        assert_eq!(h.reminders.refresh_periodic(now()).await.unwrap(), 3);

        let scheduled = backend.list_scheduled().await.unwrap();
        let kinds: Vec<ReminderKind> = scheduled.iter().map(|r| r.payload.kind()).collect();
        assert_eq!(scheduled.len(), 4);
        assert_eq!(kinds.iter().filter(|k| k.is_periodic()).count(), 3);
        assert!(kinds.contains(&ReminderKind::Release));

        // Sunday 09:00: stats at 10:00 today, wishlist Monday noon, nudge in three days
        assert_eq!(scheduled[0].trigger.fire_at, at(2026, 3, 1, 10));
        assert_eq!(scheduled[1].trigger.fire_at, at(2026, 3, 2, 12));
        assert_eq!(scheduled[2].trigger.fire_at, at(2026, 3, 4, 19));
    }

    #[tokio::test]
    async fn test_refresh_periodic_on_empty_catalog_schedules_nothing() {
        let (h, backend) = Harness::local();
        assert_eq!(h.reminders.refresh_periodic(now()).await.unwrap(), 0);
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_survives_backend_failure() {
        let mut backend = MockNotificationBackend::new();
        backend
            .expect_cancel_all()
            .returning(|| Err(AppError::Scheduling("offline".to_string())));
        let h = Harness::with_backend(Arc::new(backend));

        assert_eq!(h.reminders.clear_all().await, 0);
    }

    #[tokio::test]
    async fn test_clear_all_cancels_everything() {
        let (h, backend) = Harness::local();
        h.games
            .create_game(new_game("Sable", 24.99).on_wishlist())
            .unwrap();
        h.reminders.refresh_periodic(now()).await.unwrap();

        assert_eq!(h.reminders.clear_all().await, 3);
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }
}
