//! Service-level flows: room lifecycle against the store, token-based
//! acting, and the local hot-seat/bot registry.

use wezyk::config::Config;
use wezyk::game::engine::ActionError;
use wezyk::game::Mode;
use wezyk::server::{GameService, ServiceError};

fn service_in(dir: &tempfile::TempDir) -> GameService {
    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_string_lossy().to_string();
    GameService::new(config).expect("service")
}

#[test]
fn room_lifecycle_create_join_act() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);

    let host = service.create_room("Ala").unwrap();
    assert_eq!(host.player_index, 0);
    assert_eq!(host.snapshot.players.len(), 1);

    let guest = service.join_room(&host.code, "Bartek").unwrap();
    assert_eq!(guest.player_index, 1);
    assert_eq!(guest.snapshot.players.len(), 2);
    assert_ne!(host.token, guest.token);

    // The guest cannot act on the host's turn.
    let err = service.room_roll(&host.code, &guest.token).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Action(ActionError::NotYourTurn)
    ));

    // The host rolls; state and version advance.
    let after = service.room_roll(&host.code, &host.token).unwrap();
    assert_eq!(after.mode, Mode::Multiplayer);
    assert!(after.last_roll.is_some());
    assert!(after.version > guest.snapshot.version);
}

#[test]
fn unknown_tokens_and_codes_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let host = service.create_room("Ala").unwrap();

    assert!(matches!(
        service.room_roll(&host.code, "no-such-token"),
        Err(ServiceError::UnknownPlayer)
    ));
    assert!(matches!(
        service.room_snapshot("QQQQQ"),
        Err(ServiceError::Room(_))
    ));
}

#[test]
fn polling_does_not_bump_the_version() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let host = service.create_room("Ala").unwrap();
    let v1 = service.room_snapshot(&host.code).unwrap().version;
    let v2 = service.room_snapshot(&host.code).unwrap().version;
    assert_eq!(v1, v2);
}

#[test]
fn full_rooms_reject_further_joins() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.storage.data_dir = dir.path().to_string_lossy().to_string();
    config.game.max_players = 2;
    let mut service = GameService::new(config).unwrap();

    let host = service.create_room("Ala").unwrap();
    service.join_room(&host.code, "Bartek").unwrap();
    assert!(matches!(
        service.join_room(&host.code, "Celina"),
        Err(ServiceError::RoomFull)
    ));
}

#[test]
fn finished_rooms_reject_joins_and_actions() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let host = service.create_room("Ala").unwrap();

    // Finish the game behind the service's back, as the engine would.
    let mut session = service.store().load(&host.code).unwrap();
    session.players[0].position = 100;
    session.winner = Some(session.players[0].id.clone());
    service.store().save(&host.code, &mut session).unwrap();

    assert!(matches!(
        service.join_room(&host.code, "Bartek"),
        Err(ServiceError::RoomFinished)
    ));
    assert!(matches!(
        service.room_roll(&host.code, &host.token),
        Err(ServiceError::Action(ActionError::GameFinished))
    ));
    let snapshot = service.room_snapshot(&host.code).unwrap();
    assert!(snapshot.won);
    assert_eq!(snapshot.winner.as_deref(), Some("Ala"));
}

#[test]
fn hotseat_games_play_under_a_client_key() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);

    let start = service
        .start_hotseat("client-1", vec!["Gracz 1".into(), "Gracz 2".into()])
        .unwrap();
    assert_eq!(start.mode, Mode::Hotseat);
    assert_eq!(start.turn, 0);

    let after = service.local_roll("client-1").unwrap();
    assert!(after.last_roll.is_some());
    assert_eq!(after.move_count, 1);

    // Unknown keys and cardless card plays are structured rejections.
    // Player 1 has not moved yet, so they certainly hold no card.
    assert!(matches!(
        service.local_roll("client-2"),
        Err(ServiceError::NoSuchGame)
    ));
    assert!(matches!(
        service.local_use_card("client-1", 1),
        Err(ServiceError::Action(ActionError::NoCard))
    ));
}

#[test]
fn player_counts_are_bounded() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    assert!(matches!(
        service.start_hotseat("k", vec!["solo".into()]),
        Err(ServiceError::BadPlayerCount { .. })
    ));
    let five = (1..=5).map(|i| format!("G{}", i)).collect();
    assert!(matches!(
        service.start_hotseat("k", five),
        Err(ServiceError::BadPlayerCount { .. })
    ));
}

#[test]
fn bot_mode_returns_control_to_the_human() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    service.start_bot_game("client-1", "Gracz").unwrap();

    for _ in 0..50 {
        let snapshot = match service.local_roll("client-1") {
            Ok(s) => s,
            Err(ServiceError::Action(ActionError::GameFinished)) => break,
            Err(other) => panic!("unexpected rejection: {}", other),
        };
        if snapshot.won {
            break;
        }
        if let Some(pending) = &snapshot.pending {
            // Only the human can owe a decision here; answer and go on.
            let index = pending.player_index;
            service.local_decide("client-1", index, wezyk::game::Decision::Retreat)
                .unwrap();
            continue;
        }
        // After every human action the bot has already played itself out.
        assert!(!snapshot.players[snapshot.turn].is_bot);
    }
}

#[test]
fn cards_are_playable_out_of_turn_in_rooms() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    let host = service.create_room("Ala").unwrap();
    let guest = service.join_room(&host.code, "Bartek").unwrap();

    // Hand the guest a teleport behind the scenes.
    let mut session = service.store().load(&host.code).unwrap();
    session.players[1].card = Some(wezyk::game::Card::Teleport);
    session.players[1].position = 40;
    service.store().save(&host.code, &mut session).unwrap();

    // It is the host's turn, but card use is a free action.
    let snapshot = service.room_use_card(&host.code, &guest.token).unwrap();
    assert_eq!(snapshot.players[1].position, 43);
    assert_eq!(snapshot.players[1].card, None);
    assert_eq!(snapshot.turn, 0, "card use never rotates the turn");
}

#[test]
fn invalid_names_are_rejected_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let mut service = service_in(&dir);
    assert!(matches!(
        service.create_room("   "),
        Err(ServiceError::Name(_))
    ));
    assert!(matches!(
        service.start_bot_game("k", "bad\nname"),
        Err(ServiceError::Name(_))
    ));
}
