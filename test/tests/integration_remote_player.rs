//! A server-side delegate talking to the peer playing a player

use std::{net::SocketAddr, sync::Arc};

use skirmish_client::ClientLogin;
use skirmish_server::{
    remote_player_name, DelegateBridge, DelegateError, GameStep, HistoryLog, PlayerId, Server,
    REMOTE_PLAYER,
};
use skirmish_shared::{EngineVersion, PeerId, RemoteMessenger, RemoteValue};
use skirmish_test::{
    admit_client, test_server_config, CallLog, FakeGameSession, LocalHub, RecordingHandler,
    ScriptedRandomSource,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Game {
    hub: Arc<LocalHub>,
    server: Server,
    amy: Arc<RemoteMessenger>,
    log: Arc<CallLog>,
}

fn game() -> Game {
    init_logging();
    let hub = LocalHub::new();
    let server = Server::new(test_server_config(None), hub.join(PeerId::new("host")));
    let client = ClientLogin::for_machine(EngineVersion::new(1, 9, 0), "amy", b"amy", None);
    let amy = admit_client(&hub, &server, SocketAddr::from(([10, 1, 1, 1], 3300)), &client)
        .unwrap();

    let log = CallLog::new();
    amy.register_remote(
        &remote_player_name(&PlayerId::new("Germans")),
        RecordingHandler::new("amy", &REMOTE_PLAYER, &log)
            .replying(true)
            .into_arc(),
    )
    .unwrap();

    Game {
        hub,
        server,
        amy,
        log,
    }
}

fn bridge(game: &Game, session: Arc<FakeGameSession>) -> DelegateBridge {
    let services = game
        .server
        .game_services("g1", session, Arc::new(HistoryLog::new()));
    DelegateBridge::new(
        services,
        GameStep::new("germansCombatMove", "Combat Move").with_player(PlayerId::new("Germans")),
        Arc::new(ScriptedRandomSource::new([vec![3]])),
    )
}

#[test]
fn remote_player_answers_from_its_peer() {
    let game = game();
    let bridge = bridge(&game, FakeGameSession::new());
    game.server.execution().enter_delegate_execution().unwrap();

    let player = bridge.resolve_remote_player(None).unwrap();
    assert!(player.confirm("Attack Moscow?").unwrap());
    // the call ran outside the delegate slot and handed it back afterwards
    assert!(game.server.execution().is_current_thread_executing());

    let calls = game.log.finished();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, "confirm");
    assert_eq!(calls[0].sender, PeerId::new("host"));
    assert_eq!(calls[0].args, vec![RemoteValue::from("Attack Moscow?")]);

    game.server.execution().leave_delegate_execution().unwrap();
}

#[test]
fn player_without_peer_or_step_player_fails() {
    let game = game();
    let bridge = bridge(&game, FakeGameSession::new());

    assert_eq!(
        bridge
            .resolve_remote_player(Some(&PlayerId::new("Japanese")))
            .err(),
        Some(DelegateError::GameOver)
    );

    let services = game
        .server
        .game_services("g1", FakeGameSession::new(), Arc::new(HistoryLog::new()));
    let neutral = DelegateBridge::new(
        services,
        GameStep::new("endRound", "End Round"),
        Arc::new(ScriptedRandomSource::default()),
    );
    assert_eq!(
        neutral.resolve_remote_player(None).err(),
        Some(DelegateError::NoPlayer {
            step: "endRound".to_string()
        })
    );
}

#[test]
fn disconnected_player_ends_the_game_for_the_delegate() {
    let game = game();
    let bridge = bridge(&game, FakeGameSession::new());
    let player = bridge.resolve_remote_player(None).unwrap();

    game.hub.disconnect(game.amy.local_peer());
    game.server.disconnect_peer(game.amy.local_peer());

    assert_eq!(
        player.report_message("Your turn", "Turn").err(),
        Some(DelegateError::GameOver)
    );
    assert_eq!(
        bridge.resolve_remote_player(None).err(),
        Some(DelegateError::GameOver)
    );
}

#[test]
fn host_losing_connection_is_game_over() {
    let game = game();
    let bridge = bridge(&game, FakeGameSession::new());
    let player = bridge.resolve_remote_player(None).unwrap();

    game.hub.disconnect(&PeerId::new("host"));

    assert_eq!(player.confirm("Still there?").err(), Some(DelegateError::GameOver));
}

#[test]
fn ended_session_refuses_new_work() {
    let game = game();
    let session = FakeGameSession::new();
    let bridge = bridge(&game, session.clone());

    assert_eq!(
        bridge.get_random(6, None, skirmish_server::RandomCategory::Combat, "roll"),
        Ok(3)
    );
    session.end_game();
    assert_eq!(
        bridge.resolve_remote_player(None).err(),
        Some(DelegateError::GameOver)
    );

    bridge.stop_game_sequence();
    assert!(session.is_sequence_stopped());
}

#[test]
fn mistyped_answers_are_reported_not_guessed() {
    let game = game();
    let bridge = bridge(&game, FakeGameSession::new());
    for (player, reply) in [
        ("Russians", RemoteValue::from("yes")),
        ("Italians", RemoteValue::Unit),
    ] {
        game.amy
            .register_remote(
                &remote_player_name(&PlayerId::new(player)),
                RecordingHandler::new(player, &REMOTE_PLAYER, &game.log)
                    .replying(reply)
                    .into_arc(),
            )
            .unwrap();
    }

    let russians = bridge
        .resolve_remote_player(Some(&PlayerId::new("Russians")))
        .unwrap();
    assert_eq!(
        russians.confirm("Retreat?").err(),
        Some(DelegateError::UnexpectedReply {
            method: "confirm".to_string(),
            reply: RemoteValue::from("yes"),
        })
    );
    assert!(matches!(
        russians.select_option("Where to?", &["Kiev", "Minsk"]),
        Err(DelegateError::UnexpectedReply { .. })
    ));

    let italians = bridge
        .resolve_remote_player(Some(&PlayerId::new("Italians")))
        .unwrap();
    assert_eq!(italians.select_option("Where to?", &["Rome"]), Ok(None));
    assert!(matches!(
        italians.confirm("Surrender?"),
        Err(DelegateError::UnexpectedReply { .. })
    ));
}
