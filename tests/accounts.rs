//! Integration tests for player accounts: registration, profiles, leaderboard.

use game_ladder_web::{
    create_match, deactivate_player, find_player, leaderboard, list_players, register_player,
    update_profile, GameType, LadderError, MatchRequest, PlayerStatus, ProfileUpdate,
    RegisterPlayer, Store,
};

fn registration(name: &str) -> RegisterPlayer {
    RegisterPlayer {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        avatar: None,
    }
}

fn play(store: &Store, p1: i64, p2: i64, winner: i64) {
    create_match(
        store,
        &MatchRequest {
            player1_id: p1,
            player2_id: p2,
            winner_id: winner,
            game_type: GameType::Casual,
            game_duration: None,
            notes: None,
        },
    )
    .unwrap();
}

#[test]
fn registration_starts_at_default_rating() {
    let store = Store::new();
    let player = register_player(&store, &registration("alice")).unwrap();
    assert_eq!(player.id, 1);
    assert_eq!(player.rating, 1000);
    assert_eq!((player.games_played, player.games_won, player.games_lost), (0, 0, 0));
    assert_eq!(player.status, PlayerStatus::Active);

    let second = register_player(&store, &registration("bob")).unwrap();
    assert_eq!(second.id, 2);
}

#[test]
fn duplicate_username_rejected_case_insensitively() {
    let store = Store::new();
    register_player(&store, &registration("alice")).unwrap();
    let err = register_player(
        &store,
        &RegisterPlayer {
            username: "ALICE".to_string(),
            email: "other@example.com".to_string(),
            avatar: None,
        },
    )
    .unwrap_err();
    assert_eq!(err, LadderError::DuplicateUsername);
}

#[test]
fn duplicate_email_rejected() {
    let store = Store::new();
    register_player(&store, &registration("alice")).unwrap();
    let err = register_player(
        &store,
        &RegisterPlayer {
            username: "bob".to_string(),
            email: "alice@example.com".to_string(),
            avatar: None,
        },
    )
    .unwrap_err();
    assert_eq!(err, LadderError::DuplicateEmail);
}

#[test]
fn unknown_player_reads_as_absent() {
    let store = Store::new();
    assert!(find_player(&store, 7).unwrap().is_none());
}

#[test]
fn profile_update_changes_identity_only() {
    let store = Store::new();
    let alice = register_player(&store, &registration("alice")).unwrap();
    let bob = register_player(&store, &registration("bob")).unwrap();
    play(&store, alice.id, bob.id, alice.id);

    let updated = update_profile(
        &store,
        alice.id,
        &ProfileUpdate {
            username: Some("alicia".to_string()),
            avatar: Some(Some("https://example.com/a.png".to_string())),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.username, "alicia");
    assert_eq!(updated.avatar.as_deref(), Some("https://example.com/a.png"));
    assert_eq!(updated.email, "alice@example.com");
    // Competitive state is untouched by profile edits.
    assert_eq!(updated.rating, 1016);
    assert_eq!(updated.games_played, 1);
}

#[test]
fn profile_update_can_clear_avatar() {
    let store = Store::new();
    let player = register_player(
        &store,
        &RegisterPlayer {
            avatar: Some("https://example.com/a.png".to_string()),
            ..registration("alice")
        },
    )
    .unwrap();

    let updated = update_profile(
        &store,
        player.id,
        &ProfileUpdate { avatar: Some(None), ..Default::default() },
    )
    .unwrap();
    assert_eq!(updated.avatar, None);
}

#[test]
fn empty_profile_update_rejected() {
    let store = Store::new();
    let player = register_player(&store, &registration("alice")).unwrap();
    let err = update_profile(&store, player.id, &ProfileUpdate::default()).unwrap_err();
    assert_eq!(err, LadderError::EmptyProfileUpdate);
}

#[test]
fn profile_update_rejects_taken_username() {
    let store = Store::new();
    register_player(&store, &registration("alice")).unwrap();
    let bob = register_player(&store, &registration("bob")).unwrap();
    let err = update_profile(
        &store,
        bob.id,
        &ProfileUpdate { username: Some("Alice".to_string()), ..Default::default() },
    )
    .unwrap_err();
    assert_eq!(err, LadderError::DuplicateUsername);

    // Re-casing your own name is allowed.
    let updated = update_profile(
        &store,
        bob.id,
        &ProfileUpdate { username: Some("BOB".to_string()), ..Default::default() },
    )
    .unwrap();
    assert_eq!(updated.username, "BOB");
}

#[test]
fn update_of_unknown_player_is_not_found() {
    let store = Store::new();
    let err = update_profile(
        &store,
        9,
        &ProfileUpdate { username: Some("ghost".to_string()), ..Default::default() },
    )
    .unwrap_err();
    assert_eq!(err, LadderError::PlayerNotFound(9));
}

#[test]
fn deactivation_hides_player_from_lookups() {
    let store = Store::new();
    let player = register_player(&store, &registration("alice")).unwrap();
    deactivate_player(&store, player.id).unwrap();

    assert!(find_player(&store, player.id).unwrap().is_none());
    assert!(list_players(&store, 1, 10).unwrap().is_empty());

    // Deactivating twice reads as absent too.
    let err = deactivate_player(&store, player.id).unwrap_err();
    assert_eq!(err, LadderError::PlayerNotFound(player.id));
}

#[test]
fn leaderboard_orders_by_rating_and_skips_inactive() {
    let store = Store::new();
    let a = register_player(&store, &registration("alice")).unwrap();
    let b = register_player(&store, &registration("bob")).unwrap();
    let c = register_player(&store, &registration("carol")).unwrap();
    register_player(&store, &registration("dave")).unwrap(); // never plays

    play(&store, a.id, b.id, a.id);
    play(&store, a.id, c.id, a.id);
    play(&store, b.id, c.id, b.id);

    let board = leaderboard(&store, 10).unwrap();
    let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
    assert!(board.windows(2).all(|w| w[0].rating >= w[1].rating));

    deactivate_player(&store, a.id).unwrap();
    let board = leaderboard(&store, 10).unwrap();
    assert_eq!(board[0].username, "bob");

    let top1 = leaderboard(&store, 1).unwrap();
    assert_eq!(top1.len(), 1);
}

#[test]
fn list_players_paginates_in_id_order() {
    let store = Store::new();
    for i in 0..15 {
        register_player(&store, &registration(&format!("player{i}"))).unwrap();
    }
    let page1 = list_players(&store, 1, 10).unwrap();
    let page2 = list_players(&store, 2, 10).unwrap();
    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 5);
    assert_eq!(page1[0].id, 1);
    assert_eq!(page2[0].id, 11);
}
