/// Integration tests for tick-driven entity lifetimes: scheduled unspawns
/// drain on the authority's tick and flow through the normal announce path

use tether_server::{Server, ServerConfig, TickEvent};
use tether_shared::{CharacterId, EntityKind, Transform};
use tether_test::{exchange, join_client, start_server};

fn projectile(server: &Server) -> EntityKind {
    server.entity_kind("projectile").unwrap()
}

fn bare_server() -> Server {
    Server::new(
        ServerConfig {
            require_join_approval: false,
            joining_open: true,
        },
        tether_test::protocol(),
    )
}

#[test]
fn lifetime_expires_exactly_on_its_deadline_tick() {
    let mut server = bare_server();
    let kind = projectile(&server);

    let handle = server
        .spawn_with_lifetime(&kind, Transform::default(), 3)
        .unwrap();

    server.tick();
    server.tick();
    assert!(server.is_spawned(&handle));

    server.tick();
    assert!(!server.is_spawned(&handle));
}

#[test]
fn cancelled_lifetime_keeps_the_entity_spawned() {
    let mut server = bare_server();
    let kind = projectile(&server);

    let handle = server
        .spawn_with_lifetime(&kind, Transform::default(), 2)
        .unwrap();
    assert!(server.cancel_lifetime(&handle));
    // a second cancel has nothing left to remove
    assert!(!server.cancel_lifetime(&handle));

    for _ in 0..5 {
        server.tick();
    }
    assert!(server.is_spawned(&handle));
}

#[test]
fn explicit_unspawn_cancels_the_pending_lifetime() {
    let mut server = bare_server();
    let kind = projectile(&server);

    let first = server
        .spawn_with_lifetime(&kind, Transform::default(), 2)
        .unwrap();
    server.unspawn(&first);

    // the slot is reacquired before the old deadline passes; the stale
    // timer must not unspawn the new occupant
    let second = server.spawn(&kind, Transform::default()).unwrap();
    assert_eq!(second, first);

    for _ in 0..5 {
        server.tick();
    }
    assert!(server.is_spawned(&second));
}

#[test]
fn expiry_announces_the_unspawn_to_clients() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    let kind = projectile(&server);
    let handle = server
        .spawn_with_lifetime(&kind, Transform::default(), 1)
        .unwrap();
    exchange(&mut server, &mut [&mut client]);
    assert!(client.is_spawned(&handle));

    server.tick();
    exchange(&mut server, &mut [&mut client]);
    assert!(!client.is_spawned(&handle));
}

#[test]
fn each_tick_surfaces_a_tick_event() {
    let mut server = bare_server();

    server.tick();
    server.tick();
    let mut events = server.receive();

    let ticks: Vec<_> = events.read::<TickEvent>().collect();
    assert_eq!(ticks, vec![1, 2]);
    assert_eq!(server.current_tick(), 2);
}
