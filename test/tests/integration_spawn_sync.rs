/// Integration tests for pooled entity spawning across a session: authority
/// application, request forwarding, exhaustion, and mirror consistency

use tether_server::{Server, ServerConfig, SpawnEvent, UnspawnEvent};
use tether_shared::{CharacterId, EntityKind, PoolConfig, Protocol, Transform};
use tether_test::{exchange, join_client, start_server};

fn enemy(server: &Server) -> EntityKind {
    // registered by the party plugin in the shared test protocol
    server.entity_kind("enemy").unwrap()
}

#[test]
fn server_spawn_reaches_every_mirror() {
    let (mut server, channel) = start_server();
    let mut client_a = join_client(&channel, 10001, CharacterId(1));
    let mut client_b = join_client(&channel, 10002, CharacterId(2));
    exchange(&mut server, &mut [&mut client_a, &mut client_b]);

    let kind = enemy(&server);
    let transform = Transform::from_position(4.0, 0.0, -2.0);
    let handle = server.spawn(&kind, transform).unwrap();
    exchange(&mut server, &mut [&mut client_a, &mut client_b]);

    assert!(server.is_spawned(&handle));
    assert!(client_a.is_spawned(&handle));
    assert!(client_b.is_spawned(&handle));
    assert_eq!(client_a.entity_transform(&handle), Some(transform));
}

#[test]
fn client_request_spawns_nothing_until_the_announce_returns() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    let kind = client.entity_kind("pickup").unwrap();
    client.request_spawn(&kind, Transform::from_position(1.0, 1.0, 1.0));

    // nothing anywhere yet
    assert_eq!(client.entities().len(), 0);
    assert_eq!(server.entities().len(), 0);

    // the authority applies and announces
    let (mut server_events, _) = exchange(&mut server, &mut [&mut client]);
    let spawned: Vec<_> = server_events.read::<SpawnEvent>().collect();
    assert_eq!(spawned.len(), 1);
    assert_eq!(client.active_count(&kind), 1);
    assert!(client.is_spawned(&spawned[0]));
}

#[test]
fn exhausted_pool_surfaces_as_a_noop_spawn() {
    let mut protocol = Protocol::builder();
    protocol.add_entity_kind("drone", PoolConfig::new(1, 1));
    let mut server = Server::new(
        ServerConfig {
            require_join_approval: false,
            joining_open: true,
        },
        protocol,
    );

    let kind = server.entity_kind("drone").unwrap();
    let first = server.spawn(&kind, Transform::default());
    assert!(first.is_some());

    let second = server.spawn(&kind, Transform::default());
    assert!(second.is_none());
    assert_eq!(server.active_count(&kind), 1);
}

#[test]
fn capacity_two_pool_exhausts_then_reuses_the_released_handle() {
    let mut protocol = Protocol::builder();
    protocol.add_entity_kind("enemy", PoolConfig::new(2, 2));
    let mut server = Server::new(
        ServerConfig {
            require_join_approval: false,
            joining_open: true,
        },
        protocol,
    );
    let kind = server.entity_kind("enemy").unwrap();

    let h0 = server.spawn(&kind, Transform::default()).unwrap();
    let h1 = server.spawn(&kind, Transform::default()).unwrap();
    assert_ne!(h0, h1);
    assert!(server.spawn(&kind, Transform::default()).is_none());

    server.unspawn(&h0);
    let reused = server.spawn(&kind, Transform::default()).unwrap();
    assert_eq!(reused, h0);
}

#[test]
fn unspawn_round_trips_through_every_mirror() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    let kind = enemy(&server);
    let handle = server.spawn(&kind, Transform::default()).unwrap();
    exchange(&mut server, &mut [&mut client]);
    assert!(client.is_spawned(&handle));

    client.request_unspawn(&handle);
    let (mut server_events, _) = exchange(&mut server, &mut [&mut client]);

    let unspawned: Vec<_> = server_events.read::<UnspawnEvent>().collect();
    assert_eq!(unspawned, vec![handle]);
    assert!(!server.is_spawned(&handle));
    assert!(!client.is_spawned(&handle));
}

#[test]
fn unspawn_of_inactive_handle_is_ignored() {
    let (mut server, channel) = start_server();
    let mut client = join_client(&channel, 10001, CharacterId(1));
    exchange(&mut server, &mut [&mut client]);

    let kind = enemy(&server);
    let handle = server.spawn(&kind, Transform::default()).unwrap();
    server.unspawn(&handle);

    // double unspawn: only the first produces an announce and an event
    server.unspawn(&handle);
    let (mut server_events, mut client_events) = exchange(&mut server, &mut [&mut client]);

    let unspawns: Vec<_> = server_events.read::<UnspawnEvent>().collect();
    assert_eq!(unspawns, vec![handle]);
    let client_unspawns: Vec<_> = client_events[0]
        .read::<tether_client::UnspawnEvent>()
        .collect();
    assert_eq!(client_unspawns, vec![handle]);
}

#[test]
fn late_joiner_receives_entities_spawned_before_it_joined() {
    let (mut server, channel) = start_server();

    let kind = enemy(&server);
    let transform = Transform::from_position(0.0, 3.0, 0.0);
    let handle = server.spawn(&kind, transform).unwrap();

    let mut late = join_client(&channel, 10005, CharacterId(4));
    exchange(&mut server, &mut [&mut late]);

    assert!(late.is_spawned(&handle));
    assert_eq!(late.entity_transform(&handle), Some(transform));
}
