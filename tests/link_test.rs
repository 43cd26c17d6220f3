mod helpers;

use helpers::{remember, service};
use mnemos::link::{entity_for_memory, link_memory, memories_for_entity};
use mnemos::workspace::Workspace;

#[test]
fn memories_and_entities_resolve_both_ways() {
    let mut ws = Workspace::default();
    let api = service(&mut ws.graph, "api");
    service(&mut ws.graph, "db");
    let a = remember(&mut ws.memory, "api p99 regression", Some("ops"), &["latency"], 0.8);
    let b = remember(&mut ws.memory, "api rollback", Some("ops"), &["latency"], 0.6);
    let c = remember(&mut ws.memory, "db vacuum", Some("ops"), &[], 0.4);

    link_memory(&mut ws.memory, &a.id, Some("api")).unwrap();
    link_memory(&mut ws.memory, &b.id, Some("api")).unwrap();
    link_memory(&mut ws.memory, &c.id, Some("db")).unwrap();

    let linked: Vec<_> = memories_for_entity(&ws.memory, "api")
        .into_iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(linked, vec![a.id.clone(), b.id.clone()]);
    assert_eq!(entity_for_memory(&ws.memory, &ws.graph, &a.id), Some(&api));

    // Linking does not disturb similarity links or access counters.
    let a_now = ws.memory.get(&a.id).unwrap();
    assert_eq!(a_now.related_memories, vec![b.id.clone()]);
    assert_eq!(a_now.access_count, 0);
}

#[test]
fn links_do_not_cascade() {
    let mut ws = Workspace::default();
    service(&mut ws.graph, "api");
    let a = remember(&mut ws.memory, "note", None, &[], 0.5);
    link_memory(&mut ws.memory, &a.id, Some("api")).unwrap();

    ws.memory.delete(&a.id);
    assert!(ws.graph.get_entity("api").is_some());
    assert!(memories_for_entity(&ws.memory, "api").is_empty());

    let b = remember(&mut ws.memory, "note", None, &[], 0.5);
    link_memory(&mut ws.memory, &b.id, Some("api")).unwrap();
    ws.graph.clear();
    assert!(entity_for_memory(&ws.memory, &ws.graph, &b.id).is_none());
    assert_eq!(memories_for_entity(&ws.memory, "api").len(), 1);
}
