//! Tests for ticket filtering and the resolution invariant.

use triage_shared::filter::{filter_tickets, StatusFilter};
use triage_shared::store::TicketStore;
use triage_shared::ticket::{Ticket, TicketStatus};

#[test]
fn test_empty_collection_filters_to_empty() {
    let tickets: Vec<Ticket> = Vec::new();
    assert!(filter_tickets(&tickets, "x", StatusFilter::All).is_empty());
}

#[test]
fn test_empty_term_with_all_is_identity() {
    let store = TicketStore::seeded().unwrap();
    let filtered: Vec<Ticket> = filter_tickets(store.tickets(), "", StatusFilter::All)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(filtered, store.tickets());
}

#[test]
fn test_filter_preserves_order() {
    let store = TicketStore::seeded().unwrap();
    let ids: Vec<u64> = filter_tickets(
        store.tickets(),
        "",
        StatusFilter::Only(TicketStatus::Resolved),
    )
    .iter()
    .map(|t| t.id())
    .collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[test]
fn test_search_matches_description() {
    let store = TicketStore::seeded().unwrap();
    let found = filter_tickets(store.tickets(), "SSO", StatusFilter::All);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), 1);
}

#[test]
fn test_no_match() {
    let store = TicketStore::seeded().unwrap();
    assert!(filter_tickets(store.tickets(), "kubernetes", StatusFilter::All).is_empty());
    assert!(filter_tickets(
        store.tickets(),
        "",
        StatusFilter::Only(TicketStatus::Closed)
    )
    .is_empty());
}

#[test]
fn test_fixture_resolution_invariant() {
    let store = TicketStore::seeded().unwrap();
    for ticket in store.tickets() {
        if ticket.status() != TicketStatus::Resolved {
            assert!(
                ticket.resolved_at().is_none(),
                "ticket {} has resolvedAt without being resolved",
                ticket.id()
            );
        }
    }
}
