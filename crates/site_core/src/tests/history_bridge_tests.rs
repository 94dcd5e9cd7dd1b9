use super::*;
use crate::{
    adapters::MemoryHistory,
    navigator::{PageKind, ViewState},
};

fn bridge(initial: &str) -> (HistoryBridge, Arc<MemoryHistory>) {
    let history = MemoryHistory::new(initial);
    (HistoryBridge::new(history.clone()), history)
}

#[test]
fn user_navigation_pushes_one_entry_per_call() {
    let (mut bridge, history) = bridge("/");
    let mut navigator = Navigator::new();
    let paths = ["/insights", "/media", "/media", "/nowhere", "/terms"];

    let mut views = Vec::new();
    for path in paths {
        views.push(
            bridge
                .navigate_to(&mut navigator, path, NavigateOptions::default())
                .clone(),
        );
    }

    assert_eq!(history.len(), paths.len() + 1);
    assert_eq!(&history.entries()[1..], &paths[..]);

    // Replaying the recorded addresses reproduces the same views without
    // growing the stack.
    let mut replayed = Navigator::new();
    for (address, expected) in history.entries()[1..].iter().zip(&views) {
        let view = bridge.navigate_to(&mut replayed, address, NavigateOptions::REPLAY);
        assert_eq!(view, expected);
    }
    assert_eq!(history.len(), paths.len() + 1);
}

#[test]
fn initial_root_address_is_not_replayed() {
    let (mut bridge, history) = bridge("/");
    let mut navigator = Navigator::new();
    assert!(bridge.replay_initial(&mut navigator).is_none());
    assert_eq!(history.len(), 1);
}

#[test]
fn deep_link_is_replayed_without_history_entry() {
    let (mut bridge, history) = bridge("/insights");
    let mut navigator = Navigator::new();
    let view = bridge.replay_initial(&mut navigator).cloned();
    assert_eq!(view, Some(ViewState::ArticleList));
    assert_eq!(history.entries(), vec!["/insights".to_string()]);
}

#[test]
fn absolute_addresses_are_reduced_to_their_path() {
    let (mut bridge, _history) = bridge("https://studio.example/media?utm_source=mail#top");
    let mut navigator = Navigator::new();
    let view = bridge.replay_initial(&mut navigator).map(ViewState::kind);
    assert_eq!(view, Some(PageKind::MediaGallery));
}

#[test]
fn return_to_skips_push_when_address_already_matches() {
    let (mut bridge, history) = bridge("/");
    let mut navigator = Navigator::new();
    bridge.navigate_to(&mut navigator, "/insights", NavigateOptions::default());
    assert_eq!(history.len(), 2);

    bridge.return_to(&mut navigator, CanonicalPath::Insights);
    assert_eq!(history.len(), 2);
    assert_eq!(navigator.view(), &ViewState::ArticleList);

    bridge.return_to(&mut navigator, CanonicalPath::Root);
    assert_eq!(history.len(), 3);
    assert_eq!(history.current_address(), "/");
    assert_eq!(navigator.view(), &ViewState::Home);
}

#[test]
fn address_path_strips_query_and_fragment() {
    assert_eq!(address_path("/insights"), "/insights");
    assert_eq!(address_path("/insights?page=2"), "/insights");
    assert_eq!(address_path("/terms#section-4"), "/terms");
    assert_eq!(address_path("https://studio.example/privacy"), "/privacy");
    assert_eq!(address_path(""), "/");
    assert_eq!(address_path("  /media  "), "/media");
}

#[test]
fn navigation_event_maps_to_options() {
    assert!(!NavigationEvent::user("/media").options().skip_history);
    assert_eq!(
        NavigationEvent::replay("/media").options(),
        NavigateOptions::REPLAY
    );
}
