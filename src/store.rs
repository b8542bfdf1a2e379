//! Composition root: owns the composite state, runs both reducers on every
//! dispatch and notifies subscribers.
//!
//! The store is single-threaded. A dispatch issued from inside a listener is
//! queued and applied after the current notification round completes, each
//! queued action getting its own round, so listeners never see interleaved
//! notifications.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::action::Action;
use crate::bookmark::{self, BookmarkState};
use crate::event::{CursorMove, DispatchReport, SliceChanges};
use crate::map::{self, FeatureInsert, MapViewState};

/// Immutable composite snapshot. Holding one keeps it valid across later
/// dispatches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub map: Arc<MapViewState>,
    pub bookmark: Arc<BookmarkState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Applied(DispatchReport),
    /// Issued during notification; queued behind the current round.
    Deferred,
}

impl Dispatched {
    pub fn report(&self) -> Option<&DispatchReport> {
        match self {
            Self::Applied(report) => Some(report),
            Self::Deferred => None,
        }
    }
}

/// Capability to unregister a listener, see [`Store::unsubscribe`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription leaves the listener registered for the store's lifetime"]
pub struct Subscription {
    id: u64,
}

type Listener = Box<dyn FnMut(&Store, &DispatchReport)>;

struct ListenerEntry {
    id: u64,
    listener: Listener,
}

pub struct Store {
    state: RefCell<Arc<AppState>>,
    listeners: RefCell<Vec<ListenerEntry>>,
    removed_while_notifying: RefCell<Vec<u64>>,
    in_round: RefCell<Vec<u64>>,
    pending: RefCell<VecDeque<Action>>,
    notifying: Cell<bool>,
    next_listener_id: Cell<u64>,
}

impl Store {
    pub fn new(map: MapViewState, bookmark: BookmarkState) -> Self {
        Self {
            state: RefCell::new(Arc::new(AppState {
                map: Arc::new(map),
                bookmark: Arc::new(bookmark),
            })),
            listeners: RefCell::new(Vec::new()),
            removed_while_notifying: RefCell::new(Vec::new()),
            in_round: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            notifying: Cell::new(false),
            next_listener_id: Cell::new(0),
        }
    }

    /// Current composite snapshot.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state.borrow())
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&Store, &DispatchReport) + 'static,
    {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id.saturating_add(1));
        self.listeners.borrow_mut().push(ListenerEntry {
            id,
            listener: Box::new(listener),
        });
        Subscription { id }
    }

    /// Returns `false` when no matching listener is registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(index) = listeners
            .iter()
            .position(|entry| entry.id == subscription.id)
        {
            listeners.remove(index);
            return true;
        }
        drop(listeners);

        // Listeners are detached while a round is running.
        if !self.in_round.borrow().contains(&subscription.id) {
            return false;
        }
        let mut removed = self.removed_while_notifying.borrow_mut();
        if removed.contains(&subscription.id) {
            return false;
        }
        removed.push(subscription.id);
        true
    }

    /// Registered listeners, including those detached for a running round.
    pub fn listener_count(&self) -> usize {
        let in_round = self.in_round.borrow().len();
        let removed = self.removed_while_notifying.borrow().len();
        (self.listeners.borrow().len() + in_round).saturating_sub(removed)
    }

    /// Applies `action` and notifies listeners. Features without an id get
    /// one before any reducer sees them.
    pub fn dispatch(&self, mut action: Action) -> Dispatched {
        if let Action::AddFeatures { features, .. } = &mut action {
            let assigned = map::assign_missing_ids(features);
            if assigned > 0 {
                debug!(assigned, "generated missing feature ids");
            }
        }

        if self.notifying.get() {
            debug!(action = action.kind().as_str(), "deferring nested dispatch");
            self.pending.borrow_mut().push_back(action);
            return Dispatched::Deferred;
        }

        let report = self.apply(&action);
        self.notify(&report);
        while let Some(queued) = self.next_pending() {
            let queued_report = self.apply(&queued);
            self.notify(&queued_report);
        }
        Dispatched::Applied(report)
    }

    /// Drops every listener and hands back the final snapshot.
    pub fn teardown(self) -> Arc<AppState> {
        let listeners = self.listeners.borrow().len();
        debug!(listeners, "tearing down store");
        self.state.into_inner()
    }

    fn apply(&self, action: &Action) -> DispatchReport {
        let current = self.state();
        let feature_insert = match action {
            Action::AddFeatures {
                source_id,
                features,
            } if !features.is_empty() => Some(current.map.classify_feature_target(source_id)),
            _ => None,
        };

        let map = map::reduce(&current.map, action);
        let bookmark = bookmark::reduce(&current.bookmark, action);
        let changes = SliceChanges {
            map: !Arc::ptr_eq(&map, &current.map),
            bookmark: !Arc::ptr_eq(&bookmark, &current.bookmark),
        };
        let cursor = changes.bookmark.then(|| CursorMove {
            from: current.bookmark.count(),
            to: bookmark.count(),
        });

        if changes.any() {
            *self.state.borrow_mut() = Arc::new(AppState { map, bookmark });
        }

        if let (
            Some(insert),
            Action::AddFeatures {
                source_id,
                features,
            },
        ) = (feature_insert, action)
        {
            match insert {
                FeatureInsert::CreatedImplicitly => warn!(
                    source_id = source_id.as_str(),
                    count = features.len(),
                    "features added to undeclared source; bucket created implicitly"
                ),
                FeatureInsert::AppendedUndeclared => debug!(
                    source_id = source_id.as_str(),
                    count = features.len(),
                    "features appended to undeclared source"
                ),
                FeatureInsert::Inserted => {}
            }
        }
        debug!(
            action = action.kind().as_str(),
            slice = action.slice().as_str(),
            feature_insert = feature_insert.map(FeatureInsert::as_str),
            map_changed = changes.map,
            bookmark_changed = changes.bookmark,
            "dispatched"
        );

        DispatchReport {
            kind: action.kind(),
            changes,
            cursor,
            feature_insert,
        }
    }

    fn notify(&self, report: &DispatchReport) {
        let mut round = NotifyRound::begin(self);
        for entry in round.entries.iter_mut() {
            if self.removed_while_notifying.borrow().contains(&entry.id) {
                continue;
            }
            (entry.listener)(self, report);
        }
    }

    fn next_pending(&self) -> Option<Action> {
        self.pending.borrow_mut().pop_front()
    }
}

/// Listeners detached for one notification round. Dropping it, including
/// while unwinding from a panicking listener, puts them back and reopens
/// the store for top-level dispatches.
struct NotifyRound<'a> {
    store: &'a Store,
    entries: Vec<ListenerEntry>,
}

impl<'a> NotifyRound<'a> {
    fn begin(store: &'a Store) -> Self {
        store.notifying.set(true);
        let entries = std::mem::take(&mut *store.listeners.borrow_mut());
        *store.in_round.borrow_mut() = entries.iter().map(|entry| entry.id).collect();
        Self { store, entries }
    }
}

impl Drop for NotifyRound<'_> {
    fn drop(&mut self) {
        let store = self.store;
        store.notifying.set(false);
        store.in_round.borrow_mut().clear();

        let removed = std::mem::take(&mut *store.removed_while_notifying.borrow_mut());
        let mut round = std::mem::take(&mut self.entries);
        round.retain(|entry| !removed.contains(&entry.id));
        let mut listeners = store.listeners.borrow_mut();
        round.append(&mut listeners);
        *listeners = round;

        if std::thread::panicking() {
            let dropped = store.pending.borrow_mut().drain(..).count();
            warn!(dropped, "listener panicked; queued dispatches discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    use super::{Dispatched, Store, Subscription};
    use crate::action::{Action, ActionKind};
    use crate::bookmark::{Bookmark, BookmarkState};
    use crate::map::{
        FeatureInsert, LayerDescriptor, LngLat, MapViewState, Properties, SourceDescriptor,
        feature_id, point_feature,
    };

    fn store_with_bookmarks(len: usize) -> Store {
        let bookmarks = (0..len)
            .map(|i| Bookmark::new([i as f64, i as f64], 8.0))
            .collect();
        Store::new(
            MapViewState::new(LngLat::new(0.0, 0.0), 1.0),
            BookmarkState::new(bookmarks),
        )
    }

    #[test]
    fn dispatch_runs_both_reducers_and_reports_changes() {
        let store = store_with_bookmarks(3);

        let report = store
            .dispatch(Action::set_view([-93.0, 45.0], 5.0))
            .report()
            .cloned()
            .expect("top-level dispatch should apply");
        assert_eq!(report.kind, ActionKind::SetView);
        assert!(report.changes.map);
        assert!(!report.changes.bookmark);
        assert!(report.cursor.is_none());

        let report = store
            .dispatch(Action::move_slide(2))
            .report()
            .cloned()
            .expect("top-level dispatch should apply");
        assert!(report.changes.bookmark);
        assert_eq!(report.cursor.map(|c| (c.from, c.to)), Some((0, 2)));
        assert_eq!(store.state().bookmark.count(), 2);
        assert_eq!(store.state().map.center(), LngLat::new(-93.0, 45.0));
    }

    #[test]
    fn unchanged_dispatch_keeps_snapshot_but_still_notifies() {
        let store = store_with_bookmarks(3);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let _sub = store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        let before = store.state();
        let report = store.dispatch(Action::move_slide(-1));
        assert!(matches!(report, Dispatched::Applied(ref r) if !r.changes.any()));
        assert!(Arc::ptr_eq(&before, &store.state()));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn end_to_end_osm_source_and_layer() {
        let store = store_with_bookmarks(0);
        store.dispatch(Action::set_view([-93.0, 45.0], 5.0));
        store.dispatch(Action::add_source(
            "osm",
            SourceDescriptor::raster(["https://a.tile.openstreetmap.org/{z}/{x}/{y}.png"], Some(256)),
        ));
        store.dispatch(Action::add_layer(LayerDescriptor::new("osm", "osm")));

        let state = store.state();
        assert!(state.map.source("osm").is_some());
        let osm_layers = state.map.layers().iter().filter(|l| l.id == "osm").count();
        assert_eq!(osm_layers, 1);
        assert_eq!(state.map.layers().len(), 1);
        assert_eq!(state.map.zoom(), 5.0);
    }

    #[test]
    fn feature_insert_is_tagged_by_source_declaration() {
        let store = store_with_bookmarks(0);
        let batch = || vec![point_feature(Some("p".to_string()), [0.0, 0.0], Properties::new())];

        let report = store.dispatch(Action::add_features("points", batch()));
        assert_eq!(
            report.report().and_then(|r| r.feature_insert),
            Some(FeatureInsert::CreatedImplicitly)
        );
        let report = store.dispatch(Action::add_features("points", batch()));
        assert_eq!(
            report.report().and_then(|r| r.feature_insert),
            Some(FeatureInsert::AppendedUndeclared)
        );

        store.dispatch(Action::add_source("points", SourceDescriptor::empty_geojson(Some(50))));
        let report = store.dispatch(Action::add_features("points", batch()));
        assert_eq!(
            report.report().and_then(|r| r.feature_insert),
            Some(FeatureInsert::Inserted)
        );
        assert_eq!(store.state().map.features().len("points"), 3);

        let report = store.dispatch(Action::add_features("points", Vec::new()));
        assert_eq!(report.report().and_then(|r| r.feature_insert), None);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store = store_with_bookmarks(2);
        let log = Rc::new(RefCell::new(Vec::new()));
        let _subs: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let log = Rc::clone(&log);
                store.subscribe(move |_, _| log.borrow_mut().push(name))
            })
            .collect();

        store.dispatch(Action::move_slide(1));
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let store = store_with_bookmarks(2);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let sub = store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        store.dispatch(Action::move_slide(1));
        assert!(store.unsubscribe(sub));
        store.dispatch(Action::move_slide(0));

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn nested_dispatch_is_deferred_until_round_completes() {
        let store = store_with_bookmarks(5);
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        let _a = store.subscribe(move |store, report| {
            let count = store.state().bookmark.count();
            first.borrow_mut().push(format!("a:{count}"));
            if report.kind == ActionKind::MoveSlide && count == 1 {
                let nested = store.dispatch(Action::move_slide(count as i64 + 1));
                assert_eq!(nested, Dispatched::Deferred);
            }
        });
        let second = Rc::clone(&log);
        let _b = store.subscribe(move |store, _| {
            second
                .borrow_mut()
                .push(format!("b:{}", store.state().bookmark.count()));
        });

        let outer = store.dispatch(Action::move_slide(1));
        assert!(matches!(outer, Dispatched::Applied(_)));
        assert_eq!(*log.borrow(), ["a:1", "b:1", "a:2", "b:2"]);
        assert_eq!(store.state().bookmark.count(), 2);
    }

    #[test]
    fn listener_may_unsubscribe_and_subscribe_during_notification() {
        let store = store_with_bookmarks(3);
        let log = Rc::new(RefCell::new(Vec::new()));
        let pending_sub = Rc::new(RefCell::new(None));

        let late_log = Rc::clone(&log);
        let slot = Rc::clone(&pending_sub);
        let _a = store.subscribe(move |store, _| {
            if let Some(sub) = slot.borrow_mut().take() {
                assert!(store.unsubscribe(sub));
                let late_log = Rc::clone(&late_log);
                let _late = store.subscribe(move |_, _| late_log.borrow_mut().push("late"));
            }
        });
        let b_log = Rc::clone(&log);
        let b = store.subscribe(move |_, _| b_log.borrow_mut().push("b"));
        *pending_sub.borrow_mut() = Some(b);

        store.dispatch(Action::move_slide(1));
        assert!(log.borrow().is_empty());
        assert_eq!(store.listener_count(), 2);

        store.dispatch(Action::move_slide(2));
        assert_eq!(*log.borrow(), ["late"]);
    }

    #[test]
    fn teardown_returns_final_snapshot_and_prior_snapshots_stay_valid() {
        let store = store_with_bookmarks(3);
        let first = store.state();
        store.dispatch(Action::move_slide(2));
        let _sub = store.subscribe(|_, _| {});

        let last = store.teardown();
        assert_eq!(first.bookmark.count(), 0);
        assert_eq!(last.bookmark.count(), 2);
    }

    #[test]
    fn id_less_features_get_ids_before_reduction() {
        let store = store_with_bookmarks(0);
        let mut titled = Properties::new();
        titled.insert("id".to_string(), serde_json::json!("from-props"));
        let parsed: Action = serde_json::from_value(serde_json::json!({
            "type": "ADD_FEATURES",
            "sourceId": "points",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "MultiPoint", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
                    "properties": { "title": "Pair" }
                }
            ]
        }))
        .expect("id-less feature payload should deserialize");

        store.dispatch(parsed);
        store.dispatch(Action::add_features(
            "points",
            vec![point_feature(None, [2.0, 2.0], titled)],
        ));

        let state = store.state();
        let ids: Vec<String> = state
            .map
            .features()
            .bucket("points")
            .iter()
            .filter_map(feature_id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(uuid::Uuid::parse_str(&ids[0]).is_ok());
        assert_eq!(ids[1], "from-props");
    }

    #[test]
    fn listener_count_is_stable_inside_a_round() {
        let store = store_with_bookmarks(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = Rc::clone(&seen);
        let _a = store.subscribe(move |store, _| first.borrow_mut().push(store.listener_count()));
        let second = Rc::clone(&seen);
        let b = store.subscribe(move |store, _| second.borrow_mut().push(store.listener_count()));

        store.dispatch(Action::move_slide(1));
        assert_eq!(*seen.borrow(), [2, 2]);
        assert_eq!(store.listener_count(), 2);

        assert!(store.unsubscribe(b));
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn unsubscribing_twice_inside_a_round_reports_false() {
        let store = store_with_bookmarks(3);
        let target = Rc::new(RefCell::new(None::<Subscription>));
        let results = Rc::new(RefCell::new(Vec::new()));

        let slot = Rc::clone(&target);
        let sink = Rc::clone(&results);
        let _a = store.subscribe(move |store, _| {
            if let Some(sub) = slot.borrow_mut().take() {
                let repeat = Subscription { id: sub.id };
                let first = store.unsubscribe(sub);
                let second = store.unsubscribe(repeat);
                sink.borrow_mut().push((first, second, store.listener_count()));
            }
        });
        let b = store.subscribe(|_, _| {});
        *target.borrow_mut() = Some(b);

        store.dispatch(Action::move_slide(1));
        assert_eq!(*results.borrow(), [(true, false, 1)]);
        assert_eq!(store.listener_count(), 1);
    }

    #[test]
    fn panicking_listener_does_not_wedge_the_store() {
        let store = store_with_bookmarks(3);
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let _steady = store.subscribe(move |_, _| *counter.borrow_mut() += 1);
        let _faulty = store.subscribe(|store, report| {
            if report.kind == ActionKind::MoveSlide && store.state().bookmark.count() == 1 {
                store.dispatch(Action::move_slide(0));
                panic!("listener failure");
            }
        });

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            store.dispatch(Action::move_slide(1))
        }));
        assert!(outcome.is_err());
        assert_eq!(store.listener_count(), 2);

        let next = store.dispatch(Action::move_slide(2));
        assert!(matches!(next, Dispatched::Applied(_)));
        assert_eq!(store.state().bookmark.count(), 2);
        assert_eq!(*calls.borrow(), 2);
    }
}
