//! Change notification channels for the shuttling graph.
//!
//! Two lightweight observable channels: `graph_changed` (no payload, fired on
//! structural mutations) and `position_changed` (line plus optional node
//! name, fired when the tracked position actually changes).
//!
//! Mutators buffer their events and deliver them only after every derived
//! structure is committed, so a subscriber never observes a half-updated
//! graph; failed mutations deliver nothing. Callbacks run on the mutating
//! thread and must not re-enter a mutator on the same graph.

/// Identifier returned by the subscribe methods, used to detach a callback.
pub type SubscriberId = u64;

type GraphChangedFn = Box<dyn FnMut()>;
type PositionChangedFn = Box<dyn FnMut(f64, Option<&str>)>;

/// Notification buffered during a mutation, delivered on commit.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum GraphEvent {
    GraphChanged,
    PositionChanged { line: f64, name: Option<String> },
}

/// Registry of change subscribers for one [`ShuttlingGraph`](crate::ShuttlingGraph).
///
/// Delivery is FIFO per channel within a single mutation; there is no
/// cross-channel ordering guarantee.
#[derive(Default)]
pub struct ChangeObservables {
    next_id: SubscriberId,
    graph_changed: Vec<(SubscriberId, GraphChangedFn)>,
    position_changed: Vec<(SubscriberId, PositionChangedFn)>,
}

impl ChangeObservables {
    /// Attaches a callback to the `graph_changed` channel.
    pub fn on_graph_changed(&mut self, callback: impl FnMut() + 'static) -> SubscriberId {
        let id = self.bump_id();
        self.graph_changed.push((id, Box::new(callback)));
        id
    }

    /// Attaches a callback to the `position_changed` channel.
    pub fn on_position_changed(
        &mut self,
        callback: impl FnMut(f64, Option<&str>) + 'static,
    ) -> SubscriberId {
        let id = self.bump_id();
        self.position_changed.push((id, Box::new(callback)));
        id
    }

    /// Detaches a previously attached callback. Returns `false` if the id is
    /// unknown (already detached).
    pub fn detach(&mut self, id: SubscriberId) -> bool {
        let before = self.graph_changed.len() + self.position_changed.len();
        self.graph_changed.retain(|(sub, _)| *sub != id);
        self.position_changed.retain(|(sub, _)| *sub != id);
        before != self.graph_changed.len() + self.position_changed.len()
    }

    /// Delivers a batch of committed events to all subscribers.
    pub(crate) fn dispatch(&mut self, events: &[GraphEvent]) {
        for event in events {
            match event {
                GraphEvent::GraphChanged => {
                    for (_, callback) in &mut self.graph_changed {
                        callback();
                    }
                }
                GraphEvent::PositionChanged { line, name } => {
                    for (_, callback) in &mut self.position_changed {
                        callback(*line, name.as_deref());
                    }
                }
            }
        }
    }

    fn bump_id(&mut self) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_the_right_channel() {
        let graph_hits = Rc::new(RefCell::new(0));
        let position_hits = Rc::new(RefCell::new(Vec::new()));

        let mut observables = ChangeObservables::default();
        let hits = Rc::clone(&graph_hits);
        observables.on_graph_changed(move || *hits.borrow_mut() += 1);
        let hits = Rc::clone(&position_hits);
        observables.on_position_changed(move |line, name| {
            hits.borrow_mut().push((line, name.map(str::to_owned)));
        });

        observables.dispatch(&[
            GraphEvent::GraphChanged,
            GraphEvent::PositionChanged {
                line: 1.5,
                name: Some("A".into()),
            },
        ]);

        assert_eq!(*graph_hits.borrow(), 1);
        assert_eq!(
            *position_hits.borrow(),
            vec![(1.5, Some(String::from("A")))]
        );
    }

    #[test]
    fn detached_subscribers_stop_receiving() {
        let hits = Rc::new(RefCell::new(0));
        let mut observables = ChangeObservables::default();
        let counter = Rc::clone(&hits);
        let id = observables.on_graph_changed(move || *counter.borrow_mut() += 1);

        observables.dispatch(&[GraphEvent::GraphChanged]);
        assert!(observables.detach(id));
        assert!(!observables.detach(id));
        observables.dispatch(&[GraphEvent::GraphChanged]);

        assert_eq!(*hits.borrow(), 1);
    }
}
