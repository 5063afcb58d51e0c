// Copyright 2026 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The pointer dispatcher.
//!
//! [`Mouse`] turns a serialized stream of raw platform events into callbacks
//! on layers. For every event it:
//!
//! 1. Returns `false` immediately if the dispatcher is disabled.
//! 2. Hands the raw event to the global [`MouseListener`], if one is set.
//! 3. Hit-tests the root layer (button-down and motion only) to find the
//!    deepest interactive layer under the pointer.
//! 4. Localizes the event to each target layer and invokes that layer's
//!    listeners for the matching [`Capability`].
//! 5. Returns the final prevent-default flag to the caller.
//!
//! Two pieces of session state drive the higher-level semantics:
//!
//! - The **active layer** is the layer hit by the last button-down. It
//!   receives drag events while the button is held and the button-up that
//!   ends the gesture. Button-up always clears it.
//! - The **hover layer** is the layer under the pointer as of the last motion
//!   event. Changes produce an "out" on the old layer followed by an "over"
//!   on the new one.
//!
//! Session state holds [`LayerId`] handles, which never keep a layer alive. A
//! handle whose layer has been destroyed is skipped.
//!
//! # Prevent default
//!
//! Each handler threads a running flag through its steps. The global listener
//! seeds it; each layer dispatch seeds its localized event with the running
//! value and folds the result back, so the last dispatch wins. Wheel events
//! are the exception: they are not localized, and the handler returns the
//! raw event's own flag.

use alloc::boxed::Box;
use core::fmt;
use core::mem;

use kurbo::Point;

use crate::backend::{PointerLock, Unsupported};
use crate::event::{ButtonEvent, MotionEvent, WheelEvent};
use crate::layer::{Capability, LayerId, LayerStore, Listener};
use crate::trace::{
    DispatchSummary, HitTestEvent, InputEvent, InputKind, LayerDispatchEvent, SessionEvent,
    SessionSlot, Tracer,
};

/// Receives every raw event before layer dispatch.
///
/// All methods default to no-ops. Events arrive in device coordinates and are
/// never localized. Setting prevent-default here seeds the flag that layer
/// listeners see.
pub trait MouseListener {
    /// A button was pressed.
    fn on_mouse_down(&mut self, event: &mut ButtonEvent) {
        _ = event;
    }

    /// A button was released.
    fn on_mouse_up(&mut self, event: &mut ButtonEvent) {
        _ = event;
    }

    /// The pointer moved.
    fn on_mouse_move(&mut self, event: &mut MotionEvent) {
        _ = event;
    }

    /// The wheel scrolled.
    fn on_mouse_wheel_scroll(&mut self, event: &mut WheelEvent) {
        _ = event;
    }
}

/// Pointer dispatcher for one layer tree.
///
/// `P` supplies pointer capture; see [`PointerLock`]. A new dispatcher is
/// enabled, has no global listener, and has no active or hover layer.
pub struct Mouse<P = Unsupported> {
    root: LayerId,
    enabled: bool,
    listener: Option<Box<dyn MouseListener>>,
    pointer_lock: P,
    active_layer: Option<LayerId>,
    hover_layer: Option<LayerId>,
}

impl<P: fmt::Debug> fmt::Debug for Mouse<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mouse")
            .field("root", &self.root)
            .field("enabled", &self.enabled)
            .field("listener", &self.listener.is_some())
            .field("pointer_lock", &self.pointer_lock)
            .field("active_layer", &self.active_layer)
            .field("hover_layer", &self.hover_layer)
            .finish()
    }
}

impl Mouse {
    /// Creates a dispatcher that hit-tests from `root`, without pointer lock
    /// support.
    #[must_use]
    pub fn new(root: LayerId) -> Self {
        Self::with_pointer_lock(root, Unsupported)
    }

    /// Creates a dispatcher with a global listener already installed.
    #[must_use]
    pub fn with_listener(root: LayerId, listener: Box<dyn MouseListener>) -> Self {
        let mut mouse = Self::new(root);
        mouse.listener = Some(listener);
        mouse
    }
}

impl<P: PointerLock> Mouse<P> {
    /// Creates a dispatcher whose pointer-lock calls go to `pointer_lock`.
    #[must_use]
    pub fn with_pointer_lock(root: LayerId, pointer_lock: P) -> Self {
        Self {
            root,
            enabled: true,
            listener: None,
            pointer_lock,
            active_layer: None,
            hover_layer: None,
        }
    }

    // -- Configuration --

    /// Always `true`: this dispatcher exists only where a mouse does.
    #[must_use]
    pub fn has_mouse(&self) -> bool {
        true
    }

    /// Returns whether the handlers dispatch anything.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables dispatch. While disabled every handler returns
    /// `false` and leaves session state untouched.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Installs (or with `None`, removes) the global listener and returns the
    /// previous one.
    pub fn set_listener(
        &mut self,
        listener: Option<Box<dyn MouseListener>>,
    ) -> Option<Box<dyn MouseListener>> {
        mem::replace(&mut self.listener, listener)
    }

    /// Returns the layer hit testing starts from.
    #[must_use]
    pub fn root(&self) -> LayerId {
        self.root
    }

    /// Replaces the root layer. The active and hover layers are kept.
    pub fn set_root(&mut self, root: LayerId) {
        self.root = root;
    }

    /// The layer pressed by the current button gesture, if any.
    #[must_use]
    pub fn active_layer(&self) -> Option<LayerId> {
        self.active_layer
    }

    /// The layer under the pointer as of the last motion event, if any.
    #[must_use]
    pub fn hover_layer(&self) -> Option<LayerId> {
        self.hover_layer
    }

    // -- Pointer lock --

    /// Requests pointer capture from the backend.
    pub fn lock(&mut self) {
        self.pointer_lock.lock();
    }

    /// Releases pointer capture.
    pub fn unlock(&mut self) {
        self.pointer_lock.unlock();
    }

    /// Returns whether the pointer is captured.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.pointer_lock.is_locked()
    }

    /// Returns whether the backend can capture the pointer.
    #[must_use]
    pub fn is_lock_supported(&self) -> bool {
        self.pointer_lock.is_lock_supported()
    }

    /// Returns the pointer-lock implementation.
    #[must_use]
    pub fn pointer_lock(&self) -> &P {
        &self.pointer_lock
    }

    /// Returns the pointer-lock implementation mutably.
    pub fn pointer_lock_mut(&mut self) -> &mut P {
        &mut self.pointer_lock
    }

    // -- Handlers --

    /// Handles a button press. Returns whether the platform's default
    /// handling should be suppressed.
    pub fn on_mouse_down(&mut self, store: &mut LayerStore, event: &mut ButtonEvent) -> bool {
        self.on_mouse_down_traced(store, event, &mut Tracer::none())
    }

    /// Handles a button release.
    pub fn on_mouse_up(&mut self, store: &mut LayerStore, event: &mut ButtonEvent) -> bool {
        self.on_mouse_up_traced(store, event, &mut Tracer::none())
    }

    /// Handles pointer motion.
    pub fn on_mouse_move(&mut self, store: &mut LayerStore, event: &mut MotionEvent) -> bool {
        self.on_mouse_move_traced(store, event, &mut Tracer::none())
    }

    /// Handles a wheel scroll.
    pub fn on_mouse_wheel_scroll(
        &mut self,
        store: &mut LayerStore,
        event: &mut WheelEvent,
    ) -> bool {
        self.on_mouse_wheel_scroll_traced(store, event, &mut Tracer::none())
    }

    /// [`on_mouse_down`](Self::on_mouse_down) with trace output.
    pub fn on_mouse_down_traced(
        &mut self,
        store: &mut LayerStore,
        event: &mut ButtonEvent,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut pass = Pass::begin(tracer, InputKind::MouseDown, event.time(), event.position());

        let mut prevent_default = false;
        if let Some(listener) = &mut self.listener {
            event.set_prevent_default(false);
            listener.on_mouse_down(event);
            prevent_default = event.prevent_default();
        }

        if self.root_interactive(store) {
            let hit = pass.hit_test(store, self.root, event.position());
            self.set_active(hit, &mut pass);
            if let Some(layer) = hit {
                prevent_default =
                    pass.dispatch(store, layer, Capability::MouseDown, event, prevent_default);
            }
        }

        pass.finish(prevent_default)
    }

    /// [`on_mouse_up`](Self::on_mouse_up) with trace output.
    pub fn on_mouse_up_traced(
        &mut self,
        store: &mut LayerStore,
        event: &mut ButtonEvent,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut pass = Pass::begin(tracer, InputKind::MouseUp, event.time(), event.position());

        let mut prevent_default = false;
        if let Some(listener) = &mut self.listener {
            event.set_prevent_default(false);
            listener.on_mouse_up(event);
            prevent_default = event.prevent_default();
        }

        if let Some(active) = self.active_layer {
            prevent_default =
                pass.dispatch(store, active, Capability::MouseUp, event, prevent_default);
            self.set_active(None, &mut pass);
        }

        pass.finish(prevent_default)
    }

    /// [`on_mouse_move`](Self::on_mouse_move) with trace output.
    pub fn on_mouse_move_traced(
        &mut self,
        store: &mut LayerStore,
        event: &mut MotionEvent,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut pass = Pass::begin(tracer, InputKind::MouseMove, event.time(), event.position());

        let mut prevent_default = false;
        if let Some(listener) = &mut self.listener {
            event.set_prevent_default(false);
            listener.on_mouse_move(event);
            prevent_default = event.prevent_default();
        }

        if self.root_interactive(store) {
            let last_hover = self.hover_layer;
            let hover = pass.hit_test(store, self.root, event.position());
            self.set_hover(hover, &mut pass);

            // A held button turns motion into a drag on the pressed layer.
            if let Some(active) = self.active_layer {
                prevent_default =
                    pass.dispatch(store, active, Capability::MouseDrag, event, prevent_default);
            } else if let Some(layer) = hover {
                prevent_default =
                    pass.dispatch(store, layer, Capability::MouseMove, event, prevent_default);
            }

            if let Some(layer) = last_hover.filter(|&l| Some(l) != hover) {
                prevent_default =
                    pass.dispatch(store, layer, Capability::MouseOut, event, prevent_default);
            }
            if let Some(layer) = hover.filter(|&l| Some(l) != last_hover) {
                prevent_default =
                    pass.dispatch(store, layer, Capability::MouseOver, event, prevent_default);
            }
        }

        pass.finish(prevent_default)
    }

    /// [`on_mouse_wheel_scroll`](Self::on_mouse_wheel_scroll) with trace
    /// output.
    pub fn on_mouse_wheel_scroll_traced(
        &mut self,
        store: &mut LayerStore,
        event: &mut WheelEvent,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.enabled {
            return false;
        }
        let mut pass = Pass::begin(tracer, InputKind::MouseWheel, event.time(), event.position());

        event.set_prevent_default(false);
        if let Some(listener) = &mut self.listener {
            listener.on_mouse_wheel_scroll(event);
        }

        if let Some(target) = self.active_layer.or(self.hover_layer) {
            pass.dispatch_wheel(store, target, event);
        }

        pass.finish(event.prevent_default())
    }

    // -- Internal helpers --

    fn root_interactive(&self, store: &LayerStore) -> bool {
        store.is_alive(self.root) && store.interactive(self.root)
    }

    fn set_active(&mut self, layer: Option<LayerId>, pass: &mut Pass<'_, '_>) {
        if self.active_layer != layer {
            pass.session(SessionSlot::Active, self.active_layer, layer);
            self.active_layer = layer;
        }
    }

    fn set_hover(&mut self, layer: Option<LayerId>, pass: &mut Pass<'_, '_>) {
        if self.hover_layer != layer {
            pass.session(SessionSlot::Hover, self.hover_layer, layer);
            self.hover_layer = layer;
        }
    }
}

/// Events that are localized before reaching layer listeners.
trait Localized: Sized {
    fn localized(&self, store: &LayerStore, layer: LayerId) -> Self;
    fn deliver(&mut self, listener: &Listener, store: &mut LayerStore) -> bool;
    fn flag(&self) -> bool;
    fn seed(&mut self, prevent_default: bool);
}

impl Localized for ButtonEvent {
    fn localized(&self, store: &LayerStore, layer: LayerId) -> Self {
        self.localize(store, layer)
    }

    fn deliver(&mut self, listener: &Listener, store: &mut LayerStore) -> bool {
        listener.call_button(store, self)
    }

    fn flag(&self) -> bool {
        self.prevent_default()
    }

    fn seed(&mut self, prevent_default: bool) {
        self.set_prevent_default(prevent_default);
    }
}

impl Localized for MotionEvent {
    fn localized(&self, store: &LayerStore, layer: LayerId) -> Self {
        self.localize(store, layer)
    }

    fn deliver(&mut self, listener: &Listener, store: &mut LayerStore) -> bool {
        listener.call_motion(store, self)
    }

    fn flag(&self) -> bool {
        self.prevent_default()
    }

    fn seed(&mut self, prevent_default: bool) {
        self.set_prevent_default(prevent_default);
    }
}

/// Bookkeeping for one handler invocation.
struct Pass<'t, 'a> {
    tracer: &'t mut Tracer<'a>,
    kind: InputKind,
    time: f64,
    layer_dispatches: u32,
}

impl<'t, 'a> Pass<'t, 'a> {
    fn begin(tracer: &'t mut Tracer<'a>, kind: InputKind, time: f64, position: Point) -> Self {
        tracer.input(&InputEvent {
            time,
            kind,
            position,
        });
        Self {
            tracer,
            kind,
            time,
            layer_dispatches: 0,
        }
    }

    /// Converts `position` into `root`'s space and hit-tests from there.
    fn hit_test(&mut self, store: &LayerStore, root: LayerId, position: Point) -> Option<LayerId> {
        let root_point = store.parent_to_layer(root, position);
        let hit = root_point.and_then(|p| store.hit_test(root, p));
        self.tracer.hit_test(&HitTestEvent {
            time: self.time,
            root_point,
            hit,
        });
        hit
    }

    /// Localizes `event` to `layer`, runs the layer's listeners for
    /// `capability`, and returns the resulting flag.
    fn dispatch<E: Localized>(
        &mut self,
        store: &mut LayerStore,
        layer: LayerId,
        capability: Capability,
        event: &E,
        prevent_default: bool,
    ) -> bool {
        if !store.is_alive(layer) {
            return prevent_default;
        }
        let mut local = event.localized(store, layer);
        local.seed(prevent_default);
        let mut called = 0;
        store.interact(layer, capability, |store, listener| {
            if local.deliver(listener, store) {
                called += 1;
            }
        });
        let prevent_default = local.flag();
        self.record(layer, capability, called, prevent_default);
        prevent_default
    }

    fn dispatch_wheel(&mut self, store: &mut LayerStore, layer: LayerId, event: &mut WheelEvent) {
        if !store.is_alive(layer) {
            return;
        }
        let mut called = 0;
        store.interact(layer, Capability::MouseWheel, |store, listener| {
            if listener.call_wheel(store, event) {
                called += 1;
            }
        });
        self.record(
            layer,
            Capability::MouseWheel,
            called,
            event.prevent_default(),
        );
    }

    fn record(&mut self, layer: LayerId, capability: Capability, listeners: u32, prevent: bool) {
        self.layer_dispatches += 1;
        self.tracer.layer_dispatch(&LayerDispatchEvent {
            time: self.time,
            layer,
            capability,
            listeners,
            prevent_default: prevent,
        });
    }

    fn session(&mut self, slot: SessionSlot, from: Option<LayerId>, to: Option<LayerId>) {
        self.tracer.session_change(&SessionEvent {
            time: self.time,
            slot,
            from,
            to,
        });
    }

    fn finish(self, prevent_default: bool) -> bool {
        self.tracer.dispatch_summary(&DispatchSummary {
            time: self.time,
            kind: self.kind,
            prevent_default,
            layer_dispatches: self.layer_dispatches,
        });
        prevent_default
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use kurbo::{Affine, Rect, Vec2};

    use super::*;
    use crate::event::MouseButton;

    type Log = Rc<RefCell<Vec<(&'static str, &'static str)>>>;

    const OVER_A: Point = Point::new(50.0, 50.0);
    const OVER_B: Point = Point::new(250.0, 50.0);
    const NOWHERE: Point = Point::new(150.0, 50.0);

    /// A root with two 100x100 children, `a` at the origin and `b` at x=200.
    /// Every capability on both children appends `(name, capability)` to
    /// `log`.
    struct Scene {
        store: LayerStore,
        root: LayerId,
        a: LayerId,
        b: LayerId,
        log: Log,
    }

    fn listen_all(store: &mut LayerStore, id: LayerId, name: &'static str, log: &Log) {
        for capability in Capability::ALL {
            let log = log.clone();
            let tag = (name, capability.name());
            let listener = match capability {
                Capability::MouseDown => {
                    Listener::mouse_down(move |_, _| log.borrow_mut().push(tag))
                }
                Capability::MouseUp => Listener::mouse_up(move |_, _| log.borrow_mut().push(tag)),
                Capability::MouseMove => {
                    Listener::mouse_move(move |_, _| log.borrow_mut().push(tag))
                }
                Capability::MouseDrag => {
                    Listener::mouse_drag(move |_, _| log.borrow_mut().push(tag))
                }
                Capability::MouseOver => {
                    Listener::mouse_over(move |_, _| log.borrow_mut().push(tag))
                }
                Capability::MouseOut => Listener::mouse_out(move |_, _| log.borrow_mut().push(tag)),
                Capability::MouseWheel => {
                    Listener::mouse_wheel(move |_, _| log.borrow_mut().push(tag))
                }
            };
            let _ = store.add_listener(id, listener);
        }
    }

    fn scene() -> Scene {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let a = store.create_layer();
        let b = store.create_layer();
        store.add_child(root, a);
        store.add_child(root, b);
        let square = Rect::new(0.0, 0.0, 100.0, 100.0).into();
        store.set_hit_shape(a, Some(square));
        store.set_hit_shape(b, Some(square));
        store.set_transform(b, Affine::translate((200.0, 0.0)));

        let log = Log::default();
        listen_all(&mut store, a, "a", &log);
        listen_all(&mut store, b, "b", &log);
        Scene {
            store,
            root,
            a,
            b,
            log,
        }
    }

    impl Scene {
        fn take_log(&self) -> Vec<(&'static str, &'static str)> {
            mem::take(&mut *self.log.borrow_mut())
        }
    }

    fn down<P: PointerLock>(mouse: &mut Mouse<P>, store: &mut LayerStore, at: Point) -> bool {
        let mut event = ButtonEvent::new(0.0, at, MouseButton::Left);
        mouse.on_mouse_down(store, &mut event)
    }

    fn up<P: PointerLock>(mouse: &mut Mouse<P>, store: &mut LayerStore, at: Point) -> bool {
        let mut event = ButtonEvent::new(0.0, at, MouseButton::Left);
        mouse.on_mouse_up(store, &mut event)
    }

    fn motion<P: PointerLock>(mouse: &mut Mouse<P>, store: &mut LayerStore, at: Point) -> bool {
        let mut event = MotionEvent::new(0.0, at);
        mouse.on_mouse_move(store, &mut event)
    }

    fn wheel<P: PointerLock>(mouse: &mut Mouse<P>, store: &mut LayerStore, at: Point) -> bool {
        let mut event = WheelEvent::new(0.0, at, 1.0);
        mouse.on_mouse_wheel_scroll(store, &mut event)
    }

    /// Global listener that logs every call and sets prevent-default to
    /// `prevent`.
    struct Global {
        log: Log,
        prevent: bool,
    }

    impl MouseListener for Global {
        fn on_mouse_down(&mut self, event: &mut ButtonEvent) {
            self.log.borrow_mut().push(("global", "down"));
            event.set_prevent_default(self.prevent);
        }

        fn on_mouse_up(&mut self, event: &mut ButtonEvent) {
            self.log.borrow_mut().push(("global", "up"));
            event.set_prevent_default(self.prevent);
        }

        fn on_mouse_move(&mut self, event: &mut MotionEvent) {
            self.log.borrow_mut().push(("global", "move"));
            event.set_prevent_default(self.prevent);
        }

        fn on_mouse_wheel_scroll(&mut self, event: &mut WheelEvent) {
            self.log.borrow_mut().push(("global", "wheel"));
            event.set_prevent_default(self.prevent);
        }
    }

    fn global(log: &Log, prevent: bool) -> Box<dyn MouseListener> {
        Box::new(Global {
            log: log.clone(),
            prevent,
        })
    }

    #[test]
    fn new_dispatcher_defaults() {
        let s = scene();
        let mouse = Mouse::new(s.root);
        assert!(mouse.has_mouse());
        assert!(mouse.is_enabled());
        assert_eq!(mouse.root(), s.root);
        assert_eq!(mouse.active_layer(), None);
        assert_eq!(mouse.hover_layer(), None);
        assert!(!mouse.is_lock_supported());
    }

    #[test]
    fn disabled_handlers_do_nothing() {
        let mut s = scene();
        let mut mouse = Mouse::with_listener(s.root, global(&s.log, true));
        mouse.set_enabled(false);
        assert!(!mouse.is_enabled());

        assert!(!down(&mut mouse, &mut s.store, OVER_A));
        assert!(!motion(&mut mouse, &mut s.store, OVER_B));
        assert!(!wheel(&mut mouse, &mut s.store, OVER_B));
        assert!(!up(&mut mouse, &mut s.store, OVER_A));

        assert_eq!(mouse.active_layer(), None);
        assert_eq!(mouse.hover_layer(), None);
        assert!(s.take_log().is_empty());
    }

    #[test]
    fn disabling_keeps_session_state() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        down(&mut mouse, &mut s.store, OVER_A);
        motion(&mut mouse, &mut s.store, OVER_B);
        mouse.set_enabled(false);

        assert!(!up(&mut mouse, &mut s.store, OVER_B));
        assert!(!motion(&mut mouse, &mut s.store, NOWHERE));
        assert_eq!(mouse.active_layer(), Some(s.a));
        assert_eq!(mouse.hover_layer(), Some(s.b));
    }

    #[test]
    fn down_sets_active_until_up() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);

        down(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(mouse.active_layer(), Some(s.a));
        assert_eq!(s.take_log(), vec![("a", "down")]);

        // Moving away keeps the press on `a`: drag goes there, never move.
        motion(&mut mouse, &mut s.store, OVER_B);
        assert_eq!(mouse.active_layer(), Some(s.a));
        assert_eq!(mouse.hover_layer(), Some(s.b));
        assert_eq!(s.take_log(), vec![("a", "drag"), ("b", "over")]);

        motion(&mut mouse, &mut s.store, NOWHERE);
        assert_eq!(mouse.active_layer(), Some(s.a));
        assert_eq!(s.take_log(), vec![("a", "drag"), ("b", "out")]);

        // Release over nothing still goes to the pressed layer.
        up(&mut mouse, &mut s.store, NOWHERE);
        assert_eq!(mouse.active_layer(), None);
        assert_eq!(s.take_log(), vec![("a", "up")]);

        // With no press, release reaches nobody.
        up(&mut mouse, &mut s.store, OVER_B);
        assert!(s.take_log().is_empty());
    }

    #[test]
    fn down_on_empty_space_clears_active() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        down(&mut mouse, &mut s.store, OVER_A);
        down(&mut mouse, &mut s.store, NOWHERE);
        assert_eq!(mouse.active_layer(), None);
        assert_eq!(s.take_log(), vec![("a", "down")]);
    }

    #[test]
    fn up_clears_active_even_when_prevented() {
        let mut s = scene();
        let _ = s
            .store
            .add_listener(s.a, Listener::mouse_up(|_, e| e.set_prevent_default(true)));
        let mut mouse = Mouse::new(s.root);

        down(&mut mouse, &mut s.store, OVER_A);
        assert!(up(&mut mouse, &mut s.store, OVER_A));
        assert_eq!(mouse.active_layer(), None);
    }

    #[test]
    fn hover_change_fires_out_then_over() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);

        motion(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(s.take_log(), vec![("a", "move"), ("a", "over")]);

        motion(&mut mouse, &mut s.store, OVER_B);
        assert_eq!(
            s.take_log(),
            vec![("b", "move"), ("a", "out"), ("b", "over")]
        );
        assert_eq!(mouse.hover_layer(), Some(s.b));
    }

    #[test]
    fn hover_on_same_layer_fires_neither() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        motion(&mut mouse, &mut s.store, OVER_A);
        s.take_log();

        motion(&mut mouse, &mut s.store, Point::new(60.0, 60.0));
        assert_eq!(s.take_log(), vec![("a", "move")]);

        motion(&mut mouse, &mut s.store, NOWHERE);
        assert_eq!(s.take_log(), vec![("a", "out")]);
        assert_eq!(mouse.hover_layer(), None);
    }

    #[test]
    fn drag_on_hovered_layer_fires_no_move() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        motion(&mut mouse, &mut s.store, OVER_A);
        down(&mut mouse, &mut s.store, OVER_A);
        s.take_log();

        motion(&mut mouse, &mut s.store, Point::new(70.0, 70.0));
        assert_eq!(s.take_log(), vec![("a", "drag")]);
    }

    #[test]
    fn root_not_interactive_only_reaches_global() {
        let mut s = scene();
        s.store.set_interactive(s.root, false);
        let mut mouse = Mouse::with_listener(s.root, global(&s.log, true));

        assert!(down(&mut mouse, &mut s.store, OVER_A));
        assert!(motion(&mut mouse, &mut s.store, OVER_B));
        assert_eq!(mouse.active_layer(), None);
        assert_eq!(mouse.hover_layer(), None);
        assert_eq!(s.take_log(), vec![("global", "down"), ("global", "move")]);

        mouse.set_listener(Some(global(&s.log, false)));
        assert!(!down(&mut mouse, &mut s.store, OVER_A));
    }

    #[test]
    fn global_listener_runs_before_layers() {
        let mut s = scene();
        let mut mouse = Mouse::with_listener(s.root, global(&s.log, false));
        down(&mut mouse, &mut s.store, OVER_A);
        up(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(
            s.take_log(),
            vec![
                ("global", "down"),
                ("a", "down"),
                ("global", "up"),
                ("a", "up")
            ]
        );
    }

    #[test]
    fn layer_prevent_default_overrides_global() {
        let mut s = scene();
        let _ = s
            .store
            .add_listener(s.a, Listener::mouse_down(|_, e| e.set_prevent_default(true)));
        let mut mouse = Mouse::with_listener(s.root, global(&s.log, false));
        assert!(down(&mut mouse, &mut s.store, OVER_A));
    }

    #[test]
    fn global_flag_seeds_layer_dispatch() {
        let mut s = scene();
        let seen = Rc::new(RefCell::new(None));
        let sn = seen.clone();
        let _ = s.store.add_listener(
            s.a,
            Listener::mouse_down(move |_, e| *sn.borrow_mut() = Some(e.prevent_default())),
        );
        let mut mouse = Mouse::with_listener(s.root, global(&s.log, true));
        assert!(down(&mut mouse, &mut s.store, OVER_A));
        assert_eq!(*seen.borrow(), Some(true));

        // A later listener may clear the flag again: last write wins.
        let _ = s
            .store
            .add_listener(s.b, Listener::mouse_down(|_, e| e.set_prevent_default(false)));
        assert!(!down(&mut mouse, &mut s.store, OVER_B));
    }

    #[test]
    fn motion_flag_threads_through_every_step() {
        let mut s = scene();
        // `a` asks for prevent-default on out; `b` clears it on over, which
        // runs last.
        let _ = s
            .store
            .add_listener(s.a, Listener::mouse_out(|_, e| e.set_prevent_default(true)));
        let mut mouse = Mouse::new(s.root);
        motion(&mut mouse, &mut s.store, OVER_A);
        assert!(motion(&mut mouse, &mut s.store, NOWHERE));

        let _ = s.store.add_listener(
            s.b,
            Listener::mouse_over(|_, e| {
                assert!(e.prevent_default(), "over sees the flag from out");
                e.set_prevent_default(false);
            }),
        );
        motion(&mut mouse, &mut s.store, OVER_A);
        assert!(!motion(&mut mouse, &mut s.store, OVER_B));
    }

    #[test]
    fn wheel_without_target_returns_event_flag() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);

        let mut event = WheelEvent::new(0.0, OVER_A, 2.0);
        event.set_prevent_default(true);
        assert!(!mouse.on_mouse_wheel_scroll(&mut s.store, &mut event));
        assert!(!event.prevent_default(), "flag is reset before dispatch");

        mouse.set_listener(Some(global(&s.log, true)));
        assert!(wheel(&mut mouse, &mut s.store, OVER_A));
        assert_eq!(s.take_log(), vec![("global", "wheel")]);
    }

    #[test]
    fn wheel_prefers_active_then_hover() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);

        motion(&mut mouse, &mut s.store, OVER_B);
        s.take_log();
        wheel(&mut mouse, &mut s.store, OVER_B);
        assert_eq!(s.take_log(), vec![("b", "wheel")]);

        down(&mut mouse, &mut s.store, OVER_A);
        s.take_log();
        // The wheel position is ignored; the press wins over hover.
        wheel(&mut mouse, &mut s.store, OVER_B);
        assert_eq!(s.take_log(), vec![("a", "wheel")]);
    }

    #[test]
    fn wheel_events_are_not_localized() {
        let mut s = scene();
        let seen = Rc::new(RefCell::new(None));
        let sn = seen.clone();
        let _ = s.store.add_listener(
            s.b,
            Listener::mouse_wheel(move |_, e| {
                *sn.borrow_mut() = Some((e.hit(), e.local_position()));
                e.set_prevent_default(true);
            }),
        );
        let mut mouse = Mouse::new(s.root);
        motion(&mut mouse, &mut s.store, OVER_B);
        assert!(wheel(&mut mouse, &mut s.store, OVER_B));
        assert_eq!(*seen.borrow(), Some((None, OVER_B)));
    }

    #[test]
    fn localized_coordinates_match_layer_space() {
        let mut s = scene();
        s.store.set_transform(s.root, Affine::scale(2.0));
        s.store.set_origin(s.root, Vec2::new(10.0, 0.0));
        s.store.set_transform(
            s.b,
            Affine::translate((200.0, 0.0)) * Affine::scale_non_uniform(1.0, 0.5),
        );

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sn = seen.clone();
        let _ = s.store.add_listener(
            s.b,
            Listener::mouse_down(move |_, e| {
                sn.borrow_mut()
                    .push((e.hit(), e.position(), e.local_position()));
            }),
        );
        let mut mouse = Mouse::new(s.root);

        // Root space is (device / 2) + (10, 0), so the press lands at
        // (220, 30). `b` covers root x in 200..300 and root y in 0..50.
        let device = Point::new(420.0, 60.0);
        down(&mut mouse, &mut s.store, device);
        assert_eq!(mouse.active_layer(), Some(s.b));

        let expected = s.store.screen_to_layer(s.b, device).expect("invertible");
        assert_eq!(*seen.borrow(), vec![(Some(s.b), device, expected)]);
        assert!((expected.x - 20.0).abs() < 1e-9);
        assert!((expected.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn non_invertible_root_hits_nothing() {
        let mut s = scene();
        s.store.set_transform(s.root, Affine::scale(0.0));
        let mut mouse = Mouse::new(s.root);
        down(&mut mouse, &mut s.store, OVER_A);
        motion(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(mouse.active_layer(), None);
        assert_eq!(mouse.hover_layer(), None);
        assert!(s.take_log().is_empty());
    }

    #[test]
    fn destroyed_hover_layer_is_skipped() {
        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        motion(&mut mouse, &mut s.store, OVER_A);
        s.take_log();

        s.store.destroy_layer(s.a);
        motion(&mut mouse, &mut s.store, OVER_B);
        assert_eq!(s.take_log(), vec![("b", "move"), ("b", "over")]);
        assert_eq!(mouse.hover_layer(), Some(s.b));
    }

    #[test]
    fn listener_destroying_active_layer_is_safe() {
        let mut s = scene();
        let _ = s.store.add_listener(
            s.a,
            Listener::mouse_down(|store, e| store.destroy_layer(e.hit().expect("localized"))),
        );
        let mut mouse = Mouse::new(s.root);

        down(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(mouse.active_layer(), Some(s.a));
        motion(&mut mouse, &mut s.store, OVER_B);
        wheel(&mut mouse, &mut s.store, OVER_B);
        assert!(!up(&mut mouse, &mut s.store, OVER_B));
        assert_eq!(mouse.active_layer(), None);
        // `b` still hears about hover, but the press belonged to `a`.
        assert_eq!(s.take_log(), vec![("a", "down"), ("b", "over")]);
    }

    #[test]
    fn layer_with_listener_can_be_hit_after_attaching() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        let button = store.create_layer();
        store.set_hit_shape(button, Some(Rect::new(0.0, 0.0, 20.0, 20.0).into()));
        let _ = store.add_listener(
            button,
            Listener::mouse_down(|_, e| e.set_prevent_default(true)),
        );
        store.add_child(root, button);

        let mut mouse = Mouse::new(root);
        assert!(down(&mut mouse, &mut store, Point::new(10.0, 10.0)));
        assert_eq!(mouse.active_layer(), Some(button));
    }

    #[test]
    fn listener_reentering_its_layer_runs_once() {
        let mut s = scene();
        let runs = Rc::new(RefCell::new(0));
        let r = runs.clone();
        let _ = s.store.add_listener(
            s.a,
            Listener::mouse_down(move |store, e| {
                *r.borrow_mut() += 1;
                let layer = e.hit().expect("localized");
                let mut nested = ButtonEvent::new(0.0, e.position(), MouseButton::Left);
                let _ = store.interact(layer, Capability::MouseDown, |store, l| {
                    l.call_button(store, &mut nested);
                });
                e.set_prevent_default(true);
            }),
        );

        let mut mouse = Mouse::new(s.root);
        assert!(down(&mut mouse, &mut s.store, OVER_A));
        assert_eq!(*runs.borrow(), 1);
        // The logging listener runs once from the nested walk and once from
        // the dispatch itself.
        assert_eq!(s.take_log(), vec![("a", "down"), ("a", "down")]);
    }

    #[test]
    fn stale_root_is_not_interactive() {
        let mut store = LayerStore::new();
        let root = store.create_layer();
        store.set_interactive(root, true);
        store.destroy_layer(root);
        let mut mouse = Mouse::new(root);
        assert!(!down(&mut mouse, &mut store, Point::ZERO));
        assert_eq!(mouse.active_layer(), None);
    }

    #[test]
    fn set_root_switches_trees() {
        let mut s = scene();
        let other = s.store.create_layer();
        s.store.set_interactive(other, true);
        s.store
            .set_hit_shape(other, Some(Rect::new(0.0, 0.0, 1000.0, 1000.0).into()));

        let mut mouse = Mouse::new(s.root);
        mouse.set_root(other);
        assert_eq!(mouse.root(), other);
        down(&mut mouse, &mut s.store, OVER_A);
        assert_eq!(mouse.active_layer(), Some(other));
        assert!(s.take_log().is_empty());
    }

    #[test]
    fn set_listener_returns_previous() {
        let s = scene();
        let mut mouse = Mouse::new(s.root);
        assert!(mouse.set_listener(Some(global(&s.log, false))).is_none());
        assert!(mouse.set_listener(None).is_some());
        assert!(mouse.set_listener(None).is_none());
    }

    #[test]
    fn default_pointer_lock_is_inert() {
        let s = scene();
        let mut mouse = Mouse::new(s.root);
        mouse.lock();
        assert!(!mouse.is_locked());
        mouse.unlock();
        assert!(!mouse.is_lock_supported());
        assert_eq!(*mouse.pointer_lock(), Unsupported);
    }

    #[test]
    fn custom_pointer_lock_is_delegated() {
        #[derive(Debug, Default)]
        struct Capture {
            locked: bool,
            requests: u32,
        }
        impl PointerLock for Capture {
            fn lock(&mut self) {
                self.locked = true;
                self.requests += 1;
            }
            fn unlock(&mut self) {
                self.locked = false;
            }
            fn is_locked(&self) -> bool {
                self.locked
            }
            fn is_lock_supported(&self) -> bool {
                true
            }
        }

        let s = scene();
        let mut mouse = Mouse::with_pointer_lock(s.root, Capture::default());
        assert!(mouse.is_lock_supported());
        mouse.lock();
        assert!(mouse.is_locked());
        mouse.unlock();
        assert!(!mouse.is_locked());
        mouse.pointer_lock_mut().requests = 7;
        assert_eq!(mouse.pointer_lock().requests, 7);
    }

    #[test]
    fn debug_reports_listener_presence() {
        let s = scene();
        let mouse = Mouse::with_listener(s.root, global(&s.log, false));
        let text = alloc::format!("{mouse:?}");
        assert!(text.contains("listener: true"));
        assert!(text.contains("Unsupported"));
    }

    #[cfg(feature = "trace")]
    #[test]
    fn trace_follows_dispatch_sequence() {
        use crate::trace::TraceSink;

        #[derive(Debug, PartialEq)]
        enum Seen {
            Input(InputKind),
            Hit(Option<LayerId>),
            Dispatch(LayerId, Capability, u32, bool),
            Session(SessionSlot, Option<LayerId>, Option<LayerId>),
            Summary(InputKind, bool, u32),
        }

        #[derive(Default)]
        struct Recording(Vec<Seen>);

        impl TraceSink for Recording {
            fn on_input(&mut self, e: &InputEvent) {
                self.0.push(Seen::Input(e.kind));
            }
            fn on_hit_test(&mut self, e: &HitTestEvent) {
                self.0.push(Seen::Hit(e.hit));
            }
            fn on_layer_dispatch(&mut self, e: &LayerDispatchEvent) {
                self.0.push(Seen::Dispatch(
                    e.layer,
                    e.capability,
                    e.listeners,
                    e.prevent_default,
                ));
            }
            fn on_session_change(&mut self, e: &SessionEvent) {
                self.0.push(Seen::Session(e.slot, e.from, e.to));
            }
            fn on_dispatch_summary(&mut self, s: &DispatchSummary) {
                self.0.push(Seen::Summary(s.kind, s.prevent_default, s.layer_dispatches));
            }
        }

        let mut s = scene();
        let mut mouse = Mouse::new(s.root);
        let mut sink = Recording::default();

        let mut event = MotionEvent::new(1.0, OVER_A);
        mouse.on_mouse_move_traced(&mut s.store, &mut event, &mut Tracer::new(&mut sink));
        let mut event = ButtonEvent::new(2.0, OVER_A, MouseButton::Left);
        mouse.on_mouse_down_traced(&mut s.store, &mut event, &mut Tracer::new(&mut sink));
        let mut event = ButtonEvent::new(3.0, OVER_A, MouseButton::Left);
        mouse.on_mouse_up_traced(&mut s.store, &mut event, &mut Tracer::new(&mut sink));

        mouse.set_enabled(false);
        let mut event = WheelEvent::new(4.0, OVER_A, 1.0);
        mouse.on_mouse_wheel_scroll_traced(&mut s.store, &mut event, &mut Tracer::new(&mut sink));

        let a = s.a;
        assert_eq!(
            sink.0,
            vec![
                Seen::Input(InputKind::MouseMove),
                Seen::Hit(Some(a)),
                Seen::Session(SessionSlot::Hover, None, Some(a)),
                Seen::Dispatch(a, Capability::MouseMove, 1, false),
                Seen::Dispatch(a, Capability::MouseOver, 1, false),
                Seen::Summary(InputKind::MouseMove, false, 2),
                Seen::Input(InputKind::MouseDown),
                Seen::Hit(Some(a)),
                Seen::Session(SessionSlot::Active, None, Some(a)),
                Seen::Dispatch(a, Capability::MouseDown, 1, false),
                Seen::Summary(InputKind::MouseDown, false, 1),
                Seen::Input(InputKind::MouseUp),
                Seen::Dispatch(a, Capability::MouseUp, 1, false),
                Seen::Session(SessionSlot::Active, Some(a), None),
                Seen::Summary(InputKind::MouseUp, false, 1),
            ]
        );
    }
}
