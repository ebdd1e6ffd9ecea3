//! Leptos DragDrop Utilities
//!
//! Mouse-event drag and drop for Leptos. The gesture itself (press, travel
//! past the activation distance, hover, release) is tracked by
//! `board_core::DragMachine`; this crate binds it to DOM events and exposes
//! the parts the view reacts to as signals.

use board_core::{DragEnd, DragMachine};
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// DnD state: the gesture machine plus the signals views read
pub struct DndSignals<Id: Send + Sync + 'static> {
    machine: StoredValue<DragMachine<Id>>,
    /// Entity being dragged once the gesture is active
    pub dragging: RwSignal<Option<Id>>,
    /// Drop target under the pointer
    pub over: RwSignal<Option<Id>>,
    /// Last pointer position, for placing the floating preview
    pub pointer: RwSignal<(i32, i32)>,
    /// True for a moment after a drop so the trailing click is ignored
    pub drag_just_ended: RwSignal<bool>,
}

impl<Id: Send + Sync + 'static> Clone for DndSignals<Id> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id: Send + Sync + 'static> Copy for DndSignals<Id> {}

pub fn create_dnd_signals<Id>(activation_px: i32) -> DndSignals<Id>
where
    Id: Copy + Eq + Send + Sync + 'static,
{
    DndSignals {
        machine: StoredValue::new(DragMachine::new(activation_px)),
        dragging: RwSignal::new(None),
        over: RwSignal::new(None),
        pointer: RwSignal::new((0, 0)),
        drag_just_ended: RwSignal::new(false),
    }
}

/// Reset after a drop or a cancelled gesture
pub fn end_drag<Id>(dnd: &DndSignals<Id>)
where
    Id: Copy + Eq + Send + Sync + 'static,
{
    dnd.machine.update_value(|m| m.cancel());
    dnd.dragging.set(None);
    dnd.over.set(None);
    dnd.drag_just_ended.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            100,
        );
        cb.forget();
    }
}

/// Mousedown handler for a draggable element. Presses on inputs and
/// buttons are left alone.
pub fn make_on_mousedown<Id>(dnd: DndSignals<Id>, id: Id) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Copy + Eq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlTextAreaElement>().is_some()
                || target.dyn_ref::<web_sys::HtmlButtonElement>().is_some()
            {
                return;
            }
        }
        // inner draggables (cards) win over their column
        ev.stop_propagation();
        dnd.machine
            .update_value(|m| {
                m.press(id, ev.client_x(), ev.client_y());
            });
    }
}

/// Mouseover handler for a drop target. Stops propagation so the innermost
/// target under the pointer wins.
pub fn make_on_mouseover<Id>(dnd: DndSignals<Id>, id: Id) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Copy + Eq + Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_none() {
            return;
        }
        ev.stop_propagation();
        let over = dnd
            .machine
            .try_update_value(|m| {
                m.hover(Some(id));
                m.over()
            })
            .flatten();
        dnd.over.set(over);
    }
}

/// Mouseleave handler for the area holding all drop targets
pub fn make_on_mouseleave<Id>(dnd: DndSignals<Id>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Copy + Eq + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging.get_untracked().is_some() {
            dnd.machine.update_value(|m| m.hover(None));
            dnd.over.set(None);
        }
    }
}

fn add_document_listener(event: &str, handler: &wasm_bindgen::closure::Closure<dyn FnMut(web_sys::MouseEvent)>) {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref());
    }
}

/// Bind the document-level mousemove/mouseup handlers.
///
/// `on_start` runs when a press travels past the activation distance and
/// may refuse the drag. `on_drop` gets the dragged id and the target under
/// the pointer at release (`None` outside any target).
pub fn bind_global_handlers<Id, S, D>(dnd: DndSignals<Id>, on_start: S, on_drop: D)
where
    Id: Copy + Eq + Send + Sync + 'static,
    S: Fn(Id) -> bool + 'static,
    D: Fn(Id, Option<Id>) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let (x, y) = (ev.client_x(), ev.client_y());
        let activated = dnd
            .machine
            .try_update_value(|m| m.pointer_move(x, y))
            .flatten();
        if let Some(id) = activated {
            if on_start(id) {
                dnd.dragging.set(Some(id));
            } else {
                dnd.machine.update_value(|m| m.cancel());
            }
        }
        if dnd.dragging.get_untracked().is_some() {
            dnd.pointer.set((x, y));
        }
    });

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let released: Option<DragEnd<Id>> = dnd.machine.try_update_value(|m| m.release()).flatten();
        match released {
            Some(end) => {
                dnd.machine.update_value(|m| m.finish());
                end_drag(&dnd);
                on_drop(end.dragged, end.target);
            }
            // A plain click: the click event fires on the element as usual
            None => {
                if dnd.dragging.get_untracked().is_some() {
                    end_drag(&dnd);
                }
            }
        }
    });

    add_document_listener("mousemove", &on_mousemove);
    add_document_listener("mouseup", &on_mouseup);
    on_mousemove.forget();
    on_mouseup.forget();
}
