//! Leptos Outside-Click Utilities
//!
//! Dismiss transient UI (menus, popovers) when the user presses a pointer
//! anywhere outside of it. The document-level listener only exists while the
//! region is open and is released when it closes or the owner unmounts.

use leptos::html::Div;
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

const POINTER_DOWN: &str = "pointerdown";

/// A listener attached to `document`. Detached on drop.
pub struct DocumentListener {
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for DocumentListener {
    fn drop(&mut self) {
        if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
            let _ = doc.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

/// Attach `handler` to `document` for `event`.
/// Returns `None` outside a browser or if the DOM refused the listener.
pub fn listen_document<F>(event: &'static str, handler: F) -> Option<DocumentListener>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let doc = web_sys::window()?.document()?;
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    doc.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        .ok()?;
    Some(DocumentListener { event, callback })
}

/// True unless `target` is `region` itself or one of its descendants
pub fn is_outside(region: &web_sys::Node, target: Option<&web_sys::Node>) -> bool {
    !region.contains(target)
}

/// Call `on_outside` for every pointer-down outside `region` while `open`
/// is true.
pub fn use_outside_click<F>(region: NodeRef<Div>, open: impl Into<Signal<bool>>, on_outside: F)
where
    F: Fn() + Clone + 'static,
{
    let open = open.into();
    let listener = StoredValue::new_local(None::<DocumentListener>);

    Effect::new(move |_| {
        if !open.get() {
            // Dropping the listener detaches it
            listener.set_value(None);
            return;
        }
        if listener.with_value(Option::is_some) {
            return;
        }

        let on_outside = on_outside.clone();
        let registered = listen_document(POINTER_DOWN, move |ev: web_sys::Event| {
            let Some(el) = region.get_untracked() else {
                return;
            };
            let target = ev
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
            if is_outside(&el, target.as_ref()) {
                on_outside();
            }
        });
        listener.set_value(registered);
    });

    on_cleanup(move || listener.set_value(None));
}
