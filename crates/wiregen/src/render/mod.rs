//! Text renderers.
//!
//! Two dialects are produced from the same model:
//! - [`native`]: the `wg-quick` INI-style config file.
//! - [`router`]: a MikroTik RouterOS command script.
//!
//! Both are pure functions of the model. Field order is fixed by explicit
//! `(label, accessor)` tables so that output is reproducible.

pub mod native;
pub mod router;

pub use native::render_native;
pub use router::{
    render_router_interface, render_router_peer, render_router_script, RouterInterfaceOptions,
    RouterPeerOptions,
};

/// A labelled field accessor; `None` means the line is omitted.
pub(crate) type Field<T> = (&'static str, fn(&T) -> Option<String>);

/// Present, non-blank text.
pub(crate) fn text(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Present, non-zero numbers.
pub(crate) fn number<N: Into<u64>>(value: Option<N>) -> Option<String> {
    value.map(Into::into).filter(|n| *n != 0).map(|n| n.to_string())
}
