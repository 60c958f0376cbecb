use leptos::html::ElementType;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Вызывает `on_click_away` при клике вне элемента `target`.
///
/// Обработчик висит на window и снимается при размонтировании компонента.
pub fn use_click_away<E>(target: NodeRef<E>, on_click_away: impl Fn(leptos::ev::MouseEvent) + 'static)
where
    E: ElementType,
    E::Output: JsCast + Clone + 'static,
{
    let handle = window_event_listener(leptos::ev::click, move |ev: leptos::ev::MouseEvent| {
        let Some(el) = target.get_untracked() else {
            return;
        };
        let el: &web_sys::Node = el.unchecked_ref();
        let clicked = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok());

        if !el.contains(clicked.as_ref()) {
            on_click_away(ev);
        }
    });

    on_cleanup(move || handle.remove());
}
