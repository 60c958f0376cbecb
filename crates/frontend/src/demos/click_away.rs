use crate::shared::click_away::use_click_away;
use leptos::prelude::*;
use thaw::*;

/// Счётчик кликов вне кнопки
#[component]
pub fn ClickAwayDemo() -> impl IntoView {
    let counter = RwSignal::new(0u32);
    let target = NodeRef::<leptos::html::Span>::new();

    use_click_away(target, move |_| counter.update(|c| *c += 1));

    view! {
        <div>
            <span node_ref=target>
                <Button appearance=ButtonAppearance::Primary>"box1"</Button>
            </span>
            <p>{move || format!("counter: {}", counter.get())}</p>
        </div>
    }
}
