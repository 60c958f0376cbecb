use leptos::prelude::*;

/// Переключатель страниц таблицы.
///
/// Страницы нумеруются с 1, как в [`PaginationParams`](contracts::shared::search_table::PaginationParams).
#[component]
pub fn PaginationControls(
    /// Текущая страница (с 1)
    #[prop(into)]
    current: Signal<u32>,

    #[prop(into)]
    total_pages: Signal<u32>,

    /// Общее количество записей
    #[prop(into)]
    total: Signal<u64>,

    #[prop(into)]
    page_size: Signal<u32>,

    /// (страница, размер страницы)
    on_change: Callback<(u32, u32)>,

    /// Варианты размера страницы, по умолчанию [5, 10, 20, 50]
    #[prop(optional)]
    page_size_options: Option<Vec<u32>>,
) -> impl IntoView {
    let page_size_opts = page_size_options.unwrap_or_else(|| vec![5, 10, 20, 50]);
    let go = move |page: u32| on_change.run((page, page_size.get_untracked()));
    let is_first = move || current.get() <= 1;
    let is_last = move || current.get() >= total_pages.get();

    view! {
        <div class="pagination-controls">
            <button class="pagination-btn" on:click=move |_| go(1) disabled=is_first title="Первая страница">
                "«"
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(current.get_untracked().saturating_sub(1).max(1))
                disabled=is_first
                title="Предыдущая страница"
            >
                "‹"
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", current.get(), total_pages.get().max(1), total.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| go(current.get_untracked() + 1)
                disabled=is_last
                title="Следующая страница"
            >
                "›"
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go(total_pages.get_untracked().max(1))
                disabled=is_last
                title="Последняя страница"
            >
                "»"
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let size = event_target_value(&ev).parse().unwrap_or(10);
                    on_change.run((1, size));
                }
                prop:value=move || page_size.get().to_string()
            >
                {page_size_opts.iter().map(|&size| {
                    view! {
                        <option value={size.to_string()} selected=move || page_size.get() == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
