use super::controller::FormSearchController;
use super::options::FormTableOptions;
use crate::shared::form_adapter::{FormAdapter, FormController};
use crate::shared::paged_request::PagedRequest;
use crate::shared::scheduler::NextTick;
use crate::shared::session_cache::SessionCache;
use contracts::shared::search_table::{InvocationRecord, PagedData, PaginationParams, SearchMode};
use leptos::prelude::*;
use std::future::Future;
use std::rc::Rc;

/// Результат [`use_form_table`]: поиск + состояние запроса.
///
/// Copy-хэндл: сам контроллер и запрос живут в `StoredValue` владельца компонента.
pub struct FormTable<T: Send + Sync + 'static> {
    pub mode: ReadSignal<SearchMode>,
    pub loading: RwSignal<bool>,
    pub data: RwSignal<Option<PagedData<T>>>,
    pub error: RwSignal<Option<String>>,
    pub pagination: RwSignal<Option<PaginationParams>>,
    request: StoredValue<PagedRequest<T>, LocalStorage>,
    controller: StoredValue<FormSearchController, LocalStorage>,
}

impl<T: Send + Sync + 'static> Clone for FormTable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for FormTable<T> {}

impl<T: Clone + Send + Sync + 'static> FormTable<T> {
    pub fn submit(&self) {
        self.controller.with_value(|c| c.submit());
    }

    pub fn submit_event(&self, ev: &web_sys::Event) {
        self.controller.with_value(|c| c.submit_event(ev));
    }

    pub fn reset(&self) {
        self.controller.with_value(|c| c.reset());
    }

    pub fn change_type(&self) {
        self.controller.with_value(|c| c.change_type());
    }

    pub fn change_page(&self, current: u32, page_size: u32) {
        self.request.with_value(|r| r.change_page(current, page_size));
    }

    pub fn change_sorter(&self, sorter: Option<serde_json::Value>) {
        self.request.with_value(|r| r.change_sorter(sorter));
    }

    pub fn refresh(&self) {
        self.request.with_value(|r| r.refresh());
    }

    pub fn current(&self) -> Signal<u32> {
        let pagination = self.pagination;
        Signal::derive(move || pagination.with(|p| p.as_ref().map(|p| p.current).unwrap_or(1)))
    }

    pub fn page_size(&self) -> Signal<u32> {
        let pagination = self.pagination;
        let default = self.controller.with_value(|c| c.options().default_page_size);
        Signal::derive(move || {
            pagination.with(|p| p.as_ref().map(|p| p.page_size).unwrap_or(default))
        })
    }

    pub fn total(&self) -> Signal<u64> {
        self.request.with_value(|r| r.total())
    }

    pub fn total_pages(&self) -> Signal<u32> {
        self.request.with_value(|r| r.total_pages())
    }
}

/// Связывает форму поиска с пагинированной таблицей.
///
/// При монтировании либо повторяет запрос, восстановленный из sessionStorage
/// (`options.cache_key`), либо отправляет форму (если не `manual`).
pub fn use_form_table<T, F, Fut>(
    form: impl FormController + 'static,
    service: F,
    options: FormTableOptions,
) -> FormTable<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(InvocationRecord) -> Fut + 'static,
    Fut: Future<Output = Result<PagedData<T>, String>> + 'static,
{
    let request = PagedRequest::new(service, &options, SessionCache::browser());
    let controller = FormSearchController::new(
        FormAdapter::new(Rc::new(form)),
        Rc::new(request.clone()),
        Rc::new(NextTick),
        options,
    );

    let (mode, set_mode) = signal(controller.mode());
    controller.on_mode_change(move |mode| set_mode.set(mode));
    controller.initialize();

    FormTable {
        mode,
        loading: request.loading,
        data: request.data,
        error: request.error,
        pagination: request.pagination,
        request: StoredValue::new_local(request),
        controller: StoredValue::new_local(controller),
    }
}
