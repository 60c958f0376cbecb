//! Пагинированный запрос данных.
//!
//! [`RequestEngine`] — то, что нужно контроллеру формы: запустить запрос и
//! вернуть аргументы последнего запуска. [`PagedRequest`] — реализация на
//! сигналах Leptos с сохранением последнего запроса в sessionStorage.

use crate::shared::form_table::FormTableOptions;
use crate::shared::session_cache::SessionCache;
use contracts::shared::search_table::{
    CacheEntry, FieldSnapshot, InvocationRecord, PagedData, PaginationParams, SearchMeta,
};
use leptos::prelude::*;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

pub trait RequestEngine {
    fn run(&self, pagination: PaginationParams, fields: FieldSnapshot, meta: SearchMeta);

    /// Аргументы последнего `run`; `None`, если запросов не было
    fn params(&self) -> Option<InvocationRecord>;
}

pub type ServiceFuture<T> = Pin<Box<dyn Future<Output = Result<PagedData<T>, String>>>>;

type Service<T> = Rc<dyn Fn(InvocationRecord) -> ServiceFuture<T>>;

/// Активная запись кэша превращается в последний вызов и гасится,
/// чтобы следующий заход на страницу начинался с чистого листа.
pub fn take_active_entry(
    cache: &SessionCache,
    key: &str,
    default_page_size: u32,
) -> Option<InvocationRecord> {
    let mut entry = cache.load(key)?;
    if !entry.active {
        return None;
    }
    entry.active = false;
    cache.save(key, &entry);
    Some(entry.to_invocation(default_page_size))
}

/// Сохраняет вызов в кэш. `count` — total из последнего ответа, если он уже есть.
pub fn persist_invocation(
    cache: &SessionCache,
    key: &str,
    record: &InvocationRecord,
    count: Option<u64>,
) {
    let count = count.or_else(|| cache.load(key).and_then(|entry| entry.count));
    cache.save(key, &CacheEntry::from_invocation(record, count));
}

#[derive(Clone)]
pub struct PagedRequest<T: Send + Sync + 'static> {
    service: Service<T>,
    params: Rc<RefCell<Option<InvocationRecord>>>,
    cache: SessionCache,
    cache_key: Option<String>,
    default_page_size: u32,
    request_seq: Rc<Cell<u64>>,
    pub loading: RwSignal<bool>,
    pub data: RwSignal<Option<PagedData<T>>>,
    pub error: RwSignal<Option<String>>,
    pub pagination: RwSignal<Option<PaginationParams>>,
}

impl<T: Clone + Send + Sync + 'static> PagedRequest<T> {
    pub fn new<F, Fut>(service: F, options: &FormTableOptions, cache: SessionCache) -> Self
    where
        F: Fn(InvocationRecord) -> Fut + 'static,
        Fut: Future<Output = Result<PagedData<T>, String>> + 'static,
    {
        let restored = options
            .cache_key
            .as_deref()
            .and_then(|key| take_active_entry(&cache, key, options.default_page_size));
        if let Some(record) = &restored {
            log::debug!("paged request: restored page {} from cache", record.pagination.current);
        }

        let service: Service<T> =
            Rc::new(move |record| -> ServiceFuture<T> { Box::pin(service(record)) });

        Self {
            service,
            pagination: RwSignal::new(restored.as_ref().map(|r| r.pagination.clone())),
            params: Rc::new(RefCell::new(restored)),
            cache,
            cache_key: options.cache_key.clone(),
            default_page_size: options.default_page_size.max(1),
            request_seq: Rc::new(Cell::new(0)),
            loading: RwSignal::new(false),
            data: RwSignal::new(None),
            error: RwSignal::new(None),
        }
    }

    pub fn total(&self) -> Signal<u64> {
        let data = self.data;
        Signal::derive(move || data.with(|d| d.as_ref().map(|d| d.total).unwrap_or(0)))
    }

    pub fn total_pages(&self) -> Signal<u32> {
        let data = self.data;
        let pagination = self.pagination;
        let default_page_size = self.default_page_size;
        Signal::derive(move || {
            let total = data.with(|d| d.as_ref().map(|d| d.total).unwrap_or(0));
            let page_size = pagination
                .with(|p| p.as_ref().map(|p| p.page_size))
                .unwrap_or(default_page_size);
            total.div_ceil(u64::from(page_size.max(1))) as u32
        })
    }

    /// Переход по страницам таблицы с теми же полями формы
    pub fn change_page(&self, current: u32, page_size: u32) {
        let (mut pagination, fields, meta) = self.last_or_default(page_size);
        // при смене размера страницы старый номер может не существовать
        pagination.current = if page_size != pagination.page_size { 1 } else { current.max(1) };
        pagination.page_size = page_size.max(1);
        self.run(pagination, fields, meta);
    }

    /// Смена сортировки таблицы, с первой страницы
    pub fn change_sorter(&self, sorter: Option<Value>) {
        let (mut pagination, fields, meta) = self.last_or_default(self.default_page_size);
        pagination.current = 1;
        pagination.sorter = sorter;
        self.run(pagination, fields, meta);
    }

    pub fn refresh(&self) {
        if let Some(record) = self.params() {
            self.run(record.pagination, record.fields, record.meta);
        }
    }

    fn last_or_default(&self, page_size: u32) -> (PaginationParams, FieldSnapshot, SearchMeta) {
        match self.params() {
            Some(record) => (record.pagination, record.fields, record.meta),
            None => (
                PaginationParams::new(1, page_size),
                FieldSnapshot::new(),
                SearchMeta::default(),
            ),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> RequestEngine for PagedRequest<T> {
    fn run(&self, pagination: PaginationParams, fields: FieldSnapshot, meta: SearchMeta) {
        let record = InvocationRecord {
            pagination,
            fields,
            meta,
        };
        *self.params.borrow_mut() = Some(record.clone());
        self.pagination.set(Some(record.pagination.clone()));
        if let Some(key) = &self.cache_key {
            persist_invocation(&self.cache, key, &record, None);
        }

        let seq = self.request_seq.get() + 1;
        self.request_seq.set(seq);
        self.loading.set(true);
        self.error.set(None);

        let future = (self.service)(record.clone());
        let this = self.clone();
        leptos::task::spawn_local(async move {
            let result = future.await;
            if this.request_seq.get() != seq {
                log::debug!("paged request: response #{seq} superseded");
                return;
            }
            match result {
                Ok(page) => {
                    if let Some(key) = &this.cache_key {
                        persist_invocation(&this.cache, key, &record, Some(page.total));
                    }
                    this.data.set(Some(page));
                }
                Err(e) => {
                    log::warn!("paged request failed: {e}");
                    this.error.set(Some(e));
                }
            }
            this.loading.set(false);
        });
    }

    fn params(&self) -> Option<InvocationRecord> {
        self.params.borrow().clone()
    }
}
