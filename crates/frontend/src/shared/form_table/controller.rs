//! Синхронизация формы поиска с пагинированным запросом.
//!
//! Контроллер хранит режим формы (simple/advance) и накопленные значения полей
//! обоих режимов. Поля скрытого режима не смонтированы, поэтому перед
//! переключением значения снимаются в общий снимок, а после — возвращаются в форму.
//!
//! Чтение полей при submit и восстановление после смены режима откладываются
//! через [`Scheduler`]: к этому моменту успевают примениться синхронные
//! обновления полей из того же события и отрисоваться поля нового режима.

use super::options::FormTableOptions;
use crate::shared::form_adapter::FormAdapter;
use crate::shared::paged_request::RequestEngine;
use crate::shared::scheduler::Scheduler;
use contracts::shared::search_table::{FieldSnapshot, PaginationParams, SearchMeta, SearchMode};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Idle,
    /// Есть отложенные submit, которые ещё не отправили запрос
    Submitting,
}

struct SearchState {
    mode: SearchMode,
    all_form_data: FieldSnapshot,
    phase: Phase,
    pending_submits: usize,
    initialized: bool,
}

struct Inner {
    form: FormAdapter,
    engine: Rc<dyn RequestEngine>,
    scheduler: Rc<dyn Scheduler>,
    options: FormTableOptions,
    state: RefCell<SearchState>,
    on_mode_change: RefCell<Option<Box<dyn Fn(SearchMode)>>>,
}

#[derive(Clone)]
pub struct FormSearchController {
    inner: Rc<Inner>,
}

impl FormSearchController {
    /// Режим и накопленные значения берутся из последнего вызова движка, если он был
    pub fn new(
        form: FormAdapter,
        engine: Rc<dyn RequestEngine>,
        scheduler: Rc<dyn Scheduler>,
        options: FormTableOptions,
    ) -> Self {
        let meta = engine.params().map(|record| record.meta).unwrap_or_default();

        Self {
            inner: Rc::new(Inner {
                form,
                engine,
                scheduler,
                options,
                state: RefCell::new(SearchState {
                    mode: meta.mode,
                    all_form_data: meta.all_form_data,
                    phase: Phase::Initializing,
                    pending_submits: 0,
                    initialized: false,
                }),
                on_mode_change: RefCell::new(None),
            }),
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.inner.state.borrow().mode
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// Все значения, снятые с формы в обоих режимах
    pub fn all_form_data(&self) -> FieldSnapshot {
        self.inner.state.borrow().all_form_data.clone()
    }

    pub fn options(&self) -> &FormTableOptions {
        &self.inner.options
    }

    pub fn on_mode_change(&self, callback: impl Fn(SearchMode) + 'static) {
        *self.inner.on_mode_change.borrow_mut() = Some(Box::new(callback));
    }

    /// Первый запуск. Повторные вызовы игнорируются.
    ///
    /// Сохранённый вызов движка (возврат на страницу) всегда важнее
    /// автоматического submit.
    pub fn initialize(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.initialized {
                return;
            }
            state.initialized = true;
        }

        self.schedule_restore();

        if let Some(record) = self.inner.engine.params() {
            log::debug!(
                "form table: replay page {} ({})",
                record.pagination.current,
                record.meta.mode.as_str()
            );
            self.inner.state.borrow_mut().phase = Phase::Idle;
            self.inner
                .engine
                .run(record.pagination, record.fields, record.meta);
            return;
        }

        if self.inner.options.manual {
            self.inner.state.borrow_mut().phase = Phase::Idle;
        } else {
            self.submit();
        }
    }

    /// Переключает simple/advance, не теряя введённых значений
    pub fn change_type(&self) {
        let current = self.inner.form.get_active_field_values();
        let mode = {
            let mut state = self.inner.state.borrow_mut();
            state.all_form_data.extend(current);
            state.mode = state.mode.toggled();
            state.mode
        };
        log::debug!("form table: mode -> {}", mode.as_str());

        if let Some(callback) = self.inner.on_mode_change.borrow().as_ref() {
            callback(mode);
        }
        self.schedule_restore();
    }

    /// Отправка из DOM-события: штатное действие (отправка формы) отменяется
    pub fn submit_event(&self, ev: &web_sys::Event) {
        ev.prevent_default();
        self.submit();
    }

    /// Запрос с первой страницы с текущими значениями формы.
    ///
    /// Параллельные submit не схлопываются: каждый отправит свой запрос.
    pub fn submit(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.pending_submits += 1;
            state.phase = Phase::Submitting;
        }

        let this = self.clone();
        self.inner.scheduler.defer(Box::new(move || this.dispatch()));
    }

    /// Очищает форму и перезапрашивает данные с пустыми полями
    pub fn reset(&self) {
        self.inner.form.reset_field_values();
        self.submit();
    }

    fn dispatch(&self) {
        let fields = self.inner.form.get_active_field_values();
        let meta = {
            let mut state = self.inner.state.borrow_mut();
            state.all_form_data.extend(fields.clone());
            state.pending_submits = state.pending_submits.saturating_sub(1);
            if state.pending_submits == 0 {
                state.phase = Phase::Idle;
            }
            SearchMeta {
                all_form_data: state.all_form_data.clone(),
                mode: state.mode,
            }
        };

        // Сортировка и фильтры таблицы сохраняются, страница — первая
        let pagination = match self.inner.engine.params() {
            Some(last) => last.pagination.first_page(),
            None => PaginationParams::new(1, self.inner.options.default_page_size),
        };

        log::debug!(
            "form table: submit {} field(s), page size {}",
            fields.len(),
            pagination.page_size
        );
        self.inner.engine.run(pagination, fields, meta);
    }

    fn schedule_restore(&self) {
        let this = self.clone();
        self.inner.scheduler.defer(Box::new(move || {
            let snapshot = this.all_form_data();
            this.inner.form.restore_field_values(&snapshot);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::form_adapter::tests::FakeForm;
    use crate::shared::paged_request::tests::RecordingEngine;
    use crate::shared::scheduler::ManualScheduler;
    use contracts::shared::search_table::InvocationRecord;
    use proptest::prelude::*;
    use serde_json::json;

    struct Harness {
        form: Rc<FakeForm>,
        engine: Rc<RecordingEngine>,
        scheduler: Rc<ManualScheduler>,
        controller: FormSearchController,
    }

    fn harness(form: FakeForm, engine: RecordingEngine, options: FormTableOptions) -> Harness {
        let form = Rc::new(form);
        let engine = Rc::new(engine);
        let scheduler = Rc::new(ManualScheduler::new());
        let controller = FormSearchController::new(
            FormAdapter::new(form.clone()),
            engine.clone(),
            scheduler.clone(),
            options,
        );
        Harness {
            form,
            engine,
            scheduler,
            controller,
        }
    }

    fn snapshot(pairs: &[(&str, serde_json::Value)]) -> FieldSnapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_initial_submit_without_cache() {
        let h = harness(
            FakeForm::modern(),
            RecordingEngine::default(),
            FormTableOptions::default().with_default_page_size(5),
        );
        h.controller.initialize();
        assert_eq!(h.controller.phase(), Phase::Submitting);
        assert!(h.engine.calls().is_empty());

        h.scheduler.run_pending();

        assert_eq!(
            h.engine.calls(),
            vec![InvocationRecord {
                pagination: PaginationParams::new(1, 5),
                fields: FieldSnapshot::new(),
                meta: SearchMeta {
                    all_form_data: FieldSnapshot::new(),
                    mode: SearchMode::Simple,
                },
            }]
        );
        assert_eq!(h.controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_manual_does_not_fetch() {
        let h = harness(
            FakeForm::modern(),
            RecordingEngine::default(),
            FormTableOptions::default().manual(true),
        );
        h.controller.initialize();
        h.scheduler.run_pending();
        assert!(h.engine.calls().is_empty());
        assert_eq!(h.controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_prior_invocation_is_replayed() {
        let mut pagination = PaginationParams::new(4, 20);
        pagination.sorter = Some(json!({"field": "email", "order": "ascend"}));
        let prior = InvocationRecord {
            pagination,
            fields: snapshot(&[("name", json!("ann"))]),
            meta: SearchMeta {
                all_form_data: snapshot(&[("name", json!("ann")), ("phone", json!("42"))]),
                mode: SearchMode::Advance,
            },
        };

        let h = harness(
            FakeForm::modern(),
            RecordingEngine::with_prior(prior.clone()),
            FormTableOptions::default(),
        );
        assert_eq!(h.controller.mode(), SearchMode::Advance);
        assert_eq!(h.controller.all_form_data(), prior.meta.all_form_data);

        h.controller.initialize();
        h.scheduler.run_pending();

        // manual = false, но свежего submit нет
        assert_eq!(h.engine.calls(), vec![prior.clone()]);
        // значения вернулись в форму
        assert_eq!(h.form.writes.borrow()[0], prior.meta.all_form_data);
    }

    #[test]
    fn test_initialize_runs_once() {
        let h = harness(FakeForm::modern(), RecordingEngine::default(), FormTableOptions::default());
        h.controller.initialize();
        h.controller.initialize();
        h.scheduler.run_pending();
        assert_eq!(h.engine.calls().len(), 1);
    }

    #[test]
    fn test_submit_resets_page_and_keeps_sorter() {
        let mut pagination = PaginationParams::new(7, 50);
        pagination.sorter = Some(json!({"field": "name"}));
        pagination.extra.insert("filters".into(), json!({"gender": ["male"]}));
        let prior = InvocationRecord {
            pagination,
            fields: FieldSnapshot::new(),
            meta: SearchMeta::default(),
        };

        let h = harness(
            FakeForm::modern(),
            RecordingEngine::with_prior(prior),
            FormTableOptions::default().with_default_page_size(5),
        );
        h.form.mount(&["name"]);
        h.form.set("name", json!("bob"));

        h.controller.submit();
        h.scheduler.run_pending();

        let last = h.engine.calls().pop().unwrap();
        assert_eq!(last.pagination.current, 1);
        assert_eq!(last.pagination.page_size, 50);
        assert_eq!(last.pagination.sorter, Some(json!({"field": "name"})));
        assert_eq!(last.pagination.extra.get("filters"), Some(&json!({"gender": ["male"]})));
        assert_eq!(last.fields, snapshot(&[("name", json!("bob"))]));
    }

    #[test]
    fn test_submit_reads_values_after_event() {
        let h = harness(FakeForm::modern(), RecordingEngine::default(), FormTableOptions::default());
        h.form.mount(&["gender"]);

        h.controller.submit();
        // обновление поля из того же события приходит после вызова submit
        h.form.set("gender", json!("female"));
        h.scheduler.run_pending();

        assert_eq!(h.engine.calls()[0].fields, snapshot(&[("gender", json!("female"))]));
    }

    #[test]
    fn test_overlapping_submits_both_run() {
        let h = harness(FakeForm::modern(), RecordingEngine::default(), FormTableOptions::default());
        h.controller.submit();
        h.controller.submit();
        assert_eq!(h.scheduler.pending(), 2);

        h.scheduler.run_pending();
        assert_eq!(h.engine.calls().len(), 2);
        assert_eq!(h.controller.phase(), Phase::Idle);
    }

    #[test]
    fn test_reset_submits_empty_fields() {
        let h = harness(FakeForm::modern(), RecordingEngine::default(), FormTableOptions::default());
        h.form.mount(&["name", "gender"]);
        h.form.set("name", json!("ann"));
        h.form.set("gender", json!("male"));

        h.controller.reset();
        h.scheduler.run_pending();

        let calls = h.engine.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].fields.is_empty());
    }

    #[test]
    fn test_change_type_keeps_hidden_values() {
        let h = harness(FakeForm::legacy(), RecordingEngine::default(), FormTableOptions::default());
        let modes = Rc::new(RefCell::new(Vec::new()));
        let seen = modes.clone();
        h.controller.on_mode_change(move |mode| seen.borrow_mut().push(mode));

        // simple: gender + name
        h.form.mount(&["gender", "name"]);
        h.form.set("gender", json!("male"));
        h.form.set("name", json!("ann"));
        h.controller.change_type();
        assert_eq!(h.controller.mode(), SearchMode::Advance);

        // advance: name + email + phone
        h.form.mount(&["name", "email", "phone"]);
        h.scheduler.run_pending();
        assert_eq!(
            h.form.writes.borrow().last().unwrap(),
            &snapshot(&[("name", json!("ann"))])
        );

        h.form.set("email", json!("a@b.c"));
        h.controller.change_type();
        assert_eq!(h.controller.mode(), SearchMode::Simple);
        assert_eq!(*modes.borrow(), vec![SearchMode::Advance, SearchMode::Simple]);

        let all = h.controller.all_form_data();
        assert_eq!(all.get("gender"), Some(&json!("male")));
        assert_eq!(all.get("email"), Some(&json!("a@b.c")));

        h.form.mount(&["gender", "name"]);
        h.controller.submit();
        h.scheduler.run_pending();
        let call = h.engine.calls().pop().unwrap();
        assert_eq!(call.meta.mode, SearchMode::Simple);
        assert_eq!(call.meta.all_form_data.len(), 3);
        assert_eq!(call.fields.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_merged_keys_never_shrink(steps in proptest::collection::vec(
            (proptest::collection::btree_map("[a-e]", 0i64..100, 0..4), any::<bool>()),
            1..20,
        )) {
            let h = harness(FakeForm::modern(), RecordingEngine::default(), FormTableOptions::default());
            let mut seen = std::collections::BTreeSet::new();

            for (values, toggle) in steps {
                let names: Vec<&str> = values.keys().map(String::as_str).collect();
                h.form.mount(&names);
                for (name, value) in &values {
                    h.form.set(name, json!(value));
                    seen.insert(name.clone());
                }
                if toggle {
                    h.controller.change_type();
                } else {
                    h.controller.submit();
                }
                h.scheduler.run_pending();

                let all = h.controller.all_form_data();
                for name in &seen {
                    prop_assert!(all.contains_key(name));
                }
                for (name, value) in &values {
                    prop_assert_eq!(all.get(name), Some(&json!(value)));
                }
            }
        }
    }
}
