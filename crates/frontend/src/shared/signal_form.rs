//! Форма на сигналах Leptos.
//!
//! Значения всех полей лежат в одном `RwSignal<FieldSnapshot>`, поля
//! регистрируются при монтировании и снимаются с регистрации в `on_cleanup`.

use crate::shared::form_adapter::{FieldInstanceLookup, FormController};
use contracts::shared::search_table::FieldSnapshot;
use leptos::prelude::*;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Clone, Copy)]
pub struct SignalForm {
    values: RwSignal<FieldSnapshot>,
    initial: StoredValue<FieldSnapshot>,
    mounted: RwSignal<HashSet<String>>,
    /// legacy-поведение: отдаёт все объявленные поля и требует проверки экземпляра
    legacy: bool,
}

impl SignalForm {
    pub fn new() -> Self {
        Self::build(FieldSnapshot::new(), false)
    }

    /// Начальные значения, к ним же возвращает `reset_fields`
    pub fn with_initial(initial: FieldSnapshot) -> Self {
        Self::build(initial, false)
    }

    /// Форма со старым API: `get_fields_value` отдаёт и скрытые поля,
    /// наличие поля проверяется через реестр смонтированных
    pub fn with_field_registry() -> Self {
        Self::build(FieldSnapshot::new(), true)
    }

    fn build(initial: FieldSnapshot, legacy: bool) -> Self {
        Self {
            values: RwSignal::new(initial.clone()),
            initial: StoredValue::new(initial),
            mounted: RwSignal::new(HashSet::new()),
            legacy,
        }
    }

    pub fn values(&self) -> RwSignal<FieldSnapshot> {
        self.values
    }

    pub fn value(&self, name: &str) -> Value {
        self.values
            .with_untracked(|v| v.get(name).cloned())
            .unwrap_or(Value::Null)
    }

    pub fn set_value(&self, name: &str, value: Value) {
        self.values.update(|v| {
            v.insert(name.to_string(), value);
        });
    }

    pub fn register(&self, name: &str) {
        self.mounted.update(|m| {
            m.insert(name.to_string());
        });
    }

    pub fn unregister(&self, name: &str) {
        self.mounted.update(|m| {
            m.remove(name);
        });
    }

    pub fn is_mounted(&self, name: &str) -> bool {
        self.mounted.with_untracked(|m| m.contains(name))
    }

    /// Двусторонняя привязка текстового поля.
    ///
    /// Вызывать внутри компонента поля: при его размонтировании поле
    /// снимается с регистрации. Пустая строка хранится как `null`.
    pub fn bind_text(&self, name: impl Into<String>) -> RwSignal<String> {
        let form = *self;
        let name: String = name.into();
        form.register(&name);
        let cleanup_name = name.clone();
        on_cleanup(move || form.unregister(&cleanup_name));

        let text = RwSignal::new(value_to_text(&form.value(&name)));

        let field = name.clone();
        Effect::new(move |_| form.apply_text(&field, text.get()));

        Effect::new(move |_| {
            let current = form
                .values
                .with(|v| v.get(&name).map(value_to_text).unwrap_or_default());
            if text.get_untracked() != current {
                text.set(current);
            }
        });

        text
    }

    /// Записывает ввод в форму, если текст поля действительно изменился.
    /// Сравнивается текст, а не `Value`: восстановленные `42` или `true`
    /// остаются своего типа, пока их не отредактируют.
    pub fn apply_text(&self, name: &str, text: String) {
        if value_to_text(&self.value(name)) == text {
            return;
        }
        self.set_value(name, text_to_value(text));
    }
}

impl Default for SignalForm {
    fn default() -> Self {
        Self::new()
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_to_value(text: String) -> Value {
    if text.is_empty() {
        Value::Null
    } else {
        Value::String(text)
    }
}

impl FieldInstanceLookup for SignalForm {
    fn has_field_instance(&self, name: &str) -> bool {
        self.is_mounted(name)
    }
}

impl FormController for SignalForm {
    fn get_fields_value(&self) -> FieldSnapshot {
        let values = self.values.get_untracked();
        if self.legacy {
            return values;
        }
        // Смонтированное, но пустое поле отдаётся как null
        self.mounted.with_untracked(|mounted| {
            mounted
                .iter()
                .map(|name| (name.clone(), values.get(name).cloned().unwrap_or(Value::Null)))
                .collect()
        })
    }

    fn set_fields_value(&self, values: FieldSnapshot) {
        self.values.update(|v| v.extend(values));
    }

    fn reset_fields(&self) {
        let initial = self.initial.get_value();
        self.values.set(initial);
    }

    fn field_instances(&self) -> Option<&dyn FieldInstanceLookup> {
        if self.legacy {
            Some(self)
        } else {
            None
        }
    }
}
