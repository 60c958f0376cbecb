//! Единый интерфейс к внешнему контроллеру формы.
//!
//! Встречаются две несовместимые формы API:
//! - legacy: отдаёт значения всех объявленных полей, в том числе не смонтированных,
//!   и требует проверять наличие экземпляра поля перед чтением/записью;
//! - modern: сам знает, какие поля отображаются, проверки не нужны.
//!
//! Вариант выбирается один раз при создании адаптера по наличию
//! [`FormController::field_instances`].

use contracts::shared::search_table::FieldSnapshot;
use std::rc::Rc;

/// Поиск живого экземпляра поля (legacy API)
pub trait FieldInstanceLookup {
    fn has_field_instance(&self, name: &str) -> bool;
}

/// Контроллер формы, которым владеет вызывающая сторона
pub trait FormController {
    fn get_fields_value(&self) -> FieldSnapshot;
    fn set_fields_value(&self, values: FieldSnapshot);
    fn reset_fields(&self);

    /// `Some` только у legacy-контроллеров
    fn field_instances(&self) -> Option<&dyn FieldInstanceLookup> {
        None
    }
}

#[derive(Clone)]
pub enum FormAdapter {
    Legacy(Rc<dyn FormController>),
    Modern(Rc<dyn FormController>),
}

impl FormAdapter {
    pub fn new(form: Rc<dyn FormController>) -> Self {
        if form.field_instances().is_some() {
            FormAdapter::Legacy(form)
        } else {
            FormAdapter::Modern(form)
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, FormAdapter::Legacy(_))
    }

    /// Значения только отображаемых сейчас полей
    pub fn get_active_field_values(&self) -> FieldSnapshot {
        match self {
            FormAdapter::Legacy(form) => only_mounted(form.as_ref(), form.get_fields_value()),
            FormAdapter::Modern(form) => form.get_fields_value(),
        }
    }

    pub fn restore_field_values(&self, snapshot: &FieldSnapshot) {
        match self {
            FormAdapter::Legacy(form) => {
                // Запись в несмонтированное поле legacy API не допускает
                form.set_fields_value(only_mounted(form.as_ref(), snapshot.clone()))
            }
            FormAdapter::Modern(form) => form.set_fields_value(snapshot.clone()),
        }
    }

    pub fn reset_field_values(&self) {
        match self {
            FormAdapter::Legacy(form) | FormAdapter::Modern(form) => form.reset_fields(),
        }
    }
}

fn only_mounted(form: &dyn FormController, values: FieldSnapshot) -> FieldSnapshot {
    let Some(lookup) = form.field_instances() else {
        return values;
    };
    values
        .into_iter()
        .filter(|(name, _)| lookup.has_field_instance(name))
        .collect()
}
