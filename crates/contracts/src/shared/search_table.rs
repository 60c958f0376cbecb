//! Общие типы связки "форма поиска + пагинированная таблица".
//!
//! Формат JSON совпадает с тем, что лежит в sessionStorage под ключом
//! `__paged__<key>`, поэтому все поля в camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Снимок значений полей формы: имя поля -> значение
pub type FieldSnapshot = Map<String, Value>;

/// Режим формы поиска
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Simple,
    Advance,
}

impl SearchMode {
    /// Противоположный режим
    pub fn toggled(self) -> Self {
        match self {
            SearchMode::Simple => SearchMode::Advance,
            SearchMode::Advance => SearchMode::Simple,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Simple => "simple",
            SearchMode::Advance => "advance",
        }
    }
}

/// Параметры пагинации запроса. `current` начинается с 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub current: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<Value>,
    /// Прочие поля (фильтры таблицы и т.п.), передаются как есть
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaginationParams {
    pub fn new(current: u32, page_size: u32) -> Self {
        Self {
            current: current.max(1),
            page_size: page_size.max(1),
            sorter: None,
            extra: Map::new(),
        }
    }

    /// Та же пагинация, но с первой страницы
    pub fn first_page(&self) -> Self {
        Self {
            current: 1,
            ..self.clone()
        }
    }
}

/// Служебные данные формы, передаются третьим аргументом в `run`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    #[serde(default)]
    pub all_form_data: FieldSnapshot,
    #[serde(rename = "type", default)]
    pub mode: SearchMode,
}

/// Аргументы последнего вызова движка запросов
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRecord {
    pub pagination: PaginationParams,
    pub fields: FieldSnapshot,
    pub meta: SearchMeta,
}

/// Запись кэша страницы в sessionStorage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(default = "first_page")]
    pub current: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<Value>,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_data: Option<FieldSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_form_data: Option<FieldSnapshot>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SearchMode>,
    /// Общее количество записей на момент последнего ответа
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn first_page() -> u32 {
    1
}

impl CacheEntry {
    /// Запись из аргументов вызова. Новая запись всегда неактивна.
    pub fn from_invocation(record: &InvocationRecord, count: Option<u64>) -> Self {
        Self {
            current: record.pagination.current,
            page_size: Some(record.pagination.page_size),
            sorter: record.pagination.sorter.clone(),
            active: false,
            form_data: Some(record.fields.clone()),
            all_form_data: Some(record.meta.all_form_data.clone()),
            mode: Some(record.meta.mode),
            count,
            extra: record.pagination.extra.clone(),
        }
    }

    /// Восстанавливает аргументы вызова. Если `pageSize` был сброшен,
    /// используется `default_page_size`.
    pub fn to_invocation(&self, default_page_size: u32) -> InvocationRecord {
        let mut pagination =
            PaginationParams::new(self.current, self.page_size.unwrap_or(default_page_size));
        pagination.sorter = self.sorter.clone();
        pagination.extra = self.extra.clone();

        InvocationRecord {
            pagination,
            fields: self.form_data.clone().unwrap_or_default(),
            meta: SearchMeta {
                all_form_data: self.all_form_data.clone().unwrap_or_default(),
                mode: self.mode.unwrap_or_default(),
            },
        }
    }
}

/// Страница данных, которую возвращает сервис
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedData<T> {
    pub total: u64,
    pub list: Vec<T>,
}

impl<T> Default for PagedData<T> {
    fn default() -> Self {
        Self {
            total: 0,
            list: Vec::new(),
        }
    }
}
