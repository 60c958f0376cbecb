//! Кэш состояния пагинированных страниц в sessionStorage.
//!
//! Одна JSON-запись на страницу, ключ `__paged__<key>`. Запись с `active = true`
//! читается при следующем монтировании страницы и восстанавливает последний запрос
//! (например, при возврате назад со страницы деталей).

use contracts::shared::search_table::CacheEntry;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

const KEY_PREFIX: &str = "__paged__";

/// Синхронное key-value хранилище уровня вкладки
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("invalid cache entry: {0}")]
    Json(#[from] serde_json::Error),
}

/// `window.sessionStorage`
pub struct BrowserSessionStore {
    storage: web_sys::Storage,
}

impl BrowserSessionStore {
    /// `None`, если sessionStorage недоступен (нет window, запрещён браузером)
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.session_storage().ok().flatten()?;
        Some(Self { storage })
    }
}

impl SessionStore for BrowserSessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.storage
            .get_item(key)
            .map_err(|e| CacheError::Storage(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| CacheError::Storage(format!("{e:?}")))
    }
}

/// Хранилище в памяти: для тестов и окружений без sessionStorage
#[derive(Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Как менять запись при активации
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheReset {
    /// Только выставить `active`
    #[default]
    Keep,
    /// Первая страница, без pageSize/_count и сортировки. Фильтры остаются.
    Full,
    /// Поверхностно наложить поля поверх записи
    Merge(Map<String, Value>),
}

impl From<bool> for CacheReset {
    fn from(reset: bool) -> Self {
        if reset {
            CacheReset::Full
        } else {
            CacheReset::Keep
        }
    }
}

impl From<Map<String, Value>> for CacheReset {
    fn from(fields: Map<String, Value>) -> Self {
        CacheReset::Merge(fields)
    }
}

pub fn cache_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Протокол чтения/записи кэша поверх подключённого хранилища.
///
/// Без хранилища все операции ничего не делают.
#[derive(Clone, Default)]
pub struct SessionCache {
    store: Option<Rc<dyn SessionStore>>,
}

impl SessionCache {
    pub fn new(store: Option<Rc<dyn SessionStore>>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        let store = BrowserSessionStore::open().map(|s| Rc::new(s) as Rc<dyn SessionStore>);
        if store.is_none() {
            log::debug!("sessionStorage unavailable, paged cache disabled");
        }
        Self { store }
    }

    pub fn memory() -> Self {
        Self {
            store: Some(Rc::new(MemoryStore::new())),
        }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    /// Типизированная запись. Отсутствие или битый JSON — промах.
    pub fn load(&self, key: &str) -> Option<CacheEntry> {
        let raw = self.read_raw(key)?;
        match serde_json::from_value::<CacheEntry>(Value::Object(raw)) {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("paged cache '{key}': {}", CacheError::from(e));
                None
            }
        }
    }

    pub fn save(&self, key: &str, entry: &CacheEntry) {
        match serde_json::to_value(entry) {
            Ok(Value::Object(raw)) => self.write_raw(key, &raw),
            Ok(_) => {}
            Err(e) => log::warn!("paged cache '{key}': {}", CacheError::from(e)),
        }
    }

    /// Активирует запись страницы `key` для восстановления при следующем монтировании.
    pub fn activate(&self, key: &str, reset: impl Into<CacheReset>) {
        let Some(mut entry) = self.read_raw(key) else {
            return;
        };
        entry.insert("active".into(), Value::Bool(true));

        match reset.into() {
            CacheReset::Keep => {}
            CacheReset::Full => {
                entry.remove("_count");
                entry.remove("pageSize");
                entry.insert("current".into(), Value::from(1));
                entry.insert("sorter".into(), Value::Object(Map::new()));
            }
            CacheReset::Merge(fields) => entry.extend(fields),
        }

        self.write_raw(key, &entry);
    }

    /// Сырая запись как JSON-объект. Записи — непрозрачный JSON для протокола.
    pub fn read_raw(&self, key: &str) -> Option<Map<String, Value>> {
        match self.try_read(key) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("paged cache '{key}': {e}");
                None
            }
        }
    }

    pub fn write_raw(&self, key: &str, entry: &Map<String, Value>) {
        if let Err(e) = self.try_write(key, entry) {
            log::warn!("paged cache '{key}': {e}");
        }
    }

    fn try_read(&self, key: &str) -> Result<Option<Map<String, Value>>, CacheError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(None);
        };
        let Some(raw) = store.get_item(&cache_key(key))? else {
            return Ok(None);
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Ok(None),
        }
    }

    fn try_write(&self, key: &str, entry: &Map<String, Value>) -> Result<(), CacheError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(());
        };
        let raw = serde_json::to_string(entry)?;
        store.set_item(&cache_key(key), &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded(key: &str, value: Value) -> (SessionCache, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new());
        store
            .set_item(&cache_key(key), &value.to_string())
            .unwrap();
        (SessionCache::new(Some(store.clone() as Rc<dyn SessionStore>)), store)
    }

    fn stored(store: &MemoryStore, key: &str) -> Value {
        let raw = store.get_item(&cache_key(key)).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_cache_key_prefix() {
        assert_eq!(cache_key("users"), "__paged__users");
    }

    #[test]
    fn test_activate_full_reset() {
        let (cache, store) = seeded(
            "users",
            json!({"current": 5, "pageSize": 20, "sorter": {"x": 1}, "foo": "bar"}),
        );
        cache.activate("users", true);
        assert_eq!(
            stored(&store, "users"),
            json!({"current": 1, "sorter": {}, "foo": "bar", "active": true})
        );
    }

    #[test]
    fn test_activate_full_reset_drops_count() {
        let (cache, store) = seeded("users", json!({"current": 3, "_count": 40}));
        cache.activate("users", CacheReset::Full);
        let value = stored(&store, "users");
        assert!(value.get("_count").is_none());
        assert_eq!(value["current"], json!(1));
    }

    #[test]
    fn test_activate_selective_merge() {
        let (cache, store) = seeded(
            "users",
            json!({"current": 5, "pageSize": 20, "sorter": {"x": 1}, "foo": "bar"}),
        );
        let mut patch = Map::new();
        patch.insert("current".into(), json!(2));
        cache.activate("users", patch);
        assert_eq!(
            stored(&store, "users"),
            json!({"current": 2, "pageSize": 20, "sorter": {"x": 1}, "foo": "bar", "active": true})
        );
    }

    #[test]
    fn test_activate_keep() {
        let (cache, store) = seeded("users", json!({"current": 4, "pageSize": 10}));
        cache.activate("users", false);
        assert_eq!(
            stored(&store, "users"),
            json!({"current": 4, "pageSize": 10, "active": true})
        );
    }

    #[test]
    fn test_activate_missing_entry_is_noop() {
        let store = Rc::new(MemoryStore::new());
        let cache = SessionCache::new(Some(store.clone() as Rc<dyn SessionStore>));
        cache.activate("absent", true);
        assert_eq!(store.get_item(&cache_key("absent")).unwrap(), None);
    }

    #[test]
    fn test_malformed_entry_is_miss() {
        let store = Rc::new(MemoryStore::new());
        store.set_item(&cache_key("broken"), "{not json").unwrap();
        store.set_item(&cache_key("array"), "[1, 2]").unwrap();
        let cache = SessionCache::new(Some(store.clone() as Rc<dyn SessionStore>));

        cache.activate("broken", true);
        cache.activate("array", true);
        assert_eq!(store.get_item(&cache_key("broken")).unwrap().as_deref(), Some("{not json"));
        assert!(cache.load("broken").is_none());
        assert!(cache.load("array").is_none());
    }

    #[test]
    fn test_no_store_is_silent() {
        let cache = SessionCache::new(None);
        assert!(!cache.is_available());
        cache.activate("users", true);
        cache.write_raw("users", &Map::new());
        assert!(cache.load("users").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let cache = SessionCache::memory();
        let entry: CacheEntry =
            serde_json::from_value(json!({"current": 2, "pageSize": 5, "type": "advance"})).unwrap();
        cache.save("orders", &entry);
        assert_eq!(cache.load("orders"), Some(entry));
    }
}
