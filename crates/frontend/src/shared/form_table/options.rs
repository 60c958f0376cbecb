use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Настройки связки формы и таблицы
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormTableOptions {
    /// Размер страницы для первого запроса, если в кэше нет своего
    pub default_page_size: u32,
    /// Не запрашивать данные при монтировании (если нечего восстанавливать)
    pub manual: bool,
    /// Ключ страницы в sessionStorage; без ключа кэш не используется
    pub cache_key: Option<String>,
}

impl Default for FormTableOptions {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            manual: false,
            cache_key: None,
        }
    }
}

impl FormTableOptions {
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size.max(1);
        self
    }

    pub fn manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }
}
