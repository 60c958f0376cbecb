//! Список с устойчивыми ключами для динамических форм.
//!
//! Ключ элемента не меняется при вставках, удалениях и перестановках, поэтому
//! его можно использовать в именах полей формы (`params.0.list.<key>.name`).
//! Поля удалённых элементов остаются в значениях формы; [`DynamicList::sort_form`]
//! выбирает из них живые элементы в текущем порядке.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicList<T> {
    items: Vec<T>,
    keys: Vec<u64>,
    next_key: u64,
}

impl<T> DynamicList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self {
            items: Vec::new(),
            keys: Vec::new(),
            next_key: 0,
        };
        list.reset_list(items);
        list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Заменяет весь список, ключи выдаются заново
    pub fn reset_list(&mut self, items: Vec<T>) {
        self.keys = (0..items.len()).map(|_| self.generate_key()).collect();
        self.items = items;
    }

    pub fn get_key(&self, index: usize) -> Option<u64> {
        self.keys.get(index).copied()
    }

    pub fn get_index(&self, key: u64) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }

    pub fn push(&mut self, item: T) -> u64 {
        let key = self.generate_key();
        self.items.push(item);
        self.keys.push(key);
        key
    }

    pub fn unshift(&mut self, item: T) -> u64 {
        self.insert(0, item)
    }

    /// Вставка перед `index`; индекс за концом списка — в конец
    pub fn insert(&mut self, index: usize, item: T) -> u64 {
        let index = index.min(self.items.len());
        let key = self.generate_key();
        self.items.insert(index, item);
        self.keys.insert(index, key);
        key
    }

    pub fn insert_before(&mut self, index: usize, item: T) -> u64 {
        self.insert(index, item)
    }

    pub fn insert_after(&mut self, index: usize, item: T) -> u64 {
        self.insert(index + 1, item)
    }

    /// Замена значения с сохранением ключа
    pub fn replace(&mut self, index: usize, item: T) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        self.keys.remove(index);
        Some(self.items.remove(index))
    }

    pub fn pop(&mut self) -> Option<T> {
        self.keys.pop();
        self.items.pop()
    }

    pub fn shift(&mut self) -> Option<T> {
        self.remove(0)
    }

    /// Перенос элемента вместе с ключом
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> bool {
        let len = self.items.len();
        if old_index >= len || new_index >= len {
            return false;
        }
        let item = self.items.remove(old_index);
        let key = self.keys.remove(old_index);
        self.items.insert(new_index, item);
        self.keys.insert(new_index, key);
        true
    }

    /// Из значений формы, индексированных ключами (массив или объект),
    /// собирает значения живых элементов в порядке списка
    pub fn sort_form(&self, form_values: &Value) -> Vec<Value> {
        self.keys
            .iter()
            .filter_map(|key| match form_values {
                Value::Array(values) => values.get(*key as usize).cloned(),
                Value::Object(values) => values.get(&key.to_string()).cloned(),
                _ => None,
            })
            .filter(|value| !value.is_null())
            .collect()
    }

    fn generate_key(&mut self) -> u64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }
}

impl<T> Default for DynamicList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_survive_reordering() {
        let mut list = DynamicList::new(vec!["a", "b", "c"]);
        assert_eq!(list.get_key(1), Some(1));

        list.move_item(0, 2);
        assert_eq!(list.items(), &["b", "c", "a"]);
        assert_eq!(list.get_index(0), Some(2));

        list.remove(0);
        assert_eq!(list.items(), &["c", "a"]);
        assert_eq!(list.get_key(0), Some(2));
    }

    #[test]
    fn test_new_items_get_fresh_keys() {
        let mut list = DynamicList::new(vec![1]);
        list.remove(0);
        assert_eq!(list.push(2), 1);
        assert_eq!(list.insert(0, 3), 2);
        assert_eq!(list.insert_after(0, 4), 3);
        assert_eq!(list.items(), &[3, 4, 2]);
        assert_eq!(list.insert(99, 5), 4);
        assert_eq!(list.items().last(), Some(&5));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut list = DynamicList::new(vec![1, 2]);
        assert!(list.remove(5).is_none());
        assert!(!list.move_item(0, 2));
        assert!(!list.replace(2, 9));
        assert!(list.replace(1, 9));
        assert_eq!(list.items(), &[1, 9]);
        assert_eq!(list.get_key(1), Some(1));
    }

    #[test]
    fn test_reset_list_regenerates_keys() {
        let mut list = DynamicList::new(vec!["a"]);
        list.reset_list(vec!["x", "y"]);
        assert_eq!(list.get_key(0), Some(1));
        assert_eq!(list.get_key(1), Some(2));
        assert_eq!(list.shift(), Some("x"));
        assert_eq!(list.pop(), Some("y"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_sort_form_orders_by_keys() {
        let mut list = DynamicList::new(vec![(), (), ()]);
        list.remove(1);
        list.move_item(1, 0);

        // ключ 1 удалён, его поля остались в форме
        let values = json!([{"name": "a"}, {"name": "b"}, {"name": "c"}]);
        assert_eq!(list.sort_form(&values), vec![json!({"name": "c"}), json!({"name": "a"})]);

        let values = json!({"0": {"name": "a"}, "2": null});
        assert_eq!(list.sort_form(&values), vec![json!({"name": "a"})]);
    }
}
