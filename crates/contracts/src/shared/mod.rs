pub mod search_table;
