pub mod click_away;
pub mod components;
pub mod dynamic_list;
pub mod form_adapter;
pub mod form_table;
pub mod paged_request;
pub mod scheduler;
pub mod session_cache;
pub mod signal_form;
