pub mod click_away;
pub mod dynamic_list;
pub mod form_table;

pub use click_away::ClickAwayDemo;
pub use dynamic_list::DynamicListDemo;
pub use form_table::FormTableDemo;
