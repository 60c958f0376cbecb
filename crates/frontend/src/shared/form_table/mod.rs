pub mod controller;
pub mod hook;
pub mod options;

pub use controller::{FormSearchController, Phase};
pub use hook::{use_form_table, FormTable};
pub use options::FormTableOptions;
