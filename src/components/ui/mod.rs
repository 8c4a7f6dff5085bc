pub mod button;
pub mod card;
pub mod label;
pub mod switch;

// Re-export component symbols so callers can `use crate::components::ui::Button` etc.
pub use button::*;
#[allow(unused_imports)]
pub use card::*;
pub use label::*;
pub use switch::*;
