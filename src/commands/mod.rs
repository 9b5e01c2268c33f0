pub mod delete;
pub mod edit;
pub mod hours;
pub mod new;
pub mod slots;
pub mod week;
