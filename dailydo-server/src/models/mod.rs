//! Domain models with validation at construction
//!
//! Request bodies are decoded into [`TodoPayload`] and only become a
//! [`NewTodo`] once the content length has been checked.

pub mod todo;
pub mod validation;

pub use todo::{NewTodo, Todo, TodoContent, TodoPayload};
pub use validation::ValidationError;
