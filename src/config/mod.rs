pub mod types;
pub mod loader;
pub mod validator;
pub mod resolved;
pub mod builtin;
pub mod settings;

pub use types::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;
pub use builtin::*;
pub use settings::*;
