//! CRUD services: config-described record types served over HTTP, stored in SQLite.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod service;
pub mod session;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{
    items_entity, load_entities_from_path, resolve, tasks_entity, EntityConfig, ResolvedEntity, ResolvedModel,
    Settings,
};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use service::CrudService;
pub use session::{PoolSessions, Session, SessionProvider, SharedSession};
pub use state::{AppState, ServiceInfo};
pub use store::connect;
