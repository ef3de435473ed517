//! sked scheduling service - integration test support.
//!
//! This crate re-exports the workspace crates so that integration tests can use
//! `sked_test::component::` paths.

pub mod component {
    pub use sked_core::{config, constants, model, util, validation};
    pub use sked_service::{clock, crossing, freetime, recurrence, scheduling};

    pub mod error {
        pub use sked_core::error::{CoreError, CoreResult, ValidationError};
        pub use sked_db::error::{DbError, DbResult};
        pub use sked_service::error::{ServiceError, ServiceResult};
    }

    pub mod db {
        pub use sked_db::{datastore, index, store};
    }

    pub mod app {
        pub use sked_app::bootstrap::{bootstrap, open_store};
    }
}
