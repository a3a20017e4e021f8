//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod application_store;
mod applications_command;
mod applications_query;

pub use application_store::{ApplicationStore, ApplicationStoreError};
#[cfg(test)]
pub use application_store::MockApplicationStore;
pub use applications_command::ApplicationsCommand;
#[cfg(test)]
pub use applications_command::MockApplicationsCommand;
pub use applications_query::ApplicationsQuery;
#[cfg(test)]
pub use applications_query::MockApplicationsQuery;
