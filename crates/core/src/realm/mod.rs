//! Classpath realm isolation.
//!
//! One realm per loaded runtime version, child realms per component
//! instantiation. Provider realms delegate parent-first to the host.

mod manager;
mod realm;

pub use manager::{RealmManager, StagedRealm};
pub use realm::{Delegation, Realm};
