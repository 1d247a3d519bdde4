//! Application state management
//!
//! Contains shared state accessible across all handlers. Collections are
//! reached through the [`Repository`] trait so tests and alternative
//! backends can inject their own storage.

use crate::auth::AdminAccount;
use crate::config::Settings;
use crate::error::AppError;
use crate::models::{
    Appointment, Coach, Contract, LogEntry, Member, Membership, MembershipType, SettingsStore,
    SystemSettings,
};
use crate::store::{MemoryRepository, Repository};
use std::sync::Arc;

/// One repository per collection
#[derive(Clone)]
pub struct Repositories {
    pub coaches: Arc<dyn Repository<Coach>>,
    pub members: Arc<dyn Repository<Member>>,
    pub membership_types: Arc<dyn Repository<MembershipType>>,
    pub memberships: Arc<dyn Repository<Membership>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub contracts: Arc<dyn Repository<Contract>>,
    pub logs: Arc<dyn Repository<LogEntry>>,
}

impl Repositories {
    /// Empty in-memory collections
    pub fn in_memory() -> Self {
        Self {
            coaches: Arc::new(MemoryRepository::<Coach>::new()),
            members: Arc::new(MemoryRepository::<Member>::new()),
            membership_types: Arc::new(MemoryRepository::<MembershipType>::new()),
            memberships: Arc::new(MemoryRepository::<Membership>::new()),
            appointments: Arc::new(MemoryRepository::<Appointment>::new()),
            contracts: Arc::new(MemoryRepository::<Contract>::new()),
            logs: Arc::new(MemoryRepository::<LogEntry>::new()),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub coaches: Arc<dyn Repository<Coach>>,
    pub members: Arc<dyn Repository<Member>>,
    pub membership_types: Arc<dyn Repository<MembershipType>>,
    pub memberships: Arc<dyn Repository<Membership>>,
    pub appointments: Arc<dyn Repository<Appointment>>,
    pub contracts: Arc<dyn Repository<Contract>>,
    pub logs: Arc<dyn Repository<LogEntry>>,

    /// System settings singleton
    pub system_settings: SettingsStore,

    /// The administrator allowed to log in
    pub admin: AdminAccount,

    pub config: Settings,
}

impl AppState {
    /// Build state over the given repositories
    pub fn new(config: Settings, repos: Repositories) -> Result<Self, AppError> {
        let admin = AdminAccount::from_config(&config.auth)?;

        Ok(Self {
            coaches: repos.coaches,
            members: repos.members,
            membership_types: repos.membership_types,
            memberships: repos.memberships,
            appointments: repos.appointments,
            contracts: repos.contracts,
            logs: repos.logs,
            system_settings: SettingsStore::new(&SystemSettings::default()),
            admin,
            config,
        })
    }

    /// State over fresh, empty in-memory collections
    pub fn in_memory(config: Settings) -> Result<Self, AppError> {
        Self::new(config, Repositories::in_memory())
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
