//! Tenant scoping.
//!
//! Arkivo threads an explicit scope value through every pipeline call instead
//! of relying on ambient "current tenant" process state. A scope is either a
//! single tenant or the whole installation; the latter is used for
//! installation-wide backups and leaves data-store queries unscoped.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// The scope under which data-store queries and storage paths are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantScope {
    /// No tenant: installation-wide operation over all tenants' data.
    Installation,
    /// Scoped to one tenant.
    Tenant(Uuid),
}

impl TenantScope {
    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            TenantScope::Installation => None,
            TenantScope::Tenant(id) => Some(*id),
        }
    }

    pub fn is_installation(&self) -> bool {
        matches!(self, TenantScope::Installation)
    }
}

impl From<Option<Uuid>> for TenantScope {
    fn from(tenant_id: Option<Uuid>) -> Self {
        match tenant_id {
            Some(id) => TenantScope::Tenant(id),
            None => TenantScope::Installation,
        }
    }
}

impl Display for TenantScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TenantScope::Installation => write!(f, "installation"),
            TenantScope::Tenant(id) => write!(f, "{}", id),
        }
    }
}
