//! Role-based access policy for the admin surface.
//!
//! All role checks go through a single capability resolution so that the
//! panel gate and region scoping stay consistent. Nothing here is cached;
//! callers re-evaluate on every access.

use crate::enums::RoleKey;
use crate::models::{FlightInformationRegion, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// May use the admin panel/API at all.
    AccessPanel,
    /// May manage measures for every region.
    ManageAllRegions,
    /// May manage measures for assigned regions only.
    ManageAssignedRegions,
}

/// Capabilities granted by a role.
pub fn capabilities(role: RoleKey) -> &'static [Capability] {
    use Capability::*;
    match role {
        RoleKey::System | RoleKey::Nmt => &[AccessPanel, ManageAllRegions],
        RoleKey::FlowManager => &[AccessPanel, ManageAssignedRegions],
        RoleKey::User => &[],
    }
}

pub fn has_capability(role: RoleKey, capability: Capability) -> bool {
    capabilities(role).contains(&capability)
}

pub fn can_access_panel(user: &User) -> bool {
    has_capability(user.role, Capability::AccessPanel)
}

/// Regions the user may select when creating or editing a measure.
pub fn visible_regions(
    user: &User,
    all_regions: &[FlightInformationRegion],
) -> Vec<FlightInformationRegion> {
    if has_capability(user.role, Capability::ManageAllRegions) {
        return all_regions.to_vec();
    }
    if has_capability(user.role, Capability::ManageAssignedRegions) {
        return all_regions
            .iter()
            .filter(|region| user.flight_information_region_ids.contains(&region.id))
            .cloned()
            .collect();
    }
    Vec::new()
}

/// Whether the user may create or edit measures owned by the region.
pub fn can_manage_region(user: &User, region_id: &str) -> bool {
    if has_capability(user.role, Capability::ManageAllRegions) {
        return true;
    }
    has_capability(user.role, Capability::ManageAssignedRegions)
        && user
            .flight_information_region_ids
            .iter()
            .any(|id| id == region_id)
}
