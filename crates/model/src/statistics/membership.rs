use crate::member::MembershipType;

/// Member counts per membership type. All types are present, zero counts
/// included; any display cap on categories belongs to the renderer.
#[derive(Debug, Clone, Default)]
pub struct MembershipDistribution {
    pub total: u64,
    pub shares: Vec<TypeShare>,
}

#[derive(Debug, Clone)]
pub struct TypeShare {
    pub membership_type: MembershipType,
    pub count: u64,
    /// Percentage of all members, 0.0 when there are none.
    pub percentage: f64,
}
