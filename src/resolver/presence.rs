//! Geometry-class flags to active channel resolution.
//!
//! The mapping from flags to channels is a fixed table of independent
//! conditionals, one per emission point, evaluated in the engine's canonical
//! channel order. Several channels change meaning depending on flag
//! combinations (leaf cards vs grass cards, leaf wind vs branch wind); those
//! emission points carry a [`ChannelVariant`] tag so downstream stages can
//! tell them apart without re-deriving the flag logic.

use crate::types::{GeometryFlags, VertexProperty};

/// Which emission rule produced an active channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelVariant {
    /// The channel's single, unconditional meaning.
    Standard,
    /// Leaf-card corner for facing leaves without regular leaves.
    LeafCard,
    /// Leaf-card corner for the grass case (facing leaves and leaves set).
    GrassCard,
    /// Wind branch data sourced from leaf geometry (leaves without facing
    /// leaves).
    LeafWind,
    /// Wind branch data sourced from the general branch hierarchy.
    BranchWind,
}

/// One channel the resolver marked active for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveChannel {
    pub property: VertexProperty,
    pub variant: ChannelVariant,
}

impl ActiveChannel {
    fn standard(property: VertexProperty) -> Self {
        Self {
            property,
            variant: ChannelVariant::Standard,
        }
    }

    fn variant(property: VertexProperty, variant: ChannelVariant) -> Self {
        Self { property, variant }
    }
}

/// Resolve the ordered set of active channels for a draw call.
///
/// Never fails: every flag combination (including "no class set") resolves
/// to a valid channel list. Missing source data for an active channel is the
/// buffer stage's concern, not the resolver's.
pub fn resolve_channels(flags: GeometryFlags) -> Vec<ActiveChannel> {
    let branches = flags.branches;
    let leaves = flags.leaves;
    let facing_leaves = flags.facing_leaves;

    let mut active = Vec::with_capacity(18);

    active.push(ActiveChannel::standard(VertexProperty::Position));

    if !(facing_leaves && !leaves) {
        active.push(ActiveChannel::standard(VertexProperty::LodPosition));
    }

    active.push(ActiveChannel::standard(VertexProperty::DiffuseTexcoords));

    if facing_leaves && !leaves {
        active.push(ActiveChannel::variant(
            VertexProperty::LeafCardCorner,
            ChannelVariant::LeafCard,
        ));
    }

    if (!facing_leaves && !leaves) || (facing_leaves && leaves) {
        active.push(ActiveChannel::standard(VertexProperty::GeometryTypeHint));
    }

    if facing_leaves && leaves {
        active.push(ActiveChannel::variant(
            VertexProperty::LeafCardCorner,
            ChannelVariant::GrassCard,
        ));
    }

    if facing_leaves {
        active.push(ActiveChannel::standard(VertexProperty::LeafCardLodScalar));
    }

    if !facing_leaves && leaves {
        active.push(ActiveChannel::variant(
            VertexProperty::WindBranchData,
            ChannelVariant::LeafWind,
        ));
    }

    if !branches {
        active.push(ActiveChannel::standard(VertexProperty::WindExtraData));
    }

    if branches {
        active.push(ActiveChannel::standard(VertexProperty::BranchSeamDiffuse));
    }

    if !leaves || (facing_leaves && leaves) {
        active.push(ActiveChannel::variant(
            VertexProperty::WindBranchData,
            ChannelVariant::BranchWind,
        ));
    }

    if branches {
        active.push(ActiveChannel::standard(VertexProperty::BranchSeamDetail));
    }

    if branches {
        active.push(ActiveChannel::standard(VertexProperty::DetailTexcoords));
    }

    if facing_leaves != leaves {
        active.push(ActiveChannel::standard(VertexProperty::WindFlags));
    }

    if leaves {
        active.push(ActiveChannel::standard(VertexProperty::LeafAnchorPoint));
    }

    active.push(ActiveChannel::standard(VertexProperty::Normal));
    active.push(ActiveChannel::standard(VertexProperty::AmbientOcclusion));
    active.push(ActiveChannel::standard(VertexProperty::Tangent));

    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(flags: GeometryFlags) -> Vec<VertexProperty> {
        resolve_channels(flags).iter().map(|c| c.property).collect()
    }

    fn has(flags: GeometryFlags, property: VertexProperty) -> bool {
        properties(flags).contains(&property)
    }

    fn variant_of(flags: GeometryFlags, property: VertexProperty) -> ChannelVariant {
        resolve_channels(flags)
            .iter()
            .find(|c| c.property == property)
            .expect("channel not active")
            .variant
    }

    #[test]
    fn test_unconditional_channels() {
        for flags in GeometryFlags::all_combinations() {
            let props = properties(flags);
            assert_eq!(props[0], VertexProperty::Position);
            assert!(props.contains(&VertexProperty::DiffuseTexcoords));
            // Lighting channels always close the list, in order.
            assert_eq!(
                &props[props.len() - 3..],
                &[
                    VertexProperty::Normal,
                    VertexProperty::AmbientOcclusion,
                    VertexProperty::Tangent
                ]
            );
        }
    }

    #[test]
    fn test_emission_rules_per_combination() {
        // Each rule of the emission table, checked independently over all
        // 32 flag combinations.
        for flags in GeometryFlags::all_combinations() {
            let (b, l, fl) = (flags.branches, flags.leaves, flags.facing_leaves);

            assert_eq!(has(flags, VertexProperty::LodPosition), !(fl && !l));
            assert_eq!(
                has(flags, VertexProperty::GeometryTypeHint),
                (!fl && !l) || (fl && l)
            );
            assert_eq!(has(flags, VertexProperty::LeafCardCorner), fl);
            assert_eq!(has(flags, VertexProperty::LeafCardLodScalar), fl);
            assert_eq!(has(flags, VertexProperty::WindExtraData), !b);
            assert_eq!(has(flags, VertexProperty::BranchSeamDiffuse), b);
            assert_eq!(has(flags, VertexProperty::BranchSeamDetail), b);
            assert_eq!(has(flags, VertexProperty::DetailTexcoords), b);
            assert_eq!(has(flags, VertexProperty::WindFlags), fl != l);
            assert_eq!(has(flags, VertexProperty::LeafAnchorPoint), l);
            // Wind branch data: the leaf and branch emission points are
            // mutually exclusive and together cover every combination.
            let wind_count = resolve_channels(flags)
                .iter()
                .filter(|c| c.property == VertexProperty::WindBranchData)
                .count();
            assert_eq!(wind_count, 1);
        }
    }

    #[test]
    fn test_wind_branch_variants() {
        let leaves_only = GeometryFlags::new().with_leaves();
        assert_eq!(
            variant_of(leaves_only, VertexProperty::WindBranchData),
            ChannelVariant::LeafWind
        );

        let branches_only = GeometryFlags::new().with_branches();
        assert_eq!(
            variant_of(branches_only, VertexProperty::WindBranchData),
            ChannelVariant::BranchWind
        );

        // Grass: leaves set, but the general branch wind wins.
        let grass = GeometryFlags::new().with_facing_leaves().with_leaves();
        assert_eq!(
            variant_of(grass, VertexProperty::WindBranchData),
            ChannelVariant::BranchWind
        );
    }

    #[test]
    fn test_leaf_card_corner_variants() {
        let cards = GeometryFlags::new().with_facing_leaves();
        assert_eq!(
            variant_of(cards, VertexProperty::LeafCardCorner),
            ChannelVariant::LeafCard
        );

        let grass = GeometryFlags::new().with_facing_leaves().with_leaves();
        assert_eq!(
            variant_of(grass, VertexProperty::LeafCardCorner),
            ChannelVariant::GrassCard
        );

        assert!(!has(GeometryFlags::new(), VertexProperty::LeafCardCorner));
    }

    #[test]
    fn test_branches_only_channel_set() {
        let flags = GeometryFlags::new().with_branches();
        assert_eq!(
            properties(flags),
            vec![
                VertexProperty::Position,
                VertexProperty::LodPosition,
                VertexProperty::DiffuseTexcoords,
                VertexProperty::GeometryTypeHint,
                VertexProperty::BranchSeamDiffuse,
                VertexProperty::WindBranchData,
                VertexProperty::BranchSeamDetail,
                VertexProperty::DetailTexcoords,
                VertexProperty::Normal,
                VertexProperty::AmbientOcclusion,
                VertexProperty::Tangent,
            ]
        );
    }

    #[test]
    fn test_leaves_only_channel_set() {
        let flags = GeometryFlags::new().with_leaves();
        assert_eq!(
            properties(flags),
            vec![
                VertexProperty::Position,
                VertexProperty::LodPosition,
                VertexProperty::DiffuseTexcoords,
                VertexProperty::WindBranchData,
                VertexProperty::WindExtraData,
                VertexProperty::WindFlags,
                VertexProperty::LeafAnchorPoint,
                VertexProperty::Normal,
                VertexProperty::AmbientOcclusion,
                VertexProperty::Tangent,
            ]
        );
    }

    #[test]
    fn test_grass_channel_set() {
        let flags = GeometryFlags::new().with_facing_leaves().with_leaves();
        assert_eq!(
            properties(flags),
            vec![
                VertexProperty::Position,
                VertexProperty::LodPosition,
                VertexProperty::DiffuseTexcoords,
                VertexProperty::GeometryTypeHint,
                VertexProperty::LeafCardCorner,
                VertexProperty::LeafCardLodScalar,
                VertexProperty::WindExtraData,
                VertexProperty::WindBranchData,
                VertexProperty::LeafAnchorPoint,
                VertexProperty::Normal,
                VertexProperty::AmbientOcclusion,
                VertexProperty::Tangent,
            ]
        );
    }

    #[test]
    fn test_no_class_channel_set() {
        let flags = GeometryFlags::new();
        assert_eq!(
            properties(flags),
            vec![
                VertexProperty::Position,
                VertexProperty::LodPosition,
                VertexProperty::DiffuseTexcoords,
                VertexProperty::GeometryTypeHint,
                VertexProperty::WindExtraData,
                VertexProperty::WindBranchData,
                VertexProperty::Normal,
                VertexProperty::AmbientOcclusion,
                VertexProperty::Tangent,
            ]
        );
    }

    #[test]
    fn test_facing_leaves_only_channel_set() {
        let flags = GeometryFlags::new().with_facing_leaves();
        assert_eq!(
            properties(flags),
            vec![
                VertexProperty::Position,
                VertexProperty::DiffuseTexcoords,
                VertexProperty::LeafCardCorner,
                VertexProperty::LeafCardLodScalar,
                VertexProperty::WindExtraData,
                VertexProperty::WindBranchData,
                VertexProperty::WindFlags,
                VertexProperty::Normal,
                VertexProperty::AmbientOcclusion,
                VertexProperty::Tangent,
            ]
        );
    }

    #[test]
    fn test_determinism() {
        for flags in GeometryFlags::all_combinations() {
            assert_eq!(resolve_channels(flags), resolve_channels(flags));
        }
    }
}
