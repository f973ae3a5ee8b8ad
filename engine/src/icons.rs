use meridian_shared::MarkerKind;

/// Icon served when a marker kind has no dedicated artwork.
pub const DEFAULT_ICON: &str = "marker.svg";

/// Icon asset name for a world marker kind.
pub fn marker_icon(kind: MarkerKind) -> &'static str {
    match kind {
        MarkerKind::GoDown => "goDown.svg",
        MarkerKind::GoUp => "goUp.svg",
        MarkerKind::Secret => "secret.svg",
        MarkerKind::Teleport => "teleport.svg",
        MarkerKind::Temple => "temple.svg",
        MarkerKind::Unknown => DEFAULT_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_kind_has_its_own_icon() {
        let kinds = [
            MarkerKind::GoDown,
            MarkerKind::GoUp,
            MarkerKind::Secret,
            MarkerKind::Teleport,
            MarkerKind::Temple,
        ];
        for kind in kinds {
            assert_ne!(marker_icon(kind), DEFAULT_ICON);
        }
    }

    #[test]
    fn unrecognized_kinds_fall_back_to_the_default() {
        assert_eq!(marker_icon(MarkerKind::Unknown), DEFAULT_ICON);
    }
}
