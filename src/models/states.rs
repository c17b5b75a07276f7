//! Indian states and union territories offered during onboarding.

/// Sentinel `state` value for central-government notices.
pub const CENTRAL: &str = "Central";

/// Whether a region is a state or a union territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    State,
    UnionTerritory,
}

/// A selectable home region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub kind: RegionKind,
}

const fn state(name: &'static str) -> Region {
    Region {
        name,
        kind: RegionKind::State,
    }
}

const fn ut(name: &'static str) -> Region {
    Region {
        name,
        kind: RegionKind::UnionTerritory,
    }
}

/// All 28 states followed by the 8 union territories.
pub const INDIAN_REGIONS: [Region; 36] = [
    state("Andhra Pradesh"),
    state("Arunachal Pradesh"),
    state("Assam"),
    state("Bihar"),
    state("Chhattisgarh"),
    state("Goa"),
    state("Gujarat"),
    state("Haryana"),
    state("Himachal Pradesh"),
    state("Jharkhand"),
    state("Karnataka"),
    state("Kerala"),
    state("Madhya Pradesh"),
    state("Maharashtra"),
    state("Manipur"),
    state("Meghalaya"),
    state("Mizoram"),
    state("Nagaland"),
    state("Odisha"),
    state("Punjab"),
    state("Rajasthan"),
    state("Sikkim"),
    state("Tamil Nadu"),
    state("Telangana"),
    state("Tripura"),
    state("Uttar Pradesh"),
    state("Uttarakhand"),
    state("West Bengal"),
    ut("Andaman & Nicobar Islands"),
    ut("Chandigarh"),
    ut("Dadra & Nagar Haveli and Daman & Diu"),
    ut("Delhi"),
    ut("Jammu & Kashmir"),
    ut("Ladakh"),
    ut("Lakshadweep"),
    ut("Puducherry"),
];

/// Case-insensitive substring search over the catalogue, in catalogue order.
pub fn search_regions(query: &str) -> Vec<Region> {
    let needle = query.trim().to_lowercase();
    INDIAN_REGIONS
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

/// Exact (case-insensitive) lookup returning the canonical spelling.
pub fn find_region(name: &str) -> Option<Region> {
    let wanted = name.trim();
    INDIAN_REGIONS
        .iter()
        .find(|r| r.name.eq_ignore_ascii_case(wanted))
        .copied()
}

/// States offered in the state filter: the backend list minus the central sentinel.
pub fn selectable_states(states: &[String]) -> Vec<String> {
    states
        .iter()
        .filter(|s| !s.trim().is_empty() && s.as_str() != CENTRAL)
        .cloned()
        .collect()
}
