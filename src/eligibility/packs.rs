use serde::{Deserialize, Serialize};

use super::classifier::TierMembership;

/// 462-eligible industries used to scope job-board queries. Keyword lists
/// are rule-defined constants; each pack's query is the terms joined with
/// `OR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndustryPack {
    Hospitality,
    Cultivation,
    Construction,
    Fishing,
    Forestry,
}

impl IndustryPack {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Hospitality,
            Self::Cultivation,
            Self::Construction,
            Self::Fishing,
            Self::Forestry,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hospitality => "hospitality",
            Self::Cultivation => "cultivation",
            Self::Construction => "construction",
            Self::Fishing => "fishing",
            Self::Forestry => "forestry",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Hospitality => &[
                "hotel",
                "hostel",
                "motel",
                "resort",
                "housekeeping",
                "reception",
                "bartender",
                "barista",
                "waiter",
                "kitchen hand",
                "chef",
                "cook",
                "restaurant",
                "cafe",
                "front of house",
                "housekeeper",
            ],
            Self::Cultivation => &[
                "farm",
                "farmhand",
                "harvest",
                "picker",
                "picking",
                "packing",
                "horticulture",
                "orchard",
                "vineyard",
                "pruning",
                "nursery",
                "dairy",
                "cattle",
                "shear",
                "abattoir",
            ],
            Self::Construction => &[
                "construction",
                "labourer",
                "laborer",
                "scaffolder",
                "concreter",
                "bricklayer",
                "carpenter",
                "painter",
                "plasterer",
                "tiler",
            ],
            Self::Fishing => &["fishing", "deckhand", "aquaculture", "pearling", "hatchery"],
            Self::Forestry => &[
                "forestry",
                "silviculture",
                "logging",
                "tree felling",
                "chainsaw",
                "plantation",
            ],
        }
    }

    /// Search string handed to the listing source for one query.
    pub fn query(self) -> String {
        self.keywords().join(" OR ")
    }
}

/// Packs to search for a postal area, in deterministic order. A postcode
/// in no tier yields an empty list, meaning no query is issued for it.
pub fn packs_for(tiers: &TierMembership) -> Vec<IndustryPack> {
    let mut packs = Vec::new();
    if tiers.northern || tiers.remote_or_very_remote {
        packs.push(IndustryPack::Hospitality);
    }
    if tiers.northern || tiers.regional {
        packs.push(IndustryPack::Cultivation);
        packs.push(IndustryPack::Construction);
    }
    if tiers.northern {
        packs.push(IndustryPack::Fishing);
        packs.push(IndustryPack::Forestry);
    }
    packs
}
