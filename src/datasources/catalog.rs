use crate::error::Result;
use crate::models::{Plant, SunTolerance};
use chrono::{DateTime, Utc};

/// Something that can turn a plant name into a complete care profile.
///
/// The built-in [`PresetCatalog`] answers from a fixed table; an
/// identification service would implement the same trait and hand back the
/// same `Plant` shape.
pub trait PlantDataSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build a fresh profile for `query`, marked as watered at `now`.
    fn lookup(&self, query: &str, now: DateTime<Utc>) -> Result<Option<Plant>>;

    /// Names the source can answer for, for prompts and completions.
    fn suggestions(&self) -> Vec<&'static str>;
}

struct Preset {
    common_name: &'static str,
    aliases: &'static [&'static str],
    scientific_name: &'static str,
    category: &'static str,
    description: &'static str,
    watering_frequency_days: u32,
    sun_tolerance: SunTolerance,
    min_temp: f64,
    max_temp: f64,
    care_tips: &'static [&'static str],
}

const PRESETS: &[Preset] = &[
    Preset {
        common_name: "Jade Plant",
        aliases: &["jade", "money plant", "crassula"],
        scientific_name: "Crassula ovata",
        category: "Suculenta",
        description: "Long-lived succulent that stores water in thick, glossy leaves.",
        watering_frequency_days: 14,
        sun_tolerance: SunTolerance::FullSun,
        min_temp: 5.0,
        max_temp: 35.0,
        care_tips: &[
            "Let the soil dry out completely between waterings.",
            "Use a gritty, fast-draining mix.",
            "Give it at least four hours of direct light.",
        ],
    },
    Preset {
        common_name: "Echeveria",
        aliases: &["hen and chicks", "mexican snowball"],
        scientific_name: "Echeveria elegans",
        category: "Suculenta",
        description: "Rosette succulent whose leaves blush in strong light.",
        watering_frequency_days: 10,
        sun_tolerance: SunTolerance::FullSun,
        min_temp: 5.0,
        max_temp: 35.0,
        care_tips: &[
            "Water the soil, never the rosette.",
            "Remove dead lower leaves to avoid rot.",
            "Keep out of prolonged rain.",
        ],
    },
    Preset {
        common_name: "Bunny Ears Cactus",
        aliases: &["cactus", "cacto", "opuntia"],
        scientific_name: "Opuntia microdasys",
        category: "Cacto",
        description: "Pad-forming cactus covered in soft-looking but irritating glochids.",
        watering_frequency_days: 21,
        sun_tolerance: SunTolerance::FullSun,
        min_temp: 5.0,
        max_temp: 40.0,
        care_tips: &[
            "Water sparingly and almost never in winter.",
            "Handle with gloves.",
            "Terracotta pots help the soil dry.",
        ],
    },
    Preset {
        common_name: "Boston Fern",
        aliases: &["fern", "samambaia", "sword fern"],
        scientific_name: "Nephrolepis exaltata",
        category: "Samambaia",
        description: "Arching fronds that thrive in humid, shaded spots.",
        watering_frequency_days: 3,
        sun_tolerance: SunTolerance::Shade,
        min_temp: 12.0,
        max_temp: 30.0,
        care_tips: &[
            "Keep the soil evenly moist.",
            "Mist the fronds when the air is dry.",
            "Avoid direct afternoon sun.",
        ],
    },
    Preset {
        common_name: "Monstera",
        aliases: &["swiss cheese plant", "costela-de-adao"],
        scientific_name: "Monstera deliciosa",
        category: "Tropical",
        description: "Climbing aroid famous for its split, perforated leaves.",
        watering_frequency_days: 7,
        sun_tolerance: SunTolerance::Partial,
        min_temp: 15.0,
        max_temp: 32.0,
        care_tips: &[
            "Water when the top few centimetres are dry.",
            "Offer a moss pole to climb.",
            "Wipe the leaves to keep them dust-free.",
        ],
    },
    Preset {
        common_name: "Snake Plant",
        aliases: &["sansevieria", "espada-de-sao-jorge", "mother-in-law's tongue"],
        scientific_name: "Dracaena trifasciata",
        category: "Folhagem",
        description: "Upright, sword-shaped leaves that tolerate neglect.",
        watering_frequency_days: 14,
        sun_tolerance: SunTolerance::Partial,
        min_temp: 10.0,
        max_temp: 35.0,
        care_tips: &[
            "Overwatering is the most common killer.",
            "Tolerates low light but grows faster in bright light.",
            "Repot only when root-bound.",
        ],
    },
    Preset {
        common_name: "Pothos",
        aliases: &["devil's ivy", "jiboia", "epipremnum"],
        scientific_name: "Epipremnum aureum",
        category: "Folhagem tropical",
        description: "Trailing vine with heart-shaped, often variegated leaves.",
        watering_frequency_days: 5,
        sun_tolerance: SunTolerance::Partial,
        min_temp: 15.0,
        max_temp: 32.0,
        care_tips: &[
            "Drooping leaves mean it is thirsty.",
            "Trim long vines to encourage bushier growth.",
            "Cuttings root easily in water.",
        ],
    },
    Preset {
        common_name: "Peace Lily",
        aliases: &["lirio-da-paz", "spathiphyllum"],
        scientific_name: "Spathiphyllum wallisii",
        category: "Tropical",
        description: "Glossy foliage with white spathes, happy in low light.",
        watering_frequency_days: 4,
        sun_tolerance: SunTolerance::Shade,
        min_temp: 16.0,
        max_temp: 30.0,
        care_tips: &[
            "Water as soon as the leaves start to droop.",
            "Keep away from direct sun.",
            "Use filtered water if leaf tips brown.",
        ],
    },
    Preset {
        common_name: "Basil",
        aliases: &["manjericao", "sweet basil"],
        scientific_name: "Ocimum basilicum",
        category: "Erva",
        description: "Fragrant culinary herb that loves warmth and sun.",
        watering_frequency_days: 2,
        sun_tolerance: SunTolerance::FullSun,
        min_temp: 10.0,
        max_temp: 35.0,
        care_tips: &[
            "Pinch off flower buds to keep leaves coming.",
            "Water at the base in the morning.",
            "Harvest from the top down.",
        ],
    },
    Preset {
        common_name: "Rosemary",
        aliases: &["alecrim"],
        scientific_name: "Salvia rosmarinus",
        category: "Erva",
        description: "Woody Mediterranean herb that prefers dry roots.",
        watering_frequency_days: 5,
        sun_tolerance: SunTolerance::FullSun,
        min_temp: -5.0,
        max_temp: 35.0,
        care_tips: &[
            "Let the soil dry between waterings.",
            "Needs six or more hours of sun.",
            "Prune after flowering.",
        ],
    },
];

impl Preset {
    fn matches(&self, query: &str) -> bool {
        let common = self.common_name.to_lowercase();
        let scientific = self.scientific_name.to_lowercase();
        common == query
            || scientific == query
            || self.aliases.iter().any(|a| *a == query)
            || common.contains(query)
            || scientific.contains(query)
    }

    fn to_plant(&self, now: DateTime<Utc>) -> Plant {
        let mut plant = Plant::new(
            self.common_name,
            self.scientific_name,
            self.watering_frequency_days,
            self.sun_tolerance,
            self.min_temp,
            self.max_temp,
        )
        .with_category(self.category)
        .with_description(self.description)
        .with_care_tips(self.care_tips);
        plant.record_watering(now);
        plant
    }
}

/// Built-in table of common houseplants.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetCatalog;

impl PlantDataSource for PresetCatalog {
    fn name(&self) -> &'static str {
        "Preset catalog"
    }

    fn lookup(&self, query: &str, now: DateTime<Utc>) -> Result<Option<Plant>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(None);
        }

        let found = PRESETS.iter().find(|p| p.matches(&query));
        match found {
            Some(preset) => {
                tracing::debug!(query = %query, plant = preset.common_name, "catalog hit");
                Ok(Some(preset.to_plant(now)))
            }
            None => {
                tracing::debug!(query = %query, "catalog miss");
                Ok(None)
            }
        }
    }

    fn suggestions(&self) -> Vec<&'static str> {
        PRESETS.iter().map(|p| p.common_name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_common_name() {
        let now = Utc::now();
        let plant = PresetCatalog.lookup("Boston Fern", now).unwrap().unwrap();
        assert_eq!(plant.scientific_name, "Nephrolepis exaltata");
        assert_eq!(plant.category.as_deref(), Some("Samambaia"));
        assert!(plant.care_group().tropical);
        assert_eq!(plant.care_tips.len(), 3);
    }

    #[test]
    fn lookup_by_alias_and_scientific_name() {
        let now = Utc::now();
        let by_alias = PresetCatalog.lookup("jiboia", now).unwrap().unwrap();
        assert_eq!(by_alias.common_name, "Pothos");

        let by_scientific = PresetCatalog.lookup("crassula ovata", now).unwrap().unwrap();
        assert_eq!(by_scientific.common_name, "Jade Plant");
    }

    #[test]
    fn lookup_marks_plant_as_just_watered() {
        let now = Utc::now();
        let plant = PresetCatalog.lookup("basil", now).unwrap().unwrap();
        assert_eq!(plant.last_watered, Some(now.timestamp_millis()));
        assert_eq!(plant.watering_history, vec![now.timestamp_millis()]);
    }

    #[test]
    fn each_lookup_gets_a_fresh_id() {
        let now = Utc::now();
        let a = PresetCatalog.lookup("monstera", now).unwrap().unwrap();
        let b = PresetCatalog.lookup("monstera", now).unwrap().unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn unknown_or_blank_query_misses() {
        let now = Utc::now();
        assert!(PresetCatalog.lookup("triffid", now).unwrap().is_none());
        assert!(PresetCatalog.lookup("   ", now).unwrap().is_none());
    }

    #[test]
    fn presets_are_valid_profiles() {
        let now = Utc::now();
        for name in PresetCatalog.suggestions() {
            let plant = PresetCatalog.lookup(name, now).unwrap().unwrap();
            assert!(plant.watering_frequency_days >= 1, "{}", name);
            assert!(plant.min_temp < plant.max_temp, "{}", name);
        }
    }
}
