use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "first-bud",
        title: "First Bud",
        description: "Added your first plant to the garden.",
        icon: "🌱",
    },
    Achievement {
        id: "urban-jungle",
        title: "Urban Jungle",
        description: "Have 3 or more plants in the garden.",
        icon: "🌳",
    },
    Achievement {
        id: "botanist",
        title: "Seasoned Botanist",
        description: "Have 5 or more plants in the garden.",
        icon: "🌸",
    },
    Achievement {
        id: "water-guardian",
        title: "Water Guardian",
        description: "Watered a plant for the first time.",
        icon: "💧",
    },
];

impl Achievement {
    pub fn find(id: &str) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }
}

/// User actions that can unlock achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GardenAction {
    PlantAdded,
    Watered,
}
