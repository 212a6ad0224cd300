//! Item type taxonomy

use std::fmt;

/// Label used when a value could not be detected
pub const UNKNOWN: &str = "Unknown";

/// Top-level item type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MainType {
    Armor,
    Weapon,
    Vehicle,
    Tool,
}

impl MainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Armor => "Armor",
            Self::Weapon => "Weapon",
            Self::Vehicle => "Vehicle",
            Self::Tool => "Tool",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Melee,
    Ranged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmorKind {
    Light,
    Heavy,
    Stillsuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleKind {
    Aerial,
    Land,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Shield,
    Bloodbag,
    FluidExtractor,
    WaterContainer,
    PowerPack,
    DewReaper,
    Cutteray,
    Compactor,
    Scanner,
}

impl ToolKind {
    /// Maps a normalized infobox `tool type` value to a tool kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "shield" => Some(Self::Shield),
            "fluid extractor" => Some(Self::FluidExtractor),
            "bloodbag" => Some(Self::Bloodbag),
            "water container" => Some(Self::WaterContainer),
            "power pack" => Some(Self::PowerPack),
            "dew reaper" => Some(Self::DewReaper),
            "cutteray" => Some(Self::Cutteray),
            "compactor" => Some(Self::Compactor),
            "scanner" => Some(Self::Scanner),
            _ => None,
        }
    }
}

/// A refinement of a main type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    Weapon(WeaponKind),
    Armor(ArmorKind),
    Vehicle(VehicleKind),
    Tool(ToolKind),
}

impl Subtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon(WeaponKind::Melee) => "Melee",
            Self::Weapon(WeaponKind::Ranged) => "Ranged",
            Self::Armor(ArmorKind::Light) => "Light",
            Self::Armor(ArmorKind::Heavy) => "Heavy",
            Self::Armor(ArmorKind::Stillsuit) => "Stillsuit",
            Self::Vehicle(VehicleKind::Aerial) => "Aerial",
            Self::Vehicle(VehicleKind::Land) => "Land",
            Self::Tool(ToolKind::Shield) => "Shield",
            Self::Tool(ToolKind::Bloodbag) => "Bloodbag",
            Self::Tool(ToolKind::FluidExtractor) => "Fluid Extractor",
            Self::Tool(ToolKind::WaterContainer) => "Water Container",
            Self::Tool(ToolKind::PowerPack) => "Power Pack",
            Self::Tool(ToolKind::DewReaper) => "Dew Reaper",
            Self::Tool(ToolKind::Cutteray) => "Cutteray",
            Self::Tool(ToolKind::Compactor) => "Compactor",
            Self::Tool(ToolKind::Scanner) => "Scanner",
        }
    }
}

impl fmt::Display for MainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// `None` when no main type was detected
    pub main_type: Option<MainType>,
    /// Subtypes of `main_type`; always empty when `main_type` is `None`
    pub subtypes: Vec<Subtype>,
    /// Matched category, or [`UNKNOWN`]
    pub category: String,
    /// Matched location, or empty
    pub location: String,
}

impl Classification {
    /// The `types` sequence written to output
    ///
    /// Main type first, then its subtypes; a single [`UNKNOWN`] marker when the main
    /// type is undetected.
    pub fn types(&self) -> Vec<String> {
        match self.main_type {
            Some(main) => std::iter::once(main.as_str())
                .chain(self.subtypes.iter().map(Subtype::as_str))
                .map(str::to_string)
                .collect(),
            None => vec![UNKNOWN.to_string()],
        }
    }
}
