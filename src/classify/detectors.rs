//! Main-type and subtype detection
//!
//! Main-type detection walks an ordered rule table: every infobox rule precedes every
//! free-text rule, and the first match wins. Subtype detection is dispatched through a
//! table keyed by main type; each entry is a pure function of the infobox and the
//! normalized page text.

use crate::classify::document::InfoboxTable;
use crate::classify::normalize::keyword_in_text;
use crate::classify::types::{ArmorKind, MainType, Subtype, ToolKind, VehicleKind, WeaponKind};

/// Where a main-type rule looks for evidence
#[derive(Debug, Clone, Copy)]
enum Signal {
    /// Any of these infobox labels is present
    InfoboxLabel(&'static [&'static str]),
    /// Any of these keywords occurs in the page text
    TextKeyword(&'static [&'static str]),
}

impl Signal {
    fn matches(&self, infobox: &InfoboxTable, text: &str) -> bool {
        match self {
            Self::InfoboxLabel(labels) => infobox.contains_any(labels),
            Self::TextKeyword(keywords) => keyword_in_text(text, keywords),
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Self::InfoboxLabel(_) => "infobox",
            Self::TextKeyword(_) => "text",
        }
    }
}

/// Main-type rules in priority order
const MAIN_TYPE_RULES: &[(Signal, MainType)] = &[
    (
        Signal::InfoboxLabel(&["vehicle module stats", "module type"]),
        MainType::Vehicle,
    ),
    (
        Signal::InfoboxLabel(&["fire mode", "damage type"]),
        MainType::Weapon,
    ),
    (
        Signal::InfoboxLabel(&["armor rating", "armor type"]),
        MainType::Armor,
    ),
    (Signal::InfoboxLabel(&["tool type"]), MainType::Tool),
    (
        Signal::TextKeyword(&["armor", "helmet", "suit", "stillsuit"]),
        MainType::Armor,
    ),
    (
        Signal::TextKeyword(&["weapon", "gun", "rifle", "pistol", "blade", "sword"]),
        MainType::Weapon,
    ),
    (
        Signal::TextKeyword(&["tool", "shield", "extractor", "container", "pack"]),
        MainType::Tool,
    ),
    (
        Signal::TextKeyword(&["vehicle", "ornithopter", "buggy", "sandbike"]),
        MainType::Vehicle,
    ),
];

/// Returns the main type of an item, or `None` if nothing matched
///
/// `text` is the normalized full page text.
pub fn detect_main_type(infobox: &InfoboxTable, text: &str) -> Option<MainType> {
    let (signal, main_type) = MAIN_TYPE_RULES
        .iter()
        .find(|(signal, _)| signal.matches(infobox, text))?;

    tracing::debug!(main_type = %main_type, source = signal.source(), "main type detected");
    Some(*main_type)
}

/// Derives subtypes from the infobox and normalized page text
pub type SubtypeDetector = fn(&InfoboxTable, &str) -> Vec<Subtype>;

/// Subtype detector per main type
const SUBTYPE_DETECTORS: &[(MainType, SubtypeDetector)] = &[
    (MainType::Weapon, detect_weapon_subtypes),
    (MainType::Armor, detect_armor_subtypes),
    (MainType::Tool, detect_tool_subtypes),
    (MainType::Vehicle, detect_vehicle_subtypes),
];

/// Runs the subtype detector registered for `main_type`
pub fn detect_subtypes(main_type: MainType, infobox: &InfoboxTable, text: &str) -> Vec<Subtype> {
    SUBTYPE_DETECTORS
        .iter()
        .find(|(t, _)| *t == main_type)
        .map(|(_, detect)| detect(infobox, text))
        .unwrap_or_default()
}

/// Weapon: the first matching rule decides
fn detect_weapon_subtypes(infobox: &InfoboxTable, text: &str) -> Vec<Subtype> {
    let (kind, rule) = if infobox.contains("fire mode") {
        (WeaponKind::Ranged, "fire mode label")
    } else if infobox
        .get("damage type")
        .is_some_and(|v| keyword_in_text(v, &["blade", "melee"]))
    {
        (WeaponKind::Melee, "damage type value")
    } else if keyword_in_text(text, &["gun", "rifle", "pistol", "bow", "launcher"]) {
        (WeaponKind::Ranged, "ranged keyword")
    } else if keyword_in_text(text, &["blade", "sword", "knife"]) {
        (WeaponKind::Melee, "melee keyword")
    } else {
        tracing::debug!("No weapon subtype detected");
        return Vec::new();
    };

    let subtype = Subtype::Weapon(kind);
    tracing::debug!(subtype = %subtype, rule, "weapon subtype detected");
    vec![subtype]
}

/// Armor: exact match on `garment type`; a missing label means no subtype
fn detect_armor_subtypes(infobox: &InfoboxTable, _text: &str) -> Vec<Subtype> {
    let Some(garment) = infobox.get("garment type") else {
        tracing::debug!("Armor has no garment type; no subtype");
        return Vec::new();
    };

    let kind = match garment {
        "light armor" => ArmorKind::Light,
        "heavy armor" => ArmorKind::Heavy,
        "water discipline" => ArmorKind::Stillsuit,
        _ => {
            tracing::debug!(garment, "Unrecognized garment type");
            return Vec::new();
        }
    };

    let subtype = Subtype::Armor(kind);
    tracing::debug!(subtype = %subtype, "armor subtype detected");
    vec![subtype]
}

/// Tool: exact match on `tool type`; a missing label means no subtype
fn detect_tool_subtypes(infobox: &InfoboxTable, _text: &str) -> Vec<Subtype> {
    let Some(tag) = infobox.get("tool type") else {
        tracing::debug!("Tool has no tool type; no subtype");
        return Vec::new();
    };

    match ToolKind::from_tag(tag) {
        Some(kind) => {
            let subtype = Subtype::Tool(kind);
            tracing::debug!(subtype = %subtype, "tool subtype detected");
            vec![subtype]
        }
        None => {
            tracing::info!("Unknown tool subtype '{}' in infobox", tag);
            Vec::new()
        }
    }
}

const AERIAL_MODULES: &[&str] = &["ornithopter", "carrier", "scout", "assault"];
const LAND_MODULES: &[&str] = &["sandbike", "buggy", "sandcrawler", "treadwheel"];
const AERIAL_KEYWORDS: &[&str] = &["ornithopter", "flyer", "aerial"];
const LAND_KEYWORDS: &[&str] = &["buggy", "sandbike", "ground", "land", "treadwheel"];

/// Vehicle: `module type` first, then page text; aerial is checked before land
fn detect_vehicle_subtypes(infobox: &InfoboxTable, text: &str) -> Vec<Subtype> {
    let module_type = infobox.get("module type").unwrap_or("");

    let (kind, source) = if keyword_in_text(module_type, AERIAL_MODULES) {
        (VehicleKind::Aerial, "module type")
    } else if keyword_in_text(module_type, LAND_MODULES) {
        (VehicleKind::Land, "module type")
    } else if keyword_in_text(text, AERIAL_KEYWORDS) {
        (VehicleKind::Aerial, "text")
    } else if keyword_in_text(text, LAND_KEYWORDS) {
        (VehicleKind::Land, "text")
    } else {
        tracing::debug!("No vehicle subtype detected");
        return Vec::new();
    };

    let subtype = Subtype::Vehicle(kind);
    tracing::debug!(subtype = %subtype, source, "vehicle subtype detected");
    vec![subtype]
}
