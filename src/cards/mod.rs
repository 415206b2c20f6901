//! Card system: records, live entities, and the category builders.
//!
//! ## Key Types
//!
//! - `Category`: Equipment, Utility, Resource, Monster, Mine
//! - `CardRecord`: One validated table row with its `ReplicationPlan`
//! - `CardEntity`: A live copy on the table (name, placement, position)
//! - `CategoryRules`: Per-category column rules, driven by `build_records`

pub mod attributes;
pub mod builders;
pub mod definition;
pub mod instance;

pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use builders::{
    build_records, rules_for, CategoryRules, EquipmentRules, MineRules, MonsterRules, ResourceRules, UtilityRules,
};
pub use definition::{CardRecord, Category, DisplayLines, Placement, ReplicationPlan};
pub use instance::CardEntity;
