//! Category builders: table rows → validated `CardRecord`s.
//!
//! Each category implements `CategoryRules`, which knows the category's
//! columns, required fields, defaults and display layout. `build_records`
//! drives any of them over a parsed table:
//!
//! 1. optionally shuffle the rows (equipment, utility, monsters, mines),
//! 2. build one record per row, skipping rows with a missing or
//!    non-numeric required field (zero copies, never a partial record),
//! 3. fall back to documented defaults for optional columns.
//!
//! Skips are expected: the sheets contain spacer rows and cards still
//! being designed.

use super::attributes::{ATTACK, COST, DEFENCE, GOLD, MINING, PENALTY, REWARD};
use super::definition::{CardRecord, Category, ReplicationPlan};
use crate::core::rng::GameRng;
use crate::table::{
    display_name, display_text, lookup, optional_int, required_int, FieldError, HeaderIndex, Row, Table,
};

pub const COL_NAME: &str = "Name";
pub const COL_ATTACK: &str = "Attack";
pub const COL_DEFENCE: &str = "Defence";
pub const COL_MINING: &str = "Mining";
pub const COL_ABILITY: &str = "Ability";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_GOLD: &str = "Gold";
pub const COL_COST: &str = "Cost";
pub const COL_COUNT: &str = "Count";
pub const COL_EXTRA_DECK: &str = "Extra deck";
pub const COL_STARTING_COUNT: &str = "Starting Count";
pub const COL_REWARD: &str = "Reward";
pub const COL_PENALTY: &str = "Penalty";

/// Per-category extraction rules.
pub trait CategoryRules {
    /// Category the rules produce.
    fn category(&self) -> Category;

    /// Whether rows are shuffled before building.
    fn shuffles_rows(&self) -> bool;

    /// Build one record from a data row.
    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError>;
}

/// Negative counts in the sheet mean "none".
fn count(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Optional integer column; a value that is present but not a number falls
/// back to the default with a warning rather than dropping the card.
fn optional_or_default(row: &Row, header: &HeaderIndex, column: &str, default: i32, category: Category) -> i32 {
    match optional_int(row, header, column, default) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("{} row `{}`: {}; using {}", category, lookup(row, header, COL_NAME, ""), e, default);
            default
        }
    }
}

fn plan_with_extras(row: &Row, header: &HeaderIndex, deck_count: usize, category: Category) -> ReplicationPlan {
    ReplicationPlan::new(
        deck_count,
        count(optional_or_default(row, header, COL_EXTRA_DECK, 0, category)),
        count(optional_or_default(row, header, COL_STARTING_COUNT, 0, category)),
    )
}

/// Description followed by labelled extra lines, skipping empty parts.
fn compose(description: &str, extras: &[(&str, &str)]) -> String {
    let mut parts = Vec::with_capacity(extras.len() + 1);
    let description = display_text(description);
    if !description.is_empty() {
        parts.push(description);
    }
    for (label, raw) in extras {
        let text = display_text(raw);
        if !text.is_empty() {
            parts.push(format!("{}: {}", label, text));
        }
    }
    parts.join("\n")
}

fn name_of<'a>(row: &'a Row, header: &HeaderIndex) -> &'a str {
    lookup(row, header, COL_NAME, "")
}

/// Gear cards: attack, defence and mining stats.
#[derive(Clone, Copy, Debug, Default)]
pub struct EquipmentRules;

impl CategoryRules for EquipmentRules {
    fn category(&self) -> Category {
        Category::Equipment
    }

    fn shuffles_rows(&self) -> bool {
        true
    }

    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError> {
        let category = self.category();
        let name = name_of(row, header);
        let attack = required_int(row, header, COL_ATTACK)?;
        let defence = required_int(row, header, COL_DEFENCE)?;
        let mining = required_int(row, header, COL_MINING)?;
        let cost = optional_or_default(row, header, COL_COST, 0, category);
        let deck_count = count(optional_or_default(row, header, COL_COUNT, 1, category));

        Ok(CardRecord::new(name, category)
            .with_attr(ATTACK, attack)
            .with_attr(DEFENCE, defence)
            .with_attr(MINING, mining)
            .with_attr(COST, cost)
            .with_line(display_name(name, category.fallback_name()))
            .with_line(display_text(lookup(row, header, COL_ABILITY, "")))
            .with_line(attack.to_string())
            .with_line(mining.to_string())
            .with_line(defence.to_string())
            .with_plan(plan_with_extras(row, header, deck_count, category)))
    }
}

/// One-shot utility cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct UtilityRules;

impl CategoryRules for UtilityRules {
    fn category(&self) -> Category {
        Category::Utility
    }

    fn shuffles_rows(&self) -> bool {
        true
    }

    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError> {
        let category = self.category();
        let name = name_of(row, header);
        let deck_count = count(required_int(row, header, COL_COUNT)?);
        let cost = optional_or_default(row, header, COL_COST, 0, category);

        Ok(CardRecord::new(name, category)
            .with_attr(COST, cost)
            .with_line(display_name(name, category.fallback_name()))
            .with_line(display_text(lookup(row, header, COL_DESCRIPTION, "")))
            .with_plan(plan_with_extras(row, header, deck_count, category)))
    }
}

/// Gold-bearing resource cards. Table order is kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResourceRules;

impl CategoryRules for ResourceRules {
    fn category(&self) -> Category {
        Category::Resource
    }

    fn shuffles_rows(&self) -> bool {
        false
    }

    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError> {
        let category = self.category();
        let name = name_of(row, header);
        let gold = required_int(row, header, COL_GOLD)?;
        let deck_count = count(required_int(row, header, COL_COUNT)?);

        Ok(CardRecord::new(name, category)
            .with_attr(GOLD, gold)
            .with_line(gold.to_string())
            .with_line(display_name(name, category.fallback_name()))
            .with_line(display_text(lookup(row, header, COL_DESCRIPTION, "")))
            .with_plan(plan_with_extras(row, header, deck_count, category)))
    }
}

/// Monsters for the side deck.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonsterRules;

impl CategoryRules for MonsterRules {
    fn category(&self) -> Category {
        Category::Monster
    }

    fn shuffles_rows(&self) -> bool {
        true
    }

    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError> {
        let category = self.category();
        let name = name_of(row, header);
        let attack = required_int(row, header, COL_ATTACK)?;
        let defence = required_int(row, header, COL_DEFENCE)?;
        let deck_count = count(required_int(row, header, COL_COUNT)?);
        let reward = lookup(row, header, COL_REWARD, "");
        let penalty = lookup(row, header, COL_PENALTY, "");

        let text = compose(
            lookup(row, header, COL_DESCRIPTION, ""),
            &[("Reward", reward), ("Penalty", penalty)],
        );

        Ok(CardRecord::new(name, category)
            .with_attr(ATTACK, attack)
            .with_attr(DEFENCE, defence)
            .with_attr(REWARD, display_text(reward))
            .with_attr(PENALTY, display_text(penalty))
            .with_line(display_name(name, category.fallback_name()))
            .with_line(text)
            .with_line(attack.to_string())
            .with_line(defence.to_string())
            .with_plan(ReplicationPlan::deck_only(deck_count)))
    }
}

/// Mine cards: a defence value to dig through and an optional reward.
#[derive(Clone, Copy, Debug, Default)]
pub struct MineRules;

impl CategoryRules for MineRules {
    fn category(&self) -> Category {
        Category::Mine
    }

    fn shuffles_rows(&self) -> bool {
        true
    }

    fn build(&self, row: &Row, header: &HeaderIndex) -> Result<CardRecord, FieldError> {
        let category = self.category();
        let name = name_of(row, header);
        let defence = required_int(row, header, COL_DEFENCE)?;
        let deck_count = count(required_int(row, header, COL_COUNT)?);
        let reward = lookup(row, header, COL_REWARD, "");

        Ok(CardRecord::new(name, category)
            .with_attr(DEFENCE, defence)
            .with_attr(REWARD, display_text(reward))
            .with_line(display_name(name, category.fallback_name()))
            .with_line(compose(lookup(row, header, COL_DESCRIPTION, ""), &[("Reward", reward)]))
            .with_line(defence.to_string())
            .with_plan(ReplicationPlan::deck_only(deck_count)))
    }
}

/// Rules for a category.
#[must_use]
pub fn rules_for(category: Category) -> &'static dyn CategoryRules {
    match category {
        Category::Equipment => &EquipmentRules,
        Category::Utility => &UtilityRules,
        Category::Resource => &ResourceRules,
        Category::Monster => &MonsterRules,
        Category::Mine => &MineRules,
    }
}

/// Build every valid record of a table.
///
/// Records come back in processing order (shuffled for categories that
/// shuffle rows); `source_row` keeps the original data-row index.
pub fn build_records(rules: &dyn CategoryRules, table: &Table, rng: &mut GameRng) -> Vec<CardRecord> {
    let category = rules.category();
    let header = table.header();

    let mut order: Vec<usize> = (0..table.rows().len()).collect();
    if rules.shuffles_rows() {
        rng.shuffle(&mut order);
    }

    let mut records = Vec::with_capacity(order.len());
    for index in order {
        let row = &table.rows()[index];
        if row.is_malformed() {
            log::warn!("{} row {}: unterminated quote, joined to end of line", category, index);
        }

        match rules.build(row, header) {
            Ok(record) => records.push(record.at_row(index)),
            Err(_) if row.is_blank() => log::debug!("{} row {}: blank, skipped", category, index),
            Err(e) => log::warn!("{} row {} (`{}`): {}, skipped", category, index, name_of(row, header), e),
        }
    }

    log::debug!("{}: {} of {} rows built", category, records.len(), table.rows().len());
    records
}
