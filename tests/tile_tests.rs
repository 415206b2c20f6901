//! Tile group tests.
//!
//! These tests verify the Tiles table path end to end:
//! - Terminator rows sealing groups
//! - Hex offsets and group anchors
//! - Random sixth-turn orientation with upright tiles
//! - Special tiles drawn as their own groups

use depths_tabletop::core::{Layout, SessionConfig, Tabletop, Vec2};
use depths_tabletop::table::{InMemoryTables, TableKind};
use depths_tabletop::tiles::{HexCoord, ORIENTATION_STEP};

fn build(tiles: &str, config: SessionConfig) -> Tabletop {
    let tables = InMemoryTables::new().with(TableKind::Tiles, tiles);
    Tabletop::build(config, &tables).unwrap()
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
}

/// Test that `[A, "", B, C, ""]` yields the groups `[A]` and `[B, C]`.
#[test]
fn test_two_groups_from_terminators() {
    let tabletop = build(
        "Name,Description,Coords\nA,Entrance,\"0,0\"\n,,\nB,Tunnel,\"0,0\"\nC,Chamber,\"1,0\"\n,,\n",
        SessionConfig::new(2).with_seed(1),
    );

    let groups = tabletop.groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].tile_names().collect::<Vec<_>>(), ["A"]);
    assert_eq!(groups[1].tile_names().collect::<Vec<_>>(), ["B", "C"]);
    assert_eq!(groups[0].tiles[0].description, "Entrance");
}

/// Test that group names stay unique when rows share a label.
#[test]
fn test_group_names_unique() {
    let tabletop = build(
        "Name,Coords,Group\nA,\"0,0\",Cave\n\nB,\"0,0\",Cave\n\nC,\"0,0\",Cave\n",
        SessionConfig::new(2).with_seed(1),
    );

    let names: Vec<_> = tabletop.groups().iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Cave0", "Cave2", "Cave4"]);
    assert!(tabletop.group("Cave2").is_some());
}

/// Test tile placement against the group anchor and rotation.
#[test]
fn test_tile_world_positions() {
    let layout = Layout {
        tile_origin: Vec2::new(10.0, 10.0),
        ..Layout::default()
    };
    let config = SessionConfig::new(2).with_seed(3).with_hex_size(100.0).with_layout(layout.clone());
    let tabletop = build("Name,Coords\nA,\"0,0\"\nB,\"2,0\"\nC,\"1,1\"\n", config);

    let group = &tabletop.groups()[0];
    assert_eq!(group.position.planar(), layout.group_anchor(0));

    // hex_size 100 → B is 3 world units along X before rotation.
    let b = &group.tiles[1];
    assert_eq!(b.coords, HexCoord::new(2, 0));
    assert!(close(b.offset, Vec2::new(3.0, 0.0)));
    assert!(close(b.position, Vec2::new(10.0, 10.0) + Vec2::new(3.0, 0.0).rotated(group.rotation_z)));

    let c = &group.tiles[2];
    assert!(close(c.offset, Vec2::new(1.5, 1.732_050_8 * 1.5)));
}

/// Test that rotations are drawn from the six orientations and vary across seeds.
#[test]
fn test_rotations() {
    let text = "Name,Coords\nA,\"0,0\"\n\nB,\"0,0\"\n\nC,\"0,0\"\n\nD,\"0,0\"\n";
    let mut seen = std::collections::BTreeSet::new();

    for seed in 0..30 {
        let tabletop = build(text, SessionConfig::new(1).with_seed(seed));
        for group in tabletop.groups() {
            let turns = group.rotation_z / ORIENTATION_STEP;
            assert_eq!(turns.fract(), 0.0);
            seen.insert(turns as u32);
            assert!(group.tiles.iter().all(|t| t.rotation_z == 0.0));
        }
    }

    assert!(seen.len() > 1);
    assert!(seen.iter().all(|t| *t < 6));
}

/// Test that moving a group through `group_mut` carries its tiles.
#[test]
fn test_group_mut_moves_tiles() {
    let mut tabletop = build("Name,Coords\nA,\"0,0\"\nB,\"2,0\"\n", SessionConfig::new(2).with_seed(4));

    let group = tabletop.group_mut("Group0").unwrap();
    group.set_pose(depths_tabletop::Position::new(-5.0, 0.0, 0.0), 0.0);

    let group = tabletop.group("Group0").unwrap();
    assert!(close(group.tiles[0].position, Vec2::new(-5.0, 0.0)));
    assert!(close(group.tiles[1].position, Vec2::new(-5.0 + 1.5, 0.0)));
}

/// Test that special tiles are pooled and drawn according to the config.
#[test]
fn test_special_tiles() {
    let text = "Name,Coords,Special\nA,\"0,0\",\nRelic,\"0,0\",x\nB,\"0,1\",\n\nIdol,\"0,0\",yes\n";

    let none = build(text, SessionConfig::new(2).with_seed(5));
    assert_eq!(none.groups().len(), 1);
    assert_eq!(none.groups()[0].tile_names().collect::<Vec<_>>(), ["A", "B"]);

    let one = build(text, SessionConfig::new(2).with_seed(5).with_special_tiles(1));
    assert_eq!(one.groups().len(), 2);
    let special = &one.groups()[1];
    assert_eq!(special.len(), 1);
    assert!(special.name == "Group1" || special.name == "Group4");

    let all = build(text, SessionConfig::new(2).with_seed(5).with_special_tiles(5));
    assert_eq!(all.groups().len(), 3);
    assert_eq!(all.group("Group4").map(|g| g.tiles[0].name.as_str()), Some("Idol"));
}
