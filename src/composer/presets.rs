//! Canned scenes, expressed as configuration and run through the regular composer.

use super::config::{
    BuildingConfig, EntranceConfig, RoadConfig, SceneConfig, SceneSettings, TreeConfig, DEFAULT_SEED,
};

fn settings(name: &str) -> SceneSettings {
    SceneSettings {
        name: name.into(),
        seed: DEFAULT_SEED,
    }
}

fn no_road() -> Option<RoadConfig> {
    Some(RoadConfig {
        enabled: false,
        ..Default::default()
    })
}

fn road(length: f32, y: f32) -> Option<RoadConfig> {
    Some(RoadConfig {
        enabled: true,
        length,
        width: 8.0,
        position: [0.0, y, 0.0],
    })
}

fn tree(index: usize, x: f32, y: f32, height: f32) -> TreeConfig {
    TreeConfig {
        name: Some(format!("Tree_{index}")),
        position: [x, y],
        height,
        height_range: None,
    }
}

fn random_tree(index: usize, x: f32, y: f32, range: [f32; 2]) -> TreeConfig {
    TreeConfig {
        height_range: Some(range),
        ..tree(index, x, y, range[0])
    }
}

fn entrance(width: f32, height: f32) -> Option<EntranceConfig> {
    Some(EntranceConfig { width, height })
}

/// Two-story building with wall text, an entrance and two trees.
pub fn building_basic() -> SceneConfig {
    SceneConfig {
        scene: settings("building_basic"),
        buildings: vec![BuildingConfig {
            name: "Building_Basic".into(),
            wall_color: [0.9, 0.85, 0.75],
            text: Some("TEST".into()),
            text_floor: 2,
            entrance: entrance(2.5, 2.8),
            ..Default::default()
        }],
        road: no_road(),
        trees: vec![tree(1, -7.0, -2.0, 5.0), tree(2, 7.0, -2.0, 4.0)],
    }
}

/// Three-story office by the road.
pub fn office_building() -> SceneConfig {
    SceneConfig {
        scene: settings("office_building"),
        buildings: vec![BuildingConfig {
            name: "Office_Building".into(),
            width: 12.0,
            depth: 10.0,
            floor_height: 4.0,
            floors: 3,
            wall_color: [0.7, 0.75, 0.8],
            text: Some("OFFICE".into()),
            text_color: [0.1, 0.2, 0.4],
            text_floor: 3,
            entrance: entrance(3.0, 3.0),
            ..Default::default()
        }],
        road: road(40.0, -18.0),
        trees: [-12.0, -8.0, 8.0, 12.0]
            .into_iter()
            .enumerate()
            .map(|(i, x)| random_tree(i, x, -8.0, [3.5, 5.5]))
            .collect(),
    }
}

/// Single-story shop with its name standing on the roof edge.
pub fn shop_building() -> SceneConfig {
    SceneConfig {
        scene: settings("shop_building"),
        buildings: vec![BuildingConfig {
            name: "Shop_Building".into(),
            width: 8.0,
            depth: 6.0,
            floor_height: 4.0,
            floors: 1,
            wall_color: [0.95, 0.9, 0.8],
            text: Some("SHOP".into()),
            text_color: [0.8, 0.2, 0.1],
            text_position: "roof".into(),
            text_size: 1.2,
            entrance: entrance(3.0, 2.8),
            ..Default::default()
        }],
        road: no_road(),
        trees: vec![tree(1, -6.0, 0.0, 3.5)],
    }
}

/// Apartment, office and cafe side by side along one road.
pub fn city_block() -> SceneConfig {
    SceneConfig {
        scene: settings("city_block"),
        buildings: vec![
            BuildingConfig {
                name: "Apartment_1".into(),
                floor_height: 3.0,
                wall_color: [0.85, 0.8, 0.7],
                position: [-15.0, 0.0],
                text: Some("APT".into()),
                text_floor: 2,
                ..Default::default()
            },
            BuildingConfig {
                name: "Office_1".into(),
                width: 12.0,
                depth: 10.0,
                floors: 3,
                wall_color: [0.75, 0.78, 0.85],
                position: [5.0, 0.0],
                text: Some("CORP".into()),
                text_color: [0.15, 0.25, 0.5],
                text_floor: 3,
                entrance: entrance(3.0, 3.0),
                ..Default::default()
            },
            BuildingConfig {
                name: "Cafe".into(),
                width: 6.0,
                depth: 5.0,
                floors: 1,
                wall_color: [0.9, 0.85, 0.75],
                position: [22.0, 0.0],
                text: Some("CAFE".into()),
                text_color: [0.6, 0.3, 0.1],
                ..Default::default()
            },
        ],
        road: road(60.0, -18.0),
        trees: [-20.0, -10.0, 0.0, 10.0, 20.0]
            .into_iter()
            .enumerate()
            .map(|(i, x)| random_tree(i, x, -8.0, [3.0, 5.0]))
            .collect(),
    }
}

/// Dark three-story building with light lettering.
pub fn modern_building() -> SceneConfig {
    SceneConfig {
        scene: settings("modern_building"),
        buildings: vec![BuildingConfig {
            name: "Modern_Building".into(),
            width: 14.0,
            depth: 10.0,
            floor_height: 4.0,
            floors: 3,
            wall_color: [0.25, 0.28, 0.32],
            text: Some("MODERN".into()),
            text_color: [0.9, 0.9, 0.9],
            text_floor: 2,
            entrance: entrance(4.0, 3.5),
            ..Default::default()
        }],
        road: road(45.0, -20.0),
        trees: (0..6)
            .map(|i| random_tree(i, -15.0 + i as f32 * 6.0, -10.0, [4.0, 6.0]))
            .collect(),
    }
}

/// Every preset, in generation order.
pub fn all() -> Vec<SceneConfig> {
    vec![
        building_basic(),
        office_building(),
        shop_building(),
        city_block(),
        modern_building(),
    ]
}
