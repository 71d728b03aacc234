//! A consumer that simply holds one of each container.
//!
//! `ShowcasePlugin` fills a [`Showcase`] resource at startup and, every
//! update, pushes it through both save formats in memory, recording whether
//! the restored copy matches.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collections::{Grid, OrderedSet, PersistentMap, PersistentQueue, SortOrder};
use crate::date_time::StoredDateTime;
use crate::storage::{load_from_reader, save_to_writer, PersistError, PersistFormat};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Showcase {
    pub grid: Grid<i32>,
    pub dictionary: PersistentMap<String, f32>,
    pub hash_set: OrderedSet<f32>,
    pub waypoints: PersistentQueue<Vec2>,
    pub timestamp: StoredDateTime,
}

impl Default for Showcase {
    fn default() -> Self {
        Self {
            grid: Grid::new(3, 3).unwrap_or_default(),
            dictionary: PersistentMap::new(),
            hash_set: OrderedSet::new(),
            waypoints: PersistentQueue::new(),
            timestamp: StoredDateTime::default(),
        }
    }
}

/// Outcome of the most recent in-memory round trip.
#[derive(Resource, Default, Debug, Clone)]
pub struct RoundTripReport {
    pub rounds: u32,
    pub ron_bytes: usize,
    pub bincode_bytes: usize,
    pub ron_matches: bool,
    pub bincode_matches: bool,
}

pub struct ShowcasePlugin;

impl Plugin for ShowcasePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Showcase>();
        app.init_resource::<RoundTripReport>();
        app.add_systems(Startup, populate_showcase);
        app.add_systems(Update, round_trip_showcase);
    }
}

pub fn populate_showcase(mut showcase: ResMut<Showcase>) {
    let width = showcase.grid.width();
    for (x, y) in (0..showcase.grid.height()).flat_map(|y| (0..width).map(move |x| (x, y))) {
        if let Ok(cell) = showcase.grid.get_mut(x, y) {
            *cell = (y * width + x) as i32;
        }
    }

    showcase.dictionary.insert("unit_speed".to_string(), 5.0);
    showcase.dictionary.insert("unit_radius".to_string(), 0.5);
    showcase.dictionary.insert("friction".to_string(), 0.9);

    for value in [1.5, 2.5, 1.5, 4.0] {
        showcase.hash_set.add(value);
    }

    showcase.waypoints.enqueue_all([
        Vec2::new(10.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-4.0, 3.0),
    ]);
    showcase
        .waypoints
        .sort_by(|point| point.length(), SortOrder::Ascending);

    showcase.timestamp = StoredDateTime::from(chrono::Local::now().naive_local());

    info!(
        "Showcase populated: {} cells, {} map entries, {} set items, {} waypoints, stamped {}",
        showcase.grid.len(),
        showcase.dictionary.len(),
        showcase.hash_set.len(),
        showcase.waypoints.len(),
        showcase.timestamp
    );
}

pub fn round_trip_showcase(showcase: Res<Showcase>, mut report: ResMut<RoundTripReport>) {
    report.rounds += 1;

    match round_trip(&showcase, PersistFormat::Ron) {
        Ok((bytes, matches)) => {
            report.ron_bytes = bytes;
            report.ron_matches = matches;
        }
        Err(err) => {
            warn!("Showcase RON round trip failed: {}", err);
            report.ron_matches = false;
        }
    }

    match round_trip(&showcase, PersistFormat::Bincode) {
        Ok((bytes, matches)) => {
            report.bincode_bytes = bytes;
            report.bincode_matches = matches;
        }
        Err(err) => {
            warn!("Showcase bincode round trip failed: {}", err);
            report.bincode_matches = false;
        }
    }

    debug!(
        "Round trip {}: ron {} bytes (match={}), bincode {} bytes (match={})",
        report.rounds,
        report.ron_bytes,
        report.ron_matches,
        report.bincode_bytes,
        report.bincode_matches
    );
}

fn round_trip(showcase: &Showcase, format: PersistFormat) -> Result<(usize, bool), PersistError> {
    let mut buffer = Vec::new();
    save_to_writer(&mut buffer, showcase, format)?;
    let restored: Showcase = load_from_reader(buffer.as_slice(), format)?;
    Ok((buffer.len(), restored == *showcase))
}
