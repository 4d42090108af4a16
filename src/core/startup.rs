use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::booking::schedule::ClassSchedule;
use crate::core::config::Config;
use crate::stores::journaled::JournaledStore;
use crate::stores::memory::InMemoryStore;
use crate::stores::ReservationStore;

// this runs at boot time
pub fn open_store(config: &Config) -> Result<Arc<dyn ReservationStore>> {
    match &config.storage.journal_path {
        Some(path) => {
            let store = JournaledStore::open(path.clone())
                .context(format!("Failed to open reservation journal: {}", path.display()))?;
            info!(
                journal = %path.display(),
                reservations = store.len(),
                "Reservation store ready"
            );
            Ok(Arc::new(store))
        }
        None => {
            warn!("No journal_path configured, reservations will be lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

pub fn load_schedule(config: &Config) -> Result<ClassSchedule> {
    let Some(path) = &config.schedule.class_blocks_path else {
        info!("No class_blocks_path configured, starting with an empty class schedule");
        return Ok(ClassSchedule::default());
    };

    let schedule = ClassSchedule::from_file(path)?;

    for block in schedule.blocks() {
        if !config.booking.rooms.contains(&block.room) {
            warn!(
                room = block.room,
                weekday = block.weekday,
                "Class block refers to a room that is not configured"
            );
        }
    }

    info!(
        path = %path.display(),
        blocks = schedule.len(),
        "Class schedule loaded"
    );

    Ok(schedule)
}
