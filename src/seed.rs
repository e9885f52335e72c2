//! Default showreel content.

use serde::Serialize;

use crate::models::{NewReel, Reel};
use crate::storage::{ReelStore, StoreError};

struct SeedReel {
    title: &'static str,
    description: &'static str,
    filename: &'static str,
    is_featured: bool,
}

// Video files are served by the front end from `/reels/`.
static SEED_REELS: [SeedReel; 5] = [
    SeedReel {
        title: "Ambiance Edit",
        description: "Edit for a Premium Restaurant.",
        filename: "alcove video.mp4",
        is_featured: true,
    },
    SeedReel {
        title: "Event Edit",
        description: "Edit for Ncell Event.",
        filename: "reel2.mp4",
        is_featured: false,
    },
    SeedReel {
        title: "College Event Edit",
        description: "One of my college event edit.",
        filename: "reel3.mp4",
        is_featured: false,
    },
    SeedReel {
        title: "Social Media Edit",
        description: "Edit for a short form reel.",
        filename: "reel4.mp4",
        is_featured: false,
    },
    SeedReel {
        title: "Educational Content Edit",
        description: "Short & High Retention rate focused edit",
        filename: "reel5.mp4",
        is_featured: false,
    },
];

#[derive(Debug, Serialize)]
pub struct SeedOutcome {
    pub message: &'static str,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reels: Option<Vec<Reel>>,
}

impl SeedOutcome {
    pub fn was_seeded(&self) -> bool {
        self.reels.is_some()
    }
}

fn seed_entries() -> impl Iterator<Item = NewReel> {
    SEED_REELS.iter().map(|seed| {
        NewReel::new(seed.title, format!("/reels/{}", seed.filename))
            .description(seed.description)
            .featured(seed.is_featured)
    })
}

/// Inserts the default reels into an empty store. A store that already
/// holds reels is left untouched.
#[tracing::instrument(name = "Seed reels", skip_all)]
pub async fn seed_reels(store: &dyn ReelStore) -> Result<SeedOutcome, StoreError> {
    let existing = store.list().await?;
    if !existing.is_empty() {
        tracing::info!(count = existing.len(), "Reels already seeded");
        return Ok(SeedOutcome {
            message: "Database already seeded",
            count: existing.len(),
            reels: None,
        });
    }

    tracing::info!("Seeding reels");
    let mut reels = Vec::with_capacity(SEED_REELS.len());
    for reel in seed_entries() {
        reels.push(store.create(reel).await?);
    }
    tracing::info!(count = reels.len(), "Reels seeded successfully");

    Ok(SeedOutcome {
        message: "Database seeded successfully",
        count: reels.len(),
        reels: Some(reels),
    })
}
