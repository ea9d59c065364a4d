use std::time::Duration;

use derive_builder::Builder;
use geo::Point;
use serde::Serialize;
use tokio::time::sleep;

use super::error::AmenityResult;
use super::taxonomy::{count_categories, is_allowed, ByTag, CategoryCounts};
use crate::ors::entities::TravelMode;
use crate::ors::Router;
use crate::overpass::entities::AmenityElement;

pub const DEFAULT_MAX_WALK_SECONDS: f64 = 900.0;
pub const DEFAULT_ROUTE_DELAY: Duration = Duration::from_millis(1500);

/// What counts as walkable, and how hard to lean on the routing service
#[derive(Debug, Clone, Builder)]
pub struct WalkSettings {
    /// Exclusive upper bound on route duration
    #[builder(default = "DEFAULT_MAX_WALK_SECONDS")]
    pub max_duration_secs: f64,
    /// Pause before every route lookup
    #[builder(default = "DEFAULT_ROUTE_DELAY")]
    pub pacing: Duration,
    #[builder(default)]
    pub mode: TravelMode,
}

impl Default for WalkSettings {
    fn default() -> Self {
        WalkSettings {
            max_duration_secs: DEFAULT_MAX_WALK_SECONDS,
            pacing: DEFAULT_ROUTE_DELAY,
            mode: TravelMode::FootWalking,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Collected {
    pub count: usize,
    pub elements: Vec<AmenityElement>,
}

/// The walkable amenities around one origin.
///
/// Tags appear in `categories` and `collection` in the order they were first found.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Aggregation {
    pub count: CategoryCounts,
    pub categories: ByTag<u32>,
    pub collection: ByTag<Collected>,
}

impl Aggregation {
    fn add(&mut self, tag: &str, element: AmenityElement) {
        *self.categories.entry(tag) += 1;

        let collected = self.collection.entry(tag);
        collected.elements.push(element);
        collected.count = collected.elements.len();
    }
}

/// The tag an element is filed under, if it's one we collect.
///
/// Public transport shelters are filed as stops rather than shelters.
pub fn classify(element: &AmenityElement) -> Option<&'static str> {
    let amenity = element.amenity()?;

    let tag = if amenity == "shelter" && element.tag("shelter_type") == Some("public_transport") {
        "public_transport_stop"
    } else {
        amenity
    };

    is_allowed(tag)
}

pub async fn in_walkable_distance<R: Router>(
    router: &R,
    from: Point,
    to: Point,
    settings: &WalkSettings,
) -> AmenityResult<bool> {
    let route = router.route(from, to, settings.mode).await?;
    let duration = route.summary()?.duration;

    if duration < settings.max_duration_secs {
        log::debug!("Facility within {:.0} minutes", duration / 60.0);
        Ok(true)
    } else {
        log::debug!(
            "Too far, expecting under {:.0} minutes, got {:.1}",
            settings.max_duration_secs / 60.0,
            duration / 60.0
        );
        Ok(false)
    }
}

/// Keeps the collectable elements within walking distance of `origin` and tallies them.
///
/// Elements are routed one at a time with `settings.pacing` between lookups.
/// Any routing failure aborts the whole run.
pub async fn process_result<R: Router>(
    router: &R,
    origin: Point,
    elements: Vec<AmenityElement>,
    settings: &WalkSettings,
) -> AmenityResult<Aggregation> {
    let mut aggregation = Aggregation::default();
    let total = elements.len();

    for element in elements {
        let Some(tag) = classify(&element) else {
            continue;
        };

        let Some(position) = element.position() else {
            log::warn!(
                "Skipping {} ({:?} {}) with no position",
                tag,
                element.element_type(),
                element.id()
            );
            continue;
        };

        sleep(settings.pacing).await;

        if !in_walkable_distance(router, origin, position, settings).await? {
            continue;
        }

        aggregation.add(tag, element);
    }

    aggregation.count = count_categories(&aggregation.categories);

    log::info!(
        "{} of {} amenities within walking distance",
        aggregation.categories.values().sum::<u32>(),
        total
    );
    Ok(aggregation)
}
