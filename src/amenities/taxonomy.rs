use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// User-facing categories and the raw amenity tags that count towards them.
///
/// A tag may appear under more than one category and then counts towards each.
pub const CATEGORY_NAMES: [(&str, &[&str]); 13] = [
    (
        "Grocery stores and markets for food shopping",
        &["marketplace"],
    ),
    (
        "Pharmacies for prescription medications and health products",
        &["pharmacy", "hospital", "doctors", "clinic", "dentist"],
    ),
    (
        "Medical clinics for routine checkups and non-emergency medical care",
        &["hospital", "doctors"],
    ),
    (
        "Parks and public spaces for outdoor recreation and leisure activities",
        &["bench", "shelter", "drinking_water"],
    ),
    (
        "Schools for education and child development",
        &["school", "college"],
    ),
    (
        "Post offices for mail and package delivery",
        &["post_office", "post_box"],
    ),
    (
        "Community centres for social events and gatherings",
        &["social_facility", "community_centre", "nightclub"],
    ),
    (
        "Places of worship for religious or spiritual needs",
        &["place_of_worship"],
    ),
    (
        "Restaurants and cafes for dining and socializing",
        &["restaurant", "fast_food", "cafe", "bar", "ice_cream", "pub"],
    ),
    (
        "Public transportation hubs for regional and city-wide travel",
        &["bicycle_rental", "bus_station", "public_transport_stop"],
    ),
    (
        "Fitness centres and gyms for exercise and physical activity",
        &["gym"],
    ),
    (
        "Entertainment and cultural venues for art, music, and cultural events",
        &["theatre", "cinema", "events_venue"],
    ),
    (
        "Childcare facilities for families with young children",
        &["childcare", "kindergarten"],
    ),
];

/// Tags that are routed to and collected. `bench` is listed in the taxonomy
/// but never collected; `car_rental` is collected but belongs to no category.
pub const ALL_CATEGORIES: [&str; 32] = [
    "marketplace",
    "pharmacy",
    "hospital",
    "doctors",
    "clinic",
    "dentist",
    "shelter",
    "drinking_water",
    "school",
    "college",
    "post_office",
    "post_box",
    "social_facility",
    "community_centre",
    "nightclub",
    "place_of_worship",
    "restaurant",
    "fast_food",
    "cafe",
    "bar",
    "ice_cream",
    "pub",
    "bicycle_rental",
    "car_rental",
    "bus_station",
    "gym",
    "theatre",
    "cinema",
    "events_venue",
    "childcare",
    "kindergarten",
    "public_transport_stop",
];

pub fn is_allowed(tag: &str) -> Option<&'static str> {
    ALL_CATEGORIES.iter().find(|t| **t == tag).copied()
}

/// Per-category totals, kept in taxonomy order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryCounts(Vec<(&'static str, u32)>);

impl CategoryCounts {
    pub fn get(&self, category: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, u32)> {
        self.0.iter()
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

/// Values keyed by amenity tag, in the order the tags were first seen
#[derive(Debug, Clone, PartialEq)]
pub struct ByTag<V>(Vec<(String, V)>);

impl<V> Default for ByTag<V> {
    fn default() -> Self {
        ByTag(Vec::new())
    }
}

impl<V> ByTag<V> {
    pub fn get(&self, tag: &str) -> Option<&V> {
        self.0.iter().find(|(t, _)| t == tag).map(|(_, v)| v)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl<V: Default> ByTag<V> {
    /// The value for `tag`, appended with its default if the tag is new
    pub fn entry(&mut self, tag: &str) -> &mut V {
        let index = match self.0.iter().position(|(t, _)| t == tag) {
            Some(index) => index,
            None => {
                self.0.push((tag.to_string(), V::default()));
                self.0.len() - 1
            }
        };
        &mut self.0[index].1
    }
}

impl<V: Serialize> Serialize for ByTag<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (tag, value) in &self.0 {
            map.serialize_entry(tag, value)?;
        }
        map.end()
    }
}

pub fn count_categories(categories: &ByTag<u32>) -> CategoryCounts {
    let counts = CATEGORY_NAMES
        .iter()
        .map(|(name, tags)| {
            let count = tags
                .iter()
                .map(|tag| categories.get(*tag).copied().unwrap_or(0))
                .sum();
            (*name, count)
        })
        .collect();
    CategoryCounts(counts)
}
