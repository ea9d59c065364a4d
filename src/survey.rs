use std::path::Path;

use geo::Point;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::amenities::WalkSettings;
use crate::ors::error::OrsError;
use crate::ors::Router;

#[derive(thiserror::Error, Debug)]
pub enum SurveyError {
    #[error("Routing error: {0}")]
    Routing(#[from] OrsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid survey file: {0}")]
    Fixture(#[from] serde_json::Error),
}

pub type SurveyResult<T> = Result<T, SurveyError>;

const CSV_HEADER: [&str; 8] = [
    "distance",
    "duration",
    "building_id",
    "tram_id",
    "building_location",
    "tram_location",
    "walkable",
    "title",
];

/// Building corners and tram stops to measure between, as `[lon, lat]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyFixture {
    pub corners: Vec<[f64; 2]>,
    pub stops: Vec<[f64; 2]>,
}

impl Default for SurveyFixture {
    fn default() -> Self {
        SurveyFixture {
            corners: vec![
                [7.1963753, 43.6843149],
                [7.1955384, 43.6859519],
                [7.1946765, 43.6873587],
                [7.1936402, 43.6895651],
            ],
            stops: vec![
                [7.196325733545356, 43.698232838994926],
                [7.203130950929075, 43.682960843196156],
                [7.201735081387961, 43.6875885406119],
                [7.199416997095028, 43.692646907792415],
            ],
        }
    }
}

impl SurveyFixture {
    pub fn load(path: &Path) -> SurveyResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let fixture = serde_json::from_str(&data)?;
        Ok(fixture)
    }
}

/// Route summary of one corner to stop pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyRow {
    pub distance: f64,
    pub duration: f64,
    pub building_id: usize,
    pub tram_id: usize,
    pub building_location: [f64; 2],
    pub tram_location: [f64; 2],
    pub walkable: bool,
    pub title: String,
}

impl SurveyRow {
    /// Numbers always carry a fractional part (`600.0`), flags are `True`/`False`
    fn record(&self) -> [String; 8] {
        [
            format!("{:?}", self.distance),
            format!("{:?}", self.duration),
            self.building_id.to_string(),
            self.tram_id.to_string(),
            format_location(self.building_location),
            format_location(self.tram_location),
            format_flag(self.walkable).to_string(),
            self.title.clone(),
        ]
    }
}

fn format_location([lon, lat]: [f64; 2]) -> String {
    format!("({:?}, {:?})", lon, lat)
}

fn format_flag(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Routes every corner to every stop, in order, pausing `settings.pacing` before each
pub async fn distance_to_transport<R: Router>(
    router: &R,
    fixture: &SurveyFixture,
    settings: &WalkSettings,
) -> SurveyResult<Vec<SurveyRow>> {
    let mut rows = Vec::with_capacity(fixture.corners.len() * fixture.stops.len());

    for (building_id, corner) in fixture.corners.iter().enumerate() {
        for (tram_id, stop) in fixture.stops.iter().enumerate() {
            sleep(settings.pacing).await;

            let from = Point::new(corner[0], corner[1]);
            let to = Point::new(stop[0], stop[1]);
            let summary = router.route(from, to, settings.mode).await?.summary()?;

            rows.push(SurveyRow {
                distance: summary.distance,
                duration: summary.duration,
                building_id,
                tram_id,
                building_location: *corner,
                tram_location: *stop,
                walkable: summary.duration < settings.max_duration_secs,
                title: format!("building {} to tram {}", building_id, tram_id),
            });
        }
    }

    log::info!(
        "Survey done, {} of {} pairs walkable",
        rows.iter().filter(|r| r.walkable).count(),
        rows.len()
    );
    Ok(rows)
}

/// Overwrites `path` with one line per row under a header
pub fn write_csv(path: &Path, rows: &[SurveyRow]) -> SurveyResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;
    use crate::amenities::WalkSettingsBuilder;
    use crate::test_utils::{init, ScriptedRouter};

    fn settings() -> WalkSettings {
        WalkSettingsBuilder::default()
            .pacing(Duration::ZERO)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_all_pairs_in_order() {
        init();
        let fixture = SurveyFixture::default();
        let router = ScriptedRouter::new()
            .with_default(1000.0)
            .with_duration(Point::new(7.201735081387961, 43.6875885406119), 600.0);

        let rows = distance_to_transport(&router, &fixture, &settings())
            .await
            .unwrap();

        assert_eq!(rows.len(), 16);
        assert_eq!(rows[0].title, "building 0 to tram 0");
        assert_eq!(rows[5].building_id, 1);
        assert_eq!(rows[5].tram_id, 1);
        assert_eq!(rows[15].title, "building 3 to tram 3");
        assert_eq!(rows[6].building_location, fixture.corners[1]);
        assert_eq!(rows[6].tram_location, fixture.stops[2]);

        let walkable: Vec<usize> = rows.iter().filter(|r| r.walkable).map(|r| r.tram_id).collect();
        assert_eq!(walkable, vec![2, 2, 2, 2]);
    }

    #[tokio::test]
    async fn test_routing_error_propagates() {
        init();
        let result =
            distance_to_transport(&ScriptedRouter::failing(), &SurveyFixture::default(), &settings())
                .await;
        assert!(matches!(result, Err(SurveyError::Routing(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pairs_are_paced() {
        init();
        let fixture = SurveyFixture {
            corners: vec![[7.19, 43.68]],
            stops: vec![[7.20, 43.69], [7.21, 43.70]],
        };
        let settings = WalkSettingsBuilder::default()
            .pacing(Duration::from_millis(1200))
            .build()
            .unwrap();
        let start = tokio::time::Instant::now();

        distance_to_transport(&ScriptedRouter::new().with_default(60.0), &fixture, &settings)
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(2400));
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.csv");
        let rows = vec![SurveyRow {
            distance: 1120.5,
            duration: 806.8,
            building_id: 0,
            tram_id: 3,
            building_location: [7.1963753, 43.6843149],
            tram_location: [7.199416997095028, 43.692646907792415],
            walkable: true,
            title: "building 0 to tram 3".to_string(),
        }];

        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "distance,duration,building_id,tram_id,building_location,tram_location,walkable,title"
        );
        assert_eq!(
            lines[1],
            "1120.5,806.8,0,3,\"(7.1963753, 43.6843149)\",\"(7.199416997095028, 43.692646907792415)\",True,building 0 to tram 3"
        );
    }

    #[test]
    fn test_write_csv_whole_numbers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.csv");
        let rows = vec![SurveyRow {
            distance: 840.0,
            duration: 600.0,
            building_id: 2,
            tram_id: 0,
            building_location: [7.0, 43.0],
            tram_location: [7.196325733545356, 43.698232838994926],
            walkable: false,
            title: "building 2 to tram 0".to_string(),
        }];

        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written.lines().nth(1).unwrap(),
            "840.0,600.0,2,0,\"(7.0, 43.0)\",\"(7.196325733545356, 43.698232838994926)\",False,building 2 to tram 0"
        );
    }

    #[test]
    fn test_load_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey.json");
        std::fs::write(&path, r#"{"corners": [[1.0, 2.0]], "stops": [[3.0, 4.0], [5.0, 6.0]]}"#)
            .unwrap();

        let fixture = SurveyFixture::load(&path).unwrap();
        assert_eq!(fixture.corners, vec![[1.0, 2.0]]);
        assert_eq!(fixture.stops.len(), 2);
    }

    #[test]
    fn test_load_bad_fixture() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("survey.json");
        std::fs::write(&path, r#"{"corners": []}"#).unwrap();

        assert!(matches!(
            SurveyFixture::load(&path),
            Err(SurveyError::Fixture(_))
        ));
    }
}
