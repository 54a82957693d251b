use crate::model::{
    Driver, DriverId, LapPosition, PitStop, QualifyingRecord, Race, RaceId, RaceResult, Standing,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

/// Raw source tables as loaded from storage.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub drivers: Vec<Driver>,
    pub races: Vec<Race>,
    pub results: Vec<RaceResult>,
    pub qualifying: Vec<QualifyingRecord>,
    pub lap_times: Vec<LapPosition>,
    pub pit_stops: Vec<PitStop>,
    pub standings: Vec<Standing>,
}

#[derive(Debug, Default)]
struct DriverIndex {
    results: Vec<usize>,
    qualifying: Vec<usize>,
    lap_times: Vec<usize>,
    pit_stops: Vec<usize>,
    standings: Vec<usize>,
}

/// The full dataset for one calculation run. Read-only once built.
#[derive(Debug)]
pub struct Dataset {
    tables: Tables,
    all_results: Arc<[RaceResult]>,
    season_results: HashMap<i32, Arc<[RaceResult]>>,
    races: HashMap<RaceId, usize>,
    drivers: HashMap<DriverId, usize>,
    by_driver: HashMap<DriverId, DriverIndex>,
}

type RaceKey = (Option<i32>, Option<u32>, RaceId);

impl Dataset {
    /// Enriches results with year/round/circuit from the calendar and sorts
    /// every table chronologically.
    pub fn new(mut tables: Tables) -> Self {
        let races: HashMap<RaceId, usize> = tables
            .races
            .iter()
            .enumerate()
            .map(|(i, r)| (r.race_id, i))
            .collect();

        for r in tables.results.iter_mut() {
            if let Some(race) = races.get(&r.race_id).map(|i| &tables.races[*i]) {
                r.year = r.year.or(Some(race.year));
                r.round = r.round.or(Some(race.round));
                if r.circuit.is_none() {
                    r.circuit = race.circuit.clone();
                }
            }
        }

        let key = |race_id: RaceId| -> RaceKey {
            match races.get(&race_id).map(|i| &tables.races[*i]) {
                Some(r) => (Some(r.year), Some(r.round), race_id),
                None => (None, None, race_id),
            }
        };
        tables
            .results
            .sort_by_key(|r| (r.year, r.round, r.race_id, r.position_order, r.driver_id));
        tables
            .qualifying
            .sort_by_key(|q| (key(q.race_id), q.driver_id));
        tables
            .lap_times
            .sort_by_key(|l| (key(l.race_id), l.driver_id, l.lap));
        tables
            .pit_stops
            .sort_by_key(|p| (key(p.race_id), p.driver_id, p.stop));
        tables
            .standings
            .sort_by_key(|s| (key(s.race_id), s.driver_id));

        let mut by_driver: HashMap<DriverId, DriverIndex> = HashMap::new();
        for (i, r) in tables.results.iter().enumerate() {
            by_driver.entry(r.driver_id).or_default().results.push(i);
        }
        for (i, q) in tables.qualifying.iter().enumerate() {
            by_driver.entry(q.driver_id).or_default().qualifying.push(i);
        }
        for (i, l) in tables.lap_times.iter().enumerate() {
            by_driver.entry(l.driver_id).or_default().lap_times.push(i);
        }
        for (i, p) in tables.pit_stops.iter().enumerate() {
            by_driver.entry(p.driver_id).or_default().pit_stops.push(i);
        }
        for (i, s) in tables.standings.iter().enumerate() {
            by_driver.entry(s.driver_id).or_default().standings.push(i);
        }

        let mut seasons: BTreeMap<i32, Vec<RaceResult>> = BTreeMap::new();
        for r in &tables.results {
            if let Some(y) = r.year {
                seasons.entry(y).or_default().push(r.clone());
            }
        }
        let season_results: HashMap<i32, Arc<[RaceResult]>> = seasons
            .into_iter()
            .map(|(y, rows)| (y, Arc::from(rows)))
            .collect();

        let drivers = tables
            .drivers
            .iter()
            .enumerate()
            .map(|(i, d)| (d.driver_id, i))
            .collect();
        let all_results: Arc<[RaceResult]> = Arc::from(tables.results.clone());

        Self {
            tables,
            all_results,
            season_results,
            races,
            drivers,
            by_driver,
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn all_results(&self) -> Arc<[RaceResult]> {
        self.all_results.clone()
    }

    pub fn driver(&self, driver_id: DriverId) -> Option<&Driver> {
        self.drivers.get(&driver_id).map(|i| &self.tables.drivers[*i])
    }

    pub fn race(&self, race_id: RaceId) -> Option<&Race> {
        self.races.get(&race_id).map(|i| &self.tables.races[*i])
    }

    /// Looks a driver up by numeric id, then by reference (case-insensitive).
    pub fn find_driver(&self, needle: &str) -> Option<&Driver> {
        let needle = needle.trim();
        if let Ok(id) = needle.parse::<DriverId>() {
            if let Some(d) = self.driver(id) {
                return Some(d);
            }
        }
        self.tables
            .drivers
            .iter()
            .find(|d| d.reference.eq_ignore_ascii_case(needle))
    }

    pub fn driver_name(&self, driver_id: DriverId) -> String {
        self.driver(driver_id)
            .map(Driver::full_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Driver {}", driver_id))
    }

    pub fn race_count(&self, driver_id: DriverId) -> usize {
        self.by_driver
            .get(&driver_id)
            .map(|ix| ix.results.len())
            .unwrap_or(0)
    }

    /// Drivers with at least `min_races` results, most races first.
    pub fn eligible_drivers(&self, min_races: usize, limit: Option<usize>) -> Vec<DriverId> {
        let mut counts: Vec<(DriverId, usize)> = self
            .by_driver
            .iter()
            .map(|(id, ix)| (*id, ix.results.len()))
            .filter(|(_, n)| *n > 0 && *n >= min_races)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let ids = counts.into_iter().map(|(id, _)| id);
        match limit {
            Some(n) => ids.take(n).collect(),
            None => ids.collect(),
        }
    }

    /// Seasons in which the driver has at least `min_results` results, with counts.
    pub fn driver_seasons(&self, driver_id: DriverId, min_results: usize) -> Vec<(i32, usize)> {
        let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
        if let Some(ix) = self.by_driver.get(&driver_id) {
            for i in &ix.results {
                if let Some(y) = self.tables.results[*i].year {
                    *per_year.entry(y).or_default() += 1;
                }
            }
        }
        per_year
            .into_iter()
            .filter(|(_, n)| *n >= min_results)
            .collect()
    }

    fn collect<T: Clone>(rows: &[T], idx: &[usize], keep: impl Fn(&T) -> bool) -> Vec<T> {
        idx.iter()
            .map(|i| &rows[*i])
            .filter(|r| keep(r))
            .cloned()
            .collect()
    }

    fn bundle_filtered(
        &self,
        driver_id: DriverId,
        season: Option<i32>,
        all_results: Arc<[RaceResult]>,
    ) -> DriverBundle {
        let empty = DriverIndex::default();
        let ix = self.by_driver.get(&driver_id).unwrap_or(&empty);
        let in_scope = |race_id: RaceId| match season {
            None => true,
            Some(y) => self.race(race_id).map(|r| r.year) == Some(y),
        };

        let results = Self::collect(&self.tables.results, &ix.results, |r| match season {
            None => true,
            Some(y) => r.year == Some(y),
        });
        let years: BTreeSet<i32> = results.iter().filter_map(|r| r.year).collect();
        let races = self
            .tables
            .races
            .iter()
            .filter(|r| years.contains(&r.year))
            .cloned()
            .collect();

        DriverBundle {
            driver_id,
            results,
            qualifying: Self::collect(&self.tables.qualifying, &ix.qualifying, |q| {
                in_scope(q.race_id)
            }),
            lap_times: Self::collect(&self.tables.lap_times, &ix.lap_times, |l| {
                in_scope(l.race_id)
            }),
            pit_stops: Self::collect(&self.tables.pit_stops, &ix.pit_stops, |p| {
                in_scope(p.race_id)
            }),
            standings: Self::collect(&self.tables.standings, &ix.standings, |s| {
                in_scope(s.race_id)
            }),
            races,
            all_results,
        }
    }

    pub fn bundle_for_driver(&self, driver_id: DriverId) -> DriverBundle {
        self.bundle_filtered(driver_id, None, self.all_results())
    }

    /// Per-season slice; `all_results` covers every driver in that season only.
    pub fn bundle_for_season(&self, driver_id: DriverId, season: i32) -> DriverBundle {
        let all = self
            .season_results
            .get(&season)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()));
        self.bundle_filtered(driver_id, Some(season), all)
    }
}

/// Everything a calculator may look at for one driver.
///
/// Per-driver collections are owned and sorted chronologically;
/// `all_results` is shared across every bundle of a run.
#[derive(Debug, Clone)]
pub struct DriverBundle {
    pub driver_id: DriverId,
    pub results: Vec<RaceResult>,
    pub qualifying: Vec<QualifyingRecord>,
    pub lap_times: Vec<LapPosition>,
    pub pit_stops: Vec<PitStop>,
    pub standings: Vec<Standing>,
    /// Calendar of every season the driver raced in.
    pub races: Vec<Race>,
    pub all_results: Arc<[RaceResult]>,
}

impl DriverBundle {
    pub fn new(driver_id: DriverId) -> Self {
        Self {
            driver_id,
            results: Vec::new(),
            qualifying: Vec::new(),
            lap_times: Vec::new(),
            pit_stops: Vec::new(),
            standings: Vec::new(),
            races: Vec::new(),
            all_results: Arc::from(Vec::new()),
        }
    }

    pub fn with_results(mut self, results: Vec<RaceResult>) -> Self {
        self.results = results;
        self
    }

    pub fn with_qualifying(mut self, qualifying: Vec<QualifyingRecord>) -> Self {
        self.qualifying = qualifying;
        self
    }

    pub fn with_lap_times(mut self, lap_times: Vec<LapPosition>) -> Self {
        self.lap_times = lap_times;
        self
    }

    pub fn with_standings(mut self, standings: Vec<Standing>) -> Self {
        self.standings = standings;
        self
    }

    pub fn with_races(mut self, races: Vec<Race>) -> Self {
        self.races = races;
        self
    }

    pub fn with_all_results(mut self, all_results: Vec<RaceResult>) -> Self {
        self.all_results = Arc::from(all_results);
        self
    }

    pub fn race_count(&self) -> usize {
        self.results.len()
    }

    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.results.iter().filter_map(|r| r.year).collect();
        years.into_iter().collect()
    }

    pub fn career_span(&self) -> String {
        let years = self.years();
        match (years.first(), years.last()) {
            (Some(a), Some(b)) if a == b => a.to_string(),
            (Some(a), Some(b)) => format!("{}-{}", a, b),
            _ => "Unknown".to_string(),
        }
    }

    pub fn qualifying_position(&self, race_id: RaceId) -> Option<u32> {
        self.qualifying
            .iter()
            .find(|q| q.race_id == race_id)
            .and_then(|q| q.position)
    }

    /// Qualifying position when the driver has any qualifying data, grid otherwise.
    pub fn start_position(&self, result: &RaceResult) -> Option<u32> {
        if self.qualifying.is_empty() {
            result.grid
        } else {
            self.qualifying_position(result.race_id)
        }
    }

    /// Lap positions grouped per race, in the order races first appear.
    pub fn laps_by_race(&self) -> Vec<(RaceId, Vec<&LapPosition>)> {
        let mut order: Vec<RaceId> = Vec::new();
        let mut groups: HashMap<RaceId, Vec<&LapPosition>> = HashMap::new();
        for l in &self.lap_times {
            groups
                .entry(l.race_id)
                .or_insert_with(|| {
                    order.push(l.race_id);
                    Vec::new()
                })
                .push(l);
        }
        order
            .into_iter()
            .filter_map(|id| {
                groups.remove(&id).map(|mut laps| {
                    laps.sort_by_key(|l| l.lap);
                    (id, laps)
                })
            })
            .collect()
    }

    pub fn lap_position(&self, race_id: RaceId, lap: u32) -> Option<u32> {
        self.lap_times
            .iter()
            .find(|l| l.race_id == race_id && l.lap == lap)
            .and_then(|l| l.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: RaceId, year: i32, round: u32) -> Race {
        Race {
            race_id: id,
            year,
            round,
            circuit: Some("monza".into()),
            name: format!("GP {}", id),
        }
    }

    fn res(race: RaceId, driver: DriverId) -> RaceResult {
        RaceResult {
            race_id: race,
            driver_id: driver,
            constructor_id: 1,
            year: None,
            round: None,
            circuit: None,
            grid: Some(3),
            position: Some(2),
            position_order: 2,
            points: 18.0,
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(Tables {
            drivers: vec![Driver {
                driver_id: 1,
                reference: "hamilton".into(),
                forename: "Lewis".into(),
                surname: "Hamilton".into(),
            }],
            races: vec![race(30, 2021, 1), race(10, 2020, 2), race(20, 2020, 1)],
            results: vec![res(30, 1), res(10, 1), res(20, 1), res(20, 2)],
            lap_times: vec![
                LapPosition { race_id: 30, driver_id: 1, lap: 1, position: Some(2) },
                LapPosition { race_id: 20, driver_id: 1, lap: 2, position: Some(3) },
                LapPosition { race_id: 20, driver_id: 1, lap: 1, position: Some(4) },
            ],
            ..Default::default()
        })
    }

    #[test]
    fn test_results_enriched_and_sorted() {
        let ds = dataset();
        let b = ds.bundle_for_driver(1);
        let order: Vec<RaceId> = b.results.iter().map(|r| r.race_id).collect();
        assert_eq!(order, vec![20, 10, 30]);
        assert_eq!(b.results[0].year, Some(2020));
        assert_eq!(b.results[0].circuit.as_deref(), Some("monza"));
        assert_eq!(b.career_span(), "2020-2021");
        assert_eq!(b.all_results.len(), 4);
        assert_eq!(b.races.len(), 3);

        let grouped = b.laps_by_race();
        assert_eq!(grouped[0].0, 20);
        assert_eq!(grouped[0].1[0].lap, 1);
    }

    #[test]
    fn test_season_bundle_scopes_everything() {
        let ds = dataset();
        let b = ds.bundle_for_season(1, 2020);
        assert_eq!(b.results.len(), 2);
        assert_eq!(b.lap_times.len(), 2);
        assert_eq!(b.all_results.len(), 3);
        assert_eq!(b.races.len(), 2);
        assert_eq!(b.career_span(), "2020");
        assert_eq!(ds.driver_seasons(1, 2), vec![(2020, 2)]);
    }

    #[test]
    fn test_find_driver_by_id_or_reference() {
        let ds = dataset();
        assert_eq!(ds.find_driver("1").map(|d| d.driver_id), Some(1));
        assert_eq!(ds.find_driver("HAMILTON").map(|d| d.driver_id), Some(1));
        assert!(ds.find_driver("senna").is_none());
        assert_eq!(ds.driver_name(2), "Driver 2");
    }

    #[test]
    fn test_eligible_drivers_ordered_by_count() {
        let ds = dataset();
        assert_eq!(ds.eligible_drivers(1, None), vec![1, 2]);
        assert_eq!(ds.eligible_drivers(2, None), vec![1]);
        assert_eq!(ds.eligible_drivers(1, Some(1)), vec![1]);
        assert_eq!(DriverBundle::new(9).career_span(), "Unknown");
    }
}
