use crate::dataset::{Dataset, Tables};
use crate::model::{
    DnaProfile, Driver, DriverId, LapPosition, PitStop, QualifyingRecord, Race, RaceResult,
    RacingStats, Standing, TimelineEntry, TraitBreakdown, TraitKind,
};
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverSummary {
    pub driver_id: DriverId,
    pub reference: String,
    pub name: String,
    pub races: usize,
    pub career_span: String,
}

#[derive(Debug, Clone)]
pub struct StoreStatus {
    pub tables: Vec<(&'static str, Option<i64>)>,
    pub last_profile_update: Option<String>,
}

const PROFILE_COLUMNS: &str = r#""driverId", "driverName", "aggressionScore", "consistencyScore",
    "pressurePerformanceScore", "racecraftScore", "raceStartScore", "racesAnalyzed",
    "careerSpan", "lastUpdated""#;

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open sqlite db {}", path.display()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(crate::storage::schema::DDL)
            .context("failed to apply schema")?;
        Ok(())
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("sqlite connection lock poisoned"))
    }

    // --- Source tables ---

    /// Loads every source table into memory.
    pub fn load_dataset(&self) -> anyhow::Result<Dataset> {
        let conn = self.lock()?;

        let drivers = query_all(
            &conn,
            r#"SELECT "driverId", "driverRef", forename, surname FROM drivers"#,
            |row| {
                Ok(Driver {
                    driver_id: row.get(0)?,
                    reference: row.get(1)?,
                    forename: row.get(2)?,
                    surname: row.get(3)?,
                })
            },
        )
        .context("load drivers")?;

        let races = query_all(
            &conn,
            r#"SELECT "raceId", year, round, "circuitRef", name FROM races"#,
            |row| {
                Ok(Race {
                    race_id: row.get(0)?,
                    year: row.get(1)?,
                    round: row.get(2)?,
                    circuit: row.get(3)?,
                    name: row.get(4)?,
                })
            },
        )
        .context("load races")?;

        let results = query_all(
            &conn,
            r#"SELECT "raceId", "driverId", "constructorId", grid, position, "positionOrder", points
               FROM results"#,
            |row| {
                Ok(RaceResult {
                    race_id: row.get(0)?,
                    driver_id: row.get(1)?,
                    constructor_id: row.get(2)?,
                    year: None,
                    round: None,
                    circuit: None,
                    grid: row.get(3)?,
                    position: row.get(4)?,
                    position_order: row.get(5)?,
                    points: row.get(6)?,
                })
            },
        )
        .context("load results")?;

        let qualifying = query_all(
            &conn,
            r#"SELECT "raceId", "driverId", "constructorId", position FROM qualifying"#,
            |row| {
                Ok(QualifyingRecord {
                    race_id: row.get(0)?,
                    driver_id: row.get(1)?,
                    constructor_id: row.get(2)?,
                    position: row.get(3)?,
                })
            },
        )
        .context("load qualifying")?;

        let lap_times = query_all(
            &conn,
            r#"SELECT "raceId", "driverId", lap, position FROM lap_times"#,
            |row| {
                Ok(LapPosition {
                    race_id: row.get(0)?,
                    driver_id: row.get(1)?,
                    lap: row.get(2)?,
                    position: row.get(3)?,
                })
            },
        )
        .context("load lap_times")?;

        let pit_stops = query_all(
            &conn,
            r#"SELECT "raceId", "driverId", stop, lap, milliseconds FROM pit_stops"#,
            |row| {
                Ok(PitStop {
                    race_id: row.get(0)?,
                    driver_id: row.get(1)?,
                    stop: row.get(2)?,
                    lap: row.get(3)?,
                    duration_ms: row.get(4)?,
                })
            },
        )
        .context("load pit_stops")?;

        let standings = query_all(
            &conn,
            r#"SELECT "raceId", "driverId", position, points, wins FROM driver_standings"#,
            |row| {
                Ok(Standing {
                    race_id: row.get(0)?,
                    driver_id: row.get(1)?,
                    position: row.get(2)?,
                    points: row.get(3)?,
                    wins: row.get(4)?,
                })
            },
        )
        .context("load driver_standings")?;

        tracing::info!(
            event = "racedna.store.dataset_loaded",
            drivers = drivers.len(),
            races = races.len(),
            results = results.len(),
            qualifying = qualifying.len(),
            lap_times = lap_times.len(),
            pit_stops = pit_stops.len(),
            standings = standings.len(),
        );

        Ok(Dataset::new(Tables {
            drivers,
            races,
            results,
            qualifying,
            lap_times,
            pit_stops,
            standings,
        }))
    }

    pub fn insert_driver(&self, d: &Driver) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"INSERT OR REPLACE INTO drivers ("driverId", "driverRef", forename, surname)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![d.driver_id, d.reference, d.forename, d.surname],
        )
        .context("insert driver")?;
        Ok(())
    }

    pub fn insert_race(&self, r: &Race) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"INSERT OR REPLACE INTO races ("raceId", year, round, "circuitRef", name)
               VALUES (?1, ?2, ?3, ?4, ?5)"#,
            params![r.race_id, r.year, r.round, r.circuit, r.name],
        )
        .context("insert race")?;
        Ok(())
    }

    pub fn insert_results(&self, rows: &[RaceResult]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO results
                   ("raceId", "driverId", "constructorId", grid, position, "positionOrder", points)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"#,
            )?;
            for r in rows {
                stmt.execute(params![
                    r.race_id,
                    r.driver_id,
                    r.constructor_id,
                    r.grid,
                    r.position,
                    r.position_order,
                    r.points
                ])
                .context("insert result")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_qualifying(&self, rows: &[QualifyingRecord]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO qualifying ("raceId", "driverId", "constructorId", position)
                   VALUES (?1, ?2, ?3, ?4)"#,
            )?;
            for q in rows {
                stmt.execute(params![q.race_id, q.driver_id, q.constructor_id, q.position])
                    .context("insert qualifying")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_lap_positions(&self, rows: &[LapPosition]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT OR REPLACE INTO lap_times ("raceId", "driverId", lap, position)
                   VALUES (?1, ?2, ?3, ?4)"#,
            )?;
            for l in rows {
                stmt.execute(params![l.race_id, l.driver_id, l.lap, l.position])
                    .context("insert lap")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_pit_stops(&self, rows: &[PitStop]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT OR REPLACE INTO pit_stops ("raceId", "driverId", stop, lap, milliseconds)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
            )?;
            for p in rows {
                stmt.execute(params![p.race_id, p.driver_id, p.stop, p.lap, p.duration_ms])
                    .context("insert pit stop")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn insert_standings(&self, rows: &[Standing]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO driver_standings ("raceId", "driverId", position, points, wins)
                   VALUES (?1, ?2, ?3, ?4, ?5)"#,
            )?;
            for s in rows {
                stmt.execute(params![s.race_id, s.driver_id, s.position, s.points, s.wins])
                    .context("insert standing")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    // --- DNA output ---

    /// Upserts the profile and replaces every breakdown row of the driver,
    /// all in one transaction.
    pub fn save_dna(&self, profile: &DnaProfile, breakdowns: &[TraitBreakdown]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute(
            &format!(
                r#"INSERT INTO drivers_dna_profiles ({PROFILE_COLUMNS})
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                   ON CONFLICT ("driverId") DO UPDATE SET
                     "driverName" = excluded."driverName",
                     "aggressionScore" = excluded."aggressionScore",
                     "consistencyScore" = excluded."consistencyScore",
                     "pressurePerformanceScore" = excluded."pressurePerformanceScore",
                     "racecraftScore" = excluded."racecraftScore",
                     "raceStartScore" = excluded."raceStartScore",
                     "racesAnalyzed" = excluded."racesAnalyzed",
                     "careerSpan" = excluded."careerSpan",
                     "lastUpdated" = excluded."lastUpdated""#
            ),
            params![
                profile.driver_id,
                profile.driver_name,
                profile.aggression_score,
                profile.consistency_score,
                profile.pressure_performance_score,
                profile.racecraft_score,
                profile.race_start_score.filter(|v| v.is_finite()),
                profile.races_analyzed as i64,
                profile.career_span,
                format_ts(&profile.last_updated),
            ],
        )
        .context("upsert dna profile")?;

        // Always cleared, even when there is nothing new to insert.
        tx.execute(
            r#"DELETE FROM drivers_dna_breakdown WHERE "driverId" = ?1"#,
            params![profile.driver_id],
        )
        .context("delete old breakdowns")?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO drivers_dna_breakdown
                   ("driverId", "traitName", "rawValue", "normalizedScore", "contributingStats", "calculationNotes")
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )?;
            for b in breakdowns {
                stmt.execute(params![
                    b.driver_id,
                    b.trait_name.as_str(),
                    b.raw_value.filter(|v| v.is_finite()),
                    b.normalized_score,
                    b.contributing_stats,
                    b.calculation_notes,
                ])
                .context("insert breakdown")?;
            }
        }

        tx.commit().context("commit dna")?;
        Ok(())
    }

    pub fn get_profile(&self, driver_id: DriverId) -> anyhow::Result<Option<DnaProfile>> {
        let conn = self.lock()?;
        let profile = conn
            .query_row(
                &format!(r#"SELECT {PROFILE_COLUMNS} FROM drivers_dna_profiles WHERE "driverId" = ?1"#),
                params![driver_id],
                profile_from_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Highest-scoring profiles for one trait.
    pub fn top_profiles(&self, kind: TraitKind, limit: usize) -> anyhow::Result<Vec<DnaProfile>> {
        let column = match kind {
            TraitKind::Aggression => "aggressionScore",
            TraitKind::Consistency => "consistencyScore",
            TraitKind::RaceStart => "raceStartScore",
            TraitKind::PressurePerformance => "pressurePerformanceScore",
            TraitKind::Racecraft => "racecraftScore",
        };
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {PROFILE_COLUMNS} FROM drivers_dna_profiles
               WHERE "{column}" IS NOT NULL
               ORDER BY "{column}" DESC, "driverId" ASC LIMIT ?1"#
        ))?;
        let rows = stmt.query_map(params![limit as i64], profile_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Profiles of the most experienced drivers.
    pub fn profiles_by_races(&self, limit: usize) -> anyhow::Result<Vec<DnaProfile>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            r#"SELECT {PROFILE_COLUMNS} FROM drivers_dna_profiles
               ORDER BY "racesAnalyzed" DESC, "driverId" ASC LIMIT ?1"#
        ))?;
        let rows = stmt.query_map(params![limit as i64], profile_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn profile_driver_ids(&self) -> anyhow::Result<Vec<DriverId>> {
        let conn = self.lock()?;
        let ids = query_all(
            &conn,
            r#"SELECT "driverId" FROM drivers_dna_profiles ORDER BY "racesAnalyzed" DESC, "driverId""#,
            |row| row.get(0),
        )?;
        Ok(ids)
    }

    pub fn list_breakdowns(&self, driver_id: DriverId) -> anyhow::Result<Vec<TraitBreakdown>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"SELECT "driverId", "traitName", "rawValue", "normalizedScore", "contributingStats", "calculationNotes"
               FROM drivers_dna_breakdown WHERE "driverId" = ?1 ORDER BY id"#,
        )?;
        let rows = stmt.query_map(params![driver_id], |row| {
            let name: String = row.get(1)?;
            let trait_name = TraitKind::parse(&name).ok_or_else(|| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    Type::Text,
                    format!("unknown trait {}", name).into(),
                )
            })?;
            Ok(TraitBreakdown {
                driver_id: row.get(0)?,
                trait_name,
                raw_value: row.get(2)?,
                normalized_score: row.get(3)?,
                contributing_stats: row.get(4)?,
                calculation_notes: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Upserts season entries keyed by (driver, season) in one transaction.
    pub fn save_timeline(&self, entries: &[TimelineEntry]) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO drivers_dna_timeline ("driverId", season, "traitScores", "racesCompleted")
                   VALUES (?1, ?2, ?3, ?4)
                   ON CONFLICT ("driverId", season) DO UPDATE SET
                     "traitScores" = excluded."traitScores",
                     "racesCompleted" = excluded."racesCompleted""#,
            )?;
            for e in entries {
                let scores: std::collections::BTreeMap<&str, Option<f64>> = e
                    .trait_scores
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.filter(|x| x.is_finite())))
                    .collect();
                stmt.execute(params![
                    e.driver_id,
                    e.season,
                    serde_json::to_string(&scores)?,
                    e.races_completed as i64,
                ])
                .context("upsert timeline entry")?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_timeline(&self, driver_id: DriverId) -> anyhow::Result<Vec<TimelineEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"SELECT "driverId", season, "traitScores", "racesCompleted"
               FROM drivers_dna_timeline WHERE "driverId" = ?1 ORDER BY season"#,
        )?;
        let rows = stmt.query_map(params![driver_id], |row| {
            let raw: String = row.get(2)?;
            let races: i64 = row.get(3)?;
            Ok((row.get::<_, DriverId>(0)?, row.get::<_, i32>(1)?, raw, races))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (driver_id, season, raw, races) = row?;
            let trait_scores = serde_json::from_str(&raw)
                .with_context(|| format!("bad traitScores for driver {} season {}", driver_id, season))?;
            out.push(TimelineEntry {
                driver_id,
                season,
                trait_scores,
                races_completed: races.max(0) as usize,
            });
        }
        Ok(out)
    }

    pub fn upsert_racing_stats(&self, s: &RacingStats) -> anyhow::Result<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"INSERT INTO driver_racing_stats (
                 "driverId", "totalRaces", wins, "secondPlaces", "thirdPlaces", podiums,
                 "avgFinishPosition", "bestChampionshipFinish", "avgChampionshipFinish",
                 "seasonsCompleted", "avgTeammatePointsDelta", "lastUpdated")
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
               ON CONFLICT ("driverId") DO UPDATE SET
                 "totalRaces" = excluded."totalRaces",
                 wins = excluded.wins,
                 "secondPlaces" = excluded."secondPlaces",
                 "thirdPlaces" = excluded."thirdPlaces",
                 podiums = excluded.podiums,
                 "avgFinishPosition" = excluded."avgFinishPosition",
                 "bestChampionshipFinish" = excluded."bestChampionshipFinish",
                 "avgChampionshipFinish" = excluded."avgChampionshipFinish",
                 "seasonsCompleted" = excluded."seasonsCompleted",
                 "avgTeammatePointsDelta" = excluded."avgTeammatePointsDelta",
                 "lastUpdated" = excluded."lastUpdated""#,
            params![
                s.driver_id,
                s.total_races as i64,
                s.wins as i64,
                s.second_places as i64,
                s.third_places as i64,
                s.podiums as i64,
                s.avg_finish_position.filter(|v| v.is_finite()),
                s.best_championship_finish,
                s.avg_championship_finish.filter(|v| v.is_finite()),
                s.seasons_completed as i64,
                s.avg_teammate_points_delta.filter(|v| v.is_finite()),
                format_ts(&s.last_updated),
            ],
        )
        .context("upsert racing stats")?;
        Ok(())
    }

    pub fn get_racing_stats(&self, driver_id: DriverId) -> anyhow::Result<Option<RacingStats>> {
        let conn = self.lock()?;
        let stats = conn
            .query_row(
                r#"SELECT "driverId", "totalRaces", wins, "secondPlaces", "thirdPlaces", podiums,
                     "avgFinishPosition", "bestChampionshipFinish", "avgChampionshipFinish",
                     "seasonsCompleted", "avgTeammatePointsDelta", "lastUpdated"
                   FROM driver_racing_stats WHERE "driverId" = ?1"#,
                params![driver_id],
                |row| {
                    Ok(RacingStats {
                        driver_id: row.get(0)?,
                        total_races: get_count(row, 1)?,
                        wins: get_count(row, 2)?,
                        second_places: get_count(row, 3)?,
                        third_places: get_count(row, 4)?,
                        podiums: get_count(row, 5)?,
                        avg_finish_position: row.get(6)?,
                        best_championship_finish: row.get(7)?,
                        avg_championship_finish: row.get(8)?,
                        seasons_completed: get_count(row, 9)?,
                        avg_teammate_points_delta: row.get(10)?,
                        last_updated: get_ts(row, 11)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }

    // --- Reporting ---

    /// Drivers with at least `min_races` results, most races first.
    pub fn driver_summaries(
        &self,
        min_races: usize,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<DriverSummary>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"SELECT d."driverId", d."driverRef", d.forename, d.surname,
                      COUNT(r."raceId") AS races, MIN(ra.year), MAX(ra.year)
               FROM drivers d
               JOIN results r ON r."driverId" = d."driverId"
               LEFT JOIN races ra ON ra."raceId" = r."raceId"
               GROUP BY d."driverId"
               HAVING COUNT(r."raceId") >= ?1
               ORDER BY races DESC, d."driverId" ASC
               LIMIT ?2"#,
        )?;
        let limit = limit.map(|n| n as i64).unwrap_or(-1);
        let rows = stmt.query_map(params![min_races as i64, limit], |row| {
            let forename: String = row.get(2)?;
            let surname: String = row.get(3)?;
            let first: Option<i32> = row.get(5)?;
            let last: Option<i32> = row.get(6)?;
            let career_span = match (first, last) {
                (Some(a), Some(b)) if a == b => a.to_string(),
                (Some(a), Some(b)) => format!("{}-{}", a, b),
                _ => "Unknown".to_string(),
            };
            Ok(DriverSummary {
                driver_id: row.get(0)?,
                reference: row.get(1)?,
                name: format!("{} {}", forename, surname).trim().to_string(),
                races: get_count(row, 4)?,
                career_span,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_rows(&self, table: &str) -> anyhow::Result<i64> {
        if !crate::storage::schema::KNOWN_TABLES.contains(&table) {
            anyhow::bail!("Invalid table name for count_rows: {}", table);
        }
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let n: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(n)
    }

    /// Row counts per known table; a missing table reports `None`.
    pub fn status(&self) -> anyhow::Result<StoreStatus> {
        let tables = crate::storage::schema::KNOWN_TABLES
            .iter()
            .map(|t| (*t, self.count_rows(t).ok()))
            .collect();
        let conn = self.lock()?;
        let last_profile_update: Option<String> = conn
            .query_row(
                r#"SELECT MAX("lastUpdated") FROM drivers_dna_profiles"#,
                [],
                |r| r.get(0),
            )
            .ok()
            .flatten();
        Ok(StoreStatus {
            tables,
            last_profile_update,
        })
    }
}

fn query_all<T>(
    conn: &Connection,
    sql: &str,
    f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> anyhow::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], f)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn get_ts(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_count(row: &Row<'_>, idx: usize) -> rusqlite::Result<usize> {
    let n: i64 = row.get(idx)?;
    Ok(n.max(0) as usize)
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<DnaProfile> {
    Ok(DnaProfile {
        driver_id: row.get(0)?,
        driver_name: row.get(1)?,
        aggression_score: row.get(2)?,
        consistency_score: row.get(3)?,
        pressure_performance_score: row.get(4)?,
        racecraft_score: row.get(5)?,
        race_start_score: row.get(6)?,
        races_analyzed: get_count(row, 7)?,
        career_span: row.get(8)?,
        last_updated: get_ts(row, 9)?,
    })
}
