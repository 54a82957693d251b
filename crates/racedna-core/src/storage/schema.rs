pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS drivers (
  "driverId" INTEGER PRIMARY KEY,
  "driverRef" TEXT NOT NULL,
  forename TEXT NOT NULL DEFAULT '',
  surname TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS races (
  "raceId" INTEGER PRIMARY KEY,
  year INTEGER NOT NULL,
  round INTEGER NOT NULL,
  "circuitRef" TEXT,
  name TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS results (
  "resultId" INTEGER PRIMARY KEY AUTOINCREMENT,
  "raceId" INTEGER NOT NULL,
  "driverId" INTEGER NOT NULL,
  "constructorId" INTEGER NOT NULL,
  grid INTEGER,
  position INTEGER,
  "positionOrder" INTEGER NOT NULL,
  points REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS qualifying (
  "qualifyId" INTEGER PRIMARY KEY AUTOINCREMENT,
  "raceId" INTEGER NOT NULL,
  "driverId" INTEGER NOT NULL,
  "constructorId" INTEGER,
  position INTEGER
);

CREATE TABLE IF NOT EXISTS lap_times (
  "raceId" INTEGER NOT NULL,
  "driverId" INTEGER NOT NULL,
  lap INTEGER NOT NULL,
  position INTEGER,
  PRIMARY KEY ("raceId", "driverId", lap)
);

CREATE TABLE IF NOT EXISTS pit_stops (
  "raceId" INTEGER NOT NULL,
  "driverId" INTEGER NOT NULL,
  stop INTEGER NOT NULL,
  lap INTEGER NOT NULL,
  milliseconds INTEGER,
  PRIMARY KEY ("raceId", "driverId", stop)
);

CREATE TABLE IF NOT EXISTS driver_standings (
  "driverStandingsId" INTEGER PRIMARY KEY AUTOINCREMENT,
  "raceId" INTEGER NOT NULL,
  "driverId" INTEGER NOT NULL,
  points REAL NOT NULL DEFAULT 0,
  position INTEGER,
  wins INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_results_driver ON results("driverId");
CREATE INDEX IF NOT EXISTS idx_lap_times_driver ON lap_times("driverId");

CREATE TABLE IF NOT EXISTS drivers_dna_profiles (
  "driverId" INTEGER PRIMARY KEY,
  "driverName" TEXT NOT NULL,
  "aggressionScore" REAL NOT NULL,
  "consistencyScore" REAL NOT NULL,
  "pressurePerformanceScore" REAL NOT NULL,
  "racecraftScore" REAL NOT NULL,
  "raceStartScore" REAL,
  "racesAnalyzed" INTEGER NOT NULL,
  "careerSpan" TEXT NOT NULL,
  "lastUpdated" TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS drivers_dna_breakdown (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  "driverId" INTEGER NOT NULL,
  "traitName" TEXT NOT NULL,
  "rawValue" REAL,
  "normalizedScore" REAL NOT NULL,
  "contributingStats" TEXT NOT NULL,
  "calculationNotes" TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_breakdown_driver ON drivers_dna_breakdown("driverId");

CREATE TABLE IF NOT EXISTS drivers_dna_timeline (
  "driverId" INTEGER NOT NULL,
  season INTEGER NOT NULL,
  "traitScores" TEXT NOT NULL,
  "racesCompleted" INTEGER NOT NULL,
  PRIMARY KEY ("driverId", season)
);

CREATE TABLE IF NOT EXISTS driver_racing_stats (
  "driverId" INTEGER PRIMARY KEY,
  "totalRaces" INTEGER NOT NULL,
  wins INTEGER NOT NULL,
  "secondPlaces" INTEGER NOT NULL,
  "thirdPlaces" INTEGER NOT NULL,
  podiums INTEGER NOT NULL,
  "avgFinishPosition" REAL,
  "bestChampionshipFinish" INTEGER,
  "avgChampionshipFinish" REAL,
  "seasonsCompleted" INTEGER NOT NULL,
  "avgTeammatePointsDelta" REAL,
  "lastUpdated" TEXT NOT NULL
);
"#;

/// Tables reported by `status`, source tables first.
pub const KNOWN_TABLES: &[&str] = &[
    "drivers",
    "races",
    "results",
    "qualifying",
    "lap_times",
    "pit_stops",
    "driver_standings",
    "drivers_dna_profiles",
    "drivers_dna_breakdown",
    "drivers_dna_timeline",
    "driver_racing_stats",
];
