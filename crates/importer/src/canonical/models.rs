use serde::{Deserialize, Serialize};

pub const FORMAT_VERSION: &str = "1.0.0";

/// A tournament as exchanged in JSON files: roster plus played rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentFile {
    pub format_version: String,
    #[serde(default)]
    pub players: Vec<String>,
    pub rounds: Vec<RoundData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundData {
    pub number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bye: Option<String>,
    #[serde(default)]
    pub tables: Vec<TableData>,
}

/// One table. Placements are player names; a table with a winner and
/// neither second nor third is a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableData {
    pub table_no: i64,
    pub players: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub third: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<String>,
}

impl TableData {
    pub fn is_sweep(&self) -> bool {
        self.winner.is_some() && self.second.is_none() && self.third.is_none()
    }

    pub fn has_result(&self) -> bool {
        self.winner.is_some()
    }
}
