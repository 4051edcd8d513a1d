//! Run model: one recorded data-taking session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Entity, Log};

/// A data-taking session identified by its run number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(alias = "id")]
    pub run_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_o2_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_o2_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_trg_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_trg_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_detectors: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_flps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_epns: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_timeframes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_subtimeframes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_read_out: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_timeframe_builder: Option<u64>,
    /// Logs linked to this run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<Log>,
}

impl Run {
    /// A bare run carrying only its number.
    pub fn new(run_number: u64) -> Self {
        Self {
            run_number,
            status: None,
            run_type: None,
            run_quality: None,
            activity_id: None,
            time_o2_start: None,
            time_o2_end: None,
            time_trg_start: None,
            time_trg_end: None,
            n_detectors: None,
            n_flps: None,
            n_epns: None,
            n_timeframes: None,
            n_subtimeframes: None,
            bytes_read_out: None,
            bytes_timeframe_builder: None,
            logs: Vec::new(),
        }
    }

    /// Wall-clock duration between O2 start and end, if both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.time_o2_start, self.time_o2_end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl Entity for Run {
    type Id = u64;
    const NAME: &'static str = "run";

    fn id(&self) -> u64 {
        self.run_number
    }
}

/// Request body for linking an existing log to a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkLogToRunRequest {
    pub log_id: u64,
}
