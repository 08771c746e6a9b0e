//! # Energy Status
//!
//! Derived surplus/deficit view of an account. Pure function of the stored
//! record; computing it never touches the world state.

use crate::domain::entities::Account;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an account produces more energy than it consumes per day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyStatus {
    Surplus,
    Deficit,
    Balanced,
}

impl fmt::Display for EnergyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EnergyStatus::Surplus => "surplus",
            EnergyStatus::Deficit => "deficit",
            EnergyStatus::Balanced => "balanced",
        })
    }
}

impl EnergyStatus {
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            EnergyStatus::Surplus
        } else if difference < 0.0 {
            EnergyStatus::Deficit
        } else {
            EnergyStatus::Balanced
        }
    }
}

/// Energy position of one account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyReport {
    pub account_id: String,
    pub account_name: String,
    pub available_energy: f64,
    pub daily_consumption: f64,
    /// `available_energy - daily_consumption`
    pub difference: f64,
    pub status: EnergyStatus,
}

impl EnergyReport {
    pub fn for_account(account: &Account) -> Self {
        let difference = account.available_energy - account.daily_consumption;
        Self {
            account_id: account.id.clone(),
            account_name: account.name.clone(),
            available_energy: account.available_energy,
            daily_consumption: account.daily_consumption,
            difference,
            status: EnergyStatus::from_difference(difference),
        }
    }
}
