use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// Campuses a muster file can be uploaded for. Each one is a replacement
/// unit in the record store.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Campus {
    Vadgaon,
    Lonavala,
    Pune,
    Nashik,
}

impl Campus {
    pub fn display_name(&self) -> &'static str {
        match self {
            Campus::Vadgaon => "Vadgaon Campus",
            Campus::Lonavala => "Lonavala Campus",
            Campus::Pune => "Pune Campus",
            Campus::Nashik => "Nashik Campus",
        }
    }
}
