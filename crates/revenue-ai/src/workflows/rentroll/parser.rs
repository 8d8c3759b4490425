use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One raw rent-roll line with vendor formatting still attached. Header
/// aliases cover the exports we have actually seen; everything stays a
/// string here so row-level errors can cite the original cell.
#[derive(Debug, Deserialize)]
pub(crate) struct RentRollRow {
    #[serde(rename = "Unit", alias = "Unit Number", alias = "Apt")]
    pub(crate) unit: String,
    #[serde(
        rename = "Floorplan",
        alias = "Unit Type",
        alias = "Floor Plan",
        alias = "Plan Code"
    )]
    pub(crate) floorplan: String,
    #[serde(
        rename = "Floorplan Name",
        alias = "Unit Type Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) floorplan_label: Option<String>,
    #[serde(rename = "Status", alias = "Unit Status", alias = "Occupancy Status")]
    pub(crate) status: String,
    #[serde(
        rename = "Current Rent",
        alias = "Market Rent",
        alias = "Rent",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) rent: Option<String>,
    #[serde(
        rename = "Amenity Adjustment",
        alias = "Amenities",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) amenity_adjustment: Option<String>,
    #[serde(
        rename = "Move Out",
        alias = "Move-Out Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) move_out: Option<String>,
    #[serde(
        rename = "Available On",
        alias = "Date Available",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) available_on: Option<String>,
    #[serde(
        rename = "Vacant Since",
        alias = "Vacate Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub(crate) vacant_since: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RentRollRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<RentRollRow>().collect()
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
