use std::collections::HashMap;
use std::sync::OnceLock;

use super::normalizer::normalize_token;
use crate::workflows::pricing::OccupancyStatus;

static STATUS_MAP: OnceLock<HashMap<String, OccupancyStatus>> = OnceLock::new();

/// Map a vendor status cell onto the lifecycle enum. Vendors disagree on
/// wording far more than on meaning, so the table leans generous.
pub(crate) fn status_for_normalized(normalized: &str) -> Option<OccupancyStatus> {
    status_map().get(normalized).copied()
}

fn status_map() -> &'static HashMap<String, OccupancyStatus> {
    STATUS_MAP.get_or_init(|| {
        const STATUS_VARIANTS: &[(&str, OccupancyStatus)] = &[
            ("occupied", OccupancyStatus::Occupied),
            ("occupied no notice", OccupancyStatus::Occupied),
            ("occupied-no notice", OccupancyStatus::Occupied),
            ("current", OccupancyStatus::Occupied),
            ("on notice", OccupancyStatus::OnNotice),
            ("on-notice", OccupancyStatus::OnNotice),
            ("notice", OccupancyStatus::OnNotice),
            ("notice unrented", OccupancyStatus::OnNotice),
            ("occupied notice", OccupancyStatus::OnNotice),
            ("on notice rented", OccupancyStatus::OnNoticeRented),
            ("notice rented", OccupancyStatus::OnNoticeRented),
            ("on-notice-rented", OccupancyStatus::OnNoticeRented),
            ("vacant not ready", OccupancyStatus::VacantNotReady),
            ("vacant-not-ready", OccupancyStatus::VacantNotReady),
            ("vacant unrented not ready", OccupancyStatus::VacantNotReady),
            ("make ready", OccupancyStatus::VacantNotReady),
            ("vacant ready", OccupancyStatus::VacantReady),
            ("vacant-ready", OccupancyStatus::VacantReady),
            ("vacant", OccupancyStatus::VacantReady),
            ("vacant unrented ready", OccupancyStatus::VacantReady),
            ("preleased", OccupancyStatus::Preleased),
            ("pre-leased", OccupancyStatus::Preleased),
            ("vacant rented", OccupancyStatus::Preleased),
            ("vacant rented ready", OccupancyStatus::Preleased),
            ("offline", OccupancyStatus::Offline),
            ("down", OccupancyStatus::Offline),
            ("admin", OccupancyStatus::Offline),
            ("model", OccupancyStatus::Offline),
        ];

        let mut map = HashMap::with_capacity(STATUS_VARIANTS.len());
        for (variant, status) in STATUS_VARIANTS {
            map.insert(normalize_token(variant), *status);
        }
        map
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(value: &str) -> Option<OccupancyStatus> {
    status_for_normalized(&normalize_token(value))
}
