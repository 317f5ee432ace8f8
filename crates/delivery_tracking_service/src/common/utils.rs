/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/
use super::types::*;
use chrono::Utc;

pub fn current_timestamp() -> TimeStamp {
    TimeStamp(Utc::now())
}

/// Sorted set score for a ping, millisecond precision.
pub fn timestamp_score(TimeStamp(ts): &TimeStamp) -> f64 {
    ts.timestamp_millis() as f64
}

pub fn is_valid_coordinate(Latitude(lat): &Latitude, Longitude(lon): &Longitude) -> bool {
    lat.is_finite() && lon.is_finite() && (-90.0..=90.0).contains(lat) && (-180.0..=180.0).contains(lon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn coordinate_bounds() {
        assert!(is_valid_coordinate(&Latitude(10.76), &Longitude(106.66)));
        assert!(is_valid_coordinate(&Latitude(-90.0), &Longitude(180.0)));
        assert!(!is_valid_coordinate(&Latitude(90.5), &Longitude(0.0)));
        assert!(!is_valid_coordinate(&Latitude(0.0), &Longitude(-180.1)));
        assert!(!is_valid_coordinate(&Latitude(f64::NAN), &Longitude(0.0)));
        assert!(!is_valid_coordinate(&Latitude(0.0), &Longitude(f64::INFINITY)));
    }

    #[test]
    fn timestamp_score_orders_by_time() {
        let TimeStamp(now) = current_timestamp();
        let earlier = TimeStamp(now - Duration::seconds(5));
        assert!(timestamp_score(&TimeStamp(now)) > timestamp_score(&earlier));
    }
}
