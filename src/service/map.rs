use chrono::{DateTime, Utc};

use crate::{
    config::Config,
    db::{self, Store},
    dto::{DonationQuery, MapMarker, MapResponse},
    errors::AppError,
    models::Location,
};

use super::{derive, filter::StatusVisibility};

const STATIC_STYLE_URL: &str = "https://api.mapbox.com/styles/v1/mapbox/light-v11/static";
const OVERVIEW_ZOOM: u8 = 12;
const DETAIL_ZOOM: u8 = 14;

fn pin(color: &str, lat: f64, lng: f64) -> String {
    format!("pin-l+{}({},{})", color.trim_start_matches('#'), lng, lat)
}

/// Static image url with one pin per marker, or a bare map when there are none.
pub fn static_map_url(center: &Location, markers: &[MapMarker], access_token: &str) -> String {
    let overlay: Vec<String> = markers.iter().map(|m| pin(m.color, m.lat, m.lng)).collect();
    let camera = format!("{},{},{}/800x600", center.lng, center.lat, OVERVIEW_ZOOM);
    if overlay.is_empty() {
        format!("{}/{}?access_token={}", STATIC_STYLE_URL, camera, access_token)
    } else {
        format!(
            "{}/{}/{}?access_token={}",
            STATIC_STYLE_URL,
            overlay.join(","),
            camera,
            access_token
        )
    }
}

/// Close-up used on the donation detail page, pinned in the same colour as its map marker.
pub fn pin_url(location: &Location, color: &str, access_token: &str) -> String {
    format!(
        "{}/{}/{},{},{}/800x600?access_token={}",
        STATIC_STYLE_URL,
        pin(color, location.lat, location.lng),
        location.lng,
        location.lat,
        DETAIL_ZOOM,
        access_token
    )
}

pub async fn markers(
    query: &DonationQuery,
    store: &Store,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<MapResponse, AppError> {
    let filter = query.to_filter(StatusVisibility::MAP_DEFAULT)?;
    let donations = db::donation::get_all(store).await;
    let markers: Vec<MapMarker> = filter
        .apply(&donations, now)
        .into_iter()
        .map(|d| MapMarker {
            color: derive::marker_color(&d, now),
            bucket: derive::expiry_bucket(d.expiry, now),
            id: d.id,
            title: d.title,
            lat: d.location.lat,
            lng: d.location.lng,
        })
        .collect();
    Ok(MapResponse {
        count: markers.len(),
        image_url: static_map_url(&config.map_center, &markers, &config.map_access_token),
        center: config.map_center.clone(),
        markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;
    use chrono::Duration;

    #[actix_rt::test]
    async fn markers_follow_status_and_expiry() {
        let now = Utc::now();
        let store = db::init_store(now);
        let res = markers(&DonationQuery::default(), &store, &Config::default(), now)
            .await
            .unwrap();
        assert_eq!(res.count, 5);
        let color_of = |key: &str| {
            res.markers
                .iter()
                .find(|m| m.id == seed::seed_id(key))
                .map(|m| m.color)
                .unwrap()
        };
        assert_eq!(color_of("donation:1"), "#4caf50");
        assert_eq!(color_of("donation:3"), "#4caf50");
        assert_eq!(color_of("donation:5"), "#9c27b0");
        assert!(res.image_url.contains("pin-l+9c27b0(-0.095,51.535)"));
    }

    #[test]
    fn expired_and_soon_override_status() {
        let now = Utc::now();
        let mut sample = seed::sample_donations(now);
        sample[3].expiry = now + Duration::hours(5);
        assert_eq!(derive::marker_color(&sample[3], now), "#ff9800");
        sample[3].expiry = now - Duration::hours(5);
        assert_eq!(derive::marker_color(&sample[3], now), "#d32f2f");
    }

    #[test]
    fn empty_map_has_no_overlay() {
        let center = Config::default().map_center;
        assert_eq!(
            static_map_url(&center, &[], "t"),
            "https://api.mapbox.com/styles/v1/mapbox/light-v11/static/-0.09,51.515,12/800x600?access_token=t"
        );
    }

    #[test]
    fn detail_pin_is_centered_on_location() {
        let location = Location {
            lat: 51.505,
            lng: -0.09,
            address: "123 Market Street, London".to_string(),
        };
        assert_eq!(
            pin_url(&location, "#4caf50", "placeholder"),
            "https://api.mapbox.com/styles/v1/mapbox/light-v11/static/pin-l+4caf50(-0.09,51.505)/-0.09,51.505,14/800x600?access_token=placeholder"
        );
    }
}
