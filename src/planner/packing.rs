//! Weather-driven packing list

use crate::config::PackingConfig;
use crate::models::{ForecastStats, PackingList};

pub const RAIN_ITEM: &str = "Compact umbrella / rain jacket";
pub const LAUNDRY_ITEM: &str = "Travel laundry kit";

const ESSENTIALS: [&str; 5] = ["Passport/ID", "Wallet", "Phone + charger", "Meds", "Reusable bottle"];
const TOILETRIES: [&str; 3] = ["Toothbrush/toothpaste", "Deodorant", "Sunscreen"];
const ELECTRONICS: [&str; 2] = ["Power adapter", "Power bank"];
const DESTINATION_SPECIFIC: [&str; 2] = ["Offline map of the area", "Local transit card"];
const WARM_WEATHER: [&str; 3] = ["Light breathable fabrics", "Sun hat", "Sunglasses"];
const COLD_WEATHER: [&str; 2] = ["Warm layers", "Insulated jacket"];

/// Outfits packed regardless of trip length; longer trips plan on laundry
const MAX_OUTFITS: u32 = 7;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}

/// Build the packing list for a trip of `days` days
#[must_use]
pub fn build_packing_list(stats: &ForecastStats, days: u32, thresholds: &PackingConfig) -> PackingList {
    let mut list = PackingList {
        essentials: owned(&ESSENTIALS),
        clothing: vec![
            "Walking shoes".to_string(),
            "Socks/underwear".to_string(),
            format!("{} outfits", days.clamp(1, MAX_OUTFITS)),
        ],
        toiletries: owned(&TOILETRIES),
        electronics: owned(&ELECTRONICS),
        destination_specific: owned(&DESTINATION_SPECIFIC),
    };

    if stats.rain_above(thresholds.rain_threshold_mm) {
        list.essentials.push(RAIN_ITEM.to_string());
    }

    if let Some(max_temp) = stats.max_day_temp_c {
        if max_temp >= thresholds.hot_threshold_c {
            list.clothing.extend(owned(&WARM_WEATHER));
        }
        if max_temp < thresholds.cold_threshold_c {
            list.clothing.extend(owned(&COLD_WEATHER));
        }
    }

    if days > MAX_OUTFITS {
        list.destination_specific.push(LAUNDRY_ITEM.to_string());
    }

    list
}
