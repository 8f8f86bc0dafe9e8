//! The fixed city catalogue, north to south.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub id: &'static str,
    pub name: &'static str,
    pub name_ja: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

pub const DEFAULT_CITY_ID: &str = "tokyo";

pub const CITIES: [City; 10] = [
    City {
        id: "sapporo",
        name: "Sapporo",
        name_ja: "札幌",
        latitude: 43.0618,
        longitude: 141.3545,
    },
    City {
        id: "sendai",
        name: "Sendai",
        name_ja: "仙台",
        latitude: 38.2682,
        longitude: 140.8694,
    },
    City {
        id: "niigata",
        name: "Niigata",
        name_ja: "新潟",
        latitude: 37.9161,
        longitude: 139.0364,
    },
    City {
        id: "tokyo",
        name: "Tokyo",
        name_ja: "東京",
        latitude: 35.6895,
        longitude: 139.6917,
    },
    City {
        id: "nagoya",
        name: "Nagoya",
        name_ja: "名古屋",
        latitude: 35.1815,
        longitude: 136.9066,
    },
    City {
        id: "kanazawa",
        name: "Kanazawa",
        name_ja: "金沢",
        latitude: 36.5613,
        longitude: 136.6562,
    },
    City {
        id: "osaka",
        name: "Osaka",
        name_ja: "大阪",
        latitude: 34.6937,
        longitude: 135.5023,
    },
    City {
        id: "hiroshima",
        name: "Hiroshima",
        name_ja: "広島",
        latitude: 34.3853,
        longitude: 132.4553,
    },
    City {
        id: "fukuoka",
        name: "Fukuoka",
        name_ja: "福岡",
        latitude: 33.5904,
        longitude: 130.4017,
    },
    City {
        id: "naha",
        name: "Naha",
        name_ja: "那覇",
        latitude: 26.2124,
        longitude: 127.6809,
    },
];

impl City {
    pub fn find(id: &str) -> Option<&'static City> {
        CITIES.iter().find(|c| c.id == id)
    }

    pub fn position(id: &str) -> Option<usize> {
        CITIES.iter().position(|c| c.id == id)
    }

    /// Look up `id`, falling back to the default city for unknown ids.
    pub fn find_or_default(id: &str) -> &'static City {
        Self::find(id).unwrap_or_else(Self::default_city)
    }

    pub fn default_city() -> &'static City {
        // DEFAULT_CITY_ID is checked by tests to be in the catalogue.
        Self::find(DEFAULT_CITY_ID).unwrap_or(&CITIES[0])
    }

    /// "Tokyo 東京"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.name_ja)
    }
}
