//! Crop Catalog
//!
//! The 22 crop classes the classifier predicts and the descriptive metadata shown
//! on the result page. Embedded at compile time; never mutated.

use serde::Serialize;

/// Number of crop classes
pub const N_CLASSES: usize = 22;

/// Descriptive record for one crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropInfo {
    pub id: &'static str,
    pub description: &'static str,
    pub season: &'static str,
    pub harvest_time: &'static str,
    pub emoji: &'static str,
}

/// Record used when a class id has no catalog entry
pub static UNKNOWN_CROP: CropInfo = CropInfo {
    id: "unknown",
    description: "Description not available.",
    season: "N/A",
    harvest_time: "N/A",
    emoji: "🌱",
};

// ============================================================================
// EMBEDDED CATALOG
// Ordered by class index (alphabetical, matching the trained label encoder)
// ============================================================================

static CROPS: [CropInfo; N_CLASSES] = [
    CropInfo {
        id: "apple",
        description: "Apples are nutritious fruits rich in fiber and antioxidants. They thrive in temperate climates with well-drained soil.",
        season: "Fall",
        harvest_time: "120-180 days",
        emoji: "🍎",
    },
    CropInfo {
        id: "banana",
        description: "Bananas are tropical fruits high in potassium. They require warm, humid conditions and regular watering.",
        season: "Year-round",
        harvest_time: "9-12 months",
        emoji: "🍌",
    },
    CropInfo {
        id: "blackgram",
        description: "Blackgram is a protein-rich pulse crop. It grows well in warm climates with moderate rainfall.",
        season: "Kharif",
        harvest_time: "80-90 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "chickpea",
        description: "Chickpeas are versatile legumes high in protein. They prefer cool, dry conditions during growth.",
        season: "Rabi",
        harvest_time: "90-100 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "coconut",
        description: "Coconuts are tropical palm fruits. They need sandy, well-drained soil and abundant sunlight.",
        season: "Year-round",
        harvest_time: "12 months",
        emoji: "🥥",
    },
    CropInfo {
        id: "coffee",
        description: "Coffee is a popular beverage crop. It grows best in high-altitude, tropical regions with rich soil.",
        season: "Year-round",
        harvest_time: "3-4 years",
        emoji: "☕",
    },
    CropInfo {
        id: "cotton",
        description: "Cotton is a fiber crop used in textiles. It requires hot, dry climates and fertile soil.",
        season: "Kharif",
        harvest_time: "150-180 days",
        emoji: "🌱",
    },
    CropInfo {
        id: "grapes",
        description: "Grapes are used for wine and eating. They need sunny locations with good air circulation.",
        season: "Summer",
        harvest_time: "2-3 years",
        emoji: "🍇",
    },
    CropInfo {
        id: "jute",
        description: "Jute is a fiber crop for textiles. It grows in warm, humid conditions with heavy rainfall.",
        season: "Kharif",
        harvest_time: "120-150 days",
        emoji: "🌾",
    },
    CropInfo {
        id: "kidneybeans",
        description: "Kidney beans are nutritious legumes. They thrive in warm weather with adequate moisture.",
        season: "Kharif",
        harvest_time: "90-120 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "lentil",
        description: "Lentils are protein-rich pulses. They prefer cool, dry climates and well-drained soil.",
        season: "Rabi",
        harvest_time: "80-110 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "maize",
        description: "Maize (corn) is a staple grain crop. It needs warm temperatures and plenty of sunlight.",
        season: "Kharif",
        harvest_time: "90-120 days",
        emoji: "🌽",
    },
    CropInfo {
        id: "mango",
        description: "Mangoes are sweet tropical fruits. They require hot, humid climates and well-drained soil.",
        season: "Summer",
        harvest_time: "3-5 years",
        emoji: "🥭",
    },
    CropInfo {
        id: "mothbeans",
        description: "Mothbeans are drought-resistant legumes. They grow in arid regions with minimal water.",
        season: "Kharif",
        harvest_time: "75-90 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "mungbean",
        description: "Mungbeans are fast-growing legumes. They prefer warm, humid conditions.",
        season: "Kharif",
        harvest_time: "60-75 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "muskmelon",
        description: "Muskmelons are sweet melons. They need warm, sunny conditions and fertile soil.",
        season: "Summer",
        harvest_time: "70-90 days",
        emoji: "🍈",
    },
    CropInfo {
        id: "orange",
        description: "Oranges are citrus fruits rich in vitamin C. They thrive in subtropical climates.",
        season: "Winter",
        harvest_time: "3-4 years",
        emoji: "🍊",
    },
    CropInfo {
        id: "papaya",
        description: "Papayas are tropical fruits. They grow quickly in warm, humid environments.",
        season: "Year-round",
        harvest_time: "6-12 months",
        emoji: "🍈",
    },
    CropInfo {
        id: "pigeonpeas",
        description: "Pigeonpeas are drought-tolerant legumes. They suit semi-arid regions.",
        season: "Kharif",
        harvest_time: "150-180 days",
        emoji: "🫘",
    },
    CropInfo {
        id: "pomegranate",
        description: "Pomegranates are antioxidant-rich fruits. They prefer hot, dry climates.",
        season: "Fall",
        harvest_time: "2-3 years",
        emoji: "🍎",
    },
    CropInfo {
        id: "rice",
        description: "Rice is a staple cereal crop. It requires flooded fields and warm, humid conditions.",
        season: "Kharif",
        harvest_time: "120-150 days",
        emoji: "🌾",
    },
    CropInfo {
        id: "watermelon",
        description: "Watermelons are refreshing summer fruits. They need hot, sunny weather and sandy soil.",
        season: "Summer",
        harvest_time: "70-90 days",
        emoji: "🍉",
    },
];

// ============================================================================
// LOOKUP FUNCTIONS
// ============================================================================

/// All crops in class-index order
pub fn crops() -> &'static [CropInfo; N_CLASSES] {
    &CROPS
}

/// Class id at a given index
pub fn class_id(index: usize) -> Option<&'static str> {
    CROPS.get(index).map(|c| c.id)
}

/// Index of a class id
pub fn class_index(id: &str) -> Option<usize> {
    CROPS.iter().position(|c| c.id == id)
}

/// Catalog record for a class id, or [`UNKNOWN_CROP`] if absent
pub fn lookup(id: &str) -> &'static CropInfo {
    CROPS.iter().find(|c| c.id == id).unwrap_or(&UNKNOWN_CROP)
}

/// Upper-case the first letter of every word, lower-case the rest.
///
/// # Examples
/// ```
/// use crop_advisor::catalog::title_case;
///
/// assert_eq!(title_case("kidneybeans"), "Kidneybeans");
/// assert_eq!(title_case("sweet potato"), "Sweet Potato");
/// ```
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str().to_lowercase()),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_22_unique_sorted_classes() {
        let ids: Vec<&str> = crops().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), N_CLASSES);

        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted, ids, "class ids must be unique and alphabetical");
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let rice = lookup("rice");
        assert_eq!(rice.season, "Kharif");
        assert_eq!(rice.emoji, "🌾");

        let missing = lookup("quinoa");
        assert_eq!(missing.description, "Description not available.");
        assert_eq!(missing.season, "N/A");
        assert_eq!(missing.emoji, "🌱");
    }

    #[test]
    fn test_index_roundtrip() {
        assert_eq!(class_id(0), Some("apple"));
        assert_eq!(class_id(21), Some("watermelon"));
        assert_eq!(class_id(22), None);
        assert_eq!(class_index("rice"), Some(20));
        assert_eq!(class_index("quinoa"), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("rice"), "Rice");
        assert_eq!(title_case("pigeonpeas"), "Pigeonpeas");
        assert_eq!(title_case("MANGO"), "Mango");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_every_record_filled() {
        for crop in crops() {
            assert!(!crop.description.is_empty(), "{} has no description", crop.id);
            assert!(!crop.season.is_empty());
            assert!(!crop.harvest_time.is_empty());
            assert!(!crop.emoji.is_empty());
        }
    }
}
