//! Built-in India travel documents used to seed the index

/// Seed corpus loaded when no persisted index exists
pub fn india_travel_docs() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "India Travel Overview",
            "India is a diverse country with varied climates, cultures, \
             languages, and landscapes. The best time to visit most regions \
             is between October and March.",
        ),
        (
            "Rajasthan Travel Guide",
            "Rajasthan is known for its desert climate, forts, palaces, and \
             royal heritage. Best time to visit Rajasthan is October to \
             March. Summers are extremely hot, while winters can be cold at \
             night. Major cities include Jaipur, Jodhpur, Udaipur, and \
             Jaisalmer.",
        ),
        (
            "Goa Travel Guide",
            "Goa is famous for beaches, nightlife, seafood, and Portuguese \
             heritage. Best time to visit Goa is November to February. \
             Popular beaches include Baga, Calangute, Anjuna, and Palolem.",
        ),
        (
            "South India Travel",
            "South India includes states like Tamil Nadu, Kerala, Karnataka, \
             and Andhra Pradesh. Known for temples, backwaters, hill \
             stations, and cuisine. Best visited between October and March.",
        ),
        (
            "Safety and Travel Tips",
            "India is generally safe for tourists. Use registered taxis, \
             avoid isolated areas at night, and respect local customs. Dress \
             modestly in religious places.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_is_non_empty() {
        let docs = india_travel_docs();
        assert_eq!(docs.len(), 5);
        for (title, text) in docs {
            assert!(!title.is_empty());
            assert!(!text.trim().is_empty());
        }
    }
}
